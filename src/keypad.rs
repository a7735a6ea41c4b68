pub const KEY_COUNT: usize = 16;

/// state of the 16-key hex keypad, indexed by key value 0x0-0xf
#[derive(Default)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Keypad::default()
    }

    /// record a key transition; only the low nibble selects the key
    pub fn set(&mut self, key: u8, down: bool) {
        self.keys[(key & 0x0f) as usize] = down;
    }

    pub fn is_down(&self, key: u8) -> bool {
        self.keys[(key & 0x0f) as usize]
    }

    /// lowest-numbered key currently held, if any
    pub fn first_down(&self) -> Option<u8> {
        self.keys.iter().position(|&k| k).map(|k| k as u8)
    }
}
