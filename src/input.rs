use crate::error::Result;
use crate::keypad::{Keypad, KEY_COUNT};
use crossterm::event::{poll, read, Event, KeyCode};
use log::warn;
use std::collections::HashMap;
use std::time::Duration;

/// map of keys on the left-hand side of a qwerty keyboard to the COSMAC
/// hex keypad:
///   1 2 3 4      1 2 3 C
///   q w e r  =>  4 5 6 D
///   a s d f      7 8 9 E
///   z x c v      A 0 B F
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('q', 0x04),
    ('w', 0x05),
    ('e', 0x06),
    ('a', 0x07),
    ('s', 0x08),
    ('d', 0x09),
    ('z', 0x0a),
    ('c', 0x0b),
    ('4', 0x0c),
    ('r', 0x0d),
    ('f', 0x0e),
    ('v', 0x0f),
];

/// what the frame driver needs to hear about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// a hex key was pressed
    Key(u8),
    Quit,
    TogglePause,
    StepOnce,
    /// switch the debug panel between registers and memory
    DebugView,
    PreviousPage,
    NextPage,
}

/// reads keypresses
pub trait Input {
    /// drain everything that happened since the last poll, without blocking
    fn poll(&mut self) -> Result<Vec<InputEvent>>;
}

/// implementation of Input, using crossterm terminal events
pub struct StdinInput {
    keymap: HashMap<char, u8>,
}

impl StdinInput {
    /// expects the terminal to be in raw mode already (the display does that)
    pub fn new() -> Self {
        StdinInput {
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
        }
    }

    fn translate(&self, code: KeyCode) -> Option<InputEvent> {
        match code {
            KeyCode::Esc => Some(InputEvent::Quit),
            KeyCode::Char(c) => {
                let c = c.to_ascii_lowercase();
                match self.keymap.get(&c) {
                    Some(&key) => Some(InputEvent::Key(key)),
                    None if c == 'p' => Some(InputEvent::TogglePause),
                    None if c == 'n' => Some(InputEvent::StepOnce),
                    None if c == 'm' => Some(InputEvent::DebugView),
                    None if c == ',' => Some(InputEvent::PreviousPage),
                    None if c == '.' => Some(InputEvent::NextPage),
                    None => {
                        warn!("can't map {:?} to a COSMAC key", c);
                        None
                    }
                }
            }
            _ => None,
        }
    }
}

impl Default for StdinInput {
    fn default() -> Self {
        Self::new()
    }
}

impl Input for StdinInput {
    fn poll(&mut self) -> Result<Vec<InputEvent>> {
        let mut events = Vec::new();
        while poll(Duration::from_millis(0))? {
            if let Event::Key(evt) = read()? {
                events.extend(self.translate(evt.code));
            }
        }
        Ok(events)
    }
}

/// dummy Input implementation for testing: hands out one batch per poll
pub struct DummyInput {
    batches: Vec<Vec<InputEvent>>,
}

impl DummyInput {
    pub fn new(batches: Vec<Vec<InputEvent>>) -> Self {
        let mut batches = batches;
        batches.reverse();
        DummyInput { batches }
    }
}

impl Input for DummyInput {
    fn poll(&mut self) -> Result<Vec<InputEvent>> {
        Ok(self.batches.pop().unwrap_or_default())
    }
}

/// Terminals report key presses but never releases, so a pressed key is
/// held down on the keypad for a fixed number of frames after its most
/// recent press (auto-repeat keeps it topped up while held).
pub struct KeyLatch {
    hold_frames: u32,
    remaining: [u32; KEY_COUNT],
}

impl KeyLatch {
    pub fn new(hold_frames: u32) -> Self {
        KeyLatch {
            hold_frames: hold_frames.max(1),
            remaining: [0; KEY_COUNT],
        }
    }

    pub fn press(&mut self, key: u8, keypad: &mut Keypad) {
        self.remaining[(key & 0x0f) as usize] = self.hold_frames;
        keypad.set(key, true);
    }

    /// age every held key by one frame, releasing any that run out
    pub fn end_frame(&mut self, keypad: &mut Keypad) {
        for (key, left) in self.remaining.iter_mut().enumerate() {
            if *left == 0 {
                continue;
            }
            *left -= 1;
            if *left == 0 {
                keypad.set(key as u8, false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_keys() {
        let i = StdinInput::new();
        assert_eq!(i.translate(KeyCode::Char('x')), Some(InputEvent::Key(0x0)));
        assert_eq!(i.translate(KeyCode::Char('4')), Some(InputEvent::Key(0xc)));
        assert_eq!(i.translate(KeyCode::Char('V')), Some(InputEvent::Key(0xf)));
        assert_eq!(i.translate(KeyCode::Esc), Some(InputEvent::Quit));
        assert_eq!(i.translate(KeyCode::Char('p')), Some(InputEvent::TogglePause));
        assert_eq!(i.translate(KeyCode::Char('n')), Some(InputEvent::StepOnce));
        assert_eq!(i.translate(KeyCode::Char('m')), Some(InputEvent::DebugView));
        assert_eq!(i.translate(KeyCode::Char(',')), Some(InputEvent::PreviousPage));
        assert_eq!(i.translate(KeyCode::Char('.')), Some(InputEvent::NextPage));
        assert_eq!(i.translate(KeyCode::Char('g')), None);
        assert_eq!(i.translate(KeyCode::Enter), None);
    }

    #[test]
    fn test_keymap_covers_every_key() {
        let mut keys: Vec<u8> = CHIP8_CONVENTIONAL_KEYMAP.iter().map(|&(_, k)| k).collect();
        keys.sort();
        assert_eq!(keys, (0..16).collect::<Vec<u8>>());
    }

    #[test]
    fn test_dummy_input_batches() -> Result<()> {
        let mut i = DummyInput::new(vec![vec![InputEvent::Key(1)], vec![InputEvent::Quit]]);
        assert_eq!(i.poll()?, vec![InputEvent::Key(1)]);
        assert_eq!(i.poll()?, vec![InputEvent::Quit]);
        assert!(i.poll()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_latch_holds_then_releases() {
        let mut keypad = Keypad::new();
        let mut latch = KeyLatch::new(2);
        latch.press(0x5, &mut keypad);
        assert!(keypad.is_down(0x5));
        latch.end_frame(&mut keypad);
        assert!(keypad.is_down(0x5));
        latch.end_frame(&mut keypad);
        assert!(!keypad.is_down(0x5));
    }

    #[test]
    fn test_latch_repress_extends_hold() {
        let mut keypad = Keypad::new();
        let mut latch = KeyLatch::new(2);
        latch.press(0x5, &mut keypad);
        latch.end_frame(&mut keypad);
        latch.press(0x5, &mut keypad);
        latch.end_frame(&mut keypad);
        assert!(keypad.is_down(0x5));
        latch.end_frame(&mut keypad);
        assert!(!keypad.is_down(0x5));
    }
}
