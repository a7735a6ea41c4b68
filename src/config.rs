/// timers, and the frame loop, run at this rate
pub const TIMER_HZ: u32 = 60;

/// How long a key press is held on the keypad. Half a second outlasts the
/// usual 250-500ms delay before keyboard auto-repeat starts, so a held key
/// stays down continuously instead of dropping out once.
pub const DEFAULT_KEY_HOLD_FRAMES: u32 = 30;

/// knobs for the frame driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// emulated instruction clock
    pub cpu_hz: u32,
    /// terminals only report presses, so a key stays down this many frames
    pub key_hold_frames: u32,
    /// allow pausing and single-stepping from the keyboard
    pub debug: bool,
    /// stop after this many frames
    pub max_frames: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cpu_hz: 800,
            key_hold_frames: DEFAULT_KEY_HOLD_FRAMES,
            debug: false,
            max_frames: None,
        }
    }
}

impl Config {
    pub fn instructions_per_frame(&self) -> u32 {
        (self.cpu_hz / TIMER_HZ).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_clock() {
        assert_eq!(Config::default().instructions_per_frame(), 13);
    }

    #[test]
    fn test_slow_clock_still_runs() {
        let c = Config {
            cpu_hz: 10,
            ..Config::default()
        };
        assert_eq!(c.instructions_per_frame(), 1);
    }

    #[test]
    fn test_key_hold_bridges_autorepeat_delay() {
        let held_ms = Config::default().key_hold_frames * 1000 / TIMER_HZ;
        assert!(held_ms >= 500, "key released after {}ms", held_ms);
    }
}
