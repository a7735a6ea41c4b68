use crate::error::{Chip8Error, Result};
use beep::beep;

/// the machine has a single tone which is either on or off
pub trait Sound {
    fn beep(&mut self) -> Result<()>;
    fn stop(&mut self) -> Result<()>;
}

const SIMPLEBEEP_PITCH: u16 = 2093; // C

/// PC speaker tone; needs write access to the console device
pub struct SimpleBeep {
    is_beeping: bool,
}

impl SimpleBeep {
    pub fn new() -> Self {
        SimpleBeep { is_beeping: false }
    }
}

impl Default for SimpleBeep {
    fn default() -> Self {
        Self::new()
    }
}

impl Sound for SimpleBeep {
    fn beep(&mut self) -> Result<()> {
        beep(SIMPLEBEEP_PITCH).map_err(|e| Chip8Error::Audio(e.to_string()))?;
        self.is_beeping = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if self.is_beeping {
            beep(0).map_err(|e| Chip8Error::Audio(e.to_string()))?;
            self.is_beeping = false;
        }
        Ok(())
    }
}

/// silent Sound; also counts calls, for testing
#[derive(Default)]
pub struct Mute {
    pub beeps: usize,
    pub stops: usize,
}

impl Mute {
    pub fn new() -> Self {
        Mute::default()
    }
}

impl Sound for Mute {
    fn beep(&mut self) -> Result<()> {
        self.beeps += 1;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.stops += 1;
        Ok(())
    }
}

/// Turns the sound timer into beep/stop calls, only on transitions.
#[derive(Default)]
pub struct ToneGate {
    on: bool,
}

impl ToneGate {
    pub fn update(&mut self, sound_on: bool, sound: &mut dyn Sound) -> Result<()> {
        if sound_on == self.on {
            return Ok(());
        }
        if sound_on {
            sound.beep()?;
        } else {
            sound.stop()?;
        }
        self.on = sound_on;
        Ok(())
    }
}
