use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Chip8Error>;

/// Everything that can go wrong inside the machine or its adapters.
#[derive(Debug, Error)]
pub enum Chip8Error {
    /// `2NNN` issued with all 16 stack slots in use
    #[error("stack overflow: call at {pc:#05x} with a full stack")]
    StackOverflow { pc: u16 },
    /// `00EE` issued with nothing on the stack
    #[error("stack underflow: return at {pc:#05x} with an empty stack")]
    StackUnderflow { pc: u16 },
    #[error("rom is empty")]
    EmptyRom,
    #[error("rom is {len} bytes but only {capacity} fit in program memory")]
    RomTooLarge { len: usize, capacity: usize },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("audio error: {0}")]
    Audio(String),
    #[error("display takes {actual} pixels but the framebuffer has {expected}")]
    DisplaySize { expected: usize, actual: usize },
}

impl Chip8Error {
    /// faults raised by the program itself, as opposed to the host
    pub fn is_program_fault(&self) -> bool {
        matches!(
            self,
            Chip8Error::StackOverflow { .. } | Chip8Error::StackUnderflow { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_errors_are_program_faults() {
        assert!(Chip8Error::StackOverflow { pc: 0x200 }.is_program_fault());
        assert!(Chip8Error::StackUnderflow { pc: 0x200 }.is_program_fault());
        assert!(!Chip8Error::EmptyRom.is_program_fault());
    }

    #[test]
    fn test_messages_carry_address() {
        let e = Chip8Error::StackUnderflow { pc: 0x2a4 };
        assert_eq!(
            e.to_string(),
            "stack underflow: return at 0x2a4 with an empty stack"
        );
    }
}
