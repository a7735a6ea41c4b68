//! # cpu
//!
//! The whole machine state lives in `Chip8`:
//!
//!  * 4K of RAM, font at 0x050, program from 0x200
//!  * V0-VF, 8 bits each; VF doubles as the carry/borrow/collision flag
//!  * I, the 16 bit index register
//!  * PC, starting at 0x200
//!  * a 16-deep return stack
//!  * delay and sound timers, counting down at 60Hz
//!  * the 64x32 framebuffer and the hex keypad
//!
//! The frame driver calls `step()` once per instruction and `tick_timers()`
//! at 60Hz. Nothing else writes to the state, except that the input adapter
//! sets keys and the renderer acknowledges frames, both between steps.
use crate::error::{Chip8Error, Result};
use crate::framebuffer::Framebuffer;
use crate::instruction::Instruction;
use crate::keypad::Keypad;
use crate::memory::{Chip8MemoryMap, MemoryMap, CHIP8_PROGRAM_ADDR};
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io;
use std::path::Path;

pub const REGISTER_COUNT: usize = 16;
pub const STACK_DEPTH: usize = 16;

/// index of the flag register
pub(crate) const VF: usize = 0xf;

pub struct Chip8 {
    pub(crate) memory: Chip8MemoryMap,
    pub(crate) pc: u16,
    pub(crate) stack: [u16; STACK_DEPTH],
    pub(crate) sp: usize,
    pub(crate) v: [u8; REGISTER_COUNT],
    pub(crate) i: u16,
    pub(crate) delay_timer: u8,
    pub(crate) sound_timer: u8,
    pub(crate) display: Framebuffer,
    pub(crate) keypad: Keypad,
    pub(crate) rng: StdRng,
}

impl Chip8 {
    /// reset machine, seeding the random stream from the OS
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// reset machine with a reproducible random stream
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Chip8 {
            memory: Chip8MemoryMap::new(),
            pc: CHIP8_PROGRAM_ADDR,
            stack: [0; STACK_DEPTH],
            sp: 0,
            v: [0; REGISTER_COUNT],
            i: 0,
            delay_timer: 0,
            sound_timer: 0,
            display: Framebuffer::new(),
            keypad: Keypad::new(),
            rng,
        }
    }

    /// load a chip8 program from any reader
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize> {
        self.memory.load_program(reader)
    }

    /// load a chip8 program from a file on disk
    pub fn load_rom(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        debug!("loading rom {}", path.display());
        let mut f = File::open(path)?;
        self.load_program(&mut f)
    }

    /// fetch, decode and execute one instruction
    pub fn step(&mut self) -> Result<()> {
        let addr = self.pc;
        let opcode = self.memory.get_word(addr);
        self.pc = self.pc.wrapping_add(2);
        let instruction = Instruction::decode(opcode);
        if instruction.is_nop() {
            trace!("{:#05x}: {:04x}  ignored", addr, opcode);
        } else {
            trace!("{:#05x}: {:04x}  {}", addr, opcode, instruction);
        }
        self.execute(instruction)
    }

    /// one 60Hz tick of both timers
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    // A stack fault leaves pc on the faulting instruction (the stepper has
    // already moved past it) and touches nothing else.
    fn rewind_for_fault(&mut self) -> u16 {
        self.pc = self.pc.wrapping_sub(2);
        self.pc
    }

    pub(crate) fn push(&mut self, addr: u16) -> Result<()> {
        if self.sp >= STACK_DEPTH {
            let pc = self.rewind_for_fault();
            return Err(Chip8Error::StackOverflow { pc });
        }
        self.stack[self.sp] = addr;
        self.sp += 1;
        Ok(())
    }

    pub(crate) fn pop(&mut self) -> Result<u16> {
        if self.sp == 0 {
            let pc = self.rewind_for_fault();
            return Err(Chip8Error::StackUnderflow { pc });
        }
        self.sp -= 1;
        Ok(self.stack[self.sp])
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn index(&self) -> u16 {
        self.i
    }

    pub fn registers(&self) -> &[u8; REGISTER_COUNT] {
        &self.v
    }

    /// return addresses currently on the stack, oldest first
    pub fn stack(&self) -> &[u16] {
        &self.stack[..self.sp]
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    /// the audio adapter only cares about this
    pub fn is_sound_on(&self) -> bool {
        self.sound_timer > 0
    }

    pub fn memory(&self) -> &Chip8MemoryMap {
        &self.memory
    }

    pub fn display(&self) -> &Framebuffer {
        &self.display
    }

    /// renderer hook: the current frame has been shown
    pub fn acknowledge_frame(&mut self) {
        self.display.acknowledge();
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    /// input adapter hook
    pub fn keypad_mut(&mut self) -> &mut Keypad {
        &mut self.keypad
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_state() {
        let c = Chip8::with_seed(0);
        assert_eq!(c.pc(), 0x200);
        assert_eq!(c.index(), 0);
        assert_eq!(c.registers(), &[0; 16]);
        assert!(c.stack().is_empty());
        assert_eq!(c.delay_timer(), 0);
        assert_eq!(c.sound_timer(), 0);
        assert!(!c.display().is_redraw_needed());
        assert_eq!(c.memory().read_byte(0x50), 0xf0);
    }

    #[test]
    fn test_program_load_ok() -> Result<()> {
        let mut c = Chip8::with_seed(0);
        let mut prog: &[u8] = &[0x00, 0xe0]; // clear screen
        c.load_program(&mut prog)?;
        assert_eq!(c.memory().get_word(0x200), 0x00e0);
        Ok(())
    }

    #[test]
    fn test_load_rom_missing_file() {
        let mut c = Chip8::with_seed(0);
        assert!(matches!(
            c.load_rom("/nonexistent/rom.ch8"),
            Err(Chip8Error::Io(_))
        ));
    }

    #[test]
    fn test_step_fetches_big_endian_and_advances() -> Result<()> {
        let mut c = Chip8::with_seed(0);
        let mut prog: &[u8] = &[0x6a, 0x42, 0x6b, 0x07];
        c.load_program(&mut prog)?;
        c.step()?;
        assert_eq!(c.pc(), 0x202);
        assert_eq!(c.registers()[0xa], 0x42);
        c.step()?;
        assert_eq!(c.pc(), 0x204);
        assert_eq!(c.registers()[0xb], 0x07);
        Ok(())
    }

    #[test]
    fn test_unknown_opcode_is_nop() -> Result<()> {
        let mut c = Chip8::with_seed(0);
        let mut prog: &[u8] = &[0x81, 0x28, 0xff, 0xff, 0x01, 0x23];
        c.load_program(&mut prog)?;
        for _ in 0..3 {
            c.step()?;
        }
        assert_eq!(c.pc(), 0x206);
        assert_eq!(c.registers(), &[0; 16]);
        Ok(())
    }

    #[test]
    fn test_fetch_wraps_at_top_of_memory() -> Result<()> {
        let mut c = Chip8::with_seed(0);
        c.memory.write_byte(0xfff, 0x63);
        c.memory.write_byte(0x000, 0x99);
        c.pc = 0xfff;
        c.step()?;
        assert_eq!(c.registers()[3], 0x99);
        Ok(())
    }

    #[test]
    fn test_tick_timers_stops_at_zero() {
        let mut c = Chip8::with_seed(0);
        c.delay_timer = 2;
        c.sound_timer = 1;
        assert!(c.is_sound_on());
        c.tick_timers();
        assert_eq!((c.delay_timer(), c.sound_timer()), (1, 0));
        assert!(!c.is_sound_on());
        c.tick_timers();
        c.tick_timers();
        assert_eq!((c.delay_timer(), c.sound_timer()), (0, 0));
    }

    #[test]
    fn test_stack_bounds() {
        let mut c = Chip8::with_seed(0);
        assert!(matches!(c.pop(), Err(Chip8Error::StackUnderflow { .. })));
        for n in 0..STACK_DEPTH as u16 {
            assert!(c.push(0x200 + n * 2).is_ok());
        }
        assert!(matches!(c.push(0x300), Err(Chip8Error::StackOverflow { .. })));
        assert_eq!(c.stack().len(), 16);
        assert_eq!(c.pop().ok(), Some(0x21e));
    }
}
