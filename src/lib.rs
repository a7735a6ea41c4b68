//!
//! ## Design
//!
//! * one instruction semantics: the "modern" CHIP-8 quirk set that current
//!   test ROMs expect (VF reset on logic ops, shifts read VY, I advances on
//!   FX55/FX65, sprites clip, draws wait for the previous frame)
//! * the machine state is one struct, `cpu::Chip8`, owned by whoever drives
//!   it; adapters only see the framebuffer, timers and keypad
//! * decode is a pure function from opcode to `instruction::Instruction`;
//!   execution is a separate step so each opcode can be tested alone
//! * abstract display, input and audio behind traits so alternatives can be
//!   plugged in; starting with TUI in-console
//! * the frame driver runs a fixed number of instructions per 60Hz frame and
//!   ticks the timers once per frame, then sleeps to hold the frame rate
//!
//! Model
//!
//! ```text
//! main
//!  |-- config, display, input, sound, logger, debugger
//!  `-- emulator(config, display, input, sound)
//!       |-- chip8: memory, registers, stack, timers, framebuffer, keypad
//!       `-- main loop, per frame:
//!            |-- input.poll() -> keypad
//!            |-- chip8.step() x (cpu_hz / 60)
//!            |     `-- fetch -> Instruction::decode -> execute
//!            |-- chip8.tick_timers()
//!            |-- display.draw() if the framebuffer changed
//!            |-- display.show_debug() with --debug
//!            |-- sound.beep() / sound.stop() on sound timer edges
//!            `-- sleep until the next frame
//! ```
pub mod config;
pub mod cpu;
pub mod debugger;
pub mod display;
pub mod emulator;
pub mod error;
mod execute;
pub mod framebuffer;
pub mod input;
pub mod instruction;
pub mod keypad;
pub mod logger;
pub mod memory;
pub mod sound;

pub use config::Config;
pub use cpu::Chip8;
pub use emulator::{Emulator, ExecMode, FrameOutcome};
pub use error::{Chip8Error, Result};
pub use instruction::Instruction;
