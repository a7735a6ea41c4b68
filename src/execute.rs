//! # execute
//!
//! One handler per `Instruction`. The stepper has already moved `pc` past
//! the instruction, so skips add another 2 and stalls (key wait, display
//! wait) take 2 off to land back on the same instruction next cycle.
//!
//! Quirks, matching what current test ROMs expect rather than the strictest
//! COSMAC VIP behaviour:
//!  * 8XY1/8XY2/8XY3 reset VF to 0
//!  * 8XY6/8XYE shift VY, not VX
//!  * DXYN clips at the screen edges, and waits for the renderer if the
//!    previous frame hasn't been shown yet
//!  * FX55/FX65 leave I pointing just past the last register transferred
use crate::cpu::{Chip8, VF};
use crate::error::Result;
use crate::framebuffer::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::instruction::{Instruction, Reg};
use crate::memory::{MemoryMap, CHIP8_FONT_ADDR, CHIP8_FONT_GLYPH_BYTES};
use log::trace;
use rand::Rng;

impl Chip8 {
    /// run one decoded instruction against the machine state
    pub fn execute(&mut self, instruction: Instruction) -> Result<()> {
        use Instruction::*;
        match instruction {
            Sys(_) | Unknown(_) => {}
            ClearScreen => self.display.clear(),
            Return => self.pc = self.pop()?,
            Jump(addr) => self.pc = addr,
            Call(addr) => {
                self.push(self.pc)?;
                self.pc = addr;
            }
            SkipEqImm { x, nn } => self.skip_if(self.vx(x) == nn),
            SkipNeImm { x, nn } => self.skip_if(self.vx(x) != nn),
            SkipEqReg { x, y } => self.skip_if(self.vx(x) == self.vx(y)),
            SkipNeReg { x, y } => self.skip_if(self.vx(x) != self.vx(y)),
            LoadImm { x, nn } => self.set_vx(x, nn),
            AddImm { x, nn } => self.set_vx(x, self.vx(x).wrapping_add(nn)),
            Move { x, y } => self.set_vx(x, self.vx(y)),
            Or { x, y } => self.logic(x, self.vx(x) | self.vx(y)),
            And { x, y } => self.logic(x, self.vx(x) & self.vx(y)),
            Xor { x, y } => self.logic(x, self.vx(x) ^ self.vx(y)),
            AddReg { x, y } => {
                let (sum, carry) = self.vx(x).overflowing_add(self.vx(y));
                self.set_vx(x, sum);
                self.v[VF] = carry as u8;
            }
            Sub { x, y } => self.subtract(x, self.vx(x), self.vx(y)),
            SubReverse { x, y } => self.subtract(x, self.vx(y), self.vx(x)),
            ShiftRight { x, y } => {
                let vy = self.vx(y);
                self.set_vx(x, vy >> 1);
                self.v[VF] = vy & 0x01;
            }
            ShiftLeft { x, y } => {
                let vy = self.vx(y);
                self.set_vx(x, vy << 1);
                self.v[VF] = vy >> 7;
            }
            LoadIndex(addr) => self.i = addr,
            JumpOffset(addr) => self.pc = self.v[0] as u16 + addr,
            Random { x, nn } => {
                let byte: u8 = self.rng.gen();
                self.set_vx(x, byte & nn);
            }
            Draw { x, y, n } => self.draw(x, y, n),
            SkipKeyDown { x } => self.skip_if(self.keypad.is_down(self.vx(x))),
            SkipKeyUp { x } => self.skip_if(!self.keypad.is_down(self.vx(x))),
            LoadDelay { x } => self.set_vx(x, self.delay_timer),
            WaitKey { x } => match self.keypad.first_down() {
                Some(key) => self.set_vx(x, key),
                None => self.stall(),
            },
            SetDelay { x } => self.delay_timer = self.vx(x),
            SetSound { x } => self.sound_timer = self.vx(x),
            AddIndex { x } => self.i = self.i.wrapping_add(self.vx(x) as u16),
            LoadGlyph { x } => {
                self.i = CHIP8_FONT_ADDR + self.vx(x) as u16 * CHIP8_FONT_GLYPH_BYTES
            }
            StoreBcd { x } => {
                let value = self.vx(x);
                self.memory
                    .write(&[value / 100, (value / 10) % 10, value % 10], self.i);
            }
            StoreRegs { x } => {
                let count = x as usize + 1;
                self.memory.write(&self.v[..count], self.i);
                self.i = self.i.wrapping_add(count as u16);
            }
            LoadRegs { x } => {
                let count = x as usize + 1;
                self.memory.read_into(self.i, &mut self.v[..count]);
                self.i = self.i.wrapping_add(count as u16);
            }
        }
        Ok(())
    }

    fn vx(&self, x: Reg) -> u8 {
        self.v[x as usize]
    }

    fn set_vx(&mut self, x: Reg, value: u8) {
        self.v[x as usize] = value;
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.pc = self.pc.wrapping_add(2);
        }
    }

    /// go round again on this instruction next cycle
    fn stall(&mut self) {
        self.pc = self.pc.wrapping_sub(2);
    }

    fn logic(&mut self, x: Reg, result: u8) {
        self.set_vx(x, result);
        self.v[VF] = 0;
    }

    // VF is written last so that VF as a destination ends up holding the flag
    fn subtract(&mut self, x: Reg, minuend: u8, subtrahend: u8) {
        self.set_vx(x, minuend.wrapping_sub(subtrahend));
        self.v[VF] = (minuend >= subtrahend) as u8;
    }

    fn draw(&mut self, x: Reg, y: Reg, height: u8) {
        if self.display.is_redraw_needed() {
            trace!("draw waiting for the renderer");
            self.stall();
            return;
        }

        let origin_x = self.vx(x) as usize % DISPLAY_WIDTH;
        let origin_y = self.vx(y) as usize % DISPLAY_HEIGHT;

        let mut collided = false;
        for row in 0..height as usize {
            let sprite_row = self.memory.read_byte(self.i.wrapping_add(row as u16));
            for col in 0..8 {
                if sprite_row & (0x80 >> col) == 0 {
                    continue;
                }
                // toggle() clips anything past the right and bottom edges
                collided |= self.display.toggle(origin_x + col, origin_y + row);
            }
        }
        self.v[VF] = collided as u8;
        self.display.mark_redraw_needed();
    }
}
