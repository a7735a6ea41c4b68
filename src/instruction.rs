//! Opcode decoding. `Instruction::decode` is a pure function of the 16-bit
//! opcode: the top nibble picks a family, and the 0x0, 0x8, 0xE and 0xF
//! families are split further on their low nibble or low byte. Anything
//! that doesn't match a known encoding decodes to `Unknown` and executes as
//! a no-op.

use std::fmt;

/// register index, 0x0-0xf
pub type Reg = u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 0NNN: call a native routine; ignored by interpreters
    Sys(u16),
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 1NNN
    Jump(u16),
    /// 2NNN
    Call(u16),
    /// 3XNN
    SkipEqImm { x: Reg, nn: u8 },
    /// 4XNN
    SkipNeImm { x: Reg, nn: u8 },
    /// 5XY0
    SkipEqReg { x: Reg, y: Reg },
    /// 6XNN
    LoadImm { x: Reg, nn: u8 },
    /// 7XNN
    AddImm { x: Reg, nn: u8 },
    /// 8XY0
    Move { x: Reg, y: Reg },
    /// 8XY1
    Or { x: Reg, y: Reg },
    /// 8XY2
    And { x: Reg, y: Reg },
    /// 8XY3
    Xor { x: Reg, y: Reg },
    /// 8XY4
    AddReg { x: Reg, y: Reg },
    /// 8XY5
    Sub { x: Reg, y: Reg },
    /// 8XY6
    ShiftRight { x: Reg, y: Reg },
    /// 8XY7
    SubReverse { x: Reg, y: Reg },
    /// 8XYE
    ShiftLeft { x: Reg, y: Reg },
    /// 9XY0
    SkipNeReg { x: Reg, y: Reg },
    /// ANNN
    LoadIndex(u16),
    /// BNNN
    JumpOffset(u16),
    /// CXNN
    Random { x: Reg, nn: u8 },
    /// DXYN
    Draw { x: Reg, y: Reg, n: u8 },
    /// EX9E
    SkipKeyDown { x: Reg },
    /// EXA1
    SkipKeyUp { x: Reg },
    /// FX07
    LoadDelay { x: Reg },
    /// FX0A
    WaitKey { x: Reg },
    /// FX15
    SetDelay { x: Reg },
    /// FX18
    SetSound { x: Reg },
    /// FX1E
    AddIndex { x: Reg },
    /// FX29
    LoadGlyph { x: Reg },
    /// FX33
    StoreBcd { x: Reg },
    /// FX55
    StoreRegs { x: Reg },
    /// FX65
    LoadRegs { x: Reg },
    /// reserved or unassigned encoding
    Unknown(u16),
}

// operand fields at their fixed bit positions
fn x(op: u16) -> Reg {
    ((op >> 8) & 0xf) as Reg
}
fn y(op: u16) -> Reg {
    ((op >> 4) & 0xf) as Reg
}
fn n(op: u16) -> u8 {
    (op & 0xf) as u8
}
fn nn(op: u16) -> u8 {
    (op & 0xff) as u8
}
fn nnn(op: u16) -> u16 {
    op & 0x0fff
}

impl Instruction {
    pub fn decode(op: u16) -> Instruction {
        use Instruction::*;
        match op >> 12 {
            0x0 => match op {
                0x00e0 => ClearScreen,
                0x00ee => Return,
                _ => Sys(nnn(op)),
            },
            0x1 => Jump(nnn(op)),
            0x2 => Call(nnn(op)),
            0x3 => SkipEqImm { x: x(op), nn: nn(op) },
            0x4 => SkipNeImm { x: x(op), nn: nn(op) },
            0x5 => SkipEqReg { x: x(op), y: y(op) },
            0x6 => LoadImm { x: x(op), nn: nn(op) },
            0x7 => AddImm { x: x(op), nn: nn(op) },
            0x8 => {
                let (x, y) = (x(op), y(op));
                match n(op) {
                    0x0 => Move { x, y },
                    0x1 => Or { x, y },
                    0x2 => And { x, y },
                    0x3 => Xor { x, y },
                    0x4 => AddReg { x, y },
                    0x5 => Sub { x, y },
                    0x6 => ShiftRight { x, y },
                    0x7 => SubReverse { x, y },
                    0xe => ShiftLeft { x, y },
                    _ => Unknown(op),
                }
            }
            0x9 => SkipNeReg { x: x(op), y: y(op) },
            0xa => LoadIndex(nnn(op)),
            0xb => JumpOffset(nnn(op)),
            0xc => Random { x: x(op), nn: nn(op) },
            0xd => Draw { x: x(op), y: y(op), n: n(op) },
            0xe => match nn(op) {
                0x9e => SkipKeyDown { x: x(op) },
                0xa1 => SkipKeyUp { x: x(op) },
                _ => Unknown(op),
            },
            0xf => match nn(op) {
                0x07 => LoadDelay { x: x(op) },
                0x0a => WaitKey { x: x(op) },
                0x15 => SetDelay { x: x(op) },
                0x18 => SetSound { x: x(op) },
                0x1e => AddIndex { x: x(op) },
                0x29 => LoadGlyph { x: x(op) },
                0x33 => StoreBcd { x: x(op) },
                0x55 => StoreRegs { x: x(op) },
                0x65 => LoadRegs { x: x(op) },
                _ => Unknown(op),
            },
            _ => Unknown(op),
        }
    }

    /// executes as a no-op
    pub fn is_nop(&self) -> bool {
        matches!(self, Instruction::Sys(_) | Instruction::Unknown(_))
    }
}

/// Cowgod-style mnemonics, for trace logs
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;
        match *self {
            Sys(a) => write!(f, "SYS {:#05x}", a),
            ClearScreen => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Jump(a) => write!(f, "JP {:#05x}", a),
            Call(a) => write!(f, "CALL {:#05x}", a),
            SkipEqImm { x, nn } => write!(f, "SE V{:X}, {:#04x}", x, nn),
            SkipNeImm { x, nn } => write!(f, "SNE V{:X}, {:#04x}", x, nn),
            SkipEqReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            LoadImm { x, nn } => write!(f, "LD V{:X}, {:#04x}", x, nn),
            AddImm { x, nn } => write!(f, "ADD V{:X}, {:#04x}", x, nn),
            Move { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            ShiftRight { x, y } => write!(f, "SHR V{:X}, V{:X}", x, y),
            SubReverse { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            ShiftLeft { x, y } => write!(f, "SHL V{:X}, V{:X}", x, y),
            SkipNeReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LoadIndex(a) => write!(f, "LD I, {:#05x}", a),
            JumpOffset(a) => write!(f, "JP V0, {:#05x}", a),
            Random { x, nn } => write!(f, "RND V{:X}, {:#04x}", x, nn),
            Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            SkipKeyDown { x } => write!(f, "SKP V{:X}", x),
            SkipKeyUp { x } => write!(f, "SKNP V{:X}", x),
            LoadDelay { x } => write!(f, "LD V{:X}, DT", x),
            WaitKey { x } => write!(f, "LD V{:X}, K", x),
            SetDelay { x } => write!(f, "LD DT, V{:X}", x),
            SetSound { x } => write!(f, "LD ST, V{:X}", x),
            AddIndex { x } => write!(f, "ADD I, V{:X}", x),
            LoadGlyph { x } => write!(f, "LD F, V{:X}", x),
            StoreBcd { x } => write!(f, "LD B, V{:X}", x),
            StoreRegs { x } => write!(f, "LD [I], V{:X}", x),
            LoadRegs { x } => write!(f, "LD V{:X}, [I]", x),
            Unknown(op) => write!(f, "??? {:#06x}", op),
        }
    }
}
