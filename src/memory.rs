use crate::error::{Chip8Error, Result};
use log::debug;
use std::io::{self, Read};

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// every address is folded back into the 4K space with this mask
pub const ADDRESS_MASK: u16 = 0x0fff;

/// Represents the flat RAM of the machine. Implementors only have to provide
/// single-byte access; every address is masked into range first, so reads
/// and writes past the top of RAM wrap instead of faulting.
pub trait MemoryMap {
    /// read one byte
    fn read_byte(&self, addr: u16) -> u8;

    /// write one byte
    fn write_byte(&mut self, addr: u16, value: u8);

    /// get a big-endian two-byte word (opcode fetch)
    fn get_word(&self, addr: u16) -> u16 {
        ((self.read_byte(addr) as u16) << 8) | self.read_byte(addr.wrapping_add(1)) as u16
    }

    /// write a chunk of bytes starting at `addr`
    fn write(&mut self, data: &[u8], addr: u16) {
        for (offset, byte) in data.iter().enumerate() {
            self.write_byte(addr.wrapping_add(offset as u16), *byte);
        }
    }

    /// fill `buf` with bytes starting at `addr`
    fn read_into(&self, addr: u16, buf: &mut [u8]) {
        for (offset, byte) in buf.iter_mut().enumerate() {
            *byte = self.read_byte(addr.wrapping_add(offset as u16));
        }
    }
}

/// Standard CHIP-8 memory map, as seen by programs:
///   0x0000-0x004f  unused (zero)
///   0x0050-0x009f  hex digit font, 16 glyphs of 5 bytes
///   0x00a0-0x01ff  unused (zero)
///   0x0200-0x0fff  program
pub struct Chip8MemoryMap {
    bytes: Box<[u8]>,
}

impl MemoryMap for Chip8MemoryMap {
    fn read_byte(&self, addr: u16) -> u8 {
        self.bytes[(addr & ADDRESS_MASK) as usize]
    }

    fn write_byte(&mut self, addr: u16, value: u8) {
        self.bytes[(addr & ADDRESS_MASK) as usize] = value;
    }
}

/// how much RAM we have
pub const CHIP8_RAM_SIZE_BYTES: usize = 4096;

/// where the program is loaded
pub const CHIP8_PROGRAM_ADDR: u16 = 0x0200;

/// most bytes a program can occupy
pub const CHIP8_PROGRAM_CAPACITY: usize = CHIP8_RAM_SIZE_BYTES - CHIP8_PROGRAM_ADDR as usize;

impl Chip8MemoryMap {
    /// zeroed RAM with the font baked in
    pub fn new() -> Self {
        let mut mm = Chip8MemoryMap {
            bytes: vec![0u8; CHIP8_RAM_SIZE_BYTES].into_boxed_slice(),
        };
        mm.write(&CHIP8_FONT, CHIP8_FONT_ADDR);
        mm
    }

    /// load a CHIP-8 program at 0x200, returning how many bytes were read.
    /// Reads at most one byte past the capacity, so an endless reader is
    /// reported as too large (with `len` of capacity + 1).
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize> {
        let mut buf = Vec::with_capacity(CHIP8_PROGRAM_CAPACITY + 1);
        let len = reader
            .take(CHIP8_PROGRAM_CAPACITY as u64 + 1)
            .read_to_end(&mut buf)?;
        if len == 0 {
            return Err(Chip8Error::EmptyRom);
        }
        if len > CHIP8_PROGRAM_CAPACITY {
            return Err(Chip8Error::RomTooLarge {
                len,
                capacity: CHIP8_PROGRAM_CAPACITY,
            });
        }
        self.write(&buf, CHIP8_PROGRAM_ADDR);
        debug!("loaded {} byte program at {:#05x}", len, CHIP8_PROGRAM_ADDR);
        Ok(len)
    }

    /// r/o view of the whole of RAM
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for Chip8MemoryMap {
    fn default() -> Self {
        Self::new()
    }
}

/// first byte of the font glyphs
pub const CHIP8_FONT_ADDR: u16 = 0x050;

/// bytes per font glyph
pub const CHIP8_FONT_GLYPH_BYTES: u16 = 5;

const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
