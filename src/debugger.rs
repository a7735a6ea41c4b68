//! # debugger
//!
//! Text views of the machine for `--debug` runs, shown beside the screen:
//!
//!  * overview: V0-VF, the 16 stack slots, PC/I/SP and both timers
//!  * memory: a 16x16 byte hex dump, one 256 byte page at a time
//!
//! `m` flips between the two; `,` and `.` page back and forward through
//! memory, wrapping at either end.
use crate::cpu::{Chip8, REGISTER_COUNT, STACK_DEPTH};
use crate::memory::CHIP8_RAM_SIZE_BYTES;
use std::fmt::Write;

pub const DUMP_COLUMNS: usize = 16;
pub const DUMP_ROWS: usize = 16;
pub const PAGE_SIZE: usize = DUMP_COLUMNS * DUMP_ROWS;
pub const PAGE_COUNT: usize = (CHIP8_RAM_SIZE_BYTES + PAGE_SIZE - 1) / PAGE_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugView {
    Overview,
    MemoryDump,
}

/// what the display is asked to put in the side panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugPanel {
    pub title: String,
    pub lines: Vec<String>,
}

pub struct Debugger {
    view: DebugView,
    page: usize,
}

impl Debugger {
    pub fn new() -> Self {
        Debugger {
            view: DebugView::Overview,
            page: 0,
        }
    }

    pub fn view(&self) -> DebugView {
        self.view
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn toggle_view(&mut self) {
        self.view = match self.view {
            DebugView::Overview => DebugView::MemoryDump,
            DebugView::MemoryDump => DebugView::Overview,
        };
    }

    /// only pages while the memory dump is showing
    pub fn previous_page(&mut self) {
        if self.view == DebugView::MemoryDump {
            self.page = (self.page + PAGE_COUNT - 1) % PAGE_COUNT;
        }
    }

    pub fn next_page(&mut self) {
        if self.view == DebugView::MemoryDump {
            self.page = (self.page + 1) % PAGE_COUNT;
        }
    }

    pub fn panel(&self, machine: &Chip8) -> DebugPanel {
        match self.view {
            DebugView::Overview => overview(machine),
            DebugView::MemoryDump => memory_dump(machine, self.page),
        }
    }
}

impl Default for Debugger {
    fn default() -> Self {
        Self::new()
    }
}

fn overview(machine: &Chip8) -> DebugPanel {
    let v = machine.registers();
    let stack = machine.stack();
    let side = [
        format!("PC: {:#06x}", machine.pc()),
        format!("I:  {:#06x}", machine.index()),
        format!("SP: {:#04x}", stack.len()),
        String::new(),
        format!("DT: {}", machine.delay_timer()),
        format!("ST: {}", machine.sound_timer()),
    ];

    let mut lines = vec!["regs      stack".to_string()];
    for n in 0..REGISTER_COUNT.max(STACK_DEPTH) {
        let slot = match stack.get(n) {
            Some(addr) => format!("{:#06x}", addr),
            None => "------".to_string(),
        };
        let mut line = format!("V{:X}: {:02x}   {}", n, v[n], slot);
        if let Some(extra) = side.get(n) {
            line.push_str("   ");
            line.push_str(extra);
        }
        lines.push(line.trim_end().to_string());
    }
    DebugPanel {
        title: "registers".to_string(),
        lines,
    }
}

fn memory_dump(machine: &Chip8, page: usize) -> DebugPanel {
    let ram = machine.memory().as_slice();
    let start = page * PAGE_SIZE;
    let end = (start + PAGE_SIZE).min(ram.len());

    let mut header = String::from("     ");
    for col in 0..DUMP_COLUMNS {
        let _ = write!(header, " {:02X}", col);
    }
    let mut lines = vec![header];
    for (row, bytes) in ram[start..end].chunks(DUMP_COLUMNS).enumerate() {
        let mut line = format!("{:04X} ", start + row * DUMP_COLUMNS);
        for b in bytes {
            let _ = write!(line, " {:02x}", b);
        }
        lines.push(line);
    }
    DebugPanel {
        title: format!("memory {}/{}", page + 1, PAGE_COUNT),
        lines,
    }
}
