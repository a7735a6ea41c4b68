use std::error::Error;
use std::path::PathBuf;

use chip8vm::config::DEFAULT_KEY_HOLD_FRAMES;
use chip8vm::display::MonoTermDisplay;
use chip8vm::framebuffer::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use chip8vm::input::StdinInput;
use chip8vm::logger::FileLogger;
use chip8vm::sound::{Mute, SimpleBeep, Sound};
use chip8vm::{Chip8, Config, Emulator};
use clap::Parser;
use log::LevelFilter;

/// Run a CHIP-8 program in the terminal.
///
/// Keys: 1234/qwer/asdf/zxcv are the hex keypad, Esc quits, and with
/// --debug p pauses, n single-steps, m swaps the side panel between
/// registers and memory, and , and . page through memory.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// raw CHIP-8 binary to load at 0x200
    rom: PathBuf,

    /// instructions executed per second
    #[arg(long, default_value_t = 800)]
    cpu_hz: u32,

    /// frames (at 60Hz) a key stays down after a press; keep it longer than
    /// the keyboard auto-repeat delay or held keys flicker
    #[arg(long, default_value_t = DEFAULT_KEY_HOLD_FRAMES)]
    key_hold: u32,

    /// show the debugger panel and enable its keys
    #[arg(long)]
    debug: bool,

    /// sound through the PC speaker instead of staying silent
    #[arg(long)]
    beep: bool,

    /// stop after this many frames
    #[arg(long)]
    max_frames: Option<u64>,

    #[arg(long, default_value = "chip8vm.log")]
    log_file: PathBuf,

    /// off, error, warn, info, debug or trace
    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    FileLogger::new(&args.log_file, args.log_level)?.init()?;

    // initialise
    let mut machine = Chip8::new();
    machine.load_rom(&args.rom)?;

    let config = Config {
        cpu_hz: args.cpu_hz,
        key_hold_frames: args.key_hold,
        debug: args.debug,
        max_frames: args.max_frames,
    };

    let mut sound: Box<dyn Sound> = if args.beep {
        Box::new(SimpleBeep::new())
    } else {
        Box::new(Mute::new())
    };
    let mut input = StdinInput::new();
    let mut display = MonoTermDisplay::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)?;

    let result = Emulator::new(machine, &mut display, &mut input, sound.as_mut(), config).main_loop();

    // give the terminal back before reporting anything
    drop(display);
    if let Err(e) = &result {
        eprintln!("chip8vm: {}", e);
    }
    result?;
    Ok(())
}
