//! # emulator
//!
//! The frame driver. Each 60Hz frame it:
//!
//!  1. drains input events into the keypad (and the pause/step controls)
//!  2. runs `cpu_hz / 60` instructions
//!  3. ticks the timers once
//!  4. redraws the screen if the framebuffer changed, then acknowledges it
//!  5. starts or stops the tone to follow the sound timer
//!  6. with `debug` on, refreshes the debugger panel
//!
//! Keys are delivered between instructions, never during one.
use crate::config::{Config, TIMER_HZ};
use crate::cpu::Chip8;
use crate::debugger::Debugger;
use crate::display::Display;
use crate::error::{Chip8Error, Result};
use crate::input::{Input, InputEvent, KeyLatch};
use crate::sound::{Sound, ToneGate};
use log::{debug, error, info};
use spin_sleep::LoopHelper;
use std::io;

/// how instructions are being issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecMode {
    Running,
    Paused,
    /// run exactly one instruction, then pause
    StepOnce,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Quit,
}

pub struct Emulator<'a> {
    machine: Chip8,
    display: &'a mut dyn Display,
    input: &'a mut dyn Input,
    sound: &'a mut dyn Sound,
    config: Config,
    mode: ExecMode,
    keys: KeyLatch,
    tone: ToneGate,
    debugger: Debugger,
    frames: u64,
}

impl<'a> Emulator<'a> {
    pub fn new(
        machine: Chip8,
        display: &'a mut dyn Display,
        input: &'a mut dyn Input,
        sound: &'a mut dyn Sound,
        config: Config,
    ) -> Self {
        let keys = KeyLatch::new(config.key_hold_frames);
        Emulator {
            machine,
            display,
            input,
            sound,
            config,
            mode: ExecMode::Running,
            keys,
            tone: ToneGate::default(),
            debugger: Debugger::new(),
            frames: 0,
        }
    }

    /// load a chip8 program
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize> {
        self.machine.load_program(reader)
    }

    pub fn machine(&self) -> &Chip8 {
        &self.machine
    }

    pub fn mode(&self) -> ExecMode {
        self.mode
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn debugger(&self) -> &Debugger {
        &self.debugger
    }

    /// one 60Hz frame
    pub fn run_frame(&mut self) -> Result<FrameOutcome> {
        for event in self.input.poll()? {
            match event {
                InputEvent::Quit => return Ok(FrameOutcome::Quit),
                InputEvent::Key(key) => self.keys.press(key, self.machine.keypad_mut()),
                InputEvent::TogglePause if self.config.debug => {
                    self.mode = match self.mode {
                        ExecMode::Running => ExecMode::Paused,
                        _ => ExecMode::Running,
                    };
                    debug!("execution mode now {:?}", self.mode);
                }
                InputEvent::StepOnce if self.config.debug && self.mode == ExecMode::Paused => {
                    self.mode = ExecMode::StepOnce;
                }
                InputEvent::DebugView if self.config.debug => self.debugger.toggle_view(),
                InputEvent::PreviousPage if self.config.debug => self.debugger.previous_page(),
                InputEvent::NextPage if self.config.debug => self.debugger.next_page(),
                InputEvent::TogglePause
                | InputEvent::StepOnce
                | InputEvent::DebugView
                | InputEvent::PreviousPage
                | InputEvent::NextPage => {}
            }
        }

        for _ in 0..self.config.instructions_per_frame() {
            match self.mode {
                ExecMode::Paused => break,
                ExecMode::StepOnce => {
                    self.step()?;
                    self.mode = ExecMode::Paused;
                    break;
                }
                ExecMode::Running => self.step()?,
            }
        }

        // timers keep running while paused, as they would on the hardware
        self.machine.tick_timers();

        if self.machine.display().is_redraw_needed() {
            self.display.draw(self.machine.display().pixels())?;
            self.machine.acknowledge_frame();
        }
        if self.config.debug {
            self.display.show_debug(&self.debugger.panel(&self.machine))?;
        }

        self.tone.update(self.machine.is_sound_on(), &mut *self.sound)?;
        self.keys.end_frame(self.machine.keypad_mut());
        self.frames += 1;
        Ok(FrameOutcome::Continue)
    }

    fn step(&mut self) -> Result<()> {
        self.machine.step().map_err(|e| {
            if e.is_program_fault() {
                error!("program fault, halting at {:#05x}: {}", self.machine.pc(), e);
            } else {
                error!("halting at {:#05x}: {}", self.machine.pc(), e);
            }
            e
        })
    }

    /// run frames at 60Hz until told to quit, the frame limit is reached or
    /// something fails
    pub fn main_loop(&mut self) -> Result<()> {
        let expected = self.machine.display().pixels().len();
        let actual = self.display.get_display_size_pixels();
        if actual != expected {
            return Err(Chip8Error::DisplaySize { expected, actual });
        }
        info!(
            "running at {}Hz, {} instructions per frame",
            self.config.cpu_hz,
            self.config.instructions_per_frame()
        );
        let mut pacer = LoopHelper::builder()
            .report_interval_s(5.0)
            .build_with_target_rate(TIMER_HZ as f64);

        loop {
            if let Some(max) = self.config.max_frames {
                if self.frames >= max {
                    info!("reached {} frames, stopping", max);
                    break;
                }
            }
            pacer.loop_start();
            if self.run_frame()? == FrameOutcome::Quit {
                info!("quit after {} frames", self.frames);
                break;
            }
            if let Some(fps) = pacer.report_rate() {
                debug!("{:.1} frames per second", fps);
            }
            pacer.loop_sleep();
        }
        // leave the speaker quiet
        self.tone.update(false, &mut *self.sound)
    }
}
