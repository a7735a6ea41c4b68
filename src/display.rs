use crate::debugger::DebugPanel;
use crate::error::Result;
use crossterm::{
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders, Paragraph};
use tui::Terminal;

/// Display is used by the frame driver to put the framebuffer on a screen.
/// It should abstract the implementation details, so a variety of kinds of
/// screen would work.
pub trait Display {
    /// draw row-major pixels at the internal resolution of the display
    fn draw(&mut self, pixels: &[bool]) -> Result<()>;

    /// put the debugger's text beside the picture
    fn show_debug(&mut self, panel: &DebugPanel) -> Result<()>;

    /// how many pixels the display expects
    fn get_display_size_pixels(&self) -> usize;
}

// store useful metadata about the screen
struct Resolution(usize, usize);

impl Resolution {
    fn pixel_count(&self) -> usize {
        self.0 * self.1
    }

    fn x_bounds(&self) -> [f64; 2] {
        [0.0, (self.0 - 1) as f64]
    }

    fn y_bounds(&self) -> [f64; 2] {
        [-1.0 * (self.1 - 1) as f64, 0.0]
    }

    /// canvas coordinates of every pixel in the given state; y grows
    /// downward on the chip-8 but upward on the canvas
    fn points_from_pixels<'a>(
        &self,
        pixels: &'a [bool],
        lit: bool,
    ) -> impl std::iter::Iterator<Item = (f64, f64)> + 'a {
        let w = self.0;
        pixels
            .iter()
            .enumerate()
            .filter(move |&(_, &p)| p == lit)
            .map(move |(n, _)| ((n % w) as f64, -1.0 * (n / w) as f64))
    }
}

/// monochrome display in a terminal, rendered using TUI and crossterm
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    resolution: Resolution,
    // both are redrawn together, so keep the last of each
    pixels: Vec<bool>,
    panel: Option<DebugPanel>,
}

impl MonoTermDisplay {
    /// takes over the terminal until dropped
    pub fn new(x: usize, y: usize) -> Result<MonoTermDisplay> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.hide_cursor()?;
        Ok(MonoTermDisplay {
            terminal,
            resolution: Resolution(x, y),
            pixels: vec![false; x * y],
            panel: None,
        })
    }

    fn render(&mut self) -> Result<()> {
        let lit: Vec<(f64, f64)> = self.resolution.points_from_pixels(&self.pixels, true).collect();
        let unlit: Vec<(f64, f64)> = self.resolution.points_from_pixels(&self.pixels, false).collect();
        let x_bounds = self.resolution.x_bounds();
        let y_bounds = self.resolution.y_bounds();
        let (w, h) = (self.resolution.0 as u16, self.resolution.1 as u16);
        let panel = self.panel.as_ref();

        // for now this assumes a 1:1 ratio between terminal cells, chip-8
        // pixels and the internal TUI canvas
        self.terminal.draw(|f| {
            let area = f.size();
            let screen = Rect::new(0, 0, 2 + w, 2 + h).intersection(area);

            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title("CHIP-8")
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(x_bounds)
                .y_bounds(y_bounds)
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &unlit,
                        color: Color::Black,
                    });
                    ctx.draw(&Points {
                        coords: &lit,
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, screen);

            if let Some(panel) = panel {
                let side = Rect::new(2 + w, 0, 2 + DEBUG_PANEL_WIDTH, 2 + h).intersection(area);
                let text = Paragraph::new(panel.lines.join("\n"))
                    .block(Block::default().title(panel.title.as_str()).borders(Borders::ALL));
                f.render_widget(text, side);
            }
        })?;
        Ok(())
    }
}

/// widest debugger line is the memory dump: address plus 16 bytes
const DEBUG_PANEL_WIDTH: u16 = 54;

impl Drop for MonoTermDisplay {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

impl Display for MonoTermDisplay {
    fn draw(&mut self, pixels: &[bool]) -> Result<()> {
        // make sure we're given exactly the right amount of data to draw
        assert_eq!(
            pixels.len(),
            self.resolution.pixel_count(),
            "MonoTermDisplay must have correct-sized data to draw"
        );
        self.pixels.copy_from_slice(pixels);
        self.render()
    }

    fn show_debug(&mut self, panel: &DebugPanel) -> Result<()> {
        if self.panel.as_ref() == Some(panel) {
            return Ok(());
        }
        self.panel = Some(panel.clone());
        self.render()
    }

    fn get_display_size_pixels(&self) -> usize {
        self.resolution.pixel_count()
    }
}

/// useful for testing non-display routines; remembers the last frame drawn
pub struct DummyDisplay {
    resolution: Resolution,
    pub frames_drawn: usize,
    pub last_frame: Vec<bool>,
    pub last_panel: Option<DebugPanel>,
}

impl DummyDisplay {
    pub fn new(x: usize, y: usize) -> DummyDisplay {
        DummyDisplay {
            resolution: Resolution(x, y),
            frames_drawn: 0,
            last_frame: Vec::new(),
            last_panel: None,
        }
    }
}

impl Display for DummyDisplay {
    fn draw(&mut self, pixels: &[bool]) -> Result<()> {
        assert_eq!(pixels.len(), self.resolution.pixel_count());
        self.frames_drawn += 1;
        self.last_frame = pixels.to_vec();
        Ok(())
    }

    fn show_debug(&mut self, panel: &DebugPanel) -> Result<()> {
        self.last_panel = Some(panel.clone());
        Ok(())
    }

    fn get_display_size_pixels(&self) -> usize {
        self.resolution.pixel_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Resolution tests
    #[test]
    fn test_pixel_count() {
        let r = Resolution(64, 32);
        assert_eq!(r.pixel_count(), 2048)
    }

    #[test]
    fn test_x_bounds() {
        let r = Resolution(64, 32);
        assert_eq!(r.x_bounds(), [0.0, 63.0]);
    }

    #[test]
    fn test_y_bounds() {
        let r = Resolution(64, 32);
        assert_eq!(r.y_bounds(), [-31.0, 0.0]);
    }

    #[test]
    fn test_points_from_pixels() {
        let r = Resolution(64, 32);
        let mut px = vec![false; 2048];
        px[0] = true;
        px[64 + 3] = true;
        let lit: Vec<_> = r.points_from_pixels(&px, true).collect();
        assert_eq!(lit, vec![(0.0, 0.0), (3.0, -1.0)]);
        assert_eq!(r.points_from_pixels(&px, false).count(), 2046);
    }

    // DummyDisplay tests
    #[test]
    fn test_dummy_records_frames() -> Result<()> {
        let mut d = DummyDisplay::new(64, 32);
        assert_eq!(d.get_display_size_pixels(), 2048);
        d.draw(&[true; 2048])?;
        assert_eq!(d.frames_drawn, 1);
        assert!(d.last_frame.iter().all(|&p| p));
        Ok(())
    }

    #[test]
    #[should_panic]
    fn test_draw_rejects_wrong_data() {
        let mut d = DummyDisplay::new(64, 32);
        let _ = d.draw(&[false; 2049]);
    }
}
