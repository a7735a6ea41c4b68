pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// 64x32 monochrome screen, row-major, plus the dirty flag the renderer
/// consumes. Only the cpu toggles pixels; only the renderer clears the flag.
pub struct Framebuffer {
    pixels: [bool; DISPLAY_WIDTH * DISPLAY_HEIGHT],
    redraw_needed: bool,
}

impl Framebuffer {
    pub fn new() -> Self {
        Framebuffer {
            pixels: [false; DISPLAY_WIDTH * DISPLAY_HEIGHT],
            redraw_needed: false,
        }
    }

    /// turn every pixel off
    pub fn clear(&mut self) {
        self.pixels.fill(false);
        self.redraw_needed = true;
    }

    /// XOR-toggle one pixel on, returning whether it was already lit.
    /// Coordinates off the screen are clipped and report no collision.
    pub fn toggle(&mut self, x: usize, y: usize) -> bool {
        if x >= DISPLAY_WIDTH || y >= DISPLAY_HEIGHT {
            return false;
        }
        let px = &mut self.pixels[y * DISPLAY_WIDTH + x];
        let was_on = *px;
        *px = !was_on;
        was_on
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < DISPLAY_WIDTH && y < DISPLAY_HEIGHT && self.pixels[y * DISPLAY_WIDTH + x]
    }

    pub fn pixels(&self) -> &[bool] {
        &self.pixels
    }

    pub fn is_redraw_needed(&self) -> bool {
        self.redraw_needed
    }

    pub(crate) fn mark_redraw_needed(&mut self) {
        self.redraw_needed = true;
    }

    /// called by the renderer once it has put the current frame on screen
    pub fn acknowledge(&mut self) {
        self.redraw_needed = false;
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}
