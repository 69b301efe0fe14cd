use std::io;

use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

/// Display width in pixels.
pub const WIDTH: usize = 64;
/// Display height in pixels.
pub const HEIGHT: usize = 32;

const FRAME_BYTES: usize = WIDTH * HEIGHT / 8;

/// The 64×32 monochrome display buffer, bit-packed row-major with the
/// most significant bit of each byte leftmost.
///
/// Only the clear-screen and draw-sprite instructions mutate it; the
/// host reads it out through [`Framebuffer::as_bytes`] or a [`Display`].
pub struct Framebuffer {
    bits: [u8; FRAME_BYTES],
}

impl Framebuffer {
    pub fn new() -> Self {
        Framebuffer {
            bits: [0; FRAME_BYTES],
        }
    }

    pub fn clear(&mut self) {
        self.bits = [0; FRAME_BYTES];
    }

    fn mask(x: usize, y: usize) -> (usize, u8) {
        let px = y * WIDTH + x;
        (px / 8, 0x80 >> (px % 8))
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        let (byte, mask) = Self::mask(x, y);
        self.bits[byte] & mask != 0
    }

    /// XOR one pixel on. Returns true when a lit pixel went dark, which
    /// is what the draw instruction accumulates into VF.
    pub fn flip(&mut self, x: usize, y: usize) -> bool {
        let (byte, mask) = Self::mask(x, y);
        self.bits[byte] ^= mask;
        self.bits[byte] & mask == 0
    }

    /// The whole buffer, row-major, one bit per pixel.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Framebuffer::new()
    }
}

/// Display is used by the host to put the framebuffer on a real screen.
/// It should abstract the implementation details, so a variety of kinds
/// of screen would work.
pub trait Display {
    /// render one bit-packed frame
    fn draw(&mut self, data: &[u8]) -> Result<(), io::Error>;

    /// how big the frame data should be
    fn frame_size_bytes(&self) -> usize;
}

/// expand one bitplane of a packed frame into canvas coordinates
fn plane_points(data: &[u8], plane: u8) -> impl std::iter::Iterator<Item = (f64, f64)> + '_ {
    let mut count = WIDTH * HEIGHT;
    std::iter::from_fn(move || {
        while count > 0 {
            count -= 1;
            let bit = 1 & (data[count / 8] >> (7 - count % 8));
            if bit == plane {
                return Some((
                    (count % WIDTH) as f64,        // x
                    -1.0 * (count / WIDTH) as f64, // y
                ));
            }
        }
        None
    })
}

/// monochrome display in a terminal, rendered using TUI over crossterm
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl MonoTermDisplay {
    pub fn new() -> Result<MonoTermDisplay, io::Error> {
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        Ok(MonoTermDisplay { terminal })
    }
}

impl Display for MonoTermDisplay {
    fn draw(&mut self, data: &[u8]) -> Result<(), io::Error> {
        // make sure we're given exactly the right amount of data to draw
        assert_eq!(
            data.len(),
            FRAME_BYTES,
            "MonoTermDisplay must have correct-sized data to draw"
        );

        // 1:1 ratio between terminal cells and pixels, plus the border
        let size = Rect::new(0, 0, 2 + WIDTH as u16, 2 + HEIGHT as u16);

        self.terminal.draw(|f| {
            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title("COSMAC8")
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds([0.0, (WIDTH - 1) as f64])
                .y_bounds([-1.0 * (HEIGHT - 1) as f64, 0.0])
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &plane_points(data, 0).collect::<Vec<_>>(),
                        color: Color::Black,
                    });
                    ctx.draw(&Points {
                        coords: &plane_points(data, 1).collect::<Vec<_>>(),
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }

    fn frame_size_bytes(&self) -> usize {
        FRAME_BYTES
    }
}

/// useful for testing non-display routines
pub struct DummyDisplay;

impl DummyDisplay {
    pub fn new() -> Self {
        DummyDisplay {}
    }
}

impl Display for DummyDisplay {
    fn draw(&mut self, data: &[u8]) -> Result<(), io::Error> {
        assert_eq!(data.len(), FRAME_BYTES);
        Ok(())
    }

    fn frame_size_bytes(&self) -> usize {
        FRAME_BYTES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_framebuffer_is_dark() {
        let fb = Framebuffer::new();
        assert_eq!(fb.as_bytes(), &[0u8; FRAME_BYTES]);
    }

    #[test]
    fn test_bit_packing_is_row_major_msb_first() {
        let mut fb = Framebuffer::new();
        fb.flip(0, 0);
        assert_eq!(fb.as_bytes()[0], 0x80);
        fb.flip(63, 0);
        assert_eq!(fb.as_bytes()[7], 0x01);
        fb.flip(0, 1);
        assert_eq!(fb.as_bytes()[8], 0x80);
    }

    #[test]
    fn test_flip_reports_on_to_off() {
        let mut fb = Framebuffer::new();
        assert!(!fb.flip(10, 10)); // off -> on
        assert!(fb.pixel(10, 10));
        assert!(fb.flip(10, 10)); // on -> off, the collision case
        assert!(!fb.pixel(10, 10));
    }

    #[test]
    fn test_clear() {
        let mut fb = Framebuffer::new();
        fb.flip(3, 4);
        fb.clear();
        assert_eq!(fb.as_bytes(), &[0u8; FRAME_BYTES]);
    }

    #[test]
    fn test_plane_points_splits_frame() {
        let mut fb = Framebuffer::new();
        fb.flip(5, 7);
        let lit: Vec<_> = plane_points(fb.as_bytes(), 1).collect();
        assert_eq!(lit, vec![(5.0, -7.0)]);
        assert_eq!(
            plane_points(fb.as_bytes(), 0).count(),
            WIDTH * HEIGHT - 1
        );
    }

    #[test]
    fn test_dummy_display_accepts_frame() {
        let mut d = DummyDisplay::new();
        assert_eq!(d.frame_size_bytes(), 256);
        let fb = Framebuffer::new();
        d.draw(fb.as_bytes()).unwrap();
    }
}
