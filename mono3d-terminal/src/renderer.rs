/// Braille-cell presenter for 1-bit bitmaps
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;

use crate::bitmap::Bitmap;

/// Pixels covered by one terminal cell
pub const CELL_WIDTH: usize = 2;
pub const CELL_HEIGHT: usize = 4;

const BRAILLE_BASE: u32 = 0x2800;

/// Dot bit for each (column, row) inside a braille cell
const DOT_BITS: [[u8; CELL_HEIGHT]; CELL_WIDTH] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];

/// Draws a bitmap as Unicode braille, one dot per light pixel
pub struct BrailleRenderer {
    color: Color,
}

impl BrailleRenderer {
    pub fn new() -> Self {
        Self { color: Color::White }
    }

    pub fn with_color(color: Color) -> Self {
        Self { color }
    }

    /// Bitmap size that fills a terminal area of `cols x rows` cells
    pub fn bitmap_size(cols: u16, rows: u16) -> (usize, usize) {
        (cols as usize * CELL_WIDTH, rows as usize * CELL_HEIGHT)
    }

    /// The braille character for the cell whose top-left pixel is (x, y)
    pub fn cell(bitmap: &Bitmap, x: usize, y: usize) -> char {
        let mut bits = 0u8;
        for (dx, column) in DOT_BITS.iter().enumerate() {
            for (dy, bit) in column.iter().enumerate() {
                if bitmap.get(x + dx, y + dy) {
                    bits |= bit;
                }
            }
        }
        char::from_u32(BRAILLE_BASE + bits as u32).unwrap_or(' ')
    }

    /// One line of braille per cell row
    pub fn lines(bitmap: &Bitmap) -> Vec<String> {
        (0..bitmap.height().div_ceil(CELL_HEIGHT))
            .map(|row| {
                (0..bitmap.width().div_ceil(CELL_WIDTH))
                    .map(|col| Self::cell(bitmap, col * CELL_WIDTH, row * CELL_HEIGHT))
                    .collect()
            })
            .collect()
    }

    pub fn render_to_string(bitmap: &Bitmap) -> String {
        let mut out = Self::lines(bitmap).join("\n");
        out.push('\n');
        out
    }

    /// Queue the bitmap at the cursor, one cell row per terminal line
    pub fn draw<W: Write>(&self, bitmap: &Bitmap, writer: &mut W) -> std::io::Result<()> {
        writer.queue(SetForegroundColor(self.color))?;
        for line in Self::lines(bitmap) {
            writer.queue(Print(line))?;
            writer.queue(Print("\r\n"))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Default for BrailleRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cell_is_blank_braille() {
        let bitmap = Bitmap::new(2, 4);
        assert_eq!(BrailleRenderer::cell(&bitmap, 0, 0), '\u{2800}');
    }

    #[test]
    fn test_full_cell() {
        let mut bitmap = Bitmap::new(2, 4);
        bitmap.clear(true);
        assert_eq!(BrailleRenderer::cell(&bitmap, 0, 0), '\u{28ff}');
    }

    #[test]
    fn test_dot_positions() {
        let mut bitmap = Bitmap::new(2, 4);
        bitmap.set(0, 0, true);
        assert_eq!(BrailleRenderer::cell(&bitmap, 0, 0), '\u{2801}');

        let mut bitmap = Bitmap::new(2, 4);
        bitmap.set(1, 3, true);
        assert_eq!(BrailleRenderer::cell(&bitmap, 0, 0), '\u{2880}');
    }

    #[test]
    fn test_lines_cover_partial_cells() {
        let bitmap = Bitmap::new(5, 5);
        let lines = BrailleRenderer::lines(&bitmap);
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.chars().count() == 3));
    }

    #[test]
    fn test_draw_queues_every_line() {
        let bitmap = Bitmap::new(4, 8);
        let mut out = Vec::new();
        BrailleRenderer::new().draw(&bitmap, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("\r\n").count(), 2);
    }
}
