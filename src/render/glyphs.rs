//! Minimal 3x5 bitmap glyphs for the track indicator and loading badge.

use crate::foundation::core::{Point, Rect, Size};

const COLS: u32 = 3;
const ROWS: u32 = 5;
/// Gap between glyphs, in glyph cells.
const SPACING: u32 = 1;

fn glyph(c: char) -> Option<[u8; ROWS as usize]> {
    let rows = match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'a' => [0b000, 0b011, 0b101, 0b101, 0b011],
        'd' => [0b001, 0b011, 0b101, 0b101, 0b011],
        'g' => [0b011, 0b101, 0b011, 0b001, 0b110],
        'i' => [0b010, 0b000, 0b010, 0b010, 0b010],
        'n' => [0b000, 0b110, 0b101, 0b101, 0b101],
        'o' => [0b000, 0b010, 0b101, 0b101, 0b010],
        ' ' => [0; ROWS as usize],
        _ => return None,
    };
    Some(rows)
}

/// Size of `text` rendered with cells of `cell` pixels.
pub fn text_size(text: &str, cell: f64) -> Size {
    let n = text.chars().filter(|c| glyph(*c).is_some()).count() as u32;
    if n == 0 {
        return Size::ZERO;
    }
    let cols = n * COLS + (n - 1) * SPACING;
    Size::new(f64::from(cols) * cell, f64::from(ROWS) * cell)
}

/// Filled cells of `text` with its top-left corner at `origin`.
///
/// Characters without a glyph are skipped.
pub fn text_cells(text: &str, origin: Point, cell: f64) -> Vec<Rect> {
    let mut out = Vec::new();
    let mut col0 = 0u32;
    for rows in text.chars().filter_map(glyph) {
        for (row, bits) in (0u32..).zip(rows) {
            for col in 0..COLS {
                if bits & (1 << (COLS - 1 - col)) == 0 {
                    continue;
                }
                let x = origin.x + f64::from(col0 + col) * cell;
                let y = origin.y + f64::from(row) * cell;
                out.push(Rect::new(x, y, x + cell, y + cell));
            }
        }
        col0 += COLS + SPACING;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/glyphs.rs"]
mod tests;
