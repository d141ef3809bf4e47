//! Braille patterns U+2800..U+28FF.
//!
//! The low byte of the codepoint is the dot bitmap. Dots 1-3 and 7 run down
//! the left column, dots 4-6 and 8 down the right, per the Unicode block's
//! dot numbering.

use crate::{
    canvas::{Canvas, Point},
    face::SpriteMetrics,
};

/// (column, row) for each of the eight dot bits.
const DOT_GRID: [(u32, u32); 8] = [
    (0, 0), // dot 1
    (0, 1), // dot 2
    (0, 2), // dot 3
    (1, 0), // dot 4
    (1, 1), // dot 5
    (1, 2), // dot 6
    (0, 3), // dot 7
    (1, 3), // dot 8
];

pub(crate) fn draw(canvas: &mut Canvas, cp: u32, m: &SpriteMetrics) -> bool {
    if !(0x2800..=0x28FF).contains(&cp) {
        return false;
    }
    let dots = (cp - 0x2800) as u8;

    let w = m.cell_width as f32;
    let h = m.cell_height as f32;
    let diameter = (w / 4.0).min(h / 8.0).max(1.0);

    for (bit, &(col, row)) in DOT_GRID.iter().enumerate() {
        if dots & (1 << bit) == 0 {
            continue;
        }
        let cx = w * (1.0 + 2.0 * col as f32) / 4.0;
        let cy = h * (1.0 + 2.0 * row as f32) / 8.0;
        let center = Point::new(cx, cy);
        canvas.line(center, center, diameter, 255);
    }
    true
}
