//! Sextant blocks U+1FB00..U+1FB3B: a 2x3 grid of filled cells.
//!
//! The block omits the empty pattern (a space) and the two patterns that
//! duplicate the left/right half blocks in U+2580..U+259F, so the codepoint
//! to bitmask mapping skips mask values 0, 21, and 42.

use crate::{canvas::Canvas, face::SpriteMetrics};

pub(crate) fn draw(canvas: &mut Canvas, cp: u32, m: &SpriteMetrics) -> bool {
    if !(0x1FB00..=0x1FB3B).contains(&cp) {
        return false;
    }

    let mut mask = cp - 0x1FB00 + 1;
    if mask >= 21 {
        mask += 1;
    }
    if mask >= 42 {
        mask += 1;
    }

    let w = m.cell_width as i32;
    let h = m.cell_height as i32;
    // Row boundaries chosen so the three bands tile the cell exactly.
    let rows = [0, h / 3, h * 2 / 3, h];
    let cols = [0, w / 2, w];

    for bit in 0..6 {
        if mask & (1 << bit) == 0 {
            continue;
        }
        let col = (bit % 2) as usize;
        let row = (bit / 2) as usize;
        canvas.fill_rect(
            cols[col],
            rows[row],
            cols[col + 1] - cols[col],
            rows[row + 1] - rows[row],
            255,
        );
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> SpriteMetrics {
        SpriteMetrics {
            cell_width: 16,
            cell_height: 33,
            line_thickness: 2,
            heavy_thickness: None,
            underline_position: 28,
            underline_thickness: 2,
        }
    }

    fn render(cp: u32) -> Canvas {
        let m = metrics();
        let mut canvas = Canvas::new(m.cell_width, m.cell_height);
        assert!(draw(&mut canvas, cp, &m));
        canvas
    }

    #[test]
    fn first_codepoint_fills_upper_left_cell_only() {
        let canvas = render(0x1FB00);
        let w = canvas.width();
        assert_eq!(canvas.data()[0], 255);
        assert_eq!(canvas.data()[7], 255);
        // upper-right cell clear
        assert_eq!(canvas.data()[8], 0);
        // middle band clear
        assert_eq!(canvas.data()[(12 * w) as usize], 0);
    }

    #[test]
    fn half_block_masks_are_skipped() {
        // masks 21 (left half) and 42 (right half) never appear; the cell
        // column pattern of every sextant must differ from a plain half block
        for cp in 0x1FB00..=0x1FB3B {
            let mut mask = cp - 0x1FB00 + 1;
            if mask >= 21 {
                mask += 1;
            }
            if mask >= 42 {
                mask += 1;
            }
            assert_ne!(mask, 21, "U+{cp:04X}");
            assert_ne!(mask, 42, "U+{cp:04X}");
            assert!(mask > 0 && mask < 63, "U+{cp:04X} mask {mask}");
        }
    }

    #[test]
    fn last_codepoint_fills_everything_but_upper_left() {
        // U+1FB3B maps to mask 62: all cells except the first
        let canvas = render(0x1FB3B);
        assert_eq!(canvas.data()[0], 0);
        let filled = canvas.data().iter().filter(|&&a| a > 0).count();
        let total = (canvas.width() * canvas.height()) as usize;
        // five of six cells, with integer band rounding
        assert!(filled > total * 4 / 6);
        assert!(filled < total);
    }

    #[test]
    fn full_coverage_over_distinct_codepoints() {
        // every codepoint draws something, and no two draw the same pattern
        let mut seen = std::collections::HashSet::new();
        for cp in 0x1FB00..=0x1FB3B {
            let canvas = render(cp);
            assert!(canvas.data().iter().any(|&a| a > 0), "U+{cp:04X}");
            assert!(seen.insert(canvas.data().to_vec()), "U+{cp:04X} duplicate");
        }
    }
}
