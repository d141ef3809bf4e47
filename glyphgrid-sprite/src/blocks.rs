//! Block elements U+2580..U+259F: eighth blocks, shades, and quadrants.

use crate::{canvas::Canvas, face::SpriteMetrics};

const SHADE_LIGHT: u8 = 0x40;
const SHADE_MEDIUM: u8 = 0x80;
const SHADE_DARK: u8 = 0xC0;

/// Draws a block element. Returns false for codepoints outside the range.
pub(crate) fn draw(canvas: &mut Canvas, cp: u32, m: &SpriteMetrics) -> bool {
    let w = m.cell_width as i32;
    let h = m.cell_height as i32;

    match cp {
        // upper half
        0x2580 => canvas.fill_rect(0, 0, w, h / 2, 255),
        // lower eighths, one to seven
        0x2581..=0x2587 => {
            let eighths = (cp - 0x2580) as i32;
            let top = h - h * eighths / 8;
            canvas.fill_rect(0, top, w, h - top, 255);
        },
        0x2588 => canvas.fill_rect(0, 0, w, h, 255),
        // left blocks, seven eighths down to one
        0x2589..=0x258F => {
            let eighths = 8 - (cp - 0x2588) as i32;
            canvas.fill_rect(0, 0, w * eighths / 8, h, 255);
        },
        // right half
        0x2590 => canvas.fill_rect(w / 2, 0, w - w / 2, h, 255),
        0x2591 => canvas.fill_rect(0, 0, w, h, SHADE_LIGHT),
        0x2592 => canvas.fill_rect(0, 0, w, h, SHADE_MEDIUM),
        0x2593 => canvas.fill_rect(0, 0, w, h, SHADE_DARK),
        // upper eighth
        0x2594 => canvas.fill_rect(0, 0, w, h / 8, 255),
        // right eighth
        0x2595 => canvas.fill_rect(w - w / 8, 0, w / 8, h, 255),
        0x2596..=0x259F => {
            let quadrants = match cp {
                0x2596 => [false, false, true, false],
                0x2597 => [false, false, false, true],
                0x2598 => [true, false, false, false],
                0x2599 => [true, false, true, true],
                0x259A => [true, false, false, true],
                0x259B => [true, true, true, false],
                0x259C => [true, true, false, true],
                0x259D => [false, true, false, false],
                0x259E => [false, true, true, false],
                _ => [false, true, true, true],
            };
            // [upper-left, upper-right, lower-left, lower-right]
            let (cx, cy) = (w / 2, h / 2);
            if quadrants[0] {
                canvas.fill_rect(0, 0, cx, cy, 255);
            }
            if quadrants[1] {
                canvas.fill_rect(cx, 0, w - cx, cy, 255);
            }
            if quadrants[2] {
                canvas.fill_rect(0, cy, cx, h - cy, 255);
            }
            if quadrants[3] {
                canvas.fill_rect(cx, cy, w - cx, h - cy, 255);
            }
        },
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> SpriteMetrics {
        SpriteMetrics {
            cell_width: 16,
            cell_height: 32,
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

    fn alpha(canvas: &Canvas, x: u32, y: u32) -> u8 {
        canvas.data()[(y * canvas.width() + x) as usize]
    }

    #[test]
    fn full_block_is_solid() {
        let canvas = render(0x2588);
        assert!(canvas.data().iter().all(|&a| a == 255));
    }

    #[test]
    fn lower_half_covers_bottom_only() {
        let canvas = render(0x2584);
        assert_eq!(alpha(&canvas, 8, 15), 0);
        assert_eq!(alpha(&canvas, 8, 16), 255);
        assert_eq!(alpha(&canvas, 8, 31), 255);
    }

    #[test]
    fn lower_eighth_is_one_eighth_tall() {
        let canvas = render(0x2581);
        let filled = canvas.data().iter().filter(|&&a| a > 0).count();
        assert_eq!(filled, 16 * 4);
        assert_eq!(alpha(&canvas, 0, 28), 255);
    }

    #[test]
    fn left_blocks_shrink_monotonically() {
        let mut last = usize::MAX;
        for cp in 0x2589..=0x258F {
            let filled = render(cp).data().iter().filter(|&&a| a > 0).count();
            assert!(filled < last, "U+{cp:04X} did not shrink");
            last = filled;
        }
    }

    #[test]
    fn shades_step_up_in_alpha() {
        assert_eq!(alpha(&render(0x2591), 3, 3), SHADE_LIGHT);
        assert_eq!(alpha(&render(0x2592), 3, 3), SHADE_MEDIUM);
        assert_eq!(alpha(&render(0x2593), 3, 3), SHADE_DARK);
    }

    #[test]
    fn quadrant_complements_tile_the_cell() {
        // ▚ and ▞ together cover every pixel exactly once
        let a = render(0x259A);
        let b = render(0x259E);
        for (pa, pb) in a.data().iter().zip(b.data()) {
            assert_eq!(pa.max(pb), &255);
            assert_eq!(pa.min(pb), &0);
        }
    }
}
