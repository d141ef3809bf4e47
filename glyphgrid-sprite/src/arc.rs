//! Light arc glyphs U+256D..U+2570.
//!
//! Each arc is a quarter ellipse joining two edge midpoints, stroked at 4x
//! supersampling and box-averaged down to hide the polyline approximation.

use crate::{
    canvas::{Canvas, Point},
    face::SpriteMetrics,
};

const SUPERSAMPLE: u32 = 4;
const SEGMENTS: u32 = 64;

pub(crate) fn draw(canvas: &mut Canvas, cp: u32, m: &SpriteMetrics) -> bool {
    // Ellipse center in cell-relative coordinates: the corner the arc
    // bends around.
    let (cx, cy) = match cp {
        0x256D => (1.0, 1.0), // arc down and right
        0x256E => (0.0, 1.0), // arc down and left
        0x256F => (0.0, 0.0), // arc up and left
        0x2570 => (1.0, 0.0), // arc up and right
        _ => return false,
    };

    let w = (m.cell_width * SUPERSAMPLE) as f32;
    let h = (m.cell_height * SUPERSAMPLE) as f32;
    let thickness = (m.line_thickness * SUPERSAMPLE) as f32;
    let mut big = Canvas::new(m.cell_width * SUPERSAMPLE, m.cell_height * SUPERSAMPLE);

    let center = Point::new(cx * w, cy * h);
    let rx = w / 2.0;
    let ry = h / 2.0;

    // Quarter ellipse from the vertical edge midpoint to the horizontal
    // edge midpoint, swept toward the cell center.
    let point_at = |t: f32| {
        let (sin, cos) = (t * std::f32::consts::FRAC_PI_2).sin_cos();
        Point::new(
            center.x + (1.0 - 2.0 * cx) * rx * cos,
            center.y + (1.0 - 2.0 * cy) * ry * sin,
        )
    };

    let mut prev = point_at(0.0);
    for i in 1..=SEGMENTS {
        let next = point_at(i as f32 / SEGMENTS as f32);
        big.line(prev, next, thickness, 255);
        prev = next;
    }

    let small = Canvas::downsample(&big, SUPERSAMPLE);
    for y in 0..small.height() {
        for x in 0..small.width() {
            let alpha = small.data()[(y * small.width() + x) as usize];
            if alpha > 0 {
                canvas.set(x as i32, y as i32, alpha);
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> SpriteMetrics {
        SpriteMetrics {
            cell_width: 18,
            cell_height: 36,
            line_thickness: 2,
            heavy_thickness: None,
            underline_position: 32,
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
    fn arc_down_right_touches_bottom_and_right_midpoints() {
        let canvas = render(0x256D);
        // endpoint at the bottom edge, near x = w/2
        assert!((7..=11).any(|x| alpha(&canvas, x, 35) > 0));
        // endpoint at the right edge, near y = h/2
        assert!((16..=19).any(|y| alpha(&canvas, 17, y) > 0));
        // the top-left corner stays empty
        assert_eq!(alpha(&canvas, 0, 0), 0);
        assert_eq!(alpha(&canvas, 17, 0), 0);
        assert_eq!(alpha(&canvas, 0, 35), 0);
    }

    #[test]
    fn arcs_are_mirror_images() {
        let dr = render(0x256D);
        let dl = render(0x256E);
        let w = dr.width();
        for y in 0..dr.height() {
            for x in 0..w {
                let mirrored = dl.data()[(y * w + (w - 1 - x)) as usize];
                let direct = dr.data()[(y * w + x) as usize];
                // antialiased edges may differ by a rounding step
                assert!(
                    direct.abs_diff(mirrored) <= 32,
                    "mismatch at ({x},{y}): {direct} vs {mirrored}"
                );
            }
        }
    }

    #[test]
    fn all_four_arcs_draw() {
        for cp in 0x256D..=0x2570 {
            assert!(render(cp).data().iter().any(|&a| a > 0), "U+{cp:04X}");
        }
    }
}
