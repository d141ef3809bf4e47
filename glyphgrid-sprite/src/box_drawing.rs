//! Box-drawing glyphs U+2500..U+257F: solid, dashed, and double lines,
//! junctions, corners, and half lines.
//!
//! Junction glyphs are composed of per-direction arms drawn from the cell
//! edge through the center, each with its own weight. Double-line glyphs
//! are explicit compositions so the channel between the two strokes stays
//! open at joints.

use crate::{
    canvas::{Canvas, Point},
    face::SpriteMetrics,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arm {
    None,
    Light,
    Heavy,
}

use Arm::{Heavy as H, Light as L, None as N};

/// Draws a single box-drawing codepoint. Returns false for codepoints
/// outside this module's range.
pub(crate) fn draw(canvas: &mut Canvas, cp: u32, m: &SpriteMetrics) -> bool {
    let arms = match cp {
        0x2500 => (N, N, L, L),
        0x2501 => (N, N, H, H),
        0x2502 => (L, L, N, N),
        0x2503 => (H, H, N, N),
        0x2504..=0x250B => return dashed(canvas, cp, m),
        0x250C => (N, L, N, L),
        0x250D => (N, L, N, H),
        0x250E => (N, H, N, L),
        0x250F => (N, H, N, H),
        0x2510 => (N, L, L, N),
        0x2511 => (N, L, H, N),
        0x2512 => (N, H, L, N),
        0x2513 => (N, H, H, N),
        0x2514 => (L, N, N, L),
        0x2515 => (L, N, N, H),
        0x2516 => (H, N, N, L),
        0x2517 => (H, N, N, H),
        0x2518 => (L, N, L, N),
        0x2519 => (L, N, H, N),
        0x251A => (H, N, L, N),
        0x251B => (H, N, H, N),
        0x251C => (L, L, N, L),
        0x251D => (L, L, N, H),
        0x251E => (H, L, N, L),
        0x251F => (L, H, N, L),
        0x2520 => (H, H, N, L),
        0x2521 => (H, L, N, H),
        0x2522 => (L, H, N, H),
        0x2523 => (H, H, N, H),
        0x2524 => (L, L, L, N),
        0x2525 => (L, L, H, N),
        0x2526 => (H, L, L, N),
        0x2527 => (L, H, L, N),
        0x2528 => (H, H, L, N),
        0x2529 => (H, L, H, N),
        0x252A => (L, H, H, N),
        0x252B => (H, H, H, N),
        0x252C => (N, L, L, L),
        0x252D => (N, L, H, L),
        0x252E => (N, L, L, H),
        0x252F => (N, L, H, H),
        0x2530 => (N, H, L, L),
        0x2531 => (N, H, H, L),
        0x2532 => (N, H, L, H),
        0x2533 => (N, H, H, H),
        0x2534 => (L, N, L, L),
        0x2535 => (L, N, H, L),
        0x2536 => (L, N, L, H),
        0x2537 => (L, N, H, H),
        0x2538 => (H, N, L, L),
        0x2539 => (H, N, H, L),
        0x253A => (H, N, L, H),
        0x253B => (H, N, H, H),
        0x253C => (L, L, L, L),
        0x253D => (L, L, H, L),
        0x253E => (L, L, L, H),
        0x253F => (L, L, H, H),
        0x2540 => (H, L, L, L),
        0x2541 => (L, H, L, L),
        0x2542 => (H, H, L, L),
        0x2543 => (H, L, H, L),
        0x2544 => (H, L, L, H),
        0x2545 => (L, H, H, L),
        0x2546 => (L, H, L, H),
        0x2547 => (H, L, H, H),
        0x2548 => (L, H, H, H),
        0x2549 => (H, H, H, L),
        0x254A => (H, H, L, H),
        0x254B => (H, H, H, H),
        0x254C..=0x254F => return dashed(canvas, cp, m),
        0x2550..=0x256C => return double(canvas, cp, m),
        0x2571 => {
            let (w, h) = (m.cell_width as f32, m.cell_height as f32);
            canvas.line(Point::new(w, 0.0), Point::new(0.0, h), m.line_thickness as f32, 255);
            return true;
        },
        0x2572 => {
            let (w, h) = (m.cell_width as f32, m.cell_height as f32);
            canvas.line(Point::new(0.0, 0.0), Point::new(w, h), m.line_thickness as f32, 255);
            return true;
        },
        0x2573 => {
            let (w, h) = (m.cell_width as f32, m.cell_height as f32);
            let t = m.line_thickness as f32;
            canvas.line(Point::new(w, 0.0), Point::new(0.0, h), t, 255);
            canvas.line(Point::new(0.0, 0.0), Point::new(w, h), t, 255);
            return true;
        },
        0x2574 => (N, N, L, N),
        0x2575 => (L, N, N, N),
        0x2576 => (N, N, N, L),
        0x2577 => (N, L, N, N),
        0x2578 => (N, N, H, N),
        0x2579 => (H, N, N, N),
        0x257A => (N, N, N, H),
        0x257B => (N, H, N, N),
        0x257C => (N, N, L, H),
        0x257D => (L, H, N, N),
        0x257E => (N, N, H, L),
        0x257F => (H, L, N, N),
        _ => return false,
    };

    let (up, down, left, right) = arms;
    draw_arms(canvas, m, up, down, left, right);
    true
}

/// Fills a horizontal stripe: top edge `y`, span `x0..x1`.
pub(crate) fn hline(canvas: &mut Canvas, y: i32, x0: i32, x1: i32, thickness: u32) {
    canvas.fill_rect(x0, y, x1 - x0, thickness as i32, 255);
}

/// Fills a vertical stripe: left edge `x`, span `y0..y1`.
pub(crate) fn vline(canvas: &mut Canvas, x: i32, y0: i32, y1: i32, thickness: u32) {
    canvas.fill_rect(x, y0, thickness as i32, y1 - y0, 255);
}

fn thickness_of(arm: Arm, m: &SpriteMetrics) -> u32 {
    match arm {
        Arm::None => 0,
        Arm::Light => m.line_thickness,
        Arm::Heavy => m.heavy(),
    }
}

fn draw_arms(canvas: &mut Canvas, m: &SpriteMetrics, up: Arm, down: Arm, left: Arm, right: Arm) {
    let w = m.cell_width as i32;
    let h = m.cell_height as i32;
    let vmax = thickness_of(up, m).max(thickness_of(down, m)) as i32;
    let hmax = thickness_of(left, m).max(thickness_of(right, m)) as i32;

    // Each arm runs from its edge through the center, far enough to cover
    // the crossing stroke so junctions stay gap-free.
    if left != Arm::None {
        let t = thickness_of(left, m);
        hline(canvas, (h - t as i32) / 2, 0, (w + vmax + 1) / 2, t);
    }
    if right != Arm::None {
        let t = thickness_of(right, m);
        hline(canvas, (h - t as i32) / 2, (w - vmax) / 2, w, t);
    }
    if up != Arm::None {
        let t = thickness_of(up, m);
        vline(canvas, (w - t as i32) / 2, 0, (h + hmax + 1) / 2, t);
    }
    if down != Arm::None {
        let t = thickness_of(down, m);
        vline(canvas, (w - t as i32) / 2, (h - hmax) / 2, h, t);
    }
}

fn dashed(canvas: &mut Canvas, cp: u32, m: &SpriteMetrics) -> bool {
    let (count, horizontal, heavy) = match cp {
        0x2504 => (3, true, false),
        0x2505 => (3, true, true),
        0x2506 => (3, false, false),
        0x2507 => (3, false, true),
        0x2508 => (4, true, false),
        0x2509 => (4, true, true),
        0x250A => (4, false, false),
        0x250B => (4, false, true),
        0x254C => (2, true, false),
        0x254D => (2, true, true),
        0x254E => (2, false, false),
        0x254F => (2, false, true),
        _ => return false,
    };

    let t = if heavy { m.heavy() } else { m.line_thickness };
    let span = if horizontal { m.cell_width } else { m.cell_height } as i32;
    let gap = (span / (2 * count)).max(2);
    let dash = (span - gap * (count - 1)) / count;

    for i in 0..count {
        let start = i * (dash + gap);
        if horizontal {
            hline(
                canvas,
                (m.cell_height as i32 - t as i32) / 2,
                start,
                (start + dash).min(span),
                t,
            );
        } else {
            vline(
                canvas,
                (m.cell_width as i32 - t as i32) / 2,
                start,
                (start + dash).min(span),
                t,
            );
        }
    }
    true
}

#[allow(clippy::many_single_char_names)]
fn double(canvas: &mut Canvas, cp: u32, m: &SpriteMetrics) -> bool {
    let t = m.line_thickness as i32;
    let w = m.cell_width as i32;
    let h = m.cell_height as i32;
    // Tops of the two horizontal strokes and lefts of the two vertical
    // strokes; the open channel between a pair is one thickness wide.
    let ha = (h - 3 * t) / 2;
    let hb = ha + 2 * t;
    let va = (w - 3 * t) / 2;
    let vb = va + 2 * t;
    // Positions for a single stroke meeting a double pair.
    let sx = (w - t) / 2;
    let sy = (h - t) / 2;
    let tu = t as u32;

    match cp {
        0x2550 => {
            hline(canvas, ha, 0, w, tu);
            hline(canvas, hb, 0, w, tu);
        },
        0x2551 => {
            vline(canvas, va, 0, h, tu);
            vline(canvas, vb, 0, h, tu);
        },
        0x2552 => {
            vline(canvas, sx, ha, h, tu);
            hline(canvas, ha, sx, w, tu);
            hline(canvas, hb, sx, w, tu);
        },
        0x2553 => {
            vline(canvas, va, sy, h, tu);
            vline(canvas, vb, sy, h, tu);
            hline(canvas, sy, va, w, tu);
        },
        0x2554 => {
            hline(canvas, ha, va, w, tu);
            hline(canvas, hb, vb, w, tu);
            vline(canvas, va, ha, h, tu);
            vline(canvas, vb, hb, h, tu);
        },
        0x2555 => {
            vline(canvas, sx, ha, h, tu);
            hline(canvas, ha, 0, sx + t, tu);
            hline(canvas, hb, 0, sx + t, tu);
        },
        0x2556 => {
            vline(canvas, va, sy, h, tu);
            vline(canvas, vb, sy, h, tu);
            hline(canvas, sy, 0, vb + t, tu);
        },
        0x2557 => {
            hline(canvas, ha, 0, vb + t, tu);
            hline(canvas, hb, 0, va + t, tu);
            vline(canvas, vb, ha, h, tu);
            vline(canvas, va, hb, h, tu);
        },
        0x2558 => {
            vline(canvas, sx, 0, hb + t, tu);
            hline(canvas, ha, sx, w, tu);
            hline(canvas, hb, sx, w, tu);
        },
        0x2559 => {
            vline(canvas, va, 0, sy + t, tu);
            vline(canvas, vb, 0, sy + t, tu);
            hline(canvas, sy, va, w, tu);
        },
        0x255A => {
            vline(canvas, va, 0, hb + t, tu);
            vline(canvas, vb, 0, ha + t, tu);
            hline(canvas, hb, va, w, tu);
            hline(canvas, ha, vb, w, tu);
        },
        0x255B => {
            vline(canvas, sx, 0, hb + t, tu);
            hline(canvas, ha, 0, sx + t, tu);
            hline(canvas, hb, 0, sx + t, tu);
        },
        0x255C => {
            vline(canvas, va, 0, sy + t, tu);
            vline(canvas, vb, 0, sy + t, tu);
            hline(canvas, sy, 0, vb + t, tu);
        },
        0x255D => {
            vline(canvas, vb, 0, hb + t, tu);
            vline(canvas, va, 0, ha + t, tu);
            hline(canvas, hb, 0, vb + t, tu);
            hline(canvas, ha, 0, va + t, tu);
        },
        0x255E => {
            vline(canvas, sx, 0, h, tu);
            hline(canvas, ha, sx, w, tu);
            hline(canvas, hb, sx, w, tu);
        },
        0x255F => {
            vline(canvas, va, 0, h, tu);
            vline(canvas, vb, 0, h, tu);
            hline(canvas, sy, vb, w, tu);
        },
        0x2560 => {
            vline(canvas, va, 0, h, tu);
            vline(canvas, vb, 0, ha + t, tu);
            vline(canvas, vb, hb, h, tu);
            hline(canvas, ha, vb, w, tu);
            hline(canvas, hb, vb, w, tu);
        },
        0x2561 => {
            vline(canvas, sx, 0, h, tu);
            hline(canvas, ha, 0, sx + t, tu);
            hline(canvas, hb, 0, sx + t, tu);
        },
        0x2562 => {
            vline(canvas, va, 0, h, tu);
            vline(canvas, vb, 0, h, tu);
            hline(canvas, sy, 0, va + t, tu);
        },
        0x2563 => {
            vline(canvas, vb, 0, h, tu);
            vline(canvas, va, 0, ha + t, tu);
            vline(canvas, va, hb, h, tu);
            hline(canvas, ha, 0, va + t, tu);
            hline(canvas, hb, 0, va + t, tu);
        },
        0x2564 => {
            hline(canvas, ha, 0, w, tu);
            hline(canvas, hb, 0, w, tu);
            vline(canvas, sx, hb, h, tu);
        },
        0x2565 => {
            hline(canvas, sy, 0, w, tu);
            vline(canvas, va, sy, h, tu);
            vline(canvas, vb, sy, h, tu);
        },
        0x2566 => {
            hline(canvas, ha, 0, w, tu);
            hline(canvas, hb, 0, va + t, tu);
            hline(canvas, hb, vb, w, tu);
            vline(canvas, va, hb, h, tu);
            vline(canvas, vb, hb, h, tu);
        },
        0x2567 => {
            hline(canvas, ha, 0, w, tu);
            hline(canvas, hb, 0, w, tu);
            vline(canvas, sx, 0, ha + t, tu);
        },
        0x2568 => {
            hline(canvas, sy, 0, w, tu);
            vline(canvas, va, 0, sy + t, tu);
            vline(canvas, vb, 0, sy + t, tu);
        },
        0x2569 => {
            hline(canvas, hb, 0, w, tu);
            hline(canvas, ha, 0, va + t, tu);
            hline(canvas, ha, vb, w, tu);
            vline(canvas, va, 0, ha + t, tu);
            vline(canvas, vb, 0, ha + t, tu);
        },
        0x256A => {
            hline(canvas, ha, 0, w, tu);
            hline(canvas, hb, 0, w, tu);
            vline(canvas, sx, 0, h, tu);
        },
        0x256B => {
            vline(canvas, va, 0, h, tu);
            vline(canvas, vb, 0, h, tu);
            hline(canvas, sy, 0, w, tu);
        },
        0x256C => {
            vline(canvas, va, 0, ha + t, tu);
            vline(canvas, va, hb, h, tu);
            vline(canvas, vb, 0, ha + t, tu);
            vline(canvas, vb, hb, h, tu);
            hline(canvas, ha, 0, va + t, tu);
            hline(canvas, ha, vb, w, tu);
            hline(canvas, hb, 0, va + t, tu);
            hline(canvas, hb, vb, w, tu);
        },
        _ => return false,
    }
    true
}
