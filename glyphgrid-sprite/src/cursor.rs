//! Internal sprite codepoints: underline variants and cursor shapes.
//!
//! These live strictly above the Unicode scalar range so they can never be
//! produced by text; the renderer synthesizes them when decorating cells.

use crate::{
    canvas::{Canvas, Point},
    face::SpriteMetrics,
};

/// Sprite glyphs addressable only by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    UnderlineSingle,
    UnderlineDouble,
    UnderlineDotted,
    UnderlineDashed,
    UnderlineCurly,
    CursorBlock,
    CursorHollowBlock,
    CursorBar,
    CursorUnderline,
}

impl Sprite {
    /// First sprite codepoint; one past the Unicode scalar maximum.
    pub const START: u32 = 0x110000;

    pub const ALL: [Sprite; 9] = [
        Sprite::UnderlineSingle,
        Sprite::UnderlineDouble,
        Sprite::UnderlineDotted,
        Sprite::UnderlineDashed,
        Sprite::UnderlineCurly,
        Sprite::CursorBlock,
        Sprite::CursorHollowBlock,
        Sprite::CursorBar,
        Sprite::CursorUnderline,
    ];

    pub const fn codepoint(self) -> u32 {
        Self::START + self as u32
    }

    pub fn from_codepoint(cp: u32) -> Option<Sprite> {
        cp.checked_sub(Self::START)
            .and_then(|offset| Self::ALL.get(offset as usize).copied())
    }
}

pub(crate) fn draw(canvas: &mut Canvas, cp: u32, m: &SpriteMetrics) -> bool {
    let Some(sprite) = Sprite::from_codepoint(cp) else {
        return false;
    };

    let w = m.cell_width as i32;
    let h = m.cell_height as i32;
    let t = m.underline_thickness.max(1) as i32;
    let pos = (m.underline_position as i32).min(h - t);

    match sprite {
        Sprite::UnderlineSingle => canvas.fill_rect(0, pos, w, t, 255),
        Sprite::UnderlineDouble => {
            let second = (pos + 2 * t).min(h - t);
            canvas.fill_rect(0, pos, w, t, 255);
            canvas.fill_rect(0, second, w, t, 255);
        },
        Sprite::UnderlineDotted => {
            let mut x = 0;
            while x < w {
                canvas.fill_rect(x, pos, t.min(w - x), t, 255);
                x += 2 * t;
            }
        },
        Sprite::UnderlineDashed => {
            let dash = (w / 3).max(1);
            canvas.fill_rect(0, pos, dash, t, 255);
            canvas.fill_rect(2 * w / 3, pos, w - 2 * w / 3, t, 255);
        },
        Sprite::UnderlineCurly => {
            // One full sine period across the cell, clamped so peaks stay
            // inside it.
            let amplitude = (t as f32).max(h as f32 - pos as f32 - t as f32).min(2.0 * t as f32);
            let mid = (pos as f32 + amplitude).min(h as f32 - amplitude - t as f32 / 2.0);
            let steps = (w * 2).max(8);
            let mut prev = Point::new(0.0, mid);
            for i in 1..=steps {
                let x = w as f32 * i as f32 / steps as f32;
                let phase = x / w as f32 * std::f32::consts::TAU;
                let next = Point::new(x, mid + amplitude * phase.sin());
                canvas.line(prev, next, t as f32, 255);
                prev = next;
            }
        },
        Sprite::CursorBlock => canvas.fill_rect(0, 0, w, h, 255),
        Sprite::CursorHollowBlock => {
            canvas.fill_rect(0, 0, w, h, 255);
            let inset = m.line_thickness.max(1) as i32;
            canvas.clear_rect(inset, inset, w - 2 * inset, h - 2 * inset);
        },
        Sprite::CursorBar => canvas.fill_rect(0, 0, m.line_thickness.max(1) as i32, h, 255),
        Sprite::CursorUnderline => canvas.fill_rect(0, h - t, w, t, 255),
    }
    true
}
