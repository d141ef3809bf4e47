//! Procedural glyph rendering for terminal cells.
//!
//! Box-drawing, block element, Braille, sextant, and arc codepoints are
//! drawn from cell geometry instead of font outlines, so they align
//! pixel-perfectly with the grid. A private codepoint space above the
//! Unicode scalar range carries renderer-internal sprites (underline
//! variants, cursor shapes).

mod arc;
mod blocks;
mod box_drawing;
mod braille;
pub mod canvas;
mod cursor;
mod face;
mod sextant;

pub use cursor::Sprite;
pub use face::{SpriteFace, SpriteMetrics};
