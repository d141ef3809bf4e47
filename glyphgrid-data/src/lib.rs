//! Shared data structures for the glyphgrid font engine.
//!
//! Everything in this crate is backend-agnostic: styles and presentation
//! modes, packed face indices, rasterized glyph placement records, cell
//! metrics, and the CPU-side texture atlas the rasterizers write into.

mod atlas;
mod error;
mod glyph;
mod index;
mod metrics;
mod style;

pub use atlas::{Atlas, AtlasError, PixelFormat, Region};
pub use error::RenderError;
pub use glyph::{Glyph, LoadFlags, RenderOptions};
pub use index::{FaceIndex, Special};
pub use metrics::{FaceMetrics, Metrics, Modifier, ModifierSet};
pub use style::{Presentation, PresentationMode, Style};
