//! The production font backend for glyphgrid: swash for charmaps and
//! rasterization, fontdb for system font discovery, and a small OpenType
//! reader for the metric and color tables the engine consumes directly.

mod deferred;
mod discovery;
mod face;
mod library;
pub mod opentype;

pub use deferred::{Charset, DeferredFont};
pub use discovery::SystemFonts;
pub use face::FontFace;
pub use library::FontLibrary;

use glyphgrid_core::Backend;

/// The swash + fontdb [`Backend`] bundle.
pub struct SwashBackend;

impl Backend for SwashBackend {
    type Library = FontLibrary;
    type Face = FontFace;
    type Deferred = DeferredFont;
}

/// A glyph grid over the production backend.
pub type Grid = glyphgrid_core::SharedGrid<SwashBackend, SystemFonts>;

/// A grid registry over the production backend.
pub type GridSet = glyphgrid_core::SharedGridSet<SwashBackend, SystemFonts>;

/// Builds the grid registry with a fresh library handle.
pub fn grid_set() -> GridSet {
    GridSet::new(FontLibrary::new())
}
