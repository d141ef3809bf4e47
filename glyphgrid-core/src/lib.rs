//! Font resolution and glyph caching for terminal rendering.
//!
//! The stack, bottom up:
//!
//! - [`Collection`]: priority-ordered, per-style font lists with deferred
//!   loading, alias entries, and style synthesis.
//! - [`CodepointResolver`]: maps (codepoint, style, presentation) to a
//!   [`glyphgrid_data::FaceIndex`], consulting codepoint overrides, the
//!   sprite face, and system font discovery. Its public surface never
//!   fails; internal errors degrade to the next fallback.
//! - [`SharedGrid`]: a thread-safe wrapper adding resolution and glyph
//!   caches, two texture atlases, and published cell metrics.
//! - [`SharedGridSet`]: a refcounted registry sharing grids between
//!   surfaces with identical font configuration.
//!
//! The font engine itself sits behind the [`Backend`] trait bundle; the
//! production swash/fontdb implementation lives in `glyphgrid-rasterizer`.

mod backend;
mod collection;
mod config;
mod error;
mod grid;
mod grid_set;
mod resolver;
#[cfg(test)]
mod testutil;

pub use backend::{
    Backend, DeferredLoad, Descriptor, Discover, FallbackRequest, RasterFace, Variation,
};
pub use collection::{Collection, Entry, LoadOptions};
pub use config::{GridConfig, StylePreference, SyntheticStyles};
pub use error::Error;
pub use grid::{GridOptions, SharedGrid};
pub use grid_set::{GridKey, SharedGridSet};
pub use resolver::{CodepointMap, CodepointResolver};
