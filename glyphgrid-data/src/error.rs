use crate::atlas::AtlasError;

/// Error surface of a single glyph render.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// The target atlas could not reserve the bitmap. The grid layer
    /// recovers by growing the atlas and retrying once.
    #[error(transparent)]
    AtlasFull(#[from] AtlasError),

    /// The rasterizer failed to produce a bitmap for this glyph.
    #[error("glyph {glyph} failed to render: {reason}")]
    LoadFailed { glyph: u32, reason: String },
}
