use glyphgrid_data::{FaceIndex, RenderError, Style};

/// Error categories for collection, resolution, and grid construction.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The per-style entry list reached the index space of [`FaceIndex`].
    #[error("collection is full for style {0:?}")]
    CollectionFull(Style),

    /// A deferred entry was added or touched without load options.
    #[error("deferred entries require load options")]
    DeferredLoadingUnavailable,

    /// A face was requested for a virtual index. Virtual faces render
    /// through the sprite path and never materialize.
    #[error("virtual face index {0:?} has no backing face")]
    SpecialHasNoFace(FaceIndex),

    /// Style completion found no regular face usable as a text anchor.
    #[error("no regular text face available for style completion")]
    DefaultUnavailable,

    /// A font file failed to load or scale.
    #[error("font load failed: {0}")]
    Load(String),

    /// The discovery backend failed.
    #[error("font discovery failed: {0}")]
    Discover(String),

    /// A glyph render failed after any atlas retry.
    #[error(transparent)]
    Render(#[from] RenderError),
}
