use bitflags::bitflags;

/// Placement record for a rasterized glyph stored in a texture atlas.
///
/// Coordinates are in pixels. `offset_y` is the top bearing in the
/// bottom-origin coordinate system used by the renderer: the distance from
/// the baseline up to the top edge of the bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Glyph {
    /// Width of the bitmap in the atlas, excluding padding.
    pub width: u32,
    /// Height of the bitmap in the atlas, excluding padding.
    pub height: u32,
    /// Horizontal bearing from the pen position to the left bitmap edge.
    pub offset_x: i32,
    /// Vertical bearing from the baseline to the top bitmap edge (y-up).
    pub offset_y: i32,
    /// Left edge of the bitmap within the atlas.
    pub atlas_x: u32,
    /// Top edge of the bitmap within the atlas.
    pub atlas_y: u32,
    /// Horizontal advance in pixels.
    pub advance_x: f32,
}

bitflags! {
    /// Rasterizer behavior flags carried by the collection's load options.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LoadFlags: u8 {
        /// Apply the font's hinting instructions when scaling outlines.
        const HINTING = 1 << 0;
        /// Thicken rendered strokes and double the cell underline thickness.
        const THICKEN = 1 << 1;
    }
}

/// Per-render options. Part of the glyph cache key, so two renders of the
/// same glyph under different options occupy separate cache entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RenderOptions {
    /// Thicken strokes during rasterization.
    pub thicken: bool,
    /// Clamp the rendered bitmap height, e.g. to keep color emoji inside
    /// the cell. `None` leaves the natural bitmap height.
    pub max_height: Option<u32>,
}
