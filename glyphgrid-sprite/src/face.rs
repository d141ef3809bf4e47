//! The procedural sprite face.

use glyphgrid_data::{Atlas, Glyph, Presentation, RenderError};

use crate::{arc, blocks, box_drawing, braille, canvas::Canvas, cursor, sextant};

/// Cell geometry the sprite face draws against.
///
/// All values are pixels. `underline_position` is measured from the top of
/// the cell to the top of the line, matching the grid metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteMetrics {
    pub cell_width: u32,
    pub cell_height: u32,
    /// Stroke width of light lines.
    pub line_thickness: u32,
    /// Stroke width of heavy lines; `None` means twice the light width.
    pub heavy_thickness: Option<u32>,
    pub underline_position: u32,
    pub underline_thickness: u32,
}

impl SpriteMetrics {
    pub(crate) fn heavy(&self) -> u32 {
        self.heavy_thickness.unwrap_or(self.line_thickness * 2)
    }
}

/// A font-less face that rasterizes box-drawing, block, Braille, sextant,
/// and arc glyphs directly from cell geometry, plus renderer-internal
/// underline and cursor sprites.
///
/// Drawing procedurally keeps these glyphs pixel-aligned to the cell no
/// matter which fonts are loaded, so adjacent cells tile seamlessly.
#[derive(Debug, Clone, Copy)]
pub struct SpriteFace {
    metrics: SpriteMetrics,
}

impl SpriteFace {
    pub fn new(metrics: SpriteMetrics) -> SpriteFace {
        SpriteFace { metrics }
    }

    pub fn metrics(&self) -> &SpriteMetrics {
        &self.metrics
    }

    /// Whether this face claims a text codepoint.
    ///
    /// Sprites are always monochrome, so a query explicitly demanding emoji
    /// presentation never matches. Internal sprite codepoints sit above the
    /// scalar range and are not reachable from here.
    pub fn has_codepoint(&self, cp: char, presentation: Option<Presentation>) -> bool {
        if presentation == Some(Presentation::Emoji) {
            return false;
        }
        matches!(
            cp as u32,
            0x2500..=0x259F | 0x2800..=0x28FF | 0x1FB00..=0x1FB3B
        )
    }

    /// Rasterizes a sprite codepoint into the grayscale atlas.
    ///
    /// The bitmap is written with a one-pixel transparent border so bilinear
    /// sampling never bleeds neighboring glyphs; the returned [`Glyph`]
    /// points inside the border. `offset_y` equals the cell height because
    /// the renderer positions glyphs bottom-origin.
    pub fn render_glyph(&self, atlas: &mut Atlas, cp: u32) -> Result<Glyph, RenderError> {
        let m = &self.metrics;
        let mut canvas = Canvas::new(m.cell_width, m.cell_height);

        let drawn = match cp {
            0x2500..=0x256C | 0x2571..=0x257F => box_drawing::draw(&mut canvas, cp, m),
            0x256D..=0x2570 => arc::draw(&mut canvas, cp, m),
            0x2580..=0x259F => blocks::draw(&mut canvas, cp, m),
            0x2800..=0x28FF => braille::draw(&mut canvas, cp, m),
            0x1FB00..=0x1FB3B => sextant::draw(&mut canvas, cp, m),
            _ => cursor::draw(&mut canvas, cp, m),
        };
        if !drawn {
            return Err(RenderError::LoadFailed {
                glyph: cp,
                reason: "codepoint is not a sprite".into(),
            });
        }

        let region = atlas.reserve(m.cell_width + 2, m.cell_height + 2)?;

        // Pad the bitmap into the reserved region.
        let padded_width = (m.cell_width + 2) as usize;
        let padded_height = (m.cell_height + 2) as usize;
        let mut padded = vec![0u8; padded_width * padded_height];
        for row in 0..m.cell_height as usize {
            let src = row * m.cell_width as usize;
            let dst = (row + 1) * padded_width + 1;
            padded[dst..dst + m.cell_width as usize]
                .copy_from_slice(&canvas.data()[src..src + m.cell_width as usize]);
        }
        atlas.write(&region, &padded);

        Ok(Glyph {
            width: m.cell_width,
            height: m.cell_height,
            offset_x: 0,
            offset_y: m.cell_height as i32,
            atlas_x: region.x + 1,
            atlas_y: region.y + 1,
            advance_x: m.cell_width as f32,
        })
    }
}

#[cfg(test)]
mod tests {
    use glyphgrid_data::PixelFormat;

    use super::*;

    fn face() -> SpriteFace {
        SpriteFace::new(SpriteMetrics {
            cell_width: 18,
            cell_height: 36,
            line_thickness: 2,
            heavy_thickness: None,
            underline_position: 32,
            underline_thickness: 2,
        })
    }

    #[test]
    fn claims_sprite_ranges() {
        let face = face();
        assert!(face.has_codepoint('\u{2500}', None));
        assert!(face.has_codepoint('\u{259F}', None));
        assert!(face.has_codepoint('\u{2800}', None));
        assert!(face.has_codepoint('\u{28FF}', None));
        assert!(face.has_codepoint('\u{1FB00}', None));
        assert!(face.has_codepoint('\u{1FB3B}', None));
        assert!(!face.has_codepoint('A', None));
        assert!(!face.has_codepoint('\u{1FB3C}', None));
        assert!(!face.has_codepoint('\u{24FF}', None));
    }

    #[test]
    fn honors_presentation() {
        let face = face();
        assert!(face.has_codepoint('\u{2500}', Some(Presentation::Text)));
        assert!(!face.has_codepoint('\u{2500}', Some(Presentation::Emoji)));
    }

    #[test]
    fn renders_with_cell_geometry() {
        let face = face();
        let mut atlas = Atlas::new(64, PixelFormat::Grayscale);
        let glyph = face.render_glyph(&mut atlas, 0x2500).unwrap();
        assert_eq!(glyph.width, 18);
        assert_eq!(glyph.height, 36);
        assert_eq!(glyph.offset_y, 36);
        assert_eq!(glyph.advance_x, 18.0);
        // region includes the transparent border
        assert_eq!((glyph.atlas_x, glyph.atlas_y), (1, 1));
    }

    #[test]
    fn padding_row_stays_transparent() {
        let face = face();
        let mut atlas = Atlas::new(64, PixelFormat::Grayscale);
        let glyph = face.render_glyph(&mut atlas, 0x2588).unwrap();
        let stride = atlas.size() as usize;
        // border row above the glyph
        let border_y = (glyph.atlas_y - 1) as usize;
        for x in 0..glyph.width as usize + 2 {
            assert_eq!(atlas.data()[border_y * stride + x], 0);
        }
        // glyph interior is solid
        let inner = glyph.atlas_y as usize * stride + glyph.atlas_x as usize;
        assert_eq!(atlas.data()[inner], 255);
    }

    #[test]
    fn atlas_full_propagates() {
        let face = face();
        let mut atlas = Atlas::new(8, PixelFormat::Grayscale);
        match face.render_glyph(&mut atlas, 0x2500) {
            Err(RenderError::AtlasFull(_)) => {},
            other => panic!("expected AtlasFull, got {other:?}"),
        }
    }

    #[test]
    fn non_sprite_codepoint_is_load_failure() {
        let face = face();
        let mut atlas = Atlas::new(64, PixelFormat::Grayscale);
        assert!(matches!(
            face.render_glyph(&mut atlas, 'A' as u32),
            Err(RenderError::LoadFailed { .. })
        ));
    }

    #[test]
    fn renders_every_claimed_codepoint() {
        let face = face();
        let mut atlas = Atlas::new(2048, PixelFormat::Grayscale);
        let ranges = [0x2500..=0x259F, 0x2800..=0x28FF, 0x1FB00..=0x1FB3B];
        for cp in ranges.into_iter().flatten() {
            face.render_glyph(&mut atlas, cp)
                .unwrap_or_else(|e| panic!("U+{cp:04X}: {e}"));
        }
    }
}
