//! A loaded face backed by swash scaling and the parsed OpenType tables.

use std::sync::Arc;

use compact_str::{CompactString, format_compact};
use glyphgrid_core::{Error, LoadOptions, RasterFace, Variation};
use glyphgrid_data::{
    Atlas, AtlasError, FaceMetrics, Glyph, LoadFlags, PixelFormat, Region, RenderError,
    RenderOptions,
};
use swash::{
    CacheKey, FontRef,
    scale::{Render, Source, StrikeWith, image::Content},
    zeno::Format,
};
use tracing::trace;

use crate::{library::FontLibrary, opentype::Tables};

/// Slope used for synthetic italics, roughly a 12 degree slant.
const ITALIC_SLOPE: f32 = 0.2126;

/// Render source priority: color outlines, then color bitmaps, then
/// regular outlines.
const RENDER_SOURCES: &[Source] = &[
    Source::ColorOutline(0),
    Source::ColorBitmap(StrikeWith::BestFit),
    Source::Outline,
];

#[derive(Debug, Clone, Copy, Default)]
struct Synthetic {
    embolden: bool,
    slant: bool,
}

/// A materialized font at a fixed size.
///
/// Owns the font bytes; swash structures are rebuilt per call from the
/// stored offset and cache key, which is the crate's intended ownership
/// pattern.
#[derive(Clone)]
pub struct FontFace {
    name: CompactString,
    data: Arc<Vec<u8>>,
    offset: u32,
    key: CacheKey,
    tables: Arc<Tables>,
    library: FontLibrary,
    variations: Vec<Variation>,
    /// Pixels per em.
    size: f32,
    hint: bool,
    thicken: bool,
    synthetic: Synthetic,
}

impl FontFace {
    /// Parses font bytes and binds them to the shared library.
    pub fn from_data(
        library: FontLibrary,
        data: Vec<u8>,
        index: u32,
        name: &str,
        variations: Vec<Variation>,
        options: &LoadOptions<FontLibrary>,
    ) -> Result<FontFace, Error> {
        let font = FontRef::from_index(&data, index as usize)
            .ok_or_else(|| Error::Load(format!("{name}: unparseable font data")))?;
        let (offset, key) = (font.offset, font.key);
        let tables = Tables::parse(&data, index)
            .ok_or_else(|| Error::Load(format!("{name}: missing sfnt directory")))?;

        Ok(FontFace {
            name: name.into(),
            data: Arc::new(data),
            offset,
            key,
            tables: Arc::new(tables),
            library,
            variations,
            size: options.size,
            hint: options.flags.contains(LoadFlags::HINTING),
            thicken: options.flags.contains(LoadFlags::THICKEN),
            synthetic: Synthetic::default(),
        })
    }

    fn font_ref(&self) -> FontRef<'_> {
        FontRef {
            data: &self.data,
            offset: self.offset,
            key: self.key,
        }
    }

    fn units_per_em(&self) -> f32 {
        self.tables
            .head
            .as_ref()
            .map_or(1000, |head| head.units_per_em.max(1)) as f32
    }

    fn scale(&self) -> f32 {
        self.size / self.units_per_em()
    }

    fn advance(&self, glyph: u16) -> Option<f32> {
        let advance = self.tables.hmtx.as_ref()?.advance(glyph)?;
        Some(advance as f32 * self.scale())
    }

    fn derive(&self, synthetic: Synthetic, suffix: &str) -> FontFace {
        FontFace {
            name: format_compact!("{} ({suffix})", self.name),
            synthetic,
            ..self.clone()
        }
    }
}

impl RasterFace for FontFace {
    fn glyph_index(&self, cp: char) -> Option<u16> {
        let glyph = self.font_ref().charmap().map(cp);
        (glyph != 0).then_some(glyph)
    }

    fn is_color_glyph(&self, glyph: u16) -> bool {
        self.tables.is_color_glyph(glyph)
    }

    fn has_color(&self) -> bool {
        self.tables.has_color()
    }

    fn metrics(&self) -> FaceMetrics {
        let scale = self.scale();
        let os2 = self.tables.os2.as_ref();
        let hhea = self.tables.hhea.as_ref();

        // Typo metrics when the font opts in, hhea otherwise, windows
        // metrics as a last resort.
        let (ascent, descent, line_gap) = match (os2, hhea) {
            (Some(os2), _) if os2.use_typo_metrics() && os2.typo_ascender != 0 => {
                (os2.typo_ascender, os2.typo_descender, os2.typo_line_gap)
            },
            (_, Some(hhea)) if hhea.ascender != 0 => {
                (hhea.ascender, hhea.descender, hhea.line_gap)
            },
            (Some(os2), _) => (os2.win_ascent as i16, -(os2.win_descent as i16), 0),
            _ => (0, 0, 0),
        };

        // Widest printable-ASCII advance; fall back to the font-wide max.
        let charmap = self.font_ref().charmap();
        let cell_width_units = (0x20u32..=0x7E)
            .filter_map(|cp| {
                let glyph = charmap.map(char::from_u32(cp)?);
                (glyph != 0)
                    .then(|| self.tables.hmtx.as_ref()?.advance(glyph))
                    .flatten()
            })
            .max()
            .or_else(|| hhea.map(|hhea| hhea.advance_width_max))
            .unwrap_or(0);

        FaceMetrics {
            cell_width: cell_width_units as f32 * scale,
            ascent: ascent as f32 * scale,
            descent: descent as f32 * scale,
            line_gap: line_gap as f32 * scale,
            underline_position: self
                .tables
                .post
                .as_ref()
                .map(|post| post.underline_position as f32 * scale),
            underline_thickness: self
                .tables
                .post
                .as_ref()
                .map(|post| post.underline_thickness as f32 * scale),
            strikethrough_position: os2.map(|os2| os2.strikeout_position as f32 * scale),
            strikethrough_thickness: os2.map(|os2| os2.strikeout_size as f32 * scale),
            cap_height: os2.and_then(|os2| os2.cap_height).map(|v| v as f32 * scale),
            ex_height: os2.and_then(|os2| os2.x_height).map(|v| v as f32 * scale),
        }
    }

    fn set_size(&mut self, size: f32) -> Result<(), Error> {
        self.size = size;
        Ok(())
    }

    fn render_glyph(
        &mut self,
        atlas: &mut Atlas,
        glyph: u16,
        options: RenderOptions,
    ) -> Result<Glyph, RenderError> {
        let image = {
            let font = self.font_ref();
            let mut context = self.library.lock();
            let mut builder = context.builder(font).size(self.size).hint(self.hint);
            if !self.variations.is_empty() {
                let settings: Vec<(&str, f32)> = self
                    .variations
                    .iter()
                    .filter_map(|v| Some((std::str::from_utf8(&v.tag).ok()?, v.value)))
                    .collect();
                builder = builder.variations(settings);
            }
            let mut scaler = builder.build();
            Render::new(RENDER_SOURCES)
                .format(Format::Alpha)
                .render(&mut scaler, glyph)
        };
        let image = image.ok_or_else(|| RenderError::LoadFailed {
            glyph: glyph as u32,
            reason: "rasterizer produced no image".into(),
        })?;

        let mut width = image.placement.width;
        let mut height = image.placement.height;
        let mut offset_x = image.placement.left;
        let mut offset_y = image.placement.top;

        trace!(
            face = %self.name,
            glyph,
            width,
            height,
            content = ?image.content,
            "rasterized glyph"
        );

        let (mut pixels, source) = match image.content {
            Content::Mask => (image.data, SourcePixels::Alpha),
            Content::Color => (image.data, SourcePixels::Rgba),
            Content::SubpixelMask => {
                // average the subpixel channels down to one coverage value
                let alpha = image
                    .data
                    .chunks_exact(4)
                    .map(|px| ((px[0] as u32 + px[1] as u32 + px[2] as u32) / 3) as u8)
                    .collect();
                (alpha, SourcePixels::Alpha)
            },
        };

        if source == SourcePixels::Alpha {
            if options.thicken || self.thicken || self.synthetic.embolden {
                (pixels, width) = dilate_horizontal(&pixels, width, height);
            }
            if self.synthetic.slant {
                (pixels, width) = shear_rows(&pixels, width, height, ITALIC_SLOPE);
            }
        }

        if let Some(max_height) = options.max_height {
            if height > max_height {
                let new_width = (width * max_height / height).max(1);
                pixels = resize_nearest(
                    &pixels,
                    width,
                    height,
                    source.depth(),
                    new_width,
                    max_height,
                );
                offset_x = offset_x * max_height as i32 / height as i32;
                offset_y = offset_y * max_height as i32 / height as i32;
                width = new_width;
                height = max_height;
            }
        }

        let region = write_padded(atlas, &pixels, width, height, source)?;

        Ok(Glyph {
            width,
            height,
            offset_x,
            offset_y,
            atlas_x: region.x + 1,
            atlas_y: region.y + 1,
            advance_x: self.advance(glyph).unwrap_or(width as f32),
        })
    }

    fn synthetic_bold(&self) -> Option<FontFace> {
        Some(self.derive(
            Synthetic { embolden: true, ..self.synthetic },
            "synthetic bold",
        ))
    }

    fn synthetic_italic(&self) -> Option<FontFace> {
        Some(self.derive(
            Synthetic { slant: true, ..self.synthetic },
            "synthetic italic",
        ))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("name", &self.name)
            .field("size", &self.size)
            .field("synthetic", &self.synthetic)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourcePixels {
    Alpha,
    Rgba,
}

impl SourcePixels {
    fn depth(self) -> usize {
        match self {
            SourcePixels::Alpha => 1,
            SourcePixels::Rgba => 4,
        }
    }
}

/// Writes a bitmap into the atlas with a one-pixel transparent border,
/// converting between the source layout and the atlas format.
fn write_padded(
    atlas: &mut Atlas,
    pixels: &[u8],
    width: u32,
    height: u32,
    source: SourcePixels,
) -> Result<Region, AtlasError> {
    let region = atlas.reserve(width + 2, height + 2)?;
    if width == 0 || height == 0 {
        return Ok(region);
    }

    let depth = atlas.format().depth();
    let padded_width = (width + 2) as usize;
    let mut padded = vec![0u8; padded_width * (height + 2) as usize * depth];

    for y in 0..height as usize {
        for x in 0..width as usize {
            let src = (y * width as usize + x) * source.depth();
            let dst = ((y + 1) * padded_width + x + 1) * depth;
            match (source, atlas.format()) {
                (SourcePixels::Alpha, PixelFormat::Grayscale) => {
                    padded[dst] = pixels[src];
                },
                (SourcePixels::Alpha, PixelFormat::Bgra) => {
                    // premultiplied white
                    padded[dst..dst + 4].copy_from_slice(&[pixels[src]; 4]);
                },
                (SourcePixels::Rgba, PixelFormat::Bgra) => {
                    let (r, g, b, a) =
                        (pixels[src], pixels[src + 1], pixels[src + 2], pixels[src + 3]);
                    padded[dst..dst + 4].copy_from_slice(&[b, g, r, a]);
                },
                (SourcePixels::Rgba, PixelFormat::Grayscale) => {
                    padded[dst] = pixels[src + 3];
                },
            }
        }
    }

    atlas.write(&region, &padded);
    Ok(region)
}

/// One-pixel horizontal dilation: cheap synthetic emboldening.
fn dilate_horizontal(pixels: &[u8], width: u32, height: u32) -> (Vec<u8>, u32) {
    let new_width = width + 1;
    let mut out = vec![0u8; (new_width * height) as usize];
    for y in 0..height as usize {
        for x in 0..new_width as usize {
            let direct = if x < width as usize {
                pixels[y * width as usize + x]
            } else {
                0
            };
            let left = if x > 0 {
                pixels[y * width as usize + x - 1]
            } else {
                0
            };
            out[y * new_width as usize + x] = direct.max(left);
        }
    }
    (out, new_width)
}

/// Row shear for synthetic italics: each row shifts right proportionally
/// to its height above the bitmap bottom.
fn shear_rows(pixels: &[u8], width: u32, height: u32, slope: f32) -> (Vec<u8>, u32) {
    if height == 0 {
        return (pixels.to_vec(), width);
    }
    let max_shift = ((height - 1) as f32 * slope).round() as u32;
    let new_width = width + max_shift;
    let mut out = vec![0u8; (new_width * height) as usize];
    for y in 0..height as usize {
        let shift = ((height as usize - 1 - y) as f32 * slope).round() as usize;
        for x in 0..width as usize {
            out[y * new_width as usize + x + shift] = pixels[y * width as usize + x];
        }
    }
    (out, new_width)
}

/// Nearest-neighbor resize, used to clamp oversized color bitmaps.
fn resize_nearest(
    pixels: &[u8],
    width: u32,
    height: u32,
    depth: usize,
    new_width: u32,
    new_height: u32,
) -> Vec<u8> {
    let mut out = vec![0u8; new_width as usize * new_height as usize * depth];
    for y in 0..new_height as usize {
        let src_y = y * height as usize / new_height as usize;
        for x in 0..new_width as usize {
            let src_x = x * width as usize / new_width as usize;
            let src = (src_y * width as usize + src_x) * depth;
            let dst = (y * new_width as usize + x) * depth;
            out[dst..dst + depth].copy_from_slice(&pixels[src..src + depth]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dilation_widens_strokes() {
        // a 1px vertical stroke in a 3x2 bitmap
        let pixels = [0, 255, 0, 0, 255, 0];
        let (out, width) = dilate_horizontal(&pixels, 3, 2);
        assert_eq!(width, 4);
        assert_eq!(out, vec![0, 255, 255, 0, 0, 255, 255, 0]);
    }

    #[test]
    fn shear_shifts_top_rows_most() {
        // 1x4 column, slope high enough to shift one pixel per row
        let pixels = [255, 255, 255, 255];
        let (out, width) = shear_rows(&pixels, 1, 4, 1.0);
        assert_eq!(width, 4);
        // top row lands at x=3, bottom row stays at x=0
        assert_eq!(out[3], 255);
        assert_eq!(out[width as usize + 2], 255);
        assert_eq!(out[3 * width as usize], 255);
    }

    #[test]
    fn shear_of_empty_bitmap_is_identity() {
        let (out, width) = shear_rows(&[], 0, 0, ITALIC_SLOPE);
        assert!(out.is_empty());
        assert_eq!(width, 0);
    }

    #[test]
    fn resize_halves_dimensions() {
        let pixels: Vec<u8> = (0..16).collect();
        let out = resize_nearest(&pixels, 4, 4, 1, 2, 2);
        assert_eq!(out.len(), 4);
        // nearest sampling picks the top-left of each 2x2 block
        assert_eq!(out, vec![0, 2, 8, 10]);
    }

    #[test]
    fn resize_rgba_keeps_pixels_intact() {
        let pixels = [1, 2, 3, 4, 5, 6, 7, 8];
        let out = resize_nearest(&pixels, 2, 1, 4, 1, 1);
        assert_eq!(out, vec![1, 2, 3, 4]);
    }

    #[test]
    fn write_padded_converts_rgba_to_bgra() {
        let mut atlas = Atlas::new(8, PixelFormat::Bgra);
        let pixels = [10, 20, 30, 40];
        let region = write_padded(&mut atlas, &pixels, 1, 1, SourcePixels::Rgba).unwrap();
        let stride = 8 * 4;
        let inner = ((region.y + 1) as usize) * stride + ((region.x + 1) as usize) * 4;
        assert_eq!(&atlas.data()[inner..inner + 4], &[30, 20, 10, 40]);
        // border pixel stays clear
        let border = (region.y as usize) * stride + (region.x as usize) * 4;
        assert_eq!(&atlas.data()[border..border + 4], &[0, 0, 0, 0]);
    }

    #[test]
    fn write_padded_mask_into_grayscale() {
        let mut atlas = Atlas::new(8, PixelFormat::Grayscale);
        let pixels = [200];
        let region = write_padded(&mut atlas, &pixels, 1, 1, SourcePixels::Alpha).unwrap();
        let inner = ((region.y + 1) * 8 + region.x + 1) as usize;
        assert_eq!(atlas.data()[inner], 200);
    }
}
