//! A thread-safe glyph grid shared by concurrent renderers.

use std::sync::RwLock;

use glyphgrid_data::{
    Atlas, FaceIndex, Glyph, LoadFlags, Metrics, PixelFormat, Presentation, RenderError,
    RenderOptions, Style,
};
use glyphgrid_sprite::{SpriteFace, SpriteMetrics};
use rustc_hash::FxHashMap;
use tracing::{debug, info};

use crate::{
    backend::{Backend, Discover, RasterFace},
    error::Error,
    resolver::CodepointResolver,
};

/// Initial cache capacity; enough for a screenful of distinct cells.
const CACHE_CAPACITY: usize = 128;

#[derive(Debug, Clone, Copy)]
pub struct GridOptions {
    /// Initial edge length of both atlases. They double on demand.
    pub atlas_size: u32,
}

impl Default for GridOptions {
    fn default() -> Self {
        GridOptions { atlas_size: 512 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CodepointKey {
    style: Style,
    codepoint: char,
    presentation: Option<Presentation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct GlyphKey {
    index: FaceIndex,
    glyph: u32,
    options: RenderOptions,
}

/// Resolver plus caches, atlases, and published cell metrics.
///
/// One `SharedGrid` serves any number of renderer threads. The hot path
/// (cache hit) takes the read lock only; misses upgrade to the write lock,
/// re-check, and compute. Fonts, sizes, and faces are fixed after
/// construction; a configuration change builds a new grid.
pub struct SharedGrid<B: Backend, D> {
    inner: RwLock<GridInner<B, D>>,
    metrics: Metrics,
}

struct GridInner<B: Backend, D> {
    resolver: CodepointResolver<B, D>,
    atlas_grayscale: Atlas,
    atlas_color: Atlas,
    codepoint_cache: FxHashMap<CodepointKey, Option<FaceIndex>>,
    glyph_cache: FxHashMap<GlyphKey, Glyph>,
}

impl<B: Backend, D: Discover<B>> SharedGrid<B, D> {
    /// Builds a grid: computes cell metrics from the primary regular face
    /// and installs a sprite face cut to those metrics.
    pub fn new(
        mut resolver: CodepointResolver<B, D>,
        options: GridOptions,
    ) -> Result<SharedGrid<B, D>, Error> {
        // Cell geometry comes from whichever regular face renders 'M'.
        let index = resolver
            .get_index('M', Style::Regular, None)
            .ok_or(Error::DefaultUnavailable)?;
        let collection = resolver.collection_mut();
        let face_metrics = collection.get_face(index)?.metrics();

        let mut metrics = Metrics::calc(&face_metrics);
        if let Some(load_options) = collection.load_options() {
            metrics.apply(&load_options.metric_modifiers);
            if load_options.flags.contains(LoadFlags::THICKEN) {
                metrics.underline_thickness *= 2;
            }
        }
        info!(?metrics, "grid metrics computed");

        resolver.set_sprite(SpriteFace::new(SpriteMetrics {
            cell_width: metrics.cell_width,
            cell_height: metrics.cell_height,
            line_thickness: metrics.underline_thickness,
            heavy_thickness: None,
            underline_position: metrics.underline_position,
            underline_thickness: metrics.underline_thickness,
        }));

        Ok(SharedGrid {
            inner: RwLock::new(GridInner {
                resolver,
                atlas_grayscale: Atlas::new(options.atlas_size, PixelFormat::Grayscale),
                atlas_color: Atlas::new(options.atlas_size, PixelFormat::Bgra),
                codepoint_cache: FxHashMap::with_capacity_and_hasher(
                    CACHE_CAPACITY,
                    Default::default(),
                ),
                glyph_cache: FxHashMap::with_capacity_and_hasher(
                    CACHE_CAPACITY,
                    Default::default(),
                ),
            }),
            metrics,
        })
    }

    /// Published cell geometry. Fixed for the grid's lifetime.
    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    /// Resolves a codepoint to a face index, caching the result. Negative
    /// results are cached too, so repeated misses stay cheap.
    pub fn index_for(
        &self,
        cp: char,
        style: Style,
        presentation: Option<Presentation>,
    ) -> Option<FaceIndex> {
        let key = CodepointKey { style, codepoint: cp, presentation };

        {
            let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
            if let Some(&cached) = inner.codepoint_cache.get(&key) {
                return cached;
            }
        }

        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        // Another thread may have resolved this while we waited.
        if let Some(&cached) = inner.codepoint_cache.get(&key) {
            return cached;
        }
        let resolved = inner.resolver.get_index(cp, style, presentation);
        inner.codepoint_cache.insert(key, resolved);
        resolved
    }

    /// Rasterizes a glyph of a resolved face, caching the placement.
    ///
    /// A full atlas is doubled and the render retried once; a second
    /// failure propagates.
    pub fn render(
        &self,
        index: FaceIndex,
        glyph: u32,
        options: RenderOptions,
    ) -> Result<Glyph, Error> {
        let key = GlyphKey { index, glyph, options };

        {
            let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
            if let Some(&cached) = inner.glyph_cache.get(&key) {
                return Ok(cached);
            }
        }

        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        if let Some(&cached) = inner.glyph_cache.get(&key) {
            return Ok(cached);
        }
        let rendered = inner.render_uncached(index, glyph, options)?;
        inner.glyph_cache.insert(key, rendered);
        Ok(rendered)
    }

    /// Presentation of a resolved (face, glyph) pair.
    pub fn presentation_for(&self, index: FaceIndex, glyph: u16) -> Result<Presentation, Error> {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.resolver.get_presentation(index, glyph)
    }

    /// Read access to both atlases (grayscale, color), e.g. for texture
    /// upload. Holds the read lock for the duration of the callback.
    pub fn with_atlases<R>(&self, f: impl FnOnce(&Atlas, &Atlas) -> R) -> R {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        f(&inner.atlas_grayscale, &inner.atlas_color)
    }
}

impl<B: Backend, D: Discover<B>> GridInner<B, D> {
    fn render_uncached(
        &mut self,
        index: FaceIndex,
        glyph: u32,
        options: RenderOptions,
    ) -> Result<Glyph, Error> {
        if index.is_sprite() {
            let sprite = *self
                .resolver
                .sprite()
                .ok_or(Error::SpecialHasNoFace(index))?;
            return match sprite.render_glyph(&mut self.atlas_grayscale, glyph) {
                Err(RenderError::AtlasFull(_)) => {
                    let new_size = self.atlas_grayscale.size() * 2;
                    debug!(new_size, "grayscale atlas full, growing");
                    self.atlas_grayscale.grow(new_size);
                    sprite
                        .render_glyph(&mut self.atlas_grayscale, glyph)
                        .map_err(Error::from)
                },
                result => result.map_err(Error::from),
            };
        }

        let glyph_id = u16::try_from(glyph)
            .map_err(|_| Error::Load(format!("glyph id {glyph} out of face range")))?;
        let face = self.resolver.collection_mut().get_face(index)?;
        let atlas = if face.is_color_glyph(glyph_id) {
            &mut self.atlas_color
        } else {
            &mut self.atlas_grayscale
        };

        match face.render_glyph(atlas, glyph_id, options) {
            Err(RenderError::AtlasFull(_)) => {
                let new_size = atlas.size() * 2;
                debug!(new_size, format = ?atlas.format(), "atlas full, growing");
                atlas.grow(new_size);
                face.render_glyph(atlas, glyph_id, options).map_err(Error::from)
            },
            result => result.map_err(Error::from),
        }
    }
}
