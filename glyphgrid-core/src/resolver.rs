//! Codepoint to face-index resolution.
//!
//! The resolver's public surface is infallible: rendering some fallback
//! glyph always beats rendering nothing, so every internal failure is
//! logged and treated as "that option did not match".

use std::{ops::RangeInclusive, sync::Arc};

use glyphgrid_data::{FaceIndex, Presentation, PresentationMode, Style};
use glyphgrid_sprite::SpriteFace;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::{
    backend::{Backend, Descriptor, DeferredLoad, Discover, FallbackRequest, RasterFace},
    collection::{Collection, Entry},
    error::Error,
};

/// User-configured codepoint overrides: contiguous ranges mapped to a font
/// descriptor. Ranges never overlap; the first matching range wins.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CodepointMap {
    entries: Vec<(RangeInclusive<char>, Descriptor)>,
}

impl CodepointMap {
    pub fn push(&mut self, range: RangeInclusive<char>, descriptor: Descriptor) {
        self.entries.push((range, descriptor));
    }

    pub fn get(&self, cp: char) -> Option<&Descriptor> {
        self.entries
            .iter()
            .find(|(range, _)| range.contains(&cp))
            .map(|(_, descriptor)| descriptor)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolves (codepoint, style, presentation) to a face index over a
/// collection, optional discovery, optional overrides, and the sprite face.
pub struct CodepointResolver<B: Backend, D> {
    collection: Collection<B>,
    styles_enabled: [bool; Style::COUNT],
    discover: Option<Arc<D>>,
    codepoint_map: CodepointMap,
    /// Caches override lookups, including misses: a descriptor that
    /// resolved to nothing is not retried.
    descriptor_cache: FxHashMap<Descriptor, Option<FaceIndex>>,
    sprite: Option<SpriteFace>,
}

impl<B: Backend, D: Discover<B>> CodepointResolver<B, D> {
    pub fn new(collection: Collection<B>) -> CodepointResolver<B, D> {
        CodepointResolver {
            collection,
            styles_enabled: [true; Style::COUNT],
            discover: None,
            codepoint_map: CodepointMap::default(),
            descriptor_cache: FxHashMap::default(),
            sprite: None,
        }
    }

    pub fn set_discovery(&mut self, discover: Arc<D>) {
        self.discover = Some(discover);
    }

    pub fn set_codepoint_map(&mut self, map: CodepointMap) {
        self.codepoint_map = map;
    }

    pub fn set_sprite(&mut self, sprite: SpriteFace) {
        self.sprite = Some(sprite);
    }

    pub fn sprite(&self) -> Option<&SpriteFace> {
        self.sprite.as_ref()
    }

    pub fn set_style_enabled(&mut self, style: Style, enabled: bool) {
        self.styles_enabled[style.ordinal()] = enabled;
    }

    pub fn collection(&self) -> &Collection<B> {
        &self.collection
    }

    pub fn collection_mut(&mut self) -> &mut Collection<B> {
        &mut self.collection
    }

    /// Resolves a codepoint to a face index.
    ///
    /// `presentation` is the explicit variation-selector constraint, if the
    /// caller saw one; otherwise the UCD default for the codepoint applies.
    /// Returns `None` only when nothing can render the codepoint at all.
    pub fn get_index(
        &mut self,
        cp: char,
        style: Style,
        presentation: Option<Presentation>,
    ) -> Option<FaceIndex> {
        // A disabled style resolves as regular from the start.
        let style = if style != Style::Regular && !self.styles_enabled[style.ordinal()] {
            Style::Regular
        } else {
            style
        };

        // Codepoint overrides come first so users can force a font even
        // for sprite-capable codepoints.
        if let Some(index) = self.codepoint_override(cp) {
            return Some(index);
        }

        if let Some(sprite) = &self.sprite {
            if sprite.has_codepoint(cp, presentation) {
                return Some(FaceIndex::sprite(style));
            }
        }

        let mode = match presentation {
            Some(p) => PresentationMode::Explicit(p),
            None => PresentationMode::Default(glyphgrid_unicode::default_presentation(cp)),
        };

        if let Some(index) = self.collection.get_index(cp, style, mode) {
            return Some(index);
        }

        if style != Style::Regular {
            // Styled faces often have different advances; falling back to
            // regular keeps the grid monospaced.
            if let Some(index) = self.get_index(cp, Style::Regular, presentation) {
                return Some(index);
            }
        } else if let Some(index) = self.discover_fallback(cp, mode) {
            return Some(index);
        }

        if style == Style::Regular && presentation.is_none() {
            return None;
        }
        self.collection.get_index(cp, Style::Regular, PresentationMode::Any)
    }

    /// Presentation of a specific glyph of a resolved face. Per-glyph
    /// because one face may mix monochrome and color glyphs.
    pub fn get_presentation(&mut self, index: FaceIndex, glyph: u16) -> Result<Presentation, Error> {
        if index.is_sprite() {
            return Ok(Presentation::Text);
        }
        let face = self.collection.get_face(index)?;
        Ok(if face.is_color_glyph(glyph) {
            Presentation::Emoji
        } else {
            Presentation::Text
        })
    }

    fn codepoint_override(&mut self, cp: char) -> Option<FaceIndex> {
        let descriptor = self.codepoint_map.get(cp)?.clone();

        let cached = match self.descriptor_cache.get(&descriptor).copied() {
            Some(cached) => cached,
            None => match self.resolve_override(&descriptor) {
                Ok(resolved) => {
                    self.descriptor_cache.insert(descriptor, resolved);
                    resolved
                },
                // Logged below; skip the override without caching so a
                // transient discovery failure is not pinned forever.
                Err(()) => return None,
            },
        };

        let index = cached?;
        // The override only wins when the face actually has the glyph;
        // otherwise resolution proceeds as if no override existed.
        if self.collection.has_codepoint(index, cp, PresentationMode::Any) {
            Some(index)
        } else {
            None
        }
    }

    fn resolve_override(&mut self, descriptor: &Descriptor) -> Result<Option<FaceIndex>, ()> {
        let Some(discover) = self.discover.clone() else {
            return Ok(None);
        };
        let candidates = match discover.discover(descriptor) {
            Ok(candidates) => candidates,
            Err(error) => {
                warn!(%error, ?descriptor, "codepoint override discovery failed");
                return Err(());
            },
        };
        let Some(deferred) = candidates.into_iter().next() else {
            debug!(?descriptor, "codepoint override matched no font");
            return Ok(None);
        };
        debug!(face = deferred.name(), "adding codepoint override face");
        match self.collection.add(Style::Regular, Entry::Deferred(deferred)) {
            Ok(index) => Ok(Some(index)),
            Err(error) => {
                warn!(%error, "failed to add codepoint override face");
                Err(())
            },
        }
    }

    /// Last-ditch search across every installed font. Runs only for
    /// regular-style queries; discovery cannot filter by presentation, so
    /// each candidate is verified before it is adopted.
    fn discover_fallback(&mut self, cp: char, mode: PresentationMode) -> Option<FaceIndex> {
        let discover = self.discover.clone()?;
        let request = FallbackRequest {
            codepoint: cp,
            size: self.collection.load_options().map_or(12.0, |o| o.size),
            bold: false,
            italic: false,
            monospace: true,
        };

        let candidates = match discover.fallback(&request) {
            Ok(candidates) => candidates,
            Err(error) => {
                warn!(%error, codepoint = %cp.escape_unicode(), "fallback discovery failed");
                return None;
            },
        };

        for candidate in candidates {
            let entry = Entry::FallbackDeferred(candidate);
            if !self.collection.entry_has_codepoint(&entry, cp, mode) {
                continue;
            }
            debug!(
                face = entry_name(&entry),
                codepoint = %cp.escape_unicode(),
                "adopting fallback face"
            );
            match self.collection.add(Style::Regular, entry) {
                Ok(index) => return Some(index),
                Err(error) => {
                    warn!(%error, "failed to adopt fallback face");
                    return None;
                },
            }
        }
        None
    }
}

fn entry_name<B: Backend>(entry: &Entry<B>) -> &str {
    match entry {
        Entry::FallbackDeferred(d) | Entry::Deferred(d) => d.name(),
        Entry::Loaded(f) | Entry::FallbackLoaded(f) => f.name(),
        Entry::Alias(_) => "<alias>",
    }
}
