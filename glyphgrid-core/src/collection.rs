//! Priority-ordered, per-style font lists with deferred loading, alias
//! entries, and style synthesis.

use glyphgrid_data::{
    FaceIndex, LoadFlags, ModifierSet, Presentation, PresentationMode, Special, Style,
};
use tracing::{debug, warn};

use crate::{
    backend::{Backend, DeferredLoad, RasterFace},
    config::SyntheticStyles,
    error::Error,
};

/// Everything needed to materialize a deferred face. Required whenever any
/// deferred entry exists in the collection.
#[derive(Debug, Clone)]
pub struct LoadOptions<L> {
    pub library: L,
    /// Size in points.
    pub size: f32,
    pub metric_modifiers: ModifierSet,
    pub flags: LoadFlags,
}

/// One slot in a collection.
///
/// The fallback variants carry the same payloads as their explicit
/// counterparts but match presentation more strictly: an explicitly
/// configured face is trusted with any glyph it has, while an
/// automatically added one must not hijack a codepoint whose default
/// presentation disagrees with what the face offers.
pub enum Entry<B: Backend> {
    /// Explicit face, not yet materialized.
    Deferred(B::Deferred),
    /// Explicit face, materialized.
    Loaded(B::Face),
    /// Automatically added face, not yet materialized.
    FallbackDeferred(B::Deferred),
    /// Automatically added face, materialized.
    FallbackLoaded(B::Face),
    /// Borrows another entry to satisfy a style without duplicating the
    /// face. The target is never itself an alias.
    Alias(FaceIndex),
}

impl<B: Backend> Entry<B> {
    fn is_deferred(&self) -> bool {
        matches!(self, Entry::Deferred(_) | Entry::FallbackDeferred(_))
    }

    fn name(&self) -> &str {
        match self {
            Entry::Deferred(d) | Entry::FallbackDeferred(d) => d.name(),
            Entry::Loaded(f) | Entry::FallbackLoaded(f) => f.name(),
            Entry::Alias(_) => "<alias>",
        }
    }
}

impl<B: Backend> std::fmt::Debug for Entry<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Entry::Deferred(d) => write!(f, "Deferred({})", d.name()),
            Entry::Loaded(face) => write!(f, "Loaded({})", face.name()),
            Entry::FallbackDeferred(d) => write!(f, "FallbackDeferred({})", d.name()),
            Entry::FallbackLoaded(face) => write!(f, "FallbackLoaded({})", face.name()),
            Entry::Alias(target) => write!(f, "Alias({target:?})"),
        }
    }
}

/// Ordered, per-style lists of faces.
///
/// Entries are append-only: indices handed out earlier stay valid and keep
/// referring to the same face for the collection's lifetime.
pub struct Collection<B: Backend> {
    styles: [Vec<Entry<B>>; Style::COUNT],
    load_options: Option<LoadOptions<B::Library>>,
}

impl<B: Backend> Collection<B> {
    pub fn new() -> Collection<B> {
        Collection {
            styles: Default::default(),
            load_options: None,
        }
    }

    pub fn new_with_load_options(options: LoadOptions<B::Library>) -> Collection<B> {
        Collection {
            styles: Default::default(),
            load_options: Some(options),
        }
    }

    pub fn load_options(&self) -> Option<&LoadOptions<B::Library>> {
        self.load_options.as_ref()
    }

    pub fn len(&self, style: Style) -> usize {
        self.styles[style.ordinal()].len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.iter().all(Vec::is_empty)
    }

    /// Appends an entry, returning its stable index.
    pub fn add(&mut self, style: Style, entry: Entry<B>) -> Result<FaceIndex, Error> {
        let list = &mut self.styles[style.ordinal()];
        if list.len() >= Special::START as usize {
            return Err(Error::CollectionFull(style));
        }
        if entry.is_deferred() && self.load_options.is_none() {
            return Err(Error::DeferredLoadingUnavailable);
        }
        debug!(style = ?style, index = list.len(), entry = ?entry, "adding collection entry");
        let index = FaceIndex::new(style, list.len() as u16);
        list.push(entry);
        Ok(index)
    }

    /// Follows at most one alias hop.
    fn resolve_alias(&self, index: FaceIndex) -> FaceIndex {
        match &self.styles[index.style().ordinal()][index.idx() as usize] {
            Entry::Alias(target) => *target,
            _ => index,
        }
    }

    /// Returns the face for an index, materializing a deferred entry on
    /// first touch. Aliases are followed transparently.
    ///
    /// Virtual indices have no face; asking for one is a caller bug
    /// surfaced as [`Error::SpecialHasNoFace`].
    pub fn get_face(&mut self, index: FaceIndex) -> Result<&mut B::Face, Error> {
        if index.special().is_some() {
            return Err(Error::SpecialHasNoFace(index));
        }
        let index = self.resolve_alias(index);
        let style = index.style().ordinal();
        let idx = index.idx() as usize;

        if self.styles[style][idx].is_deferred() {
            let options = self
                .load_options
                .as_ref()
                .ok_or(Error::DeferredLoadingUnavailable)?;
            let promoted = match &self.styles[style][idx] {
                Entry::Deferred(d) => Entry::Loaded(d.load(options)?),
                Entry::FallbackDeferred(d) => Entry::FallbackLoaded(d.load(options)?),
                _ => unreachable!("checked deferred above"),
            };
            debug!(index = ?index, face = promoted.name(), "materialized deferred face");
            self.styles[style][idx] = promoted;
        }

        match &mut self.styles[style][idx] {
            Entry::Loaded(face) | Entry::FallbackLoaded(face) => Ok(face),
            _ => unreachable!("deferred entries were promoted above"),
        }
    }

    /// First entry of a style that matches the codepoint under the given
    /// presentation mode. Never forces a load.
    pub fn get_index(
        &self,
        cp: char,
        style: Style,
        mode: PresentationMode,
    ) -> Option<FaceIndex> {
        self.styles[style.ordinal()]
            .iter()
            .position(|entry| self.entry_has_codepoint(entry, cp, mode))
            .map(|idx| FaceIndex::new(style, idx as u16))
    }

    /// Whether the entry at `index` matches the codepoint. Virtual indices
    /// never match here; the resolver handles the sprite face itself.
    pub fn has_codepoint(&self, index: FaceIndex, cp: char, mode: PresentationMode) -> bool {
        if index.special().is_some() {
            return false;
        }
        let Some(entry) = self.styles[index.style().ordinal()].get(index.idx() as usize) else {
            return false;
        };
        self.entry_has_codepoint(entry, cp, mode)
    }

    pub(crate) fn entry_has_codepoint(
        &self,
        entry: &Entry<B>,
        cp: char,
        mode: PresentationMode,
    ) -> bool {
        match entry {
            Entry::Alias(target) => self.has_codepoint(*target, cp, mode),
            Entry::Deferred(deferred) => match mode {
                PresentationMode::Explicit(p) => deferred.has_codepoint(cp, Some(p)),
                PresentationMode::Default(_) | PresentationMode::Any => {
                    deferred.has_codepoint(cp, None)
                },
            },
            Entry::FallbackDeferred(deferred) => match mode {
                PresentationMode::Explicit(p) | PresentationMode::Default(p) => {
                    deferred.has_codepoint(cp, Some(p))
                },
                PresentationMode::Any => deferred.has_codepoint(cp, None),
            },
            Entry::Loaded(face) => match mode {
                PresentationMode::Explicit(p) => face
                    .glyph_index(cp)
                    .is_some_and(|glyph| glyph_presentation(face, glyph) == p),
                PresentationMode::Default(_) | PresentationMode::Any => {
                    face.glyph_index(cp).is_some()
                },
            },
            Entry::FallbackLoaded(face) => match mode {
                PresentationMode::Explicit(p) | PresentationMode::Default(p) => face
                    .glyph_index(cp)
                    .is_some_and(|glyph| glyph_presentation(face, glyph) == p),
                PresentationMode::Any => face.glyph_index(cp).is_some(),
            },
        }
    }

    /// Ensures every style has at least one entry, preferring synthesis
    /// over aliasing.
    ///
    /// The anchor is the first regular face that is either monochrome or
    /// covers 'A' (a color-only emoji face makes a poor base for text
    /// styles). Bold-italic layers italic on an existing bold face when
    /// the user configured one, otherwise bold on the italic entry.
    pub fn complete_styles(&mut self, synthetic: SyntheticStyles) -> Result<(), Error> {
        let had_bold = !self.styles[Style::Bold.ordinal()].is_empty();
        let regular = self.find_regular_anchor()?;

        if self.styles[Style::Italic.ordinal()].is_empty() {
            let synthesized = if synthetic.italic {
                self.synthesize(regular, Style::Italic, Synthesis::Italic)
            } else {
                None
            };
            if synthesized.is_none() {
                debug!("italic unavailable, aliasing to regular");
                self.add(Style::Italic, Entry::Alias(regular))?;
            }
        }

        if self.styles[Style::Bold.ordinal()].is_empty() {
            let synthesized = if synthetic.bold {
                self.synthesize(regular, Style::Bold, Synthesis::Bold)
            } else {
                None
            };
            if synthesized.is_none() {
                debug!("bold unavailable, aliasing to regular");
                self.add(Style::Bold, Entry::Alias(regular))?;
            }
        }

        if self.styles[Style::BoldItalic.ordinal()].is_empty() {
            let synthesized = if synthetic.bold_italic {
                if had_bold {
                    let anchor = self.resolve_alias(FaceIndex::new(Style::Bold, 0));
                    self.synthesize(anchor, Style::BoldItalic, Synthesis::Italic)
                } else {
                    let anchor = self.resolve_alias(FaceIndex::new(Style::Italic, 0));
                    self.synthesize(anchor, Style::BoldItalic, Synthesis::Bold)
                }
            } else {
                None
            };
            if synthesized.is_none() {
                // unwrap once so aliases never point at aliases
                let target = self.resolve_alias(FaceIndex::new(Style::Italic, 0));
                debug!(target = ?target, "bold italic unavailable, aliasing to italic");
                self.add(Style::BoldItalic, Entry::Alias(target))?;
            }
        }

        Ok(())
    }

    fn find_regular_anchor(&mut self) -> Result<FaceIndex, Error> {
        for idx in 0..self.len(Style::Regular) {
            let index = FaceIndex::new(Style::Regular, idx as u16);
            let face = match self.get_face(index) {
                Ok(face) => face,
                Err(error) => {
                    warn!(index = ?index, %error, "skipping unloadable regular face");
                    continue;
                },
            };
            if !face.has_color() || face.glyph_index('A').is_some() {
                return Ok(index);
            }
        }
        Err(Error::DefaultUnavailable)
    }

    fn synthesize(
        &mut self,
        anchor: FaceIndex,
        target: Style,
        which: Synthesis,
    ) -> Option<FaceIndex> {
        let face = match self.get_face(anchor) {
            Ok(face) => face,
            Err(error) => {
                warn!(anchor = ?anchor, %error, "cannot load synthesis anchor");
                return None;
            },
        };
        let derived = match which {
            Synthesis::Bold => face.synthetic_bold(),
            Synthesis::Italic => face.synthetic_italic(),
        }?;
        debug!(anchor = ?anchor, target = ?target, kind = ?which, "synthesized style");
        match self.add(target, Entry::Loaded(derived)) {
            Ok(index) => Some(index),
            Err(error) => {
                warn!(target = ?target, %error, "failed to store synthesized face");
                None
            },
        }
    }

    /// Updates the load size and rescales every materialized face.
    pub fn set_size(&mut self, size: f32) -> Result<(), Error> {
        if let Some(options) = &mut self.load_options {
            options.size = size;
        }
        for list in &mut self.styles {
            for entry in list.iter_mut() {
                if let Entry::Loaded(face) | Entry::FallbackLoaded(face) = entry {
                    face.set_size(size)?;
                }
            }
        }
        Ok(())
    }
}

impl<B: Backend> Default for Collection<B> {
    fn default() -> Self {
        Self::new()
    }
}

fn glyph_presentation<F: RasterFace>(face: &F, glyph: u16) -> Presentation {
    if face.is_color_glyph(glyph) {
        Presentation::Emoji
    } else {
        Presentation::Text
    }
}

#[derive(Debug, Clone, Copy)]
enum Synthesis {
    Bold,
    Italic,
}
