//! The seam between the resolution core and a font engine.
//!
//! The collection, resolver, and grid are generic over a [`Backend`], which
//! bundles the engine's library handle, loaded face, and deferred face
//! types. The production backend lives in `glyphgrid-rasterizer`; tests use
//! an in-memory one.

use compact_str::CompactString;
use glyphgrid_data::{Atlas, FaceMetrics, Glyph, Presentation, RenderError, RenderOptions};

use crate::{collection::LoadOptions, error::Error};

/// A loaded font face at a fixed size.
pub trait RasterFace: Sized {
    /// Font-internal glyph id for a codepoint, if the face covers it.
    fn glyph_index(&self, cp: char) -> Option<u16>;

    /// Whether a specific glyph renders in color. Per-glyph because one
    /// face may mix monochrome and color glyphs.
    fn is_color_glyph(&self, glyph: u16) -> bool;

    /// Whether the face carries any color glyph table.
    fn has_color(&self) -> bool;

    /// Face-level presentation: color faces present as emoji.
    fn presentation(&self) -> Presentation {
        if self.has_color() {
            Presentation::Emoji
        } else {
            Presentation::Text
        }
    }

    fn metrics(&self) -> FaceMetrics;

    /// Rescales the face. Glyph ids remain valid.
    fn set_size(&mut self, size: f32) -> Result<(), Error>;

    /// Rasterizes a glyph into `atlas` and returns its placement.
    fn render_glyph(
        &mut self,
        atlas: &mut Atlas,
        glyph: u16,
        options: RenderOptions,
    ) -> Result<Glyph, RenderError>;

    /// Derives an emboldened variant, when the engine supports it.
    fn synthetic_bold(&self) -> Option<Self>;

    /// Derives a slanted variant, when the engine supports it.
    fn synthetic_italic(&self) -> Option<Self>;

    /// Human-readable face name, for logging.
    fn name(&self) -> &str;
}

/// A discovered face that has not been materialized.
///
/// Backends with coverage metadata (charsets, language sets) answer
/// [`DeferredLoad::has_codepoint`] without touching the font file; loading
/// happens once, on first use.
pub trait DeferredLoad: Clone {
    type Library;
    type Face: RasterFace;

    fn name(&self) -> &str;

    /// Coverage query. When `presentation` is given, the face's own
    /// presentation must match it.
    fn has_codepoint(&self, cp: char, presentation: Option<Presentation>) -> bool;

    /// Presentation derived from discovery metadata.
    fn presentation(&self) -> Presentation;

    /// Materializes the face. Idempotent per descriptor.
    fn load(&self, options: &LoadOptions<Self::Library>) -> Result<Self::Face, Error>;
}

/// Type bundle tying a font engine's pieces together.
pub trait Backend: 'static {
    type Library: Clone + Send + Sync;
    type Face: RasterFace + Send + Sync;
    type Deferred: DeferredLoad<Library = Self::Library, Face = Self::Face> + Send + Sync;
}

/// Search criteria handed to the discovery backend.
#[derive(Debug, Clone, Default)]
pub struct Descriptor {
    pub family: Option<CompactString>,
    pub style_name: Option<CompactString>,
    /// Size in points; discovery may use it to pick optical sizes.
    pub size: Option<f32>,
    /// Restrict to faces covering this codepoint.
    pub codepoint: Option<char>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub monospace: Option<bool>,
    pub variations: Vec<Variation>,
}

// Descriptors key the resolver's cache, so equality and hashing are
// structural; floats compare and hash by bit pattern.
impl PartialEq for Descriptor {
    fn eq(&self, other: &Self) -> bool {
        self.family == other.family
            && self.style_name == other.style_name
            && self.size.map(f32::to_bits) == other.size.map(f32::to_bits)
            && self.codepoint == other.codepoint
            && self.bold == other.bold
            && self.italic == other.italic
            && self.monospace == other.monospace
            && self.variations == other.variations
    }
}

impl Eq for Descriptor {}

impl std::hash::Hash for Descriptor {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.family.hash(state);
        self.style_name.hash(state);
        self.size.map(f32::to_bits).hash(state);
        self.codepoint.hash(state);
        self.bold.hash(state);
        self.italic.hash(state);
        self.monospace.hash(state);
        self.variations.hash(state);
    }
}

/// A variation axis setting, e.g. `wght` 700.
#[derive(Debug, Clone, Copy)]
pub struct Variation {
    pub tag: [u8; 4],
    pub value: f32,
}

impl PartialEq for Variation {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.value.to_bits() == other.value.to_bits()
    }
}

impl Eq for Variation {}

impl std::hash::Hash for Variation {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.tag.hash(state);
        self.value.to_bits().hash(state);
    }
}

/// Criteria for a last-resort fallback search over every installed font.
#[derive(Debug, Clone, Copy)]
pub struct FallbackRequest {
    pub codepoint: char,
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
    /// Prefer monospaced candidates; discovery orders, it does not filter.
    pub monospace: bool,
}

/// Font enumeration backend.
///
/// Candidates come back as deferred faces so the resolver can verify
/// coverage and presentation before anything is loaded.
pub trait Discover<B: Backend>: Send + Sync {
    /// Builds the discovery handle. Called lazily, once per process, since
    /// some platform backends cannot be re-initialized.
    fn init() -> Result<Self, Error>
    where
        Self: Sized;

    /// Faces matching a descriptor, best match first.
    fn discover(&self, descriptor: &Descriptor) -> Result<Vec<B::Deferred>, Error>;

    /// Candidates for a codepoint the configured faces cannot render,
    /// best match first.
    fn fallback(&self, request: &FallbackRequest) -> Result<Vec<B::Deferred>, Error>;
}
