//! Deterministic in-memory font backend for unit tests.
//!
//! Faces carry synthetic charsets with per-codepoint color flags, so
//! collection, resolver, and grid semantics are exercised without any font
//! file on disk.

use std::{cell::RefCell, collections::BTreeMap, ops::RangeInclusive};

use glyphgrid_data::{
    Atlas, FaceMetrics, Glyph, LoadFlags, ModifierSet, Presentation, RenderError, RenderOptions,
};
use rustc_hash::FxHashMap;

use crate::{
    backend::{Backend, DeferredLoad, Descriptor, Discover, FallbackRequest, RasterFace},
    collection::LoadOptions,
    error::Error,
};

#[derive(Debug, Clone)]
pub(crate) struct TestLibrary;

pub(crate) struct TestBackend;

impl Backend for TestBackend {
    type Library = TestLibrary;
    type Face = TestFace;
    type Deferred = TestDeferred;
}

pub(crate) fn load_options(size: f32) -> LoadOptions<TestLibrary> {
    LoadOptions {
        library: TestLibrary,
        size,
        metric_modifiers: ModifierSet::default(),
        flags: LoadFlags::empty(),
    }
}

/// A face over a synthetic charset; `true` marks a color glyph.
#[derive(Debug, Clone)]
pub(crate) struct TestFace {
    name: String,
    glyphs: BTreeMap<char, bool>,
    size: f32,
    can_synthesize: bool,
}

/// Printable-ASCII monochrome face.
pub(crate) fn ascii_face(name: &str) -> TestFace {
    TestFace::ascii(name)
}

/// Color face over the common emoji blocks.
pub(crate) fn emoji_face(name: &str) -> TestFace {
    TestFace::new(name, emoji_blocks(), true)
}

/// Monochrome face over the same emoji blocks.
pub(crate) fn text_emoji_face(name: &str) -> TestFace {
    TestFace::new(name, emoji_blocks(), false)
}

fn emoji_blocks() -> Vec<RangeInclusive<char>> {
    vec!['\u{2600}'..='\u{27BF}', '\u{1F300}'..='\u{1FAFF}']
}

impl TestFace {
    pub(crate) fn new(name: &str, ranges: Vec<RangeInclusive<char>>, color: bool) -> TestFace {
        TestFace {
            name: name.to_owned(),
            glyphs: ranges
                .into_iter()
                .flatten()
                .map(|cp| (cp, color))
                .collect(),
            size: 12.0,
            can_synthesize: true,
        }
    }

    pub(crate) fn ascii(name: &str) -> TestFace {
        TestFace::new(name, vec![' '..='~'], false)
    }

    pub(crate) fn with_chars(mut self, range: RangeInclusive<char>) -> TestFace {
        self.glyphs = range.map(|cp| (cp, false)).collect();
        self
    }

    pub(crate) fn no_synthesis(mut self) -> TestFace {
        self.can_synthesize = false;
        self
    }

    pub(crate) fn deferred(self) -> TestDeferred {
        TestDeferred { face: self }
    }

    pub(crate) fn size(&self) -> f32 {
        self.size
    }

    fn derive(&self, suffix: &str) -> Option<TestFace> {
        self.can_synthesize.then(|| TestFace {
            name: format!("{}-{suffix}", self.name),
            ..self.clone()
        })
    }
}

impl RasterFace for TestFace {
    fn glyph_index(&self, cp: char) -> Option<u16> {
        self.glyphs
            .keys()
            .position(|&c| c == cp)
            .map(|idx| (idx + 1) as u16)
    }

    fn is_color_glyph(&self, glyph: u16) -> bool {
        glyph
            .checked_sub(1)
            .and_then(|idx| self.glyphs.values().nth(idx as usize))
            .copied()
            .unwrap_or(false)
    }

    fn has_color(&self) -> bool {
        self.glyphs.values().any(|&color| color)
    }

    fn metrics(&self) -> FaceMetrics {
        FaceMetrics {
            cell_width: 8.0,
            ascent: 12.0,
            descent: -4.0,
            line_gap: 0.0,
            underline_position: Some(-2.0),
            underline_thickness: Some(2.0),
            strikethrough_position: Some(4.0),
            strikethrough_thickness: Some(2.0),
            cap_height: Some(9.0),
            ex_height: Some(6.0),
        }
    }

    fn set_size(&mut self, size: f32) -> Result<(), Error> {
        self.size = size;
        Ok(())
    }

    fn render_glyph(
        &mut self,
        atlas: &mut Atlas,
        _glyph: u16,
        _options: RenderOptions,
    ) -> Result<Glyph, RenderError> {
        // fixed 8x8 bitmap with a 1px transparent border
        let region = atlas.reserve(10, 10)?;
        let depth = atlas.format().depth();
        let mut pixels = vec![0u8; 100 * depth];
        for y in 1..9usize {
            for x in 1..9usize {
                for byte in 0..depth {
                    pixels[(y * 10 + x) * depth + byte] = 0xFF;
                }
            }
        }
        atlas.write(&region, &pixels);
        Ok(Glyph {
            width: 8,
            height: 8,
            offset_x: 0,
            offset_y: 8,
            atlas_x: region.x + 1,
            atlas_y: region.y + 1,
            advance_x: 8.0,
        })
    }

    fn synthetic_bold(&self) -> Option<TestFace> {
        self.derive("bold")
    }

    fn synthetic_italic(&self) -> Option<TestFace> {
        self.derive("italic")
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone)]
pub(crate) struct TestDeferred {
    face: TestFace,
}

impl DeferredLoad for TestDeferred {
    type Library = TestLibrary;
    type Face = TestFace;

    fn name(&self) -> &str {
        &self.face.name
    }

    fn has_codepoint(&self, cp: char, presentation: Option<Presentation>) -> bool {
        self.face.glyphs.contains_key(&cp)
            && presentation.is_none_or(|p| p == self.presentation())
    }

    fn presentation(&self) -> Presentation {
        if self.face.has_color() {
            Presentation::Emoji
        } else {
            Presentation::Text
        }
    }

    fn load(&self, options: &LoadOptions<TestLibrary>) -> Result<TestFace, Error> {
        let mut face = self.face.clone();
        face.size = options.size;
        Ok(face)
    }
}

thread_local! {
    /// Installed-font universe served by `TestDiscover::init`.
    static INSTALLED: RefCell<Vec<(String, TestFace)>> = const { RefCell::new(Vec::new()) };
}

/// Replaces the simulated system font installation for this thread.
pub(crate) fn install_test_fonts(fonts: Vec<(&str, TestFace)>) {
    INSTALLED.with(|cell| {
        *cell.borrow_mut() = fonts
            .into_iter()
            .map(|(name, face)| (name.to_owned(), face))
            .collect();
    });
}

#[derive(Debug, Default)]
pub(crate) struct TestDiscover {
    by_family: FxHashMap<String, TestDeferred>,
    fallbacks: Vec<TestDeferred>,
}

impl TestDiscover {
    pub(crate) fn with_family(mut self, family: &str, deferred: TestDeferred) -> TestDiscover {
        self.by_family.insert(family.to_owned(), deferred);
        self
    }

    pub(crate) fn with_fallback(mut self, deferred: TestDeferred) -> TestDiscover {
        self.fallbacks.push(deferred);
        self
    }
}

impl Discover<TestBackend> for TestDiscover {
    fn init() -> Result<TestDiscover, Error> {
        let mut discover = TestDiscover::default();
        INSTALLED.with(|cell| {
            for (name, face) in cell.borrow().iter() {
                discover.by_family.insert(name.clone(), face.clone().deferred());
            }
        });
        Ok(discover)
    }

    fn discover(&self, descriptor: &Descriptor) -> Result<Vec<TestDeferred>, Error> {
        let found = if let Some(family) = &descriptor.family {
            self.by_family.get(family.as_str())
        } else if descriptor.monospace == Some(true) {
            self.by_family.get("monospace")
        } else {
            None
        };
        Ok(found
            .filter(|deferred| {
                descriptor
                    .codepoint
                    .is_none_or(|cp| deferred.has_codepoint(cp, None))
            })
            .cloned()
            .into_iter()
            .collect())
    }

    fn fallback(&self, _request: &FallbackRequest) -> Result<Vec<TestDeferred>, Error> {
        Ok(self.fallbacks.clone())
    }
}
