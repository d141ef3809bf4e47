//! Deferred faces: enough metadata to answer coverage queries without
//! loading the font file.

use std::sync::Arc;

use compact_str::CompactString;
use glyphgrid_core::{DeferredLoad, Error, LoadOptions, Variation};
use glyphgrid_data::Presentation;

use crate::{face::FontFace, library::FontLibrary};

/// Compact codepoint coverage set: sorted, disjoint, inclusive ranges.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Charset {
    ranges: Vec<(u32, u32)>,
}

impl Charset {
    /// Builds a charset from arbitrary codepoints; duplicates and ordering
    /// don't matter.
    pub fn from_codepoints(mut codepoints: Vec<u32>) -> Charset {
        codepoints.sort_unstable();
        codepoints.dedup();

        let mut ranges: Vec<(u32, u32)> = Vec::new();
        for cp in codepoints {
            match ranges.last_mut() {
                Some((_, end)) if *end + 1 == cp => *end = cp,
                _ => ranges.push((cp, cp)),
            }
        }
        Charset { ranges }
    }

    pub fn contains(&self, cp: char) -> bool {
        let cp = cp as u32;
        self.ranges
            .binary_search_by(|&(start, end)| {
                if end < cp {
                    std::cmp::Ordering::Less
                } else if start > cp {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    pub fn len(&self) -> usize {
        self.ranges
            .iter()
            .map(|&(start, end)| (end - start + 1) as usize)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// A discovered face: source location plus the coverage and presentation
/// metadata needed for matching, materialized into a [`FontFace`] on first
/// use.
#[derive(Debug, Clone)]
pub struct DeferredFont {
    family: CompactString,
    source: fontdb::Source,
    index: u32,
    charset: Arc<Charset>,
    /// Derived at discovery time: faces carrying color glyph tables
    /// present as emoji, everything else as text.
    presentation: Presentation,
    variations: Vec<Variation>,
}

impl DeferredFont {
    pub fn new(
        family: &str,
        source: fontdb::Source,
        index: u32,
        charset: Charset,
        presentation: Presentation,
        variations: Vec<Variation>,
    ) -> DeferredFont {
        DeferredFont {
            family: family.into(),
            source,
            index,
            charset: Arc::new(charset),
            presentation,
            variations,
        }
    }

    pub fn charset(&self) -> &Charset {
        &self.charset
    }

    fn read_source(&self) -> Result<Vec<u8>, Error> {
        match &self.source {
            fontdb::Source::Binary(data) => Ok(data.as_ref().as_ref().to_vec()),
            fontdb::Source::File(path) | fontdb::Source::SharedFile(path, _) => {
                std::fs::read(path)
                    .map_err(|e| Error::Load(format!("{}: {e}", path.display())))
            },
        }
    }
}

impl DeferredLoad for DeferredFont {
    type Library = FontLibrary;
    type Face = FontFace;

    fn name(&self) -> &str {
        &self.family
    }

    fn has_codepoint(&self, cp: char, presentation: Option<Presentation>) -> bool {
        self.charset.contains(cp) && presentation.is_none_or(|p| p == self.presentation)
    }

    fn presentation(&self) -> Presentation {
        self.presentation
    }

    fn load(&self, options: &LoadOptions<FontLibrary>) -> Result<FontFace, Error> {
        tracing::debug!(family = %self.family, index = self.index, "loading deferred face");
        let data = self.read_source()?;
        FontFace::from_data(
            options.library.clone(),
            data,
            self.index,
            &self.family,
            self.variations.clone(),
            options,
        )
    }
}
