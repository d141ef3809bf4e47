//! Grid-defining configuration, as plain types.
//!
//! Parsing user configuration is the embedder's job; everything here is
//! already structured. The full value set participates in the
//! [`crate::GridKey`] fingerprint, so identical configurations share one
//! grid.

use compact_str::CompactString;
use glyphgrid_data::{LoadFlags, ModifierSet, Style};

use crate::{backend::Variation, resolver::CodepointMap};

/// Per-style face selection: engine default, a named style, or disabled.
///
/// A disabled style resolves as regular, which keeps cell metrics stable
/// for users who dislike styled faces with different advances.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum StylePreference {
    #[default]
    Default,
    Named(CompactString),
    Disabled,
}

/// Which missing styles may be synthesized from a real face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SyntheticStyles {
    pub bold: bool,
    pub italic: bool,
    pub bold_italic: bool,
}

impl SyntheticStyles {
    pub const fn none() -> SyntheticStyles {
        SyntheticStyles { bold: false, italic: false, bold_italic: false }
    }
}

impl Default for SyntheticStyles {
    fn default() -> Self {
        SyntheticStyles { bold: true, italic: true, bold_italic: true }
    }
}

/// Everything that defines a glyph grid.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridConfig {
    /// Ordered family lists, one per style. Earlier entries win.
    pub family: Vec<CompactString>,
    pub family_bold: Vec<CompactString>,
    pub family_italic: Vec<CompactString>,
    pub family_bold_italic: Vec<CompactString>,

    pub style: StylePreference,
    pub style_bold: StylePreference,
    pub style_italic: StylePreference,
    pub style_bold_italic: StylePreference,

    /// Size in points.
    pub size: f32,
    pub variations: Vec<Variation>,
    pub codepoint_map: CodepointMap,
    pub synthetic: SyntheticStyles,
    pub load_flags: LoadFlags,
    pub metric_modifiers: ModifierSet,
}

impl GridConfig {
    pub fn new(size: f32) -> GridConfig {
        GridConfig { size, ..Default::default() }
    }

    pub fn families(&self, style: Style) -> &[CompactString] {
        match style {
            Style::Regular => &self.family,
            Style::Bold => &self.family_bold,
            Style::Italic => &self.family_italic,
            Style::BoldItalic => &self.family_bold_italic,
        }
    }

    pub fn style_preference(&self, style: Style) -> &StylePreference {
        match style {
            Style::Regular => &self.style,
            Style::Bold => &self.style_bold,
            Style::Italic => &self.style_italic,
            Style::BoldItalic => &self.style_bold_italic,
        }
    }
}
