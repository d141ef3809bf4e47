//! System font discovery over fontdb.
//!
//! fontdb exposes no fontconfig-style language sets, so presentation
//! metadata is derived at discovery time from color table presence: a
//! face carrying color glyph tables presents as emoji. That agrees with
//! the per-glyph color rule applied once a face is loaded, so deferred
//! and loaded verdicts never disagree.

use fontdb::{Family, Query, Stretch, Weight};
use glyphgrid_core::{Descriptor, Discover, Error, FallbackRequest};
use glyphgrid_data::Presentation;
use swash::FontRef;
use tracing::{debug, info};

use crate::{
    SwashBackend,
    deferred::{Charset, DeferredFont},
    opentype,
};

/// Candidates examined per fallback search before giving up; keeps a miss
/// over a huge installation from building hundreds of charsets.
const FALLBACK_CANDIDATE_LIMIT: usize = 16;

/// Discovery over the platform's installed fonts.
///
/// Initialized lazily and exactly once per process; some platform font
/// backends cannot be re-initialized.
pub struct SystemFonts {
    db: fontdb::Database,
}

impl SystemFonts {
    /// Wraps an existing database, e.g. one pre-loaded with bundled fonts.
    pub fn with_database(db: fontdb::Database) -> SystemFonts {
        SystemFonts { db }
    }

    pub fn database(&self) -> &fontdb::Database {
        &self.db
    }

    /// Builds a deferred face for a database entry: family metadata plus a
    /// charset and color flag read from the mapped font file, without
    /// constructing a scaler.
    fn deferred(&self, id: fontdb::ID, variations: &[glyphgrid_core::Variation]) -> Option<DeferredFont> {
        let info = self.db.face(id)?;
        let family = info
            .families
            .first()
            .map_or(info.post_script_name.as_str(), |(name, _)| name.as_str());

        let (charset, has_color) = self
            .db
            .with_face_data(id, |data, index| {
                let font = FontRef::from_index(data, index as usize)?;
                let mut codepoints = Vec::new();
                font.charmap().enumerate(|cp, glyph| {
                    if glyph != 0 {
                        codepoints.push(cp);
                    }
                });
                Some((
                    Charset::from_codepoints(codepoints),
                    opentype::has_color_tables(data, index),
                ))
            })
            .flatten()?;

        let presentation = if has_color {
            Presentation::Emoji
        } else {
            Presentation::Text
        };
        Some(DeferredFont::new(
            family,
            info.source.clone(),
            info.index,
            charset,
            presentation,
            variations.to_vec(),
        ))
    }

    fn covers(&self, id: fontdb::ID, cp: char) -> bool {
        self.db
            .with_face_data(id, |data, index| {
                FontRef::from_index(data, index as usize)
                    .is_some_and(|font| font.charmap().map(cp) != 0)
            })
            .unwrap_or(false)
    }

    /// Style-name lookup: fontdb queries match by attributes only, so a
    /// named style filters the family's faces by PostScript name.
    fn by_style_name(&self, family: &str, style_name: &str) -> Option<fontdb::ID> {
        let needle: String = style_name
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        self.db
            .faces()
            .find(|info| {
                info.families.iter().any(|(name, _)| name == family)
                    && info.post_script_name.to_lowercase().contains(&needle)
            })
            .map(|info| info.id)
    }
}

impl Discover<SwashBackend> for SystemFonts {
    fn init() -> Result<SystemFonts, Error> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        info!(faces = db.faces().count(), "system font database loaded");
        Ok(SystemFonts { db })
    }

    fn discover(&self, descriptor: &Descriptor) -> Result<Vec<DeferredFont>, Error> {
        let id = match (&descriptor.family, &descriptor.style_name) {
            (Some(family), Some(style_name)) => self.by_style_name(family, style_name),
            _ => {
                let mut families = Vec::new();
                if let Some(family) = &descriptor.family {
                    families.push(Family::Name(family));
                } else if descriptor.monospace == Some(true) {
                    families.push(Family::Monospace);
                } else {
                    return Ok(Vec::new());
                }
                self.db.query(&Query {
                    families: &families,
                    weight: if descriptor.bold == Some(true) {
                        Weight::BOLD
                    } else {
                        Weight::NORMAL
                    },
                    stretch: Stretch::Normal,
                    style: if descriptor.italic == Some(true) {
                        fontdb::Style::Italic
                    } else {
                        fontdb::Style::Normal
                    },
                })
            },
        };

        let Some(id) = id else {
            debug!(?descriptor, "no face matches descriptor");
            return Ok(Vec::new());
        };

        Ok(self
            .deferred(id, &descriptor.variations)
            .filter(|face| {
                descriptor
                    .codepoint
                    .is_none_or(|cp| face.charset().contains(cp))
            })
            .into_iter()
            .collect())
    }

    fn fallback(&self, request: &FallbackRequest) -> Result<Vec<DeferredFont>, Error> {
        // Monospaced faces first, then name order for determinism.
        let mut ids: Vec<(bool, String, fontdb::ID)> = self
            .db
            .faces()
            .map(|info| {
                let family = info
                    .families
                    .first()
                    .map_or(info.post_script_name.clone(), |(name, _)| name.clone());
                (!info.monospaced, family, info.id)
            })
            .collect();
        ids.sort_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)));

        let mut candidates = Vec::new();
        let mut examined = 0usize;
        for (_, _, id) in ids {
            if candidates.len() >= FALLBACK_CANDIDATE_LIMIT {
                debug!(
                    codepoint = %request.codepoint.escape_unicode(),
                    limit = FALLBACK_CANDIDATE_LIMIT,
                    "fallback candidate limit reached"
                );
                break;
            }
            if !self.covers(id, request.codepoint) {
                continue;
            }
            examined += 1;
            if let Some(face) = self.deferred(id, &[]) {
                candidates.push(face);
            }
        }

        debug!(
            codepoint = %request.codepoint.escape_unicode(),
            examined,
            candidates = candidates.len(),
            "fallback search finished"
        );
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opentype::testdata::build_sfnt;

    // Bytes that are not a usable font must not panic anywhere in the
    // discovery paths, whether fontdb rejects them outright or they
    // survive to the coverage check.
    fn junk_database() -> fontdb::Database {
        let mut db = fontdb::Database::new();
        db.load_font_data(build_sfnt(&[(b"head", vec![0; 54])]));
        db
    }

    #[test]
    fn fallback_over_unparseable_faces_is_empty() {
        let fonts = SystemFonts::with_database(junk_database());
        let request = FallbackRequest {
            codepoint: 'A',
            size: 12.0,
            bold: false,
            italic: false,
            monospace: true,
        };
        assert!(fonts.fallback(&request).unwrap().is_empty());
    }

    #[test]
    fn discover_without_criteria_is_empty() {
        let fonts = SystemFonts::with_database(fontdb::Database::new());
        assert!(fonts.discover(&Descriptor::default()).unwrap().is_empty());
    }

    #[test]
    fn discover_unknown_family_is_empty() {
        let fonts = SystemFonts::with_database(fontdb::Database::new());
        let descriptor = Descriptor {
            family: Some("No Such Family".into()),
            ..Default::default()
        };
        assert!(fonts.discover(&descriptor).unwrap().is_empty());
    }
}
