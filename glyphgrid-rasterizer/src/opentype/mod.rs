//! Minimal OpenType table parsing.
//!
//! swash owns charmaps and outlines; this module reads the handful of
//! binary tables the engine consumes directly: font-wide metrics (`head`,
//! `hhea`, `hmtx`, `OS/2`, `post`) and color coverage (`SVG`, `COLR`, plus
//! presence checks for the bitmap color tables). All reads are big-endian
//! and bounds-checked; a malformed table parses to `None` rather than
//! panicking.

mod head;
mod hhea;
mod hmtx;
mod os2;
mod post;
mod svg;

pub use head::Head;
pub use hhea::Hhea;
pub use hmtx::Hmtx;
pub use os2::{Os2, Selection};
pub use post::Post;
pub use svg::{Colr, Svg};

/// Big-endian cursor over a table slice.
pub(crate) struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Reader<'a> {
        Reader { data, pos: 0 }
    }

    pub(crate) fn at(data: &'a [u8], pos: usize) -> Reader<'a> {
        Reader { data, pos }
    }

    pub(crate) fn skip(&mut self, bytes: usize) {
        self.pos = self.pos.saturating_add(bytes);
    }

    pub(crate) fn read_u16(&mut self) -> Option<u16> {
        let bytes = self.data.get(self.pos..self.pos + 2)?;
        self.pos += 2;
        Some(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub(crate) fn read_i16(&mut self) -> Option<i16> {
        self.read_u16().map(|v| v as i16)
    }

    pub(crate) fn read_u32(&mut self) -> Option<u32> {
        let bytes = self.data.get(self.pos..self.pos + 4)?;
        self.pos += 4;
        Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

const TTC_TAG: u32 = u32::from_be_bytes(*b"ttcf");
const SFNT_TRUETYPE: u32 = 0x0001_0000;
const SFNT_OPENTYPE: u32 = u32::from_be_bytes(*b"OTTO");
const SFNT_APPLE: u32 = u32::from_be_bytes(*b"true");

/// The parsed tables of one face within a font file.
#[derive(Debug, Default)]
pub struct Tables {
    pub head: Option<Head>,
    pub hhea: Option<Hhea>,
    pub hmtx: Option<Hmtx>,
    pub os2: Option<Os2>,
    pub post: Option<Post>,
    pub svg: Option<Svg>,
    pub colr: Option<Colr>,
    /// Embedded color bitmap tables; per-glyph coverage is not parsed, so
    /// their presence marks the whole face as color.
    pub has_cbdt: bool,
    pub has_sbix: bool,
}

impl Tables {
    /// Parses face `index` of a font file (plain sfnt or collection).
    pub fn parse(data: &[u8], index: u32) -> Option<Tables> {
        let directory = table_directory(data, index)?;
        let mut tables = Tables::default();
        let mut hmtx_range = None;
        let mut num_h_metrics = 0;

        for (tag, table) in &directory {
            match tag {
                b"head" => tables.head = Head::parse(slice(data, table)?),
                b"hhea" => tables.hhea = Hhea::parse(slice(data, table)?),
                b"hmtx" => hmtx_range = Some(*table),
                b"OS/2" => tables.os2 = Os2::parse(slice(data, table)?),
                b"post" => tables.post = Post::parse(slice(data, table)?),
                b"SVG " => tables.svg = Svg::parse(slice(data, table)?),
                b"COLR" => tables.colr = Colr::parse(slice(data, table)?),
                b"CBDT" => tables.has_cbdt = true,
                b"sbix" => tables.has_sbix = true,
                _ => {},
            }
            if let Some(hhea) = &tables.hhea {
                num_h_metrics = hhea.number_of_h_metrics;
            }
        }

        // hmtx needs hhea's metric count, so it parses last
        if let Some(range) = hmtx_range {
            tables.hmtx = Hmtx::parse(slice(data, &range)?, num_h_metrics);
        }
        Some(tables)
    }

    /// Whether any color glyph table is present.
    pub fn has_color(&self) -> bool {
        self.colr.is_some() || self.svg.is_some() || self.has_cbdt || self.has_sbix
    }

    /// Whether a specific glyph renders in color.
    pub fn is_color_glyph(&self, glyph: u16) -> bool {
        if self.colr.as_ref().is_some_and(|colr| colr.contains(glyph)) {
            return true;
        }
        if self.svg.as_ref().is_some_and(|svg| svg.contains(glyph)) {
            return true;
        }
        self.has_cbdt || self.has_sbix
    }
}

/// Cheap color check for deferred faces: table presence only, no metric
/// parsing.
pub fn has_color_tables(data: &[u8], index: u32) -> bool {
    table_directory(data, index).is_some_and(|directory| {
        directory
            .iter()
            .any(|(tag, _)| matches!(tag, b"COLR" | b"SVG " | b"CBDT" | b"sbix"))
    })
}

fn slice<'a>(data: &'a [u8], range: &(u32, u32)) -> Option<&'a [u8]> {
    let start = range.0 as usize;
    let end = start.checked_add(range.1 as usize)?;
    data.get(start..end)
}

/// Resolves the sfnt table directory for face `index`, following a `ttcf`
/// header when present. Returns (tag, (offset, length)) records.
fn table_directory(data: &[u8], index: u32) -> Option<Vec<([u8; 4], (u32, u32))>> {
    let mut reader = Reader::new(data);
    let mut tag = reader.read_u32()?;

    if tag == TTC_TAG {
        reader.skip(4); // version
        let num_fonts = reader.read_u32()?;
        if index >= num_fonts {
            return None;
        }
        reader.skip(index as usize * 4);
        let offset = reader.read_u32()? as usize;
        reader = Reader::at(data, offset);
        tag = reader.read_u32()?;
    } else if index != 0 {
        return None;
    }

    if !matches!(tag, SFNT_TRUETYPE | SFNT_OPENTYPE | SFNT_APPLE) {
        return None;
    }

    let num_tables = reader.read_u16()?;
    reader.skip(6); // searchRange, entrySelector, rangeShift

    let mut directory = Vec::with_capacity(num_tables as usize);
    for _ in 0..num_tables {
        let tag = reader.read_u32()?.to_be_bytes();
        reader.skip(4); // checksum
        let offset = reader.read_u32()?;
        let length = reader.read_u32()?;
        directory.push((tag, (offset, length)));
    }
    Some(directory)
}

#[cfg(test)]
pub(crate) mod testdata {
    /// Assembles a plain sfnt font from (tag, table bytes) pairs.
    pub(crate) fn build_sfnt(tables: &[(&[u8; 4], Vec<u8>)]) -> Vec<u8> {
        let mut font = Vec::new();
        font.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        font.extend_from_slice(&(tables.len() as u16).to_be_bytes());
        font.extend_from_slice(&[0; 6]);

        let mut offset = 12 + 16 * tables.len() as u32;
        for (tag, data) in tables {
            font.extend_from_slice(*tag);
            font.extend_from_slice(&[0; 4]);
            font.extend_from_slice(&offset.to_be_bytes());
            font.extend_from_slice(&(data.len() as u32).to_be_bytes());
            offset += data.len() as u32;
        }
        for (_, data) in tables {
            font.extend_from_slice(data);
        }
        font
    }
}

#[cfg(test)]
mod tests {
    use super::{testdata::build_sfnt, *};

    #[test]
    fn parses_directory_of_plain_font() {
        let font = build_sfnt(&[(b"head", vec![0; 54]), (b"post", vec![0; 32])]);
        let directory = table_directory(&font, 0).unwrap();
        assert_eq!(directory.len(), 2);
        assert_eq!(&directory[0].0, b"head");
        assert_eq!(&directory[1].0, b"post");
        // non-zero index invalid for a plain font
        assert!(table_directory(&font, 1).is_none());
    }

    #[test]
    fn parses_collection_by_index(){
        let inner = build_sfnt(&[(b"CBDT", vec![0; 4])]);
        // ttc header pointing both entries at the same inner font
        let mut ttc = Vec::new();
        ttc.extend_from_slice(b"ttcf");
        ttc.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        ttc.extend_from_slice(&2u32.to_be_bytes());
        let base = 12 + 8;
        ttc.extend_from_slice(&(base as u32).to_be_bytes());
        ttc.extend_from_slice(&(base as u32).to_be_bytes());
        ttc.extend_from_slice(&inner);

        assert!(has_color_tables(&ttc, 0));
        assert!(has_color_tables(&ttc, 1));
        assert!(!has_color_tables(&ttc, 2));
    }

    #[test]
    fn truncated_font_parses_to_none() {
        assert!(table_directory(&[0x00, 0x01], 0).is_none());
        assert!(Tables::parse(&[], 0).is_none());
    }

    #[test]
    fn color_table_presence() {
        let plain = build_sfnt(&[(b"head", vec![0; 54])]);
        assert!(!has_color_tables(&plain, 0));
        let color = build_sfnt(&[(b"sbix", vec![0; 4])]);
        assert!(has_color_tables(&color, 0));
    }

    #[test]
    fn cbdt_marks_every_glyph_color() {
        let font = build_sfnt(&[(b"CBDT", vec![0; 4])]);
        let tables = Tables::parse(&font, 0).unwrap();
        assert!(tables.has_color());
        assert!(tables.is_color_glyph(0));
        assert!(tables.is_color_glyph(4711));
    }
}
