use super::Reader;

/// Glyph coverage of the `SVG ` table: the document list's glyph id ranges,
/// kept sorted for binary search. Document payloads are not parsed; the
/// engine only asks "does this glyph have an SVG rendition".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Svg {
    ranges: Vec<(u16, u16)>,
}

impl Svg {
    pub(crate) fn parse(data: &[u8]) -> Option<Svg> {
        let mut reader = Reader::new(data);
        let _version = reader.read_u16()?;
        let list_offset = reader.read_u32()? as usize;

        let mut reader = Reader::at(data, list_offset);
        let num_entries = reader.read_u16()?;
        let mut ranges = Vec::with_capacity(num_entries as usize);
        for _ in 0..num_entries {
            let start = reader.read_u16()?;
            let end = reader.read_u16()?;
            reader.read_u32()?; // svgDocOffset
            reader.read_u32()?; // svgDocLength
            ranges.push((start, end));
        }
        ranges.sort_unstable();
        Some(Svg { ranges })
    }

    pub fn contains(&self, glyph: u16) -> bool {
        self.ranges
            .binary_search_by(|&(start, end)| {
                if end < glyph {
                    std::cmp::Ordering::Less
                } else if start > glyph {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }
}

/// Glyph coverage of the `COLR` table (version 0 base glyph records).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Colr {
    base_glyphs: Vec<u16>,
}

impl Colr {
    pub(crate) fn parse(data: &[u8]) -> Option<Colr> {
        let mut reader = Reader::new(data);
        let _version = reader.read_u16()?;
        let num_base_records = reader.read_u16()?;
        let records_offset = reader.read_u32()? as usize;

        let mut reader = Reader::at(data, records_offset);
        let mut base_glyphs = Vec::with_capacity(num_base_records as usize);
        for _ in 0..num_base_records {
            base_glyphs.push(reader.read_u16()?);
            reader.read_u16()?; // firstLayerIndex
            reader.read_u16()?; // numLayers
        }
        base_glyphs.sort_unstable();
        Some(Colr { base_glyphs })
    }

    pub fn contains(&self, glyph: u16) -> bool {
        self.base_glyphs.binary_search(&glyph).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn svg_table(ranges: &[(u16, u16)]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&0u16.to_be_bytes());
        data.extend_from_slice(&10u32.to_be_bytes()); // list offset
        data.extend_from_slice(&[0; 4]); // reserved
        data.extend_from_slice(&(ranges.len() as u16).to_be_bytes());
        for &(start, end) in ranges {
            data.extend_from_slice(&start.to_be_bytes());
            data.extend_from_slice(&end.to_be_bytes());
            data.extend_from_slice(&[0; 8]);
        }
        data
    }

    #[test]
    fn svg_coverage_uses_binary_search() {
        // deliberately unsorted on disk
        let svg = Svg::parse(&svg_table(&[(300, 310), (10, 20), (100, 100)])).unwrap();
        assert!(svg.contains(10));
        assert!(svg.contains(15));
        assert!(svg.contains(20));
        assert!(svg.contains(100));
        assert!(svg.contains(305));
        assert!(!svg.contains(9));
        assert!(!svg.contains(21));
        assert!(!svg.contains(99));
        assert!(!svg.contains(311));
    }

    #[test]
    fn svg_truncated_list_is_rejected() {
        let mut data = svg_table(&[(1, 2)]);
        data.truncate(data.len() - 4);
        assert!(Svg::parse(&data).is_none());
    }

    fn colr_table(glyphs: &[u16]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&0u16.to_be_bytes());
        data.extend_from_slice(&(glyphs.len() as u16).to_be_bytes());
        data.extend_from_slice(&14u32.to_be_bytes()); // base records offset
        data.extend_from_slice(&0u32.to_be_bytes()); // layer records offset
        data.extend_from_slice(&0u16.to_be_bytes()); // numLayerRecords
        for &glyph in glyphs {
            data.extend_from_slice(&glyph.to_be_bytes());
            data.extend_from_slice(&[0; 4]);
        }
        data
    }

    #[test]
    fn colr_coverage() {
        let colr = Colr::parse(&colr_table(&[900, 5, 77])).unwrap();
        assert!(colr.contains(5));
        assert!(colr.contains(77));
        assert!(colr.contains(900));
        assert!(!colr.contains(6));
        assert!(!colr.contains(0));
    }

    #[test]
    fn colr_empty_table() {
        let colr = Colr::parse(&colr_table(&[])).unwrap();
        assert!(!colr.contains(0));
    }
}
