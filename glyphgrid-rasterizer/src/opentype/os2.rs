use bitflags::bitflags;

use super::Reader;

bitflags! {
    /// `fsSelection` bits the engine consumes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Selection: u16 {
        const ITALIC = 1 << 0;
        const BOLD = 1 << 5;
        const USE_TYPO_METRICS = 1 << 7;
        const OBLIQUE = 1 << 9;
    }
}

/// The `OS/2` table, versions 0 through 5. Fields absent from the face's
/// version parse to `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Os2 {
    pub version: u16,
    pub strikeout_size: i16,
    pub strikeout_position: i16,
    pub selection: Selection,
    pub typo_ascender: i16,
    pub typo_descender: i16,
    pub typo_line_gap: i16,
    pub win_ascent: u16,
    pub win_descent: u16,
    /// Version 2 and later.
    pub x_height: Option<i16>,
    /// Version 2 and later.
    pub cap_height: Option<i16>,
}

impl Os2 {
    pub(crate) fn parse(data: &[u8]) -> Option<Os2> {
        let version = Reader::new(data).read_u16()?;

        let mut reader = Reader::at(data, 26);
        let strikeout_size = reader.read_i16()?;
        let strikeout_position = reader.read_i16()?;

        let selection = Selection::from_bits_truncate(Reader::at(data, 62).read_u16()?);

        let mut reader = Reader::at(data, 68);
        let typo_ascender = reader.read_i16()?;
        let typo_descender = reader.read_i16()?;
        let typo_line_gap = reader.read_i16()?;
        let win_ascent = reader.read_u16()?;
        let win_descent = reader.read_u16()?;

        let (x_height, cap_height) = if version >= 2 {
            let mut reader = Reader::at(data, 86);
            (reader.read_i16(), reader.read_i16())
        } else {
            (None, None)
        };

        Some(Os2 {
            version,
            strikeout_size,
            strikeout_position,
            selection,
            typo_ascender,
            typo_descender,
            typo_line_gap,
            win_ascent,
            win_descent,
            x_height,
            cap_height,
        })
    }

    pub fn use_typo_metrics(&self) -> bool {
        self.selection.contains(Selection::USE_TYPO_METRICS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(version: u16) -> Vec<u8> {
        let len = if version >= 2 { 96 } else { 78 };
        let mut data = vec![0u8; len];
        data[0..2].copy_from_slice(&version.to_be_bytes());
        data[26..28].copy_from_slice(&102i16.to_be_bytes());
        data[28..30].copy_from_slice(&512i16.to_be_bytes());
        // bold + use-typo-metrics
        data[62..64].copy_from_slice(&0b1010_0000u16.to_be_bytes());
        data[68..70].copy_from_slice(&1536i16.to_be_bytes());
        data[70..72].copy_from_slice(&(-512i16).to_be_bytes());
        data[72..74].copy_from_slice(&205i16.to_be_bytes());
        data[74..76].copy_from_slice(&1900u16.to_be_bytes());
        data[76..78].copy_from_slice(&480u16.to_be_bytes());
        if version >= 2 {
            data[86..88].copy_from_slice(&1024i16.to_be_bytes());
            data[88..90].copy_from_slice(&1450i16.to_be_bytes());
        }
        data
    }

    #[test]
    fn parses_version_4() {
        let os2 = Os2::parse(&sample(4)).unwrap();
        assert_eq!(os2.version, 4);
        assert_eq!(os2.strikeout_size, 102);
        assert_eq!(os2.strikeout_position, 512);
        assert!(os2.selection.contains(Selection::BOLD));
        assert!(os2.use_typo_metrics());
        assert!(!os2.selection.contains(Selection::ITALIC));
        assert_eq!(os2.typo_ascender, 1536);
        assert_eq!(os2.typo_descender, -512);
        assert_eq!(os2.typo_line_gap, 205);
        assert_eq!(os2.win_ascent, 1900);
        assert_eq!(os2.win_descent, 480);
        assert_eq!(os2.x_height, Some(1024));
        assert_eq!(os2.cap_height, Some(1450));
    }

    #[test]
    fn version_0_has_no_extended_fields() {
        let os2 = Os2::parse(&sample(0)).unwrap();
        assert_eq!(os2.x_height, None);
        assert_eq!(os2.cap_height, None);
    }

    #[test]
    fn short_table_is_rejected() {
        assert!(Os2::parse(&[0u8; 40]).is_none());
    }
}
