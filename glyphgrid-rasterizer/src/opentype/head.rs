use super::Reader;

/// The `head` table fields the engine consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Head {
    pub units_per_em: u16,
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
    pub index_to_loc_format: i16,
}

impl Head {
    pub(crate) fn parse(data: &[u8]) -> Option<Head> {
        let mut reader = Reader::at(data, 18);
        let units_per_em = reader.read_u16()?;
        reader.skip(16); // created, modified
        let x_min = reader.read_i16()?;
        let y_min = reader.read_i16()?;
        let x_max = reader.read_i16()?;
        let y_max = reader.read_i16()?;
        reader.skip(6); // macStyle, lowestRecPPEM, fontDirectionHint
        let index_to_loc_format = reader.read_i16()?;
        Some(Head {
            units_per_em,
            x_min,
            y_min,
            x_max,
            y_max,
            index_to_loc_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<u8> {
        let mut data = vec![0u8; 54];
        data[18..20].copy_from_slice(&2048u16.to_be_bytes());
        data[36..38].copy_from_slice(&(-150i16).to_be_bytes());
        data[38..40].copy_from_slice(&(-400i16).to_be_bytes());
        data[40..42].copy_from_slice(&1100i16.to_be_bytes());
        data[42..44].copy_from_slice(&1900i16.to_be_bytes());
        data[50..52].copy_from_slice(&1i16.to_be_bytes());
        data
    }

    #[test]
    fn parses_fields() {
        let head = Head::parse(&sample()).unwrap();
        assert_eq!(head.units_per_em, 2048);
        assert_eq!(head.x_min, -150);
        assert_eq!(head.y_min, -400);
        assert_eq!(head.x_max, 1100);
        assert_eq!(head.y_max, 1900);
        assert_eq!(head.index_to_loc_format, 1);
    }

    #[test]
    fn short_table_is_rejected() {
        assert!(Head::parse(&[0u8; 30]).is_none());
    }
}
