use super::Reader;

/// The `post` table fields the engine consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Post {
    /// Top of the suggested underline relative to the baseline; negative
    /// values sit below it.
    pub underline_position: i16,
    pub underline_thickness: i16,
    pub is_fixed_pitch: bool,
}

impl Post {
    pub(crate) fn parse(data: &[u8]) -> Option<Post> {
        let mut reader = Reader::at(data, 8);
        let underline_position = reader.read_i16()?;
        let underline_thickness = reader.read_i16()?;
        let is_fixed_pitch = reader.read_u32()? != 0;
        Some(Post {
            underline_position,
            underline_thickness,
            is_fixed_pitch,
        })
    }
}
