use crate::style::Style;

/// Packed identifier for a face within a collection.
///
/// `FaceIndex` is a hot hashmap key in the downstream caches, so it stays a
/// single `u16`:
///
/// | Bit(s) | Field | Description                                |
/// |--------|-------|--------------------------------------------|
/// | 14-15  | style | [`Style`] ordinal (0..=3)                  |
/// | 0-13   | idx   | Index into the per-style entry list        |
///
/// Index values at or above [`Special::START`] do not refer to a stored
/// entry; they denote virtual faces (see [`Special`]).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceIndex(u16);

const _: () = assert!(size_of::<FaceIndex>() == 2);

impl FaceIndex {
    /// Number of bits available for the entry index.
    pub const IDX_BITS: u32 = 14;
    const IDX_MASK: u16 = (1 << Self::IDX_BITS) - 1;

    pub const fn new(style: Style, idx: u16) -> FaceIndex {
        debug_assert!(idx < Special::START);
        FaceIndex(((style.ordinal() as u16) << Self::IDX_BITS) | (idx & Self::IDX_MASK))
    }

    /// The virtual index of the sprite face for the given style.
    pub const fn sprite(style: Style) -> FaceIndex {
        FaceIndex(((style.ordinal() as u16) << Self::IDX_BITS) | Special::START)
    }

    pub const fn style(self) -> Style {
        Style::from_ordinal((self.0 >> Self::IDX_BITS) as u8)
    }

    pub const fn idx(self) -> u16 {
        self.0 & Self::IDX_MASK
    }

    /// Returns the virtual face this index denotes, if any.
    pub const fn special(self) -> Option<Special> {
        if self.idx() >= Special::START {
            Some(Special::Sprite)
        } else {
            None
        }
    }

    pub const fn is_sprite(self) -> bool {
        matches!(self.special(), Some(Special::Sprite))
    }
}

impl std::fmt::Debug for FaceIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_sprite() {
            write!(f, "FaceIndex({:?}, sprite)", self.style())
        } else {
            write!(f, "FaceIndex({:?}, {})", self.style(), self.idx())
        }
    }
}

/// Virtual faces that live above the entry index range.
///
/// Only the sprite face exists today; it occupies the first virtual value so
/// every index in `START..=IDX_MASK` maps to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Special {
    /// The procedural sprite face (box drawing, Braille, cursors, ...).
    Sprite,
}

impl Special {
    /// First index value denoting a virtual face; also the exclusive upper
    /// bound on real entry indices.
    pub const START: u16 = (1 << FaceIndex::IDX_BITS) - 1;
}
