//! CPU-side texture atlas with shelf packing.
//!
//! The atlas never evicts: callers reserve rectangles, write pixels, and
//! grow the whole texture when reservation fails. Grown atlases keep every
//! previously reserved region at its original coordinates, so glyph records
//! stay valid for the lifetime of the atlas.

/// Pixel layout of an atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// One byte per pixel; text and sprite glyphs.
    Grayscale,
    /// Four bytes per pixel, blue first; color emoji.
    Bgra,
}

impl PixelFormat {
    /// Bytes per pixel, exposed so writers can convert strides.
    pub const fn depth(self) -> usize {
        match self {
            PixelFormat::Grayscale => 1,
            PixelFormat::Bgra => 4,
        }
    }
}

/// A reserved rectangle within an atlas, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtlasError {
    /// No shelf has room for the requested rectangle. Recoverable by
    /// growing the atlas and retrying.
    #[error("atlas has no room for a {width}x{height} region")]
    Full { width: u32, height: u32 },
}

/// A square, grow-only texture atlas.
#[derive(Debug)]
pub struct Atlas {
    data: Vec<u8>,
    size: u32,
    format: PixelFormat,
    /// Write cursor within the open shelf.
    shelf_x: u32,
    /// Top edge of the open shelf.
    shelf_y: u32,
    /// Height of the tallest region on the open shelf.
    shelf_height: u32,
    /// Bumped on every mutation so renderers know to re-upload.
    generation: u64,
}

impl Atlas {
    pub fn new(size: u32, format: PixelFormat) -> Atlas {
        Atlas {
            data: vec![0; size as usize * size as usize * format.depth()],
            size,
            format,
            shelf_x: 0,
            shelf_y: 0,
            shelf_height: 0,
            generation: 0,
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Raw pixel data, row-major, `size * depth` bytes per row.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Reserves a `width` x `height` rectangle.
    ///
    /// Zero-area requests succeed with an empty region. Regions are packed
    /// onto horizontal shelves; a request that fits neither the open shelf
    /// nor a fresh one fails with [`AtlasError::Full`].
    pub fn reserve(&mut self, width: u32, height: u32) -> Result<Region, AtlasError> {
        if width == 0 || height == 0 {
            return Ok(Region::default());
        }
        if width > self.size {
            return Err(AtlasError::Full { width, height });
        }

        // Close the shelf when the rectangle does not fit beside the cursor.
        if self.shelf_x + width > self.size {
            self.shelf_y += self.shelf_height;
            self.shelf_x = 0;
            self.shelf_height = 0;
        }
        if self.shelf_y + height > self.size {
            return Err(AtlasError::Full { width, height });
        }

        let region = Region { x: self.shelf_x, y: self.shelf_y, width, height };
        self.shelf_x += width;
        self.shelf_height = self.shelf_height.max(height);
        Ok(region)
    }

    /// Copies `pixels` into a previously reserved region.
    ///
    /// `pixels` must hold exactly `width * height * depth` bytes in
    /// row-major order.
    pub fn write(&mut self, region: &Region, pixels: &[u8]) {
        let depth = self.format.depth();
        debug_assert_eq!(
            pixels.len(),
            region.width as usize * region.height as usize * depth
        );
        debug_assert!(region.x + region.width <= self.size);
        debug_assert!(region.y + region.height <= self.size);

        let src_stride = region.width as usize * depth;
        let dst_stride = self.size as usize * depth;
        for row in 0..region.height as usize {
            let src = row * src_stride;
            let dst = (region.y as usize + row) * dst_stride + region.x as usize * depth;
            self.data[dst..dst + src_stride].copy_from_slice(&pixels[src..src + src_stride]);
        }
        self.generation += 1;
    }

    /// Grows the atlas to `new_size`, preserving all existing regions at
    /// their coordinates.
    pub fn grow(&mut self, new_size: u32) {
        debug_assert!(new_size >= self.size);
        if new_size == self.size {
            return;
        }

        let depth = self.format.depth();
        let mut data = vec![0; new_size as usize * new_size as usize * depth];
        let old_stride = self.size as usize * depth;
        let new_stride = new_size as usize * depth;
        for row in 0..self.size as usize {
            let src = row * old_stride;
            let dst = row * new_stride;
            data[dst..dst + old_stride].copy_from_slice(&self.data[src..src + old_stride]);
        }

        self.data = data;
        self.size = new_size;
        self.generation += 1;
    }

    /// Zeroes the texture and releases every region.
    pub fn clear(&mut self) {
        self.data.fill(0);
        self.shelf_x = 0;
        self.shelf_y = 0;
        self.shelf_height = 0;
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserve_packs_onto_shelves() {
        let mut atlas = Atlas::new(16, PixelFormat::Grayscale);
        let a = atlas.reserve(8, 4).unwrap();
        let b = atlas.reserve(8, 6).unwrap();
        let c = atlas.reserve(4, 4).unwrap();
        assert_eq!((a.x, a.y), (0, 0));
        assert_eq!((b.x, b.y), (8, 0));
        // new shelf starts below the tallest region of the previous one
        assert_eq!((c.x, c.y), (0, 6));
    }

    #[test]
    fn reserve_zero_area() {
        let mut atlas = Atlas::new(4, PixelFormat::Grayscale);
        assert_eq!(atlas.reserve(0, 3).unwrap(), Region::default());
    }

    #[test]
    fn reserve_reports_full() {
        let mut atlas = Atlas::new(8, PixelFormat::Grayscale);
        atlas.reserve(8, 8).unwrap();
        assert_eq!(
            atlas.reserve(1, 1),
            Err(AtlasError::Full { width: 1, height: 1 })
        );
    }

    #[test]
    fn write_converts_stride() {
        let mut atlas = Atlas::new(4, PixelFormat::Grayscale);
        let region = atlas.reserve(2, 2).unwrap();
        atlas.write(&region, &[1, 2, 3, 4]);
        assert_eq!(&atlas.data()[0..2], &[1, 2]);
        assert_eq!(&atlas.data()[4..6], &[3, 4]);
    }

    #[test]
    fn grow_preserves_pixels_and_regions() {
        let mut atlas = Atlas::new(4, PixelFormat::Bgra);
        let region = atlas.reserve(1, 2).unwrap();
        atlas.write(&region, &[9, 9, 9, 9, 7, 7, 7, 7]);
        let generation = atlas.generation();

        atlas.grow(8);
        assert_eq!(atlas.size(), 8);
        assert!(atlas.generation() > generation);
        // pixel (0, 1) survived the reallocation
        let stride = 8 * PixelFormat::Bgra.depth();
        assert_eq!(&atlas.data()[stride..stride + 4], &[7, 7, 7, 7]);

        // the open shelf continues where it left off
        let next = atlas.reserve(4, 2).unwrap();
        assert_eq!((next.x, next.y), (1, 0));
    }
}
