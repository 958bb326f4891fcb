//! Rectangles of CPU work.
//!
//! The host splits an image into tiles and hands each one to a CPU worker as
//! a [`TiledRegion`]. All values are in pixels, not bytes.
//!
//! ```text
//! source buffer (pitch = 8)            target buffer (pitch = width = 3)
//!
//!  . . . . . . . .                      a b c
//!  . . a b c . . .   start = 10         d e f
//!  . . d e f . . .
//! ```
//!
//! The source row `y` begins at `start + y * pitch`; the target is always
//! tightly packed and row `y` begins at `y * width`.
//!
//! # Usage
//!
//! ```rust
//! use fx_core::TiledRegion;
//!
//! let region = TiledRegion::new(10, 8, 3, 2);
//! assert!(region.validate(64).is_ok());
//! assert_eq!(region.source_extent(), 21);
//! assert_eq!(region.target_len(), 6);
//!
//! let (top, bottom) = region.split_rows(1).unwrap();
//! assert_eq!(bottom.start, 18);
//! assert_eq!(top.height + bottom.height, 2);
//! ```

use crate::{Error, Result};

/// One rectangle of CPU work.
///
/// # Invariants
///
/// Checked by [`validate`](TiledRegion::validate):
///
/// - `width > 0` and `height > 0`
/// - `pitch >= width`
/// - `start + (height - 1) * pitch + width <= source length`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TiledRegion {
    /// Index of the first source pixel
    pub start: u32,
    /// Source row stride in pixels
    pub pitch: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl TiledRegion {
    /// Creates a region.
    #[inline]
    pub const fn new(start: u32, pitch: u32, width: u32, height: u32) -> Self {
        Self {
            start,
            pitch,
            width,
            height,
        }
    }

    /// A whole tightly packed image: start 0, pitch = width.
    #[inline]
    pub const fn full(width: u32, height: u32) -> Self {
        Self::new(0, width, width, height)
    }

    /// One past the last source pixel read, `start + (height-1)*pitch + width`.
    ///
    /// Zero for an empty region.
    pub fn source_extent(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        self.start as usize + (self.height as usize - 1) * self.pitch as usize + self.width as usize
    }

    /// Pixels written to the target buffer.
    #[inline]
    pub fn target_len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns `true` if the region covers no pixels.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Index of the first source pixel of row `y`.
    #[inline]
    pub fn row_start(&self, y: u32) -> usize {
        self.start as usize + y as usize * self.pitch as usize
    }

    /// Checks the region invariants against a source of `source_len` pixels.
    pub fn validate(&self, source_len: usize) -> Result<()> {
        let fits = !self.is_empty()
            && self.pitch >= self.width
            && self.source_extent() <= source_len;
        if fits {
            Ok(())
        } else {
            Err(Error::InvalidRegion {
                start: self.start,
                pitch: self.pitch,
                width: self.width,
                height: self.height,
                available: source_len,
            })
        }
    }

    /// Splits into two row-disjoint regions, the first `rows` high.
    ///
    /// Returns `None` unless `0 < rows < height`.
    pub fn split_rows(&self, rows: u32) -> Option<(Self, Self)> {
        if rows == 0 || rows >= self.height {
            return None;
        }
        let top = Self {
            height: rows,
            ..*self
        };
        let bottom = Self {
            start: self.start + rows * self.pitch,
            height: self.height - rows,
            ..*self
        };
        Some((top, bottom))
    }

    /// Splits into horizontal bands of at most `rows` rows each.
    ///
    /// Bands are returned top to bottom and together cover the region.
    pub fn bands(&self, rows: u32) -> Vec<Self> {
        let rows = rows.max(1);
        let mut bands = Vec::with_capacity(self.height.div_ceil(rows) as usize);
        let mut y = 0;
        while y < self.height {
            let h = rows.min(self.height - y);
            bands.push(Self {
                start: self.start + y * self.pitch,
                height: h,
                ..*self
            });
            y += h;
        }
        bands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full() {
        let r = TiledRegion::full(16, 4);
        assert_eq!(r.pitch, 16);
        assert_eq!(r.source_extent(), 64);
        assert_eq!(r.target_len(), 64);
        assert!(r.validate(64).is_ok());
        assert!(r.validate(63).is_err());
    }

    #[test]
    fn test_validate_rejects() {
        assert!(TiledRegion::new(0, 4, 0, 4).validate(100).is_err());
        assert!(TiledRegion::new(0, 4, 4, 0).validate(100).is_err());
        // pitch < width
        assert!(TiledRegion::new(0, 3, 4, 2).validate(100).is_err());
        // last row reads past the end
        assert!(TiledRegion::new(90, 8, 4, 2).validate(100).is_err());
        assert!(TiledRegion::new(88, 8, 4, 2).validate(100).is_ok());
    }

    #[test]
    fn test_split_rows() {
        let r = TiledRegion::new(5, 10, 6, 7);
        let (a, b) = r.split_rows(3).unwrap();
        assert_eq!(a, TiledRegion::new(5, 10, 6, 3));
        assert_eq!(b, TiledRegion::new(35, 10, 6, 4));
        assert_eq!(b.source_extent(), r.source_extent());
        assert!(r.split_rows(0).is_none());
        assert!(r.split_rows(7).is_none());
    }

    #[test]
    fn test_bands() {
        let r = TiledRegion::new(0, 8, 8, 10);
        let bands = r.bands(4);
        assert_eq!(bands.len(), 3);
        assert_eq!(bands.iter().map(|b| b.height).sum::<u32>(), 10);
        assert_eq!(bands[2].start, 64);
        assert_eq!(bands[2].height, 2);
        assert_eq!(r.bands(0).len(), 10);
    }
}
