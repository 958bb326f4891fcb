//! Pixel layouts declared by workers.
//!
//! A CPU worker tells the host how to interpret its source and target
//! buffers through [`ColorMode`]. The layout is fixed per worker type.

/// Pixel layout of a worker buffer or resource texture.
///
/// # Example
///
/// ```rust
/// use fx_core::ColorMode;
///
/// let mode = ColorMode::Bgra8888;
/// assert_eq!(mode.bytes_per_pixel(), 4);
/// assert_eq!(mode.row_pitch(256), 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ColorMode {
    /// Packed 8-bit BGRA, one `u32` per pixel (`A<<24 | R<<16 | G<<8 | B`).
    #[default]
    Bgra8888,
}

impl ColorMode {
    /// Bytes per pixel.
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Bgra8888 => 4,
        }
    }

    /// Bytes per row for a tightly packed row of `width` pixels.
    #[inline]
    pub const fn row_pitch(self, width: u32) -> usize {
        width as usize * self.bytes_per_pixel()
    }

    /// Human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bgra8888 => "bgra8888",
        }
    }
}

impl std::fmt::Display for ColorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
