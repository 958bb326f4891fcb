//! Packed 8-bit pixel arithmetic.
//!
//! Workers exchange pixels as packed 32-bit BGRA words: blue in the lowest
//! byte, then green, red and alpha in the highest byte. In a little-endian
//! byte buffer this is the `B, G, R, A` memory order of [`ColorMode::Bgra8888`].
//!
//! This module holds the scalar helpers the CPU kernels and the lookup
//! generator are built from:
//!
//! - [`Bgra`] - the packed pixel word
//! - [`hue_to_rgb`] / [`is_pure_color`] - pure colors on the hue circle
//! - [`grayscale`] - Rec.709 weighted luminance, rounded
//! - [`div255`], [`bw`], [`sat255`], [`sat`], [`min3`], [`max3`] - fixed-point helpers
//!
//! [`ColorMode::Bgra8888`]: crate::ColorMode::Bgra8888

use bytemuck::{Pod, Zeroable};
use std::fmt;

// ============================================================================
// Rec.709 Luminance Constants
// ============================================================================

/// Rec.709 luminance coefficient for red channel.
///
/// Used in the standard luminance formula: `Y = 0.2126*R + 0.7152*G + 0.0722*B`
pub const REC709_LUMA_R: f64 = 0.2126;

/// Rec.709 luminance coefficient for green channel.
pub const REC709_LUMA_G: f64 = 0.7152;

/// Rec.709 luminance coefficient for blue channel.
pub const REC709_LUMA_B: f64 = 0.0722;

/// Rec.709 luminance coefficients as an array [R, G, B].
pub const REC709_LUMA: [f64; 3] = [REC709_LUMA_R, REC709_LUMA_G, REC709_LUMA_B];

/// Degrees per hue band.
pub const HUE_BAND: i32 = 60;

/// Ramp slope per degree inside a hue band (255 / 60).
pub const HUE_SLOPE: f64 = 4.25;

/// A packed 32-bit BGRA pixel (`A<<24 | R<<16 | G<<8 | B`).
///
/// `#[repr(transparent)]` over `u32`, so slices of `Bgra` can be viewed as
/// bytes with [`bytemuck::cast_slice`].
///
/// # Example
///
/// ```rust
/// use fx_core::Bgra;
///
/// let px = Bgra::opaque(255, 128, 0);
/// assert_eq!(px.0, 0xFF_FF_80_00);
/// assert_eq!((px.r(), px.g(), px.b(), px.a()), (255, 128, 0, 255));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
#[repr(transparent)]
pub struct Bgra(pub u32);

impl Bgra {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self(0);

    /// Opaque black.
    pub const BLACK: Self = Self(0xFF00_0000);

    /// Opaque white.
    pub const WHITE: Self = Self(0xFFFF_FFFF);

    /// Packs channel values.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    /// Packs an opaque pixel.
    #[inline]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Opaque gray with R = G = B = `v`.
    #[inline]
    pub const fn gray(v: u8) -> Self {
        Self::opaque(v, v, v)
    }

    /// Red channel.
    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Green channel.
    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue channel.
    #[inline]
    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    /// Alpha channel.
    #[inline]
    pub const fn a(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Red, green and blue as an array.
    #[inline]
    pub const fn rgb(self) -> [u8; 3] {
        [self.r(), self.g(), self.b()]
    }

    /// Same pixel with the alpha channel replaced.
    #[inline]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self(self.0 & 0x00FF_FFFF | (a as u32) << 24)
    }
}

impl fmt::Debug for Bgra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bgra(#{:08X})", self.0)
    }
}

impl From<u32> for Bgra {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

impl From<Bgra> for u32 {
    fn from(px: Bgra) -> Self {
        px.0
    }
}

// ============================================================================
// Fixed-point helpers
// ============================================================================

/// Divides a product of two bytes by 255 without a division.
///
/// `((v >> 8) + v + 1) >> 8`, exact for products of two values in `0..=255`.
#[inline]
pub const fn div255(v: u32) -> u32 {
    ((v >> 8) + v + 1) >> 8
}

/// Integer black-and-white weighting `(77r + 151g + 28b) >> 8`.
#[inline]
pub const fn bw(r: u32, g: u32, b: u32) -> u32 {
    (77 * r + 151 * g + 28 * b) >> 8
}

/// Saturates to a byte.
#[inline]
pub fn sat255(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

/// Saturates `x` into `[min, max]`.
#[inline]
pub fn sat<T: PartialOrd>(x: T, min: T, max: T) -> T {
    if x < min {
        min
    } else if x > max {
        max
    } else {
        x
    }
}

/// Minimum of three values.
#[inline]
pub fn min3<T: Ord>(a: T, b: T, c: T) -> T {
    a.min(b).min(c)
}

/// Maximum of three values.
#[inline]
pub fn max3<T: Ord>(a: T, b: T, c: T) -> T {
    a.max(b).max(c)
}

// ============================================================================
// Color helpers
// ============================================================================

/// Rec.709 weighted luminance of 8-bit channels, rounded to the nearest byte.
#[inline]
pub fn luma_rec709(r: u8, g: u8, b: u8) -> u8 {
    let y = REC709_LUMA_R * r as f64 + REC709_LUMA_G * g as f64 + REC709_LUMA_B * b as f64;
    y.round().clamp(0.0, 255.0) as u8
}

/// Grayscale transform used by the grayscale effect.
///
/// Output is opaque with R = G = B = [`luma_rec709`] of the input; the input
/// alpha is ignored.
#[inline]
pub fn grayscale(px: Bgra) -> Bgra {
    Bgra::gray(luma_rec709(px.r(), px.g(), px.b()))
}

/// Converts a hue in degrees to the pure, opaque color on the edge of the
/// HSV cylinder.
///
/// Hues outside `[0, 360)` are treated as `0`. The circle is split into six
/// 60 degree bands; in each band one channel is 255, one is 0 and the third
/// ramps by [`HUE_SLOPE`] per degree, truncated.
///
/// # Example
///
/// ```rust
/// use fx_core::{hue_to_rgb, Bgra};
///
/// assert_eq!(hue_to_rgb(0), Bgra::opaque(255, 0, 0));
/// assert_eq!(hue_to_rgb(120), Bgra::opaque(0, 255, 0));
/// assert_eq!(hue_to_rgb(240), Bgra::opaque(0, 0, 255));
/// assert_eq!(hue_to_rgb(-30), hue_to_rgb(0));
/// ```
pub fn hue_to_rgb(hue: i32) -> Bgra {
    let hue = if (0..360).contains(&hue) { hue } else { 0 };
    let ramp = |degrees: i32| (degrees as f64 * HUE_SLOPE) as u8;

    let (r, g, b) = match hue / HUE_BAND {
        0 => (255, ramp(hue), 0),
        1 => (ramp(120 - hue), 255, 0),
        2 => (0, 255, ramp(hue - 120)),
        3 => (0, ramp(240 - hue), 255),
        4 => (ramp(hue - 240), 0, 255),
        _ => (255, 0, ramp(360 - hue)),
    };
    Bgra::opaque(r, g, b)
}

/// Returns `true` when at least one channel is 0 and at least one is 255.
pub fn is_pure_color(color: Bgra) -> bool {
    let [r, g, b] = color.rgb();
    (r == 0 || g == 0 || b == 0) && (r == 255 || g == 255 || b == 255)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_unpack() {
        let px = Bgra::new(0x12, 0x34, 0x56, 0x78);
        assert_eq!(px.0, 0x7812_3456);
        assert_eq!(px.rgb(), [0x12, 0x34, 0x56]);
        assert_eq!(px.a(), 0x78);
        assert_eq!(px.with_alpha(0xFF).0, 0xFF12_3456);
    }

    #[test]
    fn test_byte_order() {
        let pixels = [Bgra::new(3, 2, 1, 4)];
        let bytes: &[u8] = bytemuck::cast_slice(&pixels);
        if cfg!(target_endian = "little") {
            assert_eq!(bytes, &[1, 2, 3, 4]);
        }
    }

    #[test]
    fn test_div255() {
        assert_eq!(div255(0), 0);
        assert_eq!(div255(255), 1);
        assert_eq!(div255(128 * 255), 128);
        assert_eq!(div255(255 * 255), 255);
    }

    #[test]
    fn test_bw() {
        assert_eq!(bw(255, 255, 255), 255);
        assert_eq!(bw(0, 0, 0), 0);
        assert!(bw(0, 255, 0) > bw(255, 0, 0));
    }

    #[test]
    fn test_saturate() {
        assert_eq!(sat255(-5), 0);
        assert_eq!(sat255(300), 255);
        assert_eq!(sat255(77), 77);
        assert_eq!(sat(150, 0, 100), 100);
        assert_eq!(sat(-1.5, 0.0, 1.0), 0.0);
        assert_eq!(min3(4, 2, 9), 2);
        assert_eq!(max3(4, 2, 9), 9);
    }

    #[test]
    fn test_hue_primaries() {
        assert_eq!(hue_to_rgb(0), Bgra::opaque(255, 0, 0));
        assert_eq!(hue_to_rgb(60), Bgra::opaque(255, 255, 0));
        assert_eq!(hue_to_rgb(120), Bgra::opaque(0, 255, 0));
        assert_eq!(hue_to_rgb(180), Bgra::opaque(0, 255, 255));
        assert_eq!(hue_to_rgb(240), Bgra::opaque(0, 0, 255));
        assert_eq!(hue_to_rgb(300), Bgra::opaque(255, 0, 255));
    }

    #[test]
    fn test_hue_ramp_truncates() {
        // 1 * 4.25 and 30 * 4.25 truncate rather than round
        assert_eq!(hue_to_rgb(1), Bgra::opaque(255, 4, 0));
        assert_eq!(hue_to_rgb(30), Bgra::opaque(255, 127, 0));
        assert_eq!(hue_to_rgb(359), Bgra::opaque(255, 0, 4));
    }

    #[test]
    fn test_hue_out_of_range() {
        assert_eq!(hue_to_rgb(-1), hue_to_rgb(0));
        assert_eq!(hue_to_rgb(360), hue_to_rgb(0));
        assert_eq!(hue_to_rgb(i32::MAX), hue_to_rgb(0));
    }

    #[test]
    fn test_hue_always_pure() {
        for h in 0..360 {
            let c = hue_to_rgb(h);
            assert!(is_pure_color(c), "hue {h} gave {c:?}");
            assert_eq!(c.a(), 255);
        }
    }

    #[test]
    fn test_is_pure_color() {
        assert!(is_pure_color(Bgra::opaque(255, 10, 0)));
        assert!(!is_pure_color(Bgra::opaque(128, 128, 128)));
        assert!(!is_pure_color(Bgra::opaque(0, 0, 0)));
        assert!(!is_pure_color(Bgra::opaque(255, 255, 255)));
    }

    #[test]
    fn test_grayscale_primaries() {
        assert_eq!(grayscale(Bgra::opaque(255, 0, 0)), Bgra::gray(54));
        assert_eq!(grayscale(Bgra::opaque(0, 255, 0)), Bgra::gray(182));
        assert_eq!(grayscale(Bgra::opaque(0, 0, 255)), Bgra::gray(18));
        assert_eq!(grayscale(Bgra::WHITE), Bgra::WHITE);
        assert_eq!(grayscale(Bgra::TRANSPARENT), Bgra::BLACK);
    }

    #[test]
    fn test_grayscale_sweep() {
        for r in (0..=255u8).step_by(15) {
            for g in (0..=255u8).step_by(17) {
                for b in (0..=255u8).step_by(51) {
                    let out = grayscale(Bgra::new(r, g, b, 7));
                    let expected =
                        (0.2126 * r as f64 + 0.7152 * g as f64 + 0.0722 * b as f64).round() as u8;
                    assert_eq!(out.rgb(), [expected; 3]);
                    assert_eq!(out.a(), 255);
                }
            }
        }
    }
}
