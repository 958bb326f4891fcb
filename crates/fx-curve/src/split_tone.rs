//! Split-tone lookup generation.
//!
//! # Algorithm
//!
//! 1. Hues are wrapped into `[0, 360)`, saturations clamped to `[0, 100]`.
//! 2. Each canonical curve becomes a delta curve (`curve - identity`).
//! 3. A band whose saturation is below 100 has both delta curves scaled by
//!    `saturation / 100`.
//! 4. The band's hue becomes a pure color via [`hue_to_rgb`].
//! 5. Per channel value `c`: `i + (neg[i] * (255 - c) + pos[i] * c) / 255`.
//! 6. The result minus `i`, biased by [`DELTA_BIAS`] and clamped to a byte.
//! 7. Packed as `R<<16 | G<<8 | B`, shadows first, then highlights.

use fx_core::pixel::sat;
use fx_core::{hue_to_rgb, Bgra};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::canonical;
use crate::curve::{ToneCurve, CURVE_LEN};

/// Entries per band.
pub const BAND_LEN: usize = CURVE_LEN;

/// Entries in a lookup table (shadows band + highlights band).
pub const LOOKUP_LEN: usize = 2 * BAND_LEN;

/// Bias added to each signed delta so it fits an unsigned byte.
pub const DELTA_BIAS: i32 = 128;

/// Upper bound of a split-tone saturation.
pub const MAX_SATURATION: i32 = 100;

/// Split-tone parameters.
///
/// Hues are degrees and may be any integer; they are wrapped into
/// `[0, 360)`. Saturations are percentages in `[0, 100]`.
///
/// Missing fields take the effect defaults when deserialized:
///
/// ```rust
/// use fx_curve::SplitToneParams;
///
/// let p: SplitToneParams = serde_yaml::from_str("shadows_hue: 200").unwrap();
/// assert_eq!(p.shadows_hue, 200);
/// assert_eq!(p.highlights_saturation, 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitToneParams {
    /// Highlights hue in degrees
    pub highlights_hue: i32,
    /// Highlights saturation, 0..=100
    pub highlights_saturation: i32,
    /// Shadows hue in degrees
    pub shadows_hue: i32,
    /// Shadows saturation, 0..=100
    pub shadows_saturation: i32,
}

impl Default for SplitToneParams {
    fn default() -> Self {
        Self {
            highlights_hue: 0,
            highlights_saturation: MAX_SATURATION,
            shadows_hue: 0,
            shadows_saturation: 0,
        }
    }
}

/// 512 packed delta entries: shadows at `0..256`, highlights at `256..512`.
#[derive(Clone, PartialEq, Eq)]
pub struct LookupTable {
    entries: [u32; LOOKUP_LEN],
}

impl LookupTable {
    /// All entries.
    #[inline]
    pub fn entries(&self) -> &[u32; LOOKUP_LEN] {
        &self.entries
    }

    /// The shadows band.
    #[inline]
    pub fn shadows(&self) -> &[u32] {
        &self.entries[..BAND_LEN]
    }

    /// The highlights band.
    #[inline]
    pub fn highlights(&self) -> &[u32] {
        &self.entries[BAND_LEN..]
    }

    /// The table as bytes, in the layout of a 256x2 BGRA8888 texture.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.entries)
    }

    /// Signed shadows delta `[r, g, b]` at `index`.
    pub fn shadows_delta(&self, index: u8) -> [i32; 3] {
        unbias(self.entries[index as usize])
    }

    /// Signed highlights delta `[r, g, b]` at `index`.
    pub fn highlights_delta(&self, index: u8) -> [i32; 3] {
        unbias(self.entries[BAND_LEN + index as usize])
    }
}

impl std::fmt::Debug for LookupTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupTable")
            .field("shadows[128]", &format_args!("{:06X}", self.entries[128]))
            .field("highlights[128]", &format_args!("{:06X}", self.entries[BAND_LEN + 128]))
            .finish()
    }
}

fn unbias(entry: u32) -> [i32; 3] {
    Bgra(entry).rgb().map(|c| c as i32 - DELTA_BIAS)
}

/// Builds split-tone lookup tables.
///
/// Holds the four canonical delta curves so repeated generation skips the
/// curve interpolation. Generation has no side effects: equal parameters
/// always give equal tables.
#[derive(Debug, Clone)]
pub struct SplitToneGenerator {
    shadows_positive: ToneCurve,
    shadows_negative: ToneCurve,
    highlights_positive: ToneCurve,
    highlights_negative: ToneCurve,
}

impl SplitToneGenerator {
    /// Creates a generator with the canonical curves.
    pub fn new() -> Self {
        let identity = ToneCurve::identity();
        Self {
            shadows_positive: canonical::shadows_positive().subtract(&identity),
            shadows_negative: canonical::shadows_negative().subtract(&identity),
            highlights_positive: canonical::highlights_positive().subtract(&identity),
            highlights_negative: canonical::highlights_negative().subtract(&identity),
        }
    }

    /// Generates the lookup table for `params`.
    pub fn generate_params(&self, params: &SplitToneParams) -> LookupTable {
        self.generate(
            params.highlights_hue,
            params.highlights_saturation,
            params.shadows_hue,
            params.shadows_saturation,
        )
    }

    /// Generates the lookup table for a highlights and a shadows hue/saturation pair.
    pub fn generate(
        &self,
        highlights_hue: i32,
        highlights_saturation: i32,
        shadows_hue: i32,
        shadows_saturation: i32,
    ) -> LookupTable {
        let highlights_hue = wrap_hue(highlights_hue);
        let shadows_hue = wrap_hue(shadows_hue);
        let highlights_saturation = sat(highlights_saturation, 0, MAX_SATURATION);
        let shadows_saturation = sat(shadows_saturation, 0, MAX_SATURATION);
        debug!(
            highlights_hue,
            highlights_saturation, shadows_hue, shadows_saturation, "Generating split-tone lookup"
        );

        let (high_neg, high_pos) = band_curves(
            &self.highlights_negative,
            &self.highlights_positive,
            highlights_saturation,
        );
        let (low_neg, low_pos) =
            band_curves(&self.shadows_negative, &self.shadows_positive, shadows_saturation);

        let high = hue_to_rgb(highlights_hue).rgb();
        let low = hue_to_rgb(shadows_hue).rgb();
        trace!(?high, ?low, "band colors");

        let mut entries = [0u32; LOOKUP_LEN];
        for i in 0..BAND_LEN {
            entries[i] = pack_deltas(i, &low_neg, &low_pos, low);
            entries[BAND_LEN + i] = pack_deltas(i, &high_neg, &high_pos, high);
        }
        LookupTable { entries }
    }
}

impl Default for SplitToneGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Generates a lookup table with a fresh [`SplitToneGenerator`].
pub fn generate(
    highlights_hue: i32,
    highlights_saturation: i32,
    shadows_hue: i32,
    shadows_saturation: i32,
) -> LookupTable {
    SplitToneGenerator::new().generate(
        highlights_hue,
        highlights_saturation,
        shadows_hue,
        shadows_saturation,
    )
}

fn wrap_hue(hue: i32) -> i32 {
    let hue = hue % 360;
    if hue < 0 { hue + 360 } else { hue }
}

fn band_curves(neg: &ToneCurve, pos: &ToneCurve, saturation: i32) -> (ToneCurve, ToneCurve) {
    if saturation < MAX_SATURATION {
        let f = saturation as f64 / MAX_SATURATION as f64;
        (neg.scale(f), pos.scale(f))
    } else {
        (neg.clone(), pos.clone())
    }
}

fn pack_deltas(i: usize, neg: &ToneCurve, pos: &ToneCurve, color: [u8; 3]) -> u32 {
    let (n, p) = (neg.values()[i], pos.values()[i]);
    let [r, g, b] = color.map(|c| {
        let c = c as i32;
        let lookup = i as i32 + (n * (255 - c) + p * c) / 255;
        sat(lookup - i as i32 + DELTA_BIAS, 0, 255) as u32
    });
    r << 16 | g << 8 | b
}

/// Applies a split-tone table to one pixel.
///
/// Each channel value `v` picks the shadows and highlights entries at `v`
/// and adds both unbiased deltas of that channel, saturating to a byte.
/// Alpha is kept. The split-tone shader performs the same arithmetic on
/// the lookup texture.
///
/// # Example
///
/// ```rust
/// use fx_core::Bgra;
/// use fx_curve::{apply_split_tone, generate};
///
/// // zero saturation on both bands is a no-op
/// let table = generate(0, 0, 0, 0);
/// let px = Bgra::new(10, 120, 250, 33);
/// assert_eq!(apply_split_tone(px, &table), px);
/// ```
pub fn apply_split_tone(px: Bgra, table: &LookupTable) -> Bgra {
    let [r, g, b] = px.rgb();
    let channel = |v: u8, ch: usize| {
        let low = table.shadows_delta(v)[ch];
        let high = table.highlights_delta(v)[ch];
        fx_core::pixel::sat255(v as i32 + low + high)
    };
    Bgra::new(channel(r, 0), channel(g, 1), channel(b, 2), px.a())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEUTRAL: u32 = 0x80_80_80;

    #[test]
    fn test_wrap_hue() {
        assert_eq!(wrap_hue(0), 0);
        assert_eq!(wrap_hue(360), 0);
        assert_eq!(wrap_hue(725), 5);
        assert_eq!(wrap_hue(-90), 270);
        assert_eq!(wrap_hue(-360), 0);
    }

    #[test]
    fn test_zero_saturation_is_neutral() {
        let table = generate(77, 0, 300, 0);
        assert!(table.entries().iter().all(|&e| e == NEUTRAL));
    }

    #[test]
    fn test_red_highlights_known_values() {
        let table = generate(0, 100, 0, 0);
        let hi = table.highlights();
        assert_eq!(hi[0], NEUTRAL);
        // pos 17 at 16 (+1), neg 16 at 16 (0)
        assert_eq!(hi[16], 0x81_80_80);
        // pos 184 at 128 (+56), neg 74 at 128 (-54)
        assert_eq!(hi[128], 0xB8_4A_4A);
        assert_eq!(hi[255], NEUTRAL);
        assert!(table.shadows().iter().all(|&e| e == NEUTRAL));
    }

    #[test]
    fn test_red_shadows_known_values() {
        let table = generate(0, 0, 0, 100);
        // pos 206 at 128 (+78), neg 87 at 128 (-41)
        assert_eq!(table.shadows()[128], 0xCE_57_57);
        assert_eq!(table.shadows_delta(128), [78, -41, -41]);
        assert!(table.highlights().iter().all(|&e| e == NEUTRAL));
    }

    #[test]
    fn test_saturation_clamped() {
        assert_eq!(generate(10, 250, 20, -5), generate(10, 100, 20, 0));
    }

    #[test]
    fn test_hue_wraps() {
        assert_eq!(generate(-120, 100, 400, 60), generate(240, 100, 40, 60));
    }

    #[test]
    fn test_bytes_layout() {
        let table = generate(0, 100, 0, 0);
        let bytes = table.as_bytes();
        assert_eq!(bytes.len(), LOOKUP_LEN * 4);
        if cfg!(target_endian = "little") {
            // highlights row, index 128: B, G, R, A
            let at = (BAND_LEN + 128) * 4;
            assert_eq!(&bytes[at..at + 4], &[0x4A, 0x4A, 0xB8, 0x00]);
        }
    }

    #[test]
    fn test_apply_moves_toward_hue() {
        let table = generate(0, 100, 0, 100);
        let out = apply_split_tone(Bgra::opaque(128, 128, 128), &table);
        assert!(out.r() > 128);
        assert!(out.g() < 128);
        assert_eq!(out.g(), out.b());
        assert_eq!(out.a(), 255);
    }
}
