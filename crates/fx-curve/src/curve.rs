//! Sparse tone curves over the 8-bit range.
//!
//! A tone curve maps every index `0..=255` to an output value. It is
//! defined by a few `(index, value)` knots; the ends are pinned to identity
//! (`0 -> 0`, `255 -> 255`) unless a knot overrides them, and values between
//! knots are linearly interpolated and rounded.
//!
//! Curves are immutable. [`subtract`](ToneCurve::subtract) and
//! [`scale`](ToneCurve::scale) return new curves, and their results may
//! leave the 0..255 range (a delta curve is signed).

use std::collections::BTreeMap;

/// Number of entries in a curve.
pub const CURVE_LEN: usize = 256;

/// A 256-entry tone curve.
///
/// # Example
///
/// ```rust
/// use fx_curve::ToneCurve;
///
/// let curve = ToneCurve::from_points([(64, 128)]);
/// assert_eq!(curve.value(0), 0);
/// assert_eq!(curve.value(32), 64);
/// assert_eq!(curve.value(64), 128);
/// assert_eq!(curve.value(255), 255);
///
/// let delta = curve.subtract(&ToneCurve::identity());
/// assert_eq!(delta.value(64), 64);
/// assert_eq!(delta.scale(0.5).value(64), 32);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ToneCurve {
    values: [i32; CURVE_LEN],
}

impl ToneCurve {
    /// The identity curve, `value(i) == i`.
    pub fn identity() -> Self {
        let mut values = [0; CURVE_LEN];
        for (i, v) in values.iter_mut().enumerate() {
            *v = i as i32;
        }
        Self { values }
    }

    /// Builds a curve from knots.
    ///
    /// Knots may come in any order; a later knot at the same index replaces
    /// an earlier one. Implicit identity knots at 0 and 255 are added when
    /// not given.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (u8, u8)>,
    {
        let mut knots: BTreeMap<u8, u8> = points.into_iter().collect();
        knots.entry(0).or_insert(0);
        knots.entry(u8::MAX).or_insert(u8::MAX);

        let mut values = [0; CURVE_LEN];
        let knots: Vec<(u8, u8)> = knots.into_iter().collect();
        for pair in knots.windows(2) {
            let (x0, y0) = (pair[0].0 as usize, pair[0].1 as f64);
            let (x1, y1) = (pair[1].0 as usize, pair[1].1 as f64);
            let span = (x1 - x0) as f64;
            for (i, v) in values.iter_mut().enumerate().take(x1 + 1).skip(x0) {
                let t = (i - x0) as f64 / span;
                *v = (y0 + (y1 - y0) * t).round() as i32;
            }
        }
        Self { values }
    }

    /// Value at `index`.
    #[inline]
    pub fn value(&self, index: u8) -> i32 {
        self.values[index as usize]
    }

    /// All 256 values.
    #[inline]
    pub fn values(&self) -> &[i32; CURVE_LEN] {
        &self.values
    }

    /// Index-wise difference `self[i] - other[i]`.
    pub fn subtract(&self, other: &ToneCurve) -> Self {
        let mut values = self.values;
        for (v, o) in values.iter_mut().zip(other.values.iter()) {
            *v -= o;
        }
        Self { values }
    }

    /// Index-wise `round(self[i] * factor)`.
    pub fn scale(&self, factor: f64) -> Self {
        let mut values = self.values;
        for v in values.iter_mut() {
            *v = (*v as f64 * factor).round() as i32;
        }
        Self { values }
    }

    /// Returns `true` if every value equals its index.
    pub fn is_identity(&self) -> bool {
        self.values.iter().enumerate().all(|(i, &v)| v == i as i32)
    }
}

impl Default for ToneCurve {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::fmt::Debug for ToneCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToneCurve")
            .field("knots", &[0usize, 64, 128, 192, 255].map(|i| (i, self.values[i])))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let c = ToneCurve::identity();
        assert!(c.is_identity());
        assert_eq!(ToneCurve::from_points([]), c);
        assert_eq!(ToneCurve::default(), c);
    }

    #[test]
    fn test_interpolation_rounds() {
        let c = ToneCurve::from_points([(4, 18), (8, 29)]);
        assert_eq!(c.value(2), 9);
        // 18 + 11 * 0.25 = 20.75
        assert_eq!(c.value(5), 21);
        assert_eq!(c.value(8), 29);
        // 29 + (255 - 29) * (1 / 247) = 29.91
        assert_eq!(c.value(9), 30);
    }

    #[test]
    fn test_endpoints_override() {
        let c = ToneCurve::from_points([(0, 10), (255, 200)]);
        assert_eq!(c.value(0), 10);
        assert_eq!(c.value(255), 200);
        assert_eq!(c.value(128), 105);
    }

    #[test]
    fn test_later_knot_wins() {
        let c = ToneCurve::from_points([(100, 50), (100, 60)]);
        assert_eq!(c.value(100), 60);
    }

    #[test]
    fn test_unordered_knots() {
        let a = ToneCurve::from_points([(32, 75), (16, 45)]);
        let b = ToneCurve::from_points([(16, 45), (32, 75)]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_subtract_and_scale() {
        let c = ToneCurve::from_points([(128, 87)]);
        let delta = c.subtract(&ToneCurve::identity());
        assert_eq!(delta.value(128), -41);
        assert_eq!(delta.value(0), 0);
        assert_eq!(delta.value(255), 0);

        // -20.5 rounds away from zero
        assert_eq!(delta.scale(0.5).value(128), -21);
        assert_eq!(delta.scale(0.0), ToneCurve::identity().subtract(&ToneCurve::identity()));
        assert_eq!(delta.scale(1.0), delta);
    }
}
