//! The four split-tone response curves.
//!
//! Hand-tuned monotone approximations of a gamma-like lift (positive) and
//! drop (negative), one pair for shadows and one for highlights. The
//! generator blends between the negative and positive curve of a band
//! depending on how strongly a channel takes part in the target hue.

use crate::ToneCurve;

/// Knots of the positive shadows curve.
pub const SHADOWS_POSITIVE: &[(u8, u8)] = &[
    (4, 18),
    (8, 29),
    (16, 45),
    (32, 75),
    (48, 105),
    (64, 132),
    (80, 157),
    (96, 178),
    (112, 194),
    (128, 206),
    (144, 213),
    (160, 217),
    (176, 220),
    (192, 223),
    (208, 226),
    (224, 233),
];

/// Knots of the negative shadows curve.
pub const SHADOWS_NEGATIVE: &[(u8, u8)] = &[
    (8, 1),
    (16, 3),
    (32, 8),
    (48, 15),
    (64, 26),
    (80, 38),
    (96, 53),
    (112, 69),
    (128, 87),
    (144, 107),
    (160, 127),
    (176, 148),
    (192, 170),
    (208, 192),
    (224, 214),
    (240, 236),
];

/// Knots of the positive highlights curve.
pub const HIGHLIGHTS_POSITIVE: &[(u8, u8)] = &[
    (12, 12),
    (16, 17),
    (32, 35),
    (48, 55),
    (64, 78),
    (80, 103),
    (96, 130),
    (112, 157),
    (128, 184),
    (144, 210),
    (152, 223),
    (160, 235),
    (168, 245),
    (176, 255),
];

/// Knots of the negative highlights curve.
pub const HIGHLIGHTS_NEGATIVE: &[(u8, u8)] = &[
    (16, 16),
    (32, 30),
    (48, 43),
    (64, 53),
    (80, 60),
    (96, 66),
    (112, 70),
    (128, 74),
    (144, 81),
    (160, 91),
    (176, 106),
    (192, 125),
    (208, 149),
    (224, 179),
    (240, 214),
    (248, 235),
];

/// Positive shadows curve.
pub fn shadows_positive() -> ToneCurve {
    ToneCurve::from_points(SHADOWS_POSITIVE.iter().copied())
}

/// Negative shadows curve.
pub fn shadows_negative() -> ToneCurve {
    ToneCurve::from_points(SHADOWS_NEGATIVE.iter().copied())
}

/// Positive highlights curve.
pub fn highlights_positive() -> ToneCurve {
    ToneCurve::from_points(HIGHLIGHTS_POSITIVE.iter().copied())
}

/// Negative highlights curve.
pub fn highlights_negative() -> ToneCurve {
    ToneCurve::from_points(HIGHLIGHTS_NEGATIVE.iter().copied())
}
