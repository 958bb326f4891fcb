//! Integration tests for pixel math, regions and buffers.

use approx::assert_relative_eq;
use fx_core::pixel::{
    bw, div255, grayscale, luma_rec709, max3, min3, sat, sat255, HUE_BAND, HUE_SLOPE, REC709_LUMA,
};
use fx_core::{hue_to_rgb, is_pure_color, Bgra, ColorMode, Error, PixelBuffer, TiledRegion};

#[test]
fn test_div255_matches_integer_division() {
    for a in 0..=255u32 {
        for b in 0..=255u32 {
            let v = a * b;
            assert_eq!(div255(v), v / 255, "{a}*{b}");
        }
    }
}

#[test]
fn test_integer_helpers() {
    assert_eq!(bw(255, 255, 255), 255);
    assert_eq!(bw(0, 0, 0), 0);
    assert_eq!(sat255(-4), 0);
    assert_eq!(sat255(300), 255);
    assert_eq!(sat(7, 0, 5), 5);
    assert_eq!(min3(4, 2, 9), 2);
    assert_eq!(max3(4, 2, 9), 9);
}

#[test]
fn test_luma_and_grayscale_agree() {
    for v in [0u8, 1, 64, 127, 128, 200, 255] {
        assert_eq!(luma_rec709(v, v, v), v);
        let px = grayscale(Bgra::new(v, 255 - v, v / 2, 0));
        let y = luma_rec709(v, 255 - v, v / 2);
        assert_eq!(px, Bgra::new(y, y, y, 255));
    }
}

#[test]
fn test_weight_constants() {
    assert_relative_eq!(REC709_LUMA.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    assert_relative_eq!(HUE_SLOPE * HUE_BAND as f64, 255.0);
}

#[test]
fn test_hue_ramps() {
    // (int)(x * 4.25) truncates
    assert_eq!(hue_to_rgb(1), Bgra::opaque(255, 4, 0));
    assert_eq!(hue_to_rgb(30), Bgra::opaque(255, 127, 0));
    assert_eq!(hue_to_rgb(180), Bgra::opaque(0, 255, 255));
    assert_eq!(hue_to_rgb(300), Bgra::opaque(255, 0, 255));
    assert_eq!(hue_to_rgb(360), hue_to_rgb(0));
    assert_eq!(hue_to_rgb(200).a(), 255);
}

#[test]
fn test_pure_color() {
    assert!(is_pure_color(Bgra::opaque(255, 0, 17)));
    assert!(!is_pure_color(Bgra::opaque(254, 1, 17)));
    assert!(!is_pure_color(Bgra::opaque(255, 255, 255)));
    assert!(!is_pure_color(Bgra::opaque(0, 0, 0)));
}

#[test]
fn test_region_bands_cover() {
    let region = TiledRegion::new(3, 10, 6, 7);
    let bands = region.bands(3);
    assert_eq!(bands.iter().map(|b| b.height).collect::<Vec<_>>(), vec![3, 3, 1]);
    assert_eq!(bands[1].start, 3 + 3 * 10);
    assert_eq!(bands.iter().map(|b| b.target_len()).sum::<usize>(), region.target_len());
}

#[test]
fn test_region_validation() {
    let region = TiledRegion::new(0, 4, 4, 2);
    assert!(region.validate(8).is_ok());
    assert!(matches!(region.validate(7), Err(Error::InvalidRegion { available: 7, .. })));
    assert!(TiledRegion::new(0, 3, 4, 1).validate(100).is_err());
    assert!(TiledRegion::new(0, 4, 0, 1).validate(100).is_err());
}

#[test]
fn test_buffer_reuse() {
    let mut buf = PixelBuffer::new();
    assert!(buf.ensure_capacity(ColorMode::Bgra8888.row_pitch(4) * 2));
    assert_eq!(buf.pixels().len(), 8);
    assert!(!buf.ensure_capacity(16));
    assert_eq!(buf.len(), 16);
    assert_eq!(buf.as_bytes().len(), 16);
}
