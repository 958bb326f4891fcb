//! Split-tone lookup tests for fx-curve.

use fx_curve::{canonical, generate, SplitToneGenerator, SplitToneParams, ToneCurve, DELTA_BIAS};

#[test]
fn test_generate_deterministic() {
    let generator = SplitToneGenerator::new();
    let a = generator.generate(45, 70, 210, 30);
    let b = generator.generate(45, 70, 210, 30);
    assert_eq!(a.as_bytes(), b.as_bytes());
    assert_eq!(a, generate(45, 70, 210, 30));
}

#[test]
fn test_half_saturation_halves_shadows() {
    let half = generate(0, 100, 180, 50);
    let full = generate(0, 100, 180, 100);

    // cyan shadows: red takes the negative curve, green and blue the positive one
    for i in 0..=255u8 {
        let h = half.shadows_delta(i);
        let f = full.shadows_delta(i);
        for ch in 0..3 {
            assert!(
                (2 * h[ch] - f[ch]).abs() <= 1,
                "index {i} channel {ch}: half {} full {}",
                h[ch],
                f[ch]
            );
        }
    }
    assert_eq!(half.highlights(), full.highlights());
}

#[test]
fn test_red_highlights_follow_curves() {
    let table = generate(0, 100, 180, 50);
    let identity = ToneCurve::identity();
    let pos = canonical::highlights_positive().subtract(&identity);
    let neg = canonical::highlights_negative().subtract(&identity);

    for i in 0..=255u8 {
        let [r, g, b] = table.highlights_delta(i);
        assert_eq!(r, pos.value(i), "red at {i}");
        assert_eq!(g, neg.value(i), "green at {i}");
        assert_eq!(b, neg.value(i), "blue at {i}");
    }
}

#[test]
fn test_entries_biased_bytes() {
    let table = generate(123, 100, 321, 100);
    for &e in table.entries() {
        assert_eq!(e >> 24, 0);
    }
    // identity at both ends of every band
    assert_eq!(table.shadows_delta(0), [0, 0, 0]);
    assert_eq!(table.highlights_delta(255), [0, 0, 0]);
    assert_eq!(table.shadows()[0], (DELTA_BIAS as u32) * 0x01_01_01);
}

#[test]
fn test_params_match_positional() {
    let params = SplitToneParams {
        highlights_hue: 30,
        highlights_saturation: 80,
        shadows_hue: 250,
        shadows_saturation: 20,
    };
    assert_eq!(
        SplitToneGenerator::new().generate_params(&params),
        generate(30, 80, 250, 20)
    );
}

#[test]
fn test_params_default() {
    let p = SplitToneParams::default();
    assert_eq!(p.highlights_saturation, 100);
    assert_eq!(p.shadows_saturation, 0);
    assert_eq!(p.highlights_hue, 0);
}
