//! Synthetic CPU render command.
//!
//! Builds a gradient, renders it through the chosen effect with the
//! in-process CPU renderer and prints per-channel stats.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use fx_core::{Bgra, Error};
use fx_curve::{apply_split_tone, SplitToneGenerator, SplitToneParams};
use fx_effects::{BitmapImageSource, CpuRenderer, EffectNode, LeafImage};

use super::EffectName;
use crate::RenderArgs;

/// Red ramps left to right, green top to bottom, blue is their complement.
fn gradient(width: u32, height: u32) -> Vec<Bgra> {
    let ramp = |v: u32, n: u32| if n > 1 { (v * 255 / (n - 1)) as u8 } else { 0 };
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        for x in 0..width {
            let r = ramp(x, width);
            let g = ramp(y, height);
            pixels.push(Bgra::opaque(r, g, 255 - r / 2 - g / 2));
        }
    }
    pixels
}

/// Split tone has no CPU worker; render it with the lookup reference instead.
fn split_tone_reference(effect: &dyn EffectNode, input: &LeafImage) -> Result<LeafImage> {
    let int = |name: &str| -> Result<i32> { Ok(effect.property(name)?.as_int(name)?) };
    let params = SplitToneParams {
        highlights_hue: int("highlights_hue")?,
        highlights_saturation: int("highlights_saturation")?,
        shadows_hue: int("shadows_hue")?,
        shadows_saturation: int("shadows_saturation")?,
    };
    let table = SplitToneGenerator::new().generate_params(&params);
    let pixels: Vec<Bgra> = input.pixels.iter().map(|&p| apply_split_tone(p, &table)).collect();
    Ok(LeafImage {
        width: input.width,
        height: input.height,
        pixels: pixels.into(),
    })
}

pub fn run(args: RenderArgs, verbose: u8) -> Result<()> {
    if args.width == 0 || args.height == 0 {
        bail!("Image size must be positive, got {}x{}", args.width, args.height);
    }

    let effect = super::build_effect(args.effect, args.params.as_deref())?;
    let source = BitmapImageSource::new(gradient(args.width, args.height), args.width, args.height)?;
    let input = LeafImage {
        width: source.width(),
        height: source.height(),
        pixels: source.pixels().into(),
    };
    effect.set_source(Some(Arc::new(source)));

    let mut renderer = CpuRenderer::new().parallel(args.parallel);
    if let Some(rows) = args.tile_rows {
        renderer = renderer.with_band_rows(rows);
    }

    if verbose > 0 {
        println!(
            "Rendering {} at {}x{} ({})",
            effect.kind(),
            args.width,
            args.height,
            super::describe_properties(effect.as_ref())?
        );
    }

    let start = Instant::now();
    let output = match renderer.render(effect.as_ref()) {
        Ok(image) => image,
        Err(Error::BackendUnavailable { .. }) if args.effect == EffectName::SplitTone => {
            warn!("split_tone has no CPU worker, using the lookup reference");
            split_tone_reference(effect.as_ref(), &input)?
        }
        Err(e) => return Err(e).with_context(|| format!("Cannot render {} on the CPU", effect.kind())),
    };
    let elapsed = start.elapsed();
    info!(elapsed_ms = elapsed.as_secs_f64() * 1000.0, "render done");

    println!("{} {}x{}", effect.kind(), output.width, output.height);
    print_stats(&output);
    println!("  Time: {:.3} ms", elapsed.as_secs_f64() * 1000.0);
    Ok(())
}

fn print_stats(image: &LeafImage) {
    let names = ["R", "G", "B", "A"];
    let n = image.pixels.len().max(1) as f64;
    for (ch, name) in names.iter().enumerate() {
        let values = image.pixels.iter().map(|p| match ch {
            0 => p.r(),
            1 => p.g(),
            2 => p.b(),
            _ => p.a(),
        });
        let (mut min, mut max, mut sum) = (u8::MAX, u8::MIN, 0u64);
        for v in values {
            min = min.min(v);
            max = max.max(v);
            sum += v as u64;
        }
        println!("  {name}: min {min:>3}  max {max:>3}  mean {:>7.2}", sum as f64 / n);
    }
}
