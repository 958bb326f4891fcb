//! Split-tone lookup command.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use fx_curve::{LookupTable, SplitToneGenerator, SplitToneParams, BAND_LEN};

use crate::{LutArgs, OutputFormat};

#[derive(Serialize)]
struct LutDump {
    params: SplitToneParams,
    shadows: Vec<[i32; 3]>,
    highlights: Vec<[i32; 3]>,
}

/// Resolves parameters from YAML then flags.
fn resolve_params(args: &LutArgs) -> Result<SplitToneParams> {
    let mut params = match &args.params {
        Some(yaml) => serde_yaml::from_str(yaml).with_context(|| format!("Invalid parameter YAML: {yaml}"))?,
        None => SplitToneParams::default(),
    };
    if let Some(v) = args.highlights_hue {
        params.highlights_hue = v;
    }
    if let Some(v) = args.highlights_saturation {
        params.highlights_saturation = v;
    }
    if let Some(v) = args.shadows_hue {
        params.shadows_hue = v;
    }
    if let Some(v) = args.shadows_saturation {
        params.shadows_saturation = v;
    }
    Ok(params)
}

pub fn run(args: LutArgs) -> Result<()> {
    let params = resolve_params(&args)?;
    debug!(?params, "lut");
    let table = SplitToneGenerator::new().generate_params(&params);
    let step = args.step.max(1);

    match args.format {
        OutputFormat::Text => print_text(&params, &table, step),
        OutputFormat::Yaml => {
            let dump = LutDump {
                params,
                shadows: (0..BAND_LEN).step_by(step).map(|i| table.shadows_delta(i as u8)).collect(),
                highlights: (0..BAND_LEN).step_by(step).map(|i| table.highlights_delta(i as u8)).collect(),
            };
            print!("{}", serde_yaml::to_string(&dump)?);
        }
    }
    Ok(())
}

fn print_text(params: &SplitToneParams, table: &LookupTable, step: usize) {
    println!(
        "highlights: hue {} sat {}   shadows: hue {} sat {}",
        params.highlights_hue, params.highlights_saturation, params.shadows_hue, params.shadows_saturation
    );
    println!("{:>5}  {:>8}  {:>15}  {:>8}  {:>15}", "index", "shadows", "delta", "highlts", "delta");
    for i in (0..BAND_LEN).step_by(step) {
        let s = table.shadows_delta(i as u8);
        let h = table.highlights_delta(i as u8);
        println!(
            "{:>5}  {:06X}  {:>5}{:>5}{:>5}  {:06X}  {:>5}{:>5}{:>5}",
            i,
            table.shadows()[i],
            s[0],
            s[1],
            s[2],
            table.highlights()[i],
            h[0],
            h[1],
            h[2]
        );
    }
}
