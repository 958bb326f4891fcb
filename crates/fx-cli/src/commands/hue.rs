//! Hue table command.

use anyhow::{bail, Result};
use fx_core::{hue_to_rgb, is_pure_color};

use crate::HueArgs;

pub fn run(args: HueArgs) -> Result<()> {
    if args.step == 0 {
        bail!("--step must be positive");
    }

    println!("{:>5}  {:>7}  pure", "hue", "rgb");
    for hue in (args.start..args.end).step_by(args.step as usize) {
        let c = hue_to_rgb(hue);
        println!(
            "{:>5}  #{:02X}{:02X}{:02X}  {}",
            hue,
            c.r(),
            c.g(),
            c.b(),
            if is_pure_color(c) { "yes" } else { "no" }
        );
    }
    Ok(())
}
