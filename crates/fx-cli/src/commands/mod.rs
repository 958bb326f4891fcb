//! CLI command implementations

pub mod hue;
pub mod lut;
pub mod render;
pub mod shader;

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use clap::ValueEnum;
use fx_effects::{
    EffectNode, GrayscaleEffect, MagnifySmoothEffect, PropertyValue, SaturationEffect,
    SplitToneEffect,
};

/// Effects selectable on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EffectName {
    Grayscale,
    SplitTone,
    MagnifySmooth,
    Saturation,
}

/// Parses an inline YAML mapping of property names to numbers.
pub fn parse_properties(yaml: &str) -> Result<BTreeMap<String, PropertyValue>> {
    serde_yaml::from_str(yaml).with_context(|| format!("Invalid property YAML: {yaml}"))
}

/// Builds an effect node and applies `params`, if any.
pub fn build_effect(name: EffectName, params: Option<&str>) -> Result<Box<dyn EffectNode>> {
    let effect: Box<dyn EffectNode> = match name {
        EffectName::Grayscale => Box::new(GrayscaleEffect::new()),
        EffectName::SplitTone => Box::new(SplitToneEffect::new()),
        EffectName::MagnifySmooth => Box::new(MagnifySmoothEffect::new()),
        EffectName::Saturation => Box::new(SaturationEffect::new()),
    };

    if let Some(yaml) = params {
        for (key, value) in parse_properties(yaml)? {
            effect
                .set_property(&key, value)
                .with_context(|| format!("Cannot set {key} = {value} on {}", effect.kind()))?;
        }
    }
    Ok(effect)
}

/// Prints every property of `effect` on one line.
pub fn describe_properties(effect: &dyn EffectNode) -> Result<String> {
    let mut parts = Vec::with_capacity(effect.property_names().len());
    for name in effect.property_names() {
        parts.push(format!("{name}={}", effect.property(name)?));
    }
    Ok(if parts.is_empty() {
        "(none)".to_string()
    } else {
        parts.join(" ")
    })
}
