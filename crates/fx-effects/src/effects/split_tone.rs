//! Split toning: tints shadows and highlights with two hues.
//!
//! The shader samples a 256x2 lookup texture generated from the four
//! properties. The texture is built the first time the host asks for it and
//! kept for the worker's lifetime; a property change needs a new worker.

use std::sync::Arc;

use tracing::debug;

use fx_core::{ColorMode, Error, Result};
use fx_curve::{SplitToneGenerator, SplitToneParams, BAND_LEN, MAX_SATURATION};

use super::{Effect, EffectKind};
use crate::backend::{RenderBackend, SupportedBackends};
use crate::host::{EffectContext, TransformGraph};
use crate::node::{unknown_property, EffectNode, EffectProperties, PropertyValue, SharedConfig};
use crate::shaders::{self, ShaderCode};
use crate::worker::{
    BorderSampling, ChangeType, Filter, ResourceTexture, ResourceTextureOptions, ShaderState,
    ShaderWorker, Worker,
};

/// Split-tone effect type.
#[derive(Debug)]
pub struct SplitTone;

/// Split-tone effect node.
pub type SplitToneEffect = Effect<SplitTone>;

impl EffectKind for SplitTone {
    type Properties = SplitToneParams;
    const NAME: &'static str = "split_tone";
    const BACKENDS: SupportedBackends = SupportedBackends::GPU;

    fn worker(config: &SharedConfig<SplitToneParams>, backend: RenderBackend) -> Option<Worker> {
        match backend {
            RenderBackend::Gpu => Some(Worker::Shader(Box::new(SplitToneShaderWorker::new(config.clone())))),
            RenderBackend::Cpu => None,
        }
    }
}

fn check_saturation(name: &str, value: i32) -> Result<i32> {
    if (0..=MAX_SATURATION).contains(&value) {
        Ok(value)
    } else {
        Err(Error::invalid_argument(name, format!("{value} not in [0, {MAX_SATURATION}]")))
    }
}

impl EffectProperties for SplitToneParams {
    const NAMES: &'static [&'static str] = &[
        "highlights_hue",
        "highlights_saturation",
        "shadows_hue",
        "shadows_saturation",
    ];

    fn get(&self, name: &str) -> Result<PropertyValue> {
        let v = match name {
            "highlights_hue" => self.highlights_hue,
            "highlights_saturation" => self.highlights_saturation,
            "shadows_hue" => self.shadows_hue,
            "shadows_saturation" => self.shadows_saturation,
            _ => return Err(unknown_property(name, Self::NAMES)),
        };
        Ok(v.into())
    }

    fn set(&mut self, name: &str, value: PropertyValue) -> Result<()> {
        match name {
            "highlights_hue" => self.highlights_hue = value.as_int(name)?,
            "highlights_saturation" => {
                self.highlights_saturation = check_saturation(name, value.as_int(name)?)?
            }
            "shadows_hue" => self.shadows_hue = value.as_int(name)?,
            "shadows_saturation" => self.shadows_saturation = check_saturation(name, value.as_int(name)?)?,
            _ => return Err(unknown_property(name, Self::NAMES)),
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        check_saturation("highlights_saturation", self.highlights_saturation)?;
        check_saturation("shadows_saturation", self.shadows_saturation)?;
        Ok(())
    }
}

impl Effect<SplitTone> {
    /// Highlights hue in degrees.
    pub fn highlights_hue(&self) -> i32 {
        self.properties().highlights_hue
    }

    /// Sets the highlights hue; any value is accepted and wrapped at generation.
    pub fn set_highlights_hue(&self, hue: i32) -> Result<()> {
        self.set_property("highlights_hue", hue.into())
    }

    /// Highlights saturation, 0..=100.
    pub fn highlights_saturation(&self) -> i32 {
        self.properties().highlights_saturation
    }

    /// Sets the highlights saturation; rejects values outside 0..=100.
    pub fn set_highlights_saturation(&self, saturation: i32) -> Result<()> {
        self.set_property("highlights_saturation", saturation.into())
    }

    /// Shadows hue in degrees.
    pub fn shadows_hue(&self) -> i32 {
        self.properties().shadows_hue
    }

    /// Sets the shadows hue.
    pub fn set_shadows_hue(&self, hue: i32) -> Result<()> {
        self.set_property("shadows_hue", hue.into())
    }

    /// Shadows saturation, 0..=100.
    pub fn shadows_saturation(&self) -> i32 {
        self.properties().shadows_saturation
    }

    /// Sets the shadows saturation; rejects values outside 0..=100.
    pub fn set_shadows_saturation(&self, saturation: i32) -> Result<()> {
        self.set_property("shadows_saturation", saturation.into())
    }
}

const TEXTURE_OPTIONS: ResourceTextureOptions = ResourceTextureOptions {
    filter: Filter::Point,
    border_x: BorderSampling::Clamp,
    border_y: BorderSampling::Clamp,
};

/// Split-tone shader worker with one lazily built lookup texture.
#[derive(Debug)]
pub struct SplitToneShaderWorker {
    config: SharedConfig<SplitToneParams>,
    state: ShaderState,
    texture: Option<ResourceTexture>,
}

impl SplitToneShaderWorker {
    /// Creates a worker bound to `config`.
    pub fn new(config: SharedConfig<SplitToneParams>) -> Self {
        Self {
            config,
            state: ShaderState::default(),
            texture: None,
        }
    }

    /// The owning node's configuration.
    pub fn configuration(&self) -> &SharedConfig<SplitToneParams> {
        &self.config
    }

    /// Rebinds the worker to another node. An already built texture is kept.
    pub fn set_configuration(&mut self, config: SharedConfig<SplitToneParams>) {
        self.config = config;
    }

    /// Returns `true` once the lookup texture has been built.
    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }

    fn lookup_texture(&mut self) -> &ResourceTexture {
        let config = &self.config;
        self.texture.get_or_insert_with(|| {
            let params = config.properties();
            let table = SplitToneGenerator::new().generate_params(&params);
            debug!(?params, "Built split-tone lookup texture");
            let mode = ColorMode::Bgra8888;
            ResourceTexture {
                width: BAND_LEN as u32,
                height: 2,
                color_mode: mode,
                pitch: mode.row_pitch(BAND_LEN as u32) as u32,
                data: Arc::from(table.as_bytes()),
            }
        })
    }
}

impl ShaderWorker for SplitToneShaderWorker {
    fn shader(&self) -> &ShaderCode {
        &shaders::SPLIT_TONE
    }

    fn resource_texture_count(&self) -> u32 {
        1
    }

    fn resource_textures(&mut self) -> Result<Vec<ResourceTexture>> {
        self.state.ensure_usable()?;
        Ok(vec![self.lookup_texture().clone()])
    }

    fn resource_texture_options(&self) -> Vec<ResourceTextureOptions> {
        vec![TEXTURE_OPTIONS]
    }

    fn initialize(&mut self, context: &mut dyn EffectContext, graph: &mut dyn TransformGraph) -> Result<()> {
        let input_count = self.input_count();
        self.state.initialize(&shaders::SPLIT_TONE, input_count, context, graph)
    }

    fn prepare_for_render(&mut self, _change: ChangeType) -> Result<()> {
        self.state.ensure_usable()
    }

    fn is_initialized(&self) -> bool {
        self.state.is_initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturation_range() {
        let effect = SplitToneEffect::new();
        assert!(effect.set_shadows_saturation(101).unwrap_err().is_invalid_argument());
        assert!(effect.set_highlights_saturation(-1).is_err());
        assert_eq!(effect.shadows_saturation(), 0);
        assert_eq!(effect.highlights_saturation(), 100);

        effect.set_shadows_saturation(100).unwrap();
        effect.set_highlights_saturation(0).unwrap();
        assert_eq!(effect.shadows_saturation(), 100);
        assert_eq!(effect.highlights_saturation(), 0);
    }

    #[test]
    fn test_hues_unrestricted() {
        let effect = SplitToneEffect::new();
        effect.set_highlights_hue(-45).unwrap();
        effect.set_shadows_hue(725).unwrap();
        assert_eq!(effect.highlights_hue(), -45);
        assert_eq!(effect.property("shadows_hue").unwrap(), PropertyValue::Int(725));
    }

    #[test]
    fn test_float_rejected() {
        let effect = SplitToneEffect::new();
        assert!(effect.set_property("shadows_hue", 1.5.into()).is_err());
        assert_eq!(effect.shadows_hue(), 0);
    }

    #[test]
    fn test_set_properties_all_or_nothing() {
        let effect = SplitToneEffect::new();
        let bad = SplitToneParams {
            highlights_hue: 90,
            shadows_saturation: 150,
            ..Default::default()
        };
        assert!(effect.set_properties(bad).is_err());
        assert_eq!(effect.properties(), SplitToneParams::default());
    }

    #[test]
    fn test_texture_layout() {
        let mut w = SplitToneShaderWorker::new(SharedConfig::new(SplitToneParams::default()));
        assert!(!w.has_texture());
        let tex = w.resource_textures().unwrap().remove(0);
        assert_eq!((tex.width, tex.height, tex.pitch), (256, 2, 1024));
        assert_eq!(tex.data.len(), 2048);
        assert_eq!(w.resource_texture_options(), vec![TEXTURE_OPTIONS]);

        let table = SplitToneGenerator::new().generate_params(&SplitToneParams::default());
        assert_eq!(&tex.data[..], table.as_bytes());
    }

    #[test]
    fn test_texture_cached() {
        let config = SharedConfig::new(SplitToneParams::default());
        let mut w = SplitToneShaderWorker::new(config.clone());
        let first = w.resource_textures().unwrap().remove(0);

        config.update(|p| p.set("highlights_hue", 200.into())).unwrap();
        w.prepare_for_render(ChangeType::Properties).unwrap();
        let second = w.resource_textures().unwrap().remove(0);
        assert!(Arc::ptr_eq(&first.data, &second.data));
    }
}
