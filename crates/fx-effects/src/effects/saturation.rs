//! Saturation around Rec.709 luma.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use tracing::trace;

use fx_core::Result;

use super::{check_float, Effect, EffectKind};
use crate::backend::{RenderBackend, SupportedBackends};
use crate::host::{EffectContext, TransformGraph};
use crate::node::{unknown_property, EffectNode, EffectProperties, PropertyValue, SharedConfig};
use crate::shaders::{self, ShaderCode};
use crate::worker::{ChangeType, ShaderState, ShaderWorker, Worker};

/// Saturation effect type.
#[derive(Debug)]
pub struct Saturation;

/// Saturation effect node.
pub type SaturationEffect = Effect<Saturation>;

impl EffectKind for Saturation {
    type Properties = SaturationProperties;
    const NAME: &'static str = "saturation";
    const BACKENDS: SupportedBackends = SupportedBackends::GPU;

    fn worker(config: &SharedConfig<SaturationProperties>, backend: RenderBackend) -> Option<Worker> {
        match backend {
            RenderBackend::Gpu => Some(Worker::Shader(Box::new(SaturationShaderWorker::new(config.clone())))),
            RenderBackend::Cpu => None,
        }
    }
}

/// Saturation level; 0 is grayscale, 1 leaves the input unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaturationProperties {
    /// Level in `[0, 1]`
    pub level: f64,
}

impl Default for SaturationProperties {
    fn default() -> Self {
        Self { level: 0.8 }
    }
}

fn check_level(value: f64) -> Result<f64> {
    check_float("level", value, |v| (0.0..=1.0).contains(&v), "in [0, 1]")
}

impl EffectProperties for SaturationProperties {
    const NAMES: &'static [&'static str] = &["level"];

    fn get(&self, name: &str) -> Result<PropertyValue> {
        match name {
            "level" => Ok(self.level.into()),
            _ => Err(unknown_property(name, Self::NAMES)),
        }
    }

    fn set(&mut self, name: &str, value: PropertyValue) -> Result<()> {
        match name {
            "level" => {
                self.level = check_level(value.as_float(name)?)?;
                Ok(())
            }
            _ => Err(unknown_property(name, Self::NAMES)),
        }
    }

    fn validate(&self) -> Result<()> {
        check_level(self.level).map(|_| ())
    }
}

impl Effect<Saturation> {
    /// Saturation level.
    pub fn level(&self) -> f64 {
        self.properties().level
    }

    /// Sets the level; rejects values outside `[0, 1]`.
    pub fn set_level(&self, level: f64) -> Result<()> {
        self.set_property("level", level.into())
    }
}

/// Constant buffer layout, matching the WGSL `Saturation` uniform.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct SaturationConstants {
    /// Level
    pub level: f32,
    /// Pads to 16 bytes
    pub _pad: [f32; 3],
}

/// Saturation shader worker.
#[derive(Debug)]
pub struct SaturationShaderWorker {
    config: SharedConfig<SaturationProperties>,
    state: ShaderState,
    constants: SaturationConstants,
}

impl SaturationShaderWorker {
    /// Creates a worker bound to `config`.
    pub fn new(config: SharedConfig<SaturationProperties>) -> Self {
        let constants = SaturationConstants {
            level: config.properties().level as f32,
            _pad: [0.0; 3],
        };
        Self {
            config,
            state: ShaderState::default(),
            constants,
        }
    }

    /// The owning node's configuration.
    pub fn configuration(&self) -> &SharedConfig<SaturationProperties> {
        &self.config
    }

    /// Rebinds the worker; constants refresh on the next change.
    pub fn set_configuration(&mut self, config: SharedConfig<SaturationProperties>) {
        self.config = config;
    }
}

impl ShaderWorker for SaturationShaderWorker {
    fn shader(&self) -> &ShaderCode {
        &shaders::SATURATION
    }

    fn constant_buffer(&self) -> Option<&[u8]> {
        Some(bytemuck::bytes_of(&self.constants))
    }

    fn initialize(&mut self, context: &mut dyn EffectContext, graph: &mut dyn TransformGraph) -> Result<()> {
        let input_count = self.input_count();
        self.state.initialize(&shaders::SATURATION, input_count, context, graph)
    }

    fn prepare_for_render(&mut self, change: ChangeType) -> Result<()> {
        self.state.ensure_usable()?;
        if change != ChangeType::None {
            self.constants.level = self.config.properties().level as f32;
            trace!(?change, level = self.constants.level, "Rebuilt saturation constants");
        }
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.state.is_initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{RecordingContext, RecordingGraph};

    #[test]
    fn test_level_range() {
        let effect = SaturationEffect::new();
        assert_eq!(effect.level(), 0.8);
        assert!(effect.set_level(1.5).unwrap_err().is_invalid_argument());
        assert!(effect.set_level(-0.1).is_err());
        assert!(effect.set_level(f64::NAN).is_err());
        assert_eq!(effect.level(), 0.8);
        effect.set_level(0.0).unwrap();
        effect.set_property("level", PropertyValue::Int(1)).unwrap();
        assert_eq!(effect.level(), 1.0);
    }

    #[test]
    fn test_constant_buffer() {
        let effect = SaturationEffect::new();
        let mut w = effect.create_worker(RenderBackend::Gpu).unwrap().into_shader().unwrap();
        let mut ctx = RecordingContext::new();
        let mut graph = RecordingGraph::new();
        w.initialize(&mut ctx, &mut graph).unwrap();
        assert!(w.is_initialized());

        effect.set_level(0.25).unwrap();
        w.prepare_for_render(ChangeType::Properties).unwrap();
        let bytes = w.constant_buffer().unwrap();
        assert_eq!(bytes.len(), 16);
        assert_eq!(bytemuck::cast_slice::<u8, f32>(bytes)[0], 0.25);
    }

    #[test]
    fn test_yaml_config() {
        let p: SaturationProperties = serde_yaml::from_str("{}").unwrap();
        assert_eq!(p.level, 0.8);
        let p: SaturationProperties = serde_yaml::from_str("level: 0.5").unwrap();
        assert!(p.validate().is_ok());
    }
}
