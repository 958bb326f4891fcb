//! Smooth circular magnifier.

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

/// Magnify-smooth effect type.
#[derive(Debug)]
pub struct MagnifySmooth;

/// Magnify-smooth effect node.
pub type MagnifySmoothEffect = Effect<MagnifySmooth>;

impl EffectKind for MagnifySmooth {
    type Properties = MagnifySmoothProperties;
    const NAME: &'static str = "magnify_smooth";
    const BACKENDS: SupportedBackends = SupportedBackends::GPU;

    fn worker(config: &SharedConfig<MagnifySmoothProperties>, backend: RenderBackend) -> Option<Worker> {
        match backend {
            RenderBackend::Gpu => Some(Worker::Shader(Box::new(MagnifySmoothShaderWorker::new(config.clone())))),
            RenderBackend::Cpu => None,
        }
    }
}

/// Magnifier geometry, in normalized image coordinates.
///
/// ```rust
/// use fx_effects::MagnifySmoothProperties;
///
/// let p: MagnifySmoothProperties = serde_yaml::from_str("magnification_amount: 3.0").unwrap();
/// assert_eq!(p.magnification_amount, 3.0);
/// assert_eq!(p.inner_radius, 0.2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagnifySmoothProperties {
    /// Radius of the fully magnified disc
    pub inner_radius: f64,
    /// Radius where magnification has faded out
    pub outer_radius: f64,
    /// Zoom factor inside the inner radius
    pub magnification_amount: f64,
    /// Center x
    pub horizontal_position: f64,
    /// Center y
    pub vertical_position: f64,
    /// Width over height of the lens
    pub aspect_ratio: f64,
}

impl Default for MagnifySmoothProperties {
    fn default() -> Self {
        Self {
            inner_radius: 0.2,
            outer_radius: 0.4,
            magnification_amount: 2.0,
            horizontal_position: 0.3,
            vertical_position: 0.3,
            aspect_ratio: 1.0,
        }
    }
}

impl MagnifySmoothProperties {
    fn field_mut(&mut self, name: &str) -> Option<&mut f64> {
        Some(match name {
            "inner_radius" => &mut self.inner_radius,
            "outer_radius" => &mut self.outer_radius,
            "magnification_amount" => &mut self.magnification_amount,
            "horizontal_position" => &mut self.horizontal_position,
            "vertical_position" => &mut self.vertical_position,
            "aspect_ratio" => &mut self.aspect_ratio,
            _ => return None,
        })
    }

    fn check(name: &str, value: f64) -> Result<f64> {
        match name {
            "inner_radius" | "outer_radius" => check_float(name, value, |v| v >= 0.0, "a non-negative radius"),
            "magnification_amount" | "aspect_ratio" => check_float(name, value, |v| v > 0.0, "positive"),
            _ => check_float(name, value, |_| true, "finite"),
        }
    }
}

impl EffectProperties for MagnifySmoothProperties {
    const NAMES: &'static [&'static str] = &[
        "inner_radius",
        "outer_radius",
        "magnification_amount",
        "horizontal_position",
        "vertical_position",
        "aspect_ratio",
    ];

    fn get(&self, name: &str) -> Result<PropertyValue> {
        let mut copy = *self;
        match copy.field_mut(name) {
            Some(v) => Ok(PropertyValue::Float(*v)),
            None => Err(unknown_property(name, Self::NAMES)),
        }
    }

    fn set(&mut self, name: &str, value: PropertyValue) -> Result<()> {
        let value = value.as_float(name)?;
        let field = self
            .field_mut(name)
            .ok_or_else(|| unknown_property(name, Self::NAMES))?;
        *field = Self::check(name, value)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        for &name in Self::NAMES {
            let value = self.get(name)?.as_float(name)?;
            Self::check(name, value)?;
        }
        Ok(())
    }
}

impl Effect<MagnifySmooth> {
    /// Radius of the fully magnified disc.
    pub fn inner_radius(&self) -> f64 {
        self.properties().inner_radius
    }

    /// Sets the inner radius; must be finite and non-negative.
    pub fn set_inner_radius(&self, v: f64) -> Result<()> {
        self.set_property("inner_radius", v.into())
    }

    /// Radius where magnification has faded out.
    pub fn outer_radius(&self) -> f64 {
        self.properties().outer_radius
    }

    /// Sets the outer radius; must be finite and non-negative.
    pub fn set_outer_radius(&self, v: f64) -> Result<()> {
        self.set_property("outer_radius", v.into())
    }

    /// Zoom factor.
    pub fn magnification_amount(&self) -> f64 {
        self.properties().magnification_amount
    }

    /// Sets the zoom factor; must be finite and positive.
    pub fn set_magnification_amount(&self, v: f64) -> Result<()> {
        self.set_property("magnification_amount", v.into())
    }

    /// Center x.
    pub fn horizontal_position(&self) -> f64 {
        self.properties().horizontal_position
    }

    /// Sets center x.
    pub fn set_horizontal_position(&self, v: f64) -> Result<()> {
        self.set_property("horizontal_position", v.into())
    }

    /// Center y.
    pub fn vertical_position(&self) -> f64 {
        self.properties().vertical_position
    }

    /// Sets center y.
    pub fn set_vertical_position(&self, v: f64) -> Result<()> {
        self.set_property("vertical_position", v.into())
    }

    /// Lens aspect ratio.
    pub fn aspect_ratio(&self) -> f64 {
        self.properties().aspect_ratio
    }

    /// Sets the lens aspect ratio; must be finite and positive.
    pub fn set_aspect_ratio(&self, v: f64) -> Result<()> {
        self.set_property("aspect_ratio", v.into())
    }
}

/// Constant buffer layout, matching the WGSL `Magnify` uniform.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct MagnifySmoothConstants {
    /// Inner radius
    pub inner_radius: f32,
    /// Outer radius
    pub outer_radius: f32,
    /// Zoom factor
    pub magnification_amount: f32,
    /// Center x
    pub horizontal_position: f32,
    /// Center y
    pub vertical_position: f32,
    /// Aspect ratio
    pub aspect_ratio: f32,
    /// Pads to 32 bytes
    pub _pad: [f32; 2],
}

impl From<&MagnifySmoothProperties> for MagnifySmoothConstants {
    fn from(p: &MagnifySmoothProperties) -> Self {
        Self {
            inner_radius: p.inner_radius as f32,
            outer_radius: p.outer_radius as f32,
            magnification_amount: p.magnification_amount as f32,
            horizontal_position: p.horizontal_position as f32,
            vertical_position: p.vertical_position as f32,
            aspect_ratio: p.aspect_ratio as f32,
            _pad: [0.0; 2],
        }
    }
}

/// Magnify-smooth shader worker.
#[derive(Debug)]
pub struct MagnifySmoothShaderWorker {
    config: SharedConfig<MagnifySmoothProperties>,
    state: ShaderState,
    constants: MagnifySmoothConstants,
}

impl MagnifySmoothShaderWorker {
    /// Creates a worker bound to `config`, with constants from its current
    /// properties.
    pub fn new(config: SharedConfig<MagnifySmoothProperties>) -> Self {
        let constants = MagnifySmoothConstants::from(&config.properties());
        Self {
            config,
            state: ShaderState::default(),
            constants,
        }
    }

    /// The owning node's configuration.
    pub fn configuration(&self) -> &SharedConfig<MagnifySmoothProperties> {
        &self.config
    }

    /// Rebinds the worker; constants refresh on the next change.
    pub fn set_configuration(&mut self, config: SharedConfig<MagnifySmoothProperties>) {
        self.config = config;
    }

    /// Current constants.
    pub fn constants(&self) -> &MagnifySmoothConstants {
        &self.constants
    }
}

impl ShaderWorker for MagnifySmoothShaderWorker {
    fn shader(&self) -> &ShaderCode {
        &shaders::MAGNIFY_SMOOTH
    }

    fn constant_buffer(&self) -> Option<&[u8]> {
        Some(bytemuck::bytes_of(&self.constants))
    }

    fn initialize(&mut self, context: &mut dyn EffectContext, graph: &mut dyn TransformGraph) -> Result<()> {
        let input_count = self.input_count();
        self.state.initialize(&shaders::MAGNIFY_SMOOTH, input_count, context, graph)
    }

    fn prepare_for_render(&mut self, change: ChangeType) -> Result<()> {
        self.state.ensure_usable()?;
        if change == ChangeType::None {
            return Ok(());
        }
        self.constants = MagnifySmoothConstants::from(&self.config.properties());
        trace!(?change, constants = ?self.constants, "Rebuilt magnify constants");
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.state.is_initialized()
    }
}
