//! Rec.709 grayscale, on both backends.

use fx_core::pixel::grayscale;
use fx_core::{Bgra, Result};

use super::{Effect, EffectKind, NoProperties};
use crate::backend::{RenderBackend, SupportedBackends};
use crate::host::{EffectContext, TransformGraph};
use crate::node::SharedConfig;
use crate::shaders::{self, ShaderCode};
use crate::worker::{ChangeType, CpuKernel, CpuTiledWorker, ShaderState, ShaderWorker, Worker};

/// Grayscale effect type.
#[derive(Debug)]
pub struct Grayscale;

/// Grayscale effect node.
pub type GrayscaleEffect = Effect<Grayscale>;

impl EffectKind for Grayscale {
    type Properties = NoProperties;
    const NAME: &'static str = "grayscale";
    const BACKENDS: SupportedBackends = SupportedBackends::MIXED;

    fn worker(config: &SharedConfig<NoProperties>, backend: RenderBackend) -> Option<Worker> {
        Some(match backend {
            RenderBackend::Cpu => Worker::Cpu(Box::new(CpuTiledWorker::<GrayscaleKernel>::new(config.clone()))),
            RenderBackend::Gpu => Worker::Shader(Box::new(GrayscaleShaderWorker::new(config.clone()))),
        })
    }
}

/// Per-pixel grayscale: opaque, R = G = B = rounded Rec.709 luma.
#[derive(Debug, Clone, Copy)]
pub struct GrayscaleKernel;

impl CpuKernel for GrayscaleKernel {
    type Properties = NoProperties;
    const NAME: &'static str = "grayscale";

    fn from_properties(_: &NoProperties) -> Self {
        GrayscaleKernel
    }

    #[inline]
    fn apply(&self, px: Bgra) -> Bgra {
        grayscale(px)
    }
}

/// Grayscale shader worker; no constants, no textures.
#[derive(Debug)]
pub struct GrayscaleShaderWorker {
    config: SharedConfig<NoProperties>,
    state: ShaderState,
}

impl GrayscaleShaderWorker {
    /// Creates a worker bound to `config`.
    pub fn new(config: SharedConfig<NoProperties>) -> Self {
        Self {
            config,
            state: ShaderState::default(),
        }
    }

    /// The owning node's configuration.
    pub fn configuration(&self) -> &SharedConfig<NoProperties> {
        &self.config
    }

    /// Rebinds the worker to another node.
    pub fn set_configuration(&mut self, config: SharedConfig<NoProperties>) {
        self.config = config;
    }
}

impl ShaderWorker for GrayscaleShaderWorker {
    fn shader(&self) -> &ShaderCode {
        &shaders::GRAYSCALE
    }

    fn initialize(&mut self, context: &mut dyn EffectContext, graph: &mut dyn TransformGraph) -> Result<()> {
        let input_count = self.input_count();
        self.state.initialize(&shaders::GRAYSCALE, input_count, context, graph)
    }

    fn prepare_for_render(&mut self, _change: ChangeType) -> Result<()> {
        self.state.ensure_usable()
    }

    fn is_initialized(&self) -> bool {
        self.state.is_initialized()
    }
}
