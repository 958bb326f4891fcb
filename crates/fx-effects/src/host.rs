//! Host-side seams.
//!
//! A GPU host implements [`EffectContext`] and [`TransformGraph`] over its
//! own device. [`RecordingContext`] and [`RecordingGraph`] implement them
//! in memory for tests and tooling. [`CpuRenderer`] drives CPU workers
//! through a whole effect chain in-process.

use thiserror::Error;
use tracing::{debug, trace};

use fx_core::{Bgra, Error, Result, TiledRegion};

use crate::backend::RenderBackend;
use crate::node::{EffectNode, ImageProvider, LeafImage};
use crate::shaders::{ShaderCode, ShaderId};
use crate::worker::Worker;

/// Failure reported by a host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HostError(pub String);

/// A node in the host's transform graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformNode {
    /// Draws with a loaded shader.
    ShaderDraw {
        /// Shader to draw with
        shader: ShaderId,
        /// Number of inputs
        input_count: u32,
    },
}

/// Device-side context of a GPU host.
pub trait EffectContext {
    /// Compiles and registers `shader`.
    fn load_shader(&mut self, shader: &ShaderCode) -> std::result::Result<(), HostError>;
}

/// Transform graph of a GPU host.
pub trait TransformGraph {
    /// Replaces the graph with the single node `node`.
    fn set_single_transform_node(&mut self, node: TransformNode) -> std::result::Result<(), HostError>;
}

/// In-memory [`EffectContext`] that records loaded shaders.
#[derive(Debug, Default)]
pub struct RecordingContext {
    loaded: Vec<ShaderId>,
    fail_with: Option<String>,
}

impl RecordingContext {
    /// A context that accepts every shader.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context whose every `load_shader` fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            loaded: Vec::new(),
            fail_with: Some(message.into()),
        }
    }

    /// Shaders loaded so far, in order.
    pub fn loaded(&self) -> &[ShaderId] {
        &self.loaded
    }
}

impl EffectContext for RecordingContext {
    fn load_shader(&mut self, shader: &ShaderCode) -> std::result::Result<(), HostError> {
        if let Some(msg) = &self.fail_with {
            return Err(HostError(msg.clone()));
        }
        trace!(shader = shader.name, bytes = shader.bytes().len(), "load_shader");
        self.loaded.push(shader.id);
        Ok(())
    }
}

/// In-memory [`TransformGraph`] that records every installed node.
#[derive(Debug, Default)]
pub struct RecordingGraph {
    nodes: Vec<TransformNode>,
    fail_with: Option<String>,
}

impl RecordingGraph {
    /// A graph that accepts every node.
    pub fn new() -> Self {
        Self::default()
    }

    /// A graph whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            nodes: Vec::new(),
            fail_with: Some(message.into()),
        }
    }

    /// Nodes installed so far, in order.
    pub fn nodes(&self) -> &[TransformNode] {
        &self.nodes
    }

    /// The node currently installed.
    pub fn current(&self) -> Option<&TransformNode> {
        self.nodes.last()
    }
}

impl TransformGraph for RecordingGraph {
    fn set_single_transform_node(&mut self, node: TransformNode) -> std::result::Result<(), HostError> {
        if let Some(msg) = &self.fail_with {
            return Err(HostError(msg.clone()));
        }
        self.nodes.push(node);
        Ok(())
    }
}

/// Renders an effect chain on the CPU.
///
/// Each effect's source is rendered first, then fed through the effect's
/// CPU worker. Chains must be acyclic.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuRenderer {
    band_rows: Option<u32>,
    parallel: bool,
}

/// Rows per band when processing in parallel without an explicit band size.
const DEFAULT_BAND_ROWS: u32 = 64;

impl CpuRenderer {
    /// Whole-image, single-threaded renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes the image as horizontal tiles of `rows` rows.
    pub fn with_band_rows(mut self, rows: u32) -> Self {
        self.band_rows = Some(rows.max(1));
        self
    }

    /// Processes bands on the rayon pool.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Renders `node` and everything upstream of it.
    pub fn render(&self, node: &dyn EffectNode) -> Result<LeafImage> {
        let source = node.source().ok_or(Error::NullSource)?;
        let input = self.render_provider(source.as_ref())?;
        self.apply(node, &input)
    }

    /// Renders any provider: leaves yield their pixels.
    pub fn render_provider(&self, provider: &dyn ImageProvider) -> Result<LeafImage> {
        match provider.as_effect() {
            Some(effect) => self.render(effect),
            None => provider.leaf_image().ok_or_else(|| {
                Error::invalid_argument("source", format!("`{}` provides no pixels", provider.kind()))
            }),
        }
    }

    /// Runs `node`'s CPU worker over `input`.
    pub fn apply(&self, node: &dyn EffectNode, input: &LeafImage) -> Result<LeafImage> {
        let mut worker = node
            .create_worker(RenderBackend::Cpu)
            .and_then(Worker::into_cpu)
            .ok_or_else(|| Error::BackendUnavailable {
                effect: node.kind().to_string(),
                backend: RenderBackend::Cpu.to_string(),
            })?;

        let (width, height) = (input.width, input.height);
        let len = input.pixels.len();
        if len == 0 {
            return Ok(input.clone());
        }
        let bytes = len
            .checked_mul(4)
            .and_then(|b| u32::try_from(b).ok())
            .ok_or_else(|| Error::invalid_argument("source", format!("{width}x{height} image too large")))?;

        worker.prepare(bytes, bytes)?;
        worker.source_pixels_mut()[..len].copy_from_slice(&input.pixels);

        let full = TiledRegion::full(width, height);
        let mut out: Vec<Bgra> = Vec::with_capacity(len);
        match (self.band_rows, self.parallel) {
            (rows, true) => {
                worker.process_parallel(full, rows.unwrap_or(DEFAULT_BAND_ROWS))?;
                out.extend_from_slice(&worker.target_pixels()[..len]);
            }
            (Some(rows), false) => {
                for band in full.bands(rows) {
                    worker.process(band)?;
                    out.extend_from_slice(&worker.target_pixels()[..band.target_len()]);
                }
            }
            (None, false) => {
                worker.process(full)?;
                out.extend_from_slice(&worker.target_pixels()[..len]);
            }
        }

        debug!(effect = node.kind(), width, height, "Rendered on CPU");
        Ok(LeafImage {
            width,
            height,
            pixels: out.into(),
        })
    }
}
