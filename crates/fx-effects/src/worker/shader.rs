//! GPU shader worker protocol.
//!
//! A shader worker does not render. It hands the host a shader, an
//! optional constant buffer and optional resource textures, and the host
//! rasterizer does the drawing.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use fx_core::{ColorMode, Error, Result};

use crate::host::{EffectContext, TransformGraph, TransformNode};
use crate::shaders::ShaderCode;

/// What changed since the last render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeType {
    /// Nothing changed.
    None,
    /// Effect properties changed.
    Properties,
    /// The host context changed.
    Context,
    /// The transform graph changed.
    Graph,
}

/// Texture sampling filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Nearest texel.
    #[default]
    Point,
    /// Bilinear.
    Linear,
}

/// Addressing outside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderSampling {
    /// Clamp to the edge texel.
    #[default]
    Clamp,
    /// Repeat.
    Wrap,
    /// Repeat mirrored.
    Mirror,
}

/// Sampling options for one resource texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceTextureOptions {
    /// Filter.
    pub filter: Filter,
    /// Horizontal addressing.
    pub border_x: BorderSampling,
    /// Vertical addressing.
    pub border_y: BorderSampling,
}

/// Texel data handed to the host.
#[derive(Clone, PartialEq, Eq)]
pub struct ResourceTexture {
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// Texel layout.
    pub color_mode: ColorMode,
    /// Bytes per row.
    pub pitch: u32,
    /// Texel bytes, `pitch * height` long.
    pub data: Arc<[u8]>,
}

impl fmt::Debug for ResourceTexture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceTexture")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("color_mode", &self.color_mode)
            .field("pitch", &self.pitch)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Host-facing GPU worker protocol.
pub trait ShaderWorker: Send {
    /// Number of shader inputs.
    fn input_count(&self) -> u32 {
        1
    }

    /// The shader this worker draws with.
    fn shader(&self) -> &ShaderCode;

    /// Constant buffer bytes, if the shader takes constants.
    fn constant_buffer(&self) -> Option<&[u8]> {
        None
    }

    /// Number of resource textures.
    fn resource_texture_count(&self) -> u32 {
        0
    }

    /// Resource textures, one per slot.
    fn resource_textures(&mut self) -> Result<Vec<ResourceTexture>> {
        Ok(Vec::new())
    }

    /// Sampling options, one per resource texture.
    fn resource_texture_options(&self) -> Vec<ResourceTextureOptions> {
        Vec::new()
    }

    /// Loads the shader into the host context and installs the draw node.
    ///
    /// A load failure marks the worker unusable; every later call to
    /// `initialize` fails with [`Error::WorkerUnusable`].
    fn initialize(
        &mut self,
        context: &mut dyn EffectContext,
        graph: &mut dyn TransformGraph,
    ) -> Result<()>;

    /// Refreshes derived state before a draw.
    ///
    /// Does nothing for [`ChangeType::None`]. Fails with
    /// [`Error::WorkerUnusable`] after a failed `initialize`.
    fn prepare_for_render(&mut self, change: ChangeType) -> Result<()>;

    /// Notified when the host rebuilds the graph.
    fn set_graph(&mut self, graph: &mut dyn TransformGraph) -> Result<()> {
        let _ = graph;
        Ok(())
    }

    /// Returns `true` after a successful `initialize`.
    fn is_initialized(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Status {
    #[default]
    Created,
    Initialized,
    Unusable,
}

/// Initialization bookkeeping shared by the shader workers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShaderState {
    status: Status,
}

impl ShaderState {
    /// Loads `shader` and installs a single draw node with `input_count`
    /// inputs.
    pub fn initialize(
        &mut self,
        shader: &ShaderCode,
        input_count: u32,
        context: &mut dyn EffectContext,
        graph: &mut dyn TransformGraph,
    ) -> Result<()> {
        self.ensure_usable()?;

        if let Err(e) = context.load_shader(shader) {
            warn!(shader = shader.name, error = %e, "Shader load failed");
            self.status = Status::Unusable;
            return Err(Error::NativeBackendFailure {
                shader: shader.name.to_string(),
                message: e.to_string(),
            });
        }

        let node = TransformNode::ShaderDraw {
            shader: shader.id,
            input_count,
        };
        graph
            .set_single_transform_node(node)
            .map_err(|e| Error::NativeBackendFailure {
                shader: shader.name.to_string(),
                message: e.to_string(),
            })?;

        debug!(shader = shader.name, id = %shader.id, input_count, "Shader worker initialized");
        self.status = Status::Initialized;
        Ok(())
    }

    /// Fails with [`Error::WorkerUnusable`] after a failed shader load.
    pub fn ensure_usable(&self) -> Result<()> {
        if self.is_unusable() {
            Err(Error::WorkerUnusable)
        } else {
            Ok(())
        }
    }

    /// Returns `true` after a successful `initialize`.
    pub fn is_initialized(&self) -> bool {
        self.status == Status::Initialized
    }

    /// Returns `true` after a failed shader load.
    pub fn is_unusable(&self) -> bool {
        self.status == Status::Unusable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{RecordingContext, RecordingGraph};
    use crate::shaders;

    #[test]
    fn test_initialize_records_draw_node() {
        let mut state = ShaderState::default();
        let mut ctx = RecordingContext::new();
        let mut graph = RecordingGraph::new();
        state
            .initialize(&shaders::GRAYSCALE, 1, &mut ctx, &mut graph)
            .unwrap();

        assert!(state.is_initialized());
        assert_eq!(ctx.loaded(), &[shaders::GRAYSCALE.id]);
        assert_eq!(
            graph.nodes(),
            &[TransformNode::ShaderDraw {
                shader: shaders::GRAYSCALE.id,
                input_count: 1
            }]
        );
    }

    #[test]
    fn test_load_failure_is_sticky() {
        let mut state = ShaderState::default();
        let mut ctx = RecordingContext::failing("device lost");
        let mut graph = RecordingGraph::new();

        let err = state
            .initialize(&shaders::SATURATION, 1, &mut ctx, &mut graph)
            .unwrap_err();
        assert!(matches!(err, Error::NativeBackendFailure { ref message, .. } if message == "device lost"));
        assert!(state.is_unusable());
        assert!(graph.nodes().is_empty());

        let mut ok = RecordingContext::new();
        let err = state
            .initialize(&shaders::SATURATION, 1, &mut ok, &mut graph)
            .unwrap_err();
        assert_eq!(err, Error::WorkerUnusable);
        assert!(ok.loaded().is_empty());
    }

    #[test]
    fn test_graph_failure_keeps_worker_usable() {
        let mut state = ShaderState::default();
        let mut ctx = RecordingContext::new();
        let mut graph = RecordingGraph::failing("no graph");
        assert!(state
            .initialize(&shaders::GRAYSCALE, 1, &mut ctx, &mut graph)
            .is_err());
        assert!(!state.is_initialized());
        assert!(!state.is_unusable());
    }
}
