//! Workers produced by effect nodes.
//!
//! A worker is owned by the render request that created it. The CPU and
//! GPU flavours are two implementations of the same role, so a request gets
//! back one closed [`Worker`] value and matches on it.

mod cpu;
mod shader;

pub use cpu::{CpuKernel, CpuTiledWorker, TiledWorker};
pub use shader::{
    BorderSampling, ChangeType, Filter, ResourceTexture, ResourceTextureOptions, ShaderState,
    ShaderWorker,
};

use crate::backend::RenderBackend;

/// A worker for one backend.
pub enum Worker {
    /// Tiled CPU worker.
    Cpu(Box<dyn TiledWorker>),
    /// Shader description for the host rasterizer.
    Shader(Box<dyn ShaderWorker>),
}

impl Worker {
    /// Backend this worker renders with.
    pub fn backend(&self) -> RenderBackend {
        match self {
            Self::Cpu(_) => RenderBackend::Cpu,
            Self::Shader(_) => RenderBackend::Gpu,
        }
    }

    /// The CPU worker, if this is one.
    pub fn into_cpu(self) -> Option<Box<dyn TiledWorker>> {
        match self {
            Self::Cpu(w) => Some(w),
            Self::Shader(_) => None,
        }
    }

    /// The shader worker, if this is one.
    pub fn into_shader(self) -> Option<Box<dyn ShaderWorker>> {
        match self {
            Self::Shader(w) => Some(w),
            Self::Cpu(_) => None,
        }
    }
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cpu(w) => f.debug_tuple("Cpu").field(&w.color_mode()).finish(),
            Self::Shader(w) => f.debug_tuple("Shader").field(&w.shader().name).finish(),
        }
    }
}
