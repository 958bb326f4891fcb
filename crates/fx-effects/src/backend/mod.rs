//! Render backends and backend selection.
//!
//! Every effect type declares a static set of backends it can produce a
//! worker for. A request for any other backend yields no worker, which is
//! not an error: the host simply tries the next backend.
//!
//! ```text
//! host preference [Gpu, Cpu]
//!     +-- node.create_worker(Gpu) -> None        (CPU-only effect)
//!     +-- node.create_worker(Cpu) -> Some(Worker::Cpu(..))
//! ```

mod detect;

pub use detect::{create_worker_preferred, describe_backends, BackendInfo};

use serde::{Deserialize, Serialize};

/// Execution strategy of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderBackend {
    /// Tiled scalar processing on the CPU.
    Cpu,
    /// Shader processing by an external GPU rasterizer.
    Gpu,
}

impl RenderBackend {
    /// Both backends, CPU first.
    pub const ALL: [RenderBackend; 2] = [RenderBackend::Cpu, RenderBackend::Gpu];

    /// Get human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Gpu => "gpu",
        }
    }
}

impl std::fmt::Display for RenderBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for RenderBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cpu" => Ok(Self::Cpu),
            "gpu" => Ok(Self::Gpu),
            other => Err(format!("unknown backend `{other}` (expected cpu or gpu)")),
        }
    }
}

/// Static capability set of an effect type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SupportedBackends {
    cpu: bool,
    gpu: bool,
}

impl SupportedBackends {
    /// CPU only.
    pub const CPU: Self = Self { cpu: true, gpu: false };
    /// GPU only.
    pub const GPU: Self = Self { cpu: false, gpu: true };
    /// Both CPU and GPU.
    pub const MIXED: Self = Self { cpu: true, gpu: true };

    /// Returns `true` if `backend` is in the set.
    pub const fn contains(&self, backend: RenderBackend) -> bool {
        match backend {
            RenderBackend::Cpu => self.cpu,
            RenderBackend::Gpu => self.gpu,
        }
    }

    /// Backends in the set, CPU first.
    pub fn iter(&self) -> impl Iterator<Item = RenderBackend> + '_ {
        RenderBackend::ALL.into_iter().filter(|b| self.contains(*b))
    }
}

impl std::fmt::Display for SupportedBackends {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.iter().map(|b| b.name()).collect();
        f.write_str(&names.join("+"))
    }
}
