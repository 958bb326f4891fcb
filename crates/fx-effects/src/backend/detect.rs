//! Backend discovery on an effect node and preference-ordered selection.

use tracing::{debug, trace};

use super::RenderBackend;
use crate::node::EffectNode;
use crate::worker::Worker;

/// Whether an effect node serves a backend.
#[derive(Debug, Clone)]
pub struct BackendInfo {
    /// Backend type.
    pub backend: RenderBackend,
    /// Whether the node can produce a worker for it.
    pub available: bool,
    /// Description.
    pub description: &'static str,
}

/// Lists both backends for `node`, CPU first.
pub fn detect_backends(node: &dyn EffectNode) -> Vec<BackendInfo> {
    let supported = node.supported_backends();
    RenderBackend::ALL
        .into_iter()
        .map(|backend| BackendInfo {
            backend,
            available: supported.contains(backend),
            description: match backend {
                RenderBackend::Cpu => "tiled scalar processing on packed BGRA buffers",
                RenderBackend::Gpu => "shader code, constants and textures for the host rasterizer",
            },
        })
        .collect()
}

/// Asks `node` for a worker for each backend in `preference` and returns
/// the first one produced.
pub fn create_worker_preferred(
    node: &dyn EffectNode,
    preference: &[RenderBackend],
) -> Option<Worker> {
    for &backend in preference {
        match node.create_worker(backend) {
            Some(worker) => {
                debug!(effect = node.kind(), %backend, "Selected backend");
                return Some(worker);
            }
            None => trace!(effect = node.kind(), %backend, "No worker, trying next backend"),
        }
    }
    None
}

/// Get description of the backends of `node`.
pub fn describe_backends(node: &dyn EffectNode) -> String {
    let mut desc = String::new();

    for info in detect_backends(node) {
        let status = if info.available { "+" } else { "-" };
        desc.push_str(&format!("[{}] {}: {}\n", status, info.backend, info.description));
    }

    desc
}
