//! Effect nodes and the workers that render them.
//!
//! An effect node holds validated, thread-safe configuration and one
//! upstream source. A host asks it for a worker for a render backend and
//! drives that worker: a CPU worker transforms rectangular tiles of packed
//! BGRA pixels, a shader worker describes shader code, constants and
//! textures for an external rasterizer.
//!
//! # Architecture
//!
//! ```text
//! Effect<K: EffectKind>  (EffectNode + ImageProvider)
//!     +-- SharedConfig<K::Properties>   (parking_lot mutex: properties + source)
//!     +-- create_worker(backend) -> Option<Worker>
//!             +-- Worker::Cpu(CpuTiledWorker<kernel>)   prepare / process
//!             +-- Worker::Shader(..ShaderWorker)        initialize / prepare_for_render
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use fx_core::{Bgra, TiledRegion};
//! use fx_effects::{ColorImageSource, EffectNode, GrayscaleEffect, RenderBackend, TiledWorker};
//!
//! let effect = GrayscaleEffect::new();
//! effect.set_source(Some(Arc::new(ColorImageSource::new(Bgra::opaque(255, 0, 0), 4, 4))));
//!
//! let mut worker = effect.create_worker(RenderBackend::Cpu).unwrap().into_cpu().unwrap();
//! worker.prepare(64, 64)?;
//! worker.source_pixels_mut().fill(Bgra::opaque(255, 0, 0));
//! worker.process(TiledRegion::full(4, 4))?;
//! assert_eq!(worker.target_pixels()[0], Bgra::gray(54));
//! # Ok::<(), fx_core::Error>(())
//! ```

pub mod backend;
pub mod effects;
pub mod host;
pub mod node;
pub mod shaders;
pub mod source;
pub mod worker;

pub use backend::{create_worker_preferred, describe_backends, RenderBackend, SupportedBackends};
pub use effects::{
    Effect, EffectKind, Grayscale, GrayscaleEffect, MagnifySmooth, MagnifySmoothEffect,
    MagnifySmoothProperties, NoProperties, Saturation, SaturationEffect, SaturationProperties,
    SplitTone, SplitToneEffect,
};
pub use host::{
    CpuRenderer, EffectContext, HostError, RecordingContext, RecordingGraph, TransformGraph,
    TransformNode,
};
pub use node::{
    EffectNode, EffectProperties, ImageProvider, LeafImage, PropertyValue, SharedConfig,
    SourceRef,
};
pub use shaders::{ShaderCode, ShaderId};
pub use source::{BitmapImageSource, ColorImageSource};
pub use worker::{
    BorderSampling, ChangeType, CpuKernel, CpuTiledWorker, Filter, ResourceTexture,
    ResourceTextureOptions, ShaderState, ShaderWorker, TiledWorker, Worker,
};

pub use fx_core::{Error, Result};
pub use fx_curve::SplitToneParams;
