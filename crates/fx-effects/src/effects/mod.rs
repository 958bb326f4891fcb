//! Effect node types.
//!
//! [`Effect<K>`] carries everything the node protocol needs: the shared
//! configuration, source handling, deep clone and backend gating. An effect
//! type is a marker implementing [`EffectKind`], which names its property
//! set and backends and builds its workers.
//!
//! | Effect | Backends | Properties |
//! |---|---|---|
//! | [`GrayscaleEffect`] | cpu+gpu | none |
//! | [`SplitToneEffect`] | gpu | hue/saturation pairs |
//! | [`MagnifySmoothEffect`] | gpu | radii, amount, position, aspect |
//! | [`SaturationEffect`] | gpu | level |

mod grayscale;
mod magnify_smooth;
mod saturation;
mod split_tone;

pub use grayscale::{Grayscale, GrayscaleEffect, GrayscaleKernel, GrayscaleShaderWorker};
pub use magnify_smooth::{
    MagnifySmooth, MagnifySmoothConstants, MagnifySmoothEffect, MagnifySmoothProperties,
    MagnifySmoothShaderWorker,
};
pub use saturation::{
    Saturation, SaturationConstants, SaturationEffect, SaturationProperties, SaturationShaderWorker,
};
pub use split_tone::{SplitTone, SplitToneEffect, SplitToneShaderWorker};

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use fx_core::Result;

use crate::backend::{RenderBackend, SupportedBackends};
use crate::node::{
    unknown_property, EffectNode, EffectProperties, ImageProvider, PropertyValue, SharedConfig,
    SourceRef,
};
use crate::worker::Worker;

/// Static description of an effect type.
pub trait EffectKind: Send + Sync + 'static {
    /// Property set.
    type Properties: EffectProperties;

    /// Type name used in logs and errors.
    const NAME: &'static str;

    /// Backends this effect can produce workers for.
    const BACKENDS: SupportedBackends;

    /// Builds a worker for `backend`, which is always in [`BACKENDS`](EffectKind::BACKENDS).
    fn worker(config: &SharedConfig<Self::Properties>, backend: RenderBackend) -> Option<Worker>;
}

/// An effect node of kind `K`.
pub struct Effect<K: EffectKind> {
    config: SharedConfig<K::Properties>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: EffectKind> Effect<K> {
    /// Creates a node with default properties and no source.
    pub fn new() -> Self {
        Self::from_config(SharedConfig::new(K::Properties::default()))
    }

    /// Creates a node with validated `properties` and no source.
    pub fn with_properties(properties: K::Properties) -> Result<Self> {
        properties.validate()?;
        Ok(Self::from_config(SharedConfig::new(properties)))
    }

    fn from_config(config: SharedConfig<K::Properties>) -> Self {
        Self {
            config,
            _kind: PhantomData,
        }
    }

    /// Shared configuration handle, as seen by this node's workers.
    pub fn config(&self) -> &SharedConfig<K::Properties> {
        &self.config
    }

    /// Snapshot of all properties.
    pub fn properties(&self) -> K::Properties {
        self.config.properties()
    }

    /// Validates every field of `properties`, then applies them together.
    pub fn set_properties(&self, properties: K::Properties) -> Result<()> {
        self.config.replace(properties)
    }

    /// Deep clone: copied properties and an independently cloned source
    /// chain, taken under this node's lock.
    ///
    /// Fails with [`Error::NullSource`](fx_core::Error::NullSource) when no
    /// source is set.
    pub fn clone_node(&self) -> Result<Self> {
        let config = self.config.deep_clone()?;
        trace!(effect = K::NAME, "Cloned node");
        Ok(Self::from_config(config))
    }
}

impl<K: EffectKind> Default for Effect<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: EffectKind> fmt::Debug for Effect<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("kind", &K::NAME)
            .field("config", &self.config)
            .finish()
    }
}

impl<K: EffectKind> ImageProvider for Effect<K> {
    fn kind(&self) -> &'static str {
        K::NAME
    }

    fn clone_provider(&self) -> Result<SourceRef> {
        Ok(Arc::new(self.clone_node()?))
    }

    fn as_effect(&self) -> Option<&dyn EffectNode> {
        Some(self)
    }
}

impl<K: EffectKind> EffectNode for Effect<K> {
    fn property_names(&self) -> &'static [&'static str] {
        K::Properties::NAMES
    }

    fn property(&self, name: &str) -> Result<PropertyValue> {
        self.config.properties().get(name)
    }

    fn set_property(&self, name: &str, value: PropertyValue) -> Result<()> {
        self.config.update(|p| p.set(name, value))?;
        trace!(effect = K::NAME, name, %value, "Property set");
        Ok(())
    }

    fn source(&self) -> Option<SourceRef> {
        self.config.source()
    }

    fn set_source(&self, source: Option<SourceRef>) {
        self.config.set_source(source);
    }

    fn supported_backends(&self) -> SupportedBackends {
        K::BACKENDS
    }

    fn create_worker(&self, backend: RenderBackend) -> Option<Worker> {
        if !K::BACKENDS.contains(backend) {
            trace!(effect = K::NAME, %backend, "Backend not supported");
            return None;
        }
        let worker = K::worker(&self.config, backend);
        debug!(effect = K::NAME, %backend, created = worker.is_some(), "create_worker");
        worker
    }
}

/// Property set of an effect without properties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoProperties;

impl EffectProperties for NoProperties {
    const NAMES: &'static [&'static str] = &[];

    fn get(&self, name: &str) -> Result<PropertyValue> {
        Err(unknown_property(name, Self::NAMES))
    }

    fn set(&mut self, name: &str, _value: PropertyValue) -> Result<()> {
        Err(unknown_property(name, Self::NAMES))
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Checks that `value` is finite and satisfies `ok`.
pub(crate) fn check_float(name: &str, value: f64, ok: impl Fn(f64) -> bool, expected: &str) -> Result<f64> {
    if value.is_finite() && ok(value) {
        Ok(value)
    } else {
        Err(fx_core::Error::invalid_argument(name, format!("{value} is not {expected}")))
    }
}
