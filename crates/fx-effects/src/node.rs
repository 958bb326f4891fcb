//! Effect node protocol.
//!
//! Anything an effect can read from is an [`ImageProvider`]: a leaf source
//! or another effect. Effects additionally implement [`EffectNode`], which
//! adds properties, the source slot and worker creation.
//!
//! Node state lives in a [`SharedConfig`]: the property set and the source
//! behind one `parking_lot` mutex. Every accessor takes the lock for
//! exactly its own duration; workers hold another handle to the same
//! configuration and take a snapshot when they need it, so the lock is
//! never held across a render call.

use std::fmt;
use std::sync::Arc;

use fx_core::{Bgra, Error, Result};
use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};

use crate::backend::{RenderBackend, SupportedBackends};
use crate::worker::Worker;

/// Shared reference to an upstream provider.
pub type SourceRef = Arc<dyn ImageProvider>;

/// Pixels of a leaf source.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafImage {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Tightly packed rows
    pub pixels: Arc<[Bgra]>,
}

/// Something an effect can take as its source.
pub trait ImageProvider: Send + Sync + fmt::Debug {
    /// Short type name used in logs.
    fn kind(&self) -> &'static str;

    /// Deep clone.
    ///
    /// Effects clone their whole source chain and fail with
    /// [`Error::NullSource`] when they have no source.
    fn clone_provider(&self) -> Result<SourceRef>;

    /// This provider as an effect node, if it is one.
    fn as_effect(&self) -> Option<&dyn EffectNode> {
        None
    }

    /// Pixels of a leaf source. `None` for effects.
    fn leaf_image(&self) -> Option<LeafImage> {
        None
    }
}

/// An effect: properties, one source slot and worker creation.
pub trait EffectNode: ImageProvider {
    /// Names accepted by [`property`](EffectNode::property).
    fn property_names(&self) -> &'static [&'static str];

    /// Reads a property by name.
    fn property(&self, name: &str) -> Result<PropertyValue>;

    /// Validates and sets a property by name.
    ///
    /// Fails with [`Error::InvalidArgument`] for unknown names, values of
    /// the wrong kind and out-of-range values, leaving the property untouched.
    fn set_property(&self, name: &str, value: PropertyValue) -> Result<()>;

    /// The upstream source.
    fn source(&self) -> Option<SourceRef>;

    /// Replaces the upstream source.
    fn set_source(&self, source: Option<SourceRef>);

    /// Number of source slots.
    fn source_count(&self) -> u32 {
        1
    }

    /// Copies the sources into `sources`.
    ///
    /// Fails with [`Error::InvalidArgument`] if `sources` is shorter than
    /// [`source_count`](EffectNode::source_count).
    fn get_sources(&self, sources: &mut [Option<SourceRef>]) -> Result<()> {
        let count = self.source_count() as usize;
        if sources.len() < count {
            return Err(Error::invalid_argument(
                "sources",
                format!("slice holds {} entries, need {count}", sources.len()),
            ));
        }
        sources[0] = self.source();
        Ok(())
    }

    /// Sets the source at `index`; only index 0 exists.
    fn set_source_at(&self, index: u32, source: Option<SourceRef>) -> Result<()> {
        if index >= self.source_count() {
            return Err(Error::invalid_argument(
                "sourceIndex",
                format!("{index} out of range, effect has {} source", self.source_count()),
            ));
        }
        self.set_source(source);
        Ok(())
    }

    /// Backends this effect type can produce workers for.
    fn supported_backends(&self) -> SupportedBackends;

    /// Creates a worker bound to this node's configuration.
    ///
    /// Returns `None` if `backend` is not supported.
    fn create_worker(&self, backend: RenderBackend) -> Option<Worker>;
}

/// A property value.
///
/// Deserializes from a plain YAML/JSON number: integers become `Int`,
/// anything with a fraction `Float`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Integer property, e.g. a hue in degrees.
    Int(i32),
    /// Floating-point property, e.g. a radius.
    Float(f64),
}

impl PropertyValue {
    /// The value as an integer; floats are rejected.
    pub fn as_int(self, name: &str) -> Result<i32> {
        match self {
            Self::Int(v) => Ok(v),
            Self::Float(v) => Err(Error::invalid_argument(name, format!("expected an integer, got {v}"))),
        }
    }

    /// The value as a float; integers convert.
    pub fn as_float(self, _name: &str) -> Result<f64> {
        match self {
            Self::Int(v) => Ok(v as f64),
            Self::Float(v) => Ok(v),
        }
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

/// A typed property set.
///
/// `set` and `validate` never leave a half-applied value behind: callers
/// apply them to a copy and commit on success.
pub trait EffectProperties: Copy + Default + fmt::Debug + Send + 'static {
    /// Property names, in declaration order.
    const NAMES: &'static [&'static str];

    /// Reads a property by name.
    fn get(&self, name: &str) -> Result<PropertyValue>;

    /// Validates `value` and writes it.
    fn set(&mut self, name: &str, value: PropertyValue) -> Result<()>;

    /// Validates every field.
    fn validate(&self) -> Result<()>;
}

/// Builds the error for a name not in [`EffectProperties::NAMES`].
pub(crate) fn unknown_property(name: &str, names: &[&str]) -> Error {
    Error::invalid_argument(name, format!("unknown property, expected one of {names:?}"))
}

struct EffectState<P> {
    properties: P,
    source: Option<SourceRef>,
}

/// Shared, lock-guarded configuration of an effect node.
///
/// Cloning a `SharedConfig` gives another handle to the same state; it is
/// how workers see their node. Use [`EffectNode`]'s deep clone for an
/// independent copy.
pub struct SharedConfig<P> {
    inner: Arc<Mutex<EffectState<P>>>,
}

impl<P> Clone for SharedConfig<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: EffectProperties> SharedConfig<P> {
    /// Creates a configuration with no source.
    pub fn new(properties: P) -> Self {
        Self::with_source(properties, None)
    }

    pub(crate) fn with_source(properties: P, source: Option<SourceRef>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(EffectState { properties, source })),
        }
    }

    /// Snapshot of the properties.
    pub fn properties(&self) -> P {
        self.inner.lock().properties
    }

    /// Runs `f` on a copy of the properties and commits the copy if `f`
    /// succeeds.
    pub fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut P) -> Result<()>,
    {
        let mut state = self.inner.lock();
        let mut next = state.properties;
        f(&mut next)?;
        state.properties = next;
        Ok(())
    }

    /// Validates and replaces the whole property set.
    pub fn replace(&self, properties: P) -> Result<()> {
        properties.validate()?;
        self.inner.lock().properties = properties;
        Ok(())
    }

    /// The upstream source.
    pub fn source(&self) -> Option<SourceRef> {
        self.inner.lock().source.clone()
    }

    /// Replaces the upstream source.
    pub fn set_source(&self, source: Option<SourceRef>) {
        self.inner.lock().source = source;
    }

    /// Returns `true` if both handles share one state.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Deep copy taken under the lock: properties by value, source cloned
    /// recursively.
    pub(crate) fn deep_clone(&self) -> Result<Self> {
        let state: MutexGuard<'_, EffectState<P>> = self.inner.lock();
        let source = state.source.as_ref().ok_or(Error::NullSource)?.clone_provider()?;
        Ok(Self::with_source(state.properties, Some(source)))
    }
}

impl<P: EffectProperties> fmt::Debug for SharedConfig<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("SharedConfig")
            .field("properties", &state.properties)
            .field("source", &state.source.as_ref().map(|s| s.kind()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, Default, PartialEq)]
    struct Level {
        level: i32,
    }

    impl EffectProperties for Level {
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
                    let v = value.as_int(name)?;
                    if !(0..=10).contains(&v) {
                        return Err(Error::invalid_argument(name, "out of range"));
                    }
                    self.level = v;
                    Ok(())
                }
                _ => Err(unknown_property(name, Self::NAMES)),
            }
        }

        fn validate(&self) -> Result<()> {
            let mut copy = *self;
            copy.set("level", self.level.into())
        }
    }

    #[test]
    fn test_update_commits_on_success() {
        let config = SharedConfig::new(Level::default());
        config.update(|p| p.set("level", 5.into())).unwrap();
        assert_eq!(config.properties().level, 5);
    }

    #[test]
    fn test_update_rolls_back_on_error() {
        let config = SharedConfig::new(Level { level: 3 });
        let err = config
            .update(|p| {
                p.level = 9;
                Err(Error::invalid_argument("level", "rejected"))
            })
            .unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(config.properties().level, 3);
    }

    #[test]
    fn test_replace_validates() {
        let config = SharedConfig::new(Level::default());
        assert!(config.replace(Level { level: 11 }).is_err());
        assert_eq!(config.properties().level, 0);
        config.replace(Level { level: 10 }).unwrap();
        assert_eq!(config.properties().level, 10);
    }

    #[test]
    fn test_handles_share_state() {
        let a = SharedConfig::new(Level::default());
        let b = a.clone();
        b.update(|p| p.set("level", 7.into())).unwrap();
        assert_eq!(a.properties().level, 7);
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn test_deep_clone_requires_source() {
        let config = SharedConfig::new(Level::default());
        assert_eq!(config.deep_clone().unwrap_err(), Error::NullSource);
    }

    #[test]
    fn test_property_value_kinds() {
        assert_eq!(PropertyValue::Int(3).as_float("x").unwrap(), 3.0);
        assert!(PropertyValue::Float(0.5).as_int("x").is_err());
        let v: PropertyValue = serde_yaml::from_str("0.25").unwrap();
        assert_eq!(v, PropertyValue::Float(0.25));
        let v: PropertyValue = serde_yaml::from_str("42").unwrap();
        assert_eq!(v, PropertyValue::Int(42));
    }
}
