//! Error types for effect nodes and workers.
//!
//! Every fallible call of the effects workspace reports one of the
//! [`Error`] variants below. Validation errors are raised by the call that
//! violates the contract and never leave partial state behind: a setter that
//! fails has not touched the property, a `process` that fails has not written
//! to the target buffer.
//!
//! A worker that cannot serve a backend is not an error. `create_worker`
//! returns `None` and the host moves on to the next backend.
//!
//! # Usage
//!
//! ```rust
//! use fx_core::{Error, Result};
//!
//! fn set_saturation(value: i32) -> Result<i32> {
//!     if !(0..=100).contains(&value) {
//!         return Err(Error::invalid_argument("saturation", format!("{value} not in [0, 100]")));
//!     }
//!     Ok(value)
//! }
//!
//! assert!(set_saturation(101).is_err());
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - For derive macro error implementation

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by effect nodes, workers and the host glue around them.
///
/// # Categories
///
/// - **Argument errors**: [`InvalidArgument`](Error::InvalidArgument),
///   [`InvalidRegion`](Error::InvalidRegion), [`BufferTooSmall`](Error::BufferTooSmall)
/// - **Graph errors**: [`NullSource`](Error::NullSource)
/// - **Worker state errors**: [`NotPrepared`](Error::NotPrepared),
///   [`WorkerUnusable`](Error::WorkerUnusable)
/// - **Host errors**: [`NativeBackendFailure`](Error::NativeBackendFailure),
///   [`BackendUnavailable`](Error::BackendUnavailable)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A value was rejected by validation.
    ///
    /// Covers out-of-range property values, unknown property names,
    /// property values of the wrong kind, source indices other than 0 and
    /// destination slices that are too short.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fx_core::Error;
    ///
    /// let err = Error::invalid_argument("sourceIndex", "only index 0 exists");
    /// assert!(err.to_string().contains("sourceIndex"));
    /// ```
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Name of the offending argument or property
        name: String,
        /// Why the value was rejected
        reason: String,
    },

    /// The effect has no upstream source.
    ///
    /// Cloning an effect, or rendering through it, requires a source.
    #[error("effect has no source")]
    NullSource,

    /// The host failed to create a GPU resource during `initialize`.
    ///
    /// Fatal for the worker: it is marked unusable and every later call
    /// that needs the GPU state fails with [`WorkerUnusable`](Error::WorkerUnusable).
    #[error("native backend failure while loading `{shader}`: {message}")]
    NativeBackendFailure {
        /// Shader or resource being created
        shader: String,
        /// Message reported by the host
        message: String,
    },

    /// `process` was called before `prepare`.
    #[error("worker used before prepare")]
    NotPrepared,

    /// The worker failed to initialize earlier and must not be reused.
    #[error("worker is unusable after a failed initialize")]
    WorkerUnusable,

    /// A host helper needed a worker the effect does not provide.
    ///
    /// Raised by in-process renderers only; `create_worker` itself returns
    /// `None`.
    #[error("effect `{effect}` has no {backend} worker")]
    BackendUnavailable {
        /// Effect type name
        effect: String,
        /// Requested backend
        backend: String,
    },

    /// A tiled region violates its invariants or reads past the source buffer.
    ///
    /// All values are in pixels.
    #[error(
        "invalid region (start {start}, pitch {pitch}, {width}x{height}) for source of {available} pixels"
    )]
    InvalidRegion {
        /// Start offset into the source buffer
        start: u32,
        /// Source row stride
        pitch: u32,
        /// Region width
        width: u32,
        /// Region height
        height: u32,
        /// Pixels available in the source buffer
        available: usize,
    },

    /// The target buffer cannot hold the processed region.
    #[error("buffer too small: need {required} pixels, have {available}")]
    BufferTooSmall {
        /// Pixels required
        required: usize,
        /// Pixels available
        available: usize,
    },
}

impl Error {
    /// Builds an [`Error::InvalidArgument`].
    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` for errors caused by the caller's input.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument { .. } | Self::InvalidRegion { .. } | Self::BufferTooSmall { .. }
        )
    }
}
