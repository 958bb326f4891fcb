//! # fx-core
//!
//! Core types shared by every crate of the effects workspace.
//!
//! - [`Error`] / [`Result`] - the error taxonomy of effect nodes and workers
//! - [`Bgra`] and the [`pixel`] helpers - packed 8-bit pixel arithmetic
//! - [`ColorMode`] - pixel layout a worker declares for its buffers
//! - [`TiledRegion`] - one rectangle of CPU work
//! - [`PixelBuffer`] - growable, `u32`-aligned byte buffer owned by a worker
//!
//! ## Crate Structure
//!
//! ```text
//! fx-core (this crate)
//!    ^
//!    |
//!    +-- fx-curve (tone curves, split-tone lookups)
//!    +-- fx-effects (effect nodes, CPU and shader workers)
//!    +-- fx-cli
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` - Serialize/Deserialize for [`ColorMode`] and [`TiledRegion`]

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod error;
pub mod format;
pub mod pixel;
pub mod region;

pub use buffer::PixelBuffer;
pub use error::{Error, Result};
pub use format::ColorMode;
pub use pixel::{hue_to_rgb, is_pure_color, Bgra};
pub use region::TiledRegion;

/// Prelude module for convenient imports.
///
/// ```
/// use fx_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::buffer::PixelBuffer;
    pub use crate::error::{Error, Result};
    pub use crate::format::ColorMode;
    pub use crate::pixel::{grayscale, hue_to_rgb, is_pure_color, Bgra};
    pub use crate::region::TiledRegion;
}
