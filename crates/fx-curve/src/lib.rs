//! # fx-curve
//!
//! Tone curves and the split-tone lookup generator.
//!
//! - [`ToneCurve`] - sparse 0..255 curve with linear interpolation, `subtract` and `scale`
//! - [`canonical`] - the four hand-tuned split-tone response curves
//! - [`SplitToneGenerator`] - turns two hue/saturation pairs into a [`LookupTable`]
//! - [`apply_split_tone`] - CPU reference for how a lookup table is consumed
//!
//! # Usage
//!
//! ```rust
//! use fx_curve::{SplitToneGenerator, SplitToneParams};
//!
//! let params = SplitToneParams {
//!     highlights_hue: 30,
//!     highlights_saturation: 80,
//!     shadows_hue: 210,
//!     shadows_saturation: 40,
//! };
//! let table = SplitToneGenerator::new().generate_params(&params);
//! assert_eq!(table.entries().len(), 512);
//! ```
//!
//! # Table layout
//!
//! 512 packed `R<<16 | G<<8 | B` words: shadows at 0..256, highlights at
//! 256..512. Each channel is a signed delta biased by +128. Uploaded as a
//! 256x2 BGRA8888 texture, row 0 is the shadows band and row 1 the
//! highlights band.
//!
//! # Dependencies
//!
//! - `fx-core` - pixel math ([`fx_core::hue_to_rgb`], [`fx_core::Bgra`])
//! - [`serde`] - loading [`SplitToneParams`] from configuration
//! - [`tracing`] - generation events

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod canonical;
mod curve;
mod split_tone;

pub use curve::{ToneCurve, CURVE_LEN};
pub use split_tone::{
    apply_split_tone, generate, LookupTable, SplitToneGenerator, SplitToneParams, BAND_LEN,
    DELTA_BIAS, LOOKUP_LEN, MAX_SATURATION,
};
