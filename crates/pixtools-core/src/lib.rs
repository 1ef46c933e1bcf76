//! # pixtools-core
//!
//! Core data model for pixel-level image processing.
//!
//! An image has two representations:
//!
//! - [`PackedImage`] - one `u32` per pixel, four 8-bit channels
//!   (alpha, red, green, blue from most to least significant). Compact and
//!   display-ready; the only form that carries alpha.
//! - [`ChannelPlanes`] - one `f64` [`Grid`] per color channel. The
//!   precision-preserving working form that all filters operate on.
//!
//! Conversion is lossy but bounded: packed -> planes divides by 255,
//! planes -> packed clamps to `[0, 1]`, multiplies by 255 and rounds.
//!
//! ```rust
//! use pixtools_core::prelude::*;
//!
//! let img = PackedImage::filled(8, 8, Rgba::rgb(200, 100, 50).to_packed());
//! let mut planes = ChannelPlanes::from_packed(&img);
//! planes.times(0.5);
//! let darker = planes.to_packed();
//! assert_eq!(darker.rgba(3, 3), Rgba::rgb(100, 50, 25));
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//! pixtools-core (this crate)
//!    ^
//!    +-- pixtools-ops (convolution, filters, channel algebra)
//!    +-- pixtools-io  (codec boundary, PNG/JPEG files)
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` - Serialize/Deserialize for [`Grid`], [`Channel`], [`Rgba`]

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod channel;
pub mod error;
pub mod grid;
pub mod packed;
pub mod planes;

pub use channel::{
    BT601_LUMA_B, BT601_LUMA_G, BT601_LUMA_R, Channel, OPAQUE_WHITE, Rgba, channel_to_unit,
    channel_to_unit_f64, luma, luma_f32, unit_to_channel,
};
pub use error::{Error, Result};
pub use grid::Grid;
pub use packed::PackedImage;
pub use planes::{COLOR_CHANNELS, ChannelPlanes};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::channel::{Channel, Rgba};
    pub use crate::error::{Error, Result};
    pub use crate::grid::Grid;
    pub use crate::packed::PackedImage;
    pub use crate::planes::ChannelPlanes;
}
