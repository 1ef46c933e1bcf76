//! # pixtools-ops
//!
//! Convolution and filtering on top of the `pixtools-core` data model.
//!
//! # Modules
//!
//! - [`kernel`] - fixed kernels, presets and spatially varying providers
//! - [`convolve`] - the convolution primitive and its [`EdgeMode`]s
//! - [`gaussian`] - normalized Gaussian kernel synthesis
//! - [`filter`] - per-channel filters: Gaussian blur, kernel filters, unsharp mask
//! - [`algebra`] - grayscale, black-and-white, proportion-map blending
//! - [`packed`] - operations on packed images (invert, grayscale, color keying)
//!
//! # Example
//!
//! ```rust
//! use pixtools_core::{ChannelPlanes, PackedImage};
//! use pixtools_ops::{filter, Kernel};
//!
//! let img = PackedImage::new(32, 32);
//! let planes = ChannelPlanes::from_packed(&img);
//!
//! let blurred = filter::gaussian_blur(&planes, 2, 1.2).unwrap();
//! let edges = filter::kernel_filter(&planes, &Kernel::edge_detect()).unwrap();
//! let out = blurred.to_packed();
//! assert_eq!(out.dimensions(), (32, 32));
//! # let _ = edges;
//! ```
//!
//! # Feature Flags
//!
//! - `parallel` (default) - convolve output rows on the rayon thread pool
//! - `serde` - Serialize/Deserialize for [`Kernel`] and [`EdgeMode`]

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod algebra;
pub mod convolve;
pub mod filter;
pub mod gaussian;
pub mod kernel;
pub mod packed;

pub use convolve::EdgeMode;
pub use error::{OpsError, OpsResult};
pub use kernel::{EdgeAwareGaussian, Kernel, KernelProvider, UniformKernel};
