//! 2D convolution of a single `f64` plane.
//!
//! For every output pixel `(x, y)` the engine sums `kernel(kx, ky) *
//! plane(x + kx - rx, y + ky - ry)` over the kernel footprint, where
//! `(rx, ry)` is the kernel center. The kernel is applied as stored (no
//! flip). Output always has the input's dimensions.
//!
//! Samples that fall outside the plane are resolved by an [`EdgeMode`].
//! The cost is `O(H * W * K^2)`; there is no separable fast path.
//!
//! With the `parallel` feature, output rows are computed on the rayon
//! pool. Each output pixel reads only the input footprint, so results are
//! identical to the sequential path.
//!
//! # Example
//!
//! ```rust
//! use pixtools_core::Grid;
//! use pixtools_ops::convolve::{convolve, EdgeMode};
//! use pixtools_ops::Kernel;
//!
//! let plane = Grid::from_rows(&[[0.0, 0.0, 0.0], [0.0, 9.0, 0.0], [0.0, 0.0, 0.0]]).unwrap();
//! let out = convolve(&plane, &Kernel::box_blur(1), EdgeMode::Zero);
//! assert!(out.iter().all(|&v| (v - 1.0).abs() < 1e-12));
//! ```

use crate::kernel::{Kernel, KernelProvider};
use crate::OpsResult;
use pixtools_core::{Error, Grid};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::trace;

/// How samples outside the plane are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgeMode {
    /// Extend the nearest edge pixel.
    #[default]
    Clamp,
    /// Outside samples contribute nothing; weights are not renormalized.
    Zero,
    /// Reflect at the border, repeating the edge pixel (`..., 1, 0 | 0, 1, ...`).
    Mirror,
    /// Tile the plane periodically.
    Wrap,
}

impl EdgeMode {
    /// Maps a possibly out-of-range coordinate onto `0..len`.
    ///
    /// Returns `None` when the sample should be skipped ([`EdgeMode::Zero`]
    /// outside the plane, or an empty axis).
    #[inline]
    pub fn resolve(self, i: isize, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let n = len as isize;
        if (0..n).contains(&i) {
            return Some(i as usize);
        }
        match self {
            EdgeMode::Clamp => Some(i.clamp(0, n - 1) as usize),
            EdgeMode::Zero => None,
            EdgeMode::Wrap => Some(i.rem_euclid(n) as usize),
            EdgeMode::Mirror => {
                let m = i.rem_euclid(2 * n);
                Some(if m >= n { 2 * n - 1 - m } else { m } as usize)
            }
        }
    }
}

/// Convolves `plane` with a fixed kernel.
pub fn convolve(plane: &Grid<f64>, kernel: &Kernel, edge: EdgeMode) -> Grid<f64> {
    trace!(
        width = plane.width(),
        height = plane.height(),
        kernel_w = kernel.width(),
        kernel_h = kernel.height(),
        ?edge,
        "convolve"
    );
    fill_rows(plane, |x, y| weighted_sum(plane, kernel, edge, x, y))
}

/// Convolves `plane` with a kernel chosen per output pixel.
///
/// The provider is queried once for every `(x, y)` of the output.
///
/// # Errors
///
/// [`Error::DimensionMismatch`] if the provider is bound to an extent other
/// than the plane's dimensions.
pub fn convolve_varying<P>(plane: &Grid<f64>, provider: &P, edge: EdgeMode) -> OpsResult<Grid<f64>>
where
    P: KernelProvider + ?Sized,
{
    trace!(width = plane.width(), height = plane.height(), ?edge, "convolve_varying");
    if let Some(extent) = provider.extent() {
        if extent != plane.dimensions() {
            return Err(Error::dimension_mismatch(plane.dimensions(), extent).into());
        }
    }
    Ok(fill_rows(plane, |x, y| {
        let kernel = provider.kernel_at(x, y);
        weighted_sum(plane, &kernel, edge, x, y)
    }))
}

/// Computes the kernel-weighted sum centered on `(x, y)`.
#[inline]
fn weighted_sum(plane: &Grid<f64>, kernel: &Kernel, edge: EdgeMode, x: usize, y: usize) -> f64 {
    let (w, h) = plane.dimensions();
    let (rx, ry) = kernel.radius();
    let weights = kernel.weights();
    let mut sum = 0.0;

    for ky in 0..kernel.height() {
        let sy = y as isize + ky as isize - ry as isize;
        let Some(sy) = edge.resolve(sy, h) else {
            continue;
        };
        let src = plane.row(sy);
        for (kx, &kw) in weights.row(ky).iter().enumerate() {
            let sx = x as isize + kx as isize - rx as isize;
            if let Some(sx) = edge.resolve(sx, w) {
                sum += kw * src[sx];
            }
        }
    }
    sum
}

/// Allocates an output plane the size of `plane` and fills it row by row.
fn fill_rows<F>(plane: &Grid<f64>, pixel: F) -> Grid<f64>
where
    F: Fn(usize, usize) -> f64 + Sync,
{
    let (w, h) = plane.dimensions();
    let mut out = Grid::new(w, h, 0.0);
    if w == 0 || h == 0 {
        return out;
    }

    let fill_row = |(y, row): (usize, &mut [f64])| {
        for (x, v) in row.iter_mut().enumerate() {
            *v = pixel(x, y);
        }
    };

    #[cfg(feature = "parallel")]
    out.as_mut_slice().par_chunks_mut(w).enumerate().for_each(fill_row);
    #[cfg(not(feature = "parallel"))]
    out.as_mut_slice().chunks_mut(w).enumerate().for_each(fill_row);

    out
}
