//! Gaussian kernel synthesis.
//!
//! ```rust
//! use pixtools_ops::gaussian::gaussian_kernel;
//!
//! let k = gaussian_kernel(2, 1.0).unwrap();
//! assert_eq!((k.width(), k.height()), (5, 5));
//! assert!((k.sum() - 1.0).abs() < 1e-9);
//! ```

use crate::convolve::{EdgeMode, convolve};
use crate::{Kernel, OpsError, OpsResult};
use pixtools_core::Grid;
use tracing::trace;

/// Builds a normalized `(2k+1)x(2k+1)` Gaussian kernel.
///
/// The weight at offset `(dx, dy)` from the center is proportional to
/// `exp(-(dx^2 + dy^2) / (2 sigma^2))`; weights are scaled to sum to 1 so
/// flat regions keep their value after filtering.
///
/// # Errors
///
/// [`OpsError::InvalidParameter`] unless `sigma` is finite and positive.
pub fn gaussian_kernel(radius: usize, sigma: f64) -> OpsResult<Kernel> {
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(OpsError::InvalidParameter(format!(
            "sigma must be positive and finite, got {}",
            sigma
        )));
    }
    trace!(radius, sigma, "gaussian_kernel");

    let size = 2 * radius + 1;
    let half = radius as isize;
    let two_sigma2 = 2.0 * sigma * sigma;

    let mut data = Vec::with_capacity(size * size);
    for dy in -half..=half {
        for dx in -half..=half {
            let d = (dx * dx + dy * dy) as f64;
            data.push((-d / two_sigma2).exp());
        }
    }

    // The center weight is exp(0) = 1, so the sum is never zero.
    let sum: f64 = data.iter().sum();
    for w in &mut data {
        *w /= sum;
    }

    Kernel::new(Grid::from_vec(size, size, data)?)
}

/// Blurs one plane with a Gaussian of radius `radius` and width `sigma`.
///
/// Borders extend the nearest edge pixel ([`EdgeMode::Clamp`]).
pub fn apply_gaussian_filter(plane: &Grid<f64>, radius: usize, sigma: f64) -> OpsResult<Grid<f64>> {
    let kernel = gaussian_kernel(radius, sigma)?;
    Ok(convolve(plane, &kernel, EdgeMode::Clamp))
}
