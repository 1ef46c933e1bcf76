//! Convolution kernels, fixed and spatially varying.
//!
//! - [`Kernel`] - an odd-sized grid of weights, used as given (no implicit
//!   normalization).
//! - [`KernelProvider`] - "kernel at position `(x, y)`", evaluated lazily per
//!   output pixel by [`convolve_varying`](crate::convolve::convolve_varying).
//!
//! # Strategies
//!
//! - [`UniformKernel`] - the same kernel everywhere
//! - [`EdgeAwareGaussian`] - a Gaussian whose sigma shrinks where the guide
//!   plane has strong gradients, so edges are blurred less

use crate::gaussian::gaussian_kernel;
use crate::{OpsError, OpsResult};
use pixtools_core::Grid;
use std::borrow::Cow;
use tracing::debug;

/// Odd-sized 2D grid of convolution weights.
///
/// # Example
///
/// ```rust
/// use pixtools_ops::Kernel;
///
/// let k = Kernel::from_rows(&[[0.0, 1.0, 0.0], [1.0, 2.0, 1.0], [0.0, 1.0, 0.0]]).unwrap();
/// assert_eq!(k.radius(), (1, 1));
/// assert!(Kernel::from_rows(&[[1.0, 1.0]]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Kernel {
    weights: Grid<f64>,
}

impl Kernel {
    /// Wraps a weight grid.
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidKernel`] unless both dimensions are odd.
    pub fn new(weights: Grid<f64>) -> OpsResult<Self> {
        let (w, h) = weights.dimensions();
        if w % 2 == 0 || h % 2 == 0 {
            return Err(OpsError::InvalidKernel(format!(
                "kernel dimensions must be odd, got {}x{}",
                w, h
            )));
        }
        Ok(Self { weights })
    }

    /// Builds a kernel from rows of weights.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> OpsResult<Self> {
        let weights =
            Grid::from_rows(rows).map_err(|e| OpsError::InvalidKernel(e.to_string()))?;
        Self::new(weights)
    }

    /// Builds a kernel from a row-major buffer.
    pub fn from_vec(data: Vec<f64>, width: usize, height: usize) -> OpsResult<Self> {
        let weights = Grid::from_vec(width, height, data)
            .map_err(|e| OpsError::InvalidKernel(e.to_string()))?;
        Self::new(weights)
    }

    /// 1x1 kernel with weight 1.
    pub fn identity() -> Self {
        Self {
            weights: Grid::new(1, 1, 1.0),
        }
    }

    /// `(2r+1)x(2r+1)` averaging kernel.
    pub fn box_blur(radius: usize) -> Self {
        let size = 2 * radius + 1;
        let weight = 1.0 / (size * size) as f64;
        Self {
            weights: Grid::new(size, size, weight),
        }
    }

    /// Normalized `(2r+1)x(2r+1)` Gaussian, see [`gaussian_kernel`].
    pub fn gaussian(radius: usize, sigma: f64) -> OpsResult<Self> {
        gaussian_kernel(radius, sigma)
    }

    /// 3x3 Laplacian sharpening kernel; weights sum to 1.
    pub fn sharpen(amount: f64) -> Self {
        Self::cross(-amount, 1.0 + 4.0 * amount)
    }

    /// 3x3 Laplacian edge detector; weights sum to 0.
    pub fn edge_detect() -> Self {
        Self::cross(-1.0, 4.0)
    }

    /// 3x3 kernel with `arm` on the four neighbours and `center` in the middle.
    fn cross(arm: f64, center: f64) -> Self {
        let mut weights = Grid::new(3, 3, 0.0);
        for (x, y) in [(1, 0), (0, 1), (2, 1), (1, 2)] {
            weights.set(x, y, arm);
        }
        weights.set(1, 1, center);
        Self { weights }
    }

    /// Kernel width.
    #[inline]
    pub fn width(&self) -> usize {
        self.weights.width()
    }

    /// Kernel height.
    #[inline]
    pub fn height(&self) -> usize {
        self.weights.height()
    }

    /// Returns the half-sizes `(rx, ry)`; the center sits at `(rx, ry)`.
    #[inline]
    pub fn radius(&self) -> (usize, usize) {
        (self.width() / 2, self.height() / 2)
    }

    /// Returns the weight grid.
    #[inline]
    pub fn weights(&self) -> &Grid<f64> {
        &self.weights
    }

    /// Returns the sum of all weights.
    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }
}

/// Yields the kernel to use at each output pixel.
///
/// Implementations are queried once per output pixel, possibly from
/// several threads when the `parallel` feature is on.
pub trait KernelProvider: Send + Sync {
    /// Returns the kernel for output pixel `(x, y)`.
    fn kernel_at(&self, x: usize, y: usize) -> Cow<'_, Kernel>;

    /// Dimensions this provider is defined over, if it is position-bound.
    ///
    /// Filters reject planes of any other size. Providers that answer for
    /// every position return `None`.
    fn extent(&self) -> Option<(usize, usize)> {
        None
    }
}

impl KernelProvider for Kernel {
    fn kernel_at(&self, _x: usize, _y: usize) -> Cow<'_, Kernel> {
        Cow::Borrowed(self)
    }
}

/// Provider that returns the same kernel at every position.
#[derive(Debug, Clone)]
pub struct UniformKernel(pub Kernel);

impl KernelProvider for UniformKernel {
    fn kernel_at(&self, _x: usize, _y: usize) -> Cow<'_, Kernel> {
        Cow::Borrowed(&self.0)
    }
}

/// Gaussian whose width follows the local gradient of a guide plane.
///
/// Flat areas get `sigma_max`, the strongest edge in the guide gets
/// `sigma_min`, and everything in between is interpolated linearly on the
/// gradient magnitude. Sigmas are quantized into `levels` precomputed
/// kernels, all of radius `radius`. Positions are looked up in the guide,
/// so filtering planes of a different size fails with a dimension mismatch.
///
/// # Example
///
/// ```rust
/// use pixtools_core::Grid;
/// use pixtools_ops::{EdgeAwareGaussian, KernelProvider};
///
/// let mut guide = Grid::new(8, 8, 0.0);
/// for y in 0..8 {
///     for x in 4..8 {
///         guide.set(x, y, 1.0);
///     }
/// }
/// let provider = EdgeAwareGaussian::new(&guide, 2, 0.3, 2.0, 8).unwrap();
/// let flat = provider.kernel_at(0, 4);
/// let edge = provider.kernel_at(4, 4);
/// let (cx, cy) = edge.radius();
/// assert!(edge.weights().get(cx, cy) > flat.weights().get(cx, cy));
/// ```
#[derive(Debug, Clone)]
pub struct EdgeAwareGaussian {
    kernels: Vec<Kernel>,
    level: Grid<u16>,
}

impl EdgeAwareGaussian {
    /// Builds the provider from a guide plane.
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidParameter`] if a sigma is not positive, if
    /// `sigma_min > sigma_max`, or if `levels` is zero.
    pub fn new(
        guide: &Grid<f64>,
        radius: usize,
        sigma_min: f64,
        sigma_max: f64,
        levels: u16,
    ) -> OpsResult<Self> {
        if levels == 0 {
            return Err(OpsError::InvalidParameter("levels must be > 0".into()));
        }
        if sigma_min > sigma_max {
            return Err(OpsError::InvalidParameter(format!(
                "sigma_min {} exceeds sigma_max {}",
                sigma_min, sigma_max
            )));
        }

        // Level 0 is the flattest (sigma_max), the last level the sharpest.
        let kernels = (0..levels)
            .map(|i| {
                let t = if levels == 1 {
                    0.0
                } else {
                    i as f64 / (levels - 1) as f64
                };
                gaussian_kernel(radius, sigma_max - (sigma_max - sigma_min) * t)
            })
            .collect::<OpsResult<Vec<_>>>()?;

        let gradient = gradient_magnitude(guide);
        let peak = gradient.iter().cloned().fold(0.0f64, f64::max);
        let top = (levels - 1) as f64;
        let level = gradient.map(|&g| {
            if peak > 0.0 {
                (g / peak * top).round() as u16
            } else {
                0
            }
        });
        debug!(radius, sigma_min, sigma_max, levels, peak, "EdgeAwareGaussian::new");

        Ok(Self { kernels, level })
    }

    /// Returns the quantized sigma level chosen for `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the guide.
    pub fn level_at(&self, x: usize, y: usize) -> u16 {
        self.level.get(x, y)
    }

    /// Returns the guide's dimensions.
    pub fn dimensions(&self) -> (usize, usize) {
        self.level.dimensions()
    }
}

impl KernelProvider for EdgeAwareGaussian {
    fn kernel_at(&self, x: usize, y: usize) -> Cow<'_, Kernel> {
        Cow::Borrowed(&self.kernels[self.level.get(x, y) as usize])
    }

    fn extent(&self) -> Option<(usize, usize)> {
        Some(self.level.dimensions())
    }
}

/// Central-difference gradient magnitude with clamped borders.
fn gradient_magnitude(plane: &Grid<f64>) -> Grid<f64> {
    let (w, h) = plane.dimensions();
    let mut out = Grid::new(w, h, 0.0);
    for y in 0..h {
        let up = y.saturating_sub(1);
        let down = (y + 1).min(h - 1);
        for x in 0..w {
            let left = x.saturating_sub(1);
            let right = (x + 1).min(w - 1);
            let gx = plane.get(right, y) - plane.get(left, y);
            let gy = plane.get(x, down) - plane.get(x, up);
            out.set(x, y, gx.hypot(gy));
        }
    }
    out
}
