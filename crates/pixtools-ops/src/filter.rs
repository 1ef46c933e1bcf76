//! Whole-image filters on [`ChannelPlanes`].
//!
//! Every filter convolves the three color planes independently and returns
//! a fresh image; inputs are never modified.
//!
//! # Example
//!
//! ```rust
//! use pixtools_core::{ChannelPlanes, PackedImage, Rgba};
//! use pixtools_ops::filter::{gaussian_blur, unsharp_mask};
//!
//! let img = PackedImage::filled(16, 16, Rgba::rgb(40, 120, 200).to_packed());
//! let planes = ChannelPlanes::from_packed(&img);
//!
//! let soft = gaussian_blur(&planes, 2, 1.0).unwrap();
//! let crisp = unsharp_mask(&planes, 2, 1.0, 0.8).unwrap();
//! assert_eq!(soft.to_packed(), img);
//! assert_eq!(crisp.to_packed(), img);
//! ```

use crate::convolve::{EdgeMode, convolve, convolve_varying};
use crate::gaussian::gaussian_kernel;
use crate::kernel::{Kernel, KernelProvider};
use crate::OpsResult;
use pixtools_core::{ChannelPlanes, Grid};
use tracing::{debug, trace};

/// Blurs each color plane with a normalized Gaussian.
///
/// # Errors
///
/// [`OpsError::InvalidParameter`](crate::OpsError::InvalidParameter) if
/// `sigma` is not positive and finite.
pub fn gaussian_blur(image: &ChannelPlanes, radius: usize, sigma: f64) -> OpsResult<ChannelPlanes> {
    trace!(
        width = image.width(),
        height = image.height(),
        radius,
        sigma,
        "gaussian_blur"
    );
    let kernel = gaussian_kernel(radius, sigma)?;
    kernel_filter(image, &kernel)
}

/// Convolves each color plane with `kernel`, clamping at the borders.
pub fn kernel_filter(image: &ChannelPlanes, kernel: &Kernel) -> OpsResult<ChannelPlanes> {
    kernel_filter_with(image, kernel, EdgeMode::Clamp)
}

/// Convolves each color plane with `kernel` using the given edge mode.
pub fn kernel_filter_with(
    image: &ChannelPlanes,
    kernel: &Kernel,
    edge: EdgeMode,
) -> OpsResult<ChannelPlanes> {
    debug!(
        kernel_w = kernel.width(),
        kernel_h = kernel.height(),
        ?edge,
        "kernel_filter"
    );
    per_plane(image, |plane| Ok(convolve(plane, kernel, edge)))
}

/// Convolves each color plane with a kernel chosen per pixel.
///
/// # Errors
///
/// A dimension mismatch if `provider` is bound to another image size, as
/// an [`EdgeAwareGaussian`](crate::EdgeAwareGaussian) built from a
/// differently sized guide is.
pub fn varying_kernel_filter<P>(image: &ChannelPlanes, provider: &P) -> OpsResult<ChannelPlanes>
where
    P: KernelProvider + ?Sized,
{
    varying_kernel_filter_with(image, provider, EdgeMode::Clamp)
}

/// [`varying_kernel_filter`] with an explicit edge mode.
pub fn varying_kernel_filter_with<P>(
    image: &ChannelPlanes,
    provider: &P,
    edge: EdgeMode,
) -> OpsResult<ChannelPlanes>
where
    P: KernelProvider + ?Sized,
{
    trace!(width = image.width(), height = image.height(), ?edge, "varying_kernel_filter");
    per_plane(image, |plane| convolve_varying(plane, provider, edge))
}

/// Sharpens by adding back the scaled difference from a Gaussian blur.
///
/// Computes `mask = (image - blur(image)) * coef` and returns
/// `image + mask`.
///
/// The mask goes through `threshold(0.0, true)` before it is added. That
/// call zeroes values with `|v| < 0.0`, which never happens, so it does
/// not alter the mask. It is kept so results match the established
/// behavior of this filter; pass a pre-thresholded image if noise
/// suppression is wanted.
pub fn unsharp_mask(
    image: &ChannelPlanes,
    radius: usize,
    sigma: f64,
    coef: f64,
) -> OpsResult<ChannelPlanes> {
    trace!(radius, sigma, coef, "unsharp_mask");
    let blurred = gaussian_blur(image, radius, sigma)?;

    let mut mask = image.clone();
    mask.subtract_image(&blurred)?;
    mask.times(coef);
    mask.threshold(0.0, true);

    let mut result = image.clone();
    result.add_image(&mask)?;
    Ok(result)
}

fn per_plane<F>(image: &ChannelPlanes, f: F) -> OpsResult<ChannelPlanes>
where
    F: Fn(&Grid<f64>) -> OpsResult<Grid<f64>>,
{
    let [b, g, r] = image.planes();
    Ok(ChannelPlanes::from_planes([f(b)?, f(g)?, f(r)?])?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{EdgeAwareGaussian, UniformKernel};
    use approx::assert_abs_diff_eq;
    use pixtools_core::Channel;

    fn flat(width: usize, height: usize, rgb: [f64; 3]) -> ChannelPlanes {
        let planes = rgb.map(|v| Grid::new(width, height, v));
        // Planes are stored blue, green, red.
        let [r, g, b] = planes;
        ChannelPlanes::from_planes([b, g, r]).unwrap()
    }

    fn step(width: usize, height: usize) -> ChannelPlanes {
        let mut plane = Grid::new(width, height, 0.1);
        for y in 0..height {
            for x in width / 2..width {
                plane.set(x, y, 0.9);
            }
        }
        ChannelPlanes::from_planes([plane.clone(), plane.clone(), plane]).unwrap()
    }

    #[test]
    fn test_gaussian_blur_preserves_flat() {
        let img = flat(11, 9, [0.8, 0.25, 0.6]);
        for radius in [1, 2, 5] {
            for sigma in [0.5, 1.0, 3.0] {
                let out = gaussian_blur(&img, radius, sigma).unwrap();
                assert_eq!(out.dimensions(), img.dimensions());
                for (a, b) in out.planes().iter().zip(img.planes()) {
                    for (&x, &y) in a.iter().zip(b.iter()) {
                        assert_abs_diff_eq!(x, y, epsilon = 1e-12);
                    }
                }
            }
        }
    }

    #[test]
    fn test_gaussian_blur_smooths_step() {
        let img = step(10, 3);
        let out = gaussian_blur(&img, 2, 1.0).unwrap();
        let red = out.channel(Channel::Red).unwrap();
        assert!(red.get(4, 1) > 0.1 && red.get(4, 1) < 0.5);
        assert!(red.get(5, 1) > 0.5 && red.get(5, 1) < 0.9);
        assert_abs_diff_eq!(red.get(0, 1), 0.1, epsilon = 1e-3);
    }

    #[test]
    fn test_gaussian_blur_bad_sigma() {
        assert!(gaussian_blur(&flat(2, 2, [0.0; 3]), 1, 0.0).is_err());
    }

    #[test]
    fn test_kernel_filter_identity() {
        let img = step(6, 4);
        assert_eq!(kernel_filter(&img, &Kernel::identity()).unwrap(), img);
    }

    #[test]
    fn test_kernel_filter_edge_mode() {
        let img = flat(3, 3, [1.0, 1.0, 1.0]);
        let zero = kernel_filter_with(&img, &Kernel::box_blur(1), EdgeMode::Zero).unwrap();
        assert_abs_diff_eq!(zero.channel(Channel::Green).unwrap().get(0, 0), 4.0 / 9.0, epsilon = 1e-12);
        let clamp = kernel_filter(&img, &Kernel::box_blur(1)).unwrap();
        assert_abs_diff_eq!(clamp.channel(Channel::Green).unwrap().get(0, 0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_varying_matches_fixed_for_uniform() {
        let img = step(8, 5);
        let k = Kernel::gaussian(1, 0.8).unwrap();
        let fixed = kernel_filter(&img, &k).unwrap();
        let varying = varying_kernel_filter(&img, &UniformKernel(k)).unwrap();
        assert_eq!(fixed, varying);
    }

    #[test]
    fn test_edge_aware_blurs_edges_less() {
        let img = step(12, 5);
        let guide = img.channel(Channel::Red).unwrap().clone();
        let provider = EdgeAwareGaussian::new(&guide, 2, 0.3, 2.0, 6).unwrap();
        let aware = varying_kernel_filter(&img, &provider).unwrap();
        let plain = gaussian_blur(&img, 2, 2.0).unwrap();

        let a = aware.channel(Channel::Red).unwrap();
        let p = plain.channel(Channel::Red).unwrap();
        // Next to the step the edge-aware result stays closer to the input.
        assert!((a.get(5, 2) - 0.1).abs() < (p.get(5, 2) - 0.1).abs());
        assert!((a.get(6, 2) - 0.9).abs() < (p.get(6, 2) - 0.9).abs());
    }

    #[test]
    fn test_edge_aware_guide_size_checked() {
        let guide = Grid::new(4, 4, 0.0);
        let provider = EdgeAwareGaussian::new(&guide, 1, 0.5, 1.5, 3).unwrap();
        let err = varying_kernel_filter(&flat(8, 2, [0.2, 0.4, 0.6]), &provider).unwrap_err();
        assert!(matches!(err, crate::OpsError::Core(ref e) if e.is_dimension_error()));
        assert!(varying_kernel_filter(&flat(10, 10, [0.5; 3]), &provider).is_err());
        assert!(varying_kernel_filter(&flat(4, 4, [0.5; 3]), &provider).is_ok());
    }

    #[test]
    fn test_unsharp_mask_flat_passthrough() {
        let img = flat(7, 7, [0.3, 0.5, 0.7]);
        let out = unsharp_mask(&img, 2, 1.0, 1.5).unwrap();
        for (a, b) in out.planes().iter().zip(img.planes()) {
            for (&x, &y) in a.iter().zip(b.iter()) {
                assert_abs_diff_eq!(x, y, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_unsharp_mask_formula() {
        let img = step(10, 3);
        let coef = 0.7;
        let out = unsharp_mask(&img, 1, 1.0, coef).unwrap();
        let blurred = gaussian_blur(&img, 1, 1.0).unwrap();
        for c in Channel::COLOR {
            let (i, b, o) = (
                img.channel(c).unwrap(),
                blurred.channel(c).unwrap(),
                out.channel(c).unwrap(),
            );
            for y in 0..3 {
                for x in 0..10 {
                    let expected = i.get(x, y) + (i.get(x, y) - b.get(x, y)) * coef;
                    assert_abs_diff_eq!(o.get(x, y), expected, epsilon = 1e-12);
                }
            }
        }
        // Overshoot on both sides of the step.
        let red = out.channel(Channel::Red).unwrap();
        assert!(red.get(4, 1) < 0.1);
        assert!(red.get(5, 1) > 0.9);
    }

    #[test]
    fn test_inputs_untouched() {
        let img = step(6, 6);
        let copy = img.clone();
        let _ = gaussian_blur(&img, 1, 1.0).unwrap();
        let _ = unsharp_mask(&img, 1, 1.0, 2.0).unwrap();
        assert_eq!(img, copy);
    }
}
