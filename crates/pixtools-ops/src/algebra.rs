//! Pure channel algebra on [`ChannelPlanes`]: luma, binarization, blending.

use crate::OpsResult;
use pixtools_core::{Channel, ChannelPlanes, Grid, luma};
use tracing::trace;

/// Replaces every pixel by its BT.601 luma, written to all three planes.
///
/// Applying it twice gives the same result as applying it once (the
/// luma weights sum to 1), up to floating-point rounding.
pub fn to_grayscale(image: &ChannelPlanes) -> ChannelPlanes {
    trace!(width = image.width(), height = image.height(), "to_grayscale");
    ChannelPlanes::from_gray(luma_plane(image))
}

/// Grayscale followed by a hard threshold.
///
/// A pixel becomes `1.0` if its luma is strictly greater than `t` and
/// `0.0` otherwise, so luma exactly equal to `t` maps to black.
pub fn to_black_and_white(image: &ChannelPlanes, t: f64) -> ChannelPlanes {
    trace!(t, "to_black_and_white");
    ChannelPlanes::from_gray(luma_plane(image).map(|&v| if v > t { 1.0 } else { 0.0 }))
}

/// Per-pixel weighted average of two images.
///
/// `proportion(x, y)` is the weight of `first`; `second` gets
/// `1 - proportion(x, y)`. Weights are not clamped.
///
/// # Errors
///
/// [`Error::DimensionMismatch`](pixtools_core::Error::DimensionMismatch)
/// unless both images and `proportion` share one size.
pub fn blend(
    first: &ChannelPlanes,
    second: &ChannelPlanes,
    proportion: &Grid<f64>,
) -> OpsResult<ChannelPlanes> {
    trace!(width = first.width(), height = first.height(), "blend");
    first.ensure_same_size(second)?;
    first.channel(Channel::Red)?.ensure_same_size(proportion)?;

    let complement = proportion.map(|&p| 1.0 - p);
    let mut a = first.clone();
    a.times_grid(proportion)?;
    let mut b = second.clone();
    b.times_grid(&complement)?;
    a.add_image(&b)?;
    Ok(a)
}

fn luma_plane(image: &ChannelPlanes) -> Grid<f64> {
    let [b, g, r] = image.planes();
    let mut out = Grid::new(image.width(), image.height(), 0.0);
    for (((v, &r), &g), &b) in out.iter_mut().zip(r.iter()).zip(g.iter()).zip(b.iter()) {
        *v = luma(r, g, b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use pixtools_core::{PackedImage, Rgba};

    fn sample() -> ChannelPlanes {
        let mut img = PackedImage::new(3, 2);
        img.set_pixel(0, 0, Rgba::rgb(255, 0, 0).to_packed());
        img.set_pixel(1, 0, Rgba::rgb(0, 255, 0).to_packed());
        img.set_pixel(2, 0, Rgba::rgb(0, 0, 255).to_packed());
        img.set_pixel(0, 1, Rgba::rgb(12, 200, 99).to_packed());
        img.set_pixel(1, 1, Rgba::rgb(0, 0, 0).to_packed());
        ChannelPlanes::from_packed(&img)
    }

    #[test]
    fn test_grayscale_weights() {
        let gray = to_grayscale(&sample());
        for c in Channel::COLOR {
            let p = gray.channel(c).unwrap();
            assert_abs_diff_eq!(p.get(0, 0), 0.299, epsilon = 1e-12);
            assert_abs_diff_eq!(p.get(1, 0), 0.587, epsilon = 1e-12);
            assert_abs_diff_eq!(p.get(2, 0), 0.114, epsilon = 1e-12);
            assert_abs_diff_eq!(p.get(1, 1), 0.0);
            assert_abs_diff_eq!(p.get(2, 1), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_grayscale_idempotent() {
        let once = to_grayscale(&sample());
        let twice = to_grayscale(&once);
        for (a, b) in once.planes().iter().zip(twice.planes()) {
            for (&x, &y) in a.iter().zip(b.iter()) {
                assert_abs_diff_eq!(x, y, epsilon = 1e-12);
            }
        }
        assert_eq!(once.to_packed(), twice.to_packed());
    }

    #[test]
    fn test_black_and_white_strict() {
        let img = sample();
        let bw = to_black_and_white(&img, 0.587);
        let p = bw.channel(Channel::Blue).unwrap();
        assert_eq!(p.get(0, 0), 0.0);
        assert_eq!(p.get(2, 1), 1.0);
        assert_eq!(p.get(1, 1), 0.0);

        // Luma equal to the threshold stays black.
        let gray = ChannelPlanes::from_planes([
            Grid::new(1, 1, 0.5),
            Grid::new(1, 1, 0.5),
            Grid::new(1, 1, 0.5),
        ])
        .unwrap();
        let t = luma(0.5, 0.5, 0.5);
        assert_eq!(to_black_and_white(&gray, t).channel(Channel::Red).unwrap().get(0, 0), 0.0);
        assert_eq!(
            to_black_and_white(&gray, t - 1e-9).channel(Channel::Red).unwrap().get(0, 0),
            1.0
        );
    }

    #[test]
    fn test_blend() {
        let black = ChannelPlanes::new(2, 1);
        let mut white = ChannelPlanes::new(2, 1);
        white.add(1.0);
        let proportion = Grid::from_rows(&[[0.25, 1.0]]).unwrap();
        let out = blend(&white, &black, &proportion).unwrap();
        for c in Channel::COLOR {
            let p = out.channel(c).unwrap();
            assert_abs_diff_eq!(p.get(0, 0), 0.25);
            assert_abs_diff_eq!(p.get(1, 0), 1.0);
        }
    }

    #[test]
    fn test_blend_size_checks() {
        let a = ChannelPlanes::new(2, 2);
        let b = ChannelPlanes::new(3, 2);
        assert!(blend(&a, &b, &Grid::new(2, 2, 0.5)).is_err());
        assert!(blend(&a, &a, &Grid::new(2, 3, 0.5)).is_err());
        assert!(blend(&a, &a, &Grid::new(2, 2, 0.5)).is_ok());
    }
}
