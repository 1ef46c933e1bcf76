//! Floating-point RGB working representation.
//!
//! [`ChannelPlanes`] holds one `f64` plane per color channel and is where
//! all filtering and arithmetic happens. It has no alpha plane.
//!
//! Values are not bounded during computation: blurs, masks and offsets may
//! overshoot `[0, 1]`. They are clamped only when converting back to a
//! [`PackedImage`].
//!
//! # In-place contract
//!
//! The arithmetic operators (`add*`, `times*`, [`invert`](ChannelPlanes::invert),
//! [`threshold`](ChannelPlanes::threshold), `normalize*`,
//! [`add_image`](ChannelPlanes::add_image),
//! [`subtract_image`](ChannelPlanes::subtract_image)) mutate the receiver.
//! Clone first to keep the original. Operators that fail leave the receiver
//! untouched.
//!
//! # Example
//!
//! ```rust
//! use pixtools_core::{ChannelPlanes, PackedImage};
//!
//! let white = PackedImage::new(2, 2);
//! let mut planes = ChannelPlanes::from_packed(&white);
//! planes.invert();
//! let black = planes.to_packed();
//! assert!(black.data().iter().all(|&p| p == 0xFF00_0000));
//! ```

use crate::{Channel, Error, Grid, OPAQUE_WHITE, PackedImage, Result, Rgba, unit_to_channel};
use tracing::{debug, trace, warn};

/// Number of planes held by [`ChannelPlanes`].
pub const COLOR_CHANNELS: usize = 3;

/// Three same-sized `f64` planes indexed by color channel id.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelPlanes {
    planes: [Grid<f64>; COLOR_CHANNELS],
}

/// Maps a channel to its plane index, rejecting alpha.
#[inline]
fn plane_index(channel: Channel, op: &'static str) -> Result<usize> {
    if channel.is_color() {
        Ok(channel.id() as usize)
    } else {
        Err(Error::invalid_channel(channel.id(), op))
    }
}

impl ChannelPlanes {
    /// Creates a blank canvas with every value at `0.0`.
    pub fn new(width: usize, height: usize) -> Self {
        let blank = Grid::new(width, height, 0.0);
        Self {
            planes: [blank.clone(), blank.clone(), blank],
        }
    }

    /// Builds planes from `[blue, green, red]` grids.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] unless all three grids share
    /// the same dimensions.
    pub fn from_planes(planes: [Grid<f64>; COLOR_CHANNELS]) -> Result<Self> {
        planes[0].ensure_same_size(&planes[1])?;
        planes[0].ensure_same_size(&planes[2])?;
        Ok(Self { planes })
    }

    /// Uses one grid for all three channels (a gray image).
    pub fn from_gray(plane: Grid<f64>) -> Self {
        Self {
            planes: [plane.clone(), plane.clone(), plane],
        }
    }

    /// Converts a packed image, normalizing each color channel to `[0, 1]`.
    ///
    /// Alpha is dropped.
    pub fn from_packed(image: &PackedImage) -> Self {
        trace!(width = image.width(), height = image.height(), "ChannelPlanes::from_packed");
        Self {
            planes: Channel::COLOR.map(|c| image.channel_f64(c)),
        }
    }

    /// Returns the width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.planes[0].width()
    }

    /// Returns the height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.planes[0].height()
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        self.planes[0].dimensions()
    }

    /// Returns all three planes in channel id order (blue, green, red).
    #[inline]
    pub fn planes(&self) -> &[Grid<f64>; COLOR_CHANNELS] {
        &self.planes
    }

    /// Consumes the image and returns its planes.
    #[inline]
    pub fn into_planes(self) -> [Grid<f64>; COLOR_CHANNELS] {
        self.planes
    }

    /// Borrows one color plane.
    pub fn channel(&self, channel: Channel) -> Result<&Grid<f64>> {
        let i = plane_index(channel, "ChannelPlanes::channel")?;
        Ok(&self.planes[i])
    }

    /// Replaces one color plane.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidChannel`] for alpha, [`Error::DimensionMismatch`] if
    /// `plane` is not the image's size.
    pub fn set_channel(&mut self, channel: Channel, plane: Grid<f64>) -> Result<()> {
        let i = plane_index(channel, "ChannelPlanes::set_channel")?;
        self.planes[i].ensure_same_size(&plane)?;
        self.planes[i] = plane;
        Ok(())
    }

    /// Adds `offset` to every value of every plane.
    pub fn add(&mut self, offset: f64) {
        for plane in &mut self.planes {
            plane.iter_mut().for_each(|v| *v += offset);
        }
    }

    /// Adds `offset` to every value of one plane.
    pub fn add_channel(&mut self, channel: Channel, offset: f64) -> Result<()> {
        let i = plane_index(channel, "ChannelPlanes::add_channel")?;
        self.planes[i].iter_mut().for_each(|v| *v += offset);
        Ok(())
    }

    /// Adds `offsets` elementwise to every plane.
    pub fn add_grid(&mut self, offsets: &Grid<f64>) -> Result<()> {
        self.planes[0].ensure_same_size(offsets)?;
        for plane in &mut self.planes {
            zip_apply(plane, offsets, |v, o| *v += o);
        }
        Ok(())
    }

    /// Adds `offsets` elementwise to one plane.
    pub fn add_channel_grid(&mut self, channel: Channel, offsets: &Grid<f64>) -> Result<()> {
        let i = plane_index(channel, "ChannelPlanes::add_channel_grid")?;
        self.planes[i].ensure_same_size(offsets)?;
        zip_apply(&mut self.planes[i], offsets, |v, o| *v += o);
        Ok(())
    }

    /// Multiplies every value of every plane by `coef`.
    pub fn times(&mut self, coef: f64) {
        for plane in &mut self.planes {
            plane.iter_mut().for_each(|v| *v *= coef);
        }
    }

    /// Multiplies every value of one plane by `coef`.
    pub fn times_channel(&mut self, channel: Channel, coef: f64) -> Result<()> {
        let i = plane_index(channel, "ChannelPlanes::times_channel")?;
        self.planes[i].iter_mut().for_each(|v| *v *= coef);
        Ok(())
    }

    /// Multiplies every plane elementwise by `coefs`.
    pub fn times_grid(&mut self, coefs: &Grid<f64>) -> Result<()> {
        self.planes[0].ensure_same_size(coefs)?;
        for plane in &mut self.planes {
            zip_apply(plane, coefs, |v, c| *v *= c);
        }
        Ok(())
    }

    /// Multiplies one plane elementwise by `coefs`.
    pub fn times_channel_grid(&mut self, channel: Channel, coefs: &Grid<f64>) -> Result<()> {
        let i = plane_index(channel, "ChannelPlanes::times_channel_grid")?;
        self.planes[i].ensure_same_size(coefs)?;
        zip_apply(&mut self.planes[i], coefs, |v, c| *v *= c);
        Ok(())
    }

    /// Adds `other` elementwise, all three planes.
    pub fn add_image(&mut self, other: &ChannelPlanes) -> Result<()> {
        self.ensure_same_size(other)?;
        for (plane, rhs) in self.planes.iter_mut().zip(&other.planes) {
            zip_apply(plane, rhs, |v, o| *v += o);
        }
        Ok(())
    }

    /// Subtracts `other` elementwise, all three planes.
    pub fn subtract_image(&mut self, other: &ChannelPlanes) -> Result<()> {
        self.ensure_same_size(other)?;
        for (plane, rhs) in self.planes.iter_mut().zip(&other.planes) {
            zip_apply(plane, rhs, |v, o| *v -= o);
        }
        Ok(())
    }

    /// Replaces every value `v` by `1.0 - v`.
    pub fn invert(&mut self) {
        for plane in &mut self.planes {
            plane.iter_mut().for_each(|v| *v = 1.0 - *v);
        }
    }

    /// Zeroes values by magnitude.
    ///
    /// With `keep_upper`, every value with `|v| < t` becomes `0.0`;
    /// otherwise every value with `|v| > t` does. Values with `|v| == t`
    /// are kept in both modes.
    pub fn threshold(&mut self, t: f64, keep_upper: bool) {
        for plane in &mut self.planes {
            for v in plane.iter_mut() {
                let m = v.abs();
                if (keep_upper && m < t) || (!keep_upper && m > t) {
                    *v = 0.0;
                }
            }
        }
    }

    /// Rescales using the global min and max over all planes.
    ///
    /// Computes `v <- (v + min) / max` where `min` and `max` are taken
    /// before the shift. This is not a min-max rescale to `[0, 1]` unless
    /// `min == 0`. When `max == 0` only the shift is applied.
    pub fn normalize(&mut self) {
        let Some((min, max)) = extrema(self.planes.iter().flat_map(|p| p.iter())) else {
            return;
        };
        debug!(min, max, "ChannelPlanes::normalize");
        self.add(min);
        match scale_for(max) {
            Some(scale) => self.times(scale),
            None => warn!("normalize: maximum is zero, skipping scale"),
        }
    }

    /// [`normalize`](Self::normalize) restricted to one plane.
    pub fn normalize_channel(&mut self, channel: Channel) -> Result<()> {
        let i = plane_index(channel, "ChannelPlanes::normalize_channel")?;
        let Some((min, max)) = extrema(self.planes[i].iter()) else {
            return Ok(());
        };
        debug!(%channel, min, max, "ChannelPlanes::normalize_channel");
        self.add_channel(channel, min)?;
        match scale_for(max) {
            Some(scale) => self.times_channel(channel, scale)?,
            None => warn!(%channel, "normalize: maximum is zero, skipping scale"),
        }
        Ok(())
    }

    /// Converts to an opaque packed image, clamping values to `[0, 1]`.
    pub fn to_packed(&self) -> PackedImage {
        let [b, g, r] = &self.planes;
        let mut pixels = Grid::new(self.width(), self.height(), OPAQUE_WHITE);
        for (((px, &r), &g), &b) in pixels.iter_mut().zip(r.iter()).zip(g.iter()).zip(b.iter()) {
            *px = Rgba::rgb(unit_to_channel(r), unit_to_channel(g), unit_to_channel(b)).to_packed();
        }
        PackedImage::from_grid(pixels)
    }

    /// Writes red, green and blue into `target`, keeping its alpha.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if `target` is not this size.
    pub fn write_into(&self, target: &mut PackedImage) -> Result<()> {
        if target.dimensions() != self.dimensions() {
            return Err(Error::dimension_mismatch(
                target.dimensions(),
                self.dimensions(),
            ));
        }
        for (channel, plane) in Channel::COLOR.into_iter().zip(&self.planes) {
            target.set_channel_f64(channel, plane)?;
        }
        Ok(())
    }

    /// Checks that `other` has this image's dimensions.
    #[inline]
    pub fn ensure_same_size(&self, other: &ChannelPlanes) -> Result<()> {
        self.planes[0].ensure_same_size(&other.planes[0])
    }
}

fn zip_apply(plane: &mut Grid<f64>, rhs: &Grid<f64>, f: impl Fn(&mut f64, f64)) {
    for (v, &o) in plane.iter_mut().zip(rhs.iter()) {
        f(v, o);
    }
}

fn extrema<'a>(values: impl Iterator<Item = &'a f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

fn scale_for(max: f64) -> Option<f64> {
    (max != 0.0).then(|| 1.0 / max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn gradient(width: usize, height: usize) -> ChannelPlanes {
        let mut planes = ChannelPlanes::new(width, height);
        for (k, channel) in Channel::COLOR.into_iter().enumerate() {
            let data = (0..width * height)
                .map(|i| (i + k) as f64 / (width * height + 2) as f64)
                .collect();
            planes
                .set_channel(channel, Grid::from_vec(width, height, data).unwrap())
                .unwrap();
        }
        planes
    }

    #[test]
    fn test_from_gray() {
        let planes = ChannelPlanes::from_gray(Grid::new(3, 2, 0.5));
        assert_eq!(planes.dimensions(), (3, 2));
        assert_eq!(planes.to_packed().rgba(2, 1), Rgba::rgb(128, 128, 128));
    }

    #[test]
    fn test_from_packed_normalizes() {
        let img = PackedImage::filled(2, 2, 0xFF33_6699);
        let planes = ChannelPlanes::from_packed(&img);
        assert_abs_diff_eq!(planes.channel(Channel::Red).unwrap().get(1, 1), 0.2);
        assert_abs_diff_eq!(planes.channel(Channel::Green).unwrap().get(0, 1), 0.4);
        assert_abs_diff_eq!(planes.channel(Channel::Blue).unwrap().get(1, 0), 0.6);
    }

    #[test]
    fn test_alpha_rejected() {
        let mut planes = ChannelPlanes::new(2, 2);
        assert!(matches!(
            planes.channel(Channel::Alpha),
            Err(Error::InvalidChannel { channel: 3, .. })
        ));
        assert!(planes.add_channel(Channel::Alpha, 1.0).is_err());
        assert!(planes.normalize_channel(Channel::Alpha).is_err());
    }

    #[test]
    fn test_add_and_times() {
        let mut planes = ChannelPlanes::new(3, 2);
        planes.add(0.5);
        planes.add_channel(Channel::Green, 0.25).unwrap();
        planes.times(2.0);
        planes.times_channel(Channel::Red, 0.5).unwrap();
        assert_abs_diff_eq!(planes.channel(Channel::Blue).unwrap().get(2, 1), 1.0);
        assert_abs_diff_eq!(planes.channel(Channel::Green).unwrap().get(0, 0), 1.5);
        assert_abs_diff_eq!(planes.channel(Channel::Red).unwrap().get(1, 1), 0.5);
    }

    #[test]
    fn test_grid_operands() {
        let mut planes = ChannelPlanes::new(2, 1);
        planes.add(1.0);
        let g = Grid::from_rows(&[[2.0, 3.0]]).unwrap();
        planes.times_grid(&g).unwrap();
        planes.add_channel_grid(Channel::Blue, &g).unwrap();
        planes.times_channel_grid(Channel::Red, &g).unwrap();
        planes.add_grid(&g).unwrap();
        assert_eq!(planes.channel(Channel::Blue).unwrap().row(0), &[6.0, 9.0]);
        assert_eq!(planes.channel(Channel::Green).unwrap().row(0), &[4.0, 6.0]);
        assert_eq!(planes.channel(Channel::Red).unwrap().row(0), &[6.0, 12.0]);
    }

    #[test]
    fn test_grid_operand_size_checked() {
        let mut planes = ChannelPlanes::new(4, 4);
        let before = planes.clone();
        let wrong = Grid::new(4, 3, 1.0);
        assert!(matches!(
            planes.add_grid(&wrong),
            Err(Error::DimensionMismatch { .. })
        ));
        assert!(planes.times_channel_grid(Channel::Red, &wrong).is_err());
        assert!(planes.add_image(&ChannelPlanes::new(3, 4)).is_err());
        assert!(planes.subtract_image(&ChannelPlanes::new(4, 5)).is_err());
        assert_eq!(planes, before);
    }

    #[test]
    fn test_add_subtract_image() {
        let a = gradient(3, 3);
        let mut b = a.clone();
        b.add_image(&a).unwrap();
        b.subtract_image(&a).unwrap();
        for (p, q) in a.planes().iter().zip(b.planes()) {
            for (x, y) in p.iter().zip(q.iter()) {
                assert_abs_diff_eq!(x, y, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_invert_twice_is_identity() {
        let original = gradient(4, 3);
        let mut planes = original.clone();
        planes.invert();
        assert_abs_diff_eq!(
            planes.channel(Channel::Blue).unwrap().get(0, 0),
            1.0 - original.channel(Channel::Blue).unwrap().get(0, 0)
        );
        planes.invert();
        for (p, q) in original.planes().iter().zip(planes.planes()) {
            for (x, y) in p.iter().zip(q.iter()) {
                assert_abs_diff_eq!(x, y, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_threshold_boundary_kept() {
        let row = [-0.5, -0.2, 0.0, 0.2, 0.3, 0.5];
        let plane = Grid::from_rows(&[row]).unwrap();
        let base = ChannelPlanes::from_planes([plane.clone(), plane.clone(), plane]).unwrap();

        let mut upper = base.clone();
        upper.threshold(0.2, true);
        assert_eq!(
            upper.channel(Channel::Red).unwrap().row(0),
            &[-0.5, -0.2, 0.0, 0.2, 0.3, 0.5]
        );
        upper.threshold(0.3, true);
        assert_eq!(
            upper.channel(Channel::Red).unwrap().row(0),
            &[-0.5, 0.0, 0.0, 0.0, 0.3, 0.5]
        );

        let mut lower = base;
        lower.threshold(0.2, false);
        assert_eq!(
            lower.channel(Channel::Green).unwrap().row(0),
            &[0.0, -0.2, 0.0, 0.2, 0.0, 0.0]
        );
    }

    #[test]
    fn test_threshold_zero_keep_upper_is_noop() {
        let mut planes = gradient(3, 2);
        planes.add(-0.4);
        let before = planes.clone();
        planes.threshold(0.0, true);
        assert_eq!(planes, before);
    }

    #[test]
    fn test_normalize_uses_preshift_max() {
        let red = Grid::from_rows(&[[0.2, 0.6]]).unwrap();
        let green = Grid::from_rows(&[[0.4, 0.4]]).unwrap();
        let blue = Grid::from_rows(&[[0.3, 0.5]]).unwrap();
        let mut planes = ChannelPlanes::from_planes([blue, green, red]).unwrap();
        planes.normalize();
        // min = 0.2, max = 0.6: v <- (v + 0.2) / 0.6
        let red = planes.channel(Channel::Red).unwrap();
        assert_abs_diff_eq!(red.get(0, 0), 0.4 / 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(red.get(1, 0), 0.8 / 0.6, epsilon = 1e-12);
        let blue = planes.channel(Channel::Blue).unwrap();
        assert_abs_diff_eq!(blue.get(0, 0), 0.5 / 0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_normalize_channel_only_touches_one_plane() {
        let mut planes = gradient(2, 2);
        let before = planes.clone();
        let green = before.channel(Channel::Green).unwrap();
        let min = green.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = green.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        planes.normalize_channel(Channel::Green).unwrap();
        assert_eq!(planes.channel(Channel::Red), before.channel(Channel::Red));
        assert_eq!(planes.channel(Channel::Blue), before.channel(Channel::Blue));
        let out = planes.channel(Channel::Green).unwrap();
        for (v, o) in green.iter().zip(out.iter()) {
            assert_abs_diff_eq!(*o, (v + min) / max, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_normalize_zero_max_skips_scale() {
        let plane = Grid::from_rows(&[[0.0, -0.5]]).unwrap();
        let mut planes =
            ChannelPlanes::from_planes([plane.clone(), plane.clone(), plane]).unwrap();
        planes.normalize();
        // shifted by min = -0.5, then left unscaled
        let red = planes.channel(Channel::Red).unwrap();
        assert_abs_diff_eq!(red.get(0, 0), -0.5);
        assert_abs_diff_eq!(red.get(1, 0), -1.0);

        let mut zeros = ChannelPlanes::new(2, 2);
        zeros.normalize();
        assert!(zeros.planes().iter().all(|p| p.iter().all(|&v| v == 0.0)));
    }

    #[test]
    fn test_normalize_negative_max_scales() {
        let mut planes = ChannelPlanes::new(2, 2);
        planes.add(-1.0);
        planes.normalize();
        // (-1 + -1) / -1
        assert_abs_diff_eq!(planes.channel(Channel::Red).unwrap().get(0, 0), 2.0);
    }

    #[test]
    fn test_white_invert_to_black_keeps_opaque() {
        let white = PackedImage::from_data(2, 2, vec![0xFFFF_FFFF; 4]).unwrap();
        let mut planes = ChannelPlanes::from_packed(&white);
        planes.invert();
        let out = planes.to_packed();
        for c in Channel::COLOR {
            assert!(out.channel(c).iter().all(|&v| v == 0));
        }
        assert!(out.channel(Channel::Alpha).iter().all(|&a| a == 255));
    }

    #[test]
    fn test_write_into_keeps_alpha() {
        let mut target = PackedImage::filled(2, 1, 0x4000_0000);
        let mut planes = ChannelPlanes::new(2, 1);
        planes.add(2.0); // overshoot clamps to 255
        planes.write_into(&mut target).unwrap();
        assert_eq!(target.pixel(0, 0), 0x40FF_FFFF);

        let mut wrong = PackedImage::new(1, 1);
        assert!(planes.write_into(&mut wrong).is_err());
    }
}
