//! Display-ready image with one packed ARGB integer per pixel.
//!
//! [`PackedImage`] is the compact representation that crosses the codec
//! boundary. It carries alpha, which the floating-point
//! [`ChannelPlanes`](crate::ChannelPlanes) representation does not.
//!
//! # Example
//!
//! ```rust
//! use pixtools_core::{Channel, PackedImage};
//!
//! let mut img = PackedImage::new(4, 2); // opaque white
//! img.fill_channel(Channel::Red, 0);
//! let red = img.channel(Channel::Red);
//! assert!(red.iter().all(|&v| v == 0));
//! assert_eq!(img.pixel(0, 0), 0xFF00_FFFF);
//! ```

use crate::{
    Channel, Grid, OPAQUE_WHITE, Result, Rgba, channel_to_unit, channel_to_unit_f64,
    unit_to_channel,
};
use tracing::trace;

/// Grid of packed `alpha|red|green|blue` pixels.
///
/// Every channel value lies in `[0, 255]` by construction. Dimensions are
/// immutable after construction; channel setters reject operands of the
/// wrong size.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedImage {
    pixels: Grid<u32>,
}

impl PackedImage {
    /// Creates an opaque white image.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, OPAQUE_WHITE)
    }

    /// Creates an image with every pixel set to `color`.
    pub fn filled(width: usize, height: usize, color: u32) -> Self {
        Self {
            pixels: Grid::new(width, height, color),
        }
    }

    /// Wraps a row-major buffer of packed pixels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`](crate::Error::InvalidDimensions)
    /// if `data.len() != width * height`.
    pub fn from_data(width: usize, height: usize, data: Vec<u32>) -> Result<Self> {
        Ok(Self {
            pixels: Grid::from_vec(width, height, data)?,
        })
    }

    /// Wraps an existing grid of packed pixels.
    pub fn from_grid(pixels: Grid<u32>) -> Self {
        Self { pixels }
    }

    /// Returns the image width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.pixels.width()
    }

    /// Returns the image height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.pixels.height()
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        self.pixels.dimensions()
    }

    /// Returns the packed pixel grid.
    #[inline]
    pub fn data(&self) -> &Grid<u32> {
        &self.pixels
    }

    /// Consumes the image and returns its pixel grid.
    #[inline]
    pub fn into_grid(self) -> Grid<u32> {
        self.pixels
    }

    /// Returns the packed pixel at `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels.get(x, y)
    }

    /// Returns the pixel at `(x, y)` as an [`Rgba`].
    #[inline]
    pub fn rgba(&self, x: usize, y: usize) -> Rgba {
        Rgba::from_packed(self.pixel(x, y))
    }

    /// Overwrites the packed pixel at `(x, y)`.
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, packed: u32) {
        self.pixels.set(x, y, packed);
    }

    /// Extracts one channel as 8-bit values.
    pub fn channel(&self, channel: Channel) -> Grid<u8> {
        trace!(%channel, width = self.width(), height = self.height(), "PackedImage::channel");
        self.pixels.map(|&px| channel.extract(px))
    }

    /// Extracts one channel scaled to `[0.0, 1.0]`.
    pub fn channel_f32(&self, channel: Channel) -> Grid<f32> {
        self.pixels.map(|&px| channel_to_unit(channel.extract(px)))
    }

    /// Extracts one channel scaled to `[0.0, 1.0]` in double precision.
    pub fn channel_f64(&self, channel: Channel) -> Grid<f64> {
        self.pixels.map(|&px| channel_to_unit_f64(channel.extract(px)))
    }

    /// Overwrites one channel from 8-bit values, used as-is.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`](crate::Error::DimensionMismatch)
    /// if `data` is not the image's size.
    pub fn set_channel(&mut self, channel: Channel, data: &Grid<u8>) -> Result<()> {
        trace!(%channel, "PackedImage::set_channel");
        self.pixels.ensure_same_size(data)?;
        for (px, &v) in self.pixels.iter_mut().zip(data.iter()) {
            *px = channel.inject(*px, v);
        }
        Ok(())
    }

    /// Overwrites one channel from unit values.
    ///
    /// Values are scaled by 255, rounded and clamped to `[0, 255]` before
    /// packing, so out-of-range input never corrupts a neighbouring channel.
    pub fn set_channel_f32(&mut self, channel: Channel, data: &Grid<f32>) -> Result<()> {
        self.pixels.ensure_same_size(data)?;
        for (px, &v) in self.pixels.iter_mut().zip(data.iter()) {
            *px = channel.inject(*px, unit_to_channel(v as f64));
        }
        Ok(())
    }

    /// Double-precision variant of [`set_channel_f32`](Self::set_channel_f32).
    pub fn set_channel_f64(&mut self, channel: Channel, data: &Grid<f64>) -> Result<()> {
        self.pixels.ensure_same_size(data)?;
        for (px, &v) in self.pixels.iter_mut().zip(data.iter()) {
            *px = channel.inject(*px, unit_to_channel(v));
        }
        Ok(())
    }

    /// Sets one channel to `value` on every pixel.
    pub fn fill_channel(&mut self, channel: Channel, value: u8) {
        for px in self.pixels.iter_mut() {
            *px = channel.inject(*px, value);
        }
    }

    /// Fills every pixel with a packed color.
    pub fn reset(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    /// Fills every pixel with opaque white.
    pub fn reset_white(&mut self) {
        self.reset(OPAQUE_WHITE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn sample() -> PackedImage {
        PackedImage::from_data(
            3,
            2,
            vec![
                0xFF10_2030, 0x8040_5060, 0x0070_8090,
                0xFFA0_B0C0, 0x7FD0_E0F0, 0x0102_0304,
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_new_is_opaque_white() {
        let img = PackedImage::new(5, 3);
        assert_eq!(img.dimensions(), (5, 3));
        assert!(img.data().iter().all(|&p| p == 0xFFFF_FFFF));
    }

    #[test]
    fn test_channel_extraction() {
        let img = sample();
        let red = img.channel(Channel::Red);
        assert_eq!(red.row(0), &[0x10, 0x40, 0x70]);
        let alpha = img.channel(Channel::Alpha);
        assert_eq!(alpha.row(1), &[0xFF, 0x7F, 0x01]);
        let blue = img.channel_f32(Channel::Blue);
        approx::assert_relative_eq!(blue.get(2, 1), 4.0 / 255.0);
    }

    #[test]
    fn test_set_channel_roundtrip() {
        let img = sample();
        for channel in Channel::ALL {
            let mut copy = img.clone();
            copy.set_channel(channel, &img.channel(channel)).unwrap();
            assert_eq!(copy, img);

            let mut copy = img.clone();
            copy.set_channel_f32(channel, &img.channel_f32(channel)).unwrap();
            assert_eq!(copy, img);

            let mut copy = img.clone();
            copy.set_channel_f64(channel, &img.channel_f64(channel)).unwrap();
            assert_eq!(copy, img);
        }
    }

    #[test]
    fn test_set_channel_f32_clamps() {
        let mut img = PackedImage::filled(2, 1, 0x8040_4040);
        let data = Grid::from_rows(&[[3.0f32, -1.0]]).unwrap();
        img.set_channel_f32(Channel::Green, &data).unwrap();
        assert_eq!(img.pixel(0, 0), 0x8040_FF40);
        assert_eq!(img.pixel(1, 0), 0x8040_0040);
    }

    #[test]
    fn test_set_channel_rejects_wrong_size() {
        let mut img = sample();
        let before = img.clone();
        let err = img.set_channel(Channel::Red, &Grid::new(2, 2, 0)).unwrap_err();
        assert_eq!(err, Error::dimension_mismatch((3, 2), (2, 2)));
        assert_eq!(img, before);
    }

    #[test]
    fn test_fill_and_reset() {
        let mut img = sample();
        img.fill_channel(Channel::Alpha, 0);
        assert!(img.channel(Channel::Alpha).iter().all(|&a| a == 0));
        assert_eq!(img.rgba(0, 0), Rgba::new(0x10, 0x20, 0x30, 0));

        img.reset(0x0102_0304);
        assert!(img.data().iter().all(|&p| p == 0x0102_0304));
        img.reset_white();
        assert!(img.data().iter().all(|&p| p == OPAQUE_WHITE));
    }
}
