//! Pixel-codec boundary: interleaved byte buffers to and from [`PackedImage`].
//!
//! Buffers are row-major with no row padding. The layout names list the
//! bytes of one pixel in memory order:
//!
//! | layout  | bytes          | decode                 | encode |
//! |---------|----------------|------------------------|--------|
//! | `Bgr`   | b, g, r        | alpha set to 255       | yes    |
//! | `Abgr`  | a, b, g, r     | alpha from the buffer  | no     |
//! | `Rgb`   | r, g, b        | alpha set to 255       | yes    |
//! | `Rgba`  | r, g, b, a     | alpha from the buffer  | yes    |
//!
//! `Bgr` and `Abgr` are the platform bitmap orders. Encoding to `Bgr`
//! drops alpha, and `Abgr` cannot be encoded at all; `Rgba` is the only
//! encode layout that keeps alpha.
//!
//! # Example
//!
//! ```rust
//! use pixtools_io::codec::{decode, encode, PixelLayout};
//!
//! let bytes = [0x30, 0x20, 0x10, 0x60, 0x50, 0x40];
//! let img = decode(&bytes, 2, 1, PixelLayout::Bgr).unwrap();
//! assert_eq!(img.pixel(0, 0), 0xFF10_2030);
//! assert_eq!(encode(&img, PixelLayout::Bgr).unwrap(), bytes);
//! ```

use crate::{IoError, IoResult};
use pixtools_core::{PackedImage, Rgba};
use tracing::trace;

/// Byte order of one interleaved pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    /// Blue, green, red.
    Bgr,
    /// Alpha, blue, green, red.
    Abgr,
    /// Red, green, blue.
    Rgb,
    /// Red, green, blue, alpha.
    Rgba,
}

impl PixelLayout {
    /// Bytes per pixel.
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelLayout::Bgr | PixelLayout::Rgb => 3,
            PixelLayout::Abgr | PixelLayout::Rgba => 4,
        }
    }

    /// Returns `true` if the layout stores alpha.
    pub const fn has_alpha(self) -> bool {
        self.bytes_per_pixel() == 4
    }

    fn unpack(self, px: &[u8]) -> Rgba {
        match self {
            PixelLayout::Bgr => Rgba::rgb(px[2], px[1], px[0]),
            PixelLayout::Abgr => Rgba::new(px[3], px[2], px[1], px[0]),
            PixelLayout::Rgb => Rgba::rgb(px[0], px[1], px[2]),
            PixelLayout::Rgba => Rgba::new(px[0], px[1], px[2], px[3]),
        }
    }
}

/// Builds a packed image from an interleaved byte buffer.
///
/// # Errors
///
/// [`IoError::BufferSize`] if `bytes.len()` is not
/// `width * height * layout.bytes_per_pixel()`.
pub fn decode(bytes: &[u8], width: usize, height: usize, layout: PixelLayout) -> IoResult<PackedImage> {
    trace!(width, height, ?layout, "codec::decode");
    let bpp = layout.bytes_per_pixel();
    let expected = width * height * bpp;
    if bytes.len() != expected {
        return Err(IoError::BufferSize {
            expected,
            actual: bytes.len(),
        });
    }
    let data = bytes
        .chunks_exact(bpp)
        .map(|px| layout.unpack(px).to_packed())
        .collect();
    Ok(PackedImage::from_data(width, height, data)?)
}

/// Serializes a packed image into an interleaved byte buffer.
///
/// # Errors
///
/// [`IoError::UnsupportedLayout`] for [`PixelLayout::Abgr`].
pub fn encode(image: &PackedImage, layout: PixelLayout) -> IoResult<Vec<u8>> {
    trace!(width = image.width(), height = image.height(), ?layout, "codec::encode");
    let pixels = image.data().iter().map(|&px| Rgba::from_packed(px));
    let mut out = Vec::with_capacity(image.data().len() * layout.bytes_per_pixel());
    match layout {
        PixelLayout::Bgr => pixels.for_each(|c| out.extend_from_slice(&[c.b, c.g, c.r])),
        PixelLayout::Rgb => pixels.for_each(|c| out.extend_from_slice(&[c.r, c.g, c.b])),
        PixelLayout::Rgba => pixels.for_each(|c| out.extend_from_slice(&[c.r, c.g, c.b, c.a])),
        PixelLayout::Abgr => {
            return Err(IoError::UnsupportedLayout(
                "ABGR encoding is not supported".into(),
            ));
        }
    }
    Ok(out)
}

/// Expands 8-bit gray samples to `Rgb`.
pub(crate) fn gray_to_rgb(gray: &[u8]) -> Vec<u8> {
    gray.iter().flat_map(|&g| [g, g, g]).collect()
}

/// Expands 8-bit gray+alpha samples to `Rgba`.
pub(crate) fn gray_alpha_to_rgba(ga: &[u8]) -> Vec<u8> {
    ga.chunks_exact(2).flat_map(|p| [p[0], p[0], p[0], p[1]]).collect()
}
