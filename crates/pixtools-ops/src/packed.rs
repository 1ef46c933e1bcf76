//! Operations that work directly on [`PackedImage`] without a round trip
//! through floating-point planes.

use pixtools_core::{Channel, PackedImage, Rgba, channel_to_unit, luma_f32, unit_to_channel};
use tracing::{debug, trace};

/// Returns a copy with red, green and blue replaced by `255 - v`.
///
/// Alpha is kept.
pub fn invert_colors(image: &PackedImage) -> PackedImage {
    trace!(width = image.width(), height = image.height(), "invert_colors");
    // 255 - v on each color byte is an XOR with 0xFF.
    PackedImage::from_grid(image.data().map(|&px| px ^ 0x00FF_FFFF))
}

/// Returns an opaque grayscale copy using single-precision BT.601 luma.
///
/// The result starts from opaque white, so the source alpha is not
/// carried over.
pub fn to_grayscale(image: &PackedImage) -> PackedImage {
    trace!(width = image.width(), height = image.height(), "packed::to_grayscale");
    let (w, h) = image.dimensions();
    let mut out = PackedImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let px = image.pixel(x, y);
            let [r, g, b] = [Channel::Red, Channel::Green, Channel::Blue]
                .map(|c| channel_to_unit(c.extract(px)));
            let v = unit_to_channel(luma_f32(r, g, b) as f64);
            out.set_pixel(x, y, Rgba::rgb(v, v, v).to_packed());
        }
    }
    out
}

/// Makes every pixel close to `key` fully transparent, in place.
///
/// Distance is Euclidean over red, green and blue on the 0-255 scale; a
/// pixel whose distance is `<= threshold` gets alpha 0. Other pixels keep
/// their alpha. Returns the number of pixels made transparent.
pub fn key_color_transparent(image: &mut PackedImage, key: Rgba, threshold: f64) -> usize {
    let mut keyed = 0;
    let (w, h) = image.dimensions();
    for y in 0..h {
        for x in 0..w {
            let px = image.pixel(x, y);
            let c = Rgba::from_packed(px);
            let dr = c.r as f64 - key.r as f64;
            let dg = c.g as f64 - key.g as f64;
            let db = c.b as f64 - key.b as f64;
            if (dr * dr + dg * dg + db * db).sqrt() <= threshold {
                image.set_pixel(x, y, Channel::Alpha.inject(px, 0));
                keyed += 1;
            }
        }
    }
    debug!(?key, threshold, keyed, "key_color_transparent");
    keyed
}
