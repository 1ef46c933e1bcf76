//! JPEG reading and writing.
//!
//! JPEG has no alpha: decoded images are opaque and alpha is dropped on
//! write. Grayscale, 16-bit grayscale and CMYK files are converted to RGB.

use crate::codec::{self, PixelLayout};
use crate::{IoError, IoResult};
use pixtools_core::PackedImage;
use std::io::{BufReader, Read, Write};
use tracing::debug;

/// Encoder quality used by [`write_jpeg`].
pub const DEFAULT_QUALITY: u8 = 90;

/// Decodes a JPEG stream.
pub fn read_jpeg<R: Read>(reader: R) -> IoResult<PackedImage> {
    let mut decoder = jpeg_decoder::Decoder::new(BufReader::new(reader));
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(e.to_string()))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("missing JPEG info".into()))?;
    let (width, height) = (info.width as usize, info.height as usize);
    debug!(width, height, format = ?info.pixel_format, "read_jpeg");

    let rgb = match info.pixel_format {
        jpeg_decoder::PixelFormat::RGB24 => pixels,
        jpeg_decoder::PixelFormat::L8 => codec::gray_to_rgb(&pixels),
        jpeg_decoder::PixelFormat::L16 => {
            // keep the high byte
            let high: Vec<u8> = pixels.chunks_exact(2).map(|p| p[0]).collect();
            codec::gray_to_rgb(&high)
        }
        jpeg_decoder::PixelFormat::CMYK32 => pixels
            .chunks_exact(4)
            .flat_map(|cmyk| {
                let k = 1.0 - cmyk[3] as f32 / 255.0;
                [0, 1, 2].map(|i| ((1.0 - cmyk[i] as f32 / 255.0) * k * 255.0).round() as u8)
            })
            .collect(),
    };
    codec::decode(&rgb, width, height, PixelLayout::Rgb)
}

/// Encodes an image as JPEG at the given quality (1-100).
pub fn write_jpeg<W: Write>(mut writer: W, image: &PackedImage, quality: u8) -> IoResult<()> {
    let (w, h) = image.dimensions();
    let (width, height) = match (u16::try_from(w), u16::try_from(h)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
        _ => {
            return Err(IoError::EncodeError(format!(
                "cannot encode a {}x{} image as JPEG",
                w, h
            )));
        }
    };
    debug!(width, height, quality, "write_jpeg");

    let rgb = codec::encode(image, PixelLayout::Rgb)?;
    let mut buffer = Vec::new();
    let encoder = jpeg_encoder::Encoder::new(&mut buffer, quality.clamp(1, 100));
    encoder
        .encode(&rgb, width, height, jpeg_encoder::ColorType::Rgb)
        .map_err(|e: jpeg_encoder::EncodingError| IoError::EncodeError(e.to_string()))?;
    writer.write_all(&buffer)?;
    Ok(())
}
