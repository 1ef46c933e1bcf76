//! PNG reading and writing.
//!
//! Palette, low-bit and 16-bit files are normalized to 8 bits per channel
//! on read; grayscale is expanded to RGB. Images are written as 8-bit RGB,
//! or RGBA when any pixel is not fully opaque.

use crate::codec::{self, PixelLayout};
use crate::{IoError, IoResult};
use pixtools_core::{Channel, PackedImage};
use std::io::{BufRead, Seek, Write};
use tracing::debug;

/// Decodes a PNG stream.
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<PackedImage> {
    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;
    let bytes = &buf[..info.buffer_size()];
    let (width, height) = (info.width as usize, info.height as usize);
    debug!(width, height, color = ?info.color_type, "read_png");

    match (info.color_type, info.bit_depth) {
        (png::ColorType::Rgb, png::BitDepth::Eight) => {
            codec::decode(bytes, width, height, PixelLayout::Rgb)
        }
        (png::ColorType::Rgba, png::BitDepth::Eight) => {
            codec::decode(bytes, width, height, PixelLayout::Rgba)
        }
        (png::ColorType::Grayscale, png::BitDepth::Eight) => {
            codec::decode(&codec::gray_to_rgb(bytes), width, height, PixelLayout::Rgb)
        }
        (png::ColorType::GrayscaleAlpha, png::BitDepth::Eight) => {
            codec::decode(&codec::gray_alpha_to_rgba(bytes), width, height, PixelLayout::Rgba)
        }
        (color_type, bit_depth) => Err(IoError::DecodeError(format!(
            "unsupported PNG pixel format {:?} {:?}",
            color_type, bit_depth
        ))),
    }
}

/// Encodes an image as PNG.
pub fn write_png<W: Write>(writer: W, image: &PackedImage) -> IoResult<()> {
    let (width, height) = dimensions_u32(image)?;
    let opaque = image.data().iter().all(|&px| Channel::Alpha.extract(px) == 255);
    let (color_type, layout) = if opaque {
        (png::ColorType::Rgb, PixelLayout::Rgb)
    } else {
        (png::ColorType::Rgba, PixelLayout::Rgba)
    };
    debug!(width, height, ?layout, "write_png");

    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(color_type);
    encoder.set_depth(png::BitDepth::Eight);

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .write_image_data(&codec::encode(image, layout)?)
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .finish()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    Ok(())
}

fn dimensions_u32(image: &PackedImage) -> IoResult<(u32, u32)> {
    let (w, h) = image.dimensions();
    match (u32::try_from(w), u32::try_from(h)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok((w, h)),
        _ => Err(IoError::EncodeError(format!(
            "cannot encode a {}x{} image as PNG",
            w, h
        ))),
    }
}
