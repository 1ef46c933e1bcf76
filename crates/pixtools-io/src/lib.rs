//! # pixtools-io
//!
//! Getting pixels in and out of [`PackedImage`].
//!
//! - [`codec`] - interleaved byte buffers (`BGR`, `ABGR`, `RGB`, `RGBA`)
//!   to and from packed images
//! - [`read`] / [`write`] - PNG and JPEG files, with typed errors
//! - [`load`] / [`store`] - the same, but failures are logged and reported
//!   as `None` / `false` instead of returned
//!
//! # Example
//!
//! ```rust,ignore
//! use pixtools_io::{read, write, ImageFormat};
//!
//! let image = read("input.jpg")?;
//! write("output.png", &image, ImageFormat::Png)?;
//! ```
//!
//! # Feature Flags
//!
//! - `png` (default) - PNG via the `png` crate
//! - `jpeg` (default) - JPEG via `jpeg-decoder` / `jpeg-encoder`

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod codec;
pub mod format;
#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "png")]
pub mod png;

pub use codec::PixelLayout;
pub use error::{IoError, IoResult};
pub use format::ImageFormat;

use pixtools_core::PackedImage;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::{debug, error};

/// Reads a PNG or JPEG file.
///
/// The format is detected from the file's magic bytes, falling back to
/// the extension.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<PackedImage> {
    let path = path.as_ref();
    let mut reader = BufReader::new(File::open(path)?);

    let mut header = Vec::with_capacity(8);
    reader.by_ref().take(8).read_to_end(&mut header)?;
    reader.seek(SeekFrom::Start(0))?;

    let format = ImageFormat::from_bytes(&header)
        .or_else(|| ImageFormat::from_extension(path))
        .ok_or_else(|| IoError::UnsupportedFormat(path.display().to_string()))?;
    debug!(path = %path.display(), %format, "read");

    match format {
        #[cfg(feature = "png")]
        ImageFormat::Png => png::read_png(reader),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::read_jpeg(reader),
        #[allow(unreachable_patterns)]
        other => Err(IoError::UnsupportedFormat(format!("{} support not enabled", other))),
    }
}

/// Writes an image file in the given format.
///
/// JPEG output drops alpha.
pub fn write<P: AsRef<Path>>(path: P, image: &PackedImage, format: ImageFormat) -> IoResult<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), %format, "write");

    match format {
        #[cfg(feature = "png")]
        ImageFormat::Png => png::write_png(BufWriter::new(File::create(path)?), image),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::write_jpeg(
            BufWriter::new(File::create(path)?),
            image,
            jpeg::DEFAULT_QUALITY,
        ),
        #[allow(unreachable_patterns)]
        other => Err(IoError::UnsupportedFormat(format!("{} support not enabled", other))),
    }
}

/// Reads an image, logging and swallowing any failure.
pub fn load<P: AsRef<Path>>(path: P) -> Option<PackedImage> {
    let path = path.as_ref();
    match read(path) {
        Ok(image) => Some(image),
        Err(e) => {
            error!(path = %path.display(), "failed to read image: {}", e);
            None
        }
    }
}

/// Writes an image, logging any failure. Returns `true` on success.
pub fn store<P: AsRef<Path>>(path: P, image: &PackedImage, format: ImageFormat) -> bool {
    let path = path.as_ref();
    match write(path, image, format) {
        Ok(()) => true,
        Err(e) => {
            error!(path = %path.display(), %format, "failed to write image: {}", e);
            false
        }
    }
}
