//! CLI command implementations

pub mod blend;
pub mod blur;
pub mod color;
pub mod convolve;
pub mod key;
pub mod normalize;
pub mod sharpen;

use anyhow::{Context, Result};
use pixtools_core::PackedImage;
use pixtools_io::ImageFormat;
use std::path::Path;

/// Load image from path
pub fn load_image(path: &Path) -> Result<PackedImage> {
    pixtools_io::read(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save image to path, picking the format from the extension
pub fn save_image(path: &Path, image: &PackedImage) -> Result<()> {
    let format = output_format(path)?;
    pixtools_io::write(path, image, format)
        .with_context(|| format!("Failed to save: {}", path.display()))
}

/// Format for an output path
pub fn output_format(path: &Path) -> Result<ImageFormat> {
    ImageFormat::from_extension(path).with_context(|| {
        format!(
            "Cannot tell output format from '{}' (use .png, .jpg or .jpeg)",
            path.display()
        )
    })
}
