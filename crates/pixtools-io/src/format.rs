//! File format identification.

use std::fmt;
use std::path::Path;

/// A persisted raster format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// Lossy JPEG; no alpha.
    Jpeg,
    /// Lossless PNG.
    Png,
}

impl ImageFormat {
    /// Short format name (`"jpg"` or `"png"`).
    pub const fn name(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
        }
    }

    /// File extensions recognised for this format.
    pub const fn extensions(self) -> &'static [&'static str] {
        match self {
            ImageFormat::Jpeg => &["jpg", "jpeg"],
            ImageFormat::Png => &["png"],
        }
    }

    /// Looks up a format by name or extension, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        [ImageFormat::Jpeg, ImageFormat::Png]
            .into_iter()
            .find(|f| f.extensions().contains(&name.as_str()))
    }

    /// Detects the format from a path's extension.
    pub fn from_extension<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_name)
    }

    /// Detects the format from the leading magic bytes of a file.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(ImageFormat::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageFormat::Jpeg)
        } else {
            None
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(ImageFormat::Jpeg.name(), "jpg");
        assert_eq!(ImageFormat::Png.to_string(), "png");
        assert_eq!(ImageFormat::from_name("JPEG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_name("tif"), None);
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(ImageFormat::from_extension("a/b/photo.JPG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("x.png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_extension("noext"), None);
    }

    #[test]
    fn test_from_bytes() {
        assert_eq!(
            ImageFormat::from_bytes(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0]),
            Some(ImageFormat::Png)
        );
        assert_eq!(ImageFormat::from_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_bytes(&[0xFF, 0xD8]), None);
    }
}
