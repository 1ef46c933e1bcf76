//! Color key command

use crate::KeyArgs;
use anyhow::{Context, Result, bail};
use pixtools_core::Rgba;
use pixtools_io::ImageFormat;
use pixtools_ops::packed::key_color_transparent;
use tracing::warn;

pub fn run(args: KeyArgs, verbose: bool) -> Result<()> {
    let key = parse_color(&args.color)?;
    let mut image = super::load_image(&args.input)?;

    if super::output_format(&args.output)? == ImageFormat::Jpeg {
        warn!(output = %args.output.display(), "JPEG output cannot store transparency");
    }

    let keyed = key_color_transparent(&mut image, key, args.threshold);

    if verbose {
        println!(
            "Keyed {} of {} pixels within {:.1} of ({}, {}, {})",
            keyed,
            image.width() * image.height(),
            args.threshold,
            key.r,
            key.g,
            key.b
        );
    }

    super::save_image(&args.output, &image)
}

/// Parses `"r,g,b"` or `"#rrggbb"`.
fn parse_color(s: &str) -> Result<Rgba> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 {
            bail!("Expected #rrggbb, got '{}'", s);
        }
        let v = u32::from_str_radix(hex, 16).with_context(|| format!("Invalid hex color '{}'", s))?;
        return Ok(Rgba::from_packed(0xFF00_0000 | v));
    }

    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        bail!("Expected r,g,b, got '{}'", s);
    }
    let mut rgb = [0u8; 3];
    for (dst, part) in rgb.iter_mut().zip(&parts) {
        *dst = part
            .parse()
            .with_context(|| format!("Invalid color component '{}'", part))?;
    }
    Ok(Rgba::rgb(rgb[0], rgb[1], rgb[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("255, 0, 10").unwrap(), Rgba::rgb(255, 0, 10));
        assert_eq!(parse_color("#00ff80").unwrap(), Rgba::rgb(0, 255, 128));
        assert!(parse_color("1,2").is_err());
        assert!(parse_color("1,2,300").is_err());
        assert!(parse_color("#fff").is_err());
        assert!(parse_color("#gg0000").is_err());
    }
}
