//! Sharpen command (unsharp mask)

use crate::SharpenArgs;
use anyhow::Result;
use pixtools_core::ChannelPlanes;
use pixtools_ops::filter::unsharp_mask;

pub fn run(args: SharpenArgs, verbose: bool) -> Result<()> {
    let image = super::load_image(&args.input)?;

    if verbose {
        println!(
            "Sharpening {} (radius={}, sigma={:.2}, amount={:.2})",
            args.input.display(),
            args.radius,
            args.sigma,
            args.amount
        );
    }

    let planes = ChannelPlanes::from_packed(&image);
    let sharpened = unsharp_mask(&planes, args.radius, args.sigma, args.amount)?;

    let mut output = image;
    sharpened.write_into(&mut output)?;

    super::save_image(&args.output, &output)?;

    if verbose {
        println!("Done.");
    }

    Ok(())
}
