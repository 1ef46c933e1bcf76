//! Blur command

use crate::BlurArgs;
use anyhow::Result;
use pixtools_core::ChannelPlanes;
use pixtools_ops::{EdgeAwareGaussian, algebra, filter};
use tracing::info;

pub fn run(args: BlurArgs, verbose: bool) -> Result<()> {
    let image = super::load_image(&args.input)?;
    let (w, h) = image.dimensions();

    if verbose {
        println!(
            "Blurring {} ({}x{}, radius={}, sigma={:.2}{})",
            args.input.display(),
            w,
            h,
            args.radius,
            args.sigma,
            if args.edge_aware { ", edge-aware" } else { "" }
        );
    }

    let planes = ChannelPlanes::from_packed(&image);
    let blurred = if args.edge_aware {
        let gray = algebra::to_grayscale(&planes);
        let guide = &gray.planes()[0];
        let provider =
            EdgeAwareGaussian::new(guide, args.radius, args.sigma_min, args.sigma, args.levels)?;
        filter::varying_kernel_filter(&planes, &provider)?
    } else {
        filter::gaussian_blur(&planes, args.radius, args.sigma)?
    };

    let mut output = image;
    blurred.write_into(&mut output)?;
    info!(output = %args.output.display(), "blur done");

    super::save_image(&args.output, &output)?;

    if verbose {
        println!("Done.");
    }

    Ok(())
}
