//! Convolve command

use crate::{ConvolveArgs, KernelArg};
use anyhow::Result;
use pixtools_core::ChannelPlanes;
use pixtools_ops::{Kernel, OpsResult, filter};
use tracing::debug;

pub fn run(args: ConvolveArgs, verbose: bool) -> Result<()> {
    let image = super::load_image(&args.input)?;
    let kernel = build_kernel(&args)?;
    debug!(width = kernel.width(), height = kernel.height(), sum = kernel.sum(), "kernel");

    if verbose {
        println!(
            "Convolving {} with a {}x{} kernel",
            args.input.display(),
            kernel.width(),
            kernel.height()
        );
    }

    let planes = ChannelPlanes::from_packed(&image);
    let filtered = filter::kernel_filter_with(&planes, &kernel, args.edge.into())?;

    let mut output = image;
    filtered.write_into(&mut output)?;

    super::save_image(&args.output, &output)?;

    if verbose {
        println!("Done.");
    }

    Ok(())
}

fn build_kernel(args: &ConvolveArgs) -> OpsResult<Kernel> {
    Ok(match args.kernel {
        KernelArg::Identity => Kernel::identity(),
        KernelArg::Box => Kernel::box_blur(args.radius),
        KernelArg::Gaussian => Kernel::gaussian(args.radius, args.sigma)?,
        KernelArg::Sharpen => Kernel::sharpen(args.amount),
        KernelArg::Edges => Kernel::edge_detect(),
    })
}
