//! Grayscale, black-and-white and invert commands

use crate::{BwArgs, IoArgs};
use anyhow::Result;
use pixtools_core::ChannelPlanes;
use pixtools_ops::{algebra, packed};

pub fn run_grayscale(args: IoArgs, verbose: bool) -> Result<()> {
    let image = super::load_image(&args.input)?;
    if verbose {
        println!("Converting {} to grayscale", args.input.display());
    }
    super::save_image(&args.output, &packed::to_grayscale(&image))
}

pub fn run_bw(args: BwArgs, verbose: bool) -> Result<()> {
    let image = super::load_image(&args.input)?;
    if verbose {
        println!(
            "Converting {} to black and white (threshold={:.3})",
            args.input.display(),
            args.threshold
        );
    }
    let planes = ChannelPlanes::from_packed(&image);
    let bw = algebra::to_black_and_white(&planes, args.threshold);
    super::save_image(&args.output, &bw.to_packed())
}

pub fn run_invert(args: IoArgs, verbose: bool) -> Result<()> {
    let image = super::load_image(&args.input)?;
    if verbose {
        println!("Inverting {}", args.input.display());
    }
    super::save_image(&args.output, &packed::invert_colors(&image))
}
