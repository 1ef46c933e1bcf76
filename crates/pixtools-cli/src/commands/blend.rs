//! Blend command

use crate::BlendArgs;
use anyhow::{Result, bail};
use pixtools_core::{ChannelPlanes, Grid};
use pixtools_ops::algebra;

pub fn run(args: BlendArgs, verbose: bool) -> Result<()> {
    let first = super::load_image(&args.first)?;
    let second = super::load_image(&args.second)?;

    if first.dimensions() != second.dimensions() {
        bail!(
            "Image sizes differ: {}x{} vs {}x{}",
            first.width(),
            first.height(),
            second.width(),
            second.height()
        );
    }

    let proportion = match &args.mask {
        Some(path) => {
            let mask = ChannelPlanes::from_packed(&super::load_image(path)?);
            let gray = algebra::to_grayscale(&mask);
            gray.planes()[0].clone()
        }
        None => Grid::new(first.width(), first.height(), args.weight),
    };

    if verbose {
        match &args.mask {
            Some(path) => println!("Blending with mask {}", path.display()),
            None => println!("Blending with weight {:.3}", args.weight),
        }
    }

    let a = ChannelPlanes::from_packed(&first);
    let b = ChannelPlanes::from_packed(&second);
    let blended = algebra::blend(&a, &b, &proportion)?;

    let mut output = first;
    blended.write_into(&mut output)?;
    super::save_image(&args.output, &output)
}
