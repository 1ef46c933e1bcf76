//! Normalize command

use crate::NormalizeArgs;
use anyhow::{Result, bail};
use pixtools_core::{Channel, ChannelPlanes};

pub fn run(args: NormalizeArgs, verbose: bool) -> Result<()> {
    let image = super::load_image(&args.input)?;
    let mut planes = ChannelPlanes::from_packed(&image);

    match args.channel.as_deref() {
        Some(name) => {
            let channel = parse_channel(name)?;
            if verbose {
                println!("Normalizing {} channel of {}", channel, args.input.display());
            }
            planes.normalize_channel(channel)?;
        }
        None => {
            if verbose {
                println!("Normalizing {}", args.input.display());
            }
            planes.normalize();
        }
    }

    let mut output = image;
    planes.write_into(&mut output)?;
    super::save_image(&args.output, &output)
}

fn parse_channel(name: &str) -> Result<Channel> {
    Ok(match name.to_ascii_lowercase().as_str() {
        "r" | "red" => Channel::Red,
        "g" | "green" => Channel::Green,
        "b" | "blue" => Channel::Blue,
        other => bail!("Unknown color channel '{}' (use red, green or blue)", other),
    })
}
