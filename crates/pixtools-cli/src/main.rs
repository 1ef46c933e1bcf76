//! pixtools - pixel-level image filters from the command line

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pixtools_ops::EdgeMode;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "pixtools")]
#[command(author, version, about = "Pixel-level image filters")]
#[command(long_about = "
Pixel-level image filters: Gaussian blur, unsharp masking, kernel
convolution, grayscale, color keying and blending.

The output format is chosen from the output file extension (.png, .jpg).

Examples:
  pixtools blur in.png -o out.png -r 3 -s 1.5
  pixtools blur in.png -o out.png --edge-aware
  pixtools sharpen in.jpg -o out.jpg -a 0.8
  pixtools convolve in.png -o edges.png -k edges --edge zero
  pixtools bw in.png -o bw.png -t 0.4
  pixtools key in.png -o keyed.png --color 0,255,0 -t 40
  pixtools blend a.png b.png -o mix.png --mask mask.png
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Gaussian blur
    Blur(BlurArgs),

    /// Unsharp mask
    Sharpen(SharpenArgs),

    /// Convolve with a preset kernel
    Convolve(ConvolveArgs),

    /// Convert to grayscale (BT.601 luma)
    #[command(visible_alias = "gray")]
    Grayscale(IoArgs),

    /// Convert to black and white
    Bw(BwArgs),

    /// Invert colors, keeping alpha
    Invert(IoArgs),

    /// Make pixels close to a key color transparent
    Key(KeyArgs),

    /// Blend two images with a constant weight or a mask
    Blend(BlendArgs),

    /// Shift by the minimum and scale by the maximum
    Normalize(NormalizeArgs),
}

#[derive(Args)]
struct IoArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args)]
struct BlurArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Kernel radius in pixels
    #[arg(short, long, default_value = "2")]
    radius: usize,

    /// Gaussian sigma (maximum sigma with --edge-aware)
    #[arg(short, long, default_value = "1.0")]
    sigma: f64,

    /// Blur less across edges of the input's luma
    #[arg(long)]
    edge_aware: bool,

    /// Sigma used on the strongest edges with --edge-aware
    #[arg(long, default_value = "0.3")]
    sigma_min: f64,

    /// Number of precomputed sigma levels with --edge-aware
    #[arg(long, default_value = "8")]
    levels: u16,
}

#[derive(Args)]
struct SharpenArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Blur radius in pixels
    #[arg(short, long, default_value = "2")]
    radius: usize,

    /// Blur sigma
    #[arg(short, long, default_value = "1.0")]
    sigma: f64,

    /// Mask coefficient
    #[arg(short, long, default_value = "1.0")]
    amount: f64,
}

#[derive(Clone, Copy, ValueEnum)]
enum KernelArg {
    /// 1x1 pass-through
    Identity,
    /// Averaging box of the given radius
    Box,
    /// Normalized Gaussian of the given radius and sigma
    Gaussian,
    /// 3x3 Laplacian sharpen with the given amount
    Sharpen,
    /// 3x3 Laplacian edge detector
    Edges,
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum EdgeArg {
    /// Extend the nearest edge pixel
    #[default]
    Clamp,
    /// Treat outside pixels as zero
    Zero,
    /// Reflect at the border
    Mirror,
    /// Tile periodically
    Wrap,
}

impl From<EdgeArg> for EdgeMode {
    fn from(arg: EdgeArg) -> Self {
        match arg {
            EdgeArg::Clamp => EdgeMode::Clamp,
            EdgeArg::Zero => EdgeMode::Zero,
            EdgeArg::Mirror => EdgeMode::Mirror,
            EdgeArg::Wrap => EdgeMode::Wrap,
        }
    }
}

#[derive(Args)]
struct ConvolveArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Kernel preset
    #[arg(short, long, value_enum, default_value = "box")]
    kernel: KernelArg,

    /// Kernel radius (box, gaussian)
    #[arg(short, long, default_value = "1")]
    radius: usize,

    /// Gaussian sigma
    #[arg(short, long, default_value = "1.0")]
    sigma: f64,

    /// Sharpen amount
    #[arg(short, long, default_value = "1.0")]
    amount: f64,

    /// Border handling
    #[arg(short, long, value_enum, default_value = "clamp")]
    edge: EdgeArg,
}

#[derive(Args)]
struct BwArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Luma threshold in [0, 1]; pixels strictly above become white
    #[arg(short, long, default_value = "0.5")]
    threshold: f64,
}

#[derive(Args)]
struct KeyArgs {
    /// Input image
    input: PathBuf,

    /// Output image (use .png to keep transparency)
    #[arg(short, long)]
    output: PathBuf,

    /// Key color as "r,g,b" or "#rrggbb"
    #[arg(short, long)]
    color: String,

    /// Maximum RGB distance (0-255 scale) that is keyed out
    #[arg(short, long, default_value = "10.0")]
    threshold: f64,
}

#[derive(Args)]
struct BlendArgs {
    /// First image
    first: PathBuf,

    /// Second image
    second: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Constant weight of the first image
    #[arg(short, long, default_value = "0.5", conflicts_with = "mask")]
    weight: f64,

    /// Per-pixel weight of the first image, taken from this image's luma
    #[arg(short, long)]
    mask: Option<PathBuf>,
}

#[derive(Args)]
struct NormalizeArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Normalize only this channel (red, green, blue)
    #[arg(short, long)]
    channel: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Blur(args) => commands::blur::run(args, cli.verbose),
        Commands::Sharpen(args) => commands::sharpen::run(args, cli.verbose),
        Commands::Convolve(args) => commands::convolve::run(args, cli.verbose),
        Commands::Grayscale(args) => commands::color::run_grayscale(args, cli.verbose),
        Commands::Bw(args) => commands::color::run_bw(args, cli.verbose),
        Commands::Invert(args) => commands::color::run_invert(args, cli.verbose),
        Commands::Key(args) => commands::key::run(args, cli.verbose),
        Commands::Blend(args) => commands::blend::run(args, cli.verbose),
        Commands::Normalize(args) => commands::normalize::run(args, cli.verbose),
    }
}
