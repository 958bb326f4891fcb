//! fx - effect graph command line tool
//!
//! Inspects split-tone lookups and hue colors, renders synthetic images
//! through CPU workers and initializes shader workers against an in-memory
//! host.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::EffectName;

#[derive(Parser)]
#[command(name = "fx")]
#[command(author, version, about = "Effect graph tool: lookups, hues, CPU renders, shaders")]
#[command(long_about = "
Drives the effect nodes without a GPU or image files.

Examples:
  fx lut --shadows-hue 200 --shadows-saturation 60
  fx lut --params '{highlights_hue: 30, shadows_saturation: 100}' --format yaml
  fx hue --step 30
  fx render -e grayscale -W 640 -H 480 --tile-rows 32 --parallel
  fx shader -e magnify-smooth --params '{magnification_amount: 3.0}'
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a generated split-tone lookup table
    Lut(LutArgs),

    /// Print pure hue colors
    Hue(HueArgs),

    /// Render a synthetic gradient through an effect on the CPU
    #[command(visible_alias = "r")]
    Render(RenderArgs),

    /// Initialize an effect's shader worker and print what the host receives
    Shader(ShaderArgs),
}

/// Output format for tables.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Yaml,
}

/// Arguments for the `lut` command.
#[derive(Args)]
struct LutArgs {
    /// Highlights hue in degrees
    #[arg(long)]
    highlights_hue: Option<i32>,

    /// Highlights saturation, 0..=100
    #[arg(long)]
    highlights_saturation: Option<i32>,

    /// Shadows hue in degrees
    #[arg(long)]
    shadows_hue: Option<i32>,

    /// Shadows saturation, 0..=100
    #[arg(long)]
    shadows_saturation: Option<i32>,

    /// Inline YAML parameters; flags override them
    #[arg(short, long)]
    params: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print every n-th entry only
    #[arg(long, default_value = "1")]
    step: usize,
}

/// Arguments for the `hue` command.
#[derive(Args)]
struct HueArgs {
    /// First hue
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    start: i32,

    /// Last hue (exclusive)
    #[arg(long, default_value = "360", allow_hyphen_values = true)]
    end: i32,

    /// Step in degrees
    #[arg(long, default_value = "15")]
    step: u32,
}

/// Arguments for the `render` command.
#[derive(Args)]
struct RenderArgs {
    /// Effect to render
    #[arg(short, long, value_enum, default_value_t = EffectName::Grayscale)]
    effect: EffectName,

    /// Image width
    #[arg(short = 'W', long, default_value = "256")]
    width: u32,

    /// Image height
    #[arg(short = 'H', long, default_value = "256")]
    height: u32,

    /// Process in tiles of this many rows
    #[arg(short, long)]
    tile_rows: Option<u32>,

    /// Process tiles on the thread pool
    #[arg(long)]
    parallel: bool,

    /// Inline YAML properties
    #[arg(short, long)]
    params: Option<String>,
}

/// Arguments for the `shader` command.
#[derive(Args)]
struct ShaderArgs {
    /// Effect whose shader worker to initialize
    #[arg(short, long, value_enum)]
    effect: EffectName,

    /// Inline YAML properties
    #[arg(short, long)]
    params: Option<String>,

    /// Print the WGSL source
    #[arg(long)]
    source: bool,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("FX_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Lut(args) => commands::lut::run(args),
        Commands::Hue(args) => commands::hue::run(args),
        Commands::Render(args) => commands::render::run(args, cli.verbose),
        Commands::Shader(args) => commands::shader::run(args),
    }
}
