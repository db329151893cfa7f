use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod host;

#[derive(Parser)]
#[command(name = "imagepick")]
#[command(about = "Pick an image into a scratch working copy")]
#[command(version)]
struct Cli {
    /// JSON picker config (defaults apply to missing keys)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Scratch root override (an `<app>/images` folder is created inside)
    #[arg(short, long, global = true)]
    scratch: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the native file dialog and copy the chosen image to scratch
    Pick,

    /// Print the EXIF orientation of an image and the rotation it needs
    Orient { file: PathBuf },

    /// Run the content-provider pipeline on a local file
    Normalize { file: PathBuf },

    /// Resolve a content URI to a filesystem path
    Resolve { uri: String },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Set RUST_LOG to override, e.g. RUST_LOG=imagepick_core=debug
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let config = cli::load_config(cli.config.as_deref(), cli.scratch)?;

    match cli.command {
        Commands::Pick => cli::pick(&config),
        Commands::Orient { file } => cli::orient(&file),
        Commands::Normalize { file } => cli::normalize(&config, &file),
        Commands::Resolve { uri } => cli::resolve(&config, &uri),
    }
}
