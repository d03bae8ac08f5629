// crates/cer-cli/src/main.rs

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;
mod io;

#[derive(Parser)]
#[command(name = "cer-cli")]
#[command(about = "CER lossless PCM / integer codec", long_about = None)]
pub struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). RUST_LOG wins when set and -v is absent.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encode raw PCM samples into a .cer container
    Encode(cmd::encode::EncodeArgs),

    /// Decode a .cer container back to raw PCM samples
    Decode(cmd::decode::DecodeArgs),

    /// Inspect a .cer container (framing, checksums, block headers)
    Inspect(cmd::inspect::InspectArgs),

    /// Analyze the press data of a .cer container (histogram, entropy, zstd scoreboard)
    Analyze(cmd::analyze::AnalyzeArgs),
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.cmd {
        Commands::Encode(args) => cmd::encode::run(args),
        Commands::Decode(args) => cmd::decode::run(args),
        Commands::Inspect(args) => cmd::inspect::run(args),
        Commands::Analyze(args) => cmd::analyze::run(args),
    }
}
