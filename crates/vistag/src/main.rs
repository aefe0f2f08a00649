//! vistag CLI - batch image captioning and weighted tag aggregation.
//!
//! Sends every image in a directory to a vision LLM, either for a free-text
//! caption or for category-weighted tags that are aggregated across the
//! whole corpus.
//!
//! # Usage
//!
//! ```bash
//! # Caption everything in ./images into ./captions
//! vistag caption
//!
//! # Tag a different directory with a local model
//! vistag tag --input ./pins --llm ollama
//!
//! # View configuration
//! vistag config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;

/// vistag - batch image captioning and weighted tag aggregation.
#[derive(Parser, Debug)]
#[command(name = "vistag")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "VISTAG_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a free-text caption for every image
    Caption(cli::RunArgs),

    /// Tag every image and aggregate the tags across the corpus
    Tag(cli::RunArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Credentials usually live in a local .env file.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match &cli.config {
        Some(path) => vistag_core::Config::load_from(path)?,
        None => match vistag_core::Config::load() {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Warning: Failed to load config: {e}\n  \
                     Using default configuration. Check your config file with `vistag config path`."
                );
                vistag_core::Config::default()
            }
        },
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("vistag v{}", vistag_core::VERSION);

    match cli.command {
        Commands::Caption(args) => cli::caption::execute(args, config).await,
        Commands::Tag(args) => cli::tag::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, config, cli.config).await,
    }
}
