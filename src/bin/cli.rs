//! postfeed CLI
//!
//! Lists blog posts from whichever content origin is reachable.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use postfeed::{
    error::Result,
    models::Config,
    pipeline::{self, ListOptions},
    services::ContentService,
};

/// postfeed - multi-source blog content loader
#[derive(Parser, Debug)]
#[command(name = "postfeed", version, about = "Multi-source blog content loader")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "postfeed.toml", global = true)]
    config: PathBuf,

    /// Override the cache directory from the configuration
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List published posts, newest first
    List {
        /// Only show posts matching this text
        #[arg(short, long)]
        search: Option<String>,

        /// Page number
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Print matching posts as JSON
        #[arg(long)]
        json: bool,
    },

    /// Forget the preferred source and reload
    Retry,

    /// Probe every content source
    Sources,

    /// Print the body of a post
    Show {
        /// Post id
        id: String,
    },

    /// Show cache and preferred source status
    Info,

    /// Validate the configuration file
    Validate,
}

/// Initialize logging from the configured level, or debug when verbose.
fn init_logging(level: &str, verbose: bool) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = if cli.config.exists() {
        Config::load_or_default(&cli.config)
    } else {
        Config::default()
    };
    init_logging(&config.logging.level, cli.verbose);

    if let Some(dir) = cli.store_dir {
        config.cache.store_dir = dir;
    }

    match cli.command {
        Command::List { search, page, json } => {
            let options = ListOptions { search, page, json };
            pipeline::run_load(&build_service(&config)?, &options).await
        }
        Command::Retry => {
            let options = ListOptions {
                page: 1,
                ..ListOptions::default()
            };
            pipeline::run_retry(&build_service(&config)?, &options).await
        }
        Command::Sources => pipeline::run_sources(&build_service(&config)?).await,
        Command::Show { id } => pipeline::run_show(&build_service(&config)?, &id).await,
        Command::Info => {
            pipeline::run_info(&build_service(&config)?, &config.cache.store_dir).await
        }
        Command::Validate => pipeline::run_validate(&cli.config),
    }
}

fn build_service(config: &Config) -> Result<ContentService> {
    config.validate()?;
    log::debug!(
        "Using origin {} with {} sources",
        config.client.origin,
        config.sources.len()
    );
    ContentService::from_config(config)
}
