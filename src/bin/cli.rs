//! yml-export CLI
//!
//! Serves the feed over HTTP or renders it once to a file.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use yml_export::{
    error::Result,
    models::Config,
    pipeline::{CatalogVersioner, LinkOverrides, run_export},
    server::{self, AppState},
    source::{CatalogSource, FixtureSource, MySqlSource},
};

/// yml-export - Yandex YML feed for the dance school catalog
#[derive(Parser, Debug)]
#[command(name = "yml-export", version, about = "Dance school catalog feed")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON log lines
    #[cfg(feature = "json-log")]
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the feed over HTTP
    Serve,

    /// Render the feed once
    Render {
        /// Read rows from a JSON fixture instead of MySQL
        #[arg(long)]
        fixture: Option<PathBuf>,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Link for every pass offer
        #[arg(long)]
        pass_link: Option<String>,

        /// Link for every class offer
        #[arg(long)]
        class_link: Option<String>,
    },

    /// Validate configuration
    Validate,
}

/// Initialize logging based on verbosity and the configured level.
fn init_logging(cli: &Cli, level: &str) {
    let level = if cli.verbose { "debug" } else { level };

    #[cfg(feature = "json-log")]
    if cli.json_logs {
        use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

        tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
            .with(tracing_subscriber::fmt::layer().json())
            .init();
        return;
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging needs the configured level, so load before initializing and report afterwards.
    let loaded = Config::load(&cli.config);
    let level = loaded
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());
    init_logging(&cli, &level);

    let mut config = loaded.unwrap_or_else(|e| {
        log::warn!(
            "Config load failed from {}: {}. Using defaults.",
            cli.config.display(),
            e
        );
        Config::default()
    });
    config.apply_env();

    match cli.command {
        Command::Serve => {
            config.validate()?;
            let source = MySqlSource::connect(&config.database).await?;
            let state = AppState::new(config.catalog.clone(), Arc::new(source));
            server::serve(&config, state).await?;
        }

        Command::Render {
            fixture,
            output,
            pass_link,
            class_link,
        } => {
            config.validate()?;
            let source: Box<dyn CatalogSource> = match fixture {
                Some(path) => Box::new(FixtureSource::load(&path).await?),
                None => Box::new(MySqlSource::connect(&config.database).await?),
            };

            let overrides = LinkOverrides::new(pass_link, class_link);
            let versioner = CatalogVersioner::new();
            let outcome =
                run_export(&config.catalog, source.as_ref(), &versioner, &overrides).await?;

            match output {
                Some(path) => {
                    tokio::fs::write(&path, outcome.body.as_bytes()).await?;
                    log::info!(
                        "Wrote {} offers to {} (date {})",
                        outcome.offer_count,
                        path.display(),
                        outcome.publication.date()
                    );
                }
                None => print!("{}", outcome.body),
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }
    }

    Ok(())
}

