//! Watchdesk server binary.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::AppConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use wd_api::{ApiServer, ApiServerConfig, AppState};
use wd_core::db::{create_pool, run_migrations, seed_demo_data};
use wd_notify::{Notifier, SlackConfig, SlackNotifier};
use wd_observability::{init_logging_with_config, LoggingConfig};

#[derive(Parser)]
#[command(name = "watchdesk", about = "Security operations bookkeeping API", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server.
    Serve {
        /// Path to a YAML configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the bind address.
        #[arg(long)]
        bind: Option<SocketAddr>,

        /// Insert demo data when the store is empty.
        #[arg(long)]
        seed: bool,
    },
    /// Validate a configuration file without starting the server.
    CheckConfig {
        /// Path to a YAML configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig> {
    let mut config = match path {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    config.apply_env_overrides();
    Ok(config)
}

fn logging_config(config: &AppConfig) -> LoggingConfig {
    let level = config
        .logging
        .level
        .parse()
        .unwrap_or(tracing::Level::INFO);
    LoggingConfig {
        level,
        json_format: config.logging.json_format,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, bind, seed } => {
            let mut config = load_config(config.as_ref())?;
            if let Some(bind) = bind {
                config.server.bind_address = bind;
            }

            init_logging_with_config(logging_config(&config));

            // Fail fast on incomplete configuration before touching the store.
            config.validate()?;

            let pool = create_pool(&config.database.url)
                .await
                .context("Failed to connect to the database")?;
            run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;

            if seed {
                seed_demo_data(&pool)
                    .await
                    .context("Failed to seed demo data")?;
            }

            let notifier: Arc<dyn Notifier> = Arc::new(
                SlackNotifier::new(SlackConfig {
                    webhook_url: config.slack.webhook_url.clone(),
                    default_channel: config.slack.default_channel.clone(),
                })
                .context("Failed to construct the Slack notifier")?,
            );

            info!(
                bind_address = %config.server.bind_address,
                default_channel = %config.slack.default_channel,
                "Watchdesk starting"
            );

            let state = AppState::new(pool, notifier);
            let server = ApiServer::new(
                state,
                ApiServerConfig {
                    bind_address: config.server.bind_address,
                    request_timeout: Duration::from_secs(config.server.request_timeout_secs),
                },
            );

            server.run().await.context("API server failed")?;
            Ok(())
        }
        Commands::CheckConfig { config } => {
            let config = load_config(config.as_ref())?;
            config.validate()?;
            println!("Configuration OK");
            Ok(())
        }
    }
}
