//! SSVEP Daemon - command detection and selection logging service
//!
//! The daemon provides:
//! - Frequency-to-command detection with simulated acquisition latency
//! - A bounded, in-memory selection log with per-user activity
//! - Log analytics for the dashboard
//! - An admin-keyed wipe of all logged state

use clap::Parser;
use ssvep_daemon::config::DaemonConfig;
use ssvep_daemon::error::{DaemonError, DaemonResult};
use ssvep_daemon::server::Server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// SSVEP Daemon CLI
#[derive(Parser)]
#[command(name = "ssvepd")]
#[command(about = "SSVEP Daemon - command detection and selection logging", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "SSVEP_CONFIG")]
    config: Option<String>,

    /// Listen address
    #[arg(short, long, env = "SSVEP_LISTEN_ADDR")]
    listen: Option<String>,

    /// Shared secret required to clear the selection log
    #[arg(long, env = "SSVEP_ADMIN_KEY", hide_env_values = true)]
    admin_key: Option<String>,

    /// Log level
    #[arg(long, env = "SSVEP_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "SSVEP_LOG_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> DaemonResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = DaemonConfig::load(cli.config.as_deref())
        .map_err(|e| DaemonError::Config(e.to_string()))?;

    // Override with CLI args
    if let Some(listen) = &cli.listen {
        config.server.listen_addr = listen
            .parse()
            .map_err(|e| DaemonError::Config(format!("Invalid listen address: {}", e)))?;
    }
    if let Some(admin_key) = cli.admin_key {
        config.admin.key = admin_key;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if cli.json {
        config.logging.json = true;
    }

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.clone().into());

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        listen = %config.server.listen_addr,
        "Starting SSVEP daemon"
    );

    // Create and run server
    let server = Server::new(config)?;
    server.run().await
}
