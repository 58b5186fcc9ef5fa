//! verity-server - Provider Directory Management API
//!
//! Serves the provider verification workflow over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use verity_runtime::FixtureSource;
use verity_server::{build_router, AppState, ServerConfig};

/// HTTP API for provider record verification.
#[derive(Parser, Debug)]
#[command(name = "verity-server", version, about, long_about = None)]
struct Args {
    /// YAML config file.
    #[arg(short, long, env = "VERITY_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on (overrides config).
    #[arg(long, env = "VERITY_BIND")]
    bind: Option<SocketAddr>,

    /// Fixture table replacing the built-in one (overrides config).
    #[arg(long, env = "VERITY_FIXTURES")]
    fixtures: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset (overrides config).
    #[arg(long, env = "VERITY_LOG")]
    log_filter: Option<String>,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

fn resolve_config(args: &Args) -> Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::from_yaml_file(path)?,
        None => ServerConfig::default(),
    };

    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    if let Some(fixtures) = &args.fixtures {
        config.fixtures = Some(fixtures.clone());
    }
    if let Some(filter) = &args.log_filter {
        config.log_filter = filter.clone();
    }

    Ok(config)
}

fn init_tracing(filter: &str, format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(env_filter).init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = resolve_config(&args)?;
    init_tracing(&config.log_filter, args.log_format);

    info!(
        "Starting Provider Directory Management API (verity-server) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let fixtures = match &config.fixtures {
        Some(path) => {
            info!("Fixture table: {}", path.display());
            FixtureSource::from_yaml_file(path)
                .with_context(|| format!("Failed to load fixtures from {}", path.display()))?
        }
        None => FixtureSource::builtin().context("Failed to load built-in fixtures")?,
    };
    info!(providers = fixtures.len(), "Fixture table loaded");

    let state = AppState::from_fixtures(fixtures);
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;
    info!("verity-server listening on http://{}", config.bind);
    info!("Health check: http://{}/api/health", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
