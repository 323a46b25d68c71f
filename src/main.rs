// src/main.rs

// dependencies
use anyhow::Context;
use clap::Parser;
use static_dev_server::{DevServer, ServerConfig, load_config};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Development server for frontend assets.
///
/// Serves the public directory at `/` and each path alias under `/<alias>`,
/// answering cross-origin requests according to the configured CORS policy.
#[derive(Debug, Parser)]
#[command(name = "static-dev-server", version)]
struct Cli {
    /// Mode the configuration is loaded for (any string is accepted).
    #[arg(long, default_value = "development", env = "DEV_SERVER_MODE")]
    mode: String,

    /// Optional TOML file overriding the built-in configuration.
    #[arg(long, env = "DEV_SERVER_CONFIG")]
    config: Option<PathBuf>,

    /// Host to bind, overriding the configuration.
    #[arg(long, env = "DEV_SERVER_HOST")]
    host: Option<String>,

    /// Port to bind, overriding the configuration.
    #[arg(long, env = "DEV_SERVER_PORT")]
    port: Option<u16>,
}

impl Cli {
    // defaults, then the config file, then flags
    fn into_server_config(self) -> anyhow::Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_toml_file(path, &self.mode)
                .with_context(|| format!("loading {}", path.display()))?,
            None => load_config(&self.mode),
        };

        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_server_config()?;

    DevServer::new(config).run(shutdown_signal()).await?;

    info!("dev server stopped");
    Ok(())
}

// resolves on Ctrl+C; if the signal cannot be installed the server runs until killed
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received Ctrl+C, shutting down"),
        Err(e) => {
            tracing::error!("failed to listen for Ctrl+C signal: {e}");
            std::future::pending::<()>().await;
        }
    }
}
