//! `huddle` command line: run the assistant server or classify a query.

use anyhow::Context;
use clap::{Parser, Subcommand};
use huddle::config::{HuddleConfig, LayeredConfigOptions};
use huddle::core::classify;
use huddle::server::{AppState, serve};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "huddle", version, about = "Workspace-scoped conversational assistant")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Extra huddle.json5 layered on top of the discovered config
        #[arg(long)]
        config: Option<PathBuf>,
        /// Bind address override, e.g. 0.0.0.0:8787
        #[arg(long)]
        bind: Option<String>,
    },
    /// Print the intent label for a query
    Classify {
        /// Query text
        text: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    huddle::init_logging();
    let cli = Cli::parse();
    match cli.command {
        Command::Serve { config, bind } => run_server(config, bind).await,
        Command::Classify { text } => {
            println!("{}", classify(&text));
            Ok(())
        }
    }
}

async fn run_server(config_path: Option<PathBuf>, bind: Option<String>) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("cwd")?;
    info!(
        "loading layered config (cwd={}, runtime_layer={})",
        cwd.display(),
        config_path.is_some()
    );
    let mut options = LayeredConfigOptions::new(&cwd);
    if let Some(path) = config_path.as_ref() {
        options = options.with_runtime_path(path);
    }
    let layered = HuddleConfig::load_layered_with_options(options)
        .context("failed to load layered config")?;
    debug!("layered config loaded (layers={})", layered.layers.len());
    let config = layered.config;

    let assistant = huddle::assistant_from_config(&config).context("failed to wire assistant")?;
    let state = AppState::new(assistant, &config.server).context("invalid server config")?;
    let address = bind.unwrap_or_else(|| config.server.bind_address.clone());
    serve(Arc::new(state), &address, shutdown_signal())
        .await
        .with_context(|| format!("server failed (address={address})"))
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("failed to install ctrl-c handler (error={})", err);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => warn!("failed to install sigterm handler (error={})", err),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("shutdown signal received");
}
