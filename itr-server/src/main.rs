use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use itr_server::{Config, app, create_router, logging};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Income-tax estimator for salaried filers in India.
///
/// Serves the old- vs new-regime calculator over HTTP and keeps a history of
/// calculations in the configured database.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, env = "ITR_CONFIG")]
    config: Option<PathBuf>,

    /// Database backend to use.
    #[arg(long)]
    backend: Option<String>,

    /// Database connection string.
    /// For SQLite this is a file path (e.g. `itr.db`) or `:memory:`.
    #[arg(long)]
    db: Option<String>,

    /// Address to listen on, e.g. `0.0.0.0:8080`.
    #[arg(long)]
    bind: Option<String>,

    /// Log level or `EnvFilter` directive.
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn apply(
        self,
        config: &mut Config,
    ) {
        if let Some(backend) = self.backend {
            config.database.backend = backend;
        }
        if let Some(db) = self.db {
            config.database.connection_string = db;
        }
        if let Some(bind) = self.bind {
            config.server.bind_addr = bind;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    logging::init_logging(&config.logging.level);
    if let Some(path) = &config.logging.file {
        if let Err(e) = logging::enable_file_logging(path) {
            warn!(error = %e, "file logging disabled");
        }
    }

    let addr = config.socket_addr()?;
    let state = app::build_state(&config.db_config())
        .await
        .with_context(|| format!("failed to open {} database", config.database.backend))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, version = env!("CARGO_PKG_VERSION"), "itr-server listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("itr-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
