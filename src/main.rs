//! Whisper Dashboard CLI
//!
//! Terminal monitor for the Whisper Chat server.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use whisper_dashboard::{
    generate_default_config, Config, Dashboard, Document, LoggingConfig, StatusClient,
    StatusSource, TerminalView,
};

#[derive(Parser)]
#[command(name = "whisper-dashboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Live monitor for the Whisper Chat server")]
struct Cli {
    /// Chat server web interface URL (overrides config)
    #[arg(long)]
    url: Option<String>,

    /// Polling period in milliseconds (overrides config)
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Config file (default: search standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Refresh once and exit
    #[arg(long)]
    once: bool,

    /// Output format; html implies --once
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Terminal)]
    format: OutputFormat,

    /// Log rows kept on screen (overrides config)
    #[arg(long)]
    log_rows: Option<usize>,

    /// Print a default config file and exit
    #[arg(long)]
    print_config: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Terminal,
    Html,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", generate_default_config());
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load_default(),
    };

    if let Some(url) = cli.url {
        config.poller.base_url = url;
    }
    if let Some(ms) = cli.interval_ms {
        config.poller.interval_ms = ms;
    }
    if let Some(rows) = cli.log_rows {
        config.view.log_rows = rows;
    }

    init_logging(&config.logging);

    tracing::info!("Whisper Dashboard v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(url = %config.poller.base_url, "Polling chat server");

    let client = StatusClient::new(config.poller.client_config())?;
    let source: Arc<dyn StatusSource> = Arc::new(client);

    match (cli.format, cli.once) {
        (OutputFormat::Html, _) => {
            let dashboard = Dashboard::new(source, Document::dashboard());
            dashboard.refresh().await.context("status refresh failed")?;

            let view = dashboard.view();
            let document = view.lock().await;
            print!("{}", document.to_html());
        }
        (OutputFormat::Terminal, true) => {
            let view = TerminalView::new(io::stdout())
                .without_clear()
                .with_log_rows(config.view.log_rows);
            let dashboard = Dashboard::new(source, view);
            dashboard.refresh().await.context("status refresh failed")?;
        }
        (OutputFormat::Terminal, false) => {
            let interval = config.poller.interval()?;
            let view = TerminalView::new(io::stdout()).with_log_rows(config.view.log_rows);
            let dashboard = Arc::new(Dashboard::new(source, view));

            let poller = dashboard.start(interval)?;
            shutdown_signal().await;
            poller.stop().await;
        }
    }

    Ok(())
}

fn init_logging(config: &LoggingConfig) {
    // Logs go to stderr so they never interleave with the dashboard on stdout
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("whisper_dashboard={}", config.level))
    });
    let registry = tracing_subscriber::registry().with(filter);

    if config.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
