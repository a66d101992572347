//! kanbn-notifier entry point.
//!
//! Loads configuration, wires the board client, Telegram sink and file
//! watermark store together and polls until SIGINT or SIGTERM.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use kanbn_notifier::client::{BoardClient, TelegramSink};
use kanbn_notifier::config::NotifierConfig;
use kanbn_notifier::persistence::FileWatermarkStore;
use kanbn_notifier::service::{ActivityScanner, Poller};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = NotifierConfig::from_env().context("invalid configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.json_logs {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(
        board = %config.board_id,
        workspace = config.workspace_id.as_deref().unwrap_or("-"),
        state_file = %config.state_file.display(),
        interval_secs = config.poll_interval.as_secs(),
        "starting kanbn-notifier"
    );

    // Build collaborators
    let client = BoardClient::new(&config).context("building board client")?;
    let sink = TelegramSink::new(&config).context("building telegram sink")?;
    let store = FileWatermarkStore::new(config.state_file.clone(), config.initial_lookback);

    let scanner = ActivityScanner::new(&config, client, sink, store);
    let poller = Poller::new(scanner, config.poll_interval);

    let shutdown = shutdown_signal()?;
    let cycles = poller.run(shutdown).await;
    tracing::info!(cycles, "kanbn-notifier stopped");

    Ok(())
}

/// Installs the SIGTERM handler now and returns a future that resolves on
/// Ctrl+C, or SIGTERM on Unix.
///
/// The Ctrl+C listener is registered on first poll, which
/// [`Poller::run`] does before starting the first cycle.
fn shutdown_signal() -> anyhow::Result<impl Future<Output = ()>> {
    #[cfg(unix)]
    let mut sigterm =
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .context("installing SIGTERM handler")?;

    Ok(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async move {
            sigterm.recv().await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => {}
            () = terminate => {}
        }
    })
}
