use anyhow::Result;
use hostmon::*;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

/// Writes each broadcast measurement to stdout as one JSON line.
fn spawn_printer(mut rx: broadcast::Receiver<models::Measurement>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(measurement) => match serde_json::to_string(&measurement) {
                    Ok(line) => println!("{}", line),
                    Err(e) => tracing::warn!(error = %e, "could not serialize measurement"),
                },
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::debug!(skipped = n, "printer lagged behind sampler");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the measurement stream.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let app_config = config::AppConfig::load()?;
    tracing::info!(
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
        "starting"
    );

    let monitor = monitor::TelemetryMonitor::open(&app_config.sources.paths())
        .map_err(|e| anyhow::anyhow!("open telemetry sources: {}", e))?;
    let lister = liveness::CommandLister::from_command_line(&app_config.liveness.command)
        .ok_or_else(|| anyhow::anyhow!("liveness.command has no program"))?;
    let repo = telemetry_repo::TelemetryRepo::new(monitor, lister);

    let store = if app_config.store.enabled {
        let db = store::FileDatabase::new(&app_config.store.path);
        Some(Arc::new(Mutex::new(store::PersistentMap::open(db)?)))
    } else {
        None
    };

    let (tx, rx) =
        broadcast::channel::<models::Measurement>(app_config.sampling.broadcast_capacity);
    let printer_handle = spawn_printer(rx);
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let worker_handle = worker::spawn(
        worker::WorkerDeps {
            repo,
            store,
            tx,
            watch: app_config.liveness.watch.clone(),
            shutdown_rx,
        },
        worker::WorkerConfig {
            sample_interval_ms: app_config.sampling.sample_interval_ms,
            stats_log_interval_secs: app_config.sampling.stats_log_interval_secs,
            max_entries: app_config.store.max_entries,
        },
    );

    shutdown_signal().await;
    tracing::info!("Received shutdown signal");
    let _ = shutdown_tx.send(());
    let _ = worker_handle.await;
    // The worker owned the only sender; the printer drains and exits.
    let _ = printer_handle.await;

    Ok(())
}
