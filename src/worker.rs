// Background sampler: one measurement per tick, broadcast and written to the store.

use crate::models::Measurement;
use crate::store::{FileDatabase, PersistentMap};
use crate::telemetry_repo::TelemetryRepo;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tokio::time::{Duration, Instant, interval};
use tracing::Instrument;

/// Rate limit for the "no receivers" message (avoid logging every tick when nothing listens).
const NO_RECEIVERS_WARN_INTERVAL: Duration = Duration::from_secs(60);

pub type SharedStore = Arc<Mutex<PersistentMap<FileDatabase>>>;

/// Repo, channels, and shutdown for the worker.
pub struct WorkerDeps {
    pub repo: TelemetryRepo,
    /// `None` when the store is disabled.
    pub store: Option<SharedStore>,
    pub tx: broadcast::Sender<Measurement>,
    /// Process names checked for liveness on every tick.
    pub watch: Vec<String>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Worker timing and retention config.
pub struct WorkerConfig {
    pub sample_interval_ms: u64,
    /// How often to log sampler stats (real seconds).
    pub stats_log_interval_secs: u64,
    /// Store size after each insert.
    pub max_entries: usize,
}

#[derive(Debug, Default, Clone, Copy)]
struct SamplerStats {
    samples_total: u64,
    failures_total: u64,
    pruned_total: u64,
}

fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_else(|e| {
            tracing::warn!(
                error = %e,
                operation = "get_timestamp",
                "system time error"
            );
            0
        })
}

async fn store_measurement(
    store: &SharedStore,
    measurement: Measurement,
    max_entries: usize,
) -> anyhow::Result<(usize, usize)> {
    let store = store.clone();
    tokio::task::spawn_blocking(move || {
        let mut store = store
            .lock()
            .map_err(|e| anyhow::anyhow!("store lock poisoned: {}", e))?;
        store.insert(measurement);
        let pruned = store.prune_to(max_entries);
        Ok((store.len(), pruned))
    })
    .await
    .map_err(|e| anyhow::anyhow!("store task join: {}", e))?
}

async fn check_watched(repo: &TelemetryRepo, watch: &[String]) {
    for name in watch {
        match repo.is_running(name).await {
            Ok(running) => tracing::info!(process = %name, running, "liveness"),
            Err(e) => tracing::warn!(
                process = %name,
                error = %e,
                operation = "is_running",
                "liveness check failed"
            ),
        }
    }
}

pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        repo,
        store,
        tx,
        watch,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig {
        sample_interval_ms,
        stats_log_interval_secs,
        max_entries,
    } = config;

    let stats_log_interval = Duration::from_secs(stats_log_interval_secs);

    let worker_span = tracing::span!(tracing::Level::DEBUG, "worker", sample_interval_ms);
    let sampler = async move {
        let mut tick = interval(Duration::from_millis(sample_interval_ms));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut stats_log_tick = interval(stats_log_interval);
        stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut stats = SamplerStats::default();
        let mut stored_entries = 0usize;
        let mut last_no_receivers_warn: Option<Instant> = None;

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let timestamp = now_millis();
                    let measurement = match repo.get_measurement(timestamp).await {
                        Ok(m) => m,
                        Err(e) => {
                            stats.failures_total += 1;
                            tracing::warn!(
                                error = %e,
                                operation = "get_measurement",
                                "measurement failed"
                            );
                            continue;
                        }
                    };
                    stats.samples_total += 1;

                    if tx.send(measurement.clone()).is_err() {
                        let should_warn = last_no_receivers_warn
                            .is_none_or(|t| t.elapsed() >= NO_RECEIVERS_WARN_INTERVAL);
                        if should_warn {
                            tracing::debug!(
                                operation = "broadcast_measurement",
                                "broadcast channel has no receivers"
                            );
                            last_no_receivers_warn = Some(Instant::now());
                        }
                    }

                    if let Some(store) = &store {
                        match store_measurement(store, measurement, max_entries).await {
                            Ok((len, pruned)) => {
                                stored_entries = len;
                                stats.pruned_total += pruned as u64;
                            }
                            Err(e) => tracing::warn!(
                                error = %e,
                                operation = "store_measurement",
                                "could not store measurement"
                            ),
                        }
                    }

                    check_watched(&repo, &watch).await;
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Worker shutting down");
                    break;
                }
                _ = stats_log_tick.tick() => {
                    tracing::info!(
                        samples_total = stats.samples_total,
                        failures_total = stats.failures_total,
                        pruned_total = stats.pruned_total,
                        stored_entries,
                        broadcast_receivers = tx.receiver_count(),
                        "sampler stats"
                    );
                }
            }
        }
    };
    tokio::spawn(sampler.instrument(worker_span))
}
