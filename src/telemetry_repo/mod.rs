// Async access to the blocking monitor and liveness scanner

use crate::liveness::{ProcessLister, ProcessLivenessScanner};
use crate::models::{CpuInfo, Measurement, MemoryInfo};
use crate::monitor::UserMonitor;
use std::sync::{Arc, Mutex};
use tracing::instrument;

type SharedMonitor = Arc<Mutex<dyn UserMonitor + Send>>;
type SharedScanner = Arc<ProcessLivenessScanner<Box<dyn ProcessLister + Send + Sync>>>;

/// Serialises access to one monitor (its handles are not safe to interleave)
/// and runs every read on the blocking pool.
#[derive(Clone)]
pub struct TelemetryRepo {
    monitor: SharedMonitor,
    scanner: SharedScanner,
}

impl TelemetryRepo {
    pub fn new(
        monitor: impl UserMonitor + Send + 'static,
        lister: impl ProcessLister + Send + Sync + 'static,
    ) -> Self {
        let lister: Box<dyn ProcessLister + Send + Sync> = Box::new(lister);
        Self {
            monitor: Arc::new(Mutex::new(monitor)),
            scanner: Arc::new(ProcessLivenessScanner::new(lister)),
        }
    }

    #[instrument(skip(self), fields(repo = "telemetry", operation = "get_memory_info"))]
    pub async fn get_memory_info(&self) -> anyhow::Result<MemoryInfo> {
        let monitor = self.monitor.clone();
        tokio::task::spawn_blocking(move || {
            let mut monitor = monitor
                .lock()
                .map_err(|e| anyhow::anyhow!("monitor lock poisoned: {}", e))?;
            Ok(monitor.memory_snapshot()?)
        })
        .await
        .map_err(|e| anyhow::anyhow!("monitor task join: {}", e))?
    }

    #[instrument(skip(self), fields(repo = "telemetry", operation = "get_cpu_info"))]
    pub async fn get_cpu_info(&self) -> anyhow::Result<CpuInfo> {
        let monitor = self.monitor.clone();
        tokio::task::spawn_blocking(move || {
            let mut monitor = monitor
                .lock()
                .map_err(|e| anyhow::anyhow!("monitor lock poisoned: {}", e))?;
            Ok(monitor.cpu_snapshot()?)
        })
        .await
        .map_err(|e| anyhow::anyhow!("monitor task join: {}", e))?
    }

    /// Memory and CPU taken under one lock, stamped with `timestamp`.
    #[instrument(skip(self), fields(repo = "telemetry", operation = "get_measurement"))]
    pub async fn get_measurement(&self, timestamp: u64) -> anyhow::Result<Measurement> {
        let monitor = self.monitor.clone();
        tokio::task::spawn_blocking(move || {
            let mut monitor = monitor
                .lock()
                .map_err(|e| anyhow::anyhow!("monitor lock poisoned: {}", e))?;
            let memory = monitor.memory_snapshot()?;
            let cpu = monitor.cpu_snapshot()?;
            Ok(Measurement {
                timestamp,
                memory,
                cpu,
            })
        })
        .await
        .map_err(|e| anyhow::anyhow!("monitor task join: {}", e))?
    }

    #[instrument(skip(self), fields(repo = "telemetry", operation = "is_running"))]
    pub async fn is_running(&self, name: &str) -> anyhow::Result<bool> {
        let scanner = self.scanner.clone();
        let name = name.to_string();
        tokio::task::spawn_blocking(move || Ok(scanner.is_running(&name)?))
            .await
            .map_err(|e| anyhow::anyhow!("liveness task join: {}", e))?
    }
}
