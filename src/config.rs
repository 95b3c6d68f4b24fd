use crate::liveness::DEFAULT_LISTING_COMMAND;
use crate::monitor::SourcePaths;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub sources: SourcesConfig,
    pub sampling: SamplingConfig,
    #[serde(default)]
    pub liveness: LivenessConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_meminfo_path")]
    pub meminfo_path: PathBuf,
    #[serde(default = "default_cpuinfo_path")]
    pub cpuinfo_path: PathBuf,
    /// Top-style capture whose third line is the "Cpu(s):" summary.
    pub cpu_usage_path: PathBuf,
}

fn default_meminfo_path() -> PathBuf {
    "/proc/meminfo".into()
}

fn default_cpuinfo_path() -> PathBuf {
    "/proc/cpuinfo".into()
}

impl SourcesConfig {
    pub fn paths(&self) -> SourcePaths {
        SourcePaths {
            meminfo: self.meminfo_path.clone(),
            cpuinfo: self.cpuinfo_path.clone(),
            cpu_usage: self.cpu_usage_path.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SamplingConfig {
    pub sample_interval_ms: u64,
    /// How often to log sampler stats (ticks, failures, stored entries) at INFO level.
    pub stats_log_interval_secs: u64,
    /// Max number of measurements kept in the broadcast channel for stdout output.
    #[serde(default = "default_broadcast_capacity")]
    pub broadcast_capacity: usize,
}

fn default_broadcast_capacity() -> usize {
    16
}

#[derive(Debug, Clone, Deserialize)]
pub struct LivenessConfig {
    /// Listing command, split on whitespace (no shell quoting).
    #[serde(default = "default_listing_command")]
    pub command: String,
    /// Process names checked on every tick.
    #[serde(default)]
    pub watch: Vec<String>,
}

fn default_listing_command() -> String {
    DEFAULT_LISTING_COMMAND.into()
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            command: default_listing_command(),
            watch: vec![],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_enabled")]
    pub enabled: bool,
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_store_enabled() -> bool {
    true
}

fn default_store_path() -> PathBuf {
    "data/measurements.bin".into()
}

fn default_max_entries() -> usize {
    1000
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            enabled: default_store_enabled(),
            path: default_store_path(),
            max_entries: default_max_entries(),
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        for (name, path) in [
            ("sources.meminfo_path", &self.sources.meminfo_path),
            ("sources.cpuinfo_path", &self.sources.cpuinfo_path),
            ("sources.cpu_usage_path", &self.sources.cpu_usage_path),
        ] {
            anyhow::ensure!(!path.as_os_str().is_empty(), "{} must be non-empty", name);
        }
        anyhow::ensure!(
            self.sampling.sample_interval_ms > 0,
            "sampling.sample_interval_ms must be > 0, got {}",
            self.sampling.sample_interval_ms
        );
        anyhow::ensure!(
            self.sampling.stats_log_interval_secs > 0,
            "sampling.stats_log_interval_secs must be > 0, got {}",
            self.sampling.stats_log_interval_secs
        );
        anyhow::ensure!(
            self.sampling.broadcast_capacity > 0,
            "sampling.broadcast_capacity must be > 0, got {}",
            self.sampling.broadcast_capacity
        );
        anyhow::ensure!(
            !self.liveness.command.trim().is_empty(),
            "liveness.command must be non-empty"
        );
        anyhow::ensure!(
            self.liveness.watch.iter().all(|name| !name.is_empty()),
            "liveness.watch entries must be non-empty"
        );
        if self.store.enabled {
            anyhow::ensure!(
                !self.store.path.as_os_str().is_empty(),
                "store.path must be non-empty"
            );
            anyhow::ensure!(
                self.store.max_entries > 0,
                "store.max_entries must be > 0, got {}",
                self.store.max_entries
            );
        }
        Ok(())
    }
}
