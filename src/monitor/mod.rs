// Snapshot assembly over the three long-lived telemetry sources

use crate::error::Result;
use crate::line_source::{LineSource, open_checked};
use crate::models::{CpuInfo, MemoryInfo};
use crate::parser::{read_all_cpu_blocks, read_cpu_usage_line, read_memory_info};
use std::path::PathBuf;
use tracing::instrument;

/// Point-in-time memory and CPU queries. Each call computes fresh values;
/// nothing is cached between calls.
pub trait UserMonitor {
    fn memory_snapshot(&mut self) -> Result<MemoryInfo>;
    fn cpu_snapshot(&mut self) -> Result<CpuInfo>;
}

/// Files backing a [`TelemetryMonitor`].
#[derive(Debug, Clone)]
pub struct SourcePaths {
    pub meminfo: PathBuf,
    pub cpuinfo: PathBuf,
    pub cpu_usage: PathBuf,
}

type BoxedSource = Box<dyn LineSource + Send>;

/// Owns one handle per source for its whole lifetime. Reads take `&mut self`
/// and leave every handle at the offset it started from, so back-to-back
/// calls see the same logical beginning.
pub struct TelemetryMonitor {
    memory: BoxedSource,
    cpu_info: BoxedSource,
    cpu_usage: BoxedSource,
}

impl TelemetryMonitor {
    /// Opens every path up front; a missing or unreadable file fails here
    /// rather than on the first read.
    pub fn open(paths: &SourcePaths) -> Result<Self> {
        tracing::info!(path = %paths.meminfo.display(), "using memory info file");
        tracing::info!(path = %paths.cpuinfo.display(), "using cpu info file");
        tracing::info!(path = %paths.cpu_usage.display(), "using cpu usage file");

        let cpu_info = open_checked(&paths.cpuinfo)?;
        let cpu_usage = open_checked(&paths.cpu_usage)?;
        let memory = open_checked(&paths.meminfo)?;
        Ok(Self::from_sources(memory, cpu_info, cpu_usage))
    }

    pub fn from_sources(
        memory: impl LineSource + Send + 'static,
        cpu_info: impl LineSource + Send + 'static,
        cpu_usage: impl LineSource + Send + 'static,
    ) -> Self {
        Self {
            memory: Box::new(memory),
            cpu_info: Box::new(cpu_info),
            cpu_usage: Box::new(cpu_usage),
        }
    }
}

impl UserMonitor for TelemetryMonitor {
    #[instrument(skip(self), fields(repo = "monitor", operation = "memory_snapshot"))]
    fn memory_snapshot(&mut self) -> Result<MemoryInfo> {
        read_memory_info(self.memory.as_mut())
    }

    /// Usage line first, then the CPU blocks; both sources are rewound
    /// whichever step fails.
    #[instrument(skip(self), fields(repo = "monitor", operation = "cpu_snapshot"))]
    fn cpu_snapshot(&mut self) -> Result<CpuInfo> {
        let usage = read_cpu_usage_line(self.cpu_usage.as_mut())?;
        let cpus = read_all_cpu_blocks(self.cpu_info.as_mut())?;
        Ok(CpuInfo::new(cpus, usage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MonitorError;
    use std::io::Cursor;

    fn source(text: &str) -> Cursor<Vec<u8>> {
        Cursor::new(text.as_bytes().to_vec())
    }

    const CPUINFO: &str = "model name : a\ncpu MHz : 1000\ncache size : 512 KB\n\n";
    const USAGE: &str = "h1\nh2\nCpu(s): 2.1%us, 12.99%sy, 0.1%ni, 55.01%id, 0.4%wa\n";

    #[test]
    fn cpu_snapshot_combines_usage_and_blocks() {
        let mut monitor =
            TelemetryMonitor::from_sources(source(""), source(CPUINFO), source(USAGE));
        let info = monitor.cpu_snapshot().unwrap();
        assert_eq!(info.cpus.len(), 1);
        assert_eq!(info.user_usage_percent, 2.1);
        assert_eq!(info.system_usage_percent, 12.99);
        assert_eq!(info.idle_percent, 55.01);
        assert_eq!(monitor.cpu_snapshot().unwrap(), info);
    }

    #[test]
    fn cpu_snapshot_failure_leaves_sources_rewound() {
        let mut monitor = TelemetryMonitor::from_sources(
            source(""),
            source("model name : a\n\n"),
            source(USAGE),
        );
        let err = monitor.cpu_snapshot().unwrap_err();
        assert!(matches!(err, MonitorError::IncompleteData(_)));
        assert_eq!(monitor.cpu_info.offset().unwrap(), 0);
        assert_eq!(monitor.cpu_usage.offset().unwrap(), 0);
    }
}
