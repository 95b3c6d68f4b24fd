// Shared test helpers: telemetry fixture files in a temp dir

#![allow(dead_code)]

use hostmon::models::{CpuConfiguration, CpuInfo, CpuUsage, Measurement, MemoryInfo};
use hostmon::monitor::SourcePaths;
use std::path::Path;
use tempfile::TempDir;

pub const MEMINFO: &str = "\
MemTotal:        8000000 kB
MemFree:         2000000 kB
MemAvailable:    5000000 kB
Buffers:          100000 kB
";

pub const CPUINFO: &str = "\
processor\t: 0
vendor_id\t: GenuineIntel
model name\t: Intel(R) Core(TM) i7-4770 CPU @ 3.40GHz
cpu MHz\t\t: 3400.000
cache size\t: 8192 KB

processor\t: 1
model name\t: Intel(R) Core(TM) i7-4770 CPU @ 3.40GHz
cache size\t: 8192 KB
cpu MHz\t\t: 1600.500

processor\t: 2
cpu MHz\t\t: 800
model name\t: Intel(R) Core(TM) i7-4770 CPU @ 3.40GHz
cache size\t: 4096 KB

";

pub const CPU_USAGE: &str = "\
top - 10:00:00 up 1 day,  2 users,  load average: 0.10, 0.20, 0.30
Tasks: 200 total,   1 running, 199 sleeping,   0 stopped,   0 zombie
Cpu(s):  2.1%us, 12.99%sy,  0.0%ni, 55.01%id,  0.3%wa,  0.0%hi,  0.0%si,  0.0%st
";

/// Temp dir holding meminfo, cpuinfo and cpu_usage fixtures.
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new(meminfo: &str, cpuinfo: &str, cpu_usage: &str) -> Self {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "meminfo", meminfo);
        write(dir.path(), "cpuinfo", cpuinfo);
        write(dir.path(), "cpu_usage", cpu_usage);
        Self { dir }
    }

    pub fn valid() -> Self {
        Self::new(MEMINFO, CPUINFO, CPU_USAGE)
    }

    pub fn paths(&self) -> SourcePaths {
        SourcePaths {
            meminfo: self.dir.path().join("meminfo"),
            cpuinfo: self.dir.path().join("cpuinfo"),
            cpu_usage: self.dir.path().join("cpu_usage"),
        }
    }

    pub fn rewrite(&self, name: &str, contents: &str) {
        write(self.dir.path(), name, contents);
    }
}

fn write(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).unwrap();
}

pub fn measurement(timestamp: u64) -> Measurement {
    Measurement {
        timestamp,
        memory: MemoryInfo::from_total_and_free(1000.0, 250.0),
        cpu: CpuInfo::new(
            vec![CpuConfiguration {
                frequency_mhz: 2400.0,
                model_name: "Test CPU".into(),
                cache_size_kb: 512.0,
            }],
            CpuUsage {
                user_percent: 1.5,
                system_percent: 2.5,
                idle_percent: 96.0,
            },
        ),
    }
}
