// CPU configuration and utilisation models

use serde::{Deserialize, Serialize};
use wincode::{SchemaRead, SchemaWrite};

/// One CPU block from the cpuinfo file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SchemaRead, SchemaWrite)]
#[serde(rename_all = "camelCase")]
pub struct CpuConfiguration {
    pub frequency_mhz: f64,
    pub model_name: String,
    pub cache_size_kb: f64,
}

/// Aggregate utilisation percentages from the usage summary line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, SchemaRead, SchemaWrite)]
#[serde(rename_all = "camelCase")]
pub struct CpuUsage {
    pub user_percent: f64,
    pub system_percent: f64,
    pub idle_percent: f64,
}

/// CPUs in file order plus aggregate utilisation. The percentages are not
/// cross-checked to sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SchemaRead, SchemaWrite)]
#[serde(rename_all = "camelCase")]
pub struct CpuInfo {
    pub cpus: Vec<CpuConfiguration>,
    pub user_usage_percent: f64,
    pub system_usage_percent: f64,
    pub idle_percent: f64,
}

impl CpuInfo {
    pub fn new(cpus: Vec<CpuConfiguration>, usage: CpuUsage) -> Self {
        Self {
            cpus,
            user_usage_percent: usage.user_percent,
            system_usage_percent: usage.system_percent,
            idle_percent: usage.idle_percent,
        }
    }

    pub fn usage(&self) -> CpuUsage {
        CpuUsage {
            user_percent: self.user_usage_percent,
            system_percent: self.system_usage_percent,
            idle_percent: self.idle_percent,
        }
    }
}
