// Memory snapshot model

use serde::{Deserialize, Serialize};
use wincode::{SchemaRead, SchemaWrite};

/// Memory totals in whatever unit the source file uses (kB for `/proc/meminfo`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SchemaRead, SchemaWrite)]
#[serde(rename_all = "camelCase")]
pub struct MemoryInfo {
    pub total_memory: f64,
    pub used_memory: f64,
}

impl MemoryInfo {
    /// Derives used memory as `total - free`.
    pub fn from_total_and_free(total: f64, free: f64) -> Self {
        Self {
            total_memory: total,
            used_memory: total - free,
        }
    }

    pub fn free_memory(&self) -> f64 {
        self.total_memory - self.used_memory
    }

    pub fn usage_percent(&self) -> f64 {
        if self.total_memory > 0.0 {
            (self.used_memory / self.total_memory) * 100.0
        } else {
            0.0
        }
    }
}
