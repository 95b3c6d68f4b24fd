// One sampler tick: memory and CPU snapshots taken together

use serde::{Deserialize, Serialize};
use wincode::{SchemaRead, SchemaWrite};

use super::{CpuInfo, MemoryInfo};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SchemaRead, SchemaWrite)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub memory: MemoryInfo,
    pub cpu: CpuInfo,
}
