// Telemetry value models

mod cpu;
mod measurement;
mod memory;

pub use cpu::{CpuConfiguration, CpuInfo, CpuUsage};
pub use measurement::Measurement;
pub use memory::MemoryInfo;
