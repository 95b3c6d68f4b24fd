// Blank-line-delimited CPU blocks from cpuinfo-style files

use super::{Labeled, PendingFields, parse_numeric};
use crate::error::{MonitorError, Result};
use crate::line_source::{LineSource, next_data_line, restoring, skip_past_blank_line};
use crate::models::CpuConfiguration;

/// Unit marker trailing the cache size value.
const CACHE_SIZE_UNIT: &str = "KB";

#[derive(Clone, Copy, PartialEq, Debug)]
enum CpuField {
    ModelName,
    Frequency,
    CacheSize,
}

impl Labeled for CpuField {
    const ALL: &'static [Self] = &[Self::ModelName, Self::Frequency, Self::CacheSize];

    fn label(self) -> &'static str {
        match self {
            Self::ModelName => "model name",
            Self::Frequency => "cpu MHz",
            Self::CacheSize => "cache size",
        }
    }
}

/// Reads every CPU block, in file order.
///
/// A block ends at a blank line. Within a block the `model name`, `cpu MHz`
/// and `cache size` fields may appear in any order among unrelated lines;
/// once all three are found the rest of the block is skipped. Another block
/// follows when the next line exists and is not blank. The source offset is
/// restored on return.
pub fn read_all_cpu_blocks<S>(source: &mut S) -> Result<Vec<CpuConfiguration>>
where
    S: LineSource + ?Sized,
{
    restoring(source, |source| {
        let mut cpus = Vec::new();
        loop {
            cpus.push(read_cpu_block(source)?);
            if !more_blocks_follow(source)? {
                break;
            }
        }
        Ok(cpus)
    })
}

fn more_blocks_follow<S: LineSource + ?Sized>(source: &mut S) -> Result<bool> {
    Ok(source.peek_next_line()?.is_some_and(|line| !line.is_empty()))
}

fn read_cpu_block<S: LineSource + ?Sized>(source: &mut S) -> Result<CpuConfiguration> {
    let mut pending = PendingFields::<CpuField>::all();
    let mut model_name = String::new();
    let mut frequency_mhz = 0.0;
    let mut cache_size_kb = 0.0;

    while !pending.is_complete() {
        let line = next_data_line(source)?.ok_or_else(|| pending.incomplete("cpu info block"))?;
        let (label, value) = match line.split_once(':') {
            Some((label, value)) => (label.trim(), Some(value)),
            None => (line.trim(), None),
        };
        let Some(field) = CpuField::from_label(label) else {
            continue;
        };
        if !pending.is_pending(field) {
            continue;
        }
        let value = value.ok_or_else(|| {
            MonitorError::malformed(format!("cpu info field {label:?} has no value"))
        })?;

        match field {
            CpuField::ModelName => {
                let name = value.trim();
                if name.is_empty() {
                    return Err(MonitorError::malformed("cpu info has an empty model name"));
                }
                model_name = name.to_string();
            }
            CpuField::Frequency => {
                frequency_mhz = parse_numeric(value.trim(), label)?;
                if frequency_mhz <= 0.0 {
                    return Err(MonitorError::malformed(format!(
                        "cpu frequency {frequency_mhz} is not positive"
                    )));
                }
            }
            CpuField::CacheSize => {
                let number = value.split(CACHE_SIZE_UNIT).next().unwrap_or_default();
                cache_size_kb = parse_numeric(number.trim(), label)?;
                if cache_size_kb < 0.0 {
                    return Err(MonitorError::malformed(format!(
                        "cache size {cache_size_kb} is negative"
                    )));
                }
            }
        }
        pending.satisfy(field);
    }

    skip_past_blank_line(source)?;
    Ok(CpuConfiguration {
        frequency_mhz,
        model_name,
        cache_size_kb,
    })
}
