// MemTotal/MemFree scanner for meminfo-style files

use super::{Labeled, PendingFields, parse_numeric};
use crate::error::{MonitorError, Result};
use crate::line_source::{LineSource, next_data_line, restoring};
use crate::models::MemoryInfo;

#[derive(Clone, Copy, PartialEq, Debug)]
enum MemoryField {
    Total,
    Free,
}

impl Labeled for MemoryField {
    const ALL: &'static [Self] = &[Self::Total, Self::Free];

    fn label(self) -> &'static str {
        match self {
            Self::Total => "MemTotal:",
            Self::Free => "MemFree:",
        }
    }
}

/// Reads total and free memory from a meminfo-style source.
///
/// Lines whose first whitespace-delimited token is exactly `MemTotal:` or
/// `MemFree:` carry the value as their second token; every other line is
/// skipped. Scanning stops once both are found, so only the first occurrence
/// of each label counts. The source offset is restored on return.
pub fn read_memory_info<S: LineSource + ?Sized>(source: &mut S) -> Result<MemoryInfo> {
    restoring(source, scan_memory_fields)
}

fn scan_memory_fields<S: LineSource + ?Sized>(source: &mut S) -> Result<MemoryInfo> {
    let mut pending = PendingFields::<MemoryField>::all();
    let mut total = 0.0;
    let mut free = 0.0;

    while !pending.is_complete() {
        let line = next_data_line(source)?.ok_or_else(|| pending.incomplete("memory info"))?;
        let mut tokens = line.split_whitespace();
        let Some(field) = tokens.next().and_then(MemoryField::from_label) else {
            continue;
        };
        if !pending.is_pending(field) {
            continue;
        }
        let value = parse_numeric(tokens.next().unwrap_or_default(), field.label())?;
        match field {
            MemoryField::Total => total = value,
            MemoryField::Free => free = value,
        }
        pending.satisfy(field);
    }

    if total < 0.0 || free < 0.0 || free > total {
        return Err(MonitorError::malformed(format!(
            "memory info has free {free} outside 0..={total}"
        )));
    }
    Ok(MemoryInfo::from_total_and_free(total, free))
}
