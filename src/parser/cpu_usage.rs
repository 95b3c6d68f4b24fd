// Positional CPU usage summary line (top-style "Cpu(s): 2.1%us, 0.6%sy, ...")

use super::parse_numeric;
use crate::error::{MonitorError, Result};
use crate::line_source::{LineSource, restoring, skip_lines};
use crate::models::CpuUsage;

/// Lines ahead of the usage summary; their content is not interpreted.
const HEADER_LINES: usize = 2;
const MIN_TOKENS: usize = 5;
const USER_TOKEN: usize = 1;
const SYSTEM_TOKEN: usize = 2;
const IDLE_TOKEN: usize = 4;

/// Skips the header lines, then parses the usage summary line.
/// The source offset is restored on return.
pub fn read_cpu_usage_line<S: LineSource + ?Sized>(source: &mut S) -> Result<CpuUsage> {
    restoring(source, |source| {
        skip_lines(source, HEADER_LINES, "cpu usage")?;
        let line = source
            .read_next_line()?
            .ok_or_else(|| MonitorError::incomplete("cpu usage summary line is missing"))?;
        parse_cpu_usage_line(&line)
    })
}

/// Extracts user, system and idle percentages from tokens 1, 2 and 4.
/// Each token is cut at its first `%` before parsing.
pub fn parse_cpu_usage_line(line: &str) -> Result<CpuUsage> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < MIN_TOKENS {
        return Err(MonitorError::malformed(format!(
            "cpu usage line has {} tokens, expected at least {MIN_TOKENS}",
            tokens.len()
        )));
    }
    let percent = |index: usize, field: &str| {
        let token = tokens.get(index).copied().unwrap_or_default();
        parse_numeric(token.split('%').next().unwrap_or_default(), field)
    };
    Ok(CpuUsage {
        user_percent: percent(USER_TOKEN, "user usage")?,
        system_percent: percent(SYSTEM_TOKEN, "system usage")?,
        idle_percent: percent(IDLE_TOKEN, "idle")?,
    })
}
