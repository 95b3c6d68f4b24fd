// Parsers for /proc-style telemetry files.
//
// Label-driven readers (memory, cpu blocks) track which fields are still
// pending; the usage reader is positional. Every public reader restores the
// source offset on return.

mod cpu_config;
mod cpu_usage;
mod memory;

pub use cpu_config::read_all_cpu_blocks;
pub use cpu_usage::{parse_cpu_usage_line, read_cpu_usage_line};
pub use memory::read_memory_info;

use crate::error::{MonitorError, Result};

/// A fixed set of labelled fields a reader must locate.
pub(crate) trait Labeled: Copy + PartialEq + 'static {
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    /// Exact match against a trimmed label.
    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.label() == label)
    }
}

/// Fields not yet located during one read. A field leaves the set on its
/// first match; later occurrences of the same label are ignored.
pub(crate) struct PendingFields<F> {
    pending: Vec<F>,
}

impl<F: Labeled> PendingFields<F> {
    pub(crate) fn all() -> Self {
        Self {
            pending: F::ALL.to_vec(),
        }
    }

    pub(crate) fn is_pending(&self, field: F) -> bool {
        self.pending.contains(&field)
    }

    pub(crate) fn satisfy(&mut self, field: F) {
        self.pending.retain(|f| *f != field);
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }

    /// `IncompleteData` naming every label still missing.
    pub(crate) fn incomplete(&self, what: &str) -> MonitorError {
        let missing: Vec<&str> = self.pending.iter().map(|f| f.label()).collect();
        MonitorError::incomplete(format!("{what} is missing {}", missing.join(", ")))
    }
}

/// Parses a token made only of ASCII digits, `.` and `-`.
///
/// Exponents, signs other than `-`, `inf` and `NaN` are rejected even though
/// `f64::from_str` would take them.
pub(crate) fn parse_numeric(token: &str, field: &str) -> Result<f64> {
    let numeric_chars = !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.' || c == '-');
    match token.parse::<f64>() {
        Ok(value) if numeric_chars => Ok(value),
        _ => {
            tracing::debug!(field, token, "non-numeric field value");
            Err(MonitorError::malformed(format!(
                "{field} value {token:?} is not numeric"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Debug)]
    enum Probe {
        A,
        B,
    }

    impl Labeled for Probe {
        const ALL: &'static [Self] = &[Self::A, Self::B];

        fn label(self) -> &'static str {
            match self {
                Self::A => "a:",
                Self::B => "b:",
            }
        }
    }

    #[test]
    fn parse_numeric_accepts_plain_decimals() {
        assert_eq!(parse_numeric("1000", "x").unwrap(), 1000.0);
        assert_eq!(parse_numeric("12.99", "x").unwrap(), 12.99);
        assert_eq!(parse_numeric("-3.5", "x").unwrap(), -3.5);
    }

    #[test]
    fn parse_numeric_rejects_everything_else() {
        for token in ["", "abc", "1e5", "+1", "inf", "NaN", "1-2", "1.2.3", "12kB"] {
            let err = parse_numeric(token, "field").unwrap_err();
            assert!(
                matches!(err, MonitorError::MalformedRecord(_)),
                "{token:?} should be malformed"
            );
        }
    }

    #[test]
    fn pending_fields_track_first_match_only() {
        let mut pending = PendingFields::<Probe>::all();
        assert_eq!(Probe::from_label("a:"), Some(Probe::A));
        assert_eq!(Probe::from_label(" a:"), None);
        assert!(pending.is_pending(Probe::A));
        pending.satisfy(Probe::A);
        assert!(!pending.is_pending(Probe::A));
        assert!(!pending.is_complete());
        let msg = pending.incomplete("probe").to_string();
        assert!(msg.contains("b:"));
        assert!(!msg.contains("a:"));
        pending.satisfy(Probe::B);
        assert!(pending.is_complete());
    }
}
