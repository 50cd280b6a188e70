//! Output interpreters: strategies that reduce raw scanner output to a count
//! of failure markers.

use crate::verdict::Verdict;

/// Longest output excerpt kept in a parse error.
const EXCERPT_LEN: usize = 64;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InterpretError {
    #[error("scanner produced no output")]
    Empty,
    #[error("scanner output is not a marker count: {excerpt:?}")]
    NotACount { excerpt: String },
}

/// Reduces scanner output to the number of failure markers it reports.
pub trait OutputInterpreter {
    /// Short stable name, used in logs.
    fn name(&self) -> &'static str;

    fn marker_count(&self, output: &str) -> Result<u64, InterpretError>;
}

/// Interpret `output` and apply the zero/non-zero verdict threshold.
pub fn classify(
    interpreter: &dyn OutputInterpreter,
    output: &str,
) -> Result<Verdict, InterpretError> {
    interpreter
        .marker_count(output)
        .map(Verdict::from_marker_count)
}

/// Output already reduced to a count by an external filter (`grep -c`).
///
/// The trimmed output must be a single run of ASCII digits.
#[derive(Clone, Copy, Debug, Default)]
pub struct CountedOutput;

impl OutputInterpreter for CountedOutput {
    fn name(&self) -> &'static str {
        "count"
    }

    fn marker_count(&self, output: &str) -> Result<u64, InterpretError> {
        let trimmed = output.trim();
        if trimmed.is_empty() {
            return Err(InterpretError::Empty);
        }
        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(not_a_count(trimmed));
        }
        trimmed.parse::<u64>().map_err(|_| not_a_count(trimmed))
    }
}

/// Raw scanner output: counts lines containing the marker, like `grep -c`.
#[derive(Clone, Debug)]
pub struct MarkerLines {
    marker: String,
}

impl MarkerLines {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }
}

impl OutputInterpreter for MarkerLines {
    fn name(&self) -> &'static str {
        "raw"
    }

    fn marker_count(&self, output: &str) -> Result<u64, InterpretError> {
        Ok(output
            .lines()
            .filter(|line| line.contains(self.marker.as_str()))
            .count() as u64)
    }
}

fn not_a_count(output: &str) -> InterpretError {
    InterpretError::NotACount {
        excerpt: output.chars().take(EXCERPT_LEN).collect(),
    }
}
