/// Marker counted in scanner output unless configured otherwise.
pub const DEFAULT_MARKER: &str = "ERROR";

/// Domain knobs that shape the assessment record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssessmentPolicy {
    /// Failure marker the scanner output is searched for. Never empty.
    pub marker: String,
}

impl Default for AssessmentPolicy {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
        }
    }
}
