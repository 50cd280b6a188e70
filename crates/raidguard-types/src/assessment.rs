use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_LEN: usize = 128;

/// Name of one assessment, shared by its discovery and execution calls.
///
/// The id doubles as a directory name for the assessment's artifact, so it is
/// restricted to `[A-Za-z0-9._-]`, 1..=128 characters, and never `.` or `..`.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(try_from = "String", into = "String")]
pub struct AssessmentId(String);

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidAssessmentId {
    #[error("assessment id is empty")]
    Empty,
    #[error("assessment id exceeds 128 characters")]
    TooLong,
    #[error("assessment id may not be `.` or `..`")]
    Reserved,
    #[error("assessment id contains invalid character {0:?} (allowed: A-Z a-z 0-9 . _ -)")]
    InvalidChar(char),
}

impl AssessmentId {
    pub fn parse<S: AsRef<str>>(s: S) -> Result<Self, InvalidAssessmentId> {
        let s = s.as_ref();
        if s.is_empty() {
            return Err(InvalidAssessmentId::Empty);
        }
        if s.len() > MAX_LEN {
            return Err(InvalidAssessmentId::TooLong);
        }
        if s == "." || s == ".." {
            return Err(InvalidAssessmentId::Reserved);
        }
        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
        {
            return Err(InvalidAssessmentId::InvalidChar(c));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AssessmentId {
    type Error = InvalidAssessmentId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        AssessmentId::parse(value)
    }
}

impl From<AssessmentId> for String {
    fn from(value: AssessmentId) -> Self {
        value.0
    }
}

/// Explicit context threaded through both provider stages.
///
/// Discovery writes the policy artifact for `assessment`; execution reads the
/// artifact of the same assessment. Nothing else is shared between the stages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssessmentContext {
    pub assessment: AssessmentId,
}

impl AssessmentContext {
    pub fn new(assessment: AssessmentId) -> Self {
        Self { assessment }
    }
}
