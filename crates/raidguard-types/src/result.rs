use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// Stable schema identifiers for emitted documents.
pub const SCHEMA_EVALUATE_RESULT_V1: &str = "raidguard.evaluate.v1";
pub const SCHEMA_EXECUTE_RESULT_V1: &str = "raidguard.execute.v1";
pub const SCHEMA_CONFIG_V1: &str = "raidguard.config.v1";

/// Kind of assessment target. The set grows with the host runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum SubjectType {
    InventoryItem,
    Component,
    Location,
    Party,
    User,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Subject {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SubjectType,
    pub title: String,
    #[serde(default)]
    pub props: BTreeMap<String, String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Link {
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Property {
    pub name: String,
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One piece of supporting data for an observation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Evidence {
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub props: Vec<Property>,
}

/// A timestamped assertion about the state of the assessed subjects.
///
/// `expires` is always one calendar month after `collected`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Observation {
    pub id: String,
    pub title: String,
    pub description: String,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub collected: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub expires: OffsetDateTime,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub props: Vec<Property>,
    pub relevant_evidence: Vec<Evidence>,
    pub remarks: String,
}

/// A compliance conclusion. Only emitted for non-compliant verdicts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Finding {
    pub id: String,
    pub title: String,
    pub description: String,
    pub remarks: String,
    /// Ids of observations in the same result. Never empty.
    pub related_observations: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LogEntry {
    pub title: String,
    pub description: String,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub end: OffsetDateTime,
}

/// Outcome of the execution pipeline itself, independent of the verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    Success,
    Failure,
}

/// Why an execution ended in `FAILURE`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExecutionFailure {
    /// One of the `CODE_*` constants in [`crate::ids`].
    pub code: String,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EvaluateResult {
    pub subjects: Vec<Subject>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExecuteResult {
    pub status: ExecutionStatus,
    pub observations: Vec<Observation>,
    pub findings: Vec<Finding>,
    pub logs: Vec<LogEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<ExecutionFailure>,
}

impl ExecuteResult {
    /// A failed execution carries no observations, findings or logs.
    pub fn failed(code: &str, message: impl Into<String>) -> Self {
        Self {
            status: ExecutionStatus::Failure,
            observations: Vec::new(),
            findings: Vec::new(),
            logs: Vec::new(),
            failure: Some(ExecutionFailure {
                code: code.to_string(),
                message: message.into(),
            }),
        }
    }

    pub fn is_compliant(&self) -> bool {
        self.status == ExecutionStatus::Success && self.findings.is_empty()
    }
}
