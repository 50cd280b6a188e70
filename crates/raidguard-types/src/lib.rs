//! Stable DTOs and IDs used across the raidguard workspace.
//!
//! This crate is intentionally boring:
//! - data types for the provider contract (inputs and results)
//! - stable string keys, property names and failure codes
//! - the assessment identity that ties discovery to execution

#![forbid(unsafe_code)]

pub mod assessment;
pub mod ids;
pub mod input;
pub mod result;

pub use assessment::{AssessmentContext, AssessmentId, InvalidAssessmentId};
pub use input::{Configuration, EvaluateInput, ExecuteInput};
pub use result::{
    EvaluateResult, Evidence, ExecuteResult, ExecutionFailure, ExecutionStatus, Finding, Link,
    LogEntry, Observation, Property, SCHEMA_CONFIG_V1, SCHEMA_EVALUATE_RESULT_V1,
    SCHEMA_EXECUTE_RESULT_V1, Subject, SubjectType,
};
