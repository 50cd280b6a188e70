//! Use case orchestration for raidguard.
//!
//! This crate provides the application layer: the provider entry points that coordinate
//! the artifact store, the scanner subprocess, and the pure domain logic.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod artifact;
mod clock;
mod error;
mod evaluate;
mod execute;
mod provider;
mod render;
mod scanner;

pub use artifact::ArtifactStore;
pub use error::ProviderError;
pub use evaluate::{EvaluateRequest, policy_definition, run_evaluate};
pub use execute::{ExecuteRequest, run_execute};
pub use provider::{Provider, RaidProvider, interpreter_for};
pub use render::{
    execute_exit_code, parse_evaluate_result, serialize_evaluate_result,
    serialize_execute_result,
};
pub use scanner::{CommandScanner, ScanError, ScanOutput, Scanner};
