//! Pure assessment logic (no IO).
//!
//! Input: the policy text (discovery) or raw scanner output plus a collection
//! timestamp (execution).
//! Output: subjects, or a verdict with its observation and findings.

#![forbid(unsafe_code)]

pub mod fingerprint;
pub mod ids;
pub mod interpret;
pub mod policy;
pub mod report;
pub mod subject;
pub mod validity;
pub mod verdict;

mod engine;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use engine::{AssessError, AssessInput, assess};
pub use interpret::{CountedOutput, InterpretError, MarkerLines, OutputInterpreter, classify};
pub use subject::discover_subjects;
pub use verdict::Verdict;
