//! Identifier generation for observations and findings.

/// Source of unique ids for records produced by one execution.
pub trait IdSource {
    fn next_id(&self) -> String;
}

/// Random UUID v4 ids (the default for real executions).
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}
