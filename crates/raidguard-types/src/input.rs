use crate::result::Subject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque host configuration: string keys to string values.
pub type Configuration = BTreeMap<String, String>;

/// Input to the discovery stage.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EvaluateInput {
    #[serde(default)]
    pub configuration: Configuration,
}

impl EvaluateInput {
    pub fn new(configuration: Configuration) -> Self {
        Self { configuration }
    }
}

/// Input to the execution stage.
///
/// `subjects` is usually the `EvaluateResult::subjects` of the same assessment;
/// it is only used to attribute the observation to subjects by id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExecuteInput {
    #[serde(default)]
    pub subjects: Vec<Subject>,
}
