//! JSON rendering of provider results and the exit-code mapping.

use anyhow::Context;
use raidguard_types::{EvaluateResult, ExecuteResult, ExecutionStatus};

pub fn serialize_evaluate_result(result: &EvaluateResult) -> anyhow::Result<Vec<u8>> {
    to_pretty_json(result).context("serialize evaluate result")
}

pub fn serialize_execute_result(result: &ExecuteResult) -> anyhow::Result<Vec<u8>> {
    to_pretty_json(result).context("serialize execute result")
}

/// Parse a previously written evaluate result (e.g. to feed `execute`).
pub fn parse_evaluate_result(text: &str) -> anyhow::Result<EvaluateResult> {
    serde_json::from_str(text).context("parse evaluate result JSON")
}

/// 0 compliant, 2 non-compliant, 1 execution failure.
pub fn execute_exit_code(result: &ExecuteResult) -> i32 {
    match result.status {
        ExecutionStatus::Failure => 1,
        ExecutionStatus::Success if result.findings.is_empty() => 0,
        ExecutionStatus::Success => 2,
    }
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(value)?;
    bytes.push(b'\n');
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use raidguard_types::{Finding, Subject, SubjectType};
    use std::collections::BTreeMap;

    fn success(findings: Vec<Finding>) -> ExecuteResult {
        ExecuteResult {
            status: ExecutionStatus::Success,
            observations: Vec::new(),
            findings,
            logs: Vec::new(),
            failure: None,
        }
    }

    fn finding() -> Finding {
        Finding {
            id: "f-1".to_string(),
            title: "t".to_string(),
            description: "d".to_string(),
            remarks: "r".to_string(),
            related_observations: vec!["o-1".to_string()],
        }
    }

    #[test]
    fn exit_codes() {
        assert_eq!(execute_exit_code(&success(Vec::new())), 0);
        assert_eq!(execute_exit_code(&success(vec![finding()])), 2);
        assert_eq!(
            execute_exit_code(&ExecuteResult::failed("scanner_invocation", "boom")),
            1
        );
    }

    #[test]
    fn failure_result_serializes_status_and_code() {
        let bytes =
            serialize_execute_result(&ExecuteResult::failed("scanner_timeout", "slow")).expect("json");
        let value: serde_json::Value = serde_json::from_slice(&bytes).expect("parse");
        assert_eq!(value["status"], "FAILURE");
        assert_eq!(value["failure"]["code"], "scanner_timeout");
        assert_eq!(value["observations"], serde_json::json!([]));
        assert!(bytes.ends_with(b"\n"));
    }

    #[test]
    fn success_result_omits_failure() {
        let bytes = serialize_execute_result(&success(Vec::new())).expect("json");
        let value: serde_json::Value = serde_json::from_slice(&bytes).expect("parse");
        assert_eq!(value["status"], "SUCCESS");
        assert!(value.get("failure").is_none());
    }

    #[test]
    fn evaluate_result_round_trips_through_json() {
        let result = EvaluateResult {
            subjects: vec![Subject {
                id: "raid-subject-0011223344556677".to_string(),
                kind: SubjectType::InventoryItem,
                title: "Privateer Raid Subject".to_string(),
                props: BTreeMap::from([(
                    "id".to_string(),
                    "raid-subject-0011223344556677".to_string(),
                )]),
            }],
        };
        let bytes = serialize_evaluate_result(&result).expect("json");
        let text = String::from_utf8(bytes).expect("utf8");
        assert!(text.contains("\"type\": \"INVENTORY_ITEM\""));
        assert_eq!(parse_evaluate_result(&text).expect("parse"), result);
    }

    #[test]
    fn parse_rejects_malformed_json() {
        assert!(parse_evaluate_result("{\"subjects\": 3}").is_err());
    }
}
