use crate::fingerprint::{SUBJECT_ID_DIGEST_LEN, policy_digest};
use raidguard_types::{Subject, SubjectType, ids};
use std::collections::BTreeMap;

pub const SUBJECT_TITLE: &str = "Privateer Raid Subject";

/// Resolve a policy definition into the subjects it assesses.
///
/// Subject ids derive from the policy digest only, so repeated discovery of
/// the same policy yields the same ids. Today a policy describes exactly one
/// subject.
pub fn discover_subjects(policy: &str) -> Vec<Subject> {
    let digest = policy_digest(policy);
    let id = format!("raid-subject-{}", &digest[..SUBJECT_ID_DIGEST_LEN]);

    let mut props = BTreeMap::new();
    props.insert(ids::PROP_ID.to_string(), id.clone());
    props.insert(ids::PROP_POLICY_SHA256.to_string(), digest);

    vec![Subject {
        id,
        kind: SubjectType::InventoryItem,
        title: SUBJECT_TITLE.to_string(),
        props,
    }]
}
