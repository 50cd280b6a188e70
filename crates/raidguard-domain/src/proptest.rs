//! Property-based tests for verdict classification and assessment building.

use crate::engine::{AssessInput, assess};
use crate::interpret::{CountedOutput, MarkerLines, OutputInterpreter, classify};
use crate::policy::AssessmentPolicy;
use crate::subject::discover_subjects;
use crate::test_support::{SequentialIds, subject};
use crate::validity::observation_expiry;
use crate::verdict::Verdict;
use proptest::prelude::*;
use time::OffsetDateTime;

/// Timestamps between 1970 and 2200, whole seconds.
fn arb_collected() -> impl Strategy<Value = OffsetDateTime> {
    (0i64..7_258_118_400).prop_map(|secs| {
        OffsetDateTime::from_unix_timestamp(secs).expect("timestamp within supported range")
    })
}

fn arb_line() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z ]{0,20}".prop_map(|s| s),
        "[a-z ]{0,10}".prop_map(|s| format!("{s} ERROR {s}")),
    ]
}

proptest! {
    #[test]
    fn verdict_threshold_is_strictly_zero(count in 0u64..u64::MAX) {
        let verdict = Verdict::from_marker_count(count);
        prop_assert_eq!(verdict.is_compliant(), count == 0);
        prop_assert_eq!(verdict.marker_count(), count);
    }

    #[test]
    fn counted_output_round_trips_any_count(count in any::<u64>(), pad in "[ \t\n]{0,3}") {
        let output = format!("{pad}{count}{pad}");
        prop_assert_eq!(CountedOutput.marker_count(&output), Ok(count));
    }

    #[test]
    fn counted_output_never_panics(output in ".{0,200}") {
        let _ = classify(&CountedOutput, &output);
    }

    #[test]
    fn marker_lines_matches_filter_semantics(lines in prop::collection::vec(arb_line(), 0..30)) {
        let output = lines.join("\n");
        let expected = lines.iter().filter(|l| l.contains("ERROR")).count() as u64;
        prop_assert_eq!(MarkerLines::new("ERROR").marker_count(&output), Ok(expected));
    }

    #[test]
    fn expiry_is_always_after_collection(collected in arb_collected()) {
        let expires = observation_expiry(collected).expect("in range");
        prop_assert!(expires > collected);
        prop_assert_eq!(expires.time(), collected.time());
        prop_assert!(expires - collected >= time::Duration::days(28));
        prop_assert!(expires - collected <= time::Duration::days(31));
    }

    #[test]
    fn findings_exist_iff_non_compliant(count in 0u64..1_000, collected in arb_collected()) {
        let subjects = vec![subject("raid-subject-x")];
        let policy = AssessmentPolicy::default();
        let assessment = assess(
            AssessInput {
                verdict: Verdict::from_marker_count(count),
                collected,
                subjects: &subjects,
                policy: &policy,
            },
            &SequentialIds::default(),
        )
        .expect("assess");

        prop_assert_eq!(assessment.observations.len(), 1);
        let observation = &assessment.observations[0];
        prop_assert_eq!(observation.collected, collected);
        prop_assert_eq!(Some(observation.expires), observation_expiry(collected));

        if count == 0 {
            prop_assert!(assessment.findings.is_empty());
        } else {
            prop_assert_eq!(assessment.findings.len(), 1);
            prop_assert_eq!(
                &assessment.findings[0].related_observations,
                &vec![observation.id.clone()]
            );
        }
    }

    #[test]
    fn discovery_is_deterministic(policy in ".{0,200}") {
        let first = discover_subjects(&policy);
        let second = discover_subjects(&policy);
        prop_assert!(!first.is_empty());
        prop_assert_eq!(first, second);
    }
}
