use crate::ids::IdSource;
use crate::policy::AssessmentPolicy;
use crate::report::Assessment;
use crate::validity::observation_expiry;
use crate::verdict::Verdict;
use raidguard_types::{Evidence, Finding, Observation, Property, Subject, ids};
use time::OffsetDateTime;

const OBSERVATION_TITLE: &str = "Privateer Raid Observation";
const FINDING_TITLE: &str = "Privateer raid reported failures";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AssessError {
    #[error("observation collected at {collected} has no representable expiry")]
    ExpiryOutOfRange { collected: OffsetDateTime },
}

/// Everything needed to turn a verdict into an assessment record.
#[derive(Clone, Debug)]
pub struct AssessInput<'a> {
    pub verdict: Verdict,
    pub collected: OffsetDateTime,
    /// Subjects the observation is attributed to (may be empty).
    pub subjects: &'a [Subject],
    pub policy: &'a AssessmentPolicy,
}

/// Build the observation, and for non-compliant verdicts the finding.
///
/// Exactly one observation is produced. A finding is produced only when the
/// verdict is non-compliant, and it references that observation.
pub fn assess(
    input: AssessInput<'_>,
    id_source: &impl IdSource,
) -> Result<Assessment, AssessError> {
    let expires =
        observation_expiry(input.collected).ok_or(AssessError::ExpiryOutOfRange {
            collected: input.collected,
        })?;

    let observation_id = id_source.next_id();
    let marker = input.policy.marker.as_str();
    let marker_count = input.verdict.marker_count();

    let evidence = Evidence {
        description: match input.verdict {
            Verdict::Compliant => "Raid ran and succeeded".to_string(),
            Verdict::NonCompliant { .. } => "Raid ran and failed".to_string(),
        },
        links: Vec::new(),
        props: vec![
            Property::new(ids::PROP_MARKER, marker),
            Property::new(ids::PROP_MARKER_COUNT, marker_count.to_string()),
        ],
    };

    let props = input
        .subjects
        .iter()
        .map(|s| Property::new(ids::PROP_SUBJECT, s.id.as_str()))
        .collect();

    let (description, remarks) = match input.verdict {
        Verdict::Compliant => (
            "Privateer raid completed and the assessment succeeded".to_string(),
            "All OK.".to_string(),
        ),
        Verdict::NonCompliant { marker_count } => (
            "Privateer raid completed and the assessment failed".to_string(),
            format!("{marker_count} line(s) of raid output contained the failure marker `{marker}`."),
        ),
    };

    let observation = Observation {
        id: observation_id.clone(),
        title: OBSERVATION_TITLE.to_string(),
        description,
        collected: input.collected,
        expires,
        links: Vec::new(),
        props,
        relevant_evidence: vec![evidence],
        remarks,
    };

    let findings = match input.verdict {
        Verdict::Compliant => Vec::new(),
        Verdict::NonCompliant { marker_count } => vec![Finding {
            id: id_source.next_id(),
            title: FINDING_TITLE.to_string(),
            description: format!(
                "The raid reported {marker_count} failure marker(s) (`{marker}`); the assessed subject is non-compliant."
            ),
            remarks: "Review the raid output and remediate the failing checks before the observation expires.".to_string(),
            related_observations: vec![observation_id],
        }],
    };

    Ok(Assessment {
        verdict: input.verdict,
        observations: vec![observation],
        findings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{SequentialIds, collected_at, subject};
    use time::macros::datetime;

    #[test]
    fn compliant_verdict_yields_observation_only() {
        let policy = AssessmentPolicy::default();
        let subjects = vec![subject("raid-subject-1")];
        let ids = SequentialIds::default();

        let assessment = assess(
            AssessInput {
                verdict: Verdict::Compliant,
                collected: collected_at(),
                subjects: &subjects,
                policy: &policy,
            },
            &ids,
        )
        .expect("assess");

        assert_eq!(assessment.verdict, Verdict::Compliant);
        assert!(assessment.findings.is_empty());
        assert_eq!(assessment.observations.len(), 1);
        let obs = &assessment.observations[0];
        assert_eq!(obs.id, "id-1");
        assert!(obs.description.ends_with("succeeded"));
        assert_eq!(obs.remarks, "All OK.");
        assert_eq!(obs.relevant_evidence.len(), 1);
        assert_eq!(obs.relevant_evidence[0].description, "Raid ran and succeeded");
        assert_eq!(obs.props, vec![Property::new("subject", "raid-subject-1")]);
    }

    #[test]
    fn non_compliant_verdict_links_finding_to_observation() {
        let policy = AssessmentPolicy::default();
        let ids = SequentialIds::default();

        let assessment = assess(
            AssessInput {
                verdict: Verdict::NonCompliant { marker_count: 3 },
                collected: collected_at(),
                subjects: &[],
                policy: &policy,
            },
            &ids,
        )
        .expect("assess");

        assert_eq!(assessment.verdict, Verdict::NonCompliant { marker_count: 3 });
        assert_eq!(assessment.observations.len(), 1);
        assert_eq!(assessment.findings.len(), 1);
        let obs = &assessment.observations[0];
        let finding = &assessment.findings[0];
        assert!(obs.description.ends_with("failed"));
        assert_eq!(obs.relevant_evidence[0].description, "Raid ran and failed");
        assert_eq!(finding.related_observations, vec![obs.id.clone()]);
        assert_ne!(finding.id, obs.id);
        assert!(finding.description.contains("3 failure marker(s)"));
        assert!(obs.props.is_empty());
    }

    #[test]
    fn evidence_records_marker_and_count() {
        let policy = AssessmentPolicy {
            marker: "FAIL".to_string(),
        };
        let assessment = assess(
            AssessInput {
                verdict: Verdict::NonCompliant { marker_count: 7 },
                collected: collected_at(),
                subjects: &[],
                policy: &policy,
            },
            &SequentialIds::default(),
        )
        .expect("assess");

        let evidence = &assessment.observations[0].relevant_evidence[0];
        assert_eq!(
            evidence.props,
            vec![
                Property::new("marker", "FAIL"),
                Property::new("marker_count", "7"),
            ]
        );
    }

    #[test]
    fn expiry_is_one_month_after_collection() {
        let assessment = assess(
            AssessInput {
                verdict: Verdict::Compliant,
                collected: datetime!(2025-01-31 10:15:00 UTC),
                subjects: &[],
                policy: &AssessmentPolicy::default(),
            },
            &SequentialIds::default(),
        )
        .expect("assess");

        let obs = &assessment.observations[0];
        assert_eq!(obs.expires, datetime!(2025-03-03 10:15:00 UTC));
    }

    #[test]
    fn unrepresentable_expiry_is_an_error() {
        let collected = datetime!(9999-12-15 00:00:00 UTC);
        let err = assess(
            AssessInput {
                verdict: Verdict::Compliant,
                collected,
                subjects: &[],
                policy: &AssessmentPolicy::default(),
            },
            &SequentialIds::default(),
        )
        .expect_err("out of range");
        assert_eq!(err, AssessError::ExpiryOutOfRange { collected });
    }
}
