//! The `evaluate` use case: persist the policy and report subjects.

use crate::artifact::ArtifactStore;
use crate::error::ProviderError;
use raidguard_domain::discover_subjects;
use raidguard_types::{
    AssessmentContext, Configuration, EvaluateInput, EvaluateResult, ids::CONFIG_KEY_POLICY,
};
use tracing::{debug, info, info_span};

/// Input for the evaluate use case.
#[derive(Clone, Copy, Debug)]
pub struct EvaluateRequest<'a> {
    pub context: &'a AssessmentContext,
    pub input: &'a EvaluateInput,
    pub artifacts: &'a ArtifactStore,
}

/// The policy text carried by a configuration.
pub fn policy_definition(configuration: &Configuration) -> Result<&str, ProviderError> {
    configuration
        .get(CONFIG_KEY_POLICY)
        .map(String::as_str)
        .ok_or_else(|| ProviderError::MissingParameter {
            key: CONFIG_KEY_POLICY.to_string(),
        })
}

/// Write the policy artifact for the assessment, then derive its subjects.
pub fn run_evaluate(request: EvaluateRequest<'_>) -> Result<EvaluateResult, ProviderError> {
    let assessment = &request.context.assessment;
    let _span = info_span!("evaluate", %assessment).entered();

    let policy = policy_definition(&request.input.configuration)?;
    let path = request.artifacts.write(assessment, policy)?;
    debug!(%path, bytes = policy.len(), "policy artifact written");

    let subjects = discover_subjects(policy);
    info!(subjects = subjects.len(), "discovery complete");
    Ok(EvaluateResult { subjects })
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use raidguard_settings::ArtifactSettings;
    use raidguard_types::{AssessmentId, SubjectType};

    fn fixture() -> (tempfile::TempDir, ArtifactStore, AssessmentContext) {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8");
        let store = ArtifactStore::new(&ArtifactSettings {
            root,
            file_name: "raid-wireframe-config.yml".to_string(),
        });
        let ctx = AssessmentContext::new(AssessmentId::parse("plan-1").expect("id"));
        (dir, store, ctx)
    }

    fn input(pairs: &[(&str, &str)]) -> EvaluateInput {
        EvaluateInput::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn missing_policy_key_fails_without_writing() {
        let (_dir, store, ctx) = fixture();
        let input = input(&[("policy", "allow-all")]);
        let err = run_evaluate(EvaluateRequest {
            context: &ctx,
            input: &input,
            artifacts: &store,
        })
        .expect_err("missing yaml");

        assert_eq!(err.to_string(), "yaml parameter is missing");
        assert!(!store.path_for(&ctx.assessment).exists());
    }

    #[test]
    fn writes_artifact_and_returns_subject() {
        let (_dir, store, ctx) = fixture();
        let input = input(&[("yaml", "policy: allow-all")]);
        let result = run_evaluate(EvaluateRequest {
            context: &ctx,
            input: &input,
            artifacts: &store,
        })
        .expect("evaluate");

        assert_eq!(result.subjects.len(), 1);
        assert_eq!(result.subjects[0].kind, SubjectType::InventoryItem);
        assert!(result.subjects[0].id.starts_with("raid-subject-"));
        let written =
            std::fs::read_to_string(store.locate(&ctx.assessment).expect("artifact")).expect("read");
        assert_eq!(written, "policy: allow-all");
    }

    #[test]
    fn identical_configuration_yields_identical_subjects() {
        let (_dir, store, ctx) = fixture();
        let input = input(&[("yaml", "policy: allow-all")]);
        let request = EvaluateRequest {
            context: &ctx,
            input: &input,
            artifacts: &store,
        };
        let first = run_evaluate(request).expect("first");
        let second = run_evaluate(request).expect("second");
        assert_eq!(first, second);
    }

    #[test]
    fn empty_policy_is_still_written() {
        let (_dir, store, ctx) = fixture();
        let input = input(&[("yaml", "")]);
        let result = run_evaluate(EvaluateRequest {
            context: &ctx,
            input: &input,
            artifacts: &store,
        })
        .expect("evaluate");
        assert_eq!(result.subjects.len(), 1);
        assert!(store.locate(&ctx.assessment).is_ok());
    }
}
