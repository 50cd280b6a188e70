//! The provider seam: discovery and execution behind one trait.

use crate::artifact::ArtifactStore;
use crate::error::ProviderError;
use crate::evaluate::{EvaluateRequest, run_evaluate};
use crate::execute::{ExecuteRequest, run_execute};
use crate::scanner::{CommandScanner, Scanner};
use raidguard_domain::policy::AssessmentPolicy;
use raidguard_domain::{CountedOutput, MarkerLines, OutputInterpreter};
use raidguard_settings::{EffectiveSettings, OutputMode};
use raidguard_types::{
    AssessmentContext, EvaluateInput, EvaluateResult, ExecuteInput, ExecuteResult,
};

/// A compliance provider as seen by the host.
///
/// `evaluate` must run for an assessment before `execute`; the context names
/// the assessment both calls refer to.
pub trait Provider {
    fn evaluate(
        &self,
        context: &AssessmentContext,
        input: &EvaluateInput,
    ) -> Result<EvaluateResult, ProviderError>;

    fn execute(
        &self,
        context: &AssessmentContext,
        input: &ExecuteInput,
    ) -> Result<ExecuteResult, ProviderError>;
}

/// Interpreter matching how the scanner's output is delivered.
pub fn interpreter_for(
    mode: OutputMode,
    marker: &str,
) -> Box<dyn OutputInterpreter + Send + Sync> {
    match mode {
        OutputMode::Count => Box::new(CountedOutput),
        OutputMode::Raw => Box::new(MarkerLines::new(marker)),
    }
}

/// The Privateer raid provider.
pub struct RaidProvider {
    artifacts: ArtifactStore,
    scanner: Box<dyn Scanner + Send + Sync>,
    interpreter: Box<dyn OutputInterpreter + Send + Sync>,
    policy: AssessmentPolicy,
}

impl RaidProvider {
    /// Provider running the configured scanner command.
    pub fn new(settings: &EffectiveSettings) -> Self {
        let scanner = CommandScanner::new(settings.scanner.clone(), settings.policy.marker.clone());
        Self::with_scanner(settings, scanner)
    }

    /// Provider with a caller-supplied scanner (used by tests and embedders).
    pub fn with_scanner(
        settings: &EffectiveSettings,
        scanner: impl Scanner + Send + Sync + 'static,
    ) -> Self {
        Self {
            artifacts: ArtifactStore::new(&settings.artifacts),
            scanner: Box::new(scanner),
            interpreter: interpreter_for(settings.scanner.output, &settings.policy.marker),
            policy: settings.policy.clone(),
        }
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }
}

impl Provider for RaidProvider {
    fn evaluate(
        &self,
        context: &AssessmentContext,
        input: &EvaluateInput,
    ) -> Result<EvaluateResult, ProviderError> {
        run_evaluate(EvaluateRequest {
            context,
            input,
            artifacts: &self.artifacts,
        })
    }

    fn execute(
        &self,
        context: &AssessmentContext,
        input: &ExecuteInput,
    ) -> Result<ExecuteResult, ProviderError> {
        run_execute(ExecuteRequest {
            context,
            input,
            artifacts: &self.artifacts,
            scanner: self.scanner.as_ref(),
            interpreter: self.interpreter.as_ref(),
            policy: &self.policy,
        })
    }
}
