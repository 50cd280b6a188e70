//! The `execute` use case: run the scanner and assemble the assessment record.

use crate::artifact::ArtifactStore;
use crate::clock;
use crate::error::ProviderError;
use crate::scanner::Scanner;
use raidguard_domain::ids::{IdSource, RandomIds};
use raidguard_domain::policy::AssessmentPolicy;
use raidguard_domain::{AssessInput, OutputInterpreter, Verdict, assess, classify};
use raidguard_types::{AssessmentContext, ExecuteInput, ExecuteResult, ExecutionStatus, LogEntry};
use time::OffsetDateTime;
use tracing::{info, info_span, warn};

const LOG_TITLE: &str = "Privateer raid execution";

/// Input for the execute use case.
#[derive(Clone, Copy)]
pub struct ExecuteRequest<'a> {
    pub context: &'a AssessmentContext,
    pub input: &'a ExecuteInput,
    pub artifacts: &'a ArtifactStore,
    pub scanner: &'a dyn Scanner,
    pub interpreter: &'a dyn OutputInterpreter,
    pub policy: &'a AssessmentPolicy,
}

/// Run the raid for the assessment and build its observation, findings and log.
///
/// Scanner and interpretation failures end in a `FAILURE` result. Only a
/// missing artifact (discovery never ran) and internal errors are returned as
/// `Err`.
pub fn run_execute(request: ExecuteRequest<'_>) -> Result<ExecuteResult, ProviderError> {
    run_execute_with(request, &RandomIds)
}

pub(crate) fn run_execute_with(
    request: ExecuteRequest<'_>,
    id_source: &impl IdSource,
) -> Result<ExecuteResult, ProviderError> {
    let assessment = &request.context.assessment;
    let _span = info_span!("execute", %assessment).entered();
    let start = clock::now();

    let artifact = request.artifacts.locate(assessment)?;

    let verdict = match scan_and_classify(&request, &artifact) {
        Ok(verdict) => verdict,
        Err(err) => {
            let Some(code) = err.failure_code() else {
                return Err(err);
            };
            let message = err.chain_message();
            warn!(code, %message, "execution failed");
            return Ok(ExecuteResult::failed(code, message));
        }
    };
    let assessed = assess(
        AssessInput {
            verdict,
            collected: clock::now(),
            subjects: &request.input.subjects,
            policy: request.policy,
        },
        id_source,
    )?;
    info!(
        compliant = assessed.verdict.is_compliant(),
        marker_count = assessed.verdict.marker_count(),
        findings = assessed.findings.len(),
        "assessment recorded"
    );

    let end = clock::now().max(start);
    Ok(ExecuteResult {
        status: ExecutionStatus::Success,
        observations: assessed.observations,
        findings: assessed.findings,
        logs: vec![log_entry(&request, start, end)],
        failure: None,
    })
}

fn scan_and_classify(
    request: &ExecuteRequest<'_>,
    artifact: &camino::Utf8Path,
) -> Result<Verdict, ProviderError> {
    let output = request.scanner.scan(artifact)?;
    Ok(classify(request.interpreter, &output.stdout)?)
}

fn log_entry(request: &ExecuteRequest<'_>, start: OffsetDateTime, end: OffsetDateTime) -> LogEntry {
    LogEntry {
        title: LOG_TITLE.to_string(),
        description: format!(
            "Raid executed for assessment {} using the {} output interpreter",
            request.context.assessment,
            request.interpreter.name()
        ),
        start,
        end,
    }
}
