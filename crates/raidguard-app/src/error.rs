use crate::scanner::ScanError;
use camino::Utf8PathBuf;
use raidguard_domain::{AssessError, InterpretError};
use raidguard_types::ids;
use std::error::Error as _;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{key} parameter is missing")]
    MissingParameter { key: String },

    #[error("failed to write policy artifact {path}")]
    ArtifactWrite {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("policy artifact {path} not found; run discovery for this assessment first")]
    ArtifactMissing { path: Utf8PathBuf },

    #[error("scanner invocation failed")]
    ScannerInvocation(#[from] ScanError),

    #[error("scanner output could not be interpreted")]
    OutputParse(#[from] InterpretError),

    #[error("assessment could not be built")]
    Assessment(#[from] AssessError),
}

impl ProviderError {
    /// Failure code for errors that end an execution with `FAILURE` status
    /// rather than being returned to the caller.
    pub fn failure_code(&self) -> Option<&'static str> {
        match self {
            ProviderError::ScannerInvocation(ScanError::TimedOut { .. }) => {
                Some(ids::CODE_SCANNER_TIMEOUT)
            }
            ProviderError::ScannerInvocation(_) => Some(ids::CODE_SCANNER_INVOCATION),
            ProviderError::OutputParse(_) => Some(ids::CODE_OUTPUT_PARSE),
            _ => None,
        }
    }

    /// The error and its sources, joined with `: `.
    pub fn chain_message(&self) -> String {
        let mut message = self.to_string();
        let mut source = self.source();
        while let Some(err) = source {
            message.push_str(": ");
            message.push_str(&err.to_string());
            source = err.source();
        }
        message
    }
}
