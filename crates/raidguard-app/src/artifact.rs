//! Per-assessment policy artifact storage.

use crate::error::ProviderError;
use camino::Utf8PathBuf;
use raidguard_settings::ArtifactSettings;
use raidguard_types::AssessmentId;
use std::fs;

/// Resolves and writes `<root>/<assessment>/<file_name>`.
#[derive(Clone, Debug)]
pub struct ArtifactStore {
    root: Utf8PathBuf,
    file_name: String,
}

impl ArtifactStore {
    pub fn new(settings: &ArtifactSettings) -> Self {
        Self {
            root: settings.root.clone(),
            file_name: settings.file_name.clone(),
        }
    }

    pub fn path_for(&self, assessment: &AssessmentId) -> Utf8PathBuf {
        self.root.join(assessment.as_str()).join(&self.file_name)
    }

    /// Write `policy` verbatim, replacing any previous artifact of the assessment.
    ///
    /// The text goes to a sibling temp file first and is renamed into place, so
    /// a concurrent reader never sees a partial policy.
    pub fn write(
        &self,
        assessment: &AssessmentId,
        policy: &str,
    ) -> Result<Utf8PathBuf, ProviderError> {
        let path = self.path_for(assessment);
        let write_err = |source| ProviderError::ArtifactWrite {
            path: path.clone(),
            source,
        };

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(write_err)?;
        }
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, policy).map_err(write_err)?;
        if let Err(source) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(write_err(source));
        }
        Ok(path)
    }

    /// Path of an existing artifact, or `ArtifactMissing`.
    pub fn locate(&self, assessment: &AssessmentId) -> Result<Utf8PathBuf, ProviderError> {
        let path = self.path_for(assessment);
        if path.is_file() {
            Ok(path)
        } else {
            Err(ProviderError::ArtifactMissing { path })
        }
    }
}
