//! File persistence for trained models.
//!
//! [`ModelStore`] owns one artifact path. [`save()`](ModelStore::save) writes
//! a sibling temporary file and renames it over the target, so a concurrent
//! reader sees either the old artifact or the new one, never a partial write.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::LearningError;
use crate::model::TrainedModel;

/// Reads and writes the model artifact at a fixed path.
#[derive(Debug, Clone)]
pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether an artifact currently exists.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load and validate the artifact.
    ///
    /// # Errors
    ///
    /// - [`LearningError::ArtifactNotFound`] if there is no file at the path
    /// - [`LearningError::CorruptArtifact`] if the file does not describe a valid model
    /// - [`LearningError::Io`] if the file exists but cannot be read
    #[must_use = "returns the loaded model; use it or handle the error"]
    pub fn load(&self) -> Result<TrainedModel, LearningError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(LearningError::ArtifactNotFound {
                    path: self.path.display().to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let model = TrainedModel::from_bytes(&bytes)?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "Model artifact loaded");
        Ok(model)
    }

    /// Write the artifact, replacing any previous one. Parent directories are
    /// created as needed.
    ///
    /// # Errors
    ///
    /// Returns [`LearningError::Io`] if the file cannot be written or renamed.
    pub fn save(&self, model: &TrainedModel) -> Result<(), LearningError> {
        let bytes = model.to_bytes()?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.temp_path();
        let written = fs::File::create(&tmp).and_then(|mut file| {
            file.write_all(&bytes)?;
            file.sync_all()
        });
        if let Err(e) = written.and_then(|()| fs::rename(&tmp, &self.path)) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        debug!(path = %self.path.display(), bytes = bytes.len(), "Model artifact saved");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "model".into());
        name.push(format!(".{}.tmp", std::process::id()));
        self.path.with_file_name(name)
    }
}
