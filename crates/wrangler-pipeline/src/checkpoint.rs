//! Checkpoint persistence: a named, keyed JSON document store.
//!
//! Writes are atomic (temp file + rename) so a crash mid-save never leaves a
//! truncated checkpoint behind.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use wrangler_model::{
    DataProfile, PipelineState, PipelineStep, RankedTransformation, TransformationCandidate,
};

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("failed to {operation} checkpoint file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize checkpoint")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to deserialize checkpoint: {path}")]
    Deserialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to complete checkpoint save")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Durable key/document contract the orchestrator persists state through.
pub trait StateStore: Send + Sync {
    /// Persist the state under `name`, returning the storage location.
    fn save(&self, name: &str, state: &PipelineState) -> Result<PathBuf, CheckpointError>;

    /// Load the state saved under `name`, or `None` when absent.
    fn load(&self, name: &str) -> Result<Option<PipelineState>, CheckpointError>;

    /// Names of all saved states.
    fn list(&self) -> Result<Vec<String>, CheckpointError>;

    /// Remove a saved state; removing a missing state is not an error.
    fn remove(&self, name: &str) -> Result<(), CheckpointError>;
}

/// The persisted document. Every field of the pipeline state survives a
/// round-trip, plus a save timestamp.
#[derive(Debug, Serialize, Deserialize)]
struct CheckpointDocument {
    current_step: PipelineStep,
    completed_steps: Vec<PipelineStep>,
    data_profile: Option<DataProfile>,
    candidates: Vec<TransformationCandidate>,
    ranked_transformations: Vec<RankedTransformation>,
    error: Option<String>,
    saved_at: DateTime<Utc>,
}

impl CheckpointDocument {
    fn from_state(state: &PipelineState) -> Self {
        Self {
            current_step: state.current_step,
            completed_steps: state.completed_steps.clone(),
            data_profile: state.data_profile.clone(),
            candidates: state.candidates.clone(),
            ranked_transformations: state.ranked_transformations.clone(),
            error: state.error.clone(),
            saved_at: Utc::now(),
        }
    }

    fn into_state(self) -> PipelineState {
        PipelineState {
            current_step: self.current_step,
            completed_steps: self.completed_steps,
            data_profile: self.data_profile,
            candidates: self.candidates,
            ranked_transformations: self.ranked_transformations,
            error: self.error,
        }
    }
}

/// File-backed JSON store: one `<name>.state.json` per saved state.
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    dir: PathBuf,
}

impl JsonStateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn state_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.state.json"))
    }
}

impl StateStore for JsonStateStore {
    fn save(&self, name: &str, state: &PipelineState) -> Result<PathBuf, CheckpointError> {
        let path = self.state_path(name);
        let document = CheckpointDocument::from_state(state);
        let bytes = serde_json::to_vec_pretty(&document)
            .map_err(|source| CheckpointError::Serialization { source })?;

        fs::create_dir_all(&self.dir).map_err(|source| CheckpointError::Io {
            operation: "create directory for",
            path: self.dir.clone(),
            source,
        })?;

        // Write to a temp file first, then rename for atomicity.
        let temp_path = path.with_extension("json.tmp");
        let mut file = File::create(&temp_path).map_err(|source| CheckpointError::Io {
            operation: "create",
            path: temp_path.clone(),
            source,
        })?;
        file.write_all(&bytes).map_err(|source| CheckpointError::Io {
            operation: "write",
            path: temp_path.clone(),
            source,
        })?;
        file.sync_all().map_err(|source| CheckpointError::Io {
            operation: "sync",
            path: temp_path.clone(),
            source,
        })?;
        fs::rename(&temp_path, &path).map_err(|source| CheckpointError::AtomicWriteFailed {
            temp_path: temp_path.clone(),
            target_path: path.clone(),
            source,
        })?;

        info!(name, path = %path.display(), "saved pipeline checkpoint");
        Ok(path)
    }

    fn load(&self, name: &str) -> Result<Option<PipelineState>, CheckpointError> {
        let path = self.state_path(name);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path).map_err(|source| CheckpointError::Io {
            operation: "read",
            path: path.clone(),
            source,
        })?;
        let document: CheckpointDocument = serde_json::from_slice(&bytes)
            .map_err(|source| CheckpointError::Deserialization { path, source })?;
        Ok(Some(document.into_state()))
    }

    fn list(&self) -> Result<Vec<String>, CheckpointError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&self.dir).map_err(|source| CheckpointError::Io {
            operation: "read",
            path: self.dir.clone(),
            source,
        })?;
        let mut names = Vec::new();
        for entry in entries.flatten() {
            let file_name = entry.file_name();
            if let Some(name) = file_name
                .to_str()
                .and_then(|n| n.strip_suffix(".state.json"))
            {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn remove(&self, name: &str) -> Result<(), CheckpointError> {
        let path = self.state_path(name);
        if path.exists() {
            fs::remove_file(&path).map_err(|source| CheckpointError::Io {
                operation: "remove",
                path,
                source,
            })?;
        }
        Ok(())
    }
}
