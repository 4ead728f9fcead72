use std::path::PathBuf;

use liftmap_application::{ArtifactKind, CheckpointStore, PlanCheckpoint, WrittenArtifact};
use liftmap_core::{AppError, AppResult};

use crate::file_io::{read_text, write_atomically};

/// Checkpoint store writing one pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct JsonCheckpointStore {
    path: PathBuf,
}

impl JsonCheckpointStore {
    /// Creates a store bound to a checkpoint file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CheckpointStore for JsonCheckpointStore {
    fn save(&self, checkpoint: &PlanCheckpoint) -> AppResult<WrittenArtifact> {
        let mut encoded = serde_json::to_vec_pretty(checkpoint).map_err(|error| {
            AppError::Internal(format!("failed to encode plan checkpoint: {error}"))
        })?;
        encoded.push(b'\n');
        write_atomically(&self.path, &encoded, "plan checkpoint")?;

        Ok(WrittenArtifact {
            kind: ArtifactKind::Checkpoint,
            location: self.path.display().to_string(),
            entry_count: checkpoint.binding_count(),
        })
    }

    fn load(&self) -> AppResult<PlanCheckpoint> {
        let text = read_text(&self.path, "plan checkpoint")?;
        serde_json::from_str(&text).map_err(|error| {
            AppError::Validation(format!(
                "plan checkpoint '{}' is not valid: {error}",
                self.path.display()
            ))
        })
    }
}
