use liftmap_core::{AppError, AppResult, RunProvenance};
use liftmap_domain::Binding;
use serde::{Deserialize, Serialize};

use crate::BindingSet;

use super::WrittenArtifact;

/// Persisted binding set handed from planning to rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanCheckpoint {
    /// Run that produced the bindings.
    pub provenance: RunProvenance,
    /// Fingerprint of the binding set at write time.
    pub fingerprint: String,
    /// Dataset-level bindings.
    pub dataset_bindings: Vec<Binding>,
    /// Table-level bindings.
    pub table_bindings: Vec<Binding>,
}

impl PlanCheckpoint {
    /// Captures a binding set for persistence.
    pub fn capture(provenance: RunProvenance, bindings: &BindingSet) -> AppResult<Self> {
        Ok(Self {
            provenance,
            fingerprint: bindings.fingerprint()?,
            dataset_bindings: bindings.dataset_bindings().cloned().collect(),
            table_bindings: bindings.table_bindings().cloned().collect(),
        })
    }

    /// Rebuilds the binding set, rejecting misplaced or tampered bindings.
    pub fn into_binding_set(self) -> AppResult<BindingSet> {
        if let Some(binding) = self
            .dataset_bindings
            .iter()
            .find(|binding| binding.scope().is_table())
        {
            return Err(AppError::Validation(format!(
                "checkpoint lists table binding '{binding}' under dataset_bindings"
            )));
        }
        if let Some(binding) = self
            .table_bindings
            .iter()
            .find(|binding| !binding.scope().is_table())
        {
            return Err(AppError::Validation(format!(
                "checkpoint lists dataset binding '{binding}' under table_bindings"
            )));
        }

        BindingSet::restore(
            self.dataset_bindings.into_iter().chain(self.table_bindings),
            self.fingerprint.as_str(),
        )
    }

    /// Returns the total number of persisted bindings.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.dataset_bindings.len() + self.table_bindings.len()
    }
}

/// Storage port for plan checkpoints.
pub trait CheckpointStore: Send + Sync {
    /// Persists a checkpoint, replacing any previous one.
    fn save(&self, checkpoint: &PlanCheckpoint) -> AppResult<WrittenArtifact>;

    /// Loads the persisted checkpoint.
    fn load(&self) -> AppResult<PlanCheckpoint>;
}
