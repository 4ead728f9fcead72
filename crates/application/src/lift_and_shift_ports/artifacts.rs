use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Kind of file produced by a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Persisted binding set for staged execution.
    Checkpoint,
    /// Per-candidate consolidation decisions.
    DecisionReport,
    /// Dataset-level access declarations.
    DatasetAccess,
    /// Table-level access declarations.
    TableAccess,
}

impl ArtifactKind {
    /// Returns a stable storage value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Checkpoint => "checkpoint",
            Self::DecisionReport => "decision_report",
            Self::DatasetAccess => "dataset_access",
            Self::TableAccess => "table_access",
        }
    }
}

impl Display for ArtifactKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Location and size of one written artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrittenArtifact {
    /// Artifact kind.
    pub kind: ArtifactKind,
    /// Where the artifact was written.
    pub location: String,
    /// Number of entries the artifact holds.
    pub entry_count: usize,
}
