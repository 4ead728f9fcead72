use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::RunId;

/// Who produced a persisted artifact and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunProvenance {
    run_id: RunId,
    generated_at: DateTime<Utc>,
    tool_version: String,
}

impl RunProvenance {
    /// Stamps a fresh run with the current time.
    #[must_use]
    pub fn start(tool_version: impl Into<String>) -> Self {
        Self::new(RunId::new(), Utc::now(), tool_version)
    }

    /// Creates provenance from existing values.
    #[must_use]
    pub fn new(
        run_id: RunId,
        generated_at: DateTime<Utc>,
        tool_version: impl Into<String>,
    ) -> Self {
        Self {
            run_id,
            generated_at,
            tool_version: tool_version.into(),
        }
    }

    /// Returns the run identifier.
    #[must_use]
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Returns when the run produced its artifacts.
    #[must_use]
    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Returns the version of the tool that produced the run.
    #[must_use]
    pub fn tool_version(&self) -> &str {
        self.tool_version.as_str()
    }
}
