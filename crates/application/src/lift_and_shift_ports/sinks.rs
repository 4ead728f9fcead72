use liftmap_core::AppResult;

use crate::{BindingSet, ConsolidationReport};

use super::WrittenArtifact;

/// Output port for the consolidation audit trail.
pub trait DecisionReportWriter: Send + Sync {
    /// Writes one entry per decision.
    fn write_report(&self, report: &ConsolidationReport) -> AppResult<WrittenArtifact>;
}

/// Output port that turns a binding set into deployable declarations.
pub trait BindingRenderer: Send + Sync {
    /// Renders every binding; returns one artifact per output kind.
    fn render(&self, bindings: &BindingSet) -> AppResult<Vec<WrittenArtifact>>;
}
