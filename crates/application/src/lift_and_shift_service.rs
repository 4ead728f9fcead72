use std::sync::Arc;

use liftmap_core::RunProvenance;

use crate::lift_and_shift_ports::{
    AccessMapSource, BindingRenderer, CheckpointStore, DecisionReportWriter, PlanCheckpoint,
    WrittenArtifact,
};
use crate::{BindingSet, ConsolidationReport, Consolidator, GrantMapper};

mod planning;
mod rendering;

#[cfg(test)]
mod tests;

/// Result of the planning stage.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    /// Minimal bindings to grant.
    pub bindings: BindingSet,
    /// Checkpoint written for the bindings.
    pub checkpoint: PlanCheckpoint,
    /// Fate of every candidate grant.
    pub report: ConsolidationReport,
    /// Input rows whose access right has no target role.
    pub not_applicable_rows: Vec<usize>,
    /// Checkpoint and report files.
    pub artifacts: Vec<WrittenArtifact>,
}

/// Result of the rendering stage.
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    /// Run that produced the rendered bindings.
    pub provenance: RunProvenance,
    /// Fingerprint of the rendered bindings.
    pub fingerprint: String,
    /// Rendered declaration files.
    pub artifacts: Vec<WrittenArtifact>,
}

/// Result of planning and rendering in one process.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Planning stage result.
    pub plan: PlanOutcome,
    /// Rendering stage result.
    pub render: RenderOutcome,
}

#[derive(Clone)]
struct PlanningStage {
    source: Arc<dyn AccessMapSource>,
    mapper: GrantMapper,
    consolidator: Consolidator,
    report_writer: Arc<dyn DecisionReportWriter>,
}

/// Lift-and-shift pipeline: access map to candidate grants to minimal
/// bindings to rendered declarations.
///
/// Rendering alone only needs a checkpoint store and a renderer; planning
/// is attached with [`LiftAndShiftService::with_planning`].
#[derive(Clone)]
pub struct LiftAndShiftService {
    planning: Option<PlanningStage>,
    checkpoint_store: Arc<dyn CheckpointStore>,
    renderer: Arc<dyn BindingRenderer>,
    tool_version: String,
}

impl LiftAndShiftService {
    /// Creates a service able to render persisted checkpoints.
    #[must_use]
    pub fn new(
        checkpoint_store: Arc<dyn CheckpointStore>,
        renderer: Arc<dyn BindingRenderer>,
        tool_version: impl Into<String>,
    ) -> Self {
        Self {
            planning: None,
            checkpoint_store,
            renderer,
            tool_version: tool_version.into(),
        }
    }

    /// Adds the inputs needed to plan from an access map.
    #[must_use]
    pub fn with_planning(
        mut self,
        source: Arc<dyn AccessMapSource>,
        mapper: GrantMapper,
        consolidator: Consolidator,
        report_writer: Arc<dyn DecisionReportWriter>,
    ) -> Self {
        self.planning = Some(PlanningStage {
            source,
            mapper,
            consolidator,
            report_writer,
        });
        self
    }
}
