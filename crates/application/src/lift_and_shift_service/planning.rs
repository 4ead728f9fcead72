use liftmap_core::{AppError, AppResult, RunProvenance};
use tracing::info;

use crate::lift_and_shift_ports::PlanCheckpoint;

use super::{LiftAndShiftService, PlanOutcome, PlanningStage, RenderOutcome, RunOutcome};

impl LiftAndShiftService {
    /// Maps and consolidates the access map, then writes the decision report
    /// and the checkpoint.
    ///
    /// Nothing is written when any record, mapping, or role rank is invalid.
    /// A failed report write leaves no checkpoint behind.
    pub fn plan(&self) -> AppResult<PlanOutcome> {
        let stage = self.planning_stage()?;

        let records = stage.source.load_records()?;
        info!(records = records.len(), "loaded access map");

        let mapped = stage.mapper.map_records(&records)?;
        let consolidation = stage.consolidator.consolidate(&mapped.grants)?;

        let provenance = RunProvenance::start(self.tool_version.as_str());
        let checkpoint = PlanCheckpoint::capture(provenance, &consolidation.bindings)?;

        // The checkpoint is what `render` trusts, so it is written last.
        let report_artifact = stage.report_writer.write_report(&consolidation.report)?;
        let checkpoint_artifact = self.checkpoint_store.save(&checkpoint)?;
        info!(
            run_id = %checkpoint.provenance.run_id(),
            fingerprint = %checkpoint.fingerprint,
            dataset_bindings = checkpoint.dataset_bindings.len(),
            table_bindings = checkpoint.table_bindings.len(),
            checkpoint = %checkpoint_artifact.location,
            report = %report_artifact.location,
            "plan written"
        );

        Ok(PlanOutcome {
            bindings: consolidation.bindings,
            checkpoint,
            report: consolidation.report,
            not_applicable_rows: mapped.not_applicable_rows,
            artifacts: vec![checkpoint_artifact, report_artifact],
        })
    }

    /// Plans, then renders the fresh bindings without re-reading the checkpoint.
    pub fn run(&self) -> AppResult<RunOutcome> {
        let plan = self.plan()?;
        let artifacts = self.render_bindings(&plan.bindings)?;
        let render = RenderOutcome {
            provenance: plan.checkpoint.provenance.clone(),
            fingerprint: plan.checkpoint.fingerprint.clone(),
            artifacts,
        };

        Ok(RunOutcome { plan, render })
    }

    fn planning_stage(&self) -> AppResult<&PlanningStage> {
        self.planning.as_ref().ok_or_else(|| {
            AppError::Configuration(
                "planning requires an access map source and an access-right map".to_owned(),
            )
        })
    }
}
