//! Liftmap lift-and-shift mapper.
//!
//! `plan` maps the access map to candidate grants, consolidates them, and
//! writes a checkpoint plus decision report. `render` turns a checkpoint
//! into Terraform locals. `run` (the default) does both in one process.

#![forbid(unsafe_code)]

mod mapper_config;

use std::sync::Arc;

use liftmap_application::{
    Consolidator, GrantMapper, LiftAndShiftService, PlanOutcome, RenderOutcome,
};
use liftmap_core::AppError;
use liftmap_domain::RolePriorityTable;
use liftmap_infrastructure::{
    CsvAccessMapSource, CsvDecisionReportWriter, JsonCheckpointStore, TerraformBindingRenderer,
    load_access_right_map, load_role_priority_table,
};
use tracing::{info, warn};

use crate::mapper_config::{MapperConfig, MapperMode, init_tracing};

fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = MapperConfig::load()?;
    info!(
        mode = config.mode.as_str(),
        output_dir = %config.output_dir.display(),
        checkpoint = %config.checkpoint_path.display(),
        "liftmap-mapper started"
    );

    let service = build_service(&config)?;
    match config.mode {
        MapperMode::Plan => log_plan(&service.plan()?),
        MapperMode::Render => log_render(&service.render()?),
        MapperMode::Run => {
            let outcome = service.run()?;
            log_plan(&outcome.plan);
            log_render(&outcome.render);
        }
    }

    Ok(())
}

fn build_service(config: &MapperConfig) -> Result<LiftAndShiftService, AppError> {
    let service = LiftAndShiftService::new(
        Arc::new(JsonCheckpointStore::new(config.checkpoint_path.clone())),
        Arc::new(TerraformBindingRenderer::new(config.output_dir.clone())),
        env!("CARGO_PKG_VERSION"),
    );

    let Some(planning) = &config.planning else {
        return Ok(service);
    };

    let priorities = match &config.role_priority_json {
        Some(path) => load_role_priority_table(path)?,
        None => {
            info!("using built-in BigQuery role priority table");
            RolePriorityTable::bigquery_default()
        }
    };
    let access_rights = load_access_right_map(&planning.arc_map_json)?;

    let unranked: Vec<&str> = access_rights
        .target_roles()
        .into_iter()
        .filter(|role| !priorities.contains(role))
        .map(|role| role.as_str())
        .collect();
    if !unranked.is_empty() {
        warn!(
            roles = %unranked.join(", "),
            "access-right map targets roles without a priority; any grant using them fails the run"
        );
    }

    Ok(service.with_planning(
        Arc::new(CsvAccessMapSource::new(planning.access_map_csv.clone())),
        GrantMapper::new(Arc::new(access_rights)),
        Consolidator::new(Arc::new(priorities)),
        Arc::new(CsvDecisionReportWriter::new(config.decision_report_path())),
    ))
}

fn log_plan(outcome: &PlanOutcome) {
    info!(
        run_id = %outcome.checkpoint.provenance.run_id(),
        candidates = outcome.report.candidate_count(),
        duplicates_merged = outcome.report.duplicates_merged(),
        not_applicable = outcome.not_applicable_rows.len(),
        granted = outcome.report.granted_count(),
        superseded = outcome.report.superseded_count(),
        inherited = outcome.report.inherited_count(),
        "plan complete"
    );
}

fn log_render(outcome: &RenderOutcome) {
    info!(
        run_id = %outcome.provenance.run_id(),
        fingerprint = %outcome.fingerprint,
        files = outcome.artifacts.len(),
        "render complete"
    );
}
