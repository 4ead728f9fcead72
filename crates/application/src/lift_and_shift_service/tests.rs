use std::sync::{Arc, Mutex};

use liftmap_core::{AppError, AppResult};
use liftmap_domain::{
    AccessMapRecord, AccessMapRecordInput, AccessRightMap, AccessRightMapping, RoleName,
    RolePriorityTable,
};

use crate::lift_and_shift_ports::{
    AccessMapSource, ArtifactKind, BindingRenderer, CheckpointStore, DecisionReportWriter,
    PlanCheckpoint, WrittenArtifact,
};
use crate::{BindingSet, ConsolidationReport, Consolidator, GrantMapper};

use super::LiftAndShiftService;

struct FakeAccessMapSource {
    rows: Vec<(&'static str, &'static str, &'static str)>,
}

impl AccessMapSource for FakeAccessMapSource {
    fn load_records(&self) -> AppResult<Vec<AccessMapRecord>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(index, (member, access_right, table))| {
                AccessMapRecord::from_input(
                    index + 1,
                    AccessMapRecordInput {
                        source_role: "td_role".to_owned(),
                        source_database: "sales".to_owned(),
                        access_right: (*access_right).to_owned(),
                        source_table: (*table).to_owned(),
                        member: (*member).to_owned(),
                        project: "proj1".to_owned(),
                        dataset: "sales".to_owned(),
                        table: (*table).to_owned(),
                    },
                )
            })
            .collect()
    }
}

#[derive(Default)]
struct FakeCheckpointStore {
    saved: Mutex<Option<PlanCheckpoint>>,
}

impl CheckpointStore for FakeCheckpointStore {
    fn save(&self, checkpoint: &PlanCheckpoint) -> AppResult<WrittenArtifact> {
        *self.saved.lock().unwrap_or_else(|_| unreachable!()) = Some(checkpoint.clone());
        Ok(WrittenArtifact {
            kind: ArtifactKind::Checkpoint,
            location: "memory://plan.json".to_owned(),
            entry_count: checkpoint.binding_count(),
        })
    }

    fn load(&self) -> AppResult<PlanCheckpoint> {
        self.saved
            .lock()
            .unwrap_or_else(|_| unreachable!())
            .clone()
            .ok_or_else(|| AppError::NotFound("no checkpoint saved".to_owned()))
    }
}

#[derive(Default)]
struct FakeDecisionReportWriter {
    written: Mutex<Vec<ConsolidationReport>>,
    fail: bool,
}

impl DecisionReportWriter for FakeDecisionReportWriter {
    fn write_report(&self, report: &ConsolidationReport) -> AppResult<WrittenArtifact> {
        if self.fail {
            return Err(AppError::Io("decision report volume is read-only".to_owned()));
        }
        self.written
            .lock()
            .unwrap_or_else(|_| unreachable!())
            .push(report.clone());
        Ok(WrittenArtifact {
            kind: ArtifactKind::DecisionReport,
            location: "memory://decisions.csv".to_owned(),
            entry_count: report.decisions().len(),
        })
    }
}

#[derive(Default)]
struct FakeBindingRenderer {
    rendered: Mutex<Vec<BindingSet>>,
}

impl BindingRenderer for FakeBindingRenderer {
    fn render(&self, bindings: &BindingSet) -> AppResult<Vec<WrittenArtifact>> {
        self.rendered
            .lock()
            .unwrap_or_else(|_| unreachable!())
            .push(bindings.clone());
        Ok(vec![
            WrittenArtifact {
                kind: ArtifactKind::DatasetAccess,
                location: "memory://dataset_access_locals.tf".to_owned(),
                entry_count: bindings.dataset_bindings().count(),
            },
            WrittenArtifact {
                kind: ArtifactKind::TableAccess,
                location: "memory://table_access_locals.tf".to_owned(),
                entry_count: bindings.table_bindings().count(),
            },
        ])
    }
}

struct Harness {
    service: LiftAndShiftService,
    checkpoints: Arc<FakeCheckpointStore>,
    reports: Arc<FakeDecisionReportWriter>,
    renderer: Arc<FakeBindingRenderer>,
}

fn access_rights() -> AccessRightMap {
    AccessRightMap::new(
        [
            ("R", "roles/bigquery.dataViewer"),
            ("I", "roles/bigquery.dataEditor"),
            ("D", "roles/bigquery.dataEditor"),
            ("CM", "NOT_APPLICABLE"),
            ("X", "roles/custom.ghost"),
        ]
        .into_iter()
        .map(|(code, role)| {
            AccessRightMapping::new(code, None, role).unwrap_or_else(|_| unreachable!())
        }),
    )
    .unwrap_or_else(|_| unreachable!())
}

fn harness(rows: Vec<(&'static str, &'static str, &'static str)>) -> Harness {
    harness_with_reports(rows, FakeDecisionReportWriter::default())
}

fn harness_with_reports(
    rows: Vec<(&'static str, &'static str, &'static str)>,
    reports: FakeDecisionReportWriter,
) -> Harness {
    let checkpoints = Arc::new(FakeCheckpointStore::default());
    let reports = Arc::new(reports);
    let renderer = Arc::new(FakeBindingRenderer::default());

    let service = LiftAndShiftService::new(checkpoints.clone(), renderer.clone(), "0.1.0")
        .with_planning(
            Arc::new(FakeAccessMapSource { rows }),
            GrantMapper::new(Arc::new(access_rights())),
            Consolidator::new(Arc::new(RolePriorityTable::bigquery_default())),
            reports.clone(),
        );

    Harness {
        service,
        checkpoints,
        reports,
        renderer,
    }
}

fn analyst_rows() -> Vec<(&'static str, &'static str, &'static str)> {
    vec![
        ("group:analysts@example.com", "R", "All"),
        ("group:analysts@example.com", "I", "orders"),
        ("group:analysts@example.com", "D", "orders"),
        ("group:analysts@example.com", "R", "orders"),
        ("group:analysts@example.com", "CM", "All"),
        ("group:auditors@example.com", "R", "orders"),
    ]
}

#[test]
fn plan_writes_checkpoint_and_report() {
    let harness = harness(analyst_rows());
    let outcome = harness.service.plan().unwrap_or_else(|_| unreachable!());

    assert_eq!(outcome.not_applicable_rows, vec![5]);
    assert_eq!(outcome.checkpoint.dataset_bindings.len(), 1);
    assert_eq!(outcome.checkpoint.table_bindings.len(), 2);
    assert_eq!(outcome.report.duplicates_merged(), 1);
    assert_eq!(outcome.report.inherited_count(), 0);
    assert_eq!(outcome.report.superseded_count(), 1);
    assert_eq!(outcome.artifacts.len(), 2);

    let saved = harness.checkpoints.load().unwrap_or_else(|_| unreachable!());
    assert_eq!(saved, outcome.checkpoint);
    assert_eq!(
        harness.reports.written.lock().unwrap_or_else(|_| unreachable!()).len(),
        1
    );
    assert!(
        harness
            .renderer
            .rendered
            .lock()
            .unwrap_or_else(|_| unreachable!())
            .is_empty()
    );
}

#[test]
fn render_replays_saved_checkpoint() {
    let harness = harness(analyst_rows());
    let plan = harness.service.plan().unwrap_or_else(|_| unreachable!());
    let render = harness.service.render().unwrap_or_else(|_| unreachable!());

    assert_eq!(render.fingerprint, plan.checkpoint.fingerprint);
    assert_eq!(render.provenance, plan.checkpoint.provenance);
    let rendered = harness.renderer.rendered.lock().unwrap_or_else(|_| unreachable!());
    assert_eq!(rendered.len(), 1);
    assert_eq!(rendered[0], plan.bindings);
}

#[test]
fn render_rejects_edited_checkpoint() {
    let harness = harness(analyst_rows());
    let plan = harness.service.plan().unwrap_or_else(|_| unreachable!());

    let mut edited = plan.checkpoint.clone();
    edited.table_bindings.pop();
    harness
        .checkpoints
        .save(&edited)
        .unwrap_or_else(|_| unreachable!());

    let result = harness.service.render();
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(
        harness
            .renderer
            .rendered
            .lock()
            .unwrap_or_else(|_| unreachable!())
            .is_empty()
    );
}

#[test]
fn run_renders_fresh_bindings() {
    let harness = harness(analyst_rows());
    let outcome = harness.service.run().unwrap_or_else(|_| unreachable!());

    assert_eq!(outcome.render.fingerprint, outcome.plan.checkpoint.fingerprint);
    assert_eq!(
        outcome
            .render
            .artifacts
            .iter()
            .map(|artifact| artifact.entry_count)
            .collect::<Vec<_>>(),
        vec![1, 2]
    );
}

#[test]
fn unranked_mapped_role_writes_nothing() {
    let harness = harness(vec![
        ("group:analysts@example.com", "R", "All"),
        ("group:analysts@example.com", "X", "orders"),
    ]);

    let result = harness.service.plan();
    assert!(matches!(
        result,
        Err(AppError::UnrankedRole { role }) if role == "roles/custom.ghost"
    ));
    assert!(harness.checkpoints.load().is_err());
    assert!(
        harness
            .reports
            .written
            .lock()
            .unwrap_or_else(|_| unreachable!())
            .is_empty()
    );
}

#[test]
fn render_only_service_cannot_plan() {
    let service = LiftAndShiftService::new(
        Arc::new(FakeCheckpointStore::default()),
        Arc::new(FakeBindingRenderer::default()),
        "0.1.0",
    );

    assert!(service.plan().is_err_and(|error| error.is_configuration()));
    assert!(matches!(service.render(), Err(AppError::NotFound(_))));
}

#[test]
fn dataset_role_inherits_weaker_table_rights() {
    let harness = harness(vec![
        ("group:analysts@example.com", "I", "All"),
        ("group:analysts@example.com", "R", "orders"),
    ]);
    let outcome = harness.service.plan().unwrap_or_else(|_| unreachable!());

    assert!(outcome.checkpoint.table_bindings.is_empty());
    assert_eq!(
        outcome.checkpoint.dataset_bindings[0].role(),
        &RoleName::new("roles/bigquery.dataEditor").unwrap_or_else(|_| unreachable!())
    );
    assert_eq!(outcome.report.inherited_count(), 1);
}

#[test]
fn failed_report_write_leaves_no_checkpoint() {
    let harness = harness_with_reports(
        analyst_rows(),
        FakeDecisionReportWriter {
            fail: true,
            ..FakeDecisionReportWriter::default()
        },
    );

    let result = harness.service.plan();
    assert!(matches!(result, Err(AppError::Io(_))));
    assert!(matches!(harness.checkpoints.load(), Err(AppError::NotFound(_))));
    assert!(matches!(harness.service.render(), Err(AppError::NotFound(_))));
    assert!(
        harness
            .renderer
            .rendered
            .lock()
            .unwrap_or_else(|_| unreachable!())
            .is_empty()
    );
}
