//! Application services and ports.

#![forbid(unsafe_code)]

mod binding_set;
mod consolidation_report;
mod consolidator;
mod grant_mapper;
mod lift_and_shift_ports;
mod lift_and_shift_service;
mod scope_index;

pub use binding_set::BindingSet;
pub use consolidation_report::{ConsolidationReport, DecisionOutcome, GrantDecision};
pub use consolidator::{Consolidation, Consolidator};
pub use grant_mapper::{GrantMapper, MappedGrants};
pub use lift_and_shift_ports::{
    AccessMapSource, ArtifactKind, BindingRenderer, CheckpointStore, DecisionReportWriter,
    PlanCheckpoint, WrittenArtifact,
};
pub use lift_and_shift_service::{LiftAndShiftService, PlanOutcome, RenderOutcome, RunOutcome};
pub use scope_index::{RoleSources, ScopeIndex};
