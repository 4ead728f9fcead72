mod artifacts;
mod checkpoint;
mod sinks;
mod sources;

pub use artifacts::{ArtifactKind, WrittenArtifact};
pub use checkpoint::{CheckpointStore, PlanCheckpoint};
pub use sinks::{BindingRenderer, DecisionReportWriter};
pub use sources::AccessMapSource;
