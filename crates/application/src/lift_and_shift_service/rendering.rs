use liftmap_core::AppResult;
use tracing::info;

use crate::BindingSet;
use crate::lift_and_shift_ports::WrittenArtifact;

use super::{LiftAndShiftService, RenderOutcome};

impl LiftAndShiftService {
    /// Renders the persisted checkpoint.
    ///
    /// The checkpoint fingerprint is recomputed first, so an edited
    /// checkpoint is rejected instead of rendered.
    pub fn render(&self) -> AppResult<RenderOutcome> {
        let checkpoint = self.checkpoint_store.load()?;
        let provenance = checkpoint.provenance.clone();
        let fingerprint = checkpoint.fingerprint.clone();
        info!(
            run_id = %provenance.run_id(),
            generated_at = %provenance.generated_at(),
            tool_version = provenance.tool_version(),
            bindings = checkpoint.binding_count(),
            "loaded plan checkpoint"
        );

        let bindings = checkpoint.into_binding_set()?;
        let artifacts = self.render_bindings(&bindings)?;

        Ok(RenderOutcome {
            provenance,
            fingerprint,
            artifacts,
        })
    }

    pub(super) fn render_bindings(&self, bindings: &BindingSet) -> AppResult<Vec<WrittenArtifact>> {
        let artifacts = self.renderer.render(bindings)?;
        for artifact in &artifacts {
            info!(
                kind = %artifact.kind,
                entries = artifact.entry_count,
                location = %artifact.location,
                "rendered bindings"
            );
        }

        Ok(artifacts)
    }
}
