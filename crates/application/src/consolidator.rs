//! Priority-ordered redundancy elimination over the dataset → table hierarchy.
//!
//! Two passes run over a [`ScopeIndex`]:
//!
//! 1. same-scope collapse keeps the single strongest role per `(scope, member)`,
//!    breaking rank ties on role name;
//! 2. inheritance collapse drops a table binding when the member's surviving
//!    dataset binding is equal or stronger.
//!
//! The result depends only on the multiset of candidate grants.

mod inheritance;
mod same_scope;


use std::collections::BTreeSet;
use std::sync::Arc;

use liftmap_core::AppResult;
use liftmap_domain::{CandidateGrant, RoleName, RolePriorityTable};
use tracing::{debug, info};

use crate::{BindingSet, ConsolidationReport, ScopeIndex};

/// Role kept for one `(scope, member)` pair between the two passes.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SurvivingRole {
    role: RoleName,
    source_access_rights: BTreeSet<String>,
}

/// Minimal binding set plus the audit trail explaining it.
#[derive(Debug, Clone)]
pub struct Consolidation {
    /// Bindings that must be granted.
    pub bindings: BindingSet,
    /// Fate of every merged candidate grant.
    pub report: ConsolidationReport,
}

/// Consolidation engine bound to one priority table.
#[derive(Debug, Clone)]
pub struct Consolidator {
    priorities: Arc<RolePriorityTable>,
}

impl Consolidator {
    /// Creates a consolidator from an immutable priority table.
    #[must_use]
    pub fn new(priorities: Arc<RolePriorityTable>) -> Self {
        Self { priorities }
    }

    /// Returns the priority table used for comparisons.
    #[must_use]
    pub fn priorities(&self) -> &RolePriorityTable {
        &self.priorities
    }

    /// Reduces candidate grants to the minimal binding set.
    ///
    /// Fails with `UnrankedRole` before any binding is produced when a
    /// candidate role is missing from the priority table.
    pub fn consolidate(&self, grants: &[CandidateGrant]) -> AppResult<Consolidation> {
        let index = ScopeIndex::build(grants, &self.priorities)?;
        info!(
            candidates = index.candidate_count(),
            duplicates_merged = index.duplicates_merged(),
            scopes = index.scope_count(),
            pairs = index.pair_count(),
            "indexed candidate grants"
        );

        let (survivors, mut decisions) = same_scope::collapse(&index, &self.priorities)?;
        let superseded = decisions.len();

        let (survivors, inherited_decisions) =
            inheritance::collapse(&index, survivors, &self.priorities)?;
        decisions.extend(inherited_decisions);

        for decision in &decisions {
            if let Some(by) = decision.outcome.superseding_role() {
                debug!(
                    scope = %decision.scope,
                    member = %decision.member,
                    role = %decision.role,
                    decision = decision.outcome.as_str(),
                    covered_by = %by,
                    "dropped redundant candidate grant"
                );
            }
        }

        let bindings = BindingSet::from_survivors(survivors);
        bindings.verify(&self.priorities)?;

        let report =
            ConsolidationReport::new(decisions, index.candidate_count(), index.duplicates_merged());
        info!(
            bindings = bindings.len(),
            superseded,
            inherited = report.inherited_count(),
            "consolidated candidate grants"
        );

        Ok(Consolidation { bindings, report })
    }
}
