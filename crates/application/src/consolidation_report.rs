use std::collections::BTreeSet;

use liftmap_domain::{Member, ResourceScope, RoleName};
use serde::{Deserialize, Serialize};

/// What happened to one candidate `(scope, member, role)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum DecisionOutcome {
    /// Kept in the binding set.
    Granted,
    /// Dropped because a stronger role is bound at the same scope.
    Superseded {
        /// Role kept instead.
        by: RoleName,
    },
    /// Dropped because the parent dataset binding already covers it.
    InheritedFromDataset {
        /// Role bound on the parent dataset.
        dataset_role: RoleName,
    },
}

impl DecisionOutcome {
    /// Returns a stable label for reports.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::Superseded { .. } => "superseded",
            Self::InheritedFromDataset { .. } => "inherited_from_dataset",
        }
    }

    /// Returns the role that made this candidate redundant, if it was dropped.
    #[must_use]
    pub fn superseding_role(&self) -> Option<&RoleName> {
        match self {
            Self::Granted => None,
            Self::Superseded { by } => Some(by),
            Self::InheritedFromDataset { dataset_role } => Some(dataset_role),
        }
    }
}

/// Audit record for one merged candidate grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantDecision {
    /// Scope the candidate targeted.
    pub scope: ResourceScope,
    /// Member the candidate targeted.
    pub member: Member,
    /// Candidate role.
    pub role: RoleName,
    /// Source access rights merged into this candidate.
    pub source_access_rights: BTreeSet<String>,
    /// Consolidation outcome.
    pub outcome: DecisionOutcome,
}

/// Per-candidate audit trail produced alongside a binding set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidationReport {
    decisions: Vec<GrantDecision>,
    candidate_count: usize,
    duplicates_merged: usize,
}

impl ConsolidationReport {
    pub(crate) fn new(
        mut decisions: Vec<GrantDecision>,
        candidate_count: usize,
        duplicates_merged: usize,
    ) -> Self {
        decisions.sort_by(|left, right| {
            (&left.scope, &left.member, &left.role).cmp(&(&right.scope, &right.member, &right.role))
        });

        Self {
            decisions,
            candidate_count,
            duplicates_merged,
        }
    }

    /// Returns decisions ordered by scope, member, then role.
    #[must_use]
    pub fn decisions(&self) -> &[GrantDecision] {
        &self.decisions
    }

    /// Returns how many raw candidate grants entered consolidation.
    #[must_use]
    pub fn candidate_count(&self) -> usize {
        self.candidate_count
    }

    /// Returns how many raw candidates were exact repeats.
    #[must_use]
    pub fn duplicates_merged(&self) -> usize {
        self.duplicates_merged
    }

    /// Returns the number of granted decisions.
    #[must_use]
    pub fn granted_count(&self) -> usize {
        self.count_matching(|outcome| matches!(outcome, DecisionOutcome::Granted))
    }

    /// Returns the number of candidates dropped in favour of a stronger same-scope role.
    #[must_use]
    pub fn superseded_count(&self) -> usize {
        self.count_matching(|outcome| matches!(outcome, DecisionOutcome::Superseded { .. }))
    }

    /// Returns the number of table candidates covered by their dataset binding.
    #[must_use]
    pub fn inherited_count(&self) -> usize {
        self.count_matching(|outcome| {
            matches!(outcome, DecisionOutcome::InheritedFromDataset { .. })
        })
    }

    fn count_matching(&self, predicate: impl Fn(&DecisionOutcome) -> bool) -> usize {
        self.decisions
            .iter()
            .filter(|decision| predicate(&decision.outcome))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use liftmap_domain::RoleName;

    use super::DecisionOutcome;

    #[test]
    fn outcomes_serialize_with_decision_tag() {
        let outcome = DecisionOutcome::InheritedFromDataset {
            dataset_role: RoleName::new("editor").unwrap_or_else(|_| unreachable!()),
        };
        let encoded = serde_json::to_value(&outcome).unwrap_or_else(|_| unreachable!());

        assert_eq!(
            encoded,
            serde_json::json!({"decision": "inherited_from_dataset", "dataset_role": "editor"})
        );
        assert_eq!(outcome.as_str(), "inherited_from_dataset");
        assert_eq!(DecisionOutcome::Granted.superseding_role(), None);
    }
}
