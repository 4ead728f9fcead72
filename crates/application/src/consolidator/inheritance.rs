use std::collections::BTreeMap;

use liftmap_core::AppResult;
use liftmap_domain::{Member, ResourceScope, RoleName, RolePriorityTable};

use crate::{DecisionOutcome, GrantDecision, ScopeIndex};

use super::same_scope::Survivors;

/// Drops table bindings already covered by the member's dataset binding.
///
/// The containing dataset comes from the index's parent mapping. Only
/// same-scope survivors are consulted on the dataset side, so a table
/// binding stays unless the dataset role ranks equal or stronger.
pub(super) fn collapse(
    index: &ScopeIndex,
    survivors: Survivors,
    priorities: &RolePriorityTable,
) -> AppResult<(BTreeMap<ResourceScope, BTreeMap<Member, RoleName>>, Vec<GrantDecision>)> {
    let mut kept: BTreeMap<ResourceScope, BTreeMap<Member, RoleName>> = BTreeMap::new();
    let mut decisions = Vec::new();

    for (scope, members) in &survivors {
        let dataset_members = index
            .parent_of(scope)
            .and_then(|parent| survivors.get(parent));

        for (member, surviving) in members {
            let dataset_role = dataset_members
                .and_then(|dataset_members| dataset_members.get(member))
                .map(|dataset_survivor| &dataset_survivor.role);

            let outcome = match dataset_role {
                Some(dataset_role) if priorities.covers(dataset_role, &surviving.role)? => {
                    DecisionOutcome::InheritedFromDataset {
                        dataset_role: dataset_role.clone(),
                    }
                }
                _ => {
                    kept.entry(scope.clone())
                        .or_default()
                        .insert(member.clone(), surviving.role.clone());
                    DecisionOutcome::Granted
                }
            };

            decisions.push(GrantDecision {
                scope: scope.clone(),
                member: member.clone(),
                role: surviving.role.clone(),
                source_access_rights: surviving.source_access_rights.clone(),
                outcome,
            });
        }
    }

    Ok((kept, decisions))
}
