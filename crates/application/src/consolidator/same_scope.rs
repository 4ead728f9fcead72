use std::cmp::Ordering;
use std::collections::BTreeMap;

use liftmap_core::AppResult;
use liftmap_domain::{Member, ResourceScope, RoleName, RolePriorityTable};

use crate::scope_index::RoleSources;
use crate::{DecisionOutcome, GrantDecision, ScopeIndex};

use super::SurvivingRole;

pub(super) type Survivors = BTreeMap<ResourceScope, BTreeMap<Member, SurvivingRole>>;

/// Keeps the strongest role per `(scope, member)` and records the rest as superseded.
pub(super) fn collapse(
    index: &ScopeIndex,
    priorities: &RolePriorityTable,
) -> AppResult<(Survivors, Vec<GrantDecision>)> {
    let mut survivors = Survivors::new();
    let mut decisions = Vec::new();

    for (scope, member, roles) in index.groups() {
        let Some(winner) = strongest_role(roles, priorities)? else {
            continue;
        };

        for (role, rights) in roles {
            if role == winner {
                continue;
            }
            decisions.push(GrantDecision {
                scope: scope.clone(),
                member: member.clone(),
                role: role.clone(),
                source_access_rights: rights.clone(),
                outcome: DecisionOutcome::Superseded { by: winner.clone() },
            });
        }

        survivors.entry(scope.clone()).or_default().insert(
            member.clone(),
            SurvivingRole {
                role: winner.clone(),
                source_access_rights: roles.get(winner).cloned().unwrap_or_default(),
            },
        );
    }

    Ok((survivors, decisions))
}

/// Lowest rank wins; equal ranks resolve to the lexicographically first name.
fn strongest_role<'a>(
    roles: &'a RoleSources,
    priorities: &RolePriorityTable,
) -> AppResult<Option<&'a RoleName>> {
    let mut strongest: Option<&RoleName> = None;
    for role in roles.keys() {
        strongest = match strongest {
            Some(current) if priorities.compare(current, role)? != Ordering::Greater => {
                Some(current)
            }
            _ => Some(role),
        };
    }

    Ok(strongest)
}
