//! Grouping of candidate grants by scope and member.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use liftmap_core::AppResult;
use liftmap_domain::{CandidateGrant, Member, ResourceScope, RoleName, RolePriorityTable};

/// Roles proposed for one member at one scope, with the access rights behind each.
pub type RoleSources = BTreeMap<RoleName, BTreeSet<String>>;

/// Index of candidate grants built once per run.
#[derive(Debug, Clone, Default)]
pub struct ScopeIndex {
    by_scope_and_member: HashMap<ResourceScope, HashMap<Member, RoleSources>>,
    parent_of: HashMap<ResourceScope, ResourceScope>,
    candidate_count: usize,
    duplicates_merged: usize,
}

impl ScopeIndex {
    /// Builds the index.
    ///
    /// Every candidate role is checked against the priority table before
    /// anything is grouped, so an unranked role fails the run up front.
    pub fn build(grants: &[CandidateGrant], priorities: &RolePriorityTable) -> AppResult<Self> {
        priorities.ensure_ranked(grants.iter().map(CandidateGrant::role))?;

        let mut index = Self {
            candidate_count: grants.len(),
            ..Self::default()
        };

        for grant in grants {
            let scope = grant.scope();
            if let Some(parent) = scope.parent() {
                index.parent_of.entry(scope.clone()).or_insert(parent);
            }

            let sources = index
                .by_scope_and_member
                .entry(scope.clone())
                .or_default()
                .entry(grant.member().clone())
                .or_default();

            match sources.get_mut(grant.role()) {
                Some(rights) => {
                    index.duplicates_merged += 1;
                    rights.extend(grant.source_access_rights().iter().cloned());
                }
                None => {
                    sources.insert(grant.role().clone(), grant.source_access_rights().clone());
                }
            }
        }

        Ok(index)
    }

    /// Returns the roles proposed for a member at an exact scope.
    #[must_use]
    pub fn roles_at(&self, scope: &ResourceScope, member: &Member) -> Option<&RoleSources> {
        self.by_scope_and_member
            .get(scope)
            .and_then(|members| members.get(member))
    }

    /// Returns the dataset scope containing a table scope.
    #[must_use]
    pub fn parent_of(&self, scope: &ResourceScope) -> Option<&ResourceScope> {
        self.parent_of.get(scope)
    }

    /// Iterates every `(scope, member, roles)` group.
    pub fn groups(&self) -> impl Iterator<Item = (&ResourceScope, &Member, &RoleSources)> {
        self.by_scope_and_member.iter().flat_map(|(scope, members)| {
            members
                .iter()
                .map(move |(member, roles)| (scope, member, roles))
        })
    }

    /// Returns the number of distinct scopes.
    #[must_use]
    pub fn scope_count(&self) -> usize {
        self.by_scope_and_member.len()
    }

    /// Returns the number of distinct `(scope, member)` pairs.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.by_scope_and_member.values().map(HashMap::len).sum()
    }

    /// Returns how many candidate grants were indexed.
    #[must_use]
    pub fn candidate_count(&self) -> usize {
        self.candidate_count
    }

    /// Returns how many candidates repeated an already indexed `(scope, member, role)`.
    #[must_use]
    pub fn duplicates_merged(&self) -> usize {
        self.duplicates_merged
    }
}
