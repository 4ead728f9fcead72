//! Finalized, read-only output of consolidation.

use std::collections::BTreeMap;

use liftmap_core::{AppError, AppResult};
use liftmap_domain::{Binding, Member, ResourceScope, RoleName, RolePriorityTable};
use sha2::{Digest, Sha256};

/// The minimal binding set.
///
/// Only the consolidator builds one; [`BindingSet::restore`] re-validates a
/// persisted copy. There are no mutating methods: a re-run rebuilds from
/// fresh candidate grants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingSet {
    by_scope: BTreeMap<ResourceScope, Vec<Binding>>,
}

impl BindingSet {
    pub(crate) fn from_survivors(
        survivors: BTreeMap<ResourceScope, BTreeMap<Member, RoleName>>,
    ) -> Self {
        let by_scope = survivors
            .into_iter()
            .filter(|(_, members)| !members.is_empty())
            .map(|(scope, members)| {
                let bindings = members
                    .into_iter()
                    .map(|(member, role)| Binding::new(scope.clone(), member, role))
                    .collect();
                (scope, bindings)
            })
            .collect();

        Self { by_scope }
    }

    /// Rebuilds a binding set from persisted bindings.
    ///
    /// Fails when two bindings share a `(scope, member)` pair or when the
    /// recomputed fingerprint differs from `expected_fingerprint`.
    pub fn restore(
        bindings: impl IntoIterator<Item = Binding>,
        expected_fingerprint: &str,
    ) -> AppResult<Self> {
        let mut survivors: BTreeMap<ResourceScope, BTreeMap<Member, RoleName>> = BTreeMap::new();
        for binding in bindings {
            let members = survivors.entry(binding.scope().clone()).or_default();
            if members.contains_key(binding.member()) {
                return Err(AppError::Validation(format!(
                    "persisted bindings grant '{}' more than one role on '{}'",
                    binding.member(),
                    binding.scope()
                )));
            }
            members.insert(binding.member().clone(), binding.role().clone());
        }

        let restored = Self::from_survivors(survivors);
        let fingerprint = restored.fingerprint()?;
        if fingerprint != expected_fingerprint {
            return Err(AppError::Validation(format!(
                "persisted bindings do not match their fingerprint (expected {expected_fingerprint}, computed {fingerprint})"
            )));
        }

        Ok(restored)
    }

    /// Iterates all bindings ordered by scope, then member.
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.by_scope.values().flatten()
    }

    /// Iterates dataset-level bindings.
    pub fn dataset_bindings(&self) -> impl Iterator<Item = &Binding> {
        self.iter().filter(|binding| !binding.scope().is_table())
    }

    /// Iterates table-level bindings.
    pub fn table_bindings(&self) -> impl Iterator<Item = &Binding> {
        self.iter().filter(|binding| binding.scope().is_table())
    }

    /// Returns bindings for an exact scope, ordered by member.
    #[must_use]
    pub fn bindings_for(&self, scope: &ResourceScope) -> &[Binding] {
        self.by_scope
            .get(scope)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the role bound to a member at an exact scope.
    #[must_use]
    pub fn role_for(&self, scope: &ResourceScope, member: &Member) -> Option<&RoleName> {
        self.bindings_for(scope)
            .iter()
            .find(|binding| binding.member() == member)
            .map(Binding::role)
    }

    /// Iterates scopes that carry at least one binding.
    pub fn scopes(&self) -> impl Iterator<Item = &ResourceScope> {
        self.by_scope.keys()
    }

    /// Returns the number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_scope.values().map(Vec::len).sum()
    }

    /// Returns whether nothing needs to be granted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_scope.is_empty()
    }

    /// Returns a SHA-256 hex digest over the bindings in canonical order.
    ///
    /// Two runs over the same candidate multiset produce the same value.
    pub fn fingerprint(&self) -> AppResult<String> {
        let canonical: Vec<&Binding> = self.iter().collect();
        let encoded = serde_json::to_vec(&canonical).map_err(|error| {
            AppError::Internal(format!("failed to encode binding set fingerprint input: {error}"))
        })?;

        let digest = Sha256::digest(encoded);
        Ok(digest.iter().map(|byte| format!("{byte:02x}")).collect())
    }

    /// Checks the output invariants against a priority table.
    ///
    /// Every role must be ranked, each `(scope, member)` pair appears once,
    /// and no table binding is covered by the member's binding on the
    /// parent dataset.
    pub fn verify(&self, priorities: &RolePriorityTable) -> AppResult<()> {
        priorities.ensure_ranked(self.iter().map(Binding::role))?;

        for (scope, bindings) in &self.by_scope {
            for pair in bindings.windows(2) {
                if pair[0].member() == pair[1].member() {
                    return Err(AppError::Internal(format!(
                        "binding set holds two roles for '{}' on '{scope}'",
                        pair[0].member()
                    )));
                }
            }

            let Some(parent) = scope.parent() else {
                continue;
            };

            for binding in bindings {
                if let Some(dataset_role) = self.role_for(&parent, binding.member())
                    && priorities.covers(dataset_role, binding.role())?
                {
                    return Err(AppError::Internal(format!(
                        "table binding '{binding}' is already covered by '{dataset_role}' on '{parent}'"
                    )));
                }
            }
        }

        Ok(())
    }
}
