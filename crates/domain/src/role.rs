//! Target-system role names and the engineer-declared priority order.
//!
//! The priority table is configuration, not a computed property: a lower
//! rank means the role subsumes every role with a higher rank for the
//! purpose of consolidation. The engine trusts the table as given.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

use liftmap_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Identifier of a predefined target-system role.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleName(NonEmptyString);

impl RoleName {
    /// Creates a validated role name.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        Ok(Self(NonEmptyString::new(value)?))
    }

    /// Returns the role identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for RoleName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Ordered mapping from role name to priority rank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RolePriorityTable {
    ranks: BTreeMap<RoleName, u32>,
}

impl RolePriorityTable {
    /// Creates a table from `(role, rank)` pairs.
    ///
    /// Declaring the same role twice with different ranks is rejected.
    pub fn new(entries: impl IntoIterator<Item = (RoleName, u32)>) -> AppResult<Self> {
        let mut ranks = BTreeMap::new();
        for (role, rank) in entries {
            if let Some(previous) = ranks.insert(role.clone(), rank)
                && previous != rank
            {
                return Err(AppError::Configuration(format!(
                    "role '{role}' is ranked twice ({previous} and {rank})"
                )));
            }
        }

        Ok(Self { ranks })
    }

    /// Returns the built-in BigQuery dataset role hierarchy.
    #[must_use]
    pub fn bigquery_default() -> Self {
        const DEFAULT_RANKS: &[(&str, u32)] = &[
            ("roles/bigquery.dataOwner", 1),
            ("roles/bigquery.dataAdmin", 2),
            ("roles/bigquery.dataEditor", 3),
            ("roles/bigquery.dataViewer", 4),
            ("roles/bigquery.metadataViewer", 5),
        ];

        let ranks = DEFAULT_RANKS
            .iter()
            .filter_map(|(role, rank)| RoleName::new(*role).ok().map(|role| (role, *rank)))
            .collect();

        Self { ranks }
    }

    /// Returns the rank of a role, failing when the role is not configured.
    pub fn rank(&self, role: &RoleName) -> AppResult<u32> {
        self.ranks
            .get(role)
            .copied()
            .ok_or_else(|| AppError::UnrankedRole {
                role: role.as_str().to_owned(),
            })
    }

    /// Returns whether a role has a rank.
    #[must_use]
    pub fn contains(&self, role: &RoleName) -> bool {
        self.ranks.contains_key(role)
    }

    /// Fails on the lexicographically first role that has no rank.
    pub fn ensure_ranked<'a>(&self, roles: impl IntoIterator<Item = &'a RoleName>) -> AppResult<()> {
        let unranked: BTreeSet<&RoleName> =
            roles.into_iter().filter(|role| !self.contains(role)).collect();

        match unranked.into_iter().next() {
            Some(role) => Err(AppError::UnrankedRole {
                role: role.as_str().to_owned(),
            }),
            None => Ok(()),
        }
    }

    /// Orders two roles by priority: the stronger role sorts first.
    ///
    /// Ties on rank fall back to the role name so the result never depends
    /// on input order.
    pub fn compare(&self, left: &RoleName, right: &RoleName) -> AppResult<Ordering> {
        let left_rank = self.rank(left)?;
        let right_rank = self.rank(right)?;
        Ok(left_rank.cmp(&right_rank).then_with(|| left.cmp(right)))
    }

    /// Returns whether `candidate` is at least as permissive as `other`.
    pub fn covers(&self, candidate: &RoleName, other: &RoleName) -> AppResult<bool> {
        Ok(self.rank(candidate)? <= self.rank(other)?)
    }

    /// Iterates roles with their ranks in role-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&RoleName, u32)> {
        self.ranks.iter().map(|(role, rank)| (role, *rank))
    }

    /// Returns the number of ranked roles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Returns whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}
