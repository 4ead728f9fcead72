use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use liftmap_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::{Member, ResourceScope, RoleName};

/// Raw candidate grant at the engine boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateGrantInput {
    /// Target project id.
    pub project: String,
    /// Target dataset id.
    pub dataset: String,
    /// Target table id; `None` for dataset-level grants.
    pub table: Option<String>,
    /// Member receiving the role.
    pub member: String,
    /// Proposed role.
    pub role: String,
    /// Source access rights that produced this grant.
    pub source_access_rights: Vec<String>,
}

/// One proposed `(scope, member, role)` binding before consolidation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateGrant {
    scope: ResourceScope,
    member: Member,
    role: RoleName,
    source_access_rights: BTreeSet<String>,
}

impl CandidateGrant {
    /// Creates a candidate grant from validated parts.
    #[must_use]
    pub fn new(
        scope: ResourceScope,
        member: Member,
        role: RoleName,
        source_access_rights: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            scope,
            member,
            role,
            source_access_rights: source_access_rights.into_iter().collect(),
        }
    }

    /// Validates a raw boundary record.
    ///
    /// A table id without a dataset, or any blank required field, is a
    /// malformed record rather than something to skip.
    pub fn from_input(input: CandidateGrantInput) -> AppResult<Self> {
        let table = input
            .table
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned);

        let mut missing = Vec::new();
        if input.project.trim().is_empty() {
            missing.push("project");
        }
        if input.dataset.trim().is_empty() {
            missing.push("dataset");
        }
        if input.member.trim().is_empty() {
            missing.push("member");
        }
        if input.role.trim().is_empty() {
            missing.push("role");
        }

        if !missing.is_empty() {
            let reason = if table.is_some() && input.dataset.trim().is_empty() {
                format!(
                    "table-scope record has no dataset; blank fields: {}",
                    missing.join(", ")
                )
            } else {
                format!("required fields are blank: {}", missing.join(", "))
            };
            return Err(AppError::MalformedRecord {
                record: format!("{input:?}"),
                reason,
            });
        }

        let malformed = |error: AppError| AppError::MalformedRecord {
            record: format!("{input:?}"),
            reason: error.to_string(),
        };

        let scope = ResourceScope::from_parts(input.project.as_str(), input.dataset.as_str(), table)
            .map_err(malformed)?;
        let member = Member::new(input.member.as_str()).map_err(malformed)?;
        let role = RoleName::new(input.role.as_str()).map_err(malformed)?;

        Ok(Self::new(
            scope,
            member,
            role,
            input
                .source_access_rights
                .iter()
                .map(|right| right.trim())
                .filter(|right| !right.is_empty())
                .map(str::to_owned),
        ))
    }

    /// Returns the target scope.
    #[must_use]
    pub fn scope(&self) -> &ResourceScope {
        &self.scope
    }

    /// Returns the member receiving the role.
    #[must_use]
    pub fn member(&self) -> &Member {
        &self.member
    }

    /// Returns the proposed role.
    #[must_use]
    pub fn role(&self) -> &RoleName {
        &self.role
    }

    /// Returns the source access rights behind this grant.
    #[must_use]
    pub fn source_access_rights(&self) -> &BTreeSet<String> {
        &self.source_access_rights
    }
}

/// A final, minimal `(scope, member, role)` triple to grant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Binding {
    scope: ResourceScope,
    member: Member,
    role: RoleName,
}

impl Binding {
    /// Creates a binding.
    #[must_use]
    pub fn new(scope: ResourceScope, member: Member, role: RoleName) -> Self {
        Self {
            scope,
            member,
            role,
        }
    }

    /// Returns the scope the role is granted on.
    #[must_use]
    pub fn scope(&self) -> &ResourceScope {
        &self.scope
    }

    /// Returns the member receiving the role.
    #[must_use]
    pub fn member(&self) -> &Member {
        &self.member
    }

    /// Returns the granted role.
    #[must_use]
    pub fn role(&self) -> &RoleName {
        &self.role
    }
}

impl Display for Binding {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{} {} {}", self.scope, self.member, self.role)
    }
}

#[cfg(test)]
mod tests {
    use liftmap_core::AppError;

    use super::{CandidateGrant, CandidateGrantInput};

    fn input() -> CandidateGrantInput {
        CandidateGrantInput {
            project: "proj1".to_owned(),
            dataset: "ds1".to_owned(),
            table: Some("tbl1".to_owned()),
            member: "alice".to_owned(),
            role: "viewer".to_owned(),
            source_access_rights: vec!["R".to_owned(), " ".to_owned()],
        }
    }

    #[test]
    fn boundary_input_builds_table_grant() {
        let grant = CandidateGrant::from_input(input()).unwrap_or_else(|_| unreachable!());
        assert!(grant.scope().is_table());
        assert_eq!(grant.source_access_rights().len(), 1);
    }

    #[test]
    fn blank_table_is_dataset_grant() {
        let mut raw = input();
        raw.table = Some("  ".to_owned());
        let grant = CandidateGrant::from_input(raw).unwrap_or_else(|_| unreachable!());
        assert!(!grant.scope().is_table());
    }

    #[test]
    fn table_without_dataset_is_malformed() {
        let mut raw = input();
        raw.dataset = String::new();
        let result = CandidateGrant::from_input(raw);
        assert!(
            matches!(result, Err(AppError::MalformedRecord { reason, .. }) if reason.contains("no dataset"))
        );
    }

    #[test]
    fn empty_role_is_malformed() {
        let mut raw = input();
        raw.role = String::new();
        assert!(matches!(
            CandidateGrant::from_input(raw),
            Err(AppError::MalformedRecord { .. })
        ));
    }
}
