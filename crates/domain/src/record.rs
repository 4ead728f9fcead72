use std::fmt::{Display, Formatter};

use liftmap_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::{DATASET_SCOPE_MARKER, Member, ResourceScope};

/// Raw access-map row as read from tabular input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessMapRecordInput {
    /// Source-system role holding the access right.
    pub source_role: String,
    /// Source-system database the right applies to.
    pub source_database: String,
    /// Source-system access right code.
    pub access_right: String,
    /// Source-system table name, or `All` for the whole database.
    pub source_table: String,
    /// Target-system member receiving access.
    pub member: String,
    /// Target project id.
    pub project: String,
    /// Target dataset id.
    pub dataset: String,
    /// Target table id, or `All` for a dataset-level grant.
    pub table: String,
}

/// Validated access-map row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessMapRecord {
    row_number: usize,
    source_role: NonEmptyString,
    source_database: NonEmptyString,
    access_right: NonEmptyString,
    source_table: NonEmptyString,
    member: Member,
    scope: ResourceScope,
}

impl AccessMapRecord {
    /// Validates a raw row; every column must be populated.
    pub fn from_input(row_number: usize, input: AccessMapRecordInput) -> AppResult<Self> {
        let missing: Vec<&str> = [
            ("Role", input.source_role.as_str()),
            ("DatabaseName", input.source_database.as_str()),
            ("AccessRight", input.access_right.as_str()),
            ("TableName", input.source_table.as_str()),
            ("GCPGroupName", input.member.as_str()),
            ("GCPProjectId", input.project.as_str()),
            ("BQDatasetName", input.dataset.as_str()),
            ("BQTableName", input.table.as_str()),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.trim().is_empty().then_some(column))
        .collect();

        if !missing.is_empty() {
            return Err(AppError::MalformedRecord {
                record: describe_input(row_number, &input),
                reason: format!("required fields are blank: {}", missing.join(", ")),
            });
        }

        let malformed = |reason: String| AppError::MalformedRecord {
            record: describe_input(row_number, &input),
            reason,
        };

        let table = input.table.trim();
        let table = (!table.eq_ignore_ascii_case(DATASET_SCOPE_MARKER)).then(|| table.to_owned());
        let scope = ResourceScope::from_parts(input.project.as_str(), input.dataset.as_str(), table)
            .map_err(|error| malformed(error.to_string()))?;
        let member =
            Member::new(input.member.as_str()).map_err(|error| malformed(error.to_string()))?;

        Ok(Self {
            row_number,
            source_role: NonEmptyString::new(input.source_role.as_str())
                .map_err(|error| malformed(error.to_string()))?,
            source_database: NonEmptyString::new(input.source_database.as_str())
                .map_err(|error| malformed(error.to_string()))?,
            access_right: NonEmptyString::new(input.access_right.as_str())
                .map_err(|error| malformed(error.to_string()))?,
            source_table: NonEmptyString::new(input.source_table.as_str())
                .map_err(|error| malformed(error.to_string()))?,
            member,
            scope,
        })
    }

    /// Returns the 1-based data row number in the input.
    #[must_use]
    pub fn row_number(&self) -> usize {
        self.row_number
    }

    /// Returns the source-system role.
    #[must_use]
    pub fn source_role(&self) -> &NonEmptyString {
        &self.source_role
    }

    /// Returns the source-system database.
    #[must_use]
    pub fn source_database(&self) -> &NonEmptyString {
        &self.source_database
    }

    /// Returns the source access right code.
    #[must_use]
    pub fn access_right(&self) -> &NonEmptyString {
        &self.access_right
    }

    /// Returns the source-system table name.
    #[must_use]
    pub fn source_table(&self) -> &NonEmptyString {
        &self.source_table
    }

    /// Returns the target member.
    #[must_use]
    pub fn member(&self) -> &Member {
        &self.member
    }

    /// Returns the target scope.
    #[must_use]
    pub fn scope(&self) -> &ResourceScope {
        &self.scope
    }
}

impl Display for AccessMapRecord {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "row {} ({}.{} {} for {} -> {} on {})",
            self.row_number,
            self.source_database,
            self.source_table,
            self.access_right,
            self.source_role,
            self.member,
            self.scope
        )
    }
}

fn describe_input(row_number: usize, input: &AccessMapRecordInput) -> String {
    format!(
        "row {row_number} (Role='{}', DatabaseName='{}', AccessRight='{}', TableName='{}', \
         GCPGroupName='{}', GCPProjectId='{}', BQDatasetName='{}', BQTableName='{}')",
        input.source_role,
        input.source_database,
        input.access_right,
        input.source_table,
        input.member,
        input.project,
        input.dataset,
        input.table
    )
}
