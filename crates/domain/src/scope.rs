use std::fmt::{Display, Formatter};

use liftmap_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Table-name marker that denotes a dataset-level grant in access-map input.
pub const DATASET_SCOPE_MARKER: &str = "All";

/// Level of a scope inside the project → dataset → table hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeLevel {
    /// Whole dataset; contained tables inherit its bindings.
    Dataset,
    /// Single table inside a dataset.
    Table,
}

impl ScopeLevel {
    /// Returns a stable label for reports.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dataset => "dataset",
            Self::Table => "table",
        }
    }
}

/// A node in the two-level containment hierarchy.
///
/// Ordering sorts by project, then dataset, with a dataset scope placed
/// before every table it contains.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceScope {
    project: NonEmptyString,
    dataset: NonEmptyString,
    table: Option<NonEmptyString>,
}

impl ResourceScope {
    /// Creates a dataset scope.
    pub fn dataset(project: impl Into<String>, dataset: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            project: NonEmptyString::new(project)?,
            dataset: NonEmptyString::new(dataset)?,
            table: None,
        })
    }

    /// Creates a table scope inside a dataset.
    pub fn table(
        project: impl Into<String>,
        dataset: impl Into<String>,
        table: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            project: NonEmptyString::new(project)?,
            dataset: NonEmptyString::new(dataset)?,
            table: Some(NonEmptyString::new(table)?),
        })
    }

    /// Creates a scope from an optional table id.
    pub fn from_parts(
        project: impl Into<String>,
        dataset: impl Into<String>,
        table: Option<String>,
    ) -> AppResult<Self> {
        match table {
            Some(table) => Self::table(project, dataset, table),
            None => Self::dataset(project, dataset),
        }
    }

    /// Returns the project id.
    #[must_use]
    pub fn project(&self) -> &NonEmptyString {
        &self.project
    }

    /// Returns the dataset id.
    #[must_use]
    pub fn dataset_id(&self) -> &NonEmptyString {
        &self.dataset
    }

    /// Returns the table id for table scopes.
    #[must_use]
    pub fn table_id(&self) -> Option<&NonEmptyString> {
        self.table.as_ref()
    }

    /// Returns the hierarchy level of this scope.
    #[must_use]
    pub fn level(&self) -> ScopeLevel {
        if self.table.is_some() {
            ScopeLevel::Table
        } else {
            ScopeLevel::Dataset
        }
    }

    /// Returns whether this is a table scope.
    #[must_use]
    pub fn is_table(&self) -> bool {
        self.table.is_some()
    }

    /// Returns the containing dataset scope, or `None` for dataset scopes.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.table.as_ref().map(|_| self.dataset_scope())
    }

    /// Returns the dataset scope this scope belongs to (itself for datasets).
    #[must_use]
    pub fn dataset_scope(&self) -> Self {
        Self {
            project: self.project.clone(),
            dataset: self.dataset.clone(),
            table: None,
        }
    }
}

impl Display for ResourceScope {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.table {
            Some(table) => write!(formatter, "{}.{}.{}", self.project, self.dataset, table),
            None => write!(formatter, "{}.{}", self.project, self.dataset),
        }
    }
}

/// The principal (user or group) receiving access.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Member(NonEmptyString);

impl Member {
    /// Creates a validated member identifier.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        Ok(Self(NonEmptyString::new(value)?))
    }

    /// Returns the member identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for Member {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}
