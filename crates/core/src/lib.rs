//! Shared primitives for all Rust crates in Liftmap.

#![forbid(unsafe_code)]

/// Provenance metadata stamped onto persisted mapping runs.
pub mod provenance;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use provenance::RunProvenance;

/// Result type used across Liftmap crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
///
/// Surrounding whitespace is trimmed so identifiers read from spreadsheets
/// compare equal regardless of stray padding.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        if trimmed.len() == value.len() {
            return Ok(Self(value));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for NonEmptyString {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Identifier of one mapping run, stamped onto checkpoints and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    /// Creates a random run identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a run identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RunId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Static configuration (role map, priority table, environment) is unusable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A candidate role has no entry in the role priority table.
    #[error("configuration error: role '{role}' has no entry in the role priority table")]
    UnrankedRole {
        /// Role name that could not be ranked.
        role: String,
    },

    /// An input record is missing a required field or is otherwise unusable.
    #[error("malformed record {record}: {reason}")]
    MalformedRecord {
        /// Human-readable rendering of the offending record.
        record: String,
        /// What is wrong with the record.
        reason: String,
    },

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Reading or writing an artifact failed.
    #[error("io error: {0}")]
    Io(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns whether the error stems from configuration rather than input data.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::UnrankedRole { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::{AppError, NonEmptyString, RunId};

    #[test]
    fn non_empty_string_rejects_whitespace() {
        let result = NonEmptyString::new("   ");
        assert!(result.is_err());
    }

    #[test]
    fn non_empty_string_trims_padding() {
        let value = NonEmptyString::new("  proj1 ").unwrap_or_else(|_| unreachable!());
        assert_eq!(value.as_str(), "proj1");
    }

    #[test]
    fn non_empty_string_deserialization_is_validated() {
        let parsed: Result<NonEmptyString, _> = serde_json::from_str("\" \"");
        assert!(parsed.is_err());
    }

    #[test]
    fn run_id_formats_as_uuid() {
        let run_id = RunId::new();
        assert_eq!(run_id.to_string().len(), 36);
    }

    #[test]
    fn unranked_role_counts_as_configuration_error() {
        let error = AppError::UnrankedRole {
            role: "ghost".to_owned(),
        };
        assert!(error.is_configuration());
        assert!(error.to_string().contains("ghost"));
    }
}
