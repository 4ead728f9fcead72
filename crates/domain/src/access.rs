use std::collections::{BTreeMap, BTreeSet};

use liftmap_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::RoleName;

/// Role value marking an access right that has no target-system equivalent.
pub const NOT_APPLICABLE_ROLE: &str = "NOT_APPLICABLE";

/// A source-system atomic permission code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRight {
    code: NonEmptyString,
    description: Option<String>,
}

impl AccessRight {
    /// Creates a validated access right.
    pub fn new(code: impl Into<String>, description: Option<String>) -> AppResult<Self> {
        let description = description.and_then(|value| {
            let trimmed = value.trim().to_owned();
            (!trimmed.is_empty()).then_some(trimmed)
        });

        Ok(Self {
            code: NonEmptyString::new(code)?,
            description,
        })
    }

    /// Returns the access right code.
    #[must_use]
    pub fn code(&self) -> &NonEmptyString {
        &self.code
    }

    /// Returns the human description, if configured.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Target role an access right translates into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleMapping {
    /// The access right is reproduced by granting this role.
    Role(RoleName),
    /// The access right has no equivalent and produces no grant.
    NotApplicable,
}

impl RoleMapping {
    /// Parses a configured role value, honouring the not-applicable marker.
    pub fn parse(value: &str) -> AppResult<Self> {
        if value.trim() == NOT_APPLICABLE_ROLE {
            return Ok(Self::NotApplicable);
        }

        Ok(Self::Role(RoleName::new(value)?))
    }

    /// Returns the mapped role, if any.
    #[must_use]
    pub fn role(&self) -> Option<&RoleName> {
        match self {
            Self::Role(role) => Some(role),
            Self::NotApplicable => None,
        }
    }
}

/// One configured access-right translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRightMapping {
    access_right: AccessRight,
    mapping: RoleMapping,
}

impl AccessRightMapping {
    /// Creates a mapping entry from raw configuration values.
    pub fn new(
        code: impl Into<String>,
        description: Option<String>,
        role: &str,
    ) -> AppResult<Self> {
        let code = code.into();
        let mapping = RoleMapping::parse(role).map_err(|_| {
            AppError::Configuration(format!("access right '{code}' maps to an empty role"))
        })?;

        Ok(Self {
            access_right: AccessRight::new(code, description)?,
            mapping,
        })
    }

    /// Returns the source access right.
    #[must_use]
    pub fn access_right(&self) -> &AccessRight {
        &self.access_right
    }

    /// Returns the target mapping.
    #[must_use]
    pub fn mapping(&self) -> &RoleMapping {
        &self.mapping
    }
}

/// Static lookup from source access right to target role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessRightMap {
    entries: BTreeMap<String, AccessRightMapping>,
}

impl AccessRightMap {
    /// Creates a lookup table, rejecting duplicate access-right codes.
    pub fn new(entries: impl IntoIterator<Item = AccessRightMapping>) -> AppResult<Self> {
        let mut map = BTreeMap::new();
        for entry in entries {
            let code = entry.access_right().code().as_str().to_owned();
            if map.contains_key(&code) {
                return Err(AppError::Configuration(format!(
                    "access right '{code}' is mapped more than once"
                )));
            }
            map.insert(code, entry);
        }

        Ok(Self { entries: map })
    }

    /// Returns the mapping for an access right code.
    #[must_use]
    pub fn role_for(&self, code: &str) -> Option<&RoleMapping> {
        self.entries.get(code.trim()).map(AccessRightMapping::mapping)
    }

    /// Returns the configured access right for a code.
    #[must_use]
    pub fn access_right(&self, code: &str) -> Option<&AccessRight> {
        self.entries
            .get(code.trim())
            .map(AccessRightMapping::access_right)
    }

    /// Returns the codes among `codes` that have no mapping.
    #[must_use]
    pub fn missing_codes<'a>(&self, codes: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
        codes
            .into_iter()
            .map(str::trim)
            .filter(|code| !self.entries.contains_key(*code))
            .map(str::to_owned)
            .collect()
    }

    /// Returns every role the map can produce.
    #[must_use]
    pub fn target_roles(&self) -> BTreeSet<&RoleName> {
        self.entries
            .values()
            .filter_map(|entry| entry.mapping().role())
            .collect()
    }

    /// Returns the number of configured access rights.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no access rights are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
