//! Loaders for the access-right map and role priority table.

use std::collections::BTreeMap;
use std::path::Path;

use liftmap_core::{AppError, AppResult};
use liftmap_domain::{AccessRightMap, AccessRightMapping, RoleName, RolePriorityTable};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::file_io::read_text;

const VERSION_KEY: &str = "version";

#[derive(Debug, Deserialize)]
struct AccessRightEntry {
    iam_role: String,
    #[serde(default)]
    description: Option<String>,
}

/// Loads the access-right map from a JSON object keyed by access-right code.
pub fn load_access_right_map(path: &Path) -> AppResult<AccessRightMap> {
    let text = read_text(path, "access-right map")?;
    let map = parse_access_right_map(&text).map_err(|error| with_path(error, path))?;
    info!(path = %path.display(), access_rights = map.len(), "loaded access-right map");
    Ok(map)
}

/// Loads role ranks from a JSON object of `role -> rank`.
pub fn load_role_priority_table(path: &Path) -> AppResult<RolePriorityTable> {
    let text = read_text(path, "role priority table")?;
    let table = parse_role_priority_table(&text).map_err(|error| with_path(error, path))?;
    info!(path = %path.display(), roles = table.len(), "loaded role priority table");
    Ok(table)
}

pub(crate) fn parse_access_right_map(text: &str) -> AppResult<AccessRightMap> {
    let object: Map<String, Value> = serde_json::from_str(text).map_err(|error| {
        AppError::Configuration(format!("access-right map is not a JSON object: {error}"))
    })?;

    let entries = object
        .into_iter()
        .filter(|(code, _)| code != VERSION_KEY)
        .map(|(code, value)| {
            let entry: AccessRightEntry = serde_json::from_value(value).map_err(|error| {
                AppError::Configuration(format!("access right '{code}' is invalid: {error}"))
            })?;
            AccessRightMapping::new(code, entry.description, entry.iam_role.as_str())
        })
        .collect::<AppResult<Vec<_>>>()?;

    let map = AccessRightMap::new(entries)?;
    if map.is_empty() {
        return Err(AppError::Configuration(
            "access-right map defines no access rights".to_owned(),
        ));
    }

    Ok(map)
}

pub(crate) fn parse_role_priority_table(text: &str) -> AppResult<RolePriorityTable> {
    let ranks: BTreeMap<String, u32> = serde_json::from_str(text).map_err(|error| {
        AppError::Configuration(format!(
            "role priority table must map role names to non-negative integers: {error}"
        ))
    })?;

    let entries = ranks
        .into_iter()
        .map(|(role, rank)| {
            RoleName::new(role)
                .map(|role| (role, rank))
                .map_err(|error| AppError::Configuration(error.to_string()))
        })
        .collect::<AppResult<Vec<_>>>()?;

    let table = RolePriorityTable::new(entries)?;
    if table.is_empty() {
        return Err(AppError::Configuration(
            "role priority table defines no roles".to_owned(),
        ));
    }

    Ok(table)
}

fn with_path(error: AppError, path: &Path) -> AppError {
    match error {
        AppError::Configuration(message) => {
            AppError::Configuration(format!("{}: {message}", path.display()))
        }
        other => other,
    }
}
