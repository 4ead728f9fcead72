use std::path::PathBuf;

use liftmap_application::AccessMapSource;
use liftmap_core::{AppError, AppResult};
use liftmap_domain::{AccessMapRecord, AccessMapRecordInput};
use tracing::debug;

use crate::csv_codec::{CsvRow, parse_rows};
use crate::file_io::read_text;

const REQUIRED_COLUMNS: [&str; 8] = [
    "Role",
    "DatabaseName",
    "AccessRight",
    "TableName",
    "GCPGroupName",
    "GCPProjectId",
    "BQDatasetName",
    "BQTableName",
];

/// Access-map source backed by a CSV file with a header row.
#[derive(Debug, Clone)]
pub struct CsvAccessMapSource {
    path: PathBuf,
}

impl CsvAccessMapSource {
    /// Creates a source reading the given file on every load.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AccessMapSource for CsvAccessMapSource {
    fn load_records(&self) -> AppResult<Vec<AccessMapRecord>> {
        let text = read_text(&self.path, "access map")?;
        let records = parse_access_map(&text).map_err(|error| match error {
            AppError::Validation(message) => AppError::Validation(format!(
                "access map '{}': {message}",
                self.path.display()
            )),
            other => other,
        })?;

        debug!(path = %self.path.display(), records = records.len(), "parsed access map");
        Ok(records)
    }
}

/// Parses access-map CSV text into validated records.
///
/// Columns are located by header name; extra columns are ignored.
pub(crate) fn parse_access_map(text: &str) -> AppResult<Vec<AccessMapRecord>> {
    let mut rows = parse_rows(text)?.into_iter();
    let Some(header) = rows.next() else {
        return Err(AppError::Validation("file has no header row".to_owned()));
    };

    let columns = locate_columns(&header)?;
    rows.enumerate()
        .map(|(index, row)| {
            AccessMapRecord::from_input(index + 1, record_input(&row, &columns)).map_err(
                |error| match error {
                    AppError::MalformedRecord { record, reason } => AppError::MalformedRecord {
                        record,
                        reason: format!("{reason} (line {})", row.line),
                    },
                    other => other,
                },
            )
        })
        .collect()
}

fn locate_columns(header: &CsvRow) -> AppResult<[usize; 8]> {
    let position = |name: &str| {
        header
            .fields
            .iter()
            .position(|field| field.trim() == name)
    };

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .into_iter()
        .filter(|name| position(*name).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Validation(format!(
            "header is missing required columns: {}",
            missing.join(", ")
        )));
    }

    let mut columns = [0; 8];
    for (slot, name) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = position(name).unwrap_or_default();
    }

    Ok(columns)
}

fn record_input(row: &CsvRow, columns: &[usize; 8]) -> AccessMapRecordInput {
    let cell = |slot: usize| {
        row.fields
            .get(columns[slot])
            .map(|value| value.trim().to_owned())
            .unwrap_or_default()
    };

    AccessMapRecordInput {
        source_role: cell(0),
        source_database: cell(1),
        access_right: cell(2),
        source_table: cell(3),
        member: cell(4),
        project: cell(5),
        dataset: cell(6),
        table: cell(7),
    }
}
