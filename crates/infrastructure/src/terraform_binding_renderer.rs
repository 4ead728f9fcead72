//! Terraform `locals` rendering of a binding set.
//!
//! Dataset and table bindings go to separate files so each can be consumed
//! by its own `for_each` over `google_bigquery_dataset_iam_member` or
//! `google_bigquery_table_iam_member` resources. Both files come from the
//! `templates/access_locals.tf` askama template. Entries are sorted by
//! scope and member so re-rendering the same bindings is byte-identical.

use std::path::{Path, PathBuf};

use askama::Template;
use liftmap_application::{ArtifactKind, BindingRenderer, BindingSet, WrittenArtifact};
use liftmap_core::{AppError, AppResult};
use liftmap_domain::{Binding, ResourceScope};

use crate::file_io::write_atomically;

/// File receiving dataset-level access.
pub const DATASET_ACCESS_FILE: &str = "dataset_access_locals.tf";
/// File receiving table-level access.
pub const TABLE_ACCESS_FILE: &str = "table_access_locals.tf";

/// Renders bindings as Terraform locals into an output directory.
#[derive(Debug, Clone)]
pub struct TerraformBindingRenderer {
    output_dir: PathBuf,
}

impl TerraformBindingRenderer {
    /// Creates a renderer writing into `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    fn write(
        &self,
        file_name: &str,
        kind: ArtifactKind,
        local_name: &str,
        bindings: &[&Binding],
    ) -> AppResult<WrittenArtifact> {
        let path = self.output_dir.join(file_name);
        let contents = render_locals(local_name, bindings)?;
        write_atomically(&path, contents.as_bytes(), kind.as_str())?;

        Ok(artifact(kind, &path, bindings.len()))
    }
}

impl BindingRenderer for TerraformBindingRenderer {
    fn render(&self, bindings: &BindingSet) -> AppResult<Vec<WrittenArtifact>> {
        let dataset_bindings: Vec<&Binding> = bindings.dataset_bindings().collect();
        let table_bindings: Vec<&Binding> = bindings.table_bindings().collect();

        Ok(vec![
            self.write(
                DATASET_ACCESS_FILE,
                ArtifactKind::DatasetAccess,
                "dataset_access",
                &dataset_bindings,
            )?,
            self.write(
                TABLE_ACCESS_FILE,
                ArtifactKind::TableAccess,
                "table_access",
                &table_bindings,
            )?,
        ])
    }
}

fn artifact(kind: ArtifactKind, path: &Path, entry_count: usize) -> WrittenArtifact {
    WrittenArtifact {
        kind,
        location: path.display().to_string(),
        entry_count,
    }
}

/// One `locals` file; every value is already HCL-escaped.
#[derive(Template)]
#[template(path = "access_locals.tf", escape = "none")]
struct AccessLocalsTemplate<'a> {
    local_name: &'a str,
    scopes: Vec<ScopeEntry>,
}

struct ScopeEntry {
    key: String,
    project_id: String,
    dataset_id: String,
    /// Empty for dataset scopes.
    table_id: String,
    access: Vec<AccessEntry>,
}

struct AccessEntry {
    role: String,
    member: String,
}

impl ScopeEntry {
    fn new(scope: &ResourceScope, bindings: &[&Binding]) -> Self {
        Self {
            key: hcl_escape(&scope.to_string()),
            project_id: hcl_escape(scope.project().as_str()),
            dataset_id: hcl_escape(scope.dataset_id().as_str()),
            table_id: scope
                .table_id()
                .map(|table| hcl_escape(table.as_str()))
                .unwrap_or_default(),
            access: bindings
                .iter()
                .map(|binding| AccessEntry {
                    role: hcl_escape(binding.role().as_str()),
                    member: hcl_escape(binding.member().as_str()),
                })
                .collect(),
        }
    }
}

/// Bindings must already be ordered by scope, then member.
fn render_locals(local_name: &str, bindings: &[&Binding]) -> AppResult<String> {
    let template = AccessLocalsTemplate {
        local_name,
        scopes: bindings
            .chunk_by(|left, right| left.scope() == right.scope())
            .map(|group| ScopeEntry::new(group[0].scope(), group))
            .collect(),
    };

    let mut output = template.render().map_err(|error| {
        AppError::Internal(format!("failed to render {local_name} locals: {error}"))
    })?;
    output.truncate(output.trim_end().len());
    output.push('\n');

    Ok(output)
}

/// Escapes a value for a double-quoted HCL string, disabling interpolation.
fn hcl_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(character) = chars.next() {
        match character {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '$' | '%' if chars.peek() == Some(&'{') => {
                escaped.push(character);
                escaped.push(character);
            }
            _ => escaped.push(character),
        }
    }

    escaped
}
