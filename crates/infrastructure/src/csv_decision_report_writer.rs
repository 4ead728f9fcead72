use std::path::PathBuf;

use liftmap_application::{
    ArtifactKind, ConsolidationReport, DecisionReportWriter, GrantDecision, WrittenArtifact,
};
use liftmap_core::AppResult;
use liftmap_domain::DATASET_SCOPE_MARKER;

use crate::csv_codec::join_fields;
use crate::file_io::write_atomically;

const HEADER: [&str; 8] = [
    "project",
    "dataset",
    "table",
    "member",
    "role",
    "decision",
    "superseded_by",
    "source_access_rights",
];

/// Writes consolidation decisions as CSV, one row per candidate.
///
/// Dataset-level rows carry `All` in the table column, matching the input
/// access map.
#[derive(Debug, Clone)]
pub struct CsvDecisionReportWriter {
    path: PathBuf,
}

impl CsvDecisionReportWriter {
    /// Creates a writer bound to an output file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DecisionReportWriter for CsvDecisionReportWriter {
    fn write_report(&self, report: &ConsolidationReport) -> AppResult<WrittenArtifact> {
        let mut output = join_fields(HEADER);
        output.push('\n');
        for decision in report.decisions() {
            output.push_str(&decision_row(decision));
            output.push('\n');
        }

        write_atomically(&self.path, output.as_bytes(), "decision report")?;

        Ok(WrittenArtifact {
            kind: ArtifactKind::DecisionReport,
            location: self.path.display().to_string(),
            entry_count: report.decisions().len(),
        })
    }
}

fn decision_row(decision: &GrantDecision) -> String {
    let rights = decision
        .source_access_rights
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(";");

    join_fields([
        decision.scope.project().as_str(),
        decision.scope.dataset_id().as_str(),
        decision
            .scope
            .table_id()
            .map_or(DATASET_SCOPE_MARKER, |table| table.as_str()),
        decision.member.as_str(),
        decision.role.as_str(),
        decision.outcome.as_str(),
        decision
            .outcome
            .superseding_role()
            .map_or("", |role| role.as_str()),
        rights.as_str(),
    ])
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use liftmap_application::{Consolidator, DecisionReportWriter};
    use liftmap_domain::{CandidateGrant, Member, ResourceScope, RoleName, RolePriorityTable};

    use super::CsvDecisionReportWriter;

    fn grant(table: Option<&str>, role: &str, rights: &[&str]) -> CandidateGrant {
        CandidateGrant::new(
            ResourceScope::from_parts("proj1", "sales", table.map(str::to_owned))
                .unwrap_or_else(|_| unreachable!()),
            Member::new("group:analysts@example.com").unwrap_or_else(|_| unreachable!()),
            RoleName::new(role).unwrap_or_else(|_| unreachable!()),
            rights.iter().map(|right| (*right).to_owned()),
        )
    }

    #[test]
    fn writes_one_row_per_decision() {
        let consolidation = Consolidator::new(Arc::new(RolePriorityTable::bigquery_default()))
            .consolidate(&[
                grant(None, "roles/bigquery.dataEditor", &["I", "D"]),
                grant(None, "roles/bigquery.dataViewer", &["R"]),
                grant(Some("orders"), "roles/bigquery.dataViewer", &["R"]),
            ])
            .unwrap_or_else(|_| unreachable!());

        let directory = tempfile::tempdir().unwrap_or_else(|_| unreachable!());
        let path = directory.path().join("decisions.csv");
        let artifact = CsvDecisionReportWriter::new(&path)
            .write_report(&consolidation.report)
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(artifact.entry_count, 3);

        let written = fs::read_to_string(&path).unwrap_or_else(|_| unreachable!());
        assert_eq!(
            written,
            "project,dataset,table,member,role,decision,superseded_by,source_access_rights\n\
             proj1,sales,All,group:analysts@example.com,roles/bigquery.dataEditor,granted,,D;I\n\
             proj1,sales,All,group:analysts@example.com,roles/bigquery.dataViewer,superseded,roles/bigquery.dataEditor,R\n\
             proj1,sales,orders,group:analysts@example.com,roles/bigquery.dataViewer,inherited_from_dataset,roles/bigquery.dataEditor,R\n"
        );
    }
}
