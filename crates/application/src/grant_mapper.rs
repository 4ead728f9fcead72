use std::sync::Arc;

use liftmap_core::{AppError, AppResult};
use liftmap_domain::{AccessMapRecord, AccessRightMap, CandidateGrant, RoleMapping};
use tracing::{debug, info};

/// Candidate grants derived from access-map records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappedGrants {
    /// One candidate per record whose access right maps to a role.
    pub grants: Vec<CandidateGrant>,
    /// Row numbers of records whose access right has no target equivalent.
    pub not_applicable_rows: Vec<usize>,
}

/// Translates source access rights into candidate role grants.
#[derive(Debug, Clone)]
pub struct GrantMapper {
    access_rights: Arc<AccessRightMap>,
}

impl GrantMapper {
    /// Creates a mapper over an immutable access-right map.
    #[must_use]
    pub fn new(access_rights: Arc<AccessRightMap>) -> Self {
        Self { access_rights }
    }

    /// Maps every record to a candidate grant.
    ///
    /// All records are checked before any grant is produced; every access
    /// right without a mapping is reported in a single error.
    pub fn map_records(&self, records: &[AccessMapRecord]) -> AppResult<MappedGrants> {
        let missing = self.access_rights.missing_codes(
            records
                .iter()
                .map(|record| record.access_right().as_str()),
        );
        if !missing.is_empty() {
            return Err(AppError::Configuration(format!(
                "access rights without a role mapping: {}",
                missing.into_iter().collect::<Vec<_>>().join(", ")
            )));
        }

        let mut mapped = MappedGrants::default();
        for record in records {
            let code = record.access_right().as_str();
            match self.access_rights.role_for(code) {
                Some(RoleMapping::Role(role)) => mapped.grants.push(CandidateGrant::new(
                    record.scope().clone(),
                    record.member().clone(),
                    role.clone(),
                    [code.to_owned()],
                )),
                Some(RoleMapping::NotApplicable) => {
                    debug!(
                        row = record.row_number(),
                        access_right = code,
                        "access right has no target role"
                    );
                    mapped.not_applicable_rows.push(record.row_number());
                }
                None => {
                    return Err(AppError::Internal(format!(
                        "access right '{code}' lost its mapping during translation"
                    )));
                }
            }
        }

        info!(
            records = records.len(),
            grants = mapped.grants.len(),
            not_applicable = mapped.not_applicable_rows.len(),
            "mapped access rights to candidate grants"
        );

        Ok(mapped)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use liftmap_core::AppError;
    use liftmap_domain::{
        AccessMapRecord, AccessMapRecordInput, AccessRightMap, AccessRightMapping, RoleName,
    };

    use super::GrantMapper;

    fn mapper() -> GrantMapper {
        GrantMapper::new(Arc::new(
            AccessRightMap::new([
                AccessRightMapping::new("R", Some("Retrieve/Select".to_owned()), "viewer")
                    .unwrap_or_else(|_| unreachable!()),
                AccessRightMapping::new("I", Some("Insert".to_owned()), "editor")
                    .unwrap_or_else(|_| unreachable!()),
                AccessRightMapping::new("CM", Some("Create Macro".to_owned()), "NOT_APPLICABLE")
                    .unwrap_or_else(|_| unreachable!()),
            ])
            .unwrap_or_else(|_| unreachable!()),
        ))
    }

    fn record(row_number: usize, access_right: &str, table: &str) -> AccessMapRecord {
        AccessMapRecord::from_input(
            row_number,
            AccessMapRecordInput {
                source_role: "td_role".to_owned(),
                source_database: "sales".to_owned(),
                access_right: access_right.to_owned(),
                source_table: table.to_owned(),
                member: "group:analysts@example.com".to_owned(),
                project: "proj1".to_owned(),
                dataset: "sales".to_owned(),
                table: table.to_owned(),
            },
        )
        .unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn maps_rights_and_skips_not_applicable_rows() {
        let records = [record(1, "R", "All"), record(2, "CM", "All"), record(3, "I", "orders")];
        let mapped = mapper()
            .map_records(&records)
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(mapped.grants.len(), 2);
        assert_eq!(mapped.not_applicable_rows, vec![2]);
        assert_eq!(
            mapped.grants[0].role(),
            &RoleName::new("viewer").unwrap_or_else(|_| unreachable!())
        );
        assert!(!mapped.grants[0].scope().is_table());
        assert!(mapped.grants[1].scope().is_table());
        assert!(mapped.grants[1].source_access_rights().contains("I"));
    }

    #[test]
    fn reports_every_unmapped_access_right_at_once() {
        let records = [record(1, "R", "All"), record(2, "DT", "All"), record(3, "CV", "All")];
        let result = mapper().map_records(&records);

        assert!(matches!(
            result,
            Err(AppError::Configuration(message)) if message.contains("CV, DT")
        ));
    }
}
