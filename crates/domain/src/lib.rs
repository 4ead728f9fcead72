//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod access;
mod grant;
mod record;
mod role;
mod scope;

pub use access::{AccessRight, AccessRightMap, AccessRightMapping, NOT_APPLICABLE_ROLE, RoleMapping};
pub use grant::{Binding, CandidateGrant, CandidateGrantInput};
pub use record::{AccessMapRecord, AccessMapRecordInput};
pub use role::{RoleName, RolePriorityTable};
pub use scope::{DATASET_SCOPE_MARKER, Member, ResourceScope, ScopeLevel};
