use liftmap_core::AppResult;
use liftmap_domain::AccessMapRecord;

/// Input port supplying validated access-map records.
pub trait AccessMapSource: Send + Sync {
    /// Loads every record, failing on the first malformed one.
    fn load_records(&self) -> AppResult<Vec<AccessMapRecord>>;
}
