//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod csv_access_map_source;
mod csv_codec;
mod csv_decision_report_writer;
mod file_io;
mod json_checkpoint_store;
mod json_configuration;
mod terraform_binding_renderer;

pub use csv_access_map_source::CsvAccessMapSource;
pub use csv_decision_report_writer::CsvDecisionReportWriter;
pub use json_checkpoint_store::JsonCheckpointStore;
pub use json_configuration::{load_access_right_map, load_role_priority_table};
pub use terraform_binding_renderer::{
    DATASET_ACCESS_FILE, TABLE_ACCESS_FILE, TerraformBindingRenderer,
};
