pub mod config;
pub mod core;
pub mod domain;
pub mod store;
pub mod utils;

pub use config::profile::{ColumnSelector, NormalizerProfile};
pub use config::{CliConfig, ExportFormat};
pub use core::pipeline::{process_batch, BatchReport, FileIssue, IssueSeverity};
pub use domain::model::{
    FileFormat, PivotTable, Record, RecordSet, SessionContext, UploadedFile,
};
pub use store::{HashedNamespace, LocalStorage, SnapshotStore, DEFAULT_NAMESPACE};
pub use utils::error::{HoldingsError, Result};
