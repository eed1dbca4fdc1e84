pub mod aggregate;
pub mod export;
pub mod extract;
pub mod normalize;
pub mod pipeline;

pub use crate::domain::model::{PivotTable, Record, RecordSet, UploadedFile};
pub use crate::utils::error::Result;
