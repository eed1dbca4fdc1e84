use crate::config::profile::NormalizerProfile;
use crate::core::{aggregate, normalize};
use crate::domain::model::{PivotTable, UploadedFile};
use crate::utils::error::HoldingsError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Warning,
    Error,
}

/// One skipped file and why. Skips never abort the batch.
#[derive(Debug, Clone, Serialize)]
pub struct FileIssue {
    pub file: String,
    pub severity: IssueSeverity,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub files_received: usize,
    pub files_processed: usize,
    pub issues: Vec<FileIssue>,
    /// `None` when no file produced a usable record set.
    pub pivot: Option<PivotTable>,
}

/// Runs the whole ingestion-and-aggregation pipeline over one file batch.
///
/// Files are processed sequentially. Structural problems surface as
/// warnings, parse failures as errors; both skip the file and continue.
/// A partial pivot is never produced: either a file's rows are all in, or
/// the file contributed nothing.
pub fn process_batch(files: &[UploadedFile], profile: &NormalizerProfile) -> BatchReport {
    let mut sets = Vec::new();
    let mut issues = Vec::new();

    for file in files {
        match normalize::normalize(file, profile) {
            Ok(set) => {
                tracing::debug!(
                    "Normalized {} row(s) from {} (owner: {})",
                    set.records.len(),
                    set.source,
                    set.records
                        .first()
                        .map(|r| r.owner.as_str())
                        .unwrap_or("n/a")
                );
                sets.push(set);
            }
            Err(HoldingsError::StructuralError { file, reason }) => {
                tracing::warn!("Skipping {}: {}", file, reason);
                issues.push(FileIssue {
                    file,
                    severity: IssueSeverity::Warning,
                    message: reason,
                });
            }
            Err(e) => {
                tracing::error!("Error processing {}: {}", file.name, e);
                issues.push(FileIssue {
                    file: file.name.clone(),
                    severity: IssueSeverity::Error,
                    message: e.to_string(),
                });
            }
        }
    }

    let pivot = aggregate::pivot(&sets);
    if pivot.is_none() {
        tracing::warn!("No usable records in batch of {} file(s)", files.len());
    }

    BatchReport {
        files_received: files.len(),
        files_processed: sets.len(),
        issues,
        pivot,
    }
}
