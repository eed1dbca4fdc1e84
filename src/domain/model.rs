use serde::{Deserialize, Serialize};

use crate::domain::ports::NamespaceStrategy;

/// Label of the derived per-company sum column. Always the last column.
pub const TOTAL_COLUMN: &str = "Total Holdings";

/// Label of the index column in exported pivot tables.
pub const COMPANY_COLUMN: &str = "Company Name";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    Xlsx,
}

impl FileFormat {
    /// Derives the format tag from a filename extension.
    pub fn from_name(name: &str) -> Option<Self> {
        let extension = std::path::Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())?;
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Some(FileFormat::Csv),
            "xlsx" => Some(FileFormat::Xlsx),
            _ => None,
        }
    }
}

/// One uploaded shareholding statement, scoped to a single batch run.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
    pub format: FileFormat,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>, format: FileFormat) -> Self {
        Self {
            name: name.into(),
            bytes,
            format,
        }
    }
}

/// One normalized statement row. The quantity is carried as raw text;
/// coercion to a number happens during aggregation and never fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub company: String,
    pub quantity: String,
    pub owner: String,
}

/// The normalized rows of one uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSet {
    pub source: String,
    pub records: Vec<Record>,
}

/// Company-by-owner matrix of summed quantities.
///
/// Row order is companies as first encountered by the grouping pass, column
/// order is owners in first-seen order. The "Total Holdings" column is not
/// stored; it is derived as the row-wise sum, which keeps the row-sum
/// invariant true by construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotTable {
    companies: Vec<String>,
    owners: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl PivotTable {
    pub(crate) fn new(companies: Vec<String>, owners: Vec<String>, values: Vec<Vec<f64>>) -> Self {
        debug_assert_eq!(companies.len(), values.len());
        debug_assert!(values.iter().all(|row| row.len() == owners.len()));
        Self {
            companies,
            owners,
            values,
        }
    }

    pub fn companies(&self) -> &[String] {
        &self.companies
    }

    pub fn owners(&self) -> &[String] {
        &self.owners
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }

    pub fn value_at(&self, row: usize, col: usize) -> f64 {
        self.values[row][col]
    }

    pub fn get(&self, company: &str, owner: &str) -> Option<f64> {
        let row = self.companies.iter().position(|c| c == company)?;
        let col = self.owners.iter().position(|o| o == owner)?;
        Some(self.values[row][col])
    }

    pub fn row_total(&self, row: usize) -> f64 {
        self.values[row].iter().sum()
    }

    pub fn total(&self, company: &str) -> Option<f64> {
        let row = self.companies.iter().position(|c| c == company)?;
        Some(self.row_total(row))
    }
}

/// Explicit per-session state threaded through store calls. The credential
/// only selects a storage namespace; it is not an authentication token.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    credential: Option<String>,
}

impl SessionContext {
    pub fn new(credential: Option<String>) -> Self {
        Self { credential }
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    pub fn namespace(&self, strategy: &dyn NamespaceStrategy) -> String {
        strategy.namespace(self.credential.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_format_from_name() {
        assert_eq!(FileFormat::from_name("report.csv"), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_name("report.XLSX"), Some(FileFormat::Xlsx));
        assert_eq!(FileFormat::from_name("report.pdf"), None);
        assert_eq!(FileFormat::from_name("report"), None);
    }

    #[test]
    fn test_pivot_table_lookup() {
        let pivot = PivotTable::new(
            vec!["X".to_string(), "Y".to_string()],
            vec!["Alice".to_string(), "Bob".to_string()],
            vec![vec![10.0, 3.0], vec![5.0, 0.0]],
        );

        assert_eq!(pivot.get("X", "Alice"), Some(10.0));
        assert_eq!(pivot.get("Y", "Bob"), Some(0.0));
        assert_eq!(pivot.get("Z", "Alice"), None);
        assert_eq!(pivot.total("X"), Some(13.0));
        assert_eq!(pivot.total("Y"), Some(5.0));
    }
}
