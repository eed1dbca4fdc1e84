use crate::utils::error::{HoldingsError, Result};
use crate::utils::validation::{validate_non_empty_string, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How the normalizer picks the company and quantity columns out of a
/// statement. Both variants are export-layout assumptions; which one applies
/// depends on the vendor producing the statements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ColumnSelector {
    /// Fixed zero-based positions. The header must be wider than the
    /// highest index used.
    ByIndex { company: usize, quantity: usize },
    /// Exact header names. All named columns must be present.
    ByName { company: String, quantity: String },
}

impl Default for ColumnSelector {
    fn default() -> Self {
        // Matches the known vendor layout: company in the second column,
        // quantity in the ninth.
        ColumnSelector::ByIndex {
            company: 1,
            quantity: 8,
        }
    }
}

/// Parsing parameters for one statement export layout.
///
/// `skip_rows` and `drop_footer` encode the vendor's report banner and
/// trailing totals row. They are configuration rather than constants so a
/// slightly different export does not get silently mis-parsed. Note that
/// `drop_footer` drops the last data row unconditionally; whether a footer
/// is actually present is never detected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizerProfile {
    /// Leading presentation rows to skip in spreadsheet input before the
    /// header row. Delimited-text input is expected to start at the header
    /// and is not affected.
    #[serde(default = "default_skip_rows")]
    pub skip_rows: usize,

    /// Drop the last data row, assumed to be a report-level totals row.
    #[serde(default = "default_drop_footer")]
    pub drop_footer: bool,

    #[serde(default)]
    pub columns: ColumnSelector,
}

fn default_skip_rows() -> usize {
    5
}

fn default_drop_footer() -> bool {
    true
}

impl Default for NormalizerProfile {
    fn default() -> Self {
        Self {
            skip_rows: default_skip_rows(),
            drop_footer: default_drop_footer(),
            columns: ColumnSelector::default(),
        }
    }
}

impl NormalizerProfile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let profile: NormalizerProfile =
            toml::from_str(&content).map_err(|e| HoldingsError::ConfigError {
                message: format!(
                    "Failed to parse profile '{}': {}",
                    path.as_ref().display(),
                    e
                ),
            })?;
        profile.validate()?;
        Ok(profile)
    }
}

impl Validate for NormalizerProfile {
    fn validate(&self) -> Result<()> {
        match &self.columns {
            ColumnSelector::ByIndex { company, quantity } => {
                if company == quantity {
                    return Err(HoldingsError::InvalidConfigValueError {
                        field: "columns".to_string(),
                        value: format!("company={}, quantity={}", company, quantity),
                        reason: "Company and quantity columns must differ".to_string(),
                    });
                }
            }
            ColumnSelector::ByName { company, quantity } => {
                validate_non_empty_string("columns.company", company)?;
                validate_non_empty_string("columns.quantity", quantity)?;
            }
        }
        Ok(())
    }
}
