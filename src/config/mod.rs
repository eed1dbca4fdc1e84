pub mod profile;

use crate::utils::error::{HoldingsError, Result};
use crate::utils::validation::{
    validate_file_extensions, validate_path, validate_snapshot_name, Validate,
};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Both,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "holdings-etl")]
#[command(about = "Aggregates shareholding statements into a company-by-owner pivot table")]
pub struct CliConfig {
    /// Shareholding statement files to ingest (.csv or .xlsx)
    pub files: Vec<String>,

    /// Directory the exported pivot files are written to
    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Normalizer profile TOML; built-in vendor defaults when omitted
    #[arg(long)]
    pub profile: Option<String>,

    /// Export format for the computed pivot
    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    pub export: ExportFormat,

    /// Emit the batch report as JSON instead of a rendered table
    #[arg(long)]
    pub json: bool,

    /// Shared secret selecting the snapshot namespace
    #[arg(long)]
    pub credential: Option<String>,

    /// Root directory for saved pivot snapshots
    #[arg(long, default_value = "./snapshots")]
    pub store_root: String,

    /// Save the computed pivot as a snapshot; a timestamped name is
    /// generated when no name is given
    #[arg(long)]
    pub save: Option<Option<String>>,

    /// List snapshots in the active namespace and exit
    #[arg(long)]
    pub list_snapshots: bool,

    /// Load a snapshot, print it, and exit
    #[arg(long, value_name = "NAME")]
    pub load_snapshot: Option<String>,

    /// Delete a snapshot and exit
    #[arg(long, value_name = "NAME")]
    pub delete_snapshot: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn is_snapshot_command(&self) -> bool {
        self.list_snapshots || self.load_snapshot.is_some() || self.delete_snapshot.is_some()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("output_path", &self.output_path)?;
        validate_path("store_root", &self.store_root)?;
        validate_file_extensions("files", &self.files, &["csv", "xlsx"])?;

        if let Some(Some(name)) = &self.save {
            validate_snapshot_name("save", name)?;
        }
        if let Some(name) = &self.load_snapshot {
            validate_snapshot_name("load_snapshot", name)?;
        }
        if let Some(name) = &self.delete_snapshot {
            validate_snapshot_name("delete_snapshot", name)?;
        }

        if self.files.is_empty() && !self.is_snapshot_command() {
            return Err(HoldingsError::ConfigError {
                message: "No input files given. Pass one or more .csv/.xlsx statements, \
                          or a snapshot command such as --list-snapshots"
                    .to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> CliConfig {
        CliConfig::parse_from(["holdings-etl", "statement.csv"])
    }

    #[test]
    fn test_validate_accepts_csv_and_xlsx_inputs() {
        let config = CliConfig::parse_from(["holdings-etl", "a.csv", "b.xlsx"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_extension() {
        let config = CliConfig::parse_from(["holdings-etl", "a.pdf"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_requires_files_or_snapshot_command() {
        let config = CliConfig::parse_from(["holdings-etl"]);
        assert!(config.validate().is_err());

        let config = CliConfig::parse_from(["holdings-etl", "--list-snapshots"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_snapshot_names() {
        let mut config = base_config();
        config.save = Some(Some("../escape".to_string()));
        assert!(config.validate().is_err());

        let mut config = base_config();
        config.load_snapshot = Some("a/b".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_without_name_is_accepted() {
        let config = CliConfig::parse_from(["holdings-etl", "a.csv", "--save"]);
        assert_eq!(config.save, Some(None));
        assert!(config.validate().is_ok());
    }
}
