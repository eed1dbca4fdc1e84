use crate::utils::error::{HoldingsError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(HoldingsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(HoldingsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(HoldingsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_file_extensions(
    field_name: &str,
    files: &[String],
    allowed_extensions: &[&str],
) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    for file in files {
        if let Some(extension) = std::path::Path::new(file)
            .extension()
            .and_then(|ext| ext.to_str())
        {
            if !allowed_set.contains(extension) {
                return Err(HoldingsError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: file.clone(),
                    reason: format!(
                        "Unsupported file extension: {}. Allowed extensions: {}",
                        extension,
                        allowed_extensions.join(", ")
                    ),
                });
            }
        } else {
            return Err(HoldingsError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: file.clone(),
                reason: "File has no extension or invalid filename".to_string(),
            });
        }
    }

    Ok(())
}

/// Snapshot names become file names under the store root, so path
/// separators and null bytes are rejected outright.
pub fn validate_snapshot_name(field_name: &str, name: &str) -> Result<()> {
    validate_non_empty_string(field_name, name)?;

    if name.contains('/') || name.contains('\\') || name.contains('\0') {
        return Err(HoldingsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: "Name cannot contain path separators or null bytes".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("output_path", "./output").is_ok());
        assert!(validate_path("output_path", "").is_err());
        assert!(validate_path("output_path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_file_extensions() {
        let files = vec!["statement.csv".to_string(), "statement.xlsx".to_string()];
        assert!(validate_file_extensions("files", &files, &["csv", "xlsx"]).is_ok());

        let invalid_files = vec!["statement.pdf".to_string()];
        assert!(validate_file_extensions("files", &invalid_files, &["csv", "xlsx"]).is_err());

        let no_extension = vec!["statement".to_string()];
        assert!(validate_file_extensions("files", &no_extension, &["csv", "xlsx"]).is_err());
    }

    #[test]
    fn test_validate_snapshot_name() {
        assert!(validate_snapshot_name("name", "q1-holdings").is_ok());
        assert!(validate_snapshot_name("name", "").is_err());
        assert!(validate_snapshot_name("name", "   ").is_err());
        assert!(validate_snapshot_name("name", "../escape").is_err());
        assert!(validate_snapshot_name("name", "a\\b").is_err());
    }
}
