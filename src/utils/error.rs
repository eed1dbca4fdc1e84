use thiserror::Error;

#[derive(Error, Debug)]
pub enum HoldingsError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Spreadsheet read error: {0}")]
    SpreadsheetError(#[from] calamine::XlsxError),

    #[error("Spreadsheet write error: {0}")]
    XlsxWriteError(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("File {file} does not have the expected structure: {reason}")]
    StructuralError { file: String, reason: String },

    #[error("Error processing {file}: {message}")]
    ParseError { file: String, message: String },

    #[error("Snapshot '{name}' not found in namespace '{namespace}'")]
    SnapshotNotFoundError { namespace: String, name: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, HoldingsError>;
