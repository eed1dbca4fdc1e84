use crate::utils::error::Result;

/// Flat byte storage under a root. Paths use `/` separators relative to the
/// root; implementations create parent directories on write.
pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
    /// File names (not paths) directly under `dir`. A missing directory is
    /// an empty listing, not an error.
    fn list_files(&self, dir: &str) -> Result<Vec<String>>;
    fn remove_file(&self, path: &str) -> Result<()>;
}

/// Maps an optional credential to a storage namespace. This is folder-level
/// separation, not access control.
pub trait NamespaceStrategy {
    fn namespace(&self, credential: Option<&str>) -> String;
}
