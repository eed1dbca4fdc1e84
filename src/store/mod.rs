mod fs;

pub use fs::LocalStorage;

use crate::core::export;
use crate::domain::model::PivotTable;
use crate::domain::ports::{NamespaceStrategy, Storage};
use crate::utils::error::{HoldingsError, Result};
use crate::utils::validation::validate_snapshot_name;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::sync::{Arc, Mutex, PoisonError};

/// Namespace used when no credential is active.
pub const DEFAULT_NAMESPACE: &str = "default";

const SNAPSHOT_EXTENSION: &str = ".csv";

/// Derives the namespace as the SHA-256 hex digest of the credential, or
/// the constant default when none is active. One-way by construction, but
/// still only folder-level separation.
pub struct HashedNamespace;

impl NamespaceStrategy for HashedNamespace {
    fn namespace(&self, credential: Option<&str>) -> String {
        match credential {
            Some(secret) if !secret.is_empty() => hex::encode(Sha256::digest(secret.as_bytes())),
            _ => DEFAULT_NAMESPACE.to_string(),
        }
    }
}

/// Saves, lists, loads and deletes named pivot snapshots as CSV files under
/// `<root>/<namespace>/<name>.csv`.
///
/// Operations are serialized per namespace with a mutex, so two sessions of
/// this process sharing a namespace cannot interleave writes. Races with
/// other processes remain last-writer-wins.
pub struct SnapshotStore<S: Storage> {
    storage: S,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<S: Storage> SnapshotStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn namespace_lock(&self, namespace: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks
            .entry(namespace.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn snapshot_path(namespace: &str, name: &str) -> String {
        format!("{}/{}{}", namespace, name, SNAPSHOT_EXTENSION)
    }

    /// Writes the pivot as a CSV snapshot, returning its storage path.
    /// An existing snapshot with the same name is overwritten.
    pub fn save(&self, namespace: &str, name: &str, pivot: &PivotTable) -> Result<String> {
        validate_snapshot_name("name", name)?;
        let lock = self.namespace_lock(namespace);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let path = Self::snapshot_path(namespace, name);
        let bytes = export::to_csv_bytes(pivot)?;
        self.storage.write_file(&path, &bytes)?;
        tracing::info!("Saved snapshot '{}' to {}", name, path);
        Ok(path)
    }

    /// Snapshot names in the namespace, sorted for stable listings.
    pub fn list(&self, namespace: &str) -> Result<Vec<String>> {
        let lock = self.namespace_lock(namespace);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut names: Vec<String> = self
            .storage
            .list_files(namespace)?
            .into_iter()
            .filter_map(|file| {
                file.strip_suffix(SNAPSHOT_EXTENSION)
                    .map(|name| name.to_string())
            })
            .collect();
        names.sort();
        Ok(names)
    }

    pub fn load(&self, namespace: &str, name: &str) -> Result<PivotTable> {
        validate_snapshot_name("name", name)?;
        let lock = self.namespace_lock(namespace);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let path = Self::snapshot_path(namespace, name);
        let bytes = self
            .storage
            .read_file(&path)
            .map_err(|e| Self::map_missing(e, namespace, name))?;
        export::from_csv_bytes(&bytes)
    }

    pub fn delete(&self, namespace: &str, name: &str) -> Result<()> {
        validate_snapshot_name("name", name)?;
        let lock = self.namespace_lock(namespace);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let path = Self::snapshot_path(namespace, name);
        self.storage
            .remove_file(&path)
            .map_err(|e| Self::map_missing(e, namespace, name))?;
        tracing::info!("Deleted snapshot '{}' from namespace '{}'", name, namespace);
        Ok(())
    }

    fn map_missing(error: HoldingsError, namespace: &str, name: &str) -> HoldingsError {
        match error {
            HoldingsError::IoError(ref io) if io.kind() == ErrorKind::NotFound => {
                HoldingsError::SnapshotNotFoundError {
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                }
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregate;
    use crate::domain::model::{Record, RecordSet};

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl Storage for MockStorage {
        fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().unwrap();
            files.get(path).cloned().ok_or_else(|| {
                HoldingsError::IoError(std::io::Error::new(
                    ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().unwrap();
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }

        fn list_files(&self, dir: &str) -> Result<Vec<String>> {
            let files = self.files.lock().unwrap();
            let prefix = format!("{}/", dir);
            Ok(files
                .keys()
                .filter_map(|path| path.strip_prefix(&prefix))
                .map(str::to_string)
                .collect())
        }

        fn remove_file(&self, path: &str) -> Result<()> {
            let mut files = self.files.lock().unwrap();
            files.remove(path).map(|_| ()).ok_or_else(|| {
                HoldingsError::IoError(std::io::Error::new(
                    ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }
    }

    fn sample_pivot() -> PivotTable {
        let sets = vec![RecordSet {
            source: "a.csv".to_string(),
            records: vec![
                Record {
                    company: "X".to_string(),
                    quantity: "10".to_string(),
                    owner: "Alice".to_string(),
                },
                Record {
                    company: "Y".to_string(),
                    quantity: "5".to_string(),
                    owner: "Bob".to_string(),
                },
            ],
        }];
        aggregate::pivot(&sets).unwrap()
    }

    #[test]
    fn test_hashed_namespace() {
        let strategy = HashedNamespace;
        let hashed = strategy.namespace(Some("secret"));
        assert_eq!(hashed.len(), 64);
        assert_ne!(hashed, strategy.namespace(Some("other")));
        // Same credential always maps to the same namespace.
        assert_eq!(hashed, strategy.namespace(Some("secret")));
        assert_eq!(strategy.namespace(None), DEFAULT_NAMESPACE);
        assert_eq!(strategy.namespace(Some("")), DEFAULT_NAMESPACE);
    }

    #[test]
    fn test_save_load_round_trip() {
        let store = SnapshotStore::new(MockStorage::default());
        let pivot = sample_pivot();

        let path = store.save("ns", "q1", &pivot).unwrap();
        assert_eq!(path, "ns/q1.csv");

        let loaded = store.load("ns", "q1").unwrap();
        assert_eq!(loaded, pivot);
    }

    #[test]
    fn test_list_is_sorted_and_scoped_to_namespace() {
        let store = SnapshotStore::new(MockStorage::default());
        let pivot = sample_pivot();

        store.save("ns", "beta", &pivot).unwrap();
        store.save("ns", "alpha", &pivot).unwrap();
        store.save("other", "gamma", &pivot).unwrap();

        assert_eq!(store.list("ns").unwrap(), vec!["alpha", "beta"]);
        assert_eq!(store.list("other").unwrap(), vec!["gamma"]);
        assert!(store.list("empty").unwrap().is_empty());
    }

    #[test]
    fn test_delete_removes_the_snapshot() {
        let store = SnapshotStore::new(MockStorage::default());
        store.save("ns", "q1", &sample_pivot()).unwrap();

        store.delete("ns", "q1").unwrap();
        assert!(store.list("ns").unwrap().is_empty());
    }

    #[test]
    fn test_missing_snapshot_errors() {
        let store = SnapshotStore::new(MockStorage::default());

        match store.load("ns", "absent") {
            Err(HoldingsError::SnapshotNotFoundError { namespace, name }) => {
                assert_eq!(namespace, "ns");
                assert_eq!(name, "absent");
            }
            other => panic!("expected SnapshotNotFoundError, got {other:?}"),
        }
        assert!(store.delete("ns", "absent").is_err());
    }

    #[test]
    fn test_save_overwrites_existing_snapshot() {
        let store = SnapshotStore::new(MockStorage::default());
        let first = sample_pivot();
        store.save("ns", "q1", &first).unwrap();

        let second = aggregate::pivot(&[RecordSet {
            source: "b.csv".to_string(),
            records: vec![Record {
                company: "Z".to_string(),
                quantity: "7".to_string(),
                owner: "Carol".to_string(),
            }],
        }])
        .unwrap();
        store.save("ns", "q1", &second).unwrap();

        assert_eq!(store.load("ns", "q1").unwrap(), second);
    }

    #[test]
    fn test_invalid_names_are_rejected() {
        let store = SnapshotStore::new(MockStorage::default());
        assert!(store.save("ns", "../escape", &sample_pivot()).is_err());
        assert!(store.load("ns", "").is_err());
    }
}
