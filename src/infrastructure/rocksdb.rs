use crate::domain::ports::KeyValueStore;
use crate::error::{BookingError, Result};
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family holding every booking key.
pub const CF_LOCAL_STORAGE: &str = "local_storage";

/// A persistent key-value store implementation using RocksDB.
///
/// All keys (`appointments`, `admins`, session flags) live in a single Column
/// Family so the layout mirrors the browser-style local storage it replaces.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the `local_storage` column family exists.
    ///
    /// # Arguments
    ///
    /// * `path` - The filesystem path where the database will be stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf = ColumnFamilyDescriptor::new(CF_LOCAL_STORAGE, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(CF_LOCAL_STORAGE)
            .ok_or_else(|| BookingError::Storage("local_storage column family not found".into()))
    }
}

impl KeyValueStore for RocksDBStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let Some(bytes) = self.db.get_cf(self.cf()?, key.as_bytes())? else {
            return Ok(None);
        };
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| BookingError::Storage(format!("value under {key:?} is not UTF-8: {e}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db.put_cf(self.cf()?, key.as_bytes(), value.as_bytes())?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.db.delete_cf(self.cf()?, key.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_rocksdb_open_cf() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).expect("Failed to open RocksDB");
        assert!(store.db.cf_handle(CF_LOCAL_STORAGE).is_some());
    }

    #[test]
    fn test_rocksdb_round_trip() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).unwrap();

        store.set("appointments", "[]").unwrap();
        assert_eq!(store.get("appointments").unwrap().as_deref(), Some("[]"));
        assert!(store.get("admins").unwrap().is_none());

        store.remove("appointments").unwrap();
        assert!(store.get("appointments").unwrap().is_none());
    }

    #[test]
    fn test_rocksdb_reopen_keeps_values() {
        let dir = tempdir().unwrap();
        {
            let store = RocksDBStore::open(dir.path()).unwrap();
            store.set("currentUser", "maria").unwrap();
        }
        let store = RocksDBStore::open(dir.path()).unwrap();
        assert_eq!(store.get("currentUser").unwrap().as_deref(), Some("maria"));
    }
}
