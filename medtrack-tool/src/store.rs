use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use fjall::{Database, Keyspace, KeyspaceCreateOptions};
use medtrack_core::{MedicineRecord, MedicineStore};
use medtrack_firebase::{FirebaseError, FirestoreStore};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_KEYSPACE: &str = "medicines";
pub const DEFAULT_LOCAL_USER: &str = "local";

#[derive(Debug, Error)]
pub enum LocalStoreError {
    #[error("fjall error: {0}")]
    Fjall(#[from] fjall::Error),
    #[error("corrupt record set: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum AnyStoreError {
    #[error("firestore error: {0}")]
    Firestore(#[from] FirebaseError),
    #[error("local store error: {0}")]
    Local(#[from] LocalStoreError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreType {
    #[default]
    Firestore,
    Local,
}

impl std::str::FromStr for StoreType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "firestore" | "firebase" => Ok(StoreType::Firestore),
            "local" => Ok(StoreType::Local),
            _ => Err(format!("unknown store type: {}", s)),
        }
    }
}

impl std::fmt::Display for StoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreType::Firestore => write!(f, "firestore"),
            StoreType::Local => write!(f, "local"),
        }
    }
}

/// Offline medicine store backed by Fjall.
///
/// Each user's records are one JSON map (name -> record) under the user id.
pub struct LocalStore {
    keyspace: Keyspace,
    _database: Database, // Keep keyspace alive
    write_lock: Mutex<()>,
}

impl LocalStore {
    /// Opens the store at `path`, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LocalStoreError> {
        let database = Database::builder(path).open()?;
        let keyspace = database.keyspace(DEFAULT_KEYSPACE, || KeyspaceCreateOptions::default())?;
        Ok(Self {
            keyspace,
            _database: database,
            write_lock: Mutex::new(()),
        })
    }

    fn read_user(&self, uid: &str) -> Result<BTreeMap<String, MedicineRecord>, LocalStoreError> {
        match self.keyspace.get(uid.as_bytes())? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(BTreeMap::new()),
        }
    }

    fn save(&self, uid: &str, record: &MedicineRecord) -> Result<(), LocalStoreError> {
        // Read-modify-write of the user's map must not interleave.
        let _guard = self.write_lock.lock().unwrap();
        let mut records = self.read_user(uid)?;
        records.insert(record.name.clone(), record.clone());
        self.keyspace
            .insert(uid.as_bytes(), serde_json::to_vec(&records)?)?;
        Ok(())
    }

    fn list(&self, uid: &str) -> Result<Vec<MedicineRecord>, LocalStoreError> {
        Ok(self.read_user(uid)?.into_values().collect())
    }
}

impl MedicineStore for LocalStore {
    type Error = LocalStoreError;

    async fn save_medicine(&self, uid: &str, record: &MedicineRecord) -> Result<(), Self::Error> {
        self.save(uid, record)
    }

    async fn list_medicines(&self, uid: &str) -> Result<Vec<MedicineRecord>, Self::Error> {
        self.list(uid)
    }
}

pub enum AnyStore {
    Firestore(FirestoreStore),
    Local(LocalStore),
}

impl MedicineStore for AnyStore {
    type Error = AnyStoreError;

    async fn save_medicine(&self, uid: &str, record: &MedicineRecord) -> Result<(), Self::Error> {
        match self {
            AnyStore::Firestore(s) => s.save_medicine(uid, record).await.map_err(Into::into),
            AnyStore::Local(s) => s.save_medicine(uid, record).await.map_err(Into::into),
        }
    }

    async fn list_medicines(&self, uid: &str) -> Result<Vec<MedicineRecord>, Self::Error> {
        match self {
            AnyStore::Firestore(s) => s.list_medicines(uid).await.map_err(Into::into),
            AnyStore::Local(s) => s.list_medicines(uid).await.map_err(Into::into),
        }
    }
}

pub fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("medtrack")
        .join("store")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (LocalStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn record(name: &str, expiry: &str) -> MedicineRecord {
        MedicineRecord {
            name: name.to_string(),
            expiry: expiry.to_string(),
            added_at: Some("2025-12-01T08:00:00.000Z".to_string()),
        }
    }

    #[test]
    fn save_list() {
        let (store, _dir) = temp_store();
        store.save("u1", &record("Paracetamol", "2026-01-01")).unwrap();
        store.save("u1", &record("Aspirin", "2026-02-01")).unwrap();

        let names: Vec<_> = store.list("u1").unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["Aspirin", "Paracetamol"]);
    }

    #[test]
    fn list_missing_user() {
        let (store, _dir) = temp_store();
        assert!(store.list("nobody").unwrap().is_empty());
    }

    #[test]
    fn overwrite_by_name() {
        let (store, _dir) = temp_store();
        store.save("u1", &record("Aspirin", "2026-01-01")).unwrap();
        store.save("u1", &record("Aspirin", "2027-01-01")).unwrap();

        assert_eq!(store.list("u1").unwrap(), vec![record("Aspirin", "2027-01-01")]);
    }

    #[test]
    fn users_are_isolated() {
        let (store, _dir) = temp_store();
        store.save("alice", &record("Aspirin", "2026-01-01")).unwrap();

        assert!(store.list("bob").unwrap().is_empty());
    }

    #[test]
    fn persistence() {
        let dir = TempDir::new().unwrap();

        {
            let store = LocalStore::open(dir.path()).unwrap();
            store.save("u1", &record("Aspirin", "2026-01-01")).unwrap();
        }

        {
            let store = LocalStore::open(dir.path()).unwrap();
            assert_eq!(store.list("u1").unwrap(), vec![record("Aspirin", "2026-01-01")]);
        }
    }

    #[test]
    fn store_type_parsing() {
        assert_eq!("local".parse::<StoreType>().unwrap(), StoreType::Local);
        assert_eq!("Firebase".parse::<StoreType>().unwrap(), StoreType::Firestore);
        assert!("floppy".parse::<StoreType>().is_err());
        assert_eq!(StoreType::Local.to_string(), "local");
    }
}
