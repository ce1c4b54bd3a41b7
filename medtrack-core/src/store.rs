use std::collections::{BTreeMap, HashMap};
use std::convert::Infallible;
use std::future::Future;
use std::sync::RwLock;

use crate::record::MedicineRecord;

/// Per-user medicine storage.
///
/// Records are keyed by `(uid, record.name)`; saving under an existing name
/// replaces the previous record. Backends are usually remote, so methods are
/// async and take `&self` to allow internal locking.
pub trait MedicineStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Inserts or replaces a record.
    fn save_medicine(
        &self,
        uid: &str,
        record: &MedicineRecord,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Lists all records of a user.
    fn list_medicines(
        &self,
        uid: &str,
    ) -> impl Future<Output = Result<Vec<MedicineRecord>, Self::Error>> + Send;
}

impl<S: MedicineStore> MedicineStore for &S {
    type Error = S::Error;

    async fn save_medicine(&self, uid: &str, record: &MedicineRecord) -> Result<(), Self::Error> {
        (*self).save_medicine(uid, record).await
    }

    async fn list_medicines(&self, uid: &str) -> Result<Vec<MedicineRecord>, Self::Error> {
        (*self).list_medicines(uid).await
    }
}

/// An in-memory store. Listing returns records ordered by name.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, BTreeMap<String, MedicineRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MedicineStore for MemoryStore {
    type Error = Infallible;

    async fn save_medicine(&self, uid: &str, record: &MedicineRecord) -> Result<(), Self::Error> {
        self.data
            .write()
            .unwrap()
            .entry(uid.to_string())
            .or_default()
            .insert(record.name.clone(), record.clone());
        Ok(())
    }

    async fn list_medicines(&self, uid: &str) -> Result<Vec<MedicineRecord>, Self::Error> {
        Ok(self
            .data
            .read()
            .unwrap()
            .get(uid)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, expiry: &str) -> MedicineRecord {
        MedicineRecord {
            name: name.to_string(),
            expiry: expiry.to_string(),
            added_at: None,
        }
    }

    #[tokio::test]
    async fn memory_store_save_list() {
        let store = MemoryStore::new();
        store.save_medicine("u1", &record("b", "2026-01-01")).await.unwrap();
        store.save_medicine("u1", &record("a", "2026-02-01")).await.unwrap();

        let listed = store.list_medicines("u1").await.unwrap();
        let names: Vec<_> = listed.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[tokio::test]
    async fn memory_store_overwrite() {
        let store = MemoryStore::new();
        store.save_medicine("u1", &record("a", "2026-01-01")).await.unwrap();
        store.save_medicine("u1", &record("a", "2027-01-01")).await.unwrap();

        let listed = store.list_medicines("u1").await.unwrap();
        assert_eq!(listed, vec![record("a", "2027-01-01")]);
    }

    #[tokio::test]
    async fn memory_store_users_are_isolated() {
        let store = MemoryStore::new();
        store.save_medicine("u1", &record("a", "2026-01-01")).await.unwrap();

        assert!(store.list_medicines("u2").await.unwrap().is_empty());
    }
}
