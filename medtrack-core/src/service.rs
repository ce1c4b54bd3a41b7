use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, instrument};

use crate::error::TrackerError;
use crate::expiry::{Reminder, format_expiry_date, reminders};
use crate::gs1;
use crate::record::MedicineRecord;
use crate::store::MedicineStore;

/// Source of the `addedAt` timestamp.
pub type Clock = fn() -> DateTime<Utc>;

/// Add, list and reminder operations for the signed-in user.
///
/// Every operation takes the current user id; `None` means nobody is signed
/// in and fails with [`TrackerError::NotAuthenticated`] before touching the
/// store.
pub struct MedicineService<S> {
    store: S,
    clock: Clock,
}

impl<S: MedicineStore> MedicineService<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, Utc::now)
    }

    pub fn with_clock(store: S, clock: Clock) -> Self {
        Self { store, clock }
    }

    /// Saves a medicine entered by hand. Both name and date are required.
    #[instrument(skip(self, user))]
    pub async fn add_manual(
        &self,
        user: Option<&str>,
        name: &str,
        expiry: Option<NaiveDate>,
    ) -> Result<MedicineRecord, TrackerError> {
        let name = name.trim();
        let Some(expiry) = expiry.filter(|_| !name.is_empty()) else {
            return Err(TrackerError::MissingFields);
        };
        self.save(user, name, format_expiry_date(expiry)).await
    }

    /// Decodes a scanned payload and saves it under its GTIN.
    ///
    /// Nothing is stored unless both the GTIN and the expiry were found.
    #[instrument(skip(self, user))]
    pub async fn add_scanned(
        &self,
        user: Option<&str>,
        payload: &str,
    ) -> Result<MedicineRecord, TrackerError> {
        let decoded = gs1::decode(payload);
        debug!(?decoded, "decoded scan payload");
        let (gtin, expiry) = decoded.require_complete()?;
        self.save(user, &gtin, expiry).await
    }

    /// Every stored record, in store order.
    pub async fn list(&self, user: Option<&str>) -> Result<Vec<MedicineRecord>, TrackerError> {
        let uid = user.ok_or(TrackerError::NotAuthenticated)?;
        self.store
            .list_medicines(uid)
            .await
            .map_err(TrackerError::storage)
    }

    /// Records that are expired or expire within the warning window.
    pub async fn reminders(
        &self,
        user: Option<&str>,
        today: NaiveDate,
    ) -> Result<Vec<Reminder>, TrackerError> {
        let records = self.list(user).await?;
        Ok(reminders(&records, today))
    }

    async fn save(
        &self,
        user: Option<&str>,
        name: &str,
        expiry: String,
    ) -> Result<MedicineRecord, TrackerError> {
        let uid = user.ok_or(TrackerError::NotAuthenticated)?;
        let record = MedicineRecord::new(name, expiry, (self.clock)());

        self.store
            .save_medicine(uid, &record)
            .await
            .map_err(TrackerError::storage)?;

        info!(name = %record.name, expiry = %record.expiry, "medicine saved");
        Ok(record)
    }
}
