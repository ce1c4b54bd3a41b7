use thiserror::Error;

/// Boxed error raised by a [`MedicineStore`](crate::MedicineStore) backend.
pub type StoreFailure = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Could not extract GTIN or Expiry Date from barcode.")]
    ExtractionFailed,

    #[error("Storage error: {0}")]
    StorageFailed(#[source] StoreFailure),

    #[error("User not logged in")]
    NotAuthenticated,

    #[error("Please fill all fields.")]
    MissingFields,

    #[error("Invalid expiry date: {0:?} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("{0}")]
    InvalidInput(String),
}

impl TrackerError {
    pub(crate) fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        TrackerError::StorageFailed(Box::new(err))
    }
}
