//! Medtrack core - medicine records, GS1 scan decoding and expiry reminders.

pub mod account;
pub mod error;
pub mod expiry;
pub mod gs1;
pub mod record;
pub mod service;
pub mod store;

pub use account::{Credentials, Registration};
pub use error::{StoreFailure, TrackerError};
pub use expiry::{
    ExpirySeverity, Reminder, classify, classify_at, days_until, format_expiry_date,
    parse_expiry_date, reminders,
};
pub use gs1::{DecodedIdentity, decode};
pub use record::{AuthProvider, MedicineRecord, UserId, UserProfile, format_timestamp};
pub use service::{Clock, MedicineService};
pub use store::{MedicineStore, MemoryStore};
