//! Firebase backend for medtrack.
//!
//! Talks to Firebase Authentication (Identity Toolkit + Secure Token) and
//! Cloud Firestore over their REST APIs. Medicines live at
//! `users/{uid}/medicines/{name}`, profiles at `users/{uid}`.
//!
//! # Example
//!
//! ```ignore
//! use medtrack_core::MedicineService;
//! use medtrack_firebase::{FirebaseClient, FirestoreStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = FirebaseClient::new("web-api-key", "my-project");
//!     let session = client
//!         .sign_in_with_password("ada@example.com", "hunter22")
//!         .await
//!         .unwrap();
//!
//!     let uid = session.uid.clone();
//!     let service = MedicineService::new(FirestoreStore::new(client, session));
//!     service
//!         .add_scanned(Some(&uid), "(01)12345678901234(17)260115")
//!         .await
//!         .unwrap();
//! }
//! ```

mod client;
mod convert;
mod error;
mod store;
mod types;

pub use client::FirebaseClient;
pub use convert::{document_to_record, parse_list_page, record_to_document};
pub use error::FirebaseError;
pub use store::FirestoreStore;
pub use types::{AuthSession, Endpoints};
