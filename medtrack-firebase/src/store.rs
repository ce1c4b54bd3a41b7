use medtrack_core::{MedicineRecord, MedicineStore};

use crate::client::FirebaseClient;
use crate::error::FirebaseError;
use crate::types::AuthSession;

/// Medicine storage in Cloud Firestore, authorized by a signed-in session.
pub struct FirestoreStore {
    client: FirebaseClient,
    session: AuthSession,
}

impl FirestoreStore {
    pub fn new(client: FirebaseClient, session: AuthSession) -> Self {
        Self { client, session }
    }
}

impl MedicineStore for FirestoreStore {
    type Error = FirebaseError;

    async fn save_medicine(&self, uid: &str, record: &MedicineRecord) -> Result<(), Self::Error> {
        self.client
            .set_medicine(&self.session.id_token, uid, record)
            .await
    }

    async fn list_medicines(&self, uid: &str) -> Result<Vec<MedicineRecord>, Self::Error> {
        self.client.list_medicines(&self.session.id_token, uid).await
    }
}
