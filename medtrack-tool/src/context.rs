use std::path::{Path, PathBuf};

use chrono::Utc;
use medtrack_core::{MedicineService, TrackerError};
use medtrack_firebase::{AuthSession, FirebaseClient, FirestoreStore};
use tracing::{debug, info};

use crate::config::load_firebase_settings;
use crate::error::ToolError;
use crate::session::{load_session, save_session};
use crate::store::{AnyStore, LocalStore, StoreType};

pub fn firebase_client() -> Result<FirebaseClient, ToolError> {
    let settings = load_firebase_settings()?;
    Ok(FirebaseClient::with_endpoints(
        settings.api_key,
        settings.project_id,
        settings.endpoints,
    ))
}

/// Loads the saved session, refreshing the id token once if it is stale.
pub async fn current_session(
    client: &FirebaseClient,
    session_path: &Path,
) -> Result<Option<AuthSession>, ToolError> {
    let Some(session) = load_session(session_path)? else {
        return Ok(None);
    };
    if !session.is_expired(Utc::now()) {
        return Ok(Some(session));
    }

    debug!(uid = %session.uid, "refreshing expired id token");
    let refreshed = client.refresh_session(&session).await?;
    save_session(session_path, &refreshed)?;
    Ok(Some(refreshed))
}

/// The selected store and the user whose records it serves.
pub struct AppContext {
    pub service: MedicineService<AnyStore>,
    pub user: Option<String>,
}

impl AppContext {
    /// Firestore needs a signed-in session. The local store uses the session's
    /// uid when there is one and `local_user` otherwise.
    pub async fn open(
        store_type: StoreType,
        store_path: PathBuf,
        local_user: String,
        session_path: &Path,
    ) -> Result<Self, ToolError> {
        match store_type {
            StoreType::Firestore => {
                let client = firebase_client()?;
                let session = current_session(&client, session_path)
                    .await?
                    .ok_or(TrackerError::NotAuthenticated)?;
                let user = Some(session.uid.clone());
                let store = AnyStore::Firestore(FirestoreStore::new(client, session));
                Ok(Self {
                    service: MedicineService::new(store),
                    user,
                })
            }
            StoreType::Local => {
                let store = LocalStore::open(&store_path)?;
                let uid = match load_session(session_path)? {
                    Some(session) => session.uid,
                    None => local_user,
                };
                info!(path = %store_path.display(), %uid, "using local store");
                Ok(Self {
                    service: MedicineService::new(AnyStore::Local(store)),
                    user: Some(uid),
                })
            }
        }
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }
}
