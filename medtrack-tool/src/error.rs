use thiserror::Error;

use crate::store::LocalStoreError;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error(
        "Firebase is not configured. Set MEDTRACK_FIREBASE_API_KEY and MEDTRACK_FIREBASE_PROJECT or configure ~/.config/medtrack/config.toml"
    )]
    FirebaseNotConfigured,

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session file is corrupt: {0}")]
    Session(#[from] serde_json::Error),

    #[error("Local store error: {0}")]
    LocalStore(#[from] LocalStoreError),

    #[error("Firebase error: {0}")]
    Firebase(#[from] medtrack_firebase::FirebaseError),

    #[error(transparent)]
    Tracker(#[from] medtrack_core::TrackerError),
}
