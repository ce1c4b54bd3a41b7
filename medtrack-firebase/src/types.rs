use chrono::{DateTime, Duration, Utc};
use medtrack_core::{AuthProvider, UserId};
use serde::{Deserialize, Serialize};

/// Tokens are refreshed this long before they actually expire.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// A signed-in Firebase user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub uid: UserId,
    pub email: Option<String>,
    pub provider: AuthProvider,
    /// Short-lived bearer token for Firestore requests.
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    /// Whether `id_token` must be refreshed before use at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_MARGIN_SECS) >= self.expires_at
    }
}

/// Base URLs of the three REST services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Identity Toolkit (`accounts:*`).
    pub auth: String,
    /// Secure Token (`token`).
    pub token: String,
    /// Firestore (`projects/...`).
    pub firestore: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            auth: "https://identitytoolkit.googleapis.com/v1".to_string(),
            token: "https://securetoken.googleapis.com/v1".to_string(),
            firestore: "https://firestore.googleapis.com/v1".to_string(),
        }
    }
}

impl Endpoints {
    /// Endpoints of a local Firebase emulator suite, e.g.
    /// `Endpoints::emulator("http://localhost:9099", "http://localhost:8080")`.
    pub fn emulator(auth_host: &str, firestore_host: &str) -> Self {
        let auth_host = auth_host.trim_end_matches('/');
        Self {
            auth: format!("{auth_host}/identitytoolkit.googleapis.com/v1"),
            token: format!("{auth_host}/securetoken.googleapis.com/v1"),
            firestore: format!("{}/v1", firestore_host.trim_end_matches('/')),
        }
    }
}
