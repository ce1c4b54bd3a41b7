use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier of a user in the backing store.
pub type UserId = String;

/// A medicine as persisted under `users/{uid}/medicines/{name}`.
///
/// `name` doubles as the document key, so saving a record with an existing
/// name replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineRecord {
    /// Free-form name, or the GTIN for scanned medicines.
    pub name: String,
    /// `YYYY-MM-DD`; empty for legacy records stored without one.
    #[serde(default)]
    pub expiry: String,
    /// ISO-8601 creation timestamp, e.g. `2025-12-01T09:30:00.000Z`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<String>,
}

impl MedicineRecord {
    pub fn new(name: impl Into<String>, expiry: impl Into<String>, added_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            expiry: expiry.into(),
            added_at: Some(format_timestamp(added_at)),
        }
    }
}

/// Formats an instant the way stored `addedAt` values look (millisecond
/// precision, `Z` suffix).
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// How a user signed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    #[default]
    Email,
    Google,
}

impl std::fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthProvider::Email => write!(f, "email"),
            AuthProvider::Google => write!(f, "google"),
        }
    }
}

/// The `users/{uid}` document.
///
/// Login only touches `uid`, `email` and `provider`; the remaining fields are
/// written once on registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: UserId,
    /// Absent when the provider does not share one; a merge then leaves the
    /// stored email alone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<AuthProvider>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}
