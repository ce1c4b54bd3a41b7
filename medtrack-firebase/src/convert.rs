use chrono::{DateTime, Duration, Utc};
use medtrack_core::{AuthProvider, MedicineRecord, UserProfile};
use serde_json::{Map, Value, json};

use crate::error::FirebaseError;
use crate::types::AuthSession;

/// Extracts `error.message` from a Google API error body.
pub fn api_error_message(body: &Value) -> String {
    body.get("error")
        .and_then(|e| e.get("message").or(Some(e)))
        .and_then(|m| m.as_str())
        .unwrap_or("Unknown error")
        .to_string()
}

fn required_str<'a>(body: &'a Value, key: &'static str) -> Result<&'a str, FirebaseError> {
    body.get(key)
        .and_then(|v| v.as_str())
        .ok_or(FirebaseError::MissingField(key))
}

/// `expiresIn` is a decimal number of seconds sent as a string.
fn expires_at(body: &Value, key: &'static str, now: DateTime<Utc>) -> Result<DateTime<Utc>, FirebaseError> {
    let secs: i64 = required_str(body, key)?
        .parse()
        .map_err(|_| FirebaseError::MissingField(key))?;
    Ok(now + Duration::seconds(secs))
}

/// Parses a `accounts:signUp` / `signInWithPassword` / `signInWithIdp` response.
pub fn parse_auth_response(
    body: &Value,
    provider: AuthProvider,
    now: DateTime<Utc>,
) -> Result<AuthSession, FirebaseError> {
    Ok(AuthSession {
        uid: required_str(body, "localId")?.to_string(),
        email: body.get("email").and_then(|e| e.as_str()).map(str::to_string),
        provider,
        id_token: required_str(body, "idToken")?.to_string(),
        refresh_token: required_str(body, "refreshToken")?.to_string(),
        expires_at: expires_at(body, "expiresIn", now)?,
    })
}

/// Parses a Secure Token refresh response, which uses snake_case keys.
pub fn parse_refresh_response(
    body: &Value,
    previous: &AuthSession,
    now: DateTime<Utc>,
) -> Result<AuthSession, FirebaseError> {
    Ok(AuthSession {
        uid: required_str(body, "user_id")?.to_string(),
        email: previous.email.clone(),
        provider: previous.provider,
        id_token: required_str(body, "id_token")?.to_string(),
        refresh_token: required_str(body, "refresh_token")?.to_string(),
        expires_at: expires_at(body, "expires_in", now)?,
    })
}

fn string_value(value: &str) -> Value {
    json!({ "stringValue": value })
}

/// Firestore document body for a medicine record.
pub fn record_to_document(record: &MedicineRecord) -> Value {
    let mut fields = Map::new();
    fields.insert("name".into(), string_value(&record.name));
    fields.insert("expiry".into(), string_value(&record.expiry));
    if let Some(added_at) = &record.added_at {
        fields.insert("addedAt".into(), string_value(added_at));
    }
    json!({ "fields": fields })
}

/// Firestore document body for a user profile plus the list of field paths
/// it sets (used as the update mask for merge writes).
pub fn profile_to_document(profile: &UserProfile) -> (Value, Vec<&'static str>) {
    let provider = profile.provider.map(|p| p.to_string());
    let candidates = [
        ("uid", Some(profile.uid.as_str())),
        ("email", profile.email.as_deref()),
        ("provider", provider.as_deref()),
        ("firstName", profile.first_name.as_deref()),
        ("lastName", profile.last_name.as_deref()),
        ("username", profile.username.as_deref()),
        ("createdAt", profile.created_at.as_deref()),
    ];

    let mut fields = Map::new();
    let mut paths = Vec::new();
    for (key, value) in candidates {
        if let Some(value) = value {
            fields.insert(key.to_string(), string_value(value));
            paths.push(key);
        }
    }
    (json!({ "fields": fields }), paths)
}

fn field_str<'a>(fields: Option<&'a Value>, key: &str) -> Option<&'a str> {
    fields?.get(key)?.get("stringValue")?.as_str()
}

/// Last path segment of a document resource name.
fn document_id(doc: &Value) -> Option<&str> {
    doc.get("name")?.as_str()?.rsplit('/').next()
}

/// Reads a medicine document. A missing `name` field falls back to the
/// document id; a missing `expiry` becomes an empty string.
pub fn document_to_record(doc: &Value) -> Result<MedicineRecord, FirebaseError> {
    let fields = doc.get("fields");
    let name = field_str(fields, "name")
        .filter(|n| !n.is_empty())
        .or_else(|| document_id(doc))
        .ok_or(FirebaseError::MissingField("name"))?;

    Ok(MedicineRecord {
        name: name.to_string(),
        expiry: field_str(fields, "expiry").unwrap_or_default().to_string(),
        added_at: field_str(fields, "addedAt").map(str::to_string),
    })
}

/// Parses one page of a collection listing. An empty collection comes back
/// as `{}`.
pub fn parse_list_page(body: &Value) -> Result<(Vec<MedicineRecord>, Option<String>), FirebaseError> {
    let records = match body.get("documents").and_then(|d| d.as_array()) {
        Some(docs) => docs.iter().map(document_to_record).collect::<Result<_, _>>()?,
        None => Vec::new(),
    };
    let next_page = body
        .get("nextPageToken")
        .and_then(|t| t.as_str())
        .filter(|t| !t.is_empty())
        .map(str::to_string);
    Ok((records, next_page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 12, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_api_error_message() {
        let body = json!({
            "error": { "code": 400, "message": "EMAIL_EXISTS", "errors": [] }
        });
        assert_eq!(api_error_message(&body), "EMAIL_EXISTS");

        // Secure Token sometimes sends a bare string.
        let body = json!({ "error": "invalid_grant" });
        assert_eq!(api_error_message(&body), "invalid_grant");

        assert_eq!(api_error_message(&json!({})), "Unknown error");
    }

    #[test]
    fn test_parse_auth_response() {
        let body = json!({
            "kind": "identitytoolkit#VerifyPasswordResponse",
            "localId": "abc123",
            "email": "ada@example.com",
            "idToken": "id-token",
            "refreshToken": "refresh-token",
            "expiresIn": "3600",
            "registered": true
        });

        let session = parse_auth_response(&body, AuthProvider::Email, now()).unwrap();
        assert_eq!(session.uid, "abc123");
        assert_eq!(session.email.as_deref(), Some("ada@example.com"));
        assert_eq!(session.id_token, "id-token");
        assert_eq!(session.expires_at, now() + Duration::hours(1));
    }

    #[test]
    fn test_parse_auth_response_missing_token() {
        let body = json!({ "localId": "abc123", "expiresIn": "3600" });
        let err = parse_auth_response(&body, AuthProvider::Email, now()).unwrap_err();
        assert!(matches!(err, FirebaseError::MissingField("idToken")));
    }

    #[test]
    fn test_parse_refresh_response() {
        let previous = AuthSession {
            uid: "abc123".into(),
            email: Some("ada@example.com".into()),
            provider: AuthProvider::Google,
            id_token: "old".into(),
            refresh_token: "old-refresh".into(),
            expires_at: now(),
        };
        let body = json!({
            "expires_in": "3600",
            "token_type": "Bearer",
            "refresh_token": "new-refresh",
            "id_token": "new",
            "user_id": "abc123",
            "project_id": "1234"
        });

        let session = parse_refresh_response(&body, &previous, now()).unwrap();
        assert_eq!(session.id_token, "new");
        assert_eq!(session.refresh_token, "new-refresh");
        assert_eq!(session.provider, AuthProvider::Google);
        assert_eq!(session.email, previous.email);
    }

    #[test]
    fn test_record_document_round_trip() {
        let record = MedicineRecord {
            name: "Ibuprofen 400".into(),
            expiry: "2026-03-01".into(),
            added_at: Some("2025-12-01T08:00:00.000Z".into()),
        };

        let doc = record_to_document(&record);
        assert_eq!(doc["fields"]["expiry"]["stringValue"], "2026-03-01");
        assert_eq!(doc["fields"]["addedAt"]["stringValue"], "2025-12-01T08:00:00.000Z");

        assert_eq!(document_to_record(&doc).unwrap(), record);
    }

    #[test]
    fn test_document_name_falls_back_to_id() {
        let doc = json!({
            "name": "projects/p/databases/(default)/documents/users/u/medicines/12345678901234",
            "fields": { "expiry": { "stringValue": "2026-01-15" } }
        });
        let record = document_to_record(&doc).unwrap();
        assert_eq!(record.name, "12345678901234");
        assert_eq!(record.expiry, "2026-01-15");
        assert_eq!(record.added_at, None);
    }

    #[test]
    fn test_document_without_expiry() {
        let doc = json!({
            "name": "projects/p/databases/(default)/documents/users/u/medicines/x",
            "fields": { "name": { "stringValue": "Cough syrup" } }
        });
        let record = document_to_record(&doc).unwrap();
        assert_eq!(record.name, "Cough syrup");
        assert_eq!(record.expiry, "");
    }

    #[test]
    fn test_parse_list_page() {
        let body = json!({
            "documents": [
                { "name": "a/medicines/one", "fields": { "expiry": { "stringValue": "2026-01-01" } } },
                { "name": "a/medicines/two", "fields": { "expiry": { "stringValue": "2026-02-01" } } }
            ],
            "nextPageToken": "page-2"
        });
        let (records, next) = parse_list_page(&body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name, "two");
        assert_eq!(next.as_deref(), Some("page-2"));

        let (records, next) = parse_list_page(&json!({})).unwrap();
        assert!(records.is_empty());
        assert_eq!(next, None);
    }

    #[test]
    fn test_profile_to_document_masks_only_set_fields() {
        let profile = UserProfile {
            uid: "abc123".into(),
            email: Some("ada@example.com".into()),
            provider: Some(AuthProvider::Google),
            ..Default::default()
        };

        let (doc, paths) = profile_to_document(&profile);
        assert_eq!(paths, ["uid", "email", "provider"]);
        assert_eq!(doc["fields"]["provider"]["stringValue"], "google");
        assert!(doc["fields"].get("firstName").is_none());
    }

    #[test]
    fn test_profile_without_email_leaves_it_out_of_the_mask() {
        let profile = UserProfile {
            uid: "abc123".into(),
            email: None,
            provider: Some(AuthProvider::Google),
            ..Default::default()
        };

        let (doc, paths) = profile_to_document(&profile);
        assert_eq!(paths, ["uid", "provider"]);
        assert!(doc["fields"].get("email").is_none());
    }
}
