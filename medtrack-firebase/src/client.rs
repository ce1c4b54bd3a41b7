use chrono::Utc;
use medtrack_core::{AuthProvider, MedicineRecord, UserProfile};
use reqwest::{RequestBuilder, Url};
use serde_json::{Value, json};
use tracing::{debug, instrument};

use crate::convert::{
    api_error_message, parse_auth_response, parse_list_page, parse_refresh_response,
    profile_to_document, record_to_document,
};
use crate::error::FirebaseError;
use crate::types::{AuthSession, Endpoints};

const LIST_PAGE_SIZE: &str = "100";

/// Client for Firebase Authentication and Cloud Firestore over REST.
pub struct FirebaseClient {
    http: reqwest::Client,
    api_key: String,
    project_id: String,
    endpoints: Endpoints,
}

impl FirebaseClient {
    /// Creates a client for the production Google endpoints.
    pub fn new(api_key: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self::with_endpoints(api_key, project_id, Endpoints::default())
    }

    /// Creates a client against custom endpoints (e.g. the emulator suite).
    pub fn with_endpoints(
        api_key: impl Into<String>,
        project_id: impl Into<String>,
        endpoints: Endpoints,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            project_id: project_id.into(),
            endpoints,
        }
    }

    /// Creates an email/password account and signs it in.
    #[instrument(skip(self, password))]
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, FirebaseError> {
        let body = json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });
        let request = self.http.post(self.accounts_url("signUp")?).json(&body);
        let response = self.send(request).await?;
        parse_auth_response(&response, AuthProvider::Email, Utc::now())
    }

    /// Signs in with email and password.
    #[instrument(skip(self, password))]
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, FirebaseError> {
        let body = json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });
        let request = self.http.post(self.accounts_url("signInWithPassword")?).json(&body);
        let response = self.send(request).await?;
        parse_auth_response(&response, AuthProvider::Email, Utc::now())
    }

    /// Signs in with a Google OAuth id token obtained elsewhere.
    #[instrument(skip(self, google_id_token))]
    pub async fn sign_in_with_google(
        &self,
        google_id_token: &str,
    ) -> Result<AuthSession, FirebaseError> {
        let body = json!({
            "postBody": format!("id_token={google_id_token}&providerId=google.com"),
            "requestUri": "http://localhost",
            "returnIdpCredential": true,
            "returnSecureToken": true,
        });
        let request = self.http.post(self.accounts_url("signInWithIdp")?).json(&body);
        let response = self.send(request).await?;
        parse_auth_response(&response, AuthProvider::Google, Utc::now())
    }

    /// Exchanges the refresh token for a new id token.
    #[instrument(skip(self, session), fields(uid = %session.uid))]
    pub async fn refresh_session(&self, session: &AuthSession) -> Result<AuthSession, FirebaseError> {
        let mut url = parse_url(&format!("{}/token", self.endpoints.token))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);

        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", session.refresh_token.as_str()),
        ];
        let response = self.send(self.http.post(url).form(&form)).await?;
        parse_refresh_response(&response, session, Utc::now())
    }

    /// Writes `users/{uid}`. With `merge`, only the fields set on `profile`
    /// are touched; otherwise the document is replaced.
    #[instrument(skip(self, session, profile), fields(uid = %session.uid))]
    pub async fn write_profile(
        &self,
        session: &AuthSession,
        profile: &UserProfile,
        merge: bool,
    ) -> Result<(), FirebaseError> {
        let (document, paths) = profile_to_document(profile);
        let mut url = self.document_url(&["users", &session.uid])?;
        if merge {
            let mut query = url.query_pairs_mut();
            for path in paths {
                query.append_pair("updateMask.fieldPaths", path);
            }
        }

        let request = self
            .http
            .patch(url)
            .bearer_auth(&session.id_token)
            .json(&document);
        self.send(request).await?;
        Ok(())
    }

    /// Replaces `users/{uid}/medicines/{record.name}`.
    #[instrument(skip(self, id_token, record), fields(name = %record.name))]
    pub async fn set_medicine(
        &self,
        id_token: &str,
        uid: &str,
        record: &MedicineRecord,
    ) -> Result<(), FirebaseError> {
        let url = self.document_url(&["users", uid, "medicines", &record.name])?;
        let request = self
            .http
            .patch(url)
            .bearer_auth(id_token)
            .json(&record_to_document(record));
        self.send(request).await?;
        Ok(())
    }

    /// Lists `users/{uid}/medicines`, following pagination.
    #[instrument(skip(self, id_token))]
    pub async fn list_medicines(
        &self,
        id_token: &str,
        uid: &str,
    ) -> Result<Vec<MedicineRecord>, FirebaseError> {
        let mut records = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.document_url(&["users", uid, "medicines"])?;
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("pageSize", LIST_PAGE_SIZE);
                if let Some(token) = &page_token {
                    query.append_pair("pageToken", token);
                }
            }

            let response = self.send(self.http.get(url).bearer_auth(id_token)).await?;
            let (page, next) = parse_list_page(&response)?;
            debug!(count = page.len(), "fetched medicine page");
            records.extend(page);

            match next {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(records)
    }

    fn accounts_url(&self, method: &str) -> Result<Url, FirebaseError> {
        let mut url = parse_url(&format!("{}/accounts:{method}", self.endpoints.auth))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    /// URL of a document or collection below the database root. Segments are
    /// percent-encoded, so names may contain spaces or `/`.
    fn document_url(&self, segments: &[&str]) -> Result<Url, FirebaseError> {
        let mut url = parse_url(&format!(
            "{}/projects/{}/databases/(default)/documents",
            self.endpoints.firestore, self.project_id
        ))?;
        url.path_segments_mut()
            .map_err(|_| FirebaseError::InvalidUrl(self.endpoints.firestore.clone()))?
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, FirebaseError> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .map(|body| api_error_message(&body))
                .unwrap_or(text);
            return Err(FirebaseError::Api {
                status: status.as_u16(),
                message,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Object(Default::default()));
        }
        Ok(serde_json::from_str(&text)?)
    }
}

fn parse_url(raw: &str) -> Result<Url, FirebaseError> {
    Url::parse(raw).map_err(|e| FirebaseError::InvalidUrl(format!("{raw}: {e}")))
}
