use std::path::Path;

use chrono::Utc;
use medtrack_core::{AuthProvider, Credentials, Registration, UserProfile, format_timestamp};
use medtrack_firebase::{AuthSession, FirebaseClient};
use serde::Serialize;
use tracing::info;

use super::output::print_one;
use crate::context::firebase_client;
use crate::session::{clear_session, load_session, save_session};

pub enum LoginMethod {
    Password(Credentials),
    Google { id_token: String },
}

#[derive(Serialize)]
struct Identity<'a> {
    uid: &'a str,
    email: Option<&'a str>,
    provider: AuthProvider,
}

impl<'a> From<&'a AuthSession> for Identity<'a> {
    fn from(session: &'a AuthSession) -> Self {
        Self {
            uid: &session.uid,
            email: session.email.as_deref(),
            provider: session.provider,
        }
    }
}

fn describe(identity: &Identity<'_>) -> String {
    format!(
        "{} <{}> via {}",
        identity.uid,
        identity.email.unwrap_or("no email"),
        identity.provider
    )
}

/// Creates the account and its profile document. The new user still has to
/// log in afterwards.
pub async fn register(form: Registration, json: bool) -> anyhow::Result<()> {
    form.validate()?;
    let client = firebase_client()?;

    let session = client.sign_up(&form.email, &form.password).await?;
    let profile = UserProfile {
        uid: session.uid.clone(),
        email: Some(form.email.clone()),
        provider: None,
        first_name: Some(form.first_name),
        last_name: Some(form.last_name),
        username: Some(form.username),
        created_at: Some(format_timestamp(Utc::now())),
    };
    client.write_profile(&session, &profile, false).await?;
    info!(uid = %session.uid, "account created");

    print_one(json, Identity::from(&session), |_| {
        "Account created! Please login.".to_string()
    })
}

pub async fn login(method: LoginMethod, session_path: &Path, json: bool) -> anyhow::Result<()> {
    let client = firebase_client()?;
    let session = sign_in(&client, method).await?;

    client
        .write_profile(&session, &login_profile(&session), true)
        .await?;
    save_session(session_path, &session)?;
    info!(uid = %session.uid, provider = %session.provider, "logged in");

    print_one(json, Identity::from(&session), |id| {
        format!("Logged in as {}", describe(id))
    })
}

/// The fields a login merges into `users/{uid}`.
fn login_profile(session: &AuthSession) -> UserProfile {
    UserProfile {
        uid: session.uid.clone(),
        email: session.email.clone(),
        provider: Some(session.provider),
        ..Default::default()
    }
}

async fn sign_in(client: &FirebaseClient, method: LoginMethod) -> anyhow::Result<AuthSession> {
    let session = match method {
        LoginMethod::Password(credentials) => {
            credentials.validate()?;
            client
                .sign_in_with_password(&credentials.email, &credentials.password)
                .await?
        }
        LoginMethod::Google { id_token } => client.sign_in_with_google(&id_token).await?,
    };
    Ok(session)
}

pub fn logout(session_path: &Path) -> anyhow::Result<()> {
    if clear_session(session_path)? {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

pub fn whoami(session_path: &Path, json: bool) -> anyhow::Result<()> {
    let session = load_session(session_path)?;
    match &session {
        Some(session) => print_one(json, Identity::from(session), |id| describe(id)),
        None => print_one(json, Option::<Identity<'_>>::None, |_| "Not logged in.".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn session(email: Option<&str>) -> AuthSession {
        AuthSession {
            uid: "abc123".into(),
            email: email.map(str::to_string),
            provider: AuthProvider::Google,
            id_token: "id".into(),
            refresh_token: "refresh".into(),
            expires_at: Utc.with_ymd_and_hms(2025, 12, 1, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn login_profile_keeps_missing_email_absent() {
        let profile = login_profile(&session(None));
        assert_eq!(profile.email, None);
        assert_eq!(profile.provider, Some(AuthProvider::Google));
        assert_eq!(profile.first_name, None);

        let profile = login_profile(&session(Some("ada@example.com")));
        assert_eq!(profile.email.as_deref(), Some("ada@example.com"));
    }
}
