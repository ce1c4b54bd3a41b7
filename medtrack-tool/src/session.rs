//! The signed-in Firebase session, kept between invocations as JSON.

use std::path::{Path, PathBuf};

use medtrack_firebase::AuthSession;

use crate::error::ToolError;

pub fn default_session_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("medtrack")
        .join("session.json")
}

pub fn load_session(path: &Path) -> Result<Option<AuthSession>, ToolError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&raw)?))
}

pub fn save_session(path: &Path, session: &AuthSession) -> Result<(), ToolError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    write_private(path, serde_json::to_string_pretty(session)?.as_bytes())?;
    Ok(())
}

/// Writes `contents` readable by the owner only; the refresh token grants
/// indefinite access to the account.
#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies on creation.
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    file.write_all(contents)
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, contents)
}

/// Removes the session file. Returns whether one existed.
pub fn clear_session(path: &Path) -> Result<bool, ToolError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err.into()),
    }
}
