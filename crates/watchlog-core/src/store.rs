//! Persisted session store.
//!
//! Two fixed keys under the data directory: `token` (raw bearer string,
//! 0600 perms) and `user.json` (serialized profile). The pair is written and
//! removed together; a session restores only when both halves are present.

use std::fs::{self, Permissions};
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::types::UserProfile;

const TOKEN_FILE: &str = "token";
const USER_FILE: &str = "user.json";

/// File-backed store for the session token and user profile.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the token file (for status display).
    pub fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }

    fn user_path(&self) -> PathBuf {
        self.dir.join(USER_FILE)
    }

    /// Persist token and profile together. The user half goes first so a
    /// failure never leaves a fresh token without its matching user record.
    pub fn save(&self, token: &str, user: &UserProfile) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let user_json = serde_json::to_string(user).map_err(|e| Error::Store(e.to_string()))?;
        fs::write(self.user_path(), user_json)?;

        let token_path = self.token_path();
        fs::write(&token_path, token)?;
        fs::set_permissions(&token_path, Permissions::from_mode(0o600))?;

        Ok(())
    }

    /// Read back the persisted pair. `None` unless both halves are present
    /// and the profile parses.
    pub fn load(&self) -> Option<(String, UserProfile)> {
        let token = fs::read_to_string(self.token_path()).ok()?;
        let token = token.trim().to_string();
        if token.is_empty() {
            return None;
        }

        let user = fs::read_to_string(self.user_path()).ok()?;
        let user: UserProfile = serde_json::from_str(&user).ok()?;

        Some((token, user))
    }

    /// Remove both keys. Safe to call when nothing is stored.
    pub fn clear(&self) -> Result<()> {
        for path in [self.token_path(), self.user_path()] {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}
