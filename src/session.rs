use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

use crate::api::models::{LoginResponse, User};
use crate::utils::{CryptoError, SessionCipher};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Session encryption error: {0}")]
    Crypto(#[from] CryptoError),
    #[error("Session file is corrupt: {0}")]
    Corrupt(String),
}

/// Signed-in partner: tokens plus the user returned at login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
    pub user: User,
    pub signed_in_at: DateTime<Utc>,
}

impl Session {
    pub fn from_login(login: LoginResponse) -> Self {
        Session {
            access: login.access,
            refresh: login.refresh,
            user: login.user,
            signed_in_at: Utc::now(),
        }
    }
}

/// Gate for every dashboard command: a session must exist and belong to a
/// partner account
pub fn require_partner(session: Option<&Session>) -> Result<&Session, String> {
    let session = session.ok_or_else(|| {
        "🔒 Vous n'êtes pas connecté. Utilisez `login <email>`.".to_string()
    })?;
    if !session.user.is_partner {
        return Err("🔒 Ce compte n'est pas un compte partenaire.".to_string());
    }
    Ok(session)
}

/// Session persistence between console runs
///
/// Only writes to disk when a session key is configured; the file holds the
/// sealed JSON session.
pub struct SessionStore {
    path: PathBuf,
    cipher: Option<SessionCipher>,
}

impl SessionStore {
    pub fn new(path: PathBuf, key_hex: Option<&str>) -> Result<Self, SessionError> {
        let cipher = key_hex.map(SessionCipher::from_hex_key).transpose()?;
        Ok(Self { path, cipher })
    }

    pub fn is_persistent(&self) -> bool {
        self.cipher.is_some()
    }

    pub async fn load(&self) -> Result<Option<Session>, SessionError> {
        let Some(cipher) = &self.cipher else {
            return Ok(None);
        };

        let sealed = match tokio::fs::read_to_string(&self.path).await {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No session file at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let json = cipher.open(&sealed)?;
        let session = serde_json::from_str::<Session>(&json)
            .map_err(|e| SessionError::Corrupt(e.to_string()))?;
        Ok(Some(session))
    }

    pub async fn save(&self, session: &Session) -> Result<(), SessionError> {
        let Some(cipher) = &self.cipher else {
            warn!("BLAFFA_SESSION_KEY not set, session kept in memory only");
            return Ok(());
        };

        let json = serde_json::to_string(session)
            .map_err(|e| SessionError::Corrupt(e.to_string()))?;
        let sealed = cipher.seal(&json)?;
        tokio::fs::write(&self.path, sealed).await?;
        debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), SessionError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
