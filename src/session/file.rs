//! JSON file session slot.
//!
//! The slot is a single file holding token and profile together. Writes go to
//! a sibling temp file that is then renamed over the slot, so a reader never
//! sees a token from one login paired with a profile from another.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::SessionError;
use crate::session::{Session, SessionBackend};

/// On-disk layout of the slot
#[derive(Debug, Serialize, Deserialize)]
struct PersistedSession {
    #[serde(flatten)]
    session: Session,
    #[serde(rename = "savedAt")]
    saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct FileSessionBackend {
    path: PathBuf,
}

impl FileSessionBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "session.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SessionBackend for FileSessionBackend {
    fn load(&self) -> Option<Session> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Ignoring unreadable session file {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<PersistedSession>(&contents) {
            Ok(persisted) if !persisted.session.token.trim().is_empty() => Some(persisted.session),
            Ok(_) => {
                warn!("Ignoring session file {} with an empty token", self.path.display());
                None
            }
            Err(e) => {
                warn!("Ignoring corrupt session file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let persisted = PersistedSession {
            session: session.clone(),
            saved_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&persisted)?;

        let temp = self.temp_path();
        fs::write(&temp, json)?;
        restrict_permissions(&temp)?;
        if let Err(e) = fs::rename(&temp, &self.path) {
            let _ = fs::remove_file(&temp);
            return Err(e.into());
        }

        debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// The slot holds a bearer token; keep it owner-only
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
