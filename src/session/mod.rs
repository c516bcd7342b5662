//! # Session Module
//!
//! Holds the caller's bearer token and cached profile for the lifetime of the
//! process. Persistence goes through a [`SessionBackend`] so tests can swap
//! the file slot for an in-memory one.
//!
//! `SessionStore` is the only writer of the persisted slot. Every mutation
//! reads the full session, merges the change and writes the full session
//! back while holding the store's lock, and the cached copy is replaced only
//! after the backend accepted the write.

pub mod file;
pub mod memory;

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::SessionError;
use crate::models::{Profile, VerificationStatus};

pub use file::FileSessionBackend;
pub use memory::InMemorySessionBackend;

/// The signed-in state. A profile can only exist alongside a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
    /// The cached status was set optimistically after a verification request
    /// and has not been confirmed by a status fetch yet
    #[serde(rename = "awaitingConfirmation", default)]
    pub awaiting_confirmation: bool,
}

impl Session {
    pub fn new(token: impl Into<String>, profile: Option<Profile>) -> Self {
        Self {
            token: token.into(),
            profile,
            awaiting_confirmation: false,
        }
    }

    pub fn verification_status(&self) -> Option<VerificationStatus> {
        self.profile.as_ref().map(|p| p.verification_status)
    }
}

/// Storage slot for the session.
///
/// `load` never fails: a missing or unreadable slot is simply no session.
pub trait SessionBackend: Send + Sync {
    fn load(&self) -> Option<Session>;
    /// Replace the slot with `session` as a unit
    fn save(&self, session: &Session) -> Result<(), SessionError>;
    /// Remove token and profile together. Clearing an empty slot succeeds.
    fn clear(&self) -> Result<(), SessionError>;
}

pub struct SessionStore {
    backend: Arc<dyn SessionBackend>,
    current: Mutex<Option<Session>>,
}

impl SessionStore {
    /// Open the store and read whatever the backend holds
    pub fn new(backend: Arc<dyn SessionBackend>) -> Self {
        let current = backend.load();
        Self {
            backend,
            current: Mutex::new(current),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemorySessionBackend::default()))
    }

    /// Re-read the persisted slot, replacing the cached session
    pub fn load(&self) -> Option<Session> {
        let mut current = self.current.lock();
        *current = self.backend.load();
        current.clone()
    }

    pub fn current(&self) -> Option<Session> {
        self.current.lock().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.current.lock().as_ref().map(|s| s.token.clone())
    }

    pub fn profile(&self) -> Option<Profile> {
        self.current.lock().as_ref().and_then(|s| s.profile.clone())
    }

    pub fn verification_status(&self) -> Option<VerificationStatus> {
        self.current.lock().as_ref().and_then(Session::verification_status)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.lock().is_some()
    }

    /// Persist a token and profile as one unit. A blank token is rejected.
    pub fn save(
        &self,
        token: impl Into<String>,
        profile: Option<Profile>,
    ) -> Result<(), SessionError> {
        let session = Session::new(token, profile);
        if session.token.trim().is_empty() {
            return Err(SessionError::EmptyToken);
        }
        let mut current = self.current.lock();
        self.backend.save(&session)?;
        *current = Some(session);
        Ok(())
    }

    /// Drop token and profile together. Idempotent.
    pub fn clear(&self) -> Result<(), SessionError> {
        let mut current = self.current.lock();
        self.backend.clear()?;
        if current.take().is_some() {
            info!("Session cleared");
        }
        Ok(())
    }

    /// Clear only if `token` is still the current one. A session that
    /// replaced it in the meantime is left alone. Returns whether anything
    /// was cleared.
    pub fn clear_if(&self, token: &str) -> Result<bool, SessionError> {
        let mut current = self.current.lock();
        if !current.as_ref().is_some_and(|s| s.token == token) {
            return Ok(false);
        }
        self.backend.clear()?;
        current.take();
        info!("Session cleared");
        Ok(true)
    }

    /// Merge an authoritative status into the cached profile, leaving the
    /// other profile fields alone. Returns `false` when no profile is cached.
    pub fn update_verification(&self, status: VerificationStatus) -> Result<bool, SessionError> {
        self.modify_profile(None, |session| apply_status(session, status))
    }

    /// Like [`update_verification`](Self::update_verification), for a status
    /// fetched with `token`. Dropped when another session has replaced it
    /// since the fetch started.
    pub fn update_verification_for(
        &self,
        token: &str,
        status: VerificationStatus,
    ) -> Result<bool, SessionError> {
        self.modify_profile(Some(token), |session| apply_status(session, status))
    }

    /// Optimistic `unverified -> pending` transition after a verification
    /// request made with `token` succeeded. Never moves a status backwards and
    /// ignores a session that is no longer `token`'s. Returns whether the
    /// cached status changed.
    pub fn mark_verification_requested(&self, token: &str) -> Result<bool, SessionError> {
        let mut changed = false;
        self.modify_profile(Some(token), |session| {
            if let Some(profile) = session.profile.as_mut() {
                if profile.verification_status < VerificationStatus::Pending {
                    profile.verification_status = VerificationStatus::Pending;
                    session.awaiting_confirmation = true;
                    changed = true;
                }
            }
        })?;
        Ok(changed)
    }

    fn modify_profile<F>(
        &self,
        expected_token: Option<&str>,
        apply: F,
    ) -> Result<bool, SessionError>
    where
        F: FnOnce(&mut Session),
    {
        let mut current = self.current.lock();
        let Some(session) = current.as_ref().filter(|s| {
            s.profile.is_some() && expected_token.is_none_or(|token| s.token == token)
        }) else {
            return Ok(false);
        };

        let mut next = session.clone();
        apply(&mut next);
        if &next != session {
            self.backend.save(&next)?;
            *current = Some(next);
        }
        Ok(true)
    }
}

fn apply_status(session: &mut Session, status: VerificationStatus) {
    if let Some(profile) = session.profile.as_mut() {
        profile.verification_status = status;
    }
    session.awaiting_confirmation = false;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(status: VerificationStatus) -> Profile {
        Profile {
            id: Some("u1".to_string()),
            email: "user@example.com".to_string(),
            verification_status: status,
        }
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let store = SessionStore::in_memory();
        store.save("tok", Some(profile(VerificationStatus::Unverified))).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.token, "tok");
        assert_eq!(loaded.profile, Some(profile(VerificationStatus::Unverified)));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = SessionStore::in_memory();
        store.save("tok", None).unwrap();

        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.load().is_none());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_update_verification_keeps_other_fields() {
        let store = SessionStore::in_memory();
        store.save("tok", Some(profile(VerificationStatus::Unverified))).unwrap();

        assert!(store.update_verification(VerificationStatus::Verified).unwrap());

        let cached = store.profile().unwrap();
        assert_eq!(cached.verification_status, VerificationStatus::Verified);
        assert_eq!(cached.email, "user@example.com");
        assert_eq!(cached.id.as_deref(), Some("u1"));
        assert_eq!(store.token().as_deref(), Some("tok"));
    }

    #[test]
    fn test_update_verification_without_profile_is_noop() {
        let store = SessionStore::in_memory();
        assert!(!store.update_verification(VerificationStatus::Verified).unwrap());

        store.save("tok", None).unwrap();
        assert!(!store.update_verification(VerificationStatus::Verified).unwrap());
        assert_eq!(store.current(), Some(Session::new("tok", None)));
    }

    #[test]
    fn test_optimistic_pending_then_reconciled() {
        let store = SessionStore::in_memory();
        store.save("tok", Some(profile(VerificationStatus::Unverified))).unwrap();

        assert!(store.mark_verification_requested("tok").unwrap());
        let session = store.current().unwrap();
        assert_eq!(session.verification_status(), Some(VerificationStatus::Pending));
        assert!(session.awaiting_confirmation);

        // the next authoritative fetch wins, even if it disagrees
        store.update_verification(VerificationStatus::Unverified).unwrap();
        let session = store.current().unwrap();
        assert_eq!(session.verification_status(), Some(VerificationStatus::Unverified));
        assert!(!session.awaiting_confirmation);
    }

    #[test]
    fn test_request_never_downgrades_verified() {
        let store = SessionStore::in_memory();
        store.save("tok", Some(profile(VerificationStatus::Verified))).unwrap();

        assert!(!store.mark_verification_requested("tok").unwrap());
        assert_eq!(store.verification_status(), Some(VerificationStatus::Verified));
    }

    #[test]
    fn test_failed_write_keeps_last_consistent_state() {
        let backend = Arc::new(InMemorySessionBackend::default());
        let store = SessionStore::new(backend.clone());
        store.save("tok", Some(profile(VerificationStatus::Unverified))).unwrap();

        backend.set_fail_writes(true);
        assert!(store.update_verification(VerificationStatus::Verified).is_err());
        assert!(store.save("other", None).is_err());
        assert!(store.clear().is_err());

        assert_eq!(store.token().as_deref(), Some("tok"));
        assert_eq!(store.verification_status(), Some(VerificationStatus::Unverified));
        assert_eq!(
            store.load().and_then(|s| s.verification_status()),
            Some(VerificationStatus::Unverified)
        );
    }

    #[test]
    fn test_blank_token_is_rejected() {
        let store = SessionStore::in_memory();
        assert!(matches!(store.save("", None), Err(SessionError::EmptyToken)));
        assert!(matches!(
            store.save("  ", Some(profile(VerificationStatus::Verified))),
            Err(SessionError::EmptyToken)
        ));
        assert!(!store.is_authenticated());
        assert!(store.load().is_none());
    }

    #[test]
    fn test_unrecognized_status_is_raised_to_pending() {
        let store = SessionStore::in_memory();
        store.save("tok", Some(profile(VerificationStatus::Unrecognized))).unwrap();

        assert!(store.mark_verification_requested("tok").unwrap());
        assert_eq!(store.verification_status(), Some(VerificationStatus::Pending));
    }

    #[test]
    fn test_writes_for_a_replaced_token_are_dropped() {
        let store = SessionStore::in_memory();
        store.save("token-b", Some(profile(VerificationStatus::Unverified))).unwrap();

        assert!(!store.update_verification_for("token-a", VerificationStatus::Verified).unwrap());
        assert!(!store.mark_verification_requested("token-a").unwrap());
        assert!(!store.clear_if("token-a").unwrap());

        let session = store.current().unwrap();
        assert_eq!(session.token, "token-b");
        assert_eq!(session.verification_status(), Some(VerificationStatus::Unverified));
        assert!(!session.awaiting_confirmation);

        assert!(store.update_verification_for("token-b", VerificationStatus::Pending).unwrap());
        assert_eq!(store.verification_status(), Some(VerificationStatus::Pending));
        assert!(store.clear_if("token-b").unwrap());
        assert!(!store.is_authenticated());
    }
}
