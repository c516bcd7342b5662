//! In-memory session slot, for tests and short-lived processes.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::error::SessionError;
use crate::session::{Session, SessionBackend};

#[derive(Default)]
pub struct InMemorySessionBackend {
    slot: Mutex<Option<Session>>,
    fail_writes: AtomicBool,
}

impl InMemorySessionBackend {
    pub fn with_session(session: Session) -> Self {
        Self {
            slot: Mutex::new(Some(session)),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make every later `save`/`clear` fail without touching the slot
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), SessionError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(io::Error::other("session slot is read-only").into());
        }
        Ok(())
    }
}

impl SessionBackend for InMemorySessionBackend {
    fn load(&self) -> Option<Session> {
        self.slot.lock().clone()
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        self.check_writable()?;
        *self.slot.lock() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        self.check_writable()?;
        *self.slot.lock() = None;
        Ok(())
    }
}
