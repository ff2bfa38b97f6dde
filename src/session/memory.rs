use super::storage::{SessionAccessor, SessionSnapshot};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

/// In-process session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: RwLock<SessionSnapshot>,
    unauthorized: AtomicBool,
    logouts: AtomicUsize,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(token: Option<&str>, locale_code: Option<&str>) -> Self {
        Self {
            session: RwLock::new(SessionSnapshot::new(token, locale_code)),
            ..Self::default()
        }
    }

    pub fn login(&self, token: &str) {
        if let Ok(mut session) = self.session.write() {
            session.token = Some(token.to_string());
        }
        self.unauthorized.store(false, Ordering::SeqCst);
    }

    pub fn set_locale(&self, locale_code: &str) {
        if let Ok(mut session) = self.session.write() {
            session.locale_code = Some(locale_code.to_string());
        }
    }

    /// Number of times `logout` has been requested.
    pub fn logout_count(&self) -> usize {
        self.logouts.load(Ordering::SeqCst)
    }
}

impl SessionAccessor for MemorySessionStore {
    fn snapshot(&self) -> SessionSnapshot {
        self.session
            .read()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    fn logout(&self) {
        self.logouts.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut session) = self.session.write() {
            // locale is a user preference and outlives the session
            session.token = None;
        }
    }

    fn set_unauthorized(&self, value: bool) {
        self.unauthorized.store(value, Ordering::SeqCst);
    }

    fn is_unauthorized(&self) -> bool {
        self.unauthorized.load(Ordering::SeqCst)
    }
}
