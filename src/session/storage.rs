use serde::{Deserialize, Serialize};

/// Session values the client reads before every outbound request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale_code: Option<String>,
}

impl SessionSnapshot {
    pub fn new(token: Option<&str>, locale_code: Option<&str>) -> Self {
        Self {
            token: token.map(|s| s.to_string()),
            locale_code: locale_code.map(|s| s.to_string()),
        }
    }

    /// Token, ignoring empty strings.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    /// Locale code, ignoring empty strings.
    pub fn locale_code(&self) -> Option<&str> {
        self.locale_code.as_deref().filter(|c| !c.is_empty())
    }

    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }
}

/// Capability the client uses to read and act on the externally owned session.
///
/// Reads must never fail: an unreadable store yields an empty snapshot.
pub trait SessionAccessor: Send + Sync {
    /// Current token and locale
    fn snapshot(&self) -> SessionSnapshot;

    /// Clear the session token (forced logout)
    fn logout(&self);

    /// Raise or lower the "unauthorized" UI flag
    fn set_unauthorized(&self, value: bool);

    fn is_unauthorized(&self) -> bool;
}

/// Accessor for contexts without a session store; every read is empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSession;

impl SessionAccessor for NoSession {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::default()
    }

    fn logout(&self) {}

    fn set_unauthorized(&self, _value: bool) {}

    fn is_unauthorized(&self) -> bool {
        false
    }
}
