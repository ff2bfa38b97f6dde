use super::storage::{SessionAccessor, SessionSnapshot};
use crate::error::Result;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockWriteGuard};

pub const SESSION_FILE_NAME: &str = "session.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(flatten)]
    pub session: SessionSnapshot,
    #[serde(default)]
    pub unauthorized: bool,
    pub updated_at: DateTime<Local>,
}

impl Default for StoredSession {
    fn default() -> Self {
        Self {
            session: SessionSnapshot::default(),
            unauthorized: false,
            updated_at: Local::now(),
        }
    }
}

/// Session persisted as JSON in a cache directory, shared between CLI runs.
///
/// The file is read once and then served from memory, so `snapshot()` on the
/// request path never touches the disk. Changes are written through; use
/// [`FilesystemSessionStore::load`] to pick up edits made by another process.
pub struct FilesystemSessionStore {
    dir: PathBuf,
    cache: RwLock<Option<StoredSession>>,
}

impl FilesystemSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: RwLock::new(None),
        }
    }

    /// `~/.cache/market-client`, or `./.market-client` when no home is known.
    pub fn default_dir() -> PathBuf {
        dirs::home_dir()
            .map(|home| home.join(".cache").join("market-client"))
            .unwrap_or_else(|| PathBuf::from(".market-client"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn session_file(&self) -> PathBuf {
        self.dir.join(SESSION_FILE_NAME)
    }

    fn cache(&self) -> RwLockWriteGuard<'_, Option<StoredSession>> {
        self.cache.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Re-read the session file and refresh the in-memory copy.
    /// Missing or unreadable files load as an empty session.
    pub fn load(&self) -> StoredSession {
        let stored = self.read_file();
        *self.cache() = Some(stored.clone());
        stored
    }

    /// In-memory copy, reading the file only on first use.
    pub fn current(&self) -> StoredSession {
        if let Some(stored) = self
            .cache
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
        {
            return stored.clone();
        }
        self.load()
    }

    fn read_file(&self) -> StoredSession {
        let path = self.session_file();
        let Ok(content) = fs::read_to_string(&path) else {
            return StoredSession::default();
        };
        match serde_json::from_str(&content) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt session file");
                StoredSession::default()
            }
        }
    }

    pub fn save(&self, stored: &StoredSession) -> Result<()> {
        let mut stored = stored.clone();
        stored.updated_at = Local::now();
        *self.cache() = Some(stored.clone());

        fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_string_pretty(&stored)?;
        fs::write(self.session_file(), content)?;
        Ok(())
    }

    /// Merge new values into the stored session. `None` leaves a field as is.
    pub fn update(&self, token: Option<&str>, locale_code: Option<&str>) -> Result<StoredSession> {
        let mut stored = self.current();
        if let Some(token) = token {
            stored.session.token = Some(token.to_string());
            stored.unauthorized = false;
        }
        if let Some(locale_code) = locale_code {
            stored.session.locale_code = Some(locale_code.to_string());
        }
        self.save(&stored)?;
        Ok(stored)
    }

    pub fn clear(&self) -> Result<()> {
        *self.cache() = Some(StoredSession::default());
        let path = self.session_file();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

impl Default for FilesystemSessionStore {
    fn default() -> Self {
        Self::new(Self::default_dir())
    }
}

impl SessionAccessor for FilesystemSessionStore {
    fn snapshot(&self) -> SessionSnapshot {
        self.current().session
    }

    // Writes happen only when the state actually changes, at most once per
    // forced logout.
    fn logout(&self) {
        let mut stored = self.current();
        if stored.session.token.take().is_none() {
            return;
        }
        if let Err(e) = self.save(&stored) {
            tracing::warn!(error = %e, "failed to persist logout");
        }
    }

    fn set_unauthorized(&self, value: bool) {
        let mut stored = self.current();
        if stored.unauthorized == value {
            return;
        }
        stored.unauthorized = value;
        if let Err(e) = self.save(&stored) {
            tracing::warn!(error = %e, "failed to persist unauthorized flag");
        }
    }

    fn is_unauthorized(&self) -> bool {
        self.current().unauthorized
    }
}
