mod api;
mod defaults;
mod notifications;
mod validation;

use crate::cli::Args;
use crate::session::FilesystemSessionStore;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

pub use api::ApiConfig;
pub use notifications::NotificationsConfig;
pub use validation::{expand_with, parse_bool, validate_origin};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub verbose: Option<bool>,
    #[serde(default)]
    pub dir: Option<String>,
}

/// Layout of `.market-client.yaml` and friends.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Everything [`crate::api::ApiClient`] needs at construction.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_origin: String,
    pub api_prefix: String,
    pub timeout: Duration,
    pub unauthorized_cooldown: Duration,
    pub unauthorized_visible_for: Duration,
}

impl ClientConfig {
    /// Origin and prefix concatenated as configured.
    pub fn base_url(&self) -> String {
        format!("{}{}", self.api_origin, self.api_prefix)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_origin: defaults::default_api_origin(),
            api_prefix: defaults::default_api_prefix(),
            timeout: Duration::from_secs(defaults::default_timeout_secs()),
            unauthorized_cooldown: Duration::from_millis(defaults::default_cooldown_ms()),
            unauthorized_visible_for: Duration::from_millis(defaults::default_visible_ms()),
        }
    }
}

pub struct Config {
    pub client: ClientConfig,
    pub verbose: bool,
    pub session_dir: PathBuf,
    pub use_session: bool,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self, String> {
        let file_config = match FileConfig::load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{:#}", e);
                FileConfig::default()
            }
        };
        Self::resolve(args, &file_config, |name| env::var(name).ok())
    }

    /// Precedence: CLI args > environment > config file > defaults.
    pub fn resolve(
        args: &Args,
        file: &FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, String> {
        let expand = |value: &String| expand_with(value, &env);

        let api_origin = args
            .api_origin
            .clone()
            .or_else(|| env("MARKET_API_ORIGIN"))
            .or_else(|| file.api.origin.as_ref().map(expand))
            .unwrap_or_else(defaults::default_api_origin);
        validate_origin(&api_origin)?;

        let api_prefix = args
            .api_prefix
            .clone()
            .or_else(|| env("MARKET_API_PREFIX"))
            .or_else(|| file.api.prefix.as_ref().map(expand))
            .unwrap_or_else(defaults::default_api_prefix);

        let timeout_secs = env("MARKET_API_TIMEOUT")
            .and_then(|s| s.parse::<u64>().ok())
            .or(file.api.timeout)
            .unwrap_or_else(defaults::default_timeout_secs);

        let cooldown_ms = env("MARKET_UNAUTHORIZED_COOLDOWN_MS")
            .and_then(|s| s.parse::<u64>().ok())
            .or(file.notifications.cooldown_ms)
            .unwrap_or_else(defaults::default_cooldown_ms);

        let visible_ms = env("MARKET_UNAUTHORIZED_VISIBLE_MS")
            .and_then(|s| s.parse::<u64>().ok())
            .or(file.notifications.visible_ms)
            .unwrap_or_else(defaults::default_visible_ms);

        let verbose = args.verbose
            || env("MARKET_VERBOSE")
                .and_then(|v| parse_bool(&v))
                .or(file.session.verbose)
                .unwrap_or(false);

        let session_dir = env("MARKET_SESSION_DIR")
            .or_else(|| file.session.dir.as_ref().map(expand))
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(FilesystemSessionStore::default_dir);

        Ok(Config {
            client: ClientConfig {
                api_origin,
                api_prefix,
                timeout: Duration::from_secs(timeout_secs),
                unauthorized_cooldown: Duration::from_millis(cooldown_ms),
                unauthorized_visible_for: Duration::from_millis(visible_ms),
            },
            verbose,
            session_dir,
            use_session: !args.no_session,
        })
    }
}

impl FileConfig {
    pub fn load() -> Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(FileConfig::default())
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );
        let config = if is_yaml {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))?
        } else {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))?
        };

        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".market-client.yaml"),
            PathBuf::from(".market-client.yml"),
            PathBuf::from(".market-client.json"),
        ];

        if let Some(home_dir) = dirs::home_dir() {
            let config_dir = home_dir.join(".config").join("market-client");
            paths.push(config_dir.join("market-client.yaml"));
            paths.push(config_dir.join("market-client.yml"));
            paths.push(config_dir.join("market-client.json"));
        }

        paths
    }
}
