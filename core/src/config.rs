//! Client configuration.
//!
//! Layered with figment: built-in defaults, then an optional TOML file, then
//! `WP_`-prefixed environment variables (`WP_BASE_URL`, `WP_AUTH__KIND`,
//! `WP_AUTH__USERNAME`, ...). Nested keys use a double underscore.

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::FixedOffset;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::auth::{Anonymous, Authenticator, BasicAuth, BearerToken};
use crate::error::ConfigError;

pub const ENV_PREFIX: &str = "WP_";
pub const DEFAULT_USER_AGENT: &str = "wp-rest";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Site origin, with a trailing slash, e.g. `https://example.com/`.
    pub base_url: String,
    pub user_agent: String,
    /// Location of naive timestamps, as `+HH:MM` / `-HH:MM`.
    pub utc_offset: String,
    pub timeout_secs: Option<u64>,
    /// Reuse idle connections. Off by default.
    pub keep_alive: bool,
    pub auth: AuthConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            utc_offset: "+00:00".to_string(),
            timeout_secs: None,
            keep_alive: false,
            auth: AuthConfig::Anonymous,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Defaults overlaid with the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment(None))
    }

    /// Defaults overlaid with `path` (if it exists) and then the environment.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment(Some(path.as_ref())))
    }

    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            tracing::debug!(path = %path.display(), "loading client configuration file");
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        figment.extract().map_err(|err| ConfigError::Load(Box::new(err)))
    }

    pub fn location(&self) -> Result<FixedOffset, ConfigError> {
        parse_utc_offset(&self.utc_offset).ok_or_else(|| ConfigError::InvalidUtcOffset(self.utc_offset.clone()))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Credentials selectable from configuration.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuthConfig {
    #[default]
    Anonymous,
    Basic {
        username: String,
        password: String,
    },
    Bearer {
        token: String,
    },
}

impl AuthConfig {
    pub fn authenticator(&self) -> Arc<dyn Authenticator> {
        match self {
            AuthConfig::Anonymous => Arc::new(Anonymous),
            AuthConfig::Basic { username, password } => Arc::new(BasicAuth::new(username, password)),
            AuthConfig::Bearer { token } => Arc::new(BearerToken::new(token)),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthConfig::Anonymous => f.write_str("Anonymous"),
            AuthConfig::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            AuthConfig::Bearer { .. } => f.write_str("Bearer(<redacted>)"),
        }
    }
}

pub(crate) fn parse_utc_offset(text: &str) -> Option<FixedOffset> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("z") || text.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }
    let (sign, rest) = if let Some(rest) = text.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = text.strip_prefix('-') {
        (-1, rest)
    } else {
        return None;
    };
    let (hours, minutes) = rest.split_once(':')?;
    let hours = two_digits(hours).filter(|h| *h < 24)?;
    let minutes = two_digits(minutes).filter(|m| *m < 60)?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// One or two ASCII digits, without a sign.
fn two_digits(text: &str) -> Option<i32> {
    if text.is_empty() || text.len() > 2 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
