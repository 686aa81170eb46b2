//! Configuration for the slackinviter server.
//!
//! Layering, lowest to highest precedence: built-in defaults, an optional
//! TOML file, `SLACKINVITER_*` environment variables, then the bare `PORT`
//! variable most hosting platforms inject. The raw [`Config`] is validated
//! into [`Settings`], which holds secrets as `SecretString` and durations
//! as `Duration`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
    value::{Uncased, UncasedStr},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use slackinviter_api::TransportConfig;
use slackinviter_core::SyncConfig;

pub const ENV_PREFIX: &str = "SLACKINVITER_";

/// Slack refuses `users.list` pages larger than this.
const MAX_PAGE_SIZE: u32 = 1000;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting `{field}` (set {env})")]
    Missing { field: &'static str, env: String },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Raw config ──────────────────────────────────────────────────────

/// Everything that can be set from a file or the environment.
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub port: Option<u16>,
    pub captcha_sitekey: Option<String>,
    pub captcha_secret: Option<String>,
    pub slack_token: Option<String>,
    pub coc_url: String,
    /// Redirect plain-HTTP home page hits (per `X-Forwarded-Proto`) to HTTPS.
    pub enforce_https: bool,
    /// Verbose logging for outbound API calls.
    pub debug: bool,
    pub log_json: bool,
    pub static_dir: PathBuf,
    /// Take the caller address from the first `X-Forwarded-For` hop.
    pub trust_forwarded_for: bool,
    /// Identity provider base URL. Unset disables the session gate.
    pub session_url: Option<String>,
    pub http_timeout_secs: u64,
    pub sync: SyncSection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: None,
            captcha_sitekey: None,
            captcha_secret: None,
            slack_token: None,
            coc_url: "http://coc.golangbridge.org/".into(),
            enforce_https: false,
            debug: false,
            log_json: false,
            static_dir: PathBuf::from("./static"),
            trust_forwarded_for: false,
            session_url: None,
            http_timeout_secs: 30,
            sync: SyncSection::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct SyncSection {
    pub page_size: u32,
    pub include_presence: bool,
    pub success_interval_secs: u64,
    pub failure_interval_secs: u64,
}

impl Default for SyncSection {
    fn default() -> Self {
        Self {
            page_size: 500,
            include_presence: true,
            success_interval_secs: 3600,
            failure_interval_secs: 60,
        }
    }
}

// ── Loading ─────────────────────────────────────────────────────────

/// Env names from earlier deployments, where words were run together.
const LEGACY_KEYS: [(&str, &str); 5] = [
    ("captchasitekey", "captcha_sitekey"),
    ("captchasecret", "captcha_secret"),
    ("slacktoken", "slack_token"),
    ("cocurl", "coc_url"),
    ("enforcehttps", "enforce_https"),
];

fn canonical_key(key: &UncasedStr) -> Uncased<'_> {
    LEGACY_KEYS
        .iter()
        .find(|(legacy, _)| key.as_str().eq_ignore_ascii_case(legacy))
        .map_or_else(|| key.into(), |(_, canonical)| Uncased::from(*canonical))
}

/// The provider stack, exposed so callers can inspect or extend it.
pub fn figment(path: Option<&Path>) -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
    if let Some(path) = path {
        figment = figment.merge(Toml::file(path));
    }
    figment
        .merge(Env::prefixed(ENV_PREFIX).map(canonical_key).split("__"))
        .merge(Env::raw().only(&["PORT"]))
}

/// Load the raw config without validating it.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    Ok(figment(path).extract()?)
}

/// Load and validate.
pub fn load(path: Option<&Path>) -> Result<Settings, ConfigError> {
    Settings::try_from(load_config(path)?)
}

// ── Validated settings ──────────────────────────────────────────────

#[derive(Debug)]
pub struct Settings {
    pub port: u16,
    pub captcha_sitekey: String,
    pub captcha_secret: SecretString,
    pub slack_token: SecretString,
    pub coc_url: String,
    pub enforce_https: bool,
    pub debug: bool,
    pub log_json: bool,
    pub static_dir: PathBuf,
    pub trust_forwarded_for: bool,
    pub session_url: Option<Url>,
    pub http_timeout: Duration,
    pub sync: SyncConfig,
}

impl Settings {
    pub fn transport(&self) -> TransportConfig {
        TransportConfig::with_timeout(self.http_timeout)
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ConfigError> {
    value.filter(|v| !v.trim().is_empty()).ok_or_else(|| ConfigError::Missing {
        field,
        env: format!("{ENV_PREFIX}{}", field.to_ascii_uppercase()),
    })
}

fn positive(value: u64, field: &str) -> Result<Duration, ConfigError> {
    if value == 0 {
        return Err(ConfigError::Validation {
            field: field.into(),
            reason: "must be greater than zero".into(),
        });
    }
    Ok(Duration::from_secs(value))
}

impl TryFrom<Config> for Settings {
    type Error = ConfigError;

    fn try_from(cfg: Config) -> Result<Self, Self::Error> {
        let port = cfg.port.ok_or_else(|| ConfigError::Missing {
            field: "port",
            env: "PORT".into(),
        })?;
        let captcha_sitekey = required(cfg.captcha_sitekey, "captcha_sitekey")?;
        let captcha_secret = SecretString::from(required(cfg.captcha_secret, "captcha_secret")?);
        let slack_token = SecretString::from(required(cfg.slack_token, "slack_token")?);

        let session_url = cfg
            .session_url
            .filter(|s| !s.trim().is_empty())
            .map(|raw| {
                Url::parse(&raw).map_err(|e| ConfigError::Validation {
                    field: "session_url".into(),
                    reason: format!("{e}: {raw}"),
                })
            })
            .transpose()?;

        if !(1..=MAX_PAGE_SIZE).contains(&cfg.sync.page_size) {
            return Err(ConfigError::Validation {
                field: "sync.page_size".into(),
                reason: format!("expected 1..={MAX_PAGE_SIZE}, got {}", cfg.sync.page_size),
            });
        }

        let sync = SyncConfig {
            page_size: cfg.sync.page_size,
            include_presence: cfg.sync.include_presence,
            success_interval: positive(cfg.sync.success_interval_secs, "sync.success_interval_secs")?,
            failure_interval: positive(cfg.sync.failure_interval_secs, "sync.failure_interval_secs")?,
        };

        Ok(Self {
            port,
            captcha_sitekey,
            captcha_secret,
            slack_token,
            coc_url: cfg.coc_url,
            enforce_https: cfg.enforce_https,
            debug: cfg.debug,
            log_json: cfg.log_json,
            static_dir: cfg.static_dir,
            trust_forwarded_for: cfg.trust_forwarded_for,
            session_url,
            http_timeout: positive(cfg.http_timeout_secs, "http_timeout_secs")?,
            sync,
        })
    }
}
