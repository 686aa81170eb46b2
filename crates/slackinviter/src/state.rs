// Shared request state
//
// Built once in `main` and cloned into every handler. Everything behind
// it is either immutable or internally synchronized.

use std::path::PathBuf;
use std::sync::Arc;

use slackinviter_config::Settings;
use slackinviter_core::{Admission, Metrics, SessionVerifier, SnapshotStore};

/// The non-secret settings the handlers need.
#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub captcha_sitekey: String,
    pub coc_url: String,
    pub enforce_https: bool,
    pub trust_forwarded_for: bool,
    pub static_dir: PathBuf,
}

impl From<&Settings> for SiteSettings {
    fn from(settings: &Settings) -> Self {
        Self {
            captcha_sitekey: settings.captcha_sitekey.clone(),
            coc_url: settings.coc_url.clone(),
            enforce_https: settings.enforce_https,
            trust_forwarded_for: settings.trust_forwarded_for,
            static_dir: settings.static_dir.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SnapshotStore>,
    pub metrics: Arc<Metrics>,
    pub admission: Arc<Admission>,
    /// `None` leaves the home page open to anonymous visitors.
    pub sessions: Option<Arc<dyn SessionVerifier>>,
    pub site: Arc<SiteSettings>,
}
