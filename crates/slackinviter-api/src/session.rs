// Ory session check
//
// Forwards the browser's `Cookie` header to `{base}/sessions/whoami`.
// A 401/403 means "no session"; anything else non-2xx is an error.

use reqwest::header::COOKIE;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// The subset of an Ory session the home page needs.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub identity: Option<Identity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Identity {
    #[serde(default)]
    pub traits: Traits,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Traits {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl Session {
    pub fn email(&self) -> Option<&str> {
        self.identity.as_ref()?.traits.email.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.identity.as_ref()?.traits.name.as_deref()
    }
}

/// Client for the identity provider's frontend session endpoint.
pub struct SessionClient {
    http: reqwest::Client,
    whoami_url: Url,
}

impl SessionClient {
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        Self::with_client(transport.build_client()?, base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, Error> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            http,
            whoami_url: base.join("sessions/whoami")?,
        })
    }

    /// Exchange the caller's cookies for a session.
    ///
    /// `Ok(None)` when the identity provider does not recognise the cookies.
    pub async fn whoami(&self, cookies: &str) -> Result<Option<Session>, Error> {
        debug!("GET {}", self.whoami_url);

        let resp = self
            .http
            .get(self.whoami_url.clone())
            .header(COOKIE, cookies)
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Error::Http {
                endpoint: "sessions/whoami".into(),
                status: status.as_u16(),
                message: resp.text().await.unwrap_or_default(),
            });
        }

        let body = resp.text().await?;
        let session: Session = serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: body.clone(),
        })?;
        Ok(Some(session))
    }
}
