// Slack Web API HTTP client
//
// Wraps `reqwest::Client` with bearer-token auth, method URL construction,
// envelope unwrapping, and 429 -> `RateLimited` translation. Endpoint
// methods live in sibling files as inherent impls to keep this module
// focused on transport mechanics.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, RETRY_AFTER};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::slack::models::Envelope;
use crate::transport::TransportConfig;

const DEFAULT_BASE_URL: &str = "https://slack.com/api/";

/// Used when a 429 arrives without a usable `Retry-After` header.
const FALLBACK_RETRY_AFTER: Duration = Duration::from_secs(30);

/// Where `users.admin.invite` is posted.
///
/// Slack only accepts the legacy invite call on the workspace's own
/// subdomain, so the target depends on the domain read from `team.info`.
#[derive(Debug, Clone, Default)]
pub enum InviteEndpoint {
    /// `https://{domain}.slack.com/api/`
    #[default]
    PerWorkspace,
    /// A fixed API base regardless of domain (proxies, test servers).
    Fixed(Url),
}

/// Raw HTTP client for the Slack Web API.
///
/// All methods return the unwrapped payload -- the `ok`/`error` envelope
/// is checked before the caller sees anything.
pub struct SlackClient {
    http: reqwest::Client,
    base_url: Url,
    invite_endpoint: InviteEndpoint,
    token: SecretString,
}

impl SlackClient {
    /// Create a client against `https://slack.com/api/`.
    ///
    /// The token is injected as a sensitive `Authorization: Bearer` default
    /// header on every request.
    pub fn new(token: SecretString, transport: &TransportConfig) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| Error::InvalidToken(e.to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = transport.build_client_with_headers(headers)?;
        let base_url = Url::parse(DEFAULT_BASE_URL)?;

        Ok(Self {
            http,
            base_url,
            invite_endpoint: InviteEndpoint::PerWorkspace,
            token,
        })
    }

    /// Wrap an existing `reqwest::Client` pointed at a custom API base.
    ///
    /// The caller manages default headers; the token is still sent in the
    /// invite form body, which is where `users.admin.invite` reads it.
    pub fn with_client(http: reqwest::Client, base_url: &str, token: SecretString) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
            invite_endpoint: InviteEndpoint::PerWorkspace,
            token,
        })
    }

    /// Override where invites are posted.
    pub fn with_invite_endpoint(mut self, endpoint: InviteEndpoint) -> Self {
        self.invite_endpoint = endpoint;
        self
    }

    /// The API base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn token(&self) -> &SecretString {
        &self.token
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{base}{method}`, e.g. `https://slack.com/api/users.list`.
    pub(crate) fn method_url(&self, method: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(method)?)
    }

    /// Invite URL for the given workspace domain.
    pub(crate) fn invite_url(&self, domain: &str) -> Result<Url, Error> {
        let base = match &self.invite_endpoint {
            InviteEndpoint::PerWorkspace => Url::parse(&format!("https://{domain}.slack.com/api/"))?,
            InviteEndpoint::Fixed(url) => normalize_base_url(url.as_str())?,
        };
        Ok(base.join("users.admin.invite")?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// GET a Slack method with query parameters and unwrap the envelope.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.method_url(method)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        self.parse_envelope(method, resp).await
    }

    /// POST a form-encoded body to an absolute URL and unwrap the envelope.
    pub(crate) async fn post_form<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: &str,
        url: Url,
        form: &B,
    ) -> Result<T, Error> {
        debug!("POST {url}");

        let resp = self.http.post(url).form(form).send().await?;
        self.parse_envelope(method, resp).await
    }

    /// Check status, then `ok`, then decode the full body as `T`.
    async fn parse_envelope<T: DeserializeOwned>(
        &self,
        method: &str,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = retry_after(resp.headers()).unwrap_or_else(|| {
                warn!(method, "429 without a usable Retry-After header");
                FALLBACK_RETRY_AFTER
            });
            return Err(Error::RateLimited { retry_after });
        }

        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(Error::Http {
                endpoint: method.to_owned(),
                status: status.as_u16(),
                message: if message.is_empty() {
                    status.to_string()
                } else {
                    message
                },
            });
        }

        let body = resp.text().await?;

        let envelope: Envelope = serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: body.clone(),
        })?;

        if !envelope.ok {
            return Err(Error::Slack {
                method: method.to_owned(),
                error: envelope.error.unwrap_or_else(|| "unknown_error".into()),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }
}

/// Parse `Retry-After` as whole seconds.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Ensure the base URL ends with `/` so `join("users.list")` appends.
fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn client() -> SlackClient {
        SlackClient::with_client(
            reqwest::Client::new(),
            "http://localhost:9999/api",
            SecretString::from("xoxp-test".to_owned()),
        )
        .unwrap()
    }

    #[test]
    fn method_url_appends_to_normalized_base() {
        let url = client().method_url("users.list").unwrap();
        assert_eq!(url.as_str(), "http://localhost:9999/api/users.list");
    }

    #[test]
    fn invite_url_uses_workspace_subdomain_by_default() {
        let url = client().invite_url("gophers").unwrap();
        assert_eq!(url.as_str(), "https://gophers.slack.com/api/users.admin.invite");
    }

    #[test]
    fn invite_url_honors_fixed_endpoint() {
        let fixed = Url::parse("http://127.0.0.1:4000/slack").unwrap();
        let url = client()
            .with_invite_endpoint(InviteEndpoint::Fixed(fixed))
            .invite_url("ignored")
            .unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:4000/slack/users.admin.invite");
    }

    #[test]
    fn retry_after_parses_seconds() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("17"));
        assert_eq!(retry_after(&headers), Some(Duration::from_secs(17)));

        headers.insert(RETRY_AFTER, HeaderValue::from_static("soon"));
        assert_eq!(retry_after(&headers), None);
    }
}
