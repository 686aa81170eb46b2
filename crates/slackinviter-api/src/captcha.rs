// Google reCAPTCHA v2 verification client
//
// POSTs the widget's response token (plus the caller IP) to `siteverify`.
// A definitive "not a human" answer is `Ok(false)`; a request the service
// could not evaluate at all surfaces as `Error::Captcha` with its codes.

use std::net::IpAddr;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

const SITEVERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    #[serde(default)]
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

#[derive(Serialize)]
struct VerifyForm<'a> {
    secret: &'a str,
    response: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    remoteip: Option<String>,
}

/// Async client for the reCAPTCHA `siteverify` endpoint.
pub struct RecaptchaClient {
    http: reqwest::Client,
    endpoint: Url,
    secret: SecretString,
}

impl RecaptchaClient {
    /// Client against Google's production endpoint.
    pub fn new(secret: SecretString, transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            endpoint: Url::parse(SITEVERIFY_URL)?,
            secret,
        })
    }

    /// Wrap an existing `reqwest::Client` and point it at a custom endpoint.
    pub fn with_client(http: reqwest::Client, endpoint: &str, secret: SecretString) -> Result<Self, Error> {
        Ok(Self {
            http,
            endpoint: Url::parse(endpoint)?,
            secret,
        })
    }

    /// Verify a widget response token.
    ///
    /// Returns `Ok(true)` when the challenge was solved, `Ok(false)` when
    /// Google says it was not.
    pub async fn verify(&self, response: &str, remote_ip: Option<IpAddr>) -> Result<bool, Error> {
        debug!("POST {}", self.endpoint);

        let form = VerifyForm {
            secret: self.secret.expose_secret(),
            response,
            remoteip: remote_ip.map(|ip| ip.to_string()),
        };

        let resp = self
            .http
            .post(self.endpoint.clone())
            .form(&form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Http {
                endpoint: "siteverify".into(),
                status: status.as_u16(),
                message: status.to_string(),
            });
        }

        let body = resp.text().await?;
        let verification: VerifyResponse =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: body.clone(),
            })?;

        if !verification.error_codes.is_empty() {
            return Err(Error::Captcha {
                codes: verification.error_codes,
            });
        }

        Ok(verification.success)
    }
}
