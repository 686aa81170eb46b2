// ── Invite admission ──
//
// Validate a submitted invite form, verify the human challenge, then ask
// the workspace provider to send the invitation. Checks run in a fixed
// order and stop at the first failure. Every outcome increments exactly
// one counter.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::error::CoreError;
use crate::metrics::{Counter, Metrics};
use crate::store::SnapshotStore;

/// The only code-of-conduct value that counts as acceptance.
pub const COC_ACCEPTED: &str = "1";

// ── Seams ───────────────────────────────────────────────────────────

#[async_trait]
pub trait CaptchaVerifier: Send + Sync {
    /// `Ok(false)` means the token was checked and rejected; `Err` means
    /// the check itself could not be completed.
    async fn verify(&self, token: &str, remote_ip: IpAddr) -> Result<bool, CoreError>;
}

#[async_trait]
pub trait Inviter: Send + Sync {
    async fn invite(&self, domain: &str, first_name: &str, last_name: &str, email: &str) -> Result<(), CoreError>;
}

// ── Request / outcome ───────────────────────────────────────────────

/// A submitted invite form plus the caller's network address.
#[derive(Debug, Clone, Default)]
pub struct InviteRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub coc: String,
    pub captcha_response: String,
    /// `ip:port` or a bare IP.
    pub remote_addr: String,
}

/// Whether a rejection is the caller's fault or ours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    /// Bad or incomplete input; the caller can fix and resubmit.
    Precondition,
    /// Something on the server side failed.
    Internal,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdmissionError {
    #[error("Missing email")]
    MissingEmail,

    #[error("Missing first name")]
    MissingFirstName,

    #[error("Missing last name")]
    MissingLastName,

    #[error("You need to accept the code of conduct")]
    CocNotAccepted,

    /// The remote address could not be parsed into an IP.
    #[error("Internal Server Error")]
    BadRemoteAddr { addr: String },

    /// The verification service could not be reached or refused the request.
    #[error("Error validating recaptcha.. Did you click it?")]
    CaptchaUnverified { reason: String },

    #[error("Invalid recaptcha")]
    CaptchaInvalid,

    /// The provider refused or failed to send the invite.
    #[error("{message}")]
    InviteFailed { message: String },
}

impl AdmissionError {
    pub fn kind(&self) -> RejectionKind {
        match self {
            Self::BadRemoteAddr { .. } | Self::InviteFailed { .. } => RejectionKind::Internal,
            _ => RejectionKind::Precondition,
        }
    }

    /// The counter charged for this rejection.
    pub fn counter(&self) -> Counter {
        match self {
            Self::MissingEmail => Counter::MissingEmail,
            Self::MissingFirstName => Counter::MissingFirstName,
            Self::MissingLastName => Counter::MissingLastName,
            Self::CocNotAccepted => Counter::MissingCoc,
            Self::BadRemoteAddr { .. } => Counter::BadRemoteAddr,
            Self::CaptchaUnverified { .. } => Counter::FailedCaptcha,
            Self::CaptchaInvalid => Counter::InvalidCaptcha,
            Self::InviteFailed { .. } => Counter::InviteErrors,
        }
    }
}

/// Accepts `ip:port` (IPv6 bracketed) or a bare IP.
pub fn parse_remote_ip(addr: &str) -> Option<IpAddr> {
    addr.parse::<SocketAddr>()
        .map(|sa| sa.ip())
        .or_else(|_| addr.parse::<IpAddr>())
        .ok()
}

// ── Admission ───────────────────────────────────────────────────────

pub struct Admission {
    verifier: Arc<dyn CaptchaVerifier>,
    inviter: Arc<dyn Inviter>,
    store: Arc<SnapshotStore>,
    metrics: Arc<Metrics>,
}

impl Admission {
    pub fn new(
        verifier: Arc<dyn CaptchaVerifier>,
        inviter: Arc<dyn Inviter>,
        store: Arc<SnapshotStore>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            verifier,
            inviter,
            store,
            metrics,
        }
    }

    /// Run the full admission flow and charge the matching counter.
    pub async fn admit(&self, request: &InviteRequest) -> Result<(), AdmissionError> {
        let outcome = self.evaluate(request).await;
        let counter = match &outcome {
            Ok(()) => Counter::SuccessfulInvites,
            Err(e) => e.counter(),
        };
        self.metrics.incr(counter);
        outcome
    }

    async fn evaluate(&self, request: &InviteRequest) -> Result<(), AdmissionError> {
        if request.email.is_empty() {
            return Err(AdmissionError::MissingEmail);
        }
        if request.first_name.is_empty() {
            return Err(AdmissionError::MissingFirstName);
        }
        if request.last_name.is_empty() {
            return Err(AdmissionError::MissingLastName);
        }
        if request.coc != COC_ACCEPTED {
            return Err(AdmissionError::CocNotAccepted);
        }

        let Some(remote_ip) = parse_remote_ip(&request.remote_addr) else {
            error!(addr = %request.remote_addr, "unable to parse remote address");
            return Err(AdmissionError::BadRemoteAddr {
                addr: request.remote_addr.clone(),
            });
        };

        match self.verifier.verify(&request.captcha_response, remote_ip).await {
            Ok(true) => {}
            Ok(false) => {
                info!(%remote_ip, "invalid recaptcha response");
                return Err(AdmissionError::CaptchaInvalid);
            }
            Err(e) => {
                warn!(%remote_ip, error = %e, "recaptcha verification failed");
                return Err(AdmissionError::CaptchaUnverified { reason: e.to_string() });
            }
        }

        let snapshot = self.store.load();
        if snapshot.workspace_domain.is_empty() {
            error!("invite requested before the first directory sync");
            return Err(AdmissionError::InviteFailed {
                message: "workspace not synchronized yet".into(),
            });
        }

        self.inviter
            .invite(
                &snapshot.workspace_domain,
                &request.first_name,
                &request.last_name,
                &request.email,
            )
            .await
            .map_err(|e| {
                error!(email = %request.email, error = %e, "invite failed");
                AdmissionError::InviteFailed {
                    message: provider_message(e),
                }
            })?;

        info!(email = %request.email, workspace = %snapshot.workspace_domain, "invite sent");
        Ok(())
    }
}

/// The provider's own error text (e.g. Slack's `already_invited`), without
/// our classification prefix.
fn provider_message(err: CoreError) -> String {
    match err {
        CoreError::Provider { code: Some(code), .. } => code,
        CoreError::Provider { message, code: None } => message,
        other => other.to_string(),
    }
}
