// ── Visitor sessions ──
//
// Optional gate in front of the home page: the identity provider is asked
// whether the browser's cookies belong to an active session.

use async_trait::async_trait;

use crate::error::CoreError;

/// Signed-in visitor, as far as the home page cares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Visitor {
    pub email: Option<String>,
    pub name: Option<String>,
}

#[async_trait]
pub trait SessionVerifier: Send + Sync {
    /// `Ok(None)` for anonymous visitors and inactive sessions.
    async fn visitor(&self, cookies: &str) -> Result<Option<Visitor>, CoreError>;
}
