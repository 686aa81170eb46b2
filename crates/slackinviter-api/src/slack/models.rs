// Slack Web API response types
//
// Only the fields the inviter reads are modelled. Fields use
// `#[serde(default)]` liberally because Slack omits falsy flags.

use serde::{Deserialize, Serialize};

// ── Response Envelope ────────────────────────────────────────────────

/// The `{ "ok": true }` / `{ "ok": false, "error": "..." }` wrapper every
/// Web API method returns alongside its payload.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Cursor pagination metadata.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ResponseMetadata {
    #[serde(default)]
    pub next_cursor: String,
}

// ── users.list ───────────────────────────────────────────────────────

/// A workspace member as returned by `users.list`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SlackUser {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub is_bot: bool,
    /// Only present when the list was requested with `presence=true`.
    #[serde(default)]
    pub presence: Option<String>,
}

/// One page of `users.list`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UsersPage {
    #[serde(default)]
    pub members: Vec<SlackUser>,
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}

impl UsersPage {
    /// The cursor for the following page, or `None` when this is the last.
    ///
    /// Slack signals exhaustion with an empty `next_cursor`.
    pub fn next_cursor(&self) -> Option<&str> {
        self.response_metadata
            .as_ref()
            .map(|m| m.next_cursor.as_str())
            .filter(|c| !c.is_empty())
    }
}

// ── team.info ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct TeamInfoResponse {
    pub team: TeamInfo,
}

/// Workspace metadata from `team.info`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TeamInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub domain: String,
    /// `image_34` .. `image_230` URLs plus the `image_default` marker.
    /// Kept loosely typed: the set of keys varies by workspace.
    #[serde(default)]
    pub icon: serde_json::Map<String, serde_json::Value>,
}

// ── users.admin.invite ───────────────────────────────────────────────

/// Form body for the legacy `users.admin.invite` method.
#[derive(Debug, Serialize)]
pub struct InviteForm<'a> {
    pub token: &'a str,
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub set_active: bool,
    #[serde(rename = "_attempts")]
    pub attempts: u32,
}
