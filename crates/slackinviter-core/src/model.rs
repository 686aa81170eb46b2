// ── Domain model ──
//
// Transient members consumed during a poll pass, the aggregate they
// reduce to, and the immutable snapshot the sync loop publishes.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Slack's built-in system bot. Never counted.
pub const SYSTEM_BOT_ID: &str = "USLACKBOT";

/// Member presence as reported by the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Presence {
    Active,
    Away,
    /// Presence was not requested, or the provider sent something else.
    #[default]
    Unknown,
}

impl Presence {
    pub fn from_provider(raw: Option<&str>) -> Self {
        match raw {
            Some("active") => Self::Active,
            Some("away") => Self::Away,
            _ => Self::Unknown,
        }
    }
}

/// A directory entry. Lives only for the duration of a poll pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: String,
    pub is_bot: bool,
    pub deleted: bool,
    pub presence: Presence,
}

impl Member {
    /// Humans that still belong to the workspace.
    pub fn is_countable(&self) -> bool {
        self.id != SYSTEM_BOT_ID && !self.is_bot && !self.deleted
    }
}

/// Running totals for one pass. `active <= total` by construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemberCounts {
    pub total: u64,
    pub active: u64,
}

impl MemberCounts {
    pub fn add(&mut self, member: &Member) {
        if !member.is_countable() {
            return;
        }
        self.total += 1;
        if member.presence == Presence::Active {
            self.active += 1;
        }
    }

    pub fn extend<'a>(&mut self, members: impl IntoIterator<Item = &'a Member>) {
        for member in members {
            self.add(member);
        }
    }
}

/// Workspace display metadata, as fetched at the end of a pass.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceInfo {
    pub name: String,
    pub domain: String,
    /// Raw icon map: `image_{size}` URLs plus an optional `image_default` flag.
    pub icons: serde_json::Map<String, serde_json::Value>,
}

/// Everything the render paths need, derived from one poll pass.
///
/// Never mutated after construction; the sync loop swaps in a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirectorySnapshot {
    pub total_count: u64,
    pub active_count: u64,
    pub workspace_name: String,
    pub workspace_domain: String,
    pub icon_url: String,
    /// When the pass that produced this snapshot finished. `None` before
    /// the first successful pass.
    pub synced_at: Option<DateTime<Utc>>,
}

impl DirectorySnapshot {
    /// `"active/total"` when anyone is active, otherwise just `"total"`.
    pub fn user_count_display(&self) -> String {
        if self.active_count > 0 {
            format!("{}/{}", self.active_count, self.total_count)
        } else {
            self.total_count.to_string()
        }
    }

    /// `false` until the first pass has been published.
    pub fn is_synced(&self) -> bool {
        self.synced_at.is_some()
    }
}
