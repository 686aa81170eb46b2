// ── Directory sync loop ──
//
// Background task that keeps the published `DirectorySnapshot` fresh.
//
// One pass: walk the member directory page by page, tally countable and
// active members, fetch workspace metadata, then publish a complete
// snapshot in one swap. Rate limits pause the pass and retry the same
// call (page or metadata); any other failure abandons the pass without
// publishing.
// Cancellation is observed at every wait.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::directory::{MemberDirectory, Paginator};
use crate::error::CoreError;
use crate::metrics::{Counter, Metrics};
use crate::model::{DirectorySnapshot, MemberCounts, WorkspaceInfo};
use crate::store::SnapshotStore;

/// Icon sizes probed in preference order.
const ICON_SIZES: [&str; 6] = ["132", "102", "88", "68", "44", "34"];

// ── Configuration ───────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub page_size: u32,
    pub include_presence: bool,
    /// Wait after a published pass.
    pub success_interval: Duration,
    /// Wait after a failed pass.
    pub failure_interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            page_size: 500,
            include_presence: true,
            success_interval: Duration::from_secs(60 * 60),
            failure_interval: Duration::from_secs(60),
        }
    }
}

/// Where the loop currently is. Published on the store's phase channel.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, strum::Display, strum::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SyncPhase {
    #[default]
    Idle,
    Polling,
    Aggregating,
    Published,
    Failed,
    Sleeping,
    Stopped,
}

// ── Icon selection ──────────────────────────────────────────────────

/// Outcome of probing a workspace icon map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconChoice {
    /// The workspace uses Slack's default artwork: show no icon.
    Default,
    Url(String),
    /// Nothing usable: keep whatever the previous snapshot had.
    Keep,
}

/// `image_default == true` wins; otherwise the first size key present
/// decides, even if its value is not a string.
pub fn select_icon(icons: &Map<String, Value>) -> IconChoice {
    if icons.get("image_default").and_then(Value::as_bool) == Some(true) {
        return IconChoice::Default;
    }
    for size in ICON_SIZES {
        if let Some(value) = icons.get(&format!("image_{size}")) {
            return match value.as_str() {
                Some(url) => IconChoice::Url(url.to_owned()),
                None => IconChoice::Keep,
            };
        }
    }
    IconChoice::Keep
}

// ── Syncer ──────────────────────────────────────────────────────────

pub struct Syncer {
    directory: Arc<dyn MemberDirectory>,
    store: Arc<SnapshotStore>,
    metrics: Arc<Metrics>,
    config: SyncConfig,
}

impl Syncer {
    pub fn new(
        directory: Arc<dyn MemberDirectory>,
        store: Arc<SnapshotStore>,
        metrics: Arc<Metrics>,
        config: SyncConfig,
    ) -> Self {
        Self {
            directory,
            store,
            metrics,
            config,
        }
    }

    /// Run the loop on the current runtime until `cancel` fires.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }

    /// Repeat passes forever, sleeping between them. Returns on cancellation.
    pub async fn run(self, cancel: CancellationToken) {
        info!(
            page_size = self.config.page_size,
            presence = self.config.include_presence,
            "directory sync started"
        );

        loop {
            let delay = match self.run_pass(&cancel).await {
                Ok(snapshot) => {
                    self.metrics.incr(Counter::SyncPasses);
                    self.store.set_phase(SyncPhase::Published);
                    info!(
                        total = snapshot.total_count,
                        active = snapshot.active_count,
                        workspace = %snapshot.workspace_domain,
                        "directory snapshot published"
                    );
                    self.config.success_interval
                }
                Err(CoreError::Cancelled) => break,
                Err(e) => {
                    self.metrics.incr(Counter::SyncFailures);
                    self.store.set_phase(SyncPhase::Failed);
                    warn!(error = %e, "directory sync pass failed");
                    self.config.failure_interval
                }
            };

            self.store.set_phase(SyncPhase::Sleeping);
            debug!(secs = delay.as_secs(), "sleeping until next pass");
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(delay) => {}
            }
        }

        self.store.set_phase(SyncPhase::Stopped);
        info!("directory sync stopped");
    }

    /// One full pass. Publishes on success; leaves the store untouched on error.
    pub async fn run_pass(&self, cancel: &CancellationToken) -> Result<Arc<DirectorySnapshot>, CoreError> {
        self.store.set_phase(SyncPhase::Polling);
        let counts = self.poll_members(cancel).await?;

        self.store.set_phase(SyncPhase::Aggregating);
        let info = self.fetch_workspace_info(cancel).await?;

        let previous = self.store.load();
        let icon_url = match select_icon(&info.icons) {
            IconChoice::Default => String::new(),
            IconChoice::Url(url) => url,
            IconChoice::Keep => {
                warn!(workspace = %info.domain, "unable to determine icon image");
                previous.icon_url.clone()
            }
        };

        Ok(self.store.publish(DirectorySnapshot {
            total_count: counts.total,
            active_count: counts.active,
            workspace_name: info.name,
            workspace_domain: info.domain,
            icon_url,
            synced_at: Some(Utc::now()),
        }))
    }

    async fn poll_members(&self, cancel: &CancellationToken) -> Result<MemberCounts, CoreError> {
        let mut pager = Paginator::new(
            self.directory.as_ref(),
            self.config.page_size,
            self.config.include_presence,
        );
        let mut counts = MemberCounts::default();

        loop {
            let next = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(CoreError::Cancelled),
                result = pager.next_page() => result,
            };

            match next {
                Ok(Some(members)) => {
                    counts.extend(&members);
                    debug!(
                        page = pager.pages_fetched(),
                        members = members.len(),
                        total = counts.total,
                        active = counts.active,
                        "member page tallied"
                    );
                }
                Ok(None) => return Ok(counts),
                Err(CoreError::RateLimited { retry_after }) => {
                    warn!(
                        secs = retry_after.as_secs(),
                        page = pager.pages_fetched() + 1,
                        "rate limited while listing members, waiting"
                    );
                    self.back_off(cancel, retry_after).await?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Workspace metadata, retried after the provider's delay on rate limits.
    /// The member tally of the current pass survives the wait.
    async fn fetch_workspace_info(&self, cancel: &CancellationToken) -> Result<WorkspaceInfo, CoreError> {
        loop {
            let result = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(CoreError::Cancelled),
                result = self.directory.workspace_info() => result,
            };

            match result {
                Err(CoreError::RateLimited { retry_after }) => {
                    warn!(secs = retry_after.as_secs(), "rate limited while fetching workspace info, waiting");
                    self.back_off(cancel, retry_after).await?;
                }
                other => return other,
            }
        }
    }

    async fn back_off(&self, cancel: &CancellationToken, retry_after: Duration) -> Result<(), CoreError> {
        self.metrics.incr(Counter::RateLimited);
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(CoreError::Cancelled),
            () = tokio::time::sleep(retry_after) => Ok(()),
        }
    }
}
