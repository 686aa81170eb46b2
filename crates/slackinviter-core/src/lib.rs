//! Domain layer between `slackinviter-api` and the HTTP front end.
//!
//! This crate owns the background directory sync, the shared-state model
//! the request handlers read from, and the invite admission flow:
//!
//! - **[`Syncer`]**: The single background task. Walks the member
//!   directory through a [`Paginator`], backs off on rate limits, fetches
//!   workspace metadata, and publishes a fresh [`DirectorySnapshot`]. Failed
//!   passes are discarded and retried on a short interval. Cancellable via
//!   `CancellationToken`.
//!
//! - **[`SnapshotStore`]**: Lock-free publication of the current snapshot
//!   (`ArcSwap`). Readers get a whole `Arc<DirectorySnapshot>`; the writer
//!   replaces it in one pointer swap. A `watch` channel carries the
//!   publication generation and the loop's current [`SyncPhase`].
//!
//! - **[`Metrics`]**: Fixed set of named atomic counters plus a one-minute
//!   sliding hit rate, shared by the sync loop and the admission flow.
//!
//! - **[`Admission`]**: Validate-then-invite for a submitted form, behind
//!   the [`CaptchaVerifier`] and [`Inviter`] seams.
//!
//! The Slack, reCAPTCHA and Ory clients from `slackinviter-api` implement
//! the seams in [`convert`].

pub mod admission;
pub mod convert;
pub mod directory;
pub mod error;
pub mod metrics;
pub mod model;
pub mod session;
pub mod store;
pub mod sync;

// ── Primary re-exports ──────────────────────────────────────────────
pub use admission::{Admission, AdmissionError, CaptchaVerifier, InviteRequest, Inviter, RejectionKind};
pub use directory::{MemberDirectory, MemberPage, Paginator};
pub use error::CoreError;
pub use metrics::{Counter, Metrics, RateCounter};
pub use model::{DirectorySnapshot, Member, MemberCounts, Presence, WorkspaceInfo};
pub use session::{SessionVerifier, Visitor};
pub use store::SnapshotStore;
pub use sync::{IconChoice, SyncConfig, SyncPhase, Syncer, select_icon};
