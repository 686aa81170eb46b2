// ── Snapshot publication ──
//
// Single writer (the sync loop), many readers (request handlers).
// The current snapshot lives behind an `ArcSwap`, so a reader takes one
// `Arc` and sees every field of the same pass. Publication bumps a
// generation counter on a `watch` channel for anyone waiting on updates.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tokio::sync::watch;

use crate::model::DirectorySnapshot;
use crate::sync::SyncPhase;

pub struct SnapshotStore {
    current: ArcSwap<DirectorySnapshot>,
    generation: watch::Sender<u64>,
    phase: watch::Sender<SyncPhase>,
}

impl SnapshotStore {
    /// Starts at the zero snapshot, generation 0.
    pub fn new() -> Self {
        Self::with_snapshot(DirectorySnapshot::default())
    }

    pub fn with_snapshot(initial: DirectorySnapshot) -> Self {
        let (generation, _) = watch::channel(0);
        let (phase, _) = watch::channel(SyncPhase::Idle);
        Self {
            current: ArcSwap::from_pointee(initial),
            generation,
            phase,
        }
    }

    /// The most recently published snapshot, whole.
    pub fn load(&self) -> Arc<DirectorySnapshot> {
        self.current.load_full()
    }

    /// Replace the current snapshot and bump the generation.
    pub fn publish(&self, snapshot: DirectorySnapshot) -> Arc<DirectorySnapshot> {
        debug_assert!(snapshot.active_count <= snapshot.total_count);
        let snapshot = Arc::new(snapshot);
        self.current.store(Arc::clone(&snapshot));
        self.generation.send_modify(|g| *g += 1);
        snapshot
    }

    /// Number of snapshots published so far.
    pub fn generation(&self) -> u64 {
        *self.generation.borrow()
    }

    /// Receiver that wakes on every publication.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }

    pub fn phase(&self) -> SyncPhase {
        *self.phase.borrow()
    }

    pub(crate) fn set_phase(&self, phase: SyncPhase) {
        self.phase.send_replace(phase);
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}
