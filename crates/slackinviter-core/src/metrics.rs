// ── Counters ──
//
// Process-wide named counters, readable at any time without locking.
// The name set is closed: each `Counter` variant maps to one atomic slot.
// The hit rate is a sliding one-minute window bucketed by second.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use strum::{EnumCount, IntoEnumIterator};
use tokio::time::Instant;

/// Every counter this process exposes, in `snake_case` on the wire.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumIter,
    strum::EnumCount,
    strum::IntoStaticStr,
    strum::Display,
)]
#[strum(serialize_all = "snake_case")]
pub enum Counter {
    Requests,
    MissingEmail,
    MissingFirstName,
    MissingLastName,
    MissingCoc,
    BadRemoteAddr,
    FailedCaptcha,
    InvalidCaptcha,
    InviteErrors,
    SuccessfulInvites,
    SyncPasses,
    SyncFailures,
    RateLimited,
}

impl Counter {
    #[allow(clippy::as_conversions)]
    const fn slot(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        self.into()
    }
}

pub struct Metrics {
    counters: [AtomicU64; Counter::COUNT],
    hits: RateCounter,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            counters: std::array::from_fn(|_| AtomicU64::new(0)),
            hits: RateCounter::new(Duration::from_secs(60)),
        }
    }

    pub fn incr(&self, counter: Counter) {
        self.add(counter, 1);
    }

    pub fn add(&self, counter: Counter, delta: u64) {
        self.counters[counter.slot()].fetch_add(delta, Ordering::Relaxed);
    }

    pub fn get(&self, counter: Counter) -> u64 {
        self.counters[counter.slot()].load(Ordering::Relaxed)
    }

    /// Record one home-page hit and return the rate over the last minute.
    pub fn record_hit(&self) -> u64 {
        self.hits.incr()
    }

    pub fn hits_per_minute(&self) -> u64 {
        self.hits.rate()
    }

    /// All counters by name, plus the current `hits_per_minute`.
    pub fn report(&self) -> BTreeMap<&'static str, u64> {
        let mut out: BTreeMap<&'static str, u64> =
            Counter::iter().map(|c| (c.name(), self.get(c))).collect();
        out.insert("hits_per_minute", self.hits_per_minute());
        out
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

// ── RateCounter ─────────────────────────────────────────────────────

const BUCKET: Duration = Duration::from_secs(1);

/// Events seen within a trailing window.
///
/// Hits are grouped into one-second buckets, so memory stays bounded by
/// the window length regardless of traffic.
pub struct RateCounter {
    window: Duration,
    buckets: Mutex<VecDeque<(Instant, u64)>>,
}

impl RateCounter {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            buckets: Mutex::new(VecDeque::new()),
        }
    }

    /// Count one event now and return the updated rate.
    pub fn incr(&self) -> u64 {
        let now = Instant::now();
        let mut buckets = self.buckets.lock().unwrap_or_else(PoisonError::into_inner);
        self.expire(&mut buckets, now);
        match buckets.back_mut() {
            Some((start, count)) if now.duration_since(*start) < BUCKET => *count += 1,
            _ => buckets.push_back((now, 1)),
        }
        buckets.iter().map(|(_, n)| n).sum()
    }

    pub fn rate(&self) -> u64 {
        let now = Instant::now();
        let mut buckets = self.buckets.lock().unwrap_or_else(PoisonError::into_inner);
        self.expire(&mut buckets, now);
        buckets.iter().map(|(_, n)| n).sum()
    }

    fn expire(&self, buckets: &mut VecDeque<(Instant, u64)>, now: Instant) {
        while let Some((start, _)) = buckets.front() {
            if now.duration_since(*start) >= self.window {
                buckets.pop_front();
            } else {
                break;
            }
        }
    }
}
