//! Request sequence numbers for discarding superseded fetches.
//!
//! Each rendered table gets a view ID. Every fetch for that view is issued
//! the next sequence number, and when the API call returns the handler asks
//! whether its number is still the latest for the view. Older fetches are
//! dropped instead of overwriting newer data.

use std::{
    collections::BTreeMap,
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicU64, Ordering},
    },
};

/// The most views tracked at once. The least recently fetched views are
/// forgotten first.
const MAX_TRACKED_VIEWS: usize = 4096;

/// Hands out view IDs and per-view sequence numbers.
#[derive(Debug, Clone, Default)]
pub struct FetchSequencer {
    next_view_id: Arc<AtomicU64>,
    issued: Arc<AtomicU64>,
    /// The latest sequence number and the time of the last fetch, per view.
    latest: Arc<Mutex<BTreeMap<String, (u64, u64)>>>,
}

impl FetchSequencer {
    /// Create a sequencer with no views.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a fresh ID for a newly rendered view.
    pub fn new_view_id(&self) -> u64 {
        self.next_view_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Issue the next sequence number for `key`.
    pub fn issue(&self, key: &str) -> u64 {
        let mut latest = self.lock();
        let now = self.issued.fetch_add(1, Ordering::Relaxed);

        let sequence = match latest.get_mut(key) {
            Some((sequence, last_used)) => {
                *sequence += 1;
                *last_used = now;
                *sequence
            }
            None => {
                latest.insert(key.to_owned(), (1, now));
                1
            }
        };

        if latest.len() > MAX_TRACKED_VIEWS {
            evict_least_recent(&mut latest);
        }

        sequence
    }

    /// Whether `sequence` is the newest number issued for `key`.
    ///
    /// Forgotten keys are treated as current.
    pub fn is_latest(&self, key: &str, sequence: u64) -> bool {
        self.lock()
            .get(key)
            .is_none_or(|(latest, _)| *latest == sequence)
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, (u64, u64)>> {
        self.latest.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("Fetch sequencer lock was poisoned, recovering.");
            poisoned.into_inner()
        })
    }
}

fn evict_least_recent(latest: &mut BTreeMap<String, (u64, u64)>) {
    let oldest = latest
        .iter()
        .min_by_key(|(_, (_, last_used))| *last_used)
        .map(|(key, _)| key.clone());

    if let Some(key) = oldest {
        latest.remove(&key);
    }
}

#[cfg(test)]
mod tests {
    use super::{FetchSequencer, MAX_TRACKED_VIEWS};

    #[test]
    fn view_ids_are_unique() {
        let sequencer = FetchSequencer::new();

        let first = sequencer.new_view_id();
        let second = sequencer.new_view_id();

        assert_ne!(first, second);
    }

    #[test]
    fn latest_fetch_wins() {
        let sequencer = FetchSequencer::new();

        let first = sequencer.issue("user/1");
        assert!(sequencer.is_latest("user/1", first));

        let second = sequencer.issue("user/1");
        assert!(!sequencer.is_latest("user/1", first));
        assert!(sequencer.is_latest("user/1", second));
    }

    #[test]
    fn views_do_not_interfere() {
        let sequencer = FetchSequencer::new();

        let first_view = sequencer.issue("user/1");
        sequencer.issue("user/2");
        sequencer.issue("user/2");

        assert!(sequencer.is_latest("user/1", first_view));
    }

    #[test]
    fn clones_share_state() {
        let sequencer = FetchSequencer::new();
        let clone = sequencer.clone();

        let first = sequencer.issue("user/1");
        clone.issue("user/1");

        assert!(!sequencer.is_latest("user/1", first));
    }

    #[test]
    fn unknown_key_is_latest() {
        let sequencer = FetchSequencer::new();

        assert!(sequencer.is_latest("nobody/1", 7));
    }

    #[test]
    fn tracked_views_are_bounded() {
        let sequencer = FetchSequencer::new();

        for view in 0..(MAX_TRACKED_VIEWS + 10) {
            sequencer.new_view_id();
            sequencer.issue(&format!("user/{view}"));
        }

        assert!(sequencer.lock().len() <= MAX_TRACKED_VIEWS);
    }

    #[test]
    fn busy_view_outlives_idle_views() {
        let sequencer = FetchSequencer::new();

        sequencer.issue("user/busy");
        for view in 0..(MAX_TRACKED_VIEWS - 1) {
            sequencer.issue(&format!("user/{view}"));
        }
        let busy = sequencer.issue("user/busy");

        sequencer.issue("user/late");

        let latest = sequencer.lock();
        assert!(latest.contains_key("user/busy"));
        assert!(!latest.contains_key("user/0"));
        drop(latest);
        assert!(sequencer.is_latest("user/busy", busy));
    }
}
