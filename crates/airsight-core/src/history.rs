//! Bounded most-recently-used list of searched locations.
//!
//! The list is de-duplicated by case-insensitive name, newest first, and
//! persisted as JSON under [`HISTORY_KEY`]. Persistence is best-effort: read
//! failures and malformed payloads load as an empty list, and write failures
//! are logged without affecting the returned list.

use std::sync::Arc;

use tracing::{debug, warn};

use airsight_types::HistoryEntry;

use crate::traits::KeyValueStore;

/// Storage key for the persisted history list.
pub const HISTORY_KEY: &str = "airsight.search_history";

/// Maximum number of remembered locations.
pub const HISTORY_CAP: usize = 6;

/// Insert `entry` at the front of `current`, removing any entry with the same
/// name (ignoring case) and truncating to `cap`.
pub fn push_front(entry: HistoryEntry, current: &[HistoryEntry], cap: usize) -> Vec<HistoryEntry> {
    let mut updated = Vec::with_capacity(cap);
    let rest: Vec<HistoryEntry> = current
        .iter()
        .filter(|e| !e.same_name(&entry.name))
        .cloned()
        .collect();
    updated.push(entry);
    updated.extend(rest);
    updated.truncate(cap);
    updated
}

/// Persisted recent-location list.
#[derive(Clone)]
pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
    cap: usize,
}

impl std::fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore").field("cap", &self.cap).finish()
    }
}

impl HistoryStore {
    /// Create a history store with the default cap.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_cap(store, HISTORY_CAP)
    }

    /// Create a history store with a custom cap (at least 1).
    pub fn with_cap(store: Arc<dyn KeyValueStore>, cap: usize) -> Self {
        Self {
            store,
            cap: cap.max(1),
        }
    }

    /// Maximum number of entries kept.
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Load the persisted list. Absent, unreadable or malformed data yields
    /// an empty list.
    pub async fn load(&self) -> Vec<HistoryEntry> {
        let raw = match self.store.get(HISTORY_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read search history");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
            Ok(mut entries) => {
                entries.truncate(self.cap);
                debug!(count = entries.len(), "Loaded search history");
                entries
            }
            Err(e) => {
                warn!(error = %e, "Ignoring malformed search history");
                Vec::new()
            }
        }
    }

    /// Record `entry` as most recent and persist the result.
    ///
    /// The returned list is authoritative even when persisting fails.
    pub async fn record(&self, entry: HistoryEntry, current: &[HistoryEntry]) -> Vec<HistoryEntry> {
        let updated = push_front(entry, current, self.cap);

        let result = match serde_json::to_string(&updated) {
            Ok(json) => self.store.set(HISTORY_KEY, &json).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            warn!(error = %e, "Failed to persist search history");
        }

        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MemoryStore;
    use airsight_types::Coordinate;

    fn entry(name: &str, lat: f64) -> HistoryEntry {
        HistoryEntry::new(name, Coordinate::new(lat, 0.0).unwrap())
    }

    #[test]
    fn test_push_front_prepends() {
        let list = push_front(entry("A", 1.0), &[entry("B", 2.0)], 6);
        let names: Vec<_> = list.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn test_push_front_replaces_case_insensitive() {
        let list = push_front(entry("paris", 2.0), &[entry("Paris", 1.0), entry("Rome", 3.0)], 6);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, "paris");
        assert_eq!(list[0].coordinate.latitude, 2.0);
        assert_eq!(list[1].name, "Rome");
    }

    #[test]
    fn test_push_front_moves_existing_to_front() {
        let current = [entry("A", 1.0), entry("B", 2.0), entry("C", 3.0)];
        let list = push_front(entry("C", 3.0), &current, 6);
        let names: Vec<_> = list.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["C", "A", "B"]);
    }

    #[test]
    fn test_push_front_truncates() {
        let mut list = Vec::new();
        for i in 0..8 {
            list = push_front(entry(&format!("City {i}"), i as f64), &list, HISTORY_CAP);
        }
        assert_eq!(list.len(), 6);
        assert_eq!(list[0].name, "City 7");
        assert_eq!(list[5].name, "City 2");
    }

    #[tokio::test]
    async fn test_load_absent_is_empty() {
        let history = HistoryStore::new(Arc::new(MemoryStore::new()));
        assert!(history.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_load_malformed_is_empty() {
        let store = Arc::new(MemoryStore::new());
        store.insert(HISTORY_KEY, "{not json");
        let history = HistoryStore::new(store);
        assert!(history.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_load_read_failure_is_empty() {
        let store = Arc::new(MemoryStore::new());
        store.insert(HISTORY_KEY, "[]");
        store.set_should_fail(true);
        let history = HistoryStore::new(store);
        assert!(history.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_record_persists_and_reloads() {
        let store = Arc::new(MemoryStore::new());
        let history = HistoryStore::new(store.clone());

        let list = history.record(entry("Paris", 1.0), &[]).await;
        let list = history.record(entry("paris", 2.0), &list).await;
        assert_eq!(list.len(), 1);

        let reloaded = HistoryStore::new(store).load().await;
        assert_eq!(reloaded, list);
        assert_eq!(reloaded[0].coordinate.latitude, 2.0);
    }

    #[tokio::test]
    async fn test_record_write_failure_still_returns_list() {
        let store = Arc::new(MemoryStore::new());
        store.set_should_fail(true);
        let history = HistoryStore::new(store.clone());

        let list = history.record(entry("Oslo", 59.9), &[]).await;
        assert_eq!(list.len(), 1);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_record_eight_keeps_six() {
        let history = HistoryStore::new(Arc::new(MemoryStore::new()));
        let mut list = Vec::new();
        for i in 0..8 {
            list = history.record(entry(&format!("City {i}"), i as f64), &list).await;
        }
        let names: Vec<_> = list.iter().map(|e| e.name.clone()).collect();
        assert_eq!(
            names,
            ["City 7", "City 6", "City 5", "City 4", "City 3", "City 2"]
        );
    }
}
