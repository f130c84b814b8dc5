//! In-memory fingerprint store keyed by source identity

use crate::fingerprint::Fingerprint;
use crate::matching::{MatchReport, Matcher};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fingerprint and duration of one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceEntry {
    pub fingerprint: Fingerprint,
    pub duration_secs: f64,
}

/// Fingerprints built during one run. Each source is stored once and read
/// for every pair it takes part in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FingerprintStore {
    entries: BTreeMap<String, SourceEntry>,
}

impl FingerprintStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a source, replacing any previous entry under the same key
    pub fn insert(&mut self, key: impl Into<String>, fingerprint: Fingerprint, duration_secs: f64) {
        self.entries.insert(
            key.into(),
            SourceEntry {
                fingerprint,
                duration_secs,
            },
        );
    }

    pub fn get(&self, key: &str) -> Option<&SourceEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Compare two stored sources. `None` when either is missing.
    pub fn compare(&self, key_a: &str, key_b: &str, matcher: &Matcher) -> Option<MatchReport> {
        let (Some(a), Some(b)) = (self.get(key_a), self.get(key_b)) else {
            log::warn!("Skipping pair {} / {}: source not fingerprinted", key_a, key_b);
            return None;
        };
        Some(matcher.compare(&a.fingerprint, a.duration_secs, &b.fingerprint, b.duration_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::MatchOutcome;

    fn tokens(values: &[&str]) -> Fingerprint {
        values.iter().copied().collect()
    }

    #[test]
    fn test_insert_and_get() {
        let mut store = FingerprintStore::new();
        assert!(store.is_empty());

        store.insert("/a.wav", tokens(&["1", "2"]), 1.5);
        store.insert("/b.wav", tokens(&["3"]), 2.0);
        store.insert("/a.wav", tokens(&["9"]), 3.0);

        assert_eq!(store.len(), 2);
        assert!(store.contains("/b.wav"));
        assert_eq!(store.get("/a.wav").unwrap().fingerprint, tokens(&["9"]));
        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["/a.wav", "/b.wav"]);
    }

    #[test]
    fn test_compare_missing_source() {
        let mut store = FingerprintStore::new();
        store.insert("/a.wav", tokens(&["1"]), 1.0);
        assert!(store.compare("/a.wav", "/nope.wav", &Matcher::default()).is_none());
    }

    #[test]
    fn test_compare_uses_stored_durations() {
        let mut store = FingerprintStore::new();
        store.insert("/a.wav", tokens(&["1"]), 1.0);
        store.insert("/b.wav", tokens(&["1"]), 1.0);
        store.insert("/c.wav", tokens(&["1"]), 2.0);

        let matcher = Matcher::default();
        assert!(store.compare("/a.wav", "/b.wav", &matcher).unwrap().is_match());
        assert_eq!(
            store.compare("/a.wav", "/c.wav", &matcher).unwrap().outcome,
            MatchOutcome::DurationMismatch
        );
    }

    #[test]
    fn test_store_serializes() {
        let mut store = FingerprintStore::new();
        store.insert("x", tokens(&["-7"]), 0.5);
        let json = serde_json::to_string(&store).unwrap();
        assert_eq!(
            json,
            r#"{"entries":{"x":{"fingerprint":["-7"],"duration_secs":0.5}}}"#
        );
    }
}
