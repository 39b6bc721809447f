// 🗄️ Receipt Store - identifier → score
//
// Append-only: a score is written once under a fresh UUID and never
// updated or removed. Lives as long as the process that created it.

use crate::error::{ReceiptError, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

// ============================================================================
// SCORE RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRecord {
    /// Opaque identifier handed back to the caller
    pub id: String,

    pub points: i64,

    /// System time: when the score was stored
    pub recorded_at: DateTime<Utc>,
}

// ============================================================================
// RECEIPT STORE
// ============================================================================

/// In-memory store of computed scores
///
/// Cloning is cheap and every clone shares the same map.
#[derive(Debug, Clone, Default)]
pub struct ReceiptStore {
    records: Arc<RwLock<HashMap<String, ScoreRecord>>>,
}

impl ReceiptStore {
    pub fn new() -> Self {
        ReceiptStore::default()
    }

    /// Store a score under a freshly generated identifier and return it
    pub fn submit(&self, points: i64) -> String {
        let record = ScoreRecord {
            id: uuid::Uuid::new_v4().to_string(),
            points,
            recorded_at: Utc::now(),
        };
        let id = record.id.clone();

        // Inserts are the only writes, so a poisoned map is still consistent.
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let previous = records.insert(id.clone(), record);
        debug_assert!(previous.is_none(), "uuid collision on {}", id);

        id
    }

    /// Score previously stored under `id`
    pub fn lookup(&self, id: &str) -> Result<i64> {
        self.get(id)
            .map(|record| record.points)
            .ok_or_else(|| ReceiptError::not_found(id))
    }

    /// Full record for `id`, if one was ever issued
    pub fn get(&self, id: &str) -> Option<ScoreRecord> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        records.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn test_submit_then_lookup() {
        let store = ReceiptStore::new();

        for points in [0, 18, 109, -3, i64::MAX] {
            let id = store.submit(points);
            assert_eq!(store.lookup(&id).unwrap(), points);
        }
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let store = ReceiptStore::new();
        store.submit(42);

        let err = store.lookup("7fb1377b-b223-49d9-a31a-5a02701dd310").unwrap_err();
        assert_eq!(err, ReceiptError::not_found("7fb1377b-b223-49d9-a31a-5a02701dd310"));
        assert!(store.get("").is_none());
    }

    #[test]
    fn test_equal_scores_get_distinct_ids() {
        let store = ReceiptStore::new();

        let first = store.submit(28);
        let second = store.submit(28);

        assert_ne!(first, second);
        assert_eq!(store.lookup(&first).unwrap(), 28);
        assert_eq!(store.lookup(&second).unwrap(), 28);
    }

    #[test]
    fn test_ids_are_uuids() {
        let store = ReceiptStore::new();
        let id = store.submit(1);

        assert!(uuid::Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_record_keeps_metadata() {
        let store = ReceiptStore::new();
        let before = Utc::now();
        let id = store.submit(7);

        let record = store.get(&id).unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.points, 7);
        assert!(record.recorded_at >= before);
    }

    #[test]
    fn test_clones_share_storage() {
        let store = ReceiptStore::new();
        let handle = store.clone();

        let id = handle.submit(5);
        assert_eq!(store.lookup(&id).unwrap(), 5);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_concurrent_submits() {
        let store = ReceiptStore::new();

        let workers: Vec<_> = (0..8)
            .map(|worker| {
                let store = store.clone();
                thread::spawn(move || {
                    (0..100)
                        .map(|n| {
                            let points = worker * 1000 + n;
                            (store.submit(points), points)
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids = HashSet::new();
        for worker in workers {
            for (id, points) in worker.join().unwrap() {
                assert_eq!(store.lookup(&id).unwrap(), points);
                ids.insert(id);
            }
        }

        assert_eq!(ids.len(), 800);
        assert_eq!(store.len(), 800);
    }
}
