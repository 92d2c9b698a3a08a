use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::ResponseRecord;

/// Read-only view onto the model layer that persists executed responses.
/// A missing record is a normal outcome, not an error.
#[async_trait]
pub trait ResponseStore: Send + Sync {
    async fn get_by_id(&self, id: &str) -> Option<ResponseRecord>;

    /// The most recently created response for a request, if any.
    async fn get_latest_by_parent_id(&self, parent_id: &str) -> Option<ResponseRecord>;

    /// Every response for a request, newest first. Backs history cycling.
    async fn get_all_by_parent_id(&self, parent_id: &str) -> Vec<ResponseRecord>;
}

/// In-memory store implementation. The real persistence engine lives outside
/// this crate; this stands in for it at the same interface.
#[derive(Default)]
pub struct InMemoryResponseStore {
    records: RwLock<Vec<ResponseRecord>>,
}

impl InMemoryResponseStore {
    pub fn new() -> Arc<InMemoryResponseStore> {
        Arc::new(InMemoryResponseStore::default())
    }

    pub async fn insert(&self, record: ResponseRecord) {
        self.records.write().await.push(record);
    }
}

#[async_trait]
impl ResponseStore for InMemoryResponseStore {
    async fn get_by_id(&self, id: &str) -> Option<ResponseRecord> {
        self.records
            .read()
            .await
            .iter()
            .find(|record| record.id == id)
            .cloned()
    }

    async fn get_latest_by_parent_id(&self, parent_id: &str) -> Option<ResponseRecord> {
        self.records
            .read()
            .await
            .iter()
            .filter(|record| record.parent_id == parent_id)
            .max_by_key(|record| record.created_at)
            .cloned()
    }

    async fn get_all_by_parent_id(&self, parent_id: &str) -> Vec<ResponseRecord> {
        let mut history: Vec<ResponseRecord> = self
            .records
            .read()
            .await
            .iter()
            .filter(|record| record.parent_id == parent_id)
            .cloned()
            .collect();

        history.sort_by_key(|record| std::cmp::Reverse(record.created_at));
        history
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn record(id: &str, parent_id: &str, created_at: i64) -> ResponseRecord {
        ResponseRecord {
            id: id.to_string(),
            parent_id: parent_id.to_string(),
            created_at,
            ..ResponseRecord::default()
        }
    }

    #[tokio::test]
    async fn latest_by_parent_picks_the_newest_record() {
        let store = InMemoryResponseStore::new();
        store.insert(record("a", "r1", 1)).await;
        store.insert(record("b", "r1", 2)).await;
        store.insert(record("c", "r2", 3)).await;

        let latest = store.get_latest_by_parent_id("r1").await.unwrap();

        assert_eq!(latest.id, "b");
    }

    #[tokio::test]
    async fn get_by_id_ignores_recency() {
        let store = InMemoryResponseStore::new();
        store.insert(record("a", "r1", 1)).await;
        store.insert(record("b", "r1", 2)).await;

        let found = store.get_by_id("a").await.unwrap();

        assert_eq!(found.created_at, 1);
    }

    #[tokio::test]
    async fn history_lists_all_responses_newest_first() {
        let store = InMemoryResponseStore::new();
        store.insert(record("a", "r1", 1)).await;
        store.insert(record("c", "r2", 3)).await;
        store.insert(record("b", "r1", 2)).await;

        let history = store.get_all_by_parent_id("r1").await;

        let ids: Vec<&str> = history.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn lookups_miss_without_error() {
        let store = InMemoryResponseStore::new();

        assert_eq!(store.get_by_id("nope").await, None);
        assert_eq!(store.get_latest_by_parent_id("nope").await, None);
        assert!(store.get_all_by_parent_id("nope").await.is_empty());
    }
}
