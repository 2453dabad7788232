/// Persistent bookmark store.
///
/// Every mutation reads the whole collection, changes it in memory and
/// writes the whole collection back. Nothing serializes overlapping calls,
/// so two writes racing on the same slot resolve last-write-wins.

use serde_json::Value;
use uuid::Uuid;

use crate::bookmark::BookmarkRecord;
use crate::config::STORAGE_KEY;
use crate::error::BookmarkError;
use crate::storage::{Collection, StorageBackend};

pub struct Store<B> {
    backend: B,
    key: String,
}

impl<B: StorageBackend> Store<B> {
    pub fn new(backend: B) -> Self {
        Self::with_key(backend, STORAGE_KEY)
    }

    pub fn with_key(backend: B, key: &str) -> Self {
        Store {
            backend,
            key: key.to_string(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Seed the slot with an empty collection if it has never been written
    pub async fn init(&self) -> Result<(), BookmarkError> {
        if self.backend.get(&self.key).await?.is_none() {
            log::info!("Initializing empty '{}' slot", self.key);
            self.save(&Collection::new()).await?;
        }
        Ok(())
    }

    /// Ids stay unique: a record whose id is already taken is stored under a fresh one
    pub async fn create(&self, mut record: BookmarkRecord) -> Result<BookmarkRecord, BookmarkError> {
        if record.url.is_empty() {
            return Err(BookmarkError::InvalidUrl);
        }

        let mut collection = self.load().await?;
        if collection.contains_url(&record.url) {
            log::debug!("Rejecting duplicate url {}", record.url);
            return Err(BookmarkError::DuplicateUrl(record.url));
        }
        if collection.get(&record.id).is_some() {
            let fresh_id = Uuid::new_v4().to_string();
            log::debug!("Id {} already in use, saving {} as {}", record.id, record.url, fresh_id);
            record.id = fresh_id;
        }

        collection.prepend(record.clone());
        self.save(&collection).await?;

        log::info!("Saved {} ({} items)", record.url, collection.len());
        Ok(record)
    }

    pub async fn list_all(&self) -> Result<Vec<BookmarkRecord>, BookmarkError> {
        Ok(self.load().await?.into_items())
    }

    /// Remove the record with `id`, returning that id
    pub async fn delete_by_id(&self, id: &str) -> Result<String, BookmarkError> {
        let mut collection = self.load().await?;
        if !collection.remove(id) {
            log::debug!("No item with id {}", id);
            return Err(BookmarkError::NotFound(id.to_string()));
        }

        self.save(&collection).await?;

        log::info!("Deleted {} ({} items left)", id, collection.len());
        Ok(id.to_string())
    }

    async fn load(&self) -> Result<Collection, BookmarkError> {
        match self.backend.get(&self.key).await? {
            None | Some(Value::Null) => Ok(Collection::new()),
            Some(value) => Ok(serde_json::from_value(value)?),
        }
    }

    async fn save(&self, collection: &Collection) -> Result<(), BookmarkError> {
        let value = serde_json::to_value(collection)?;
        self.backend.set(&self.key, value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use serde_json::json;

    fn record(id: &str, url: &str) -> BookmarkRecord {
        BookmarkRecord {
            id: id.to_string(),
            url: url.to_string(),
            title: url.trim_start_matches("http://").to_string(),
            tags: vec![],
            date_added: "2024-01-01T00:00:00.000Z".to_string(),
        }
    }

    struct FailingStorage;

    impl StorageBackend for FailingStorage {
        async fn get(&self, _key: &str) -> Result<Option<Value>, BookmarkError> {
            Err(BookmarkError::storage("IO error: disk unavailable"))
        }

        async fn set(&self, _key: &str, _value: Value) -> Result<(), BookmarkError> {
            Err(BookmarkError::storage("IO error: disk unavailable"))
        }
    }

    #[tokio::test]
    async fn test_init_seeds_empty_slot() {
        let store = Store::new(MemoryStorage::new());

        store.init().await.unwrap();

        assert_eq!(store.backend().snapshot("savedItems"), Some(json!([])));
    }

    #[tokio::test]
    async fn test_init_keeps_existing_items() {
        let store = Store::new(MemoryStorage::new());
        store.create(record("1", "http://a.com")).await.unwrap();

        store.init().await.unwrap();

        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_all_on_absent_slot_is_empty() {
        let store = Store::new(MemoryStorage::new());
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_prepends() {
        let store = Store::new(MemoryStorage::new());
        let a = record("1", "http://a.com");
        let b = record("2", "http://b.com");

        assert_eq!(store.create(a.clone()).await.unwrap(), a);
        store.create(b.clone()).await.unwrap();

        assert_eq!(store.list_all().await.unwrap(), vec![b, a]);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_url() {
        let store = Store::new(MemoryStorage::new());
        store.create(record("1", "http://a.com")).await.unwrap();

        let err = store.create(record("2", "http://a.com")).await.unwrap_err();

        assert_eq!(err, BookmarkError::DuplicateUrl("http://a.com".to_string()));
        assert_eq!(err.to_string(), "This page is already saved.");
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_reassigns_taken_id() {
        let store = Store::new(MemoryStorage::new());
        store.create(record("same", "http://a.com")).await.unwrap();

        let second = store.create(record("same", "http://b.com")).await.unwrap();
        let third = store.create(record("same", "http://c.com")).await.unwrap();

        assert_ne!(second.id, "same");
        assert_ne!(third.id, "same");
        assert_ne!(second.id, third.id);

        let items = store.list_all().await.unwrap();
        assert_eq!(items[0], third);
        assert_eq!(items[1], second);

        store.delete_by_id("same").await.unwrap();

        let urls: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|item| item.url)
            .collect();
        assert_eq!(urls, vec!["http://c.com", "http://b.com"]);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_url() {
        let store = Store::new(MemoryStorage::new());

        let err = store.create(record("1", "")).await.unwrap_err();

        assert_eq!(err, BookmarkError::InvalidUrl);
        assert_eq!(store.backend().snapshot("savedItems"), None);
    }

    #[tokio::test]
    async fn test_delete_by_id() {
        let store = Store::new(MemoryStorage::new());
        store.create(record("1", "http://a.com")).await.unwrap();
        store.create(record("2", "http://b.com")).await.unwrap();

        assert_eq!(store.delete_by_id("1").await.unwrap(), "1");

        let items = store.list_all().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "2");
    }

    #[tokio::test]
    async fn test_delete_unknown_id() {
        let store = Store::new(MemoryStorage::new());
        store.create(record("1", "http://a.com")).await.unwrap();
        let before = store.list_all().await.unwrap();

        let err = store.delete_by_id("missing").await.unwrap_err();

        assert_eq!(err, BookmarkError::NotFound("missing".to_string()));
        assert_eq!(store.list_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_create_then_delete_restores_collection() {
        let store = Store::new(MemoryStorage::new());
        store.create(record("1", "http://a.com")).await.unwrap();
        store.create(record("2", "http://b.com")).await.unwrap();
        let before = store.list_all().await.unwrap();

        store.create(record("3", "http://c.com")).await.unwrap();
        assert_eq!(store.list_all().await.unwrap()[0].id, "3");
        store.delete_by_id("3").await.unwrap();

        assert_eq!(store.list_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_corrupt_slot_is_storage_error() {
        let storage = MemoryStorage::new();
        storage.set("savedItems", json!({"not": "a list"})).await.unwrap();
        let store = Store::new(storage);

        let err = store.list_all().await.unwrap_err();

        assert!(matches!(err, BookmarkError::Storage(_)));
    }

    #[tokio::test]
    async fn test_backend_failure_surfaces_verbatim() {
        let store = Store::new(FailingStorage);

        let err = store.list_all().await.unwrap_err();
        assert_eq!(err.to_string(), "IO error: disk unavailable");

        let err = store.create(record("1", "http://a.com")).await.unwrap_err();
        assert_eq!(err.to_string(), "IO error: disk unavailable");
    }

    #[tokio::test]
    async fn test_custom_key() {
        let store = Store::with_key(MemoryStorage::new(), "otherItems");
        store.create(record("1", "http://a.com")).await.unwrap();

        assert!(store.backend().snapshot("otherItems").is_some());
        assert!(store.backend().snapshot("savedItems").is_none());
    }
}
