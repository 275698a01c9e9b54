//! # JsonCollection
//!
//! An in-memory snapshot of one JSON array document.
//!
//! Lifecycle: `open` starts a background load immediately (Loading); the
//! first load publishes a snapshot into the cache cell (Ready) and is never
//! repeated. Every query awaits readiness, then reads the current snapshot
//! without locking.
//!
//! Writes are serialised by a per-collection mutex. Each write computes a new
//! list, publishes it, then rewrites the whole document. A failed or
//! interrupted persist leaves memory ahead of disk until the next start;
//! there is no write-ahead log and no atomic rename.

use std::sync::Arc;

use ps_core::error::{AppError, Result};
use ps_core::traits::DocumentStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info, warn};

/// A record stored in a [`JsonCollection`], identified by a string id.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Human readable kind used in errors and logs.
    const KIND: &'static str;

    fn record_id(&self) -> &str;
}

/// `None` until the first load completes.
type CacheCell<T> = watch::Sender<Option<Arc<Vec<T>>>>;

pub struct JsonCollection<T: Record> {
    document: String,
    store: Arc<dyn DocumentStore>,
    cell: CacheCell<T>,
    writer: Mutex<()>,
}

impl<T: Record> JsonCollection<T> {
    /// Creates the collection and spawns its initial load on the current
    /// tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn open(store: Arc<dyn DocumentStore>, document: impl Into<String>) -> Arc<Self> {
        let (cell, _) = watch::channel(None);
        let collection = Arc::new(Self {
            document: document.into(),
            store,
            cell,
            writer: Mutex::new(()),
        });

        let loader = Arc::clone(&collection);
        tokio::spawn(async move { loader.load().await });

        collection
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn is_ready(&self) -> bool {
        self.cell.borrow().is_some()
    }

    /// Resolves once the initial load has published a snapshot.
    pub async fn wait_until_ready(&self) {
        self.snapshot().await;
    }

    /// A missing or unreadable document and a malformed one both load as an
    /// empty collection.
    async fn load(&self) {
        debug!(document = %self.document, kind = T::KIND, "loading collection");

        let records = match self.store.load_text(&self.document).await {
            Some(text) => match serde_json::from_str::<Vec<T>>(&text) {
                Ok(records) => records,
                Err(e) => {
                    warn!(document = %self.document, error = %e, "malformed document, starting empty");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        debug!(document = %self.document, count = records.len(), "collection ready");
        self.cell.send_replace(Some(Arc::new(records)));
    }

    /// The current snapshot, after the first load.
    pub async fn snapshot(&self) -> Arc<Vec<T>> {
        let mut ready = self.cell.subscribe();
        let snapshot = match ready.wait_for(Option::is_some).await {
            Ok(current) => current.as_ref().map(Arc::clone).unwrap_or_default(),
            // The sender lives in `self`, so the channel cannot close under us.
            Err(_) => Arc::default(),
        };
        snapshot
    }

    pub async fn all(&self) -> Vec<T> {
        (*self.snapshot().await).clone()
    }

    pub async fn find_by_id(&self, id: &str) -> Option<T> {
        self.find(|record| record.record_id() == id).await
    }

    pub async fn find<P>(&self, predicate: P) -> Option<T>
    where
        P: Fn(&T) -> bool,
    {
        self.snapshot().await.iter().find(|r| predicate(*r)).cloned()
    }

    pub async fn filter<P>(&self, predicate: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        self.snapshot()
            .await
            .iter()
            .filter(|r| predicate(*r))
            .cloned()
            .collect()
    }

    /// Appends a record. A duplicate id is rejected, never overwritten.
    pub async fn insert(&self, record: T) -> Result<()> {
        let id = record.record_id().to_string();
        self.mutate("insert", &id, move |current| {
            if current.iter().any(|r| r.record_id() == record.record_id()) {
                return Err(AppError::Conflict(format!(
                    "{} {} already exists",
                    T::KIND,
                    record.record_id()
                )));
            }
            let mut next = current.to_vec();
            next.push(record);
            Ok(next)
        })
        .await
    }

    /// Replaces the record with the same id, keeping its position.
    pub async fn replace(&self, record: T) -> Result<()> {
        let id = record.record_id().to_string();
        self.mutate("replace", &id, move |current| {
            let position = current
                .iter()
                .position(|r| r.record_id() == record.record_id())
                .ok_or_else(|| not_found::<T>(record.record_id()))?;
            let mut next = current.to_vec();
            next[position] = record;
            Ok(next)
        })
        .await
    }

    pub async fn remove(&self, id: &str) -> Result<()> {
        self.mutate("remove", id, |current| {
            if !current.iter().any(|r| r.record_id() == id) {
                return Err(not_found::<T>(id));
            }
            Ok(current.iter().filter(|r| r.record_id() != id).cloned().collect())
        })
        .await
    }

    /// Compute, publish, persist. Only one mutation runs at a time.
    async fn mutate<F>(&self, action: &str, id: &str, change: F) -> Result<()>
    where
        F: FnOnce(&[T]) -> Result<Vec<T>> + Send,
    {
        let _writer = self.writer.lock().await;

        let current = self.snapshot().await;
        let next = Arc::new(change(current.as_slice())?);
        self.cell.send_replace(Some(Arc::clone(&next)));

        self.persist(&next).await?;
        info!(document = %self.document, action, id, count = next.len(), "collection updated");
        Ok(())
    }

    async fn persist(&self, records: &[T]) -> Result<()> {
        let json = serde_json::to_string_pretty(records)?;
        if self.store.save_text(&self.document, &json).await {
            Ok(())
        } else {
            error!(document = %self.document, "failed to persist collection");
            Err(AppError::Storage(format!("failed to write {}", self.document)))
        }
    }
}

fn not_found<T: Record>(id: &str) -> AppError {
    AppError::NotFound(T::KIND.to_string(), id.to_string())
}
