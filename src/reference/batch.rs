//! Coalescing id → reference resolver
//!
//! Views that render many foreign keys ask for labels one id at a time.
//! [`BatchedReferenceFetcher`] collects those ids and resolves them with a
//! few `in`-filtered list calls instead of one request per id.

use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

use super::item::{ReferenceItem, ReferenceMap};
use super::report::ErrorReporter;
use super::resource::{ReferenceResource, to_reference_items};
use crate::client::{ConsoleApi, ListQuery, fetch_chunks};
use crate::config::ReferenceSettings;

/// Flush thresholds of the batched fetcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSettings {
    /// Pending ids that trigger an immediate flush
    pub threshold: usize,
    /// Idle time before pending ids are flushed
    pub debounce: Duration,
    /// Max ids per list request
    pub chunk_size: usize,
    /// Max chunk requests in flight
    pub max_concurrent: usize,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            threshold: 10,
            debounce: Duration::from_millis(300),
            chunk_size: 30,
            max_concurrent: 8,
        }
    }
}

impl From<&ReferenceSettings> for BatchSettings {
    fn from(settings: &ReferenceSettings) -> Self {
        Self {
            threshold: settings.batch_size.max(1),
            debounce: settings.debounce(),
            chunk_size: settings.chunk_size.max(1),
            max_concurrent: settings.max_concurrent.max(1),
        }
    }
}

#[derive(Default)]
struct BatchQueue {
    pending: HashSet<String>,
    timer: Option<JoinHandle<()>>,
}

struct BatchInner<R> {
    api: Arc<dyn ConsoleApi>,
    reporter: Arc<dyn ErrorReporter>,
    settings: BatchSettings,
    queue: Mutex<BatchQueue>,
    resolved: RwLock<Arc<ReferenceMap>>,
    _resource: PhantomData<fn() -> R>,
}

/// Batched resolver for resource type `R`. Cheap to clone; clones share
/// the same queue and cache.
pub struct BatchedReferenceFetcher<R: ReferenceResource> {
    inner: Arc<BatchInner<R>>,
}

impl<R: ReferenceResource> Clone for BatchedReferenceFetcher<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: ReferenceResource> BatchedReferenceFetcher<R> {
    pub fn new(
        api: Arc<dyn ConsoleApi>,
        reporter: Arc<dyn ErrorReporter>,
        settings: BatchSettings,
    ) -> Self {
        Self {
            inner: Arc::new(BatchInner {
                api,
                reporter,
                settings,
                queue: Mutex::new(BatchQueue::default()),
                resolved: RwLock::new(Arc::new(ReferenceMap::new())),
                _resource: PhantomData,
            }),
        }
    }

    pub fn settings(&self) -> BatchSettings {
        self.inner.settings
    }

    /// Queue one id for resolution
    pub async fn enqueue(&self, id: impl Into<String>) {
        self.enqueue_many([id.into()]).await
    }

    /// Queue several ids. The threshold is checked once, after all of them
    /// are added, so a large batch becomes a single flush.
    pub async fn enqueue_many<I, S>(&self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let flush_now = {
            let mut queue = self.inner.queue.lock().await;
            queue.pending.extend(ids.into_iter().map(Into::into));
            if queue.pending.is_empty() {
                return;
            }

            if let Some(timer) = queue.timer.take() {
                timer.abort();
            }

            if queue.pending.len() >= self.inner.settings.threshold {
                true
            } else {
                queue.timer = Some(self.spawn_timer());
                false
            }
        };

        if flush_now {
            self.flush().await;
        }
    }

    /// Resolve everything pending now
    pub async fn flush(&self) {
        let ids = {
            let mut queue = self.inner.queue.lock().await;
            if let Some(timer) = queue.timer.take() {
                timer.abort();
            }
            std::mem::take(&mut queue.pending)
        };
        self.resolve(ids).await;
    }

    /// Resolved item for `id`, if any
    pub async fn get(&self, id: &str) -> Option<ReferenceItem> {
        self.inner.resolved.read().await.get(id).cloned()
    }

    pub async fn snapshot(&self) -> Arc<ReferenceMap> {
        self.inner.resolved.read().await.clone()
    }

    /// Pre-populate the cache, e.g. from an already loaded store.
    /// Existing entries win.
    pub async fn seed(&self, items: &ReferenceMap) {
        let mut resolved = self.inner.resolved.write().await;
        let map = Arc::make_mut(&mut resolved);
        for (key, item) in items {
            map.entry(key.clone()).or_insert_with(|| item.clone());
        }
    }

    pub async fn pending_len(&self) -> usize {
        self.inner.queue.lock().await.pending.len()
    }

    fn spawn_timer(&self) -> JoinHandle<()> {
        let fetcher = self.clone();
        let debounce = self.inner.settings.debounce;
        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            fetcher.flush_from_timer().await;
        })
    }

    /// Timer expiry. Releases its own handle rather than aborting it.
    async fn flush_from_timer(&self) {
        let ids = {
            let mut queue = self.inner.queue.lock().await;
            queue.timer = None;
            std::mem::take(&mut queue.pending)
        };
        debug!("{} debounce expired", R::KIND);
        self.resolve(ids).await;
    }

    async fn resolve(&self, ids: HashSet<String>) {
        let cached = self.snapshot().await;
        let mut ids: Vec<String> = ids
            .into_iter()
            .filter(|id| !cached.contains_key(id))
            .collect();

        if ids.is_empty() {
            debug!("{} batch flush: nothing to resolve", R::KIND);
            return;
        }
        ids.sort();

        let settings = self.inner.settings;
        let endpoint = R::KIND.endpoint();
        let id_field = R::KIND.id_field();
        let only = R::KIND.only_fields();

        let chunks: Vec<Vec<String>> = ids
            .chunks(settings.chunk_size)
            .map(<[String]>::to_vec)
            .collect();
        debug!(
            "{} batch flush: {} ids in {} chunks",
            R::KIND,
            ids.len(),
            chunks.len()
        );

        let api = Arc::clone(&self.inner.api);
        let outcomes = fetch_chunks(
            chunks,
            move |chunk: Vec<String>| {
                let api = Arc::clone(&api);
                async move {
                    let query = ListQuery::new()
                        .only(only.iter().copied())
                        .filter_in(id_field, chunk);
                    let response = api.list(endpoint, &query).await?;
                    Ok(to_reference_items::<R>(response.results))
                }
            },
            settings.max_concurrent,
        )
        .await;

        let mut resolved = self.inner.resolved.write().await;
        let map = Arc::make_mut(&mut resolved);
        for (index, outcome) in outcomes {
            match outcome {
                Ok(items) => {
                    for item in items {
                        map.entry(item.key.clone()).or_insert(item);
                    }
                }
                Err(e) => self
                    .inner
                    .reporter
                    .report(&format!("resolve {} chunk {}", endpoint, index), &e),
            }
        }
    }
}
