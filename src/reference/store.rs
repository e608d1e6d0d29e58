//! TTL-guarded reference store, one instance per resource type.
//!
//! A store holds the id → [`ReferenceItem`] map for a single
//! [`ReferenceResource`]. It is filled by [`ReferenceStore::load`], patched
//! by [`ReferenceStore::sync`] after a local mutation and cleared by
//! [`ReferenceStore::flush`] when the tenant context changes.
//!
//! Writers never mutate a published map: they install a new `Arc`, so a
//! snapshot handed to a caller stays valid while the store moves on.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

use super::grant::GrantContext;
use super::item::{ReferenceItem, ReferenceMap};
use super::report::ErrorReporter;
use super::resource::{ReferenceResource, ResourceKind, to_reference_items};
use crate::client::{ConsoleApi, ListQuery};
use crate::error::Result;

/// Collaborators shared by every store
#[derive(Clone)]
pub struct StoreContext {
    pub api: Arc<dyn ConsoleApi>,
    pub grant: Arc<GrantContext>,
    pub reporter: Arc<dyn ErrorReporter>,
}

impl StoreContext {
    pub fn new(
        api: Arc<dyn ConsoleApi>,
        grant: Arc<GrantContext>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            api,
            grant,
            reporter,
        }
    }
}

/// Flags for [`ReferenceStore::load`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Ignore the TTL and any loaded state
    pub force: bool,
    /// Keep whatever is loaded, however old, unless forced
    pub lazy_load: bool,
}

impl LoadOptions {
    pub fn forced() -> Self {
        Self {
            force: true,
            lazy_load: false,
        }
    }

    pub fn lazy() -> Self {
        Self {
            force: false,
            lazy_load: true,
        }
    }
}

/// Result of the non-blocking accessor
#[derive(Debug, Clone)]
pub enum Lookup {
    Ready(Arc<ReferenceMap>),
    /// Nothing loaded yet; a background load has been started
    Loading,
}

impl Lookup {
    pub fn ready(self) -> Option<Arc<ReferenceMap>> {
        match self {
            Lookup::Ready(items) => Some(items),
            Lookup::Loading => None,
        }
    }
}

#[derive(Debug, Default)]
struct StoreState {
    /// `None` until the first load
    items: Option<Arc<ReferenceMap>>,
    last_loaded: Option<Instant>,
    /// Bumped by every flush so in-flight loads can tell they are stale
    generation: u64,
}

/// Reference store for resource type `R`
pub struct ReferenceStore<R: ReferenceResource> {
    ctx: StoreContext,
    ttl: Duration,
    state: RwLock<StoreState>,
    /// Serializes loads so overlapping callers share one request
    load_lock: Mutex<()>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: ReferenceResource> ReferenceStore<R> {
    pub fn new(ctx: StoreContext, ttl: Duration) -> Self {
        Self {
            ctx,
            ttl,
            state: RwLock::new(StoreState::default()),
            load_lock: Mutex::new(()),
            _resource: PhantomData,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        R::KIND
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Load the store from the backend unless the current state satisfies
    /// `options`. Returns the resulting snapshot.
    ///
    /// Failures are reported and the previous items are kept.
    pub async fn load(&self, options: LoadOptions) -> Arc<ReferenceMap> {
        if let Some(items) = self.cached_for(options).await {
            debug!("{} load skipped (cached)", R::KIND);
            return items;
        }

        let _guard = self.load_lock.lock().await;

        // Another caller may have finished a load while we waited
        if let Some(items) = self.cached_for(options).await {
            debug!("{} load skipped (loaded by concurrent caller)", R::KIND);
            return items;
        }

        let scope = self.ctx.grant.scope().await;
        if !R::KIND.allows_scope(scope) {
            debug!("{} not available for {} scope", R::KIND, scope);
            let empty = Arc::new(ReferenceMap::new());
            self.state.write().await.items = Some(empty.clone());
            return empty;
        }

        let generation = self.state.read().await.generation;

        match self.fetch().await {
            Ok(items) => {
                let items = Arc::new(items);
                let mut state = self.state.write().await;
                if state.generation != generation {
                    debug!("{} flushed during load, discarding result", R::KIND);
                    return state.items.clone().unwrap_or_default();
                }
                debug!("{} loaded {} items", R::KIND, items.len());
                state.items = Some(items.clone());
                state.last_loaded = Some(Instant::now());
                items
            }
            Err(e) => {
                self.ctx
                    .reporter
                    .report(&format!("load {}", R::KIND.endpoint()), &e);
                self.snapshot().await
            }
        }
    }

    /// Loaded items, loading lazily on first use
    pub async fn items(&self) -> Arc<ReferenceMap> {
        self.load(LoadOptions::lazy()).await
    }

    /// Non-blocking accessor: the loaded map, or `Loading` after kicking
    /// off a lazy load in the background.
    pub async fn lookup(self: &Arc<Self>) -> Lookup {
        if let Some(items) = self.peek().await {
            return Lookup::Ready(items);
        }

        let store = Arc::clone(self);
        tokio::spawn(async move {
            store.load(LoadOptions::lazy()).await;
        });
        Lookup::Loading
    }

    /// Merge the reference item of a freshly created or updated resource.
    ///
    /// Only the entry for `resource` changes. A store that was never loaded
    /// is left untouched: its first load will pick the resource up.
    pub async fn sync(&self, resource: &R) {
        let item = resource.to_reference_item();
        let mut state = self.state.write().await;

        match state.items.as_mut() {
            Some(items) => {
                debug!("{} sync {}", R::KIND, item.key);
                Arc::make_mut(items).insert(item.key.clone(), item);
            }
            None => debug!("{} sync {} skipped, store not loaded", R::KIND, item.key),
        }
    }

    /// Drop the entry of a deleted resource
    pub async fn evict(&self, key: &str) -> Option<ReferenceItem> {
        let mut state = self.state.write().await;
        let items = state.items.as_mut()?;
        if !items.contains_key(key) {
            return None;
        }
        Arc::make_mut(items).remove(key)
    }

    /// Forget everything; the next load always hits the backend
    pub async fn flush(&self) {
        let mut state = self.state.write().await;
        state.items = None;
        state.last_loaded = None;
        state.generation += 1;
        debug!("{} flushed", R::KIND);
    }

    /// Current items without any I/O; `None` if never loaded
    pub async fn peek(&self) -> Option<Arc<ReferenceMap>> {
        self.state.read().await.items.clone()
    }

    /// Current items, empty if never loaded
    pub async fn snapshot(&self) -> Arc<ReferenceMap> {
        self.peek().await.unwrap_or_default()
    }

    pub async fn get(&self, key: &str) -> Option<ReferenceItem> {
        self.state
            .read()
            .await
            .items
            .as_ref()
            .and_then(|items| items.get(key).cloned())
    }

    pub async fn status(&self) -> StoreStatus {
        let state = self.state.read().await;
        StoreStatus {
            kind: R::KIND,
            loaded: state.items.is_some(),
            entries: state.items.as_ref().map_or(0, |items| items.len()),
            age: state.last_loaded.map(|at| at.elapsed()),
            ttl: self.ttl,
        }
    }

    /// The loaded items if `options` allow skipping the backend
    async fn cached_for(&self, options: LoadOptions) -> Option<Arc<ReferenceMap>> {
        if options.force {
            return None;
        }

        let state = self.state.read().await;
        let items = state.items.as_ref()?;

        if options.lazy_load {
            return Some(items.clone());
        }

        match state.last_loaded {
            Some(at) if at.elapsed() < self.ttl => Some(items.clone()),
            _ => None,
        }
    }

    async fn fetch(&self) -> Result<ReferenceMap> {
        let query = ListQuery::new().only(R::KIND.only_fields().iter().copied());
        let response = self.ctx.api.list(R::KIND.endpoint(), &query).await?;

        Ok(to_reference_items::<R>(response.results)
            .into_iter()
            .map(|item| (item.key.clone(), item))
            .collect())
    }
}

/// Point-in-time view of a store
#[derive(Debug, Clone)]
pub struct StoreStatus {
    pub kind: ResourceKind,
    pub loaded: bool,
    pub entries: usize,
    /// Time since the last successful load
    pub age: Option<Duration>,
    pub ttl: Duration,
}

impl StoreStatus {
    pub fn is_fresh(&self) -> bool {
        self.age.is_some_and(|age| age < self.ttl)
    }
}

/// Type-erased view of a store, for code that handles every kind alike
#[async_trait]
pub trait ReferenceCache: Send + Sync {
    fn resource_kind(&self) -> ResourceKind;

    async fn load_items(&self, options: LoadOptions) -> Arc<ReferenceMap>;

    async fn clear(&self);

    async fn store_status(&self) -> StoreStatus;
}

#[async_trait]
impl<R: ReferenceResource> ReferenceCache for ReferenceStore<R> {
    fn resource_kind(&self) -> ResourceKind {
        R::KIND
    }

    async fn load_items(&self, options: LoadOptions) -> Arc<ReferenceMap> {
        self.load(options).await
    }

    async fn clear(&self) {
        self.flush().await
    }

    async fn store_status(&self) -> StoreStatus {
        self.status().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockConsoleClient;
    use crate::client::models::{EscalationPolicy, Project};
    use crate::error::ApiError;
    use crate::reference::GrantScope;
    use crate::reference::report::RecordingReporter;
    use serde_json::json;

    const TTL: Duration = Duration::from_secs(3 * 60 * 60);

    struct Harness {
        mock: MockConsoleClient,
        reporter: Arc<RecordingReporter>,
        grant: Arc<GrantContext>,
    }

    impl Harness {
        async fn new() -> Self {
            let mock = MockConsoleClient::new()
                .with_rows(
                    ResourceKind::Project.endpoint(),
                    vec![json!({"project_id": "p1", "name": "Alpha"})],
                )
                .await;
            Self {
                mock,
                reporter: Arc::new(RecordingReporter::default()),
                grant: Arc::new(GrantContext::new(GrantScope::Workspace, None)),
            }
        }

        fn store<R: ReferenceResource>(&self) -> Arc<ReferenceStore<R>> {
            let ctx = StoreContext::new(
                Arc::new(self.mock.clone()),
                self.grant.clone(),
                self.reporter.clone(),
            );
            Arc::new(ReferenceStore::new(ctx, TTL))
        }

        async fn project_calls(&self) -> usize {
            self.mock.calls(ResourceKind::Project.endpoint()).await
        }
    }

    fn project(id: &str, name: &str) -> Project {
        serde_json::from_value(json!({"project_id": id, "name": name})).unwrap()
    }

    #[tokio::test]
    async fn test_load_maps_rows_to_items() {
        let h = Harness::new().await;
        let store = h.store::<Project>();

        assert!(store.peek().await.is_none());
        let items = store.load(LoadOptions::default()).await;

        assert_eq!(items.len(), 1);
        let item = &items["p1"];
        assert_eq!(item.key, "p1");
        assert_eq!(item.label, "Alpha");
        assert_eq!(item.name, "Alpha");
        assert!(item.data.as_ref().is_some_and(|d| d.is_object()));
    }

    #[tokio::test]
    async fn test_load_sends_projection() {
        let h = Harness::new().await;
        h.store::<Project>().load(LoadOptions::default()).await;

        let requests = h.mock.captured_requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].endpoint, "identity.project");
        assert!(requests[0].query.only.contains(&"project_id".to_string()));
        assert!(requests[0].query.filter.is_empty());
    }

    #[tokio::test]
    async fn test_second_load_within_ttl_is_cached() {
        let h = Harness::new().await;
        let store = h.store::<Project>();

        store.load(LoadOptions::default()).await;
        store.load(LoadOptions::default()).await;

        assert_eq!(h.project_calls().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_after_ttl_refetches() {
        let h = Harness::new().await;
        let store = h.store::<Project>();

        store.load(LoadOptions::default()).await;
        tokio::time::advance(TTL + Duration::from_secs(1)).await;
        store.load(LoadOptions::default()).await;

        assert_eq!(h.project_calls().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lazy_load_keeps_stale_items() {
        let h = Harness::new().await;
        let store = h.store::<Project>();

        store.load(LoadOptions::default()).await;
        tokio::time::advance(TTL * 2).await;
        store.load(LoadOptions::lazy()).await;

        assert_eq!(h.project_calls().await, 1);
    }

    #[tokio::test]
    async fn test_force_always_fetches() {
        let h = Harness::new().await;
        let store = h.store::<Project>();

        store.load(LoadOptions::default()).await;
        store.load(LoadOptions::forced()).await;
        store
            .load(LoadOptions {
                force: true,
                lazy_load: true,
            })
            .await;

        assert_eq!(h.project_calls().await, 3);
    }

    #[tokio::test]
    async fn test_flush_forces_next_load() {
        let h = Harness::new().await;
        let store = h.store::<Project>();

        store.load(LoadOptions::default()).await;
        store.flush().await;
        assert!(store.peek().await.is_none());

        store.load(LoadOptions::default()).await;
        assert_eq!(h.project_calls().await, 2);
    }

    #[tokio::test]
    async fn test_sync_updates_only_its_entry() {
        let h = Harness::new().await;
        h.mock
            .set_rows(
                ResourceKind::Project.endpoint(),
                vec![
                    json!({"project_id": "p1", "name": "Alpha"}),
                    json!({"project_id": "p2", "name": "Beta"}),
                ],
            )
            .await;
        let store = h.store::<Project>();

        let before = store.load(LoadOptions::default()).await;
        store.sync(&project("p2", "Beta Renamed")).await;
        store.sync(&project("p3", "Gamma")).await;

        let after = store.snapshot().await;
        assert_eq!(after["p1"], before["p1"]);
        assert_eq!(after["p2"].label, "Beta Renamed");
        assert_eq!(after["p3"].label, "Gamma");
        assert_eq!(after.len(), 3);

        // The earlier snapshot is untouched
        assert_eq!(before["p2"].label, "Beta");
        assert_eq!(before.len(), 2);

        assert_eq!(h.project_calls().await, 1);
    }

    #[tokio::test]
    async fn test_sync_on_unloaded_store_is_noop() {
        let h = Harness::new().await;
        let store = h.store::<Project>();

        store.sync(&project("p9", "Late")).await;

        assert!(store.peek().await.is_none());
        assert_eq!(h.mock.total_calls().await, 0);
    }

    #[tokio::test]
    async fn test_evict_removes_entry() {
        let h = Harness::new().await;
        let store = h.store::<Project>();
        store.load(LoadOptions::default()).await;

        assert!(store.evict("p1").await.is_some());
        assert!(store.evict("p1").await.is_none());
        assert!(store.get("p1").await.is_none());
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_items_and_reports() {
        let h = Harness::new().await;
        let store = h.store::<Project>();
        store.load(LoadOptions::default()).await;

        h.mock
            .fail_next(ApiError::ServerError("maintenance".to_string()))
            .await;
        let items = store.load(LoadOptions::forced()).await;

        assert_eq!(items.len(), 1);
        assert!(store.get("p1").await.is_some());
        let reports = h.reporter.reports();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].contains("identity.project"));
        assert!(reports[0].contains("maintenance"));
    }

    #[tokio::test]
    async fn test_failed_first_load_stays_unloaded() {
        let h = Harness::new().await;
        h.mock.fail_next(ApiError::Forbidden).await;
        let store = h.store::<Project>();

        let items = store.load(LoadOptions::default()).await;

        assert!(items.is_empty());
        assert!(store.peek().await.is_none());
        assert_eq!(h.reporter.reports().len(), 1);
    }

    #[tokio::test]
    async fn test_scope_gated_store_short_circuits_for_user_scope() {
        let h = Harness::new().await;
        h.mock
            .set_rows(
                ResourceKind::EscalationPolicy.endpoint(),
                vec![json!({"escalation_policy_id": "ep-1", "name": "Default"})],
            )
            .await;
        h.grant.set(GrantScope::User, None).await;
        let store = h.store::<EscalationPolicy>();

        let items = store.load(LoadOptions::forced()).await;

        assert!(items.is_empty());
        assert!(store.peek().await.is_some());
        assert_eq!(h.mock.total_calls().await, 0);
    }

    #[tokio::test]
    async fn test_scope_gated_store_loads_for_workspace_scope() {
        let h = Harness::new().await;
        h.mock
            .set_rows(
                ResourceKind::EscalationPolicy.endpoint(),
                vec![json!({"escalation_policy_id": "ep-1", "name": "Default"})],
            )
            .await;
        let store = h.store::<EscalationPolicy>();

        let items = store.load(LoadOptions::default()).await;
        assert_eq!(items["ep-1"].label, "Default");
    }

    #[tokio::test]
    async fn test_concurrent_loads_share_one_request() {
        let mock = MockConsoleClient::new()
            .with_rows(
                ResourceKind::Project.endpoint(),
                vec![json!({"project_id": "p1", "name": "Alpha"})],
            )
            .await
            .with_latency(Duration::from_millis(20))
            .await;
        let ctx = StoreContext::new(
            Arc::new(mock.clone()),
            Arc::new(GrantContext::default()),
            Arc::new(RecordingReporter::default()),
        );
        let store = Arc::new(ReferenceStore::<Project>::new(ctx, TTL));

        let (a, b) = tokio::join!(
            store.load(LoadOptions::default()),
            store.load(LoadOptions::default())
        );

        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
        assert_eq!(mock.calls(ResourceKind::Project.endpoint()).await, 1);
    }

    #[tokio::test]
    async fn test_flush_during_load_discards_result() {
        let mock = MockConsoleClient::new()
            .with_rows(
                ResourceKind::Project.endpoint(),
                vec![json!({"project_id": "p1", "name": "Alpha"})],
            )
            .await
            .with_latency(Duration::from_millis(20))
            .await;
        let ctx = StoreContext::new(
            Arc::new(mock),
            Arc::new(GrantContext::default()),
            Arc::new(RecordingReporter::default()),
        );
        let store = Arc::new(ReferenceStore::<Project>::new(ctx, TTL));

        let loader = {
            let store = store.clone();
            tokio::spawn(async move { store.load(LoadOptions::default()).await })
        };
        tokio::time::sleep(Duration::from_millis(5)).await;
        store.flush().await;
        loader.await.unwrap();

        assert!(store.peek().await.is_none());
    }

    #[tokio::test]
    async fn test_lookup_reports_loading_then_ready() {
        let h = Harness::new().await;
        let store = h.store::<Project>();

        assert!(matches!(store.lookup().await, Lookup::Loading));

        // Let the background load run
        let items = store.items().await;
        assert_eq!(items.len(), 1);

        let ready = store.lookup().await.ready().unwrap();
        assert_eq!(ready["p1"].label, "Alpha");
        assert_eq!(h.project_calls().await, 1);
    }

    #[tokio::test]
    async fn test_status_tracks_load_and_flush() {
        let h = Harness::new().await;
        let store = h.store::<Project>();

        let status = store.status().await;
        assert!(!status.loaded);
        assert!(!status.is_fresh());

        store.load(LoadOptions::default()).await;
        let status = store.status().await;
        assert!(status.loaded);
        assert_eq!(status.entries, 1);
        assert!(status.is_fresh());

        let erased: Arc<dyn ReferenceCache> = store.clone();
        erased.clear().await;
        assert!(!store.status().await.loaded);
    }
}
