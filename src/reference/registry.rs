//! One reference store per resource kind, sharing a single context

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use log::debug;

use super::grant::{GrantContext, GrantScope};
use super::item::ReferenceMap;
use super::resource::ResourceKind;
use super::store::{LoadOptions, ReferenceCache, ReferenceStore, StoreContext, StoreStatus};
use crate::client::models::{
    CloudServiceQuerySet, Collector, Dashboard, EscalationPolicy, Metric, Namespace, Plugin,
    Project, Provider, RoleBinding, ServiceAccount, TrustedAccount, User, UserGroup,
};

/// Every reference store of a console session
pub struct ReferenceRegistry {
    ctx: StoreContext,
    pub project: Arc<ReferenceStore<Project>>,
    pub provider: Arc<ReferenceStore<Provider>>,
    pub collector: Arc<ReferenceStore<Collector>>,
    pub plugin: Arc<ReferenceStore<Plugin>>,
    pub user: Arc<ReferenceStore<User>>,
    pub metric: Arc<ReferenceStore<Metric>>,
    pub namespace: Arc<ReferenceStore<Namespace>>,
    pub service_account: Arc<ReferenceStore<ServiceAccount>>,
    pub trusted_account: Arc<ReferenceStore<TrustedAccount>>,
    pub escalation_policy: Arc<ReferenceStore<EscalationPolicy>>,
    pub role_binding: Arc<ReferenceStore<RoleBinding>>,
    pub user_group: Arc<ReferenceStore<UserGroup>>,
    pub dashboard: Arc<ReferenceStore<Dashboard>>,
    pub cloud_service_query_set: Arc<ReferenceStore<CloudServiceQuerySet>>,
}

impl ReferenceRegistry {
    pub fn new(ctx: StoreContext, ttl: Duration) -> Self {
        fn store<R: super::ReferenceResource>(
            ctx: &StoreContext,
            ttl: Duration,
        ) -> Arc<ReferenceStore<R>> {
            Arc::new(ReferenceStore::new(ctx.clone(), ttl))
        }

        Self {
            project: store(&ctx, ttl),
            provider: store(&ctx, ttl),
            collector: store(&ctx, ttl),
            plugin: store(&ctx, ttl),
            user: store(&ctx, ttl),
            metric: store(&ctx, ttl),
            namespace: store(&ctx, ttl),
            service_account: store(&ctx, ttl),
            trusted_account: store(&ctx, ttl),
            escalation_policy: store(&ctx, ttl),
            role_binding: store(&ctx, ttl),
            user_group: store(&ctx, ttl),
            dashboard: store(&ctx, ttl),
            cloud_service_query_set: store(&ctx, ttl),
            ctx,
        }
    }

    pub fn context(&self) -> &StoreContext {
        &self.ctx
    }

    pub fn grant(&self) -> &Arc<GrantContext> {
        &self.ctx.grant
    }

    /// Type-erased store for `kind`
    pub fn store(&self, kind: ResourceKind) -> Arc<dyn ReferenceCache> {
        match kind {
            ResourceKind::Project => self.project.clone(),
            ResourceKind::Provider => self.provider.clone(),
            ResourceKind::Collector => self.collector.clone(),
            ResourceKind::Plugin => self.plugin.clone(),
            ResourceKind::User => self.user.clone(),
            ResourceKind::Metric => self.metric.clone(),
            ResourceKind::Namespace => self.namespace.clone(),
            ResourceKind::ServiceAccount => self.service_account.clone(),
            ResourceKind::TrustedAccount => self.trusted_account.clone(),
            ResourceKind::EscalationPolicy => self.escalation_policy.clone(),
            ResourceKind::RoleBinding => self.role_binding.clone(),
            ResourceKind::UserGroup => self.user_group.clone(),
            ResourceKind::Dashboard => self.dashboard.clone(),
            ResourceKind::CloudServiceQuerySet => self.cloud_service_query_set.clone(),
        }
    }

    /// Every store, in [`ResourceKind::ALL`] order
    pub fn stores(&self) -> Vec<Arc<dyn ReferenceCache>> {
        ResourceKind::ALL.iter().map(|kind| self.store(*kind)).collect()
    }

    /// Load every store concurrently
    pub async fn load_all(&self, options: LoadOptions) -> Vec<(ResourceKind, Arc<ReferenceMap>)> {
        let stores = self.stores();
        let loads = stores.iter().map(|store| async move {
            (store.resource_kind(), store.load_items(options).await)
        });
        join_all(loads).await
    }

    pub async fn flush_all(&self) {
        for store in self.stores() {
            store.clear().await;
        }
    }

    pub async fn status(&self) -> Vec<StoreStatus> {
        let mut statuses = Vec::with_capacity(ResourceKind::ALL.len());
        for store in self.stores() {
            statuses.push(store.store_status().await);
        }
        statuses
    }

    /// Move the session to another grant. Stores are flushed when the grant
    /// actually changed; returns whether it did.
    pub async fn switch_context(&self, scope: GrantScope, workspace_id: Option<String>) -> bool {
        let changed = self.ctx.grant.set(scope, workspace_id).await;
        if changed {
            debug!("Grant changed to {}, flushing reference stores", scope);
            self.flush_all().await;
        }
        changed
    }
}
