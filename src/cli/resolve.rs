//! Resolve command implementation

use crate::cli::CommandContext;
use crate::client::models::{
    CloudServiceQuerySet, Collector, Dashboard, EscalationPolicy, Metric, Namespace, Plugin,
    Project, Provider, RoleBinding, ServiceAccount, TrustedAccount, User, UserGroup,
};
use crate::error::Result;
use crate::models::ResolveDisplay;
use crate::output;
use crate::reference::{ReferenceResource, ResourceKind};

/// Resolve `ids` of `kind` through the batched fetcher
pub async fn run(ctx: &CommandContext, kind: ResourceKind, ids: &[String]) -> Result<()> {
    match kind {
        ResourceKind::Project => resolve::<Project>(ctx, ids).await,
        ResourceKind::Provider => resolve::<Provider>(ctx, ids).await,
        ResourceKind::Collector => resolve::<Collector>(ctx, ids).await,
        ResourceKind::Plugin => resolve::<Plugin>(ctx, ids).await,
        ResourceKind::User => resolve::<User>(ctx, ids).await,
        ResourceKind::Metric => resolve::<Metric>(ctx, ids).await,
        ResourceKind::Namespace => resolve::<Namespace>(ctx, ids).await,
        ResourceKind::ServiceAccount => resolve::<ServiceAccount>(ctx, ids).await,
        ResourceKind::TrustedAccount => resolve::<TrustedAccount>(ctx, ids).await,
        ResourceKind::EscalationPolicy => resolve::<EscalationPolicy>(ctx, ids).await,
        ResourceKind::RoleBinding => resolve::<RoleBinding>(ctx, ids).await,
        ResourceKind::UserGroup => resolve::<UserGroup>(ctx, ids).await,
        ResourceKind::Dashboard => resolve::<Dashboard>(ctx, ids).await,
        ResourceKind::CloudServiceQuerySet => resolve::<CloudServiceQuerySet>(ctx, ids).await,
    }
}

async fn resolve<R: ReferenceResource>(ctx: &CommandContext, ids: &[String]) -> Result<()> {
    let fetcher = ctx.fetcher::<R>();

    fetcher.enqueue_many(ids.iter().cloned()).await;
    fetcher.flush().await;

    let mut rows = Vec::with_capacity(ids.len());
    for id in ids {
        rows.push(ResolveDisplay::new(id, fetcher.get(id).await.as_ref()));
    }
    output::print(&rows, ctx.format)
}
