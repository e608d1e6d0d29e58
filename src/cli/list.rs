//! List and warm command implementations

use crate::cli::CommandContext;
use crate::error::Result;
use crate::models::{ReferenceDisplay, StoreStatusDisplay};
use crate::output;
use crate::reference::{LoadOptions, ResourceKind};

fn load_options(force: bool) -> LoadOptions {
    if force {
        LoadOptions::forced()
    } else {
        LoadOptions::default()
    }
}

/// Load the store for `kind` and print its items, sorted by label
pub async fn run(ctx: &CommandContext, kind: ResourceKind, force: bool) -> Result<()> {
    let store = ctx.registry.store(kind);
    let items = store.load_items(load_options(force)).await;

    if !store.store_status().await.loaded {
        log::warn!("{} store could not be loaded", kind);
    }

    let mut rows: Vec<ReferenceDisplay> = items.values().map(ReferenceDisplay::from).collect();
    rows.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.key.cmp(&b.key)));
    output::print(&rows, ctx.format)
}

/// Load every store concurrently and print their state
pub async fn warm(ctx: &CommandContext, force: bool) -> Result<()> {
    ctx.registry.load_all(load_options(force)).await;

    let rows: Vec<StoreStatusDisplay> = ctx
        .registry
        .status()
        .await
        .iter()
        .map(StoreStatusDisplay::from)
        .collect();
    output::print(&rows, ctx.format)
}
