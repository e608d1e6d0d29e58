//! Reference data cache
//!
//! Resource id → display record maps for every resource kind of the console,
//! loaded on demand and kept fresh by a per-store TTL.

pub mod batch;
pub mod grant;
pub mod item;
pub mod registry;
pub mod report;
pub mod resource;
pub mod store;

pub use batch::{BatchSettings, BatchedReferenceFetcher};
pub use grant::{GrantContext, GrantScope};
pub use item::{ReferenceItem, ReferenceMap};
pub use registry::ReferenceRegistry;
pub use report::{ErrorReporter, LogReporter};
pub use resource::{ReferenceResource, ResourceKind, to_reference_items};
pub use store::{
    LoadOptions, Lookup, ReferenceCache, ReferenceStore, StoreContext, StoreStatus,
};
