//! Console API resource models
//!
//! Each model carries only the fields its reference store projects with
//! `only`, and knows how to turn itself into a [`ReferenceItem`].
//!
//! [`ReferenceItem`]: crate::reference::ReferenceItem

mod account;
mod alert;
mod dashboard;
mod identity;
mod inventory;
mod plugin;
mod project;

pub use account::{ServiceAccount, TrustedAccount};
pub use alert::EscalationPolicy;
pub use dashboard::Dashboard;
pub use identity::{RoleBinding, User, UserGroup};
pub use inventory::{CloudServiceQuerySet, Collector, Metric, Namespace, PluginInfo, Provider};
pub use plugin::Plugin;
pub use project::Project;
