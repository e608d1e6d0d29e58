//! Resources command implementation

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::models::ResourceKindDisplay;
use crate::output;
use crate::reference::ResourceKind;

/// Print every supported resource kind. Needs no config.
pub fn run(format: OutputFormat) -> Result<()> {
    let rows: Vec<ResourceKindDisplay> = ResourceKind::ALL
        .iter()
        .map(|kind| ResourceKindDisplay::from(*kind))
        .collect();
    output::print(&rows, format)
}
