//! Operator-facing failure messages.

use crate::docs_links::DocsError;
use crate::links::LinkError;
use crate::region::RegionError;
use crate::tables::TableError;
use std::path::Path;

pub const ERROR_PREFIX: &str = "Error while generating information for documentation: ";

/// Errors that regenerating the managed regions can fix.
pub trait Fixit {
    fn wants_fixit(&self) -> bool;
}

impl Fixit for LinkError {
    fn wants_fixit(&self) -> bool {
        true
    }
}

impl Fixit for RegionError {
    fn wants_fixit(&self) -> bool {
        matches!(self, RegionError::ContentMismatch { .. })
    }
}

impl Fixit for TableError {
    fn wants_fixit(&self) -> bool {
        match self {
            TableError::Links(e) => e.wants_fixit(),
            TableError::Region(e) => e.wants_fixit(),
        }
    }
}

impl Fixit for DocsError {
    fn wants_fixit(&self) -> bool {
        match self {
            DocsError::Region(e) => e.wants_fixit(),
            DocsError::MissingDocsIndex { .. } | DocsError::Walk(_) => false,
        }
    }
}

/// The full message for a fatal condition, with the fix-it hint when it applies.
pub fn format_error(message: &str, fixit: bool, config: &Path) -> String {
    let mut formatted = format!("{ERROR_PREFIX}{message}");
    if fixit {
        let config = config.display();
        formatted.push_str(&format!(
            "\n\nTo fix, edit `{config}` as appropriate and run \
             `demo-indexer --config {config} --action=overwrite` \
             to overwrite existing information with updated form."
        ));
    }
    formatted
}
