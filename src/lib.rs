//! Demo Indexer: keeps generated demo tables in sync with a catalog
//!
//! Renders a catalog of algorithms into an HTML table (for markdown READMEs)
//! and a reStructuredText list-table (for Sphinx docs), checks that every link
//! in the catalog points at a file inside the docs tree, and reconciles the
//! rendered tables with sentinel-delimited regions of their target files.
//!
//! # Architecture
//!
//! - [`text`] and [`record`] hold the catalog data model. Cells are normalized
//!   once, when a [`Record`] is built.
//! - [`format`] renders a catalog with one of the closed set of
//!   [`FormatKind`]s and resolves link suffixes per format.
//! - [`links`] finds and validates every link a format would emit.
//! - [`region`] compares or overwrites the managed region of a file.
//! - [`tables`] and [`docs_links`] drive whole runs.
//!
//! # Safety
//!
//! - Links must be relative and exist on disk
//! - A file is either rewritten completely (tempfile + fsync + rename) or untouched
//! - Prefix and suffix around a managed region are never modified
//! - Idempotent: overwriting twice changes nothing the second time
//!
//! # Example
//!
//! ```no_run
//! use demo_indexer::{run_tables, load_from_path, PatchMode};
//! use std::path::Path;
//!
//! let catalog = load_from_path("demo-indexer.toml")?;
//! for report in run_tables(&catalog, Path::new("."), PatchMode::Compare)? {
//!     println!("{:?}", report.outcome);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod catalog;
pub mod config;
pub mod docs_links;
pub mod format;
pub mod links;
pub mod record;
pub mod region;
pub mod report;
pub mod tables;
pub mod text;

// Re-exports
pub use catalog::Catalog;
pub use config::{
    load_from_path, load_from_str, ConfigError, SourceLocation, ValidationError, ValidationIssue,
};
pub use docs_links::{run_docs_links, run_docs_links_with, DocsError, DocsLinks};
pub use format::{FormatKind, Resolution, Target};
pub use links::{
    find_links, link_is_valid_relative, validate_links, FoundLink, LinkError, LinkNode,
};
pub use record::{Column, ColumnKey, Columns, Record, RecordError};
pub use region::{patch_region, PatchMode, RegionError, RegionOutcome, SplitRegion};
pub use report::{format_error, Fixit};
pub use tables::{run_tables, run_tables_with, TableError, TargetReport};
pub use text::{textify, Cell, CellInput, LinkKind, Text, TextError};
