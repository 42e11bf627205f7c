pub mod loader;
pub mod schema;

pub use loader::{load_from_path, load_from_str, ConfigError, SourceLocation};
pub use schema::{
    CatalogConfig, CellDefinition, ColumnDefinition, DocsLinksDefinition, Metadata,
    TargetDefinition, TextDefinition, ValidationError, ValidationIssue,
};
