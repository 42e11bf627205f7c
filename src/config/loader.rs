//! Reading a catalog file into a validated [`Catalog`].

use crate::catalog::Catalog;
use crate::config::schema::{CatalogConfig, ValidationError};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Toml {
        path: Option<PathBuf>,
        location: Option<SourceLocation>,
        source: toml_edit::de::Error,
    },
    Validation {
        path: Option<PathBuf>,
        source: ValidationError,
    },
}

/// Where in the catalog text a parse error points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// 1-based.
    pub line: usize,
    /// 1-based, in characters.
    pub column: usize,
    /// The catalog entry holding the error, named like validation issues
    /// name it (`record #2`, `column #1`, `docs_links`).
    pub entry: Option<String>,
}

impl SourceLocation {
    fn locate(input: &str, offset: usize) -> Self {
        let before = input.get(..offset).unwrap_or(input);
        let line_start = before.rfind('\n').map_or(0, |idx| idx + 1);
        let line_end = input[before.len()..]
            .find('\n')
            .map_or(input.len(), |idx| before.len() + idx);

        let mut entry = None;
        let (mut columns, mut records, mut targets) = (0, 0, 0);
        // the error line itself counts, spans may start on a header
        for line in input[..line_end].lines() {
            entry = match line.trim() {
                "[[columns]]" => {
                    columns += 1;
                    Some(format!("column #{columns}"))
                }
                "[[records]]" => {
                    records += 1;
                    Some(format!("record #{records}"))
                }
                "[[targets]]" => {
                    targets += 1;
                    Some(format!("target #{targets}"))
                }
                "[meta]" => Some("meta".to_string()),
                "[docs_links]" => Some("docs_links".to_string()),
                header if header.starts_with('[') => None,
                _ => continue,
            };
        }

        Self {
            line: before.matches('\n').count() + 1,
            column: before[line_start..].chars().count() + 1,
            entry,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)?;
        if let Some(entry) = &self.entry {
            write!(f, " ({entry})")?;
        }
        Ok(())
    }
}

impl ConfigError {
    /// The catalog file the error came from, once known.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigError::Io { path, .. } => Some(path.as_path()),
            ConfigError::Toml { path, .. } | ConfigError::Validation { path, .. } => {
                path.as_deref()
            }
        }
    }

    fn with_path(mut self, file: &Path) -> Self {
        if let ConfigError::Toml { path, .. } | ConfigError::Validation { path, .. } = &mut self {
            path.get_or_insert_with(|| file.to_path_buf());
        }
        self
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read catalog from {}: {}", path.display(), source)
            }
            ConfigError::Toml {
                path,
                location,
                source,
            } => {
                write!(f, "failed to parse catalog")?;
                if let Some(path) = path {
                    write!(f, " {}", path.display())?;
                }
                if let Some(location) = location {
                    write!(f, " at {location}")?;
                }
                write!(f, ": {}", source.message())
            }
            ConfigError::Validation { path, source } => match path {
                Some(path) => write!(f, "invalid catalog ({}):\n{}", path.display(), source),
                None => write!(f, "invalid catalog:\n{}", source),
            },
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Toml { source, .. } => Some(source),
            ConfigError::Validation { source, .. } => Some(source),
        }
    }
}

pub fn load_from_str(input: &str) -> Result<Catalog, ConfigError> {
    let config: CatalogConfig = toml_edit::de::from_str(input).map_err(|source| {
        let location = source
            .span()
            .map(|span| SourceLocation::locate(input, span.start));
        ConfigError::Toml {
            path: None,
            location,
            source,
        }
    })?;
    config
        .validate()
        .map_err(|source| ConfigError::Validation { path: None, source })
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<Catalog, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents).map_err(|error| error.with_path(path))
}
