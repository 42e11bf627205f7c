use crate::catalog::Catalog;
use crate::docs_links::DocsLinks;
use crate::format::{FormatKind, Target};
use crate::record::{Column, ColumnKey, Columns, Record};
use crate::text::{textify, CellInput, LinkKind, Text, TextError};
use serde::de::IgnoredAny;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct CatalogConfig {
    #[serde(default)]
    pub meta: Metadata,
    #[serde(default)]
    pub columns: Vec<ColumnDefinition>,
    #[serde(default)]
    pub records: Vec<BTreeMap<String, CellDefinition>>,
    #[serde(default)]
    pub targets: Vec<TargetDefinition>,
    #[serde(default)]
    pub docs_links: Option<DocsLinksDefinition>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Metadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ColumnDefinition {
    pub key: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub kind: LinkKind,
}

impl ColumnDefinition {
    fn heading(&self) -> TextDefinition {
        TextDefinition {
            text: self.text.clone(),
            link: self.link.clone(),
            details: self.details.clone(),
            kind: self.kind,
        }
    }
}

/// A text node written out as a table, e.g. `{ text = "GCN", details = "..." }`.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct TextDefinition {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub kind: LinkKind,
}

impl TextDefinition {
    pub fn build(&self) -> Result<Text, TextError> {
        Text::new(
            self.text.clone(),
            self.link.clone(),
            self.details.clone(),
            self.kind,
        )
    }
}

/// A cell exactly as written in TOML.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum CellDefinition {
    Flag(bool),
    Str(String),
    Node(TextDefinition),
    List(Vec<CellDefinition>),
    /// Anything else (numbers, dates, tables with unknown keys).
    Unsupported(IgnoredAny),
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct TargetDefinition {
    pub format: FormatKind,
    pub file: String,
    #[serde(default)]
    pub separator: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct DocsLinksDefinition {
    pub root: String,
    #[serde(default = "default_docs_root")]
    pub docs_root: String,
    pub url_base: String,
    #[serde(default)]
    pub separator: Option<String>,
}

fn default_docs_root() -> String {
    "docs".to_string()
}

enum CellIssue {
    Unsupported,
    Text(TextError),
}

impl CellDefinition {
    fn to_input(&self) -> Result<CellInput, CellIssue> {
        Ok(match self {
            CellDefinition::Flag(flag) => CellInput::Flag(*flag),
            CellDefinition::Str(s) => CellInput::Str(s.clone()),
            CellDefinition::Node(def) => CellInput::Text(def.build().map_err(CellIssue::Text)?),
            CellDefinition::List(items) => CellInput::List(
                items
                    .iter()
                    .map(CellDefinition::to_input)
                    .collect::<Result<_, _>>()?,
            ),
            CellDefinition::Unsupported(_) => return Err(CellIssue::Unsupported),
        })
    }
}

impl CatalogConfig {
    /// Check the whole configuration and build the in-memory catalog.
    ///
    /// Every problem found is reported, not just the first.
    pub fn validate(&self) -> Result<Catalog, ValidationError> {
        let mut issues = Vec::new();

        let columns = self.build_columns(&mut issues);
        let records = self.build_records(&columns, &mut issues);
        let targets = self.build_targets(&mut issues);
        let docs_links = self.build_docs_links(&mut issues);

        if issues.is_empty() {
            Ok(Catalog {
                name: self.meta.name.clone(),
                columns,
                records,
                targets,
                docs_links,
            })
        } else {
            Err(ValidationError { issues })
        }
    }

    fn build_columns(&self, issues: &mut Vec<ValidationIssue>) -> Columns {
        if self.columns.is_empty() {
            issues.push(ValidationIssue::NoColumns);
        }

        let mut columns: Vec<Column> = Vec::with_capacity(self.columns.len());
        for (idx, def) in self.columns.iter().enumerate() {
            if def.key.trim().is_empty() {
                issues.push(ValidationIssue::MissingField {
                    location: format!("column #{}", idx + 1),
                    field: "key",
                });
                continue;
            }

            let key = ColumnKey::new(def.key.clone());
            if columns.iter().any(|c| c.key == key) {
                issues.push(ValidationIssue::DuplicateColumn { key: def.key.clone() });
                continue;
            }

            match def.heading().build() {
                Ok(heading) => columns.push(Column::new(key, heading)),
                Err(source) => issues.push(ValidationIssue::InvalidText {
                    location: format!("column '{}'", def.key),
                    source,
                }),
            }
        }

        // keys are unique by construction above
        Columns::new(columns).unwrap_or_default()
    }

    fn build_records(&self, columns: &Columns, issues: &mut Vec<ValidationIssue>) -> Vec<Record> {
        let known: Vec<&str> = self.columns.iter().map(|c| c.key.as_str()).collect();
        let mut records = Vec::with_capacity(self.records.len());

        for (idx, cells) in self.records.iter().enumerate() {
            let record_no = idx + 1;
            let mut entries = Vec::with_capacity(cells.len());

            for (key, def) in cells {
                if !known.contains(&key.as_str()) {
                    issues.push(ValidationIssue::UnknownColumn {
                        record: record_no,
                        key: key.clone(),
                        suggestion: suggest(key, &known),
                    });
                    continue;
                }
                match def.to_input() {
                    Ok(input) => entries.push((ColumnKey::new(key.clone()), input)),
                    Err(CellIssue::Unsupported) => issues.push(ValidationIssue::UnsupportedCell {
                        record: record_no,
                        key: key.clone(),
                    }),
                    Err(CellIssue::Text(source)) => issues.push(ValidationIssue::InvalidText {
                        location: format!("record #{record_no}, column '{key}'"),
                        source,
                    }),
                }
            }

            if let Some(first) = self.columns.first() {
                let identified = cells
                    .get(&first.key)
                    .and_then(|def| def.to_input().ok())
                    .is_some_and(|input| !textify(input).is_empty());
                if !identified {
                    issues.push(ValidationIssue::MissingIdentifier {
                        record: record_no,
                        column: first.key.clone(),
                    });
                }
            }

            // only build once the column list itself is sound
            if columns.len() == self.columns.len() {
                if let Ok(record) = Record::new(columns, entries) {
                    records.push(record);
                }
            }
        }

        records
    }

    fn build_targets(&self, issues: &mut Vec<ValidationIssue>) -> Vec<Target> {
        if self.targets.is_empty() {
            issues.push(ValidationIssue::NoTargets);
        }

        let mut targets = Vec::with_capacity(self.targets.len());
        for (idx, def) in self.targets.iter().enumerate() {
            let location = format!("target #{}", idx + 1);
            if def.file.trim().is_empty() {
                issues.push(ValidationIssue::MissingField {
                    location,
                    field: "file",
                });
                continue;
            }

            let mut target = Target::new(def.format, &def.file);
            if let Some(separator) = &def.separator {
                if separator.is_empty() {
                    issues.push(ValidationIssue::MissingField {
                        location,
                        field: "separator",
                    });
                    continue;
                }
                target = target.with_separator(separator.clone());
            }
            targets.push(target);
        }
        targets
    }

    fn build_docs_links(&self, issues: &mut Vec<ValidationIssue>) -> Option<DocsLinks> {
        let def = self.docs_links.as_ref()?;
        let location = "docs_links".to_string();

        for (field, value) in [
            ("root", &def.root),
            ("docs_root", &def.docs_root),
            ("url_base", &def.url_base),
        ] {
            if value.trim().is_empty() {
                issues.push(ValidationIssue::MissingField {
                    location: location.clone(),
                    field,
                });
            }
        }

        let mut docs_links = DocsLinks::new(&def.root, &def.docs_root, &def.url_base);
        if let Some(separator) = &def.separator {
            if separator.is_empty() {
                issues.push(ValidationIssue::MissingField {
                    location,
                    field: "separator",
                });
            } else {
                docs_links = docs_links.with_separator(separator.clone());
            }
        }
        Some(docs_links)
    }
}

/// The closest known column key, if any is close enough to be a likely typo.
fn suggest(key: &str, known: &[&str]) -> Option<String> {
    known
        .iter()
        .map(|candidate| (strsim::jaro_winkler(key, candidate), *candidate))
        .filter(|(score, _)| *score >= 0.8)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, candidate)| candidate.to_string())
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone)]
pub enum ValidationIssue {
    NoColumns,
    NoTargets,
    MissingField {
        location: String,
        field: &'static str,
    },
    DuplicateColumn {
        key: String,
    },
    InvalidText {
        location: String,
        source: TextError,
    },
    UnknownColumn {
        record: usize,
        key: String,
        suggestion: Option<String>,
    },
    UnsupportedCell {
        record: usize,
        key: String,
    },
    MissingIdentifier {
        record: usize,
        column: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::NoColumns => write!(f, "catalog declares no columns"),
            ValidationIssue::NoTargets => write!(f, "catalog declares no targets"),
            ValidationIssue::MissingField { location, field } => {
                write!(f, "{location} missing required field '{field}'")
            }
            ValidationIssue::DuplicateColumn { key } => {
                write!(f, "column key '{key}' is declared more than once")
            }
            ValidationIssue::InvalidText { location, source } => {
                write!(f, "{location} has an invalid text node: {source}")
            }
            ValidationIssue::UnknownColumn {
                record,
                key,
                suggestion,
            } => {
                write!(f, "record #{record} uses unknown column '{key}'")?;
                if let Some(s) = suggestion {
                    write!(f, " (did you mean '{s}'?)")?;
                }
                Ok(())
            }
            ValidationIssue::UnsupportedCell { record, key } => write!(
                f,
                "record #{record}, column '{key}': unsupported value \
                 (expected a boolean, string, text table or array)"
            ),
            ValidationIssue::MissingIdentifier { record, column } => {
                write!(f, "record #{record} has no value for identifying column '{column}'")
            }
        }
    }
}
