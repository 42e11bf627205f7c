//! Table formats.
//!
//! The set of formats is closed: [`FormatKind::Html`] for the hypertext table
//! embedded in markdown READMEs and [`FormatKind::Rst`] for the
//! reStructuredText list-table in the Sphinx docs. Each format owns its syntax
//! and its link-suffix rules.

mod html;
mod rst;

use crate::record::{Columns, Record};
use crate::text::{LinkKind, Text};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Marker text placed at the top of every generated table.
pub const AUTOGENERATED_PROMPT: &str =
    "autogenerated by demo-indexer, edit the catalog file instead of this location";

/// Default separator around the managed region of a markdown README.
pub const HTML_SEPARATOR: &str = "\n<!-- DEMO TABLE MARKER -->\n";

/// Default separator around the managed region of an rst page. An rst comment
/// is a directive with an unknown type, like an empty string.
pub const RST_SEPARATOR: &str = "\n..\n   DEMO TABLE MARKER\n";

/// Why a link is being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// For the published output.
    Render,
    /// For an on-disk existence check, which needs an explicit file name.
    Check,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormatKind {
    Html,
    Rst,
}

impl FormatKind {
    pub fn index_suffix(self, resolution: Resolution) -> &'static str {
        match (self, resolution) {
            (FormatKind::Html, _) => "/README.md",
            (FormatKind::Rst, Resolution::Check) => "/index.rst",
            (FormatKind::Rst, Resolution::Render) => "/index",
        }
    }

    pub fn notebook_suffix(self, resolution: Resolution) -> &'static str {
        match (self, resolution) {
            (FormatKind::Html, _) => ".ipynb",
            (FormatKind::Rst, Resolution::Check) => ".nblink",
            (FormatKind::Rst, Resolution::Render) => "",
        }
    }

    /// Resolve a node's link stem, or `None` when it has no link.
    pub fn link(self, text: &Text, resolution: Resolution) -> Option<String> {
        let stem = text.link_stem()?;
        let suffix = match text.kind() {
            LinkKind::Index => self.index_suffix(resolution),
            LinkKind::Notebook => self.notebook_suffix(resolution),
        };
        Some(format!("{stem}{suffix}"))
    }

    pub fn render(self, columns: &Columns, records: &[Record]) -> String {
        match self {
            FormatKind::Html => html::render(columns, records),
            FormatKind::Rst => rst::render(columns, records),
        }
    }

    pub fn default_separator(self) -> &'static str {
        match self {
            FormatKind::Html => HTML_SEPARATOR,
            FormatKind::Rst => RST_SEPARATOR,
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatKind::Html => f.write_str("html"),
            FormatKind::Rst => f.write_str("rst"),
        }
    }
}

/// A format bound to the file whose managed region it maintains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub format: FormatKind,
    pub file: PathBuf,
    pub separator: String,
}

impl Target {
    pub fn new(format: FormatKind, file: impl Into<PathBuf>) -> Self {
        Self {
            format,
            file: file.into(),
            separator: format.default_separator().to_string(),
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Directory links in this target are relative to.
    pub fn base_dir(&self) -> &Path {
        self.file.parent().unwrap_or_else(|| Path::new(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_suffix_asymmetry() {
        let nc = Text::index_link("NC", "node-classification");

        assert_eq!(
            FormatKind::Html.link(&nc, Resolution::Check).as_deref(),
            Some("node-classification/README.md")
        );
        assert_eq!(
            FormatKind::Html.link(&nc, Resolution::Render).as_deref(),
            Some("node-classification/README.md")
        );
        assert_eq!(
            FormatKind::Rst.link(&nc, Resolution::Check).as_deref(),
            Some("node-classification/index.rst")
        );
        assert_eq!(
            FormatKind::Rst.link(&nc, Resolution::Render).as_deref(),
            Some("node-classification/index")
        );
    }

    #[test]
    fn test_notebook_suffixes() {
        let nb = Text::link("embeddings/node2vec-embeddings");

        assert_eq!(
            FormatKind::Html.link(&nb, Resolution::Render).as_deref(),
            Some("embeddings/node2vec-embeddings.ipynb")
        );
        assert_eq!(
            FormatKind::Rst.link(&nb, Resolution::Check).as_deref(),
            Some("embeddings/node2vec-embeddings.nblink")
        );
        assert_eq!(
            FormatKind::Rst.link(&nb, Resolution::Render).as_deref(),
            Some("embeddings/node2vec-embeddings")
        );
    }

    #[test]
    fn test_no_link() {
        assert_eq!(
            FormatKind::Rst.link(&Text::plain("GCN"), Resolution::Check),
            None
        );
    }

    #[test]
    fn test_target_base_dir() {
        let target = Target::new(FormatKind::Rst, "docs/demos/index.rst");
        assert_eq!(target.base_dir(), Path::new("docs/demos"));
        assert_eq!(target.separator, RST_SEPARATOR);

        let bare = Target::new(FormatKind::Html, "README.md");
        assert_eq!(bare.base_dir(), Path::new(""));
    }
}
