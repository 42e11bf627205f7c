//! Text nodes and cell normalization.
//!
//! A [`Text`] is the atomic unit every table format knows how to render: a
//! display string, an optional link stem and optional longer details. Raw cell
//! declarations ([`CellInput`]) are normalized exactly once into a [`Cell`] so
//! that renderers never have to branch on the declared shape.

use serde::Deserialize;
use thiserror::Error;

/// Text used when a node only declares a link.
pub const LINK_DEFAULT_TEXT: &str = "demo";

/// Label a `true` cell is normalized to.
pub const TRUE_TEXT: &str = "yes";

/// Selects the suffix rule applied to a link stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkKind {
    /// Link to a directory index (a README or an `index.rst`).
    Index,
    /// Link to a single notebook.
    #[default]
    Notebook,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TextError {
    #[error("must specify at least one of 'text' and 'link'")]
    Empty,
}

/// An immutable, optionally linked piece of table content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Text {
    text: String,
    link: Option<String>,
    details: Option<String>,
    kind: LinkKind,
}

impl Text {
    /// Build a node from its optional parts.
    ///
    /// Fails when neither `text` nor `link` is given. A node with only a link
    /// displays [`LINK_DEFAULT_TEXT`].
    pub fn new(
        text: Option<String>,
        link: Option<String>,
        details: Option<String>,
        kind: LinkKind,
    ) -> Result<Self, TextError> {
        let text = match (text, &link) {
            (Some(text), _) => text,
            (None, Some(_)) => LINK_DEFAULT_TEXT.to_string(),
            (None, None) => return Err(TextError::Empty),
        };
        Ok(Self {
            text,
            link,
            details,
            kind,
        })
    }

    /// A node with display text and nothing else.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: None,
            details: None,
            kind: LinkKind::Notebook,
        }
    }

    /// A notebook link displayed with the default text.
    pub fn link(link: impl Into<String>) -> Self {
        Self {
            text: LINK_DEFAULT_TEXT.to_string(),
            link: Some(link.into()),
            details: None,
            kind: LinkKind::Notebook,
        }
    }

    /// A directory-index link with explicit display text.
    pub fn index_link(text: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: Some(link.into()),
            details: None,
            kind: LinkKind::Index,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_kind(mut self, kind: LinkKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn link_stem(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref().filter(|d| !d.is_empty())
    }

    pub fn kind(&self) -> LinkKind {
        self.kind
    }
}

/// Normalized content of one (record, column) slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    One(Text),
    /// Never empty; a list that normalizes to nothing becomes [`Cell::Empty`].
    Many(Vec<Text>),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Every text node in the cell, in declaration order.
    pub fn texts(&self) -> &[Text] {
        match self {
            Cell::Empty => &[],
            Cell::One(text) => std::slice::from_ref(text),
            Cell::Many(texts) => texts,
        }
    }
}

/// A cell as declared, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellInput {
    Absent,
    Flag(bool),
    Str(String),
    Text(Text),
    List(Vec<CellInput>),
}

impl From<bool> for CellInput {
    fn from(flag: bool) -> Self {
        CellInput::Flag(flag)
    }
}

impl From<&str> for CellInput {
    fn from(s: &str) -> Self {
        CellInput::Str(s.to_string())
    }
}

impl From<String> for CellInput {
    fn from(s: String) -> Self {
        CellInput::Str(s)
    }
}

impl From<Text> for CellInput {
    fn from(text: Text) -> Self {
        CellInput::Text(text)
    }
}

impl<T: Into<CellInput>> From<Vec<T>> for CellInput {
    fn from(items: Vec<T>) -> Self {
        CellInput::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<CellInput>> From<Option<T>> for CellInput {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellInput::Absent, Into::into)
    }
}

impl From<Cell> for CellInput {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Empty => CellInput::Absent,
            Cell::One(text) => CellInput::Text(text),
            Cell::Many(texts) => CellInput::List(texts.into_iter().map(CellInput::Text).collect()),
        }
    }
}

/// Normalize a declared cell.
///
/// Falsy input (`false`, `""`, an empty list) becomes [`Cell::Empty`]. Lists are
/// flattened in order and their empty elements dropped.
pub fn textify(input: impl Into<CellInput>) -> Cell {
    let texts = match input.into() {
        CellInput::Absent | CellInput::Flag(false) => return Cell::Empty,
        CellInput::Flag(true) => return Cell::One(Text::plain(TRUE_TEXT)),
        CellInput::Str(s) if s.is_empty() => return Cell::Empty,
        CellInput::Str(s) => return Cell::One(Text::plain(s)),
        CellInput::Text(text) => return Cell::One(text),
        CellInput::List(items) => {
            let mut texts = Vec::with_capacity(items.len());
            for item in items {
                texts.extend(textify(item).texts().iter().cloned());
            }
            texts
        }
    };

    if texts.is_empty() {
        Cell::Empty
    } else {
        Cell::Many(texts)
    }
}
