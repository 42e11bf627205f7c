//! Link discovery and validation.
//!
//! Generated tables may only deep-link inside the documentation tree they are
//! written into, so every link must be a relative path that exists on disk.

use crate::format::{FormatKind, Resolution, Target};
use crate::record::{Columns, Record};
use crate::text::{Cell, Text};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// A tree of catalog content to search for links.
#[derive(Debug, Clone)]
pub enum LinkNode<'a> {
    Empty,
    Text(&'a Text),
    List(Vec<LinkNode<'a>>),
    Record(&'a Record),
}

impl<'a> From<&'a Text> for LinkNode<'a> {
    fn from(text: &'a Text) -> Self {
        LinkNode::Text(text)
    }
}

impl<'a> From<&'a Cell> for LinkNode<'a> {
    fn from(cell: &'a Cell) -> Self {
        match cell {
            Cell::Empty => LinkNode::Empty,
            Cell::One(text) => LinkNode::Text(text),
            Cell::Many(texts) => LinkNode::List(texts.iter().map(LinkNode::Text).collect()),
        }
    }
}

impl<'a> From<&'a Record> for LinkNode<'a> {
    fn from(record: &'a Record) -> Self {
        LinkNode::Record(record)
    }
}

impl<'a> From<&'a Columns> for LinkNode<'a> {
    fn from(columns: &'a Columns) -> Self {
        LinkNode::List(columns.headings().map(LinkNode::Text).collect())
    }
}

impl<'a> From<&'a [Record]> for LinkNode<'a> {
    fn from(records: &'a [Record]) -> Self {
        LinkNode::List(records.iter().map(LinkNode::Record).collect())
    }
}

/// A link as written in the catalog and as resolved for checking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundLink {
    pub declared: String,
    pub resolved: String,
}

/// Every link reachable from `node`, resolved for on-disk checking.
///
/// Records are walked in column order. The iterator borrows `node` and can be
/// recreated at will.
pub fn find_links<'a>(
    format: FormatKind,
    node: &'a LinkNode<'a>,
) -> Box<dyn Iterator<Item = FoundLink> + 'a> {
    match node {
        LinkNode::Empty => Box::new(std::iter::empty()),
        LinkNode::Text(text) => Box::new(text_link(format, text).into_iter()),
        LinkNode::List(items) => {
            Box::new(items.iter().flat_map(move |sub| find_links(format, sub)))
        }
        LinkNode::Record(record) => Box::new(
            record
                .cells()
                .flat_map(Cell::texts)
                .filter_map(move |text| text_link(format, text)),
        ),
    }
}

fn text_link(format: FormatKind, text: &Text) -> Option<FoundLink> {
    let resolved = format.link(text, Resolution::Check)?;
    Some(FoundLink {
        declared: text.link_stem()?.to_string(),
        resolved,
    })
}

/// Whether `link` is a relative path that exists under `base_dir`.
///
/// A missing link is trivially valid. Absolute paths and web links never are.
pub fn link_is_valid_relative(link: Option<&str>, base_dir: &Path) -> bool {
    let Some(link) = link else {
        return true;
    };

    if Path::new(link).is_absolute() {
        return false;
    }

    if link
        .get(..4)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("http"))
    {
        return false;
    }

    base_dir.join(link).exists()
}

#[derive(Error, Debug)]
pub enum LinkError {
    #[error("{}", describe_invalid(.base_dir, .links))]
    InvalidLinks {
        base_dir: PathBuf,
        links: Vec<FoundLink>,
    },
}

fn describe_invalid(base_dir: &Path, links: &[FoundLink]) -> String {
    let base = base_dir.display();
    let mut message = format!(
        "expected all links in the catalog to be relative links that are valid \
         starting at `{base}`, but found {} invalid:\n",
        links.len()
    );
    for link in links {
        message.push_str(&format!(
            "\n- `{}` (missing target: `{base}/{}`)",
            link.declared, link.resolved
        ));
    }
    message
}

/// Check every heading and cell link of a target's table.
///
/// All invalid links are collected before failing.
pub fn validate_links(
    target: &Target,
    base_dir: &Path,
    columns: &Columns,
    records: &[Record],
) -> Result<(), LinkError> {
    let headings = LinkNode::from(columns);
    let rows = LinkNode::from(records);

    let invalid: Vec<FoundLink> = find_links(target.format, &headings)
        .chain(find_links(target.format, &rows))
        .filter(|link| {
            let valid = link_is_valid_relative(Some(link.resolved.as_str()), base_dir);
            debug!(link = %link.resolved, valid, "checked link");
            !valid
        })
        .collect();

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(LinkError::InvalidLinks {
            base_dir: base_dir.to_path_buf(),
            links: invalid,
        })
    }
}
