//! Keeps each demo directory's README pointing at its rendered documentation.
//!
//! Every directory under the demo root that has a `README.md` must have a
//! matching `index.txt` in the docs tree; the README's managed region then
//! links to the published page for that directory.

use crate::format::AUTOGENERATED_PROMPT;
use crate::region::{patch_region, PatchMode, RegionError, RegionOutcome};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, instrument};
use walkdir::{DirEntry, WalkDir};

pub const DOCS_LINK_SEPARATOR: &str = "\n<!-- DOCS LINKS -->\n";

/// Label used in region messages for docs pointers.
pub const DOCS_LINK_LABEL: &str = "docs link";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsLinks {
    /// Demo root, relative to the project root.
    pub root: PathBuf,
    /// Docs tree mirroring the demo root, relative to the project root.
    pub docs_root: PathBuf,
    pub url_base: String,
    pub separator: String,
}

impl DocsLinks {
    pub fn new(
        root: impl Into<PathBuf>,
        docs_root: impl Into<PathBuf>,
        url_base: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            docs_root: docs_root.into(),
            url_base: url_base.into(),
            separator: DOCS_LINK_SEPARATOR.to_string(),
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Published URL of a demo directory given as `a/b/`.
    pub fn url_for(&self, directory: &str) -> String {
        format!("{}/{directory}", self.url_base.trim_end_matches('/'))
    }
}

#[derive(Error, Debug)]
pub enum DocsError {
    #[error(
        "expected each demo README to match a docs 'index.txt' file, \
         found `{}` without corresponding `{}`",
        .readme.display(),
        .index.display()
    )]
    MissingDocsIndex { readme: PathBuf, index: PathBuf },

    #[error("failed to walk demo directories: {0}")]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    Region(#[from] RegionError),
}

/// Contents of a README's docs-link region.
pub fn docs_link_contents(url: &str) -> String {
    format!(
        "<!-- {AUTOGENERATED_PROMPT} -->\n\n\
         These demos are displayed with detailed descriptions in the documentation: {url}"
    )
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// `demos/a/b` as `demos/a/b/`, with forward slashes on every platform.
fn directory_key(relative: &Path) -> String {
    let mut key = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    key.push('/');
    key
}

/// Reconcile the docs-link region of every demo README under `project_root`.
pub fn run_docs_links(
    settings: &DocsLinks,
    project_root: &Path,
    mode: PatchMode,
) -> Result<Vec<RegionOutcome>, DocsError> {
    let mut outcomes = Vec::new();
    run_docs_links_with(settings, project_root, mode, |outcome| outcomes.push(outcome))?;
    Ok(outcomes)
}

/// Like [`run_docs_links`], but hands each outcome to `on_outcome` as soon as
/// its README is done.
#[instrument(skip(settings, on_outcome), fields(root = %settings.root.display()))]
pub fn run_docs_links_with(
    settings: &DocsLinks,
    project_root: &Path,
    mode: PatchMode,
    mut on_outcome: impl FnMut(RegionOutcome),
) -> Result<(), DocsError> {
    let walker = WalkDir::new(project_root.join(&settings.root))
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }

        let readme = entry.path().join("README.md");
        if !readme.exists() {
            debug!(dir = %entry.path().display(), "no README, skipping");
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(project_root)
            .unwrap_or(entry.path());
        let directory = directory_key(relative);

        let index = project_root
            .join(&settings.docs_root)
            .join(relative)
            .join("index.txt");
        if !index.exists() {
            return Err(DocsError::MissingDocsIndex { readme, index });
        }

        let contents = docs_link_contents(&settings.url_for(&directory));
        on_outcome(patch_region(
            &readme,
            &settings.separator,
            &contents,
            mode,
            DOCS_LINK_LABEL,
        )?);
    }

    Ok(())
}
