use crate::docs_links::DocsLinks;
use crate::format::Target;
use crate::record::{Columns, Record};

/// Everything the tool needs to regenerate the managed regions of a docs tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    pub name: String,
    pub columns: Columns,
    pub records: Vec<Record>,
    pub targets: Vec<Target>,
    pub docs_links: Option<DocsLinks>,
}

impl Catalog {
    pub fn new(columns: Columns, records: Vec<Record>, targets: Vec<Target>) -> Self {
        Self {
            name: String::new(),
            columns,
            records,
            targets,
            docs_links: None,
        }
    }

    pub fn with_docs_links(mut self, docs_links: DocsLinks) -> Self {
        self.docs_links = Some(docs_links);
        self
    }

    /// The table for `target`, ready to be placed in its managed region.
    pub fn render(&self, target: &Target) -> String {
        target.format.render(&self.columns, &self.records)
    }
}
