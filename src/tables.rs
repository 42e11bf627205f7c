//! The table pipeline: render, check links, reconcile the managed region.

use crate::catalog::Catalog;
use crate::format::Target;
use crate::links::{validate_links, LinkError};
use crate::region::{patch_region, PatchMode, RegionError, RegionOutcome};
use std::path::Path;
use thiserror::Error;
use tracing::{info, instrument};

/// Label used in region messages for demo tables.
pub const TABLE_LABEL: &str = "table";

#[derive(Error, Debug)]
pub enum TableError {
    #[error(transparent)]
    Links(#[from] LinkError),

    #[error(transparent)]
    Region(#[from] RegionError),
}

/// Outcome for one target of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetReport {
    pub target: Target,
    pub outcome: RegionOutcome,
}

/// Process every target of `catalog`, with target paths taken relative to `root`.
///
/// The first failing target aborts the run; later targets are not touched.
pub fn run_tables(
    catalog: &Catalog,
    root: &Path,
    mode: PatchMode,
) -> Result<Vec<TargetReport>, TableError> {
    let mut reports = Vec::with_capacity(catalog.targets.len());
    run_tables_with(catalog, root, mode, |report| reports.push(report))?;
    Ok(reports)
}

/// Like [`run_tables`], but hands each report to `on_report` as soon as its
/// target is done. Targets finished before a failure are still reported.
#[instrument(skip(catalog, on_report), fields(catalog = %catalog.name))]
pub fn run_tables_with(
    catalog: &Catalog,
    root: &Path,
    mode: PatchMode,
    mut on_report: impl FnMut(TargetReport),
) -> Result<(), TableError> {
    for target in &catalog.targets {
        let outcome = run_target(catalog, target, root, mode)?;
        on_report(TargetReport {
            target: target.clone(),
            outcome,
        });
    }

    Ok(())
}

fn run_target(
    catalog: &Catalog,
    target: &Target,
    root: &Path,
    mode: PatchMode,
) -> Result<RegionOutcome, TableError> {
    let file = root.join(&target.file);
    info!(file = %file.display(), format = %target.format, "processing target");

    let table = catalog.render(target);
    validate_links(
        target,
        &root.join(target.base_dir()),
        &catalog.columns,
        &catalog.records,
    )?;

    Ok(patch_region(
        &file,
        &target.separator,
        &table,
        mode,
        TABLE_LABEL,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FormatKind;
    use crate::record::{Column, Columns, Record};
    use crate::text::Text;
    use std::fs;

    fn catalog(targets: Vec<Target>) -> Catalog {
        let columns = Columns::new(vec![
            Column::new("algorithm", Text::plain("Algorithm")),
            Column::new("nc", Text::plain("NC")),
        ])
        .unwrap();
        let records = vec![Record::new(
            &columns,
            [
                ("algorithm", Text::plain("GCN")),
                ("nc", Text::link("gcn")),
            ],
        )
        .unwrap()];
        Catalog::new(columns, records, targets)
    }

    #[test]
    fn test_invalid_links_stop_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let readme = dir.path().join("README.md");
        let original = "x\n<!-- DEMO TABLE MARKER -->\n\n<!-- DEMO TABLE MARKER -->\ny";
        fs::write(&readme, original).unwrap();

        let catalog = catalog(vec![Target::new(FormatKind::Html, "README.md")]);
        let err = run_tables(&catalog, dir.path(), PatchMode::Overwrite).unwrap_err();

        assert!(matches!(err, TableError::Links(_)));
        assert_eq!(fs::read_to_string(&readme).unwrap(), original);
    }

    #[test]
    fn test_finished_targets_reported_before_failure() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("gcn.ipynb"), "{}").unwrap();
        fs::write(
            dir.path().join("README.md"),
            "x\n<!-- DEMO TABLE MARKER -->\n\n<!-- DEMO TABLE MARKER -->\ny",
        )
        .unwrap();
        fs::write(dir.path().join("OTHER.md"), "no markers").unwrap();

        let catalog = catalog(vec![
            Target::new(FormatKind::Html, "README.md"),
            Target::new(FormatKind::Html, "OTHER.md"),
        ]);

        let mut seen = Vec::new();
        let err = run_tables_with(&catalog, dir.path(), PatchMode::Overwrite, |report| {
            seen.push(report)
        })
        .unwrap_err();

        assert!(matches!(
            err,
            TableError::Region(RegionError::SeparatorCount { found: 0, .. })
        ));
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].target.file, Path::new("README.md"));
        assert!(matches!(seen[0].outcome, RegionOutcome::Rewritten { .. }));
    }

    #[test]
    fn test_overwrite_then_compare() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("gcn.ipynb"), "{}").unwrap();
        let readme = dir.path().join("README.md");
        fs::write(
            &readme,
            "x\n<!-- DEMO TABLE MARKER -->\n\n<!-- DEMO TABLE MARKER -->\ny",
        )
        .unwrap();

        let catalog = catalog(vec![Target::new(FormatKind::Html, "README.md")]);

        let reports = run_tables(&catalog, dir.path(), PatchMode::Overwrite).unwrap();
        assert!(matches!(reports[0].outcome, RegionOutcome::Rewritten { .. }));

        let reports = run_tables(&catalog, dir.path(), PatchMode::Compare).unwrap();
        assert!(matches!(reports[0].outcome, RegionOutcome::Unchanged { .. }));

        let contents = fs::read_to_string(&readme).unwrap();
        assert!(contents.contains("<td><a href='gcn.ipynb'>demo</a></td>"));
        assert!(contents.starts_with("x\n<!-- DEMO TABLE MARKER -->\n<!-- autogenerated"));
        assert!(contents.ends_with("</table>\n<!-- DEMO TABLE MARKER -->\ny"));
    }
}
