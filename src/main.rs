use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use demo_indexer::{
    format_error, load_from_path, run_docs_links_with, run_tables_with, Catalog, DocsError, Fixit,
    PatchMode, RegionError, RegionOutcome, TableError,
};
use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CONFIG: &str = "demo-indexer.toml";

#[derive(Parser)]
#[command(name = "demo-indexer")]
#[command(
    about = "Edits or compares the generated demo tables and docs links against the catalog",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Whether to compare the managed regions against what would be generated,
    /// or to overwrite them with new ones
    #[arg(short, long, value_enum, default_value_t = Action::Compare)]
    action: Action,

    /// Catalog file (defaults to demo-indexer.toml under the root)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Project root that target paths are relative to (defaults to the current directory)
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Skip the docs-link regions of demo READMEs
    #[arg(long)]
    no_docs_links: bool,

    /// Also report failures as a Buildkite annotation
    #[arg(long)]
    annotate: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Action {
    Compare,
    Overwrite,
}

impl From<Action> for PatchMode {
    fn from(action: Action) -> Self {
        match action {
            Action::Compare => PatchMode::Compare,
            Action::Overwrite => PatchMode::Overwrite,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "demo_indexer=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let root = match cli.root {
        Some(root) => root,
        None => env::current_dir().context("could not determine the current directory")?,
    };
    let config = cli.config.unwrap_or_else(|| root.join(DEFAULT_CONFIG));
    let mode = PatchMode::from(cli.action);
    let reporter = Reporter {
        config: &config,
        annotate: cli.annotate,
    };

    let catalog = match load_from_path(&config) {
        Ok(catalog) => catalog,
        Err(e) => reporter.fail(&e.to_string(), false),
    };

    cmd_tables(&catalog, &root, mode, &reporter);
    if !cli.no_docs_links {
        cmd_docs_links(&catalog, &root, mode, &reporter);
    }

    Ok(())
}

fn cmd_tables(catalog: &Catalog, root: &Path, mode: PatchMode, reporter: &Reporter<'_>) {
    let result = run_tables_with(catalog, root, mode, |report| {
        print_outcome(&report.outcome, &format!("{} table", report.target.format));
    });

    if let Err(e) = result {
        if let TableError::Region(region) = &e {
            display_mismatch(region);
        }
        reporter.fail(&e.to_string(), e.wants_fixit());
    }
}

fn cmd_docs_links(catalog: &Catalog, root: &Path, mode: PatchMode, reporter: &Reporter<'_>) {
    let Some(settings) = &catalog.docs_links else {
        return;
    };

    let result = run_docs_links_with(settings, root, mode, |outcome| {
        print_outcome(&outcome, "docs link");
    });

    if let Err(e) = result {
        if let DocsError::Region(region) = &e {
            display_mismatch(region);
        }
        reporter.fail(&e.to_string(), e.wants_fixit());
    }
}

fn print_outcome(outcome: &RegionOutcome, what: &str) {
    match outcome {
        RegionOutcome::Unchanged { file } => {
            println!("{} {}: up to date in {}", "⊙".yellow(), what, file.display());
        }
        RegionOutcome::Rewritten { file } => {
            println!("{} {}: rewritten in {}", "✓".green(), what, file.display());
        }
    }
}

/// Helper: Show the unified diff carried by a content mismatch
fn display_mismatch(error: &RegionError) {
    let RegionError::ContentMismatch { diff, .. } = error else {
        return;
    };

    for line in diff.lines() {
        let line = if line.starts_with("---") || line.starts_with("+++") {
            line.dimmed()
        } else if line.starts_with("@@") {
            line.cyan()
        } else if line.starts_with('-') {
            line.red()
        } else if line.starts_with('+') {
            line.green()
        } else {
            line.normal()
        };
        println!("{}", line);
    }
}

struct Reporter<'a> {
    config: &'a Path,
    annotate: bool,
}

impl Reporter<'_> {
    fn fail(&self, message: &str, fixit: bool) -> ! {
        let formatted = format_error(message, fixit, self.config);
        eprintln!("{}", formatted.red());

        if self.annotate {
            annotate_buildkite(&formatted);
        }

        std::process::exit(1);
    }
}

/// Best effort: without an agent there is nothing to annotate.
fn annotate_buildkite(message: &str) {
    let result = Command::new("buildkite-agent")
        .args([
            "annotate",
            "--style=error",
            "--context=demo_indexing",
            message,
        ])
        .status();

    if let Err(e) = result {
        tracing::debug!(error = %e, "buildkite-agent unavailable, skipping annotation");
    }
}
