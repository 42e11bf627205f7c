//! Integration tests for the command-line interface

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const CATALOG: &str = r#"
[meta]
name = "demos"

[[columns]]
key = "algorithm"
text = "Algorithm"

[[columns]]
key = "nc"
text = "Node classification"

[[records]]
algorithm = "GCN"
nc = { link = "gcn" }

[[targets]]
format = "html"
file = "demos/README.md"

[docs_links]
root = "demos"
url_base = "https://example.io/en/stable"
"#;

const README: &str = "# Demos\n\
<!-- DEMO TABLE MARKER -->\n\
\n\
<!-- DEMO TABLE MARKER -->\n\
Browse the demos below.\n\
<!-- DOCS LINKS -->\n\
\n\
<!-- DOCS LINKS -->\n";

/// Helper to create a project with a catalog, one README and its docs page
fn setup_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("demos")).unwrap();
    fs::create_dir_all(dir.path().join("docs/demos")).unwrap();

    fs::write(dir.path().join("demo-indexer.toml"), CATALOG).unwrap();
    fs::write(dir.path().join("demos/README.md"), README).unwrap();
    fs::write(dir.path().join("demos/gcn.ipynb"), "{}").unwrap();
    fs::write(dir.path().join("docs/demos/index.txt"), "").unwrap();

    dir
}

fn run(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_demo-indexer"))
        .arg("--root")
        .arg(root)
        .args(args)
        .env("NO_COLOR", "1")
        .env("CLICOLOR", "0")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_demo-indexer"))
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--action"));
    assert!(stdout.contains("--config"));
}

#[test]
fn test_compare_fails_on_stale_table() {
    let dir = setup_project();

    let output = run(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("+++ autogenerated expected contents"));
    assert!(stderr.contains("Error while generating information for documentation: "));
    assert!(stderr.contains("--action=overwrite"));
    assert_eq!(
        fs::read_to_string(dir.path().join("demos/README.md")).unwrap(),
        README
    );
}

#[test]
fn test_overwrite_then_compare() {
    let dir = setup_project();

    let output = run(dir.path(), &["--action", "overwrite"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("html table: rewritten"));
    assert!(stdout.contains("docs link: rewritten"));

    let readme = fs::read_to_string(dir.path().join("demos/README.md")).unwrap();
    assert!(readme.contains("<a href='gcn.ipynb'>demo</a>"));
    assert!(readme.contains("https://example.io/en/stable/demos/"));

    let output = run(dir.path(), &["--action", "compare"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("html table: up to date"));
}

#[test]
fn test_no_docs_links_skips_readme_links() {
    let dir = setup_project();

    let output = run(dir.path(), &["--action", "overwrite", "--no-docs-links"]);
    assert!(output.status.success());

    let readme = fs::read_to_string(dir.path().join("demos/README.md")).unwrap();
    assert!(readme.ends_with("<!-- DOCS LINKS -->\n\n<!-- DOCS LINKS -->\n"));
}

#[test]
fn test_missing_config() {
    let dir = TempDir::new().unwrap();

    let output = run(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("demo-indexer.toml"));
    assert!(!stderr.contains("--action=overwrite"));
}

#[test]
fn test_invalid_action() {
    let dir = setup_project();

    let output = run(dir.path(), &["--action", "replace"]);

    assert!(!output.status.success());
}

#[test]
fn test_earlier_targets_reported_before_failure() {
    let dir = setup_project();
    let catalog = CATALOG.replace(
        "[docs_links]",
        "[[targets]]\nformat = \"html\"\nfile = \"demos/OTHER.md\"\n\n[docs_links]",
    );
    fs::write(dir.path().join("demo-indexer.toml"), catalog).unwrap();
    fs::write(dir.path().join("demos/OTHER.md"), "no markers here\n").unwrap();

    let output = run(dir.path(), &["--action", "overwrite"]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("html table: rewritten"));
    assert!(stdout.contains("README.md"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("OTHER.md"));
}

#[cfg(unix)]
mod annotate {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// A stand-in `buildkite-agent` that records its arguments, NUL-separated
    fn fake_agent(bin: &Path, record: &Path) {
        let script = format!(
            "#!/bin/sh\nprintf '%s\\0' \"$@\" > '{}'\n",
            record.display()
        );
        let agent = bin.join("buildkite-agent");
        fs::write(&agent, script).unwrap();
        fs::set_permissions(&agent, fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn run_with_path(root: &Path, path: &Path, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_demo-indexer"))
            .arg("--root")
            .arg(root)
            .args(args)
            .env("NO_COLOR", "1")
            .env("CLICOLOR", "0")
        .env("CLICOLOR", "0")
            .env("PATH", path)
            .env_remove("RUST_LOG")
            .output()
            .unwrap()
    }

    #[test]
    fn test_annotate_passes_full_message() {
        let dir = setup_project();
        let bin = TempDir::new().unwrap();
        let record = bin.path().join("argv");
        fake_agent(bin.path(), &record);

        let output = run_with_path(dir.path(), bin.path(), &["--annotate"]);

        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&output.stderr);
        let recorded = fs::read_to_string(&record).unwrap();
        let argv: Vec<&str> = recorded.split_terminator('\0').collect();

        assert_eq!(argv.len(), 4);
        assert_eq!(
            argv[..3],
            ["annotate", "--style=error", "--context=demo_indexing"]
        );
        assert!(argv[3].starts_with("Error while generating information for documentation: "));
        assert!(argv[3].contains("--action=overwrite"));
        assert_eq!(argv[3], stderr.trim_end_matches('\n'));
    }

    #[test]
    fn test_annotate_without_agent_is_quiet() {
        let dir = setup_project();
        let empty = TempDir::new().unwrap();

        let output = run_with_path(dir.path(), empty.path(), &["--annotate"]);

        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.starts_with("Error while generating information for documentation: "));
        assert!(!stderr.contains("buildkite"));
        assert_eq!(stderr.matches("Error while generating").count(), 1);
    }

    #[test]
    fn test_no_annotation_without_flag() {
        let dir = setup_project();
        let bin = TempDir::new().unwrap();
        let record = bin.path().join("argv");
        fake_agent(bin.path(), &record);

        let output = run_with_path(dir.path(), bin.path(), &[]);

        assert_eq!(output.status.code(), Some(1));
        assert!(!record.exists());
    }
}
