use similar::TextDiff;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Header naming the "new" side of a region diff.
pub const EXPECTED_DIFF_HEADER: &str = "autogenerated expected contents";

/// What to do with a managed region whose contents are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PatchMode {
    /// Fail with a diff if the region differs.
    #[default]
    Compare,
    /// Replace the region in place.
    Overwrite,
}

impl fmt::Display for PatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchMode::Compare => f.write_str("compare"),
            PatchMode::Overwrite => f.write_str("overwrite"),
        }
    }
}

/// A file split into the hand-written prefix, the managed region and the
/// hand-written suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitRegion<'a> {
    pub prefix: &'a str,
    pub middle: &'a str,
    pub suffix: &'a str,
}

impl<'a> SplitRegion<'a> {
    /// Split `contents` on `separator`, which must occur exactly twice.
    ///
    /// Returns the number of occurrences found on failure. An empty separator
    /// delimits nothing and is never found.
    pub fn split(contents: &'a str, separator: &str) -> Result<Self, usize> {
        if separator.is_empty() {
            return Err(0);
        }
        let parts: Vec<&str> = contents.split(separator).collect();
        match parts[..] {
            [prefix, middle, suffix] => Ok(Self {
                prefix,
                middle,
                suffix,
            }),
            _ => Err(parts.len() - 1),
        }
    }

    /// Reassemble the file with `middle` as the managed region.
    pub fn join(&self, separator: &str, middle: &str) -> String {
        [self.prefix, separator, middle, separator, self.suffix].concat()
    }
}

#[derive(Error, Debug)]
pub enum RegionError {
    #[error(
        "expected exactly two instances of the separator on their own lines in `{}`, \
         found {found} instances. Separator should be:\n\n{}",
        .file.display(),
        indent_block(.separator)
    )]
    SeparatorCount {
        file: PathBuf,
        found: usize,
        separator: String,
    },

    #[error(
        "existing {label} in `{}` differs to generated {label}; was it edited manually?",
        .file.display()
    )]
    ContentMismatch {
        file: PathBuf,
        label: String,
        /// Unified diff from the on-disk region to the generated one.
        diff: String,
    },

    #[error("I/O error on `{}`: {source}", .file.display())]
    Io {
        file: PathBuf,
        source: std::io::Error,
    },
}

fn indent_block(separator: &str) -> String {
    separator
        .trim()
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("    {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Result of reconciling one managed region.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "RegionOutcome should be checked for unchanged/rewritten"]
pub enum RegionOutcome {
    /// The region already matched; the file was not touched.
    Unchanged { file: PathBuf },
    /// The region was replaced.
    Rewritten { file: PathBuf },
}

/// Compare or overwrite the region of `file` delimited by `separator`.
///
/// The file is either rewritten completely or left untouched; the prefix and
/// suffix around the region are preserved byte for byte.
pub fn patch_region(
    file: &Path,
    separator: &str,
    new_middle: &str,
    mode: PatchMode,
    label: &str,
) -> Result<RegionOutcome, RegionError> {
    let io_err = |source| RegionError::Io {
        file: file.to_path_buf(),
        source,
    };

    let contents = fs::read_to_string(file).map_err(io_err)?;
    let split = SplitRegion::split(&contents, separator).map_err(|found| {
        RegionError::SeparatorCount {
            file: file.to_path_buf(),
            found,
            separator: separator.to_string(),
        }
    })?;

    if split.middle == new_middle {
        debug!(file = %file.display(), label, "region up to date");
        return Ok(RegionOutcome::Unchanged {
            file: file.to_path_buf(),
        });
    }

    match mode {
        PatchMode::Compare => Err(RegionError::ContentMismatch {
            file: file.to_path_buf(),
            label: label.to_string(),
            diff: unified_diff(file, split.middle, new_middle),
        }),
        PatchMode::Overwrite => {
            let new_contents = split.join(separator, new_middle);
            atomic_write(file, new_contents.as_bytes()).map_err(io_err)?;
            info!(file = %file.display(), label, "rewrote region");
            Ok(RegionOutcome::Rewritten {
                file: file.to_path_buf(),
            })
        }
    }
}

/// Line-level unified diff from `current` to `expected`.
pub fn unified_diff(file: &Path, current: &str, expected: &str) -> String {
    let diff = TextDiff::from_lines(current, expected);
    let mut unified = diff.unified_diff();
    unified.header(&file.display().to_string(), EXPECTED_DIFF_HEADER);
    unified.to_string()
}

/// Atomic file write: tempfile + fsync + rename.
///
/// Either the full write succeeds or nothing changes.
fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    // same directory so the rename stays on one filesystem
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;

    // keep the original permissions
    if let Ok(metadata) = fs::metadata(path) {
        temp.as_file().set_permissions(metadata.permissions())?;
    }

    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
