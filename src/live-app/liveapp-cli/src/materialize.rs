//! Copy a bundled template tree into a new project directory.

use anyhow::{Context, Result};
use liveapp_manifest::Error;
use regex::RegexSet;
use std::path::Path;
use walkdir::WalkDir;

/// Paths never copied out of a template, matched against the logical path
/// `templates/<template-id>/<relative-path>`.
const EXCLUDED_PATTERNS: [&str; 2] = [
    // version control metadata, at any depth
    r"(^|/)\.git(/|$)",
    // dependency cache installed directly under a template
    r"(^|/)templates/\w+/node_modules(/|$)",
];

/// Counts reported after a copy.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CopySummary {
    pub files: usize,
    pub directories: usize,
    pub skipped: usize,
}

/// Matches template paths that must not be copied.
pub struct Exclusions {
    patterns: RegexSet,
}

impl Exclusions {
    pub fn new() -> Result<Self> {
        let patterns =
            RegexSet::new(EXCLUDED_PATTERNS).context("Failed to compile exclusion patterns")?;
        Ok(Self { patterns })
    }

    /// True if the logical path (`/`-separated) is excluded.
    pub fn is_excluded(&self, logical_path: &str) -> bool {
        self.patterns.is_match(logical_path)
    }
}

/// Logical path of a template entry: `templates/<id>/<relative>`.
pub fn logical_path(template_id: &str, relative: &Path) -> String {
    let mut logical = format!("templates/{template_id}");
    for component in relative.components() {
        logical.push('/');
        logical.push_str(&component.as_os_str().to_string_lossy());
    }
    logical
}

/// Recursively copy `template_dir` to `destination`.
///
/// Symlinks are followed and copied as regular files and directories.
/// Excluded paths are pruned together with everything beneath them. The
/// destination must not exist yet.
pub fn copy_template(
    template_dir: &Path,
    template_id: &str,
    destination: &Path,
) -> Result<CopySummary> {
    if !template_dir.is_dir() {
        return Err(Error::TemplateNotFound {
            id: template_id.to_string(),
            path: template_dir.display().to_string(),
        }
        .into());
    }
    if destination.symlink_metadata().is_ok() {
        return Err(Error::DestinationExists {
            path: destination.display().to_string(),
        }
        .into());
    }

    let exclusions = Exclusions::new()?;
    let mut summary = CopySummary::default();
    let mut skipped = 0;

    let walker = WalkDir::new(template_dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let Ok(relative) = entry.path().strip_prefix(template_dir) else {
                return true;
            };
            let logical = logical_path(template_id, relative);
            if exclusions.is_excluded(&logical) {
                tracing::debug!(path = %logical, "skipping excluded template path");
                skipped += 1;
                return false;
            }
            true
        });

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(template_dir).to_path_buf();
            Error::io(&path, e.into())
        })?;
        let relative = entry
            .path()
            .strip_prefix(template_dir)
            .with_context(|| format!("{} is outside the template", entry.path().display()))?;
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
            if !relative.as_os_str().is_empty() {
                summary.directories += 1;
            }
        } else {
            std::fs::copy(entry.path(), &target).map_err(|e| Error::io(&target, e))?;
            tracing::trace!(path = %relative.display(), "copied");
            summary.files += 1;
        }
    }

    summary.skipped = skipped;
    tracing::info!(
        template = template_id,
        destination = %destination.display(),
        files = summary.files,
        skipped = summary.skipped,
        "materialized template"
    );
    Ok(summary)
}
