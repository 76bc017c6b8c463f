//! Report folder layout: the gold, current, and diff artifact areas.

use std::fs;
use std::path::{Path, PathBuf};

use crate::result::{CotejarError, CotejarResult};

/// Folder layout of a report root.
///
/// Maps each capture id to three artifact paths:
///
/// ```text
/// <root>/gold/<id>.png      accepted reference, populated out-of-band
/// <root>/current/<id>.png   image produced by the current run
/// <root>/diff/<id>.png      pixel-difference visualization
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLayout {
    root: PathBuf,
    gold: PathBuf,
    current: PathBuf,
    diff: PathBuf,
}

impl ReportLayout {
    /// Create a layout rooted at the given directory (no filesystem access)
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let gold = root.join("gold");
        let current = root.join("current");
        let diff = root.join("diff");
        Self {
            root,
            gold,
            current,
            diff,
        }
    }

    /// Create the root and the three artifact directories if absent.
    ///
    /// Idempotent: a no-op when they already exist. Never deletes or
    /// truncates existing content.
    ///
    /// # Errors
    ///
    /// Returns [`CotejarError::Layout`] when a directory cannot be created;
    /// the session cannot proceed without a writable layout.
    pub fn ensure(&self) -> CotejarResult<()> {
        for dir in [&self.root, &self.gold, &self.current, &self.diff] {
            fs::create_dir_all(dir).map_err(|source| CotejarError::Layout {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Report root directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Gold (accepted reference) directory
    #[must_use]
    pub fn gold_dir(&self) -> &Path {
        &self.gold
    }

    /// Current-run directory
    #[must_use]
    pub fn current_dir(&self) -> &Path {
        &self.current
    }

    /// Diff visualization directory
    #[must_use]
    pub fn diff_dir(&self) -> &Path {
        &self.diff
    }

    /// Gold reference path for a capture id
    #[must_use]
    pub fn gold_path(&self, id: &str) -> PathBuf {
        self.gold.join(format!("{id}.png"))
    }

    /// Current-run path for a capture id
    #[must_use]
    pub fn current_path(&self, id: &str) -> PathBuf {
        self.current.join(format!("{id}.png"))
    }

    /// Diff visualization path for a capture id
    #[must_use]
    pub fn diff_path(&self, id: &str) -> PathBuf {
        self.diff.join(format!("{id}.png"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_creates_all_areas() {
        let root = tempfile::tempdir().unwrap();
        let layout = ReportLayout::new(root.path().join("report"));
        layout.ensure().unwrap();

        assert!(layout.root().is_dir());
        assert!(layout.gold_dir().is_dir());
        assert!(layout.current_dir().is_dir());
        assert!(layout.diff_dir().is_dir());
    }

    #[test]
    fn test_ensure_is_idempotent_and_preserves_content() {
        let root = tempfile::tempdir().unwrap();
        let layout = ReportLayout::new(root.path().join("report"));
        layout.ensure().unwrap();

        let kept = layout.gold_dir().join("kept.png");
        fs::write(&kept, b"reference").unwrap();

        layout.ensure().unwrap();
        assert_eq!(fs::read(&kept).unwrap(), b"reference");
    }

    #[test]
    fn test_artifact_paths_follow_id() {
        let layout = ReportLayout::new("/tmp/report");
        assert_eq!(
            layout.gold_path("header"),
            PathBuf::from("/tmp/report/gold/header.png")
        );
        assert_eq!(
            layout.current_path("header"),
            PathBuf::from("/tmp/report/current/header.png")
        );
        assert_eq!(
            layout.diff_path("header"),
            PathBuf::from("/tmp/report/diff/header.png")
        );
    }

    #[test]
    fn test_ensure_fails_on_unwritable_root() {
        // A file standing where a directory must go makes create_dir_all fail.
        let root = tempfile::tempdir().unwrap();
        let blocked = root.path().join("report");
        fs::write(&blocked, b"not a directory").unwrap();

        let layout = ReportLayout::new(&blocked);
        let err = layout.ensure().unwrap_err();
        assert!(matches!(err, CotejarError::Layout { .. }));
    }
}
