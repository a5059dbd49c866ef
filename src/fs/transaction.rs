//! Staged file system changes for a move.
//!
//! Coordinates the content updates and the single file move that make up one
//! operation.
//!
//! ## Execution Guarantees
//!
//! - **Ordering**: File updates before the file move (the moved file is
//!   rewritten in place, then relocated)
//! - **Isolation**: A failed write is recorded for that file only; the
//!   remaining operations still run
//! - **Idempotency**: Files with unchanged content are never staged
//!
//! There is no rollback. Writes that succeeded stay on disk even when a
//! later operation fails.
//!
//! ## Example
//!
//! ```no_run
//! # use go_move::fs::Transaction;
//! # use std::path::PathBuf;
//! # fn example() -> go_move::error::Result<()> {
//! let mut txn = Transaction::new(false);
//!
//! txn.update_file(PathBuf::from("a/bar.go"), "package a\n".into(), "package b\n".into());
//! txn.move_file(PathBuf::from("a/foo.go"), PathBuf::from("b/foo.go"))?;
//!
//! let report = txn.commit()?;
//! assert!(report.failures.is_empty());
//! # Ok(())
//! # }
//! ```

use crate::error::{MoveError, Result};

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// A file system operation staged for commit.
#[derive(Debug, Clone)]
pub enum Operation {
    /// Replace file contents.
    UpdateFile { path: PathBuf, new: String },
    /// Relocate a file.
    ///
    /// Uses a rename, falling back to copy and delete across filesystems.
    MoveFile { from: PathBuf, to: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransactionState {
    /// Staging operations.
    Building,
    /// Commit ran (possibly with per-file failures).
    Committed,
}

/// A file that could not be written or moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub message: String,
}

/// What a commit actually did.
#[derive(Debug, Clone, Default)]
pub struct CommitReport {
    /// Files whose content changed, at their final location.
    pub written: BTreeSet<PathBuf>,
    /// `(from, to)` when the file move went through.
    pub moved: Option<(PathBuf, PathBuf)>,
    pub failures: Vec<FileFailure>,
}

/// Staged operations for one move.
///
/// Must be explicitly committed. If dropped with staged operations, logs a
/// warning (nothing was applied).
///
/// ## Dry-Run Mode
///
/// When `dry_run = true`, operations are staged and reported but never
/// executed.
#[must_use = "Transaction must be committed"]
pub struct Transaction {
    operations: Vec<Operation>,
    dry_run: bool,
    state: TransactionState,
    /// Where a file ends up after the move, for reporting.
    path_redirects: HashMap<PathBuf, PathBuf>,
}

impl Transaction {
    /// Creates a new transaction.
    pub fn new(dry_run: bool) -> Self {
        Self {
            operations: Vec::new(),
            dry_run,
            state: TransactionState::Building,
            path_redirects: HashMap::new(),
        }
    }

    /// Stages a content update.
    ///
    /// `original` is the content the rewrite started from; an update that
    /// changes nothing is skipped.
    pub fn update_file(&mut self, path: PathBuf, original: String, new: String) {
        if original == new {
            log::debug!("File content unchanged, skipping: {}", path.display());
            return;
        }

        if self.dry_run {
            log::info!("Would update: {}", path.display());
        } else {
            log::debug!("Staging update for: {}", path.display());
        }

        self.operations.push(Operation::UpdateFile { path, new });
    }

    /// Stages relocating `from` to `to`.
    ///
    /// Fails right away if `to` already exists.
    pub fn move_file(&mut self, from: PathBuf, to: PathBuf) -> Result<()> {
        if to.exists() {
            return Err(MoveError::DestinationExists(to));
        }

        if self.dry_run {
            log::info!("Would move: {} → {}", from.display(), to.display());
        }

        self.path_redirects.insert(from.clone(), to.clone());
        self.operations.push(Operation::MoveFile { from, to });
        Ok(())
    }

    /// Applies all staged operations: every update first, then moves.
    ///
    /// Per-file errors are collected into the report rather than returned.
    /// Only calling `commit` twice is an error.
    pub fn commit(&mut self) -> Result<CommitReport> {
        if self.state == TransactionState::Committed {
            return Err(MoveError::Other(anyhow::anyhow!(
                "Transaction already committed"
            )));
        }
        self.state = TransactionState::Committed;

        let mut report = CommitReport::default();

        if self.dry_run {
            for op in &self.operations {
                match op {
                    Operation::UpdateFile { path, .. } => {
                        report.written.insert(self.final_path(path));
                    }
                    Operation::MoveFile { from, to } => {
                        report.moved = Some((from.clone(), to.clone()));
                    }
                }
            }
            return Ok(report);
        }

        let (updates, moves): (Vec<_>, Vec<_>) = self
            .operations
            .iter()
            .partition(|op| matches!(op, Operation::UpdateFile { .. }));

        let mut updated = Vec::new();
        for op in updates {
            if let Operation::UpdateFile { path, new } = op {
                match fs::write(path, new) {
                    Ok(()) => {
                        log::debug!("Updated: {}", path.display());
                        updated.push(path.clone());
                    }
                    Err(e) => {
                        log::error!("Failed to write {}: {}", path.display(), e);
                        report.failures.push(FileFailure {
                            path: path.clone(),
                            message: format!("write failed: {}", e),
                        });
                    }
                }
            }
        }

        let mut moved_ok = HashMap::new();
        for op in moves {
            if let Operation::MoveFile { from, to } = op {
                match Self::relocate(from, to) {
                    Ok(()) => {
                        log::info!("Moved: {} → {}", from.display(), to.display());
                        moved_ok.insert(from.clone(), to.clone());
                        report.moved = Some((from.clone(), to.clone()));
                    }
                    Err(e) => {
                        log::error!("Failed to move {}: {}", from.display(), e);
                        report.failures.push(FileFailure {
                            path: from.clone(),
                            message: format!("move failed: {}", e),
                        });
                    }
                }
            }
        }

        report.written = updated
            .into_iter()
            .map(|p| moved_ok.get(&p).cloned().unwrap_or(p))
            .collect();

        Ok(report)
    }

    fn relocate(from: &Path, to: &Path) -> std::io::Result<()> {
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent)?;
        }

        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(e) => {
                log::debug!(
                    "Rename failed ({}), falling back to copy: {}",
                    e,
                    from.display()
                );
                fs::copy(from, to)?;
                fs::remove_file(from)
            }
        }
    }

    fn final_path(&self, path: &Path) -> PathBuf {
        self.path_redirects
            .get(path)
            .cloned()
            .unwrap_or_else(|| path.to_path_buf())
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if self.state == TransactionState::Building && !self.operations.is_empty() && !self.dry_run
        {
            log::warn!("Transaction dropped without commit - changes were not applied");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_transaction() {
        let txn = Transaction::new(false);
        assert!(txn.is_empty());
        assert_eq!(txn.len(), 0);
    }

    #[test]
    fn test_update_file_no_change_skips() {
        let mut txn = Transaction::new(false);
        txn.update_file("x.go".into(), "same".into(), "same".into());
        assert!(txn.is_empty());
    }

    #[test]
    fn test_move_file_existing_target_fails() {
        let temp = TempDir::new().unwrap();
        let from = temp.path().join("foo.go");
        let to = temp.path().join("bar.go");
        fs::write(&from, "package a\n").unwrap();
        fs::write(&to, "package a\n").unwrap();

        let mut txn = Transaction::new(false);
        let result = txn.move_file(from, to);

        assert!(matches!(result, Err(MoveError::DestinationExists(_))));
    }

    #[test]
    fn test_dry_run_does_not_modify_files() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("bar.go");
        let moved = temp.path().join("foo.go");
        let target = temp.path().join("b/foo.go");
        fs::write(&file, "package a\n").unwrap();
        fs::write(&moved, "package a\n").unwrap();

        let mut txn = Transaction::new(true);
        txn.update_file(file.clone(), "package a\n".into(), "package b\n".into());
        txn.move_file(moved.clone(), target.clone()).unwrap();
        let report = txn.commit().unwrap();

        assert_eq!(fs::read_to_string(&file).unwrap(), "package a\n");
        assert!(moved.exists());
        assert!(!target.exists());
        assert!(report.written.contains(&file));
        assert_eq!(report.moved, Some((moved, target)));
    }

    #[test]
    fn test_commit_updates_then_moves() {
        let temp = TempDir::new().unwrap();
        let from = temp.path().join("a/foo.go");
        let to = temp.path().join("b/nested/foo.go");
        fs::create_dir_all(from.parent().unwrap()).unwrap();
        fs::write(&from, "package a\n").unwrap();

        let mut txn = Transaction::new(false);
        txn.update_file(from.clone(), "package a\n".into(), "package nested\n".into());
        txn.move_file(from.clone(), to.clone()).unwrap();
        assert_eq!(txn.len(), 2);

        let report = txn.commit().unwrap();

        assert!(!from.exists());
        assert_eq!(fs::read_to_string(&to).unwrap(), "package nested\n");
        assert!(report.written.contains(&to));
        assert!(!report.written.contains(&from));
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_commit_twice_fails() {
        let mut txn = Transaction::new(true);
        txn.commit().unwrap();
        assert!(txn.commit().is_err());
    }

    #[test]
    fn test_failed_write_does_not_stop_others() {
        let temp = TempDir::new().unwrap();
        let good = temp.path().join("good.go");
        let missing_dir = temp.path().join("gone/bad.go");
        fs::write(&good, "package a\n").unwrap();

        let mut txn = Transaction::new(false);
        txn.update_file(missing_dir.clone(), "package a\n".into(), "package b\n".into());
        txn.update_file(good.clone(), "package a\n".into(), "package b\n".into());

        let report = txn.commit().unwrap();

        assert_eq!(fs::read_to_string(&good).unwrap(), "package b\n");
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, missing_dir);
        assert_eq!(report.written.len(), 1);
    }
}
