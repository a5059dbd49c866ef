//! Pre-flight checks performed before executing a move.
//!
//! Unlike `rules`, these functions touch the file system.

use crate::error::{MoveError, Result};
use crate::verify::rules::{
    check_package_dir_name, validate_go_source_path, validate_path_within_root,
};
use std::path::Path;

/// Validates a move request before anything is read or rewritten.
///
/// # Checks Performed
///
/// 1. Both paths name `.go` files
/// 2. Source exists and is a regular file
/// 3. Destination does not exist (skipped with `refs_only`, where the
///    caller moves the file itself and may already have done so)
/// 4. Both paths lie inside the project root
/// 5. Destination directory name is a usable package name (warning only)
///
/// All paths must already be normalized.
///
/// # Errors
///
/// Returns the first validation error encountered.
pub fn preflight_checks(old_path: &Path, new_path: &Path, root: &Path, refs_only: bool) -> Result<()> {
    validate_go_source_path(old_path)?;
    validate_go_source_path(new_path)?;

    if !refs_only {
        if !old_path.is_file() {
            return Err(MoveError::SourceNotFound(old_path.to_path_buf()));
        }

        if new_path.exists() {
            return Err(MoveError::DestinationExists(new_path.to_path_buf()));
        }
    } else if !old_path.is_file() && !new_path.is_file() {
        return Err(MoveError::SourceNotFound(old_path.to_path_buf()));
    }

    validate_path_within_root(old_path, root)?;
    validate_path_within_root(new_path, root)?;

    if old_path == new_path {
        return Err(MoveError::InvalidPath(
            new_path.display().to_string(),
            "Source and destination are the same file".to_string(),
        ));
    }

    if let Some(parent) = new_path.parent() {
        check_package_dir_name(parent);

        if !parent.exists() {
            log::info!("Directory '{}' will be created", parent.display());
        }
    }

    Ok(())
}
