//! Validation rules for move paths.
//!
//! Pure functions with no I/O or side effects.

use crate::error::{MoveError, Result};
use std::path::Path;

/// Go keywords, which cannot be package names.
const GO_KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

/// Requires a `.go` extension.
pub fn validate_go_source_path(path: &Path) -> Result<()> {
    if path.extension().and_then(|e| e.to_str()) != Some("go") {
        return Err(MoveError::NotGoSource(path.to_path_buf()));
    }
    Ok(())
}

/// Requires `path` to lie under `root`.
///
/// Both paths must already be normalized; no symlinks are resolved.
pub fn validate_path_within_root(path: &Path, root: &Path) -> Result<()> {
    if !path.starts_with(root) {
        return Err(MoveError::InvalidPath(
            path.display().to_string(),
            format!("Outside project root '{}'", root.display()),
        ));
    }
    Ok(())
}

/// Returns `true` if `name` is usable as a Go package name.
///
/// ## Rules
/// - Starts with a letter or `_`
/// - Contains only letters, digits and `_`
/// - Not a keyword
pub fn is_go_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    if !first.is_alphabetic() && first != '_' {
        return false;
    }

    if !chars.all(|c| c.is_alphanumeric() || c == '_') {
        return false;
    }

    !GO_KEYWORDS.contains(&name)
}

/// Warns when the destination directory name cannot serve as a package name.
///
/// Non-fatal: the moved file's package clause will carry the directory name
/// anyway, and the user can fix it afterwards.
pub fn check_package_dir_name(dir: &Path) {
    let Some(name) = dir.file_name().and_then(|n| n.to_str()) else {
        return;
    };

    if !is_go_identifier(name) {
        log::warn!(
            "'{}' is not a valid Go package name; the moved file will not compile as is",
            name
        );
    } else if name.chars().any(|c| c.is_uppercase()) {
        log::warn!("'{}' has uppercase (convention: lowercase package names)", name);
    }
}
