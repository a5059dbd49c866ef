//! Package and import-path facts for a single move, plus file classification.

use crate::error::{MoveError, Result};
use std::path::{Component, Path, PathBuf};

/// How a project file relates to the file being moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileRelationship {
    /// The moved file itself.
    IsMovedFile,
    /// Sibling in the directory the file leaves.
    SameDirectory,
    /// Resident of the directory the file enters.
    TargetDirectory,
    /// Anywhere else in the project.
    OtherDirectory,
}

impl FileRelationship {
    pub fn label(self) -> &'static str {
        match self {
            FileRelationship::IsMovedFile => "moved file",
            FileRelationship::SameDirectory => "same package",
            FileRelationship::TargetDirectory => "destination package",
            FileRelationship::OtherDirectory => "importer",
        }
    }
}

/// Everything derived from `(old_path, new_path)` that the rewrite needs.
///
/// Paths are lexically normalized and absolute; directory comparisons are
/// plain equality on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveFacts {
    pub root: PathBuf,
    pub module_name: String,
    pub old_path: PathBuf,
    pub new_path: PathBuf,
    pub old_dir: PathBuf,
    pub new_dir: PathBuf,
    pub old_package: String,
    pub new_package: String,
    pub old_import_path: String,
    pub new_import_path: String,
}

impl MoveFacts {
    pub fn new(root: &Path, module_name: &str, old_path: &Path, new_path: &Path) -> Result<Self> {
        let root = normalize_path(root)?;
        let old_path = normalize_path(old_path)?;
        let new_path = normalize_path(new_path)?;

        let old_dir = parent_dir(&old_path)?;
        let new_dir = parent_dir(&new_path)?;

        let old_relative = relative_to_root(&old_path, &root)?;
        let new_relative = relative_to_root(&new_path, &root)?;

        Ok(Self {
            old_package: dir_basename(&old_dir),
            new_package: dir_basename(&new_dir),
            old_import_path: import_path(module_name, &old_relative),
            new_import_path: import_path(module_name, &new_relative),
            module_name: module_name.to_string(),
            root,
            old_path,
            new_path,
            old_dir,
            new_dir,
        })
    }

    /// Classifies `path` against this move.
    ///
    /// A rename that stays inside one directory has no siblings or
    /// destination residents to fix up, so everything but the moved file is
    /// `OtherDirectory` (whose rewrite is then a no-op).
    pub fn classify(&self, path: &Path) -> FileRelationship {
        if path == self.old_path {
            return FileRelationship::IsMovedFile;
        }

        if self.is_same_directory() {
            return FileRelationship::OtherDirectory;
        }

        match path.parent() {
            Some(dir) if dir == self.old_dir => FileRelationship::SameDirectory,
            Some(dir) if dir == self.new_dir => FileRelationship::TargetDirectory,
            _ => FileRelationship::OtherDirectory,
        }
    }

    pub fn is_same_directory(&self) -> bool {
        self.old_dir == self.new_dir
    }

    pub fn package_changed(&self) -> bool {
        self.old_package != self.new_package
    }
}

/// Joins the module name and the directory part of a root-relative file path.
///
/// Always uses `/`, whatever the host separator. A file at the root maps to
/// the bare module name. With an empty module name the result is `/<dir>`.
pub fn import_path(module_name: &str, relative_path: &Path) -> String {
    let dirs: Vec<String> = relative_path
        .parent()
        .map(|dir| {
            dir.components()
                .filter_map(|c| match c {
                    Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    if dirs.is_empty() {
        module_name.to_string()
    } else {
        format!("{}/{}", module_name, dirs.join("/"))
    }
}

/// Makes `path` absolute and resolves `.` and `..` without touching the disk.
///
/// Symlinks are deliberately not followed.
pub fn normalize_path(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut normalized = PathBuf::new();

    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }

    Ok(normalized)
}

fn parent_dir(path: &Path) -> Result<PathBuf> {
    path.parent().map(Path::to_path_buf).ok_or_else(|| {
        MoveError::InvalidPath(path.display().to_string(), "has no parent directory".into())
    })
}

fn relative_to_root(path: &Path, root: &Path) -> Result<PathBuf> {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .map_err(|_| {
            MoveError::InvalidPath(
                path.display().to_string(),
                format!("is outside the project root {}", root.display()),
            )
        })
}

fn dir_basename(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts(old: &str, new: &str) -> MoveFacts {
        MoveFacts::new(
            Path::new("/work/proj"),
            "example.com/proj",
            &Path::new("/work/proj").join(old),
            &Path::new("/work/proj").join(new),
        )
        .unwrap()
    }

    #[test]
    fn test_derived_names_and_paths() {
        let f = facts("a/foo.go", "b/foo.go");
        assert_eq!(f.old_package, "a");
        assert_eq!(f.new_package, "b");
        assert_eq!(f.old_import_path, "example.com/proj/a");
        assert_eq!(f.new_import_path, "example.com/proj/b");
        assert!(f.package_changed());
        assert!(!f.is_same_directory());
    }

    #[test]
    fn test_nested_import_path() {
        let f = facts("internal/store/db.go", "pkg/sql/db.go");
        assert_eq!(f.old_import_path, "example.com/proj/internal/store");
        assert_eq!(f.new_import_path, "example.com/proj/pkg/sql");
        assert_eq!(f.new_package, "sql");
    }

    #[test]
    fn test_import_path_empty_module() {
        assert_eq!(import_path("", Path::new("a/foo.go")), "/a");
        assert_eq!(import_path("", Path::new("x/y/foo.go")), "/x/y");
    }

    #[test]
    fn test_import_path_root_file() {
        assert_eq!(import_path("example.com/m", Path::new("main.go")), "example.com/m");
    }

    #[test]
    fn test_classify_four_ways() {
        let f = facts("a/foo.go", "b/foo.go");
        let root = Path::new("/work/proj");
        assert_eq!(f.classify(&root.join("a/foo.go")), FileRelationship::IsMovedFile);
        assert_eq!(f.classify(&root.join("a/bar.go")), FileRelationship::SameDirectory);
        assert_eq!(f.classify(&root.join("b/baz.go")), FileRelationship::TargetDirectory);
        assert_eq!(f.classify(&root.join("c/main.go")), FileRelationship::OtherDirectory);
        assert_eq!(f.classify(&root.join("a/sub/x.go")), FileRelationship::OtherDirectory);
    }

    #[test]
    fn test_classify_rename_in_place() {
        let f = facts("a/foo.go", "a/renamed.go");
        let root = Path::new("/work/proj");
        assert!(f.is_same_directory());
        assert!(!f.package_changed());
        assert_eq!(f.classify(&root.join("a/foo.go")), FileRelationship::IsMovedFile);
        assert_eq!(f.classify(&root.join("a/bar.go")), FileRelationship::OtherDirectory);
    }

    #[test]
    fn test_normalize_resolves_dots() {
        let p = normalize_path(Path::new("/work/proj/a/../b/./foo.go")).unwrap();
        assert_eq!(p, PathBuf::from("/work/proj/b/foo.go"));
    }

    #[test]
    fn test_outside_root_is_rejected() {
        let result = MoveFacts::new(
            Path::new("/work/proj"),
            "m",
            Path::new("/elsewhere/a/foo.go"),
            Path::new("/work/proj/b/foo.go"),
        );
        assert!(matches!(result, Err(MoveError::InvalidPath(_, _))));
    }
}
