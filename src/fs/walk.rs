//! Go source file enumeration.

use crate::golang::module::GO_MOD;
use std::path::{Path, PathBuf};

/// Returns every `.go` file under `root`, sorted.
///
/// Honors `.gitignore`, skips hidden entries and `vendor/`, and does not
/// descend into nested modules (directories with their own `go.mod`).
pub fn go_source_files(root: &Path) -> Vec<PathBuf> {
    let walker = ignore::WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .git_exclude(true)
        .git_global(true)
        .require_git(false)
        .filter_entry(|e| {
            let is_dir = e.file_type().is_some_and(|ft| ft.is_dir());
            if !is_dir || e.depth() == 0 {
                return true;
            }

            let name = e.file_name().to_str();
            if name == Some("vendor") || name == Some(".git") {
                return false;
            }

            // Nested module
            !e.path().join(GO_MOD).is_file()
        })
        .build();

    let mut files = Vec::new();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::debug!("Skipping entry due to error: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        if entry.path().extension().and_then(|s| s.to_str()) == Some("go") {
            files.push(entry.into_path());
        }
    }

    files.sort();
    log::debug!("Found {} Go files under {}", files.len(), root.display());
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "package x\n").unwrap();
    }

    #[test]
    fn test_collects_go_files_only() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "a/foo.go");
        touch(temp.path(), "a/README.md");
        touch(temp.path(), "main.go");

        let files = go_source_files(temp.path());
        assert_eq!(
            files,
            vec![temp.path().join("a/foo.go"), temp.path().join("main.go")]
        );
    }

    #[test]
    fn test_skips_vendor_hidden_and_nested_modules() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "a/foo.go");
        touch(temp.path(), "vendor/dep/dep.go");
        touch(temp.path(), ".cache/x.go");
        touch(temp.path(), "tools/tool.go");
        fs::write(temp.path().join("tools/go.mod"), "module tools\n").unwrap();

        let files = go_source_files(temp.path());
        assert_eq!(files, vec![temp.path().join("a/foo.go")]);
    }

    #[test]
    fn test_honors_gitignore() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "a/foo.go");
        touch(temp.path(), "gen/out.go");
        fs::write(temp.path().join(".gitignore"), "gen/\n").unwrap();

        let files = go_source_files(temp.path());
        assert_eq!(files, vec![temp.path().join("a/foo.go")]);
    }
}
