//! External source formatting after a move.
//!
//! Rewrites leave import blocks unsorted and may leave unused imports behind;
//! a formatter such as `goimports` cleans both up.

use crate::error::{MoveError, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Default formatter program.
pub const DEFAULT_FORMATTER: &str = "goimports";

/// Formats one file in place.
///
/// Implementations must be safe to call from several worker threads.
pub trait Formatter: Sync {
    fn name(&self) -> &str;

    fn format(&self, path: &Path) -> Result<()>;
}

/// Runs `<program> -w <path>`.
#[derive(Debug, Clone)]
pub struct CommandFormatter {
    program: String,
}

impl CommandFormatter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Returns `true` if the program can be spawned at all.
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("-h")
            .output()
            .map(|_| true)
            .unwrap_or(false)
    }
}

impl Default for CommandFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_FORMATTER)
    }
}

impl Formatter for CommandFormatter {
    fn name(&self) -> &str {
        &self.program
    }

    fn format(&self, path: &Path) -> Result<()> {
        let output = Command::new(&self.program)
            .arg("-w")
            .arg(path)
            .output()
            .map_err(|e| MoveError::Formatter {
                path: path.to_path_buf(),
                message: format!("failed to run {}: {}", self.program, e),
            })?;

        if !output.status.success() {
            return Err(MoveError::Formatter {
                path: path.to_path_buf(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

/// Formats every path on the current rayon pool.
///
/// Failures are logged and returned; they never stop the other files.
pub fn format_all(formatter: &dyn Formatter, paths: &[PathBuf]) -> Vec<MoveError> {
    log::info!("Formatting {} file(s) with {}", paths.len(), formatter.name());

    paths
        .par_iter()
        .filter_map(|path| match formatter.format(path) {
            Ok(()) => {
                log::debug!("Formatted: {}", path.display());
                None
            }
            Err(e) => {
                log::warn!("{}", e);
                Some(e)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recording {
        seen: Mutex<Vec<PathBuf>>,
        fail_on: Option<PathBuf>,
    }

    impl Formatter for Recording {
        fn name(&self) -> &str {
            "recording"
        }

        fn format(&self, path: &Path) -> Result<()> {
            self.seen.lock().unwrap().push(path.to_path_buf());
            if self.fail_on.as_deref() == Some(path) {
                return Err(MoveError::Formatter {
                    path: path.to_path_buf(),
                    message: "syntax error".into(),
                });
            }
            Ok(())
        }
    }

    #[test]
    fn test_format_all_visits_every_path() {
        let formatter = Recording {
            seen: Mutex::new(Vec::new()),
            fail_on: None,
        };
        let paths = vec![PathBuf::from("a.go"), PathBuf::from("b.go")];

        let failures = format_all(&formatter, &paths);

        assert!(failures.is_empty());
        let mut seen = formatter.seen.into_inner().unwrap();
        seen.sort();
        assert_eq!(seen, paths);
    }

    #[test]
    fn test_format_all_collects_failures() {
        let formatter = Recording {
            seen: Mutex::new(Vec::new()),
            fail_on: Some(PathBuf::from("bad.go")),
        };
        let paths = vec![PathBuf::from("bad.go"), PathBuf::from("good.go")];

        let failures = format_all(&formatter, &paths);

        assert_eq!(failures.len(), 1);
        assert_eq!(formatter.seen.into_inner().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_program_is_unavailable() {
        let formatter = CommandFormatter::new("go-move-no-such-formatter");
        assert!(!formatter.is_available());
        assert!(matches!(
            formatter.format(Path::new("x.go")),
            Err(MoveError::Formatter { .. })
        ));
    }
}
