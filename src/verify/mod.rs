//! Validation and confirmation for move operations.

pub mod preflight;
pub mod prompt;
pub mod rules;

pub use preflight::preflight_checks;
pub use prompt::{AutoConfirm, Confirmation, TerminalPrompt};
pub use rules::{is_go_identifier, validate_go_source_path, validate_path_within_root};
