//! Go project facts.
//!
//! This module answers the questions a move needs before any text is
//! rewritten. It is split into three concerns:
//!
//! - **`module`**: Reading the module name from `go.mod`
//! - **`symbols`**: Top-level names declared by the moved file
//! - **`locate`**: Package names, import paths and file classification
//!
//! Nothing here writes to disk.

pub mod locate;
pub mod module;
pub mod symbols;

pub use locate::{FileRelationship, MoveFacts, import_path, normalize_path};
pub use module::{find_project_root, read_module_name};
pub use symbols::extract_symbols;
