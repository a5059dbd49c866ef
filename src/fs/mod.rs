//! File system access for move operations.
//!
//! Provides project enumeration and staged file operations that are applied
//! together at commit time.

pub mod transaction;
pub mod walk;

pub use transaction::{CommitReport, FileFailure, Operation, Transaction};
pub use walk::go_source_files;
