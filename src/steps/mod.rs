//! Subcommands and their orchestration.

pub mod relocate;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum GoMoveCommand {
    /// Move a Go file to another package and update all references in the module.
    #[command(visible_alias = "mv")]
    Move(relocate::RelocateArgs),
}
