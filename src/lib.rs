#![doc = include_str!("../README.md")]

pub mod cli;
pub mod error;
pub mod format;
pub mod fs;
pub mod golang;
pub mod rewrite;
pub mod steps;
pub mod verify;

pub use error::*;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run() -> Result<()> {
    use clap::Parser;
    use steps::GoMoveCommand;

    let cli = cli::GoMoveCli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .format_timestamp(None)
        .init();

    match cli.command {
        GoMoveCommand::Move(args) => steps::relocate::execute(args),
    }
}
