use crate::steps::GoMoveCommand;
use clap::{ArgAction, Parser};

#[derive(Parser)]
#[command(name = "go-move", version, about)]
pub struct GoMoveCli {
    #[command(subcommand)]
    pub command: GoMoveCommand,

    /// Increase log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

impl GoMoveCli {
    /// Default log filter for the verbosity level.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}
