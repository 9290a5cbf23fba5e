//! Command dispatch: bridges CLI args -> core operations -> output.

pub mod config_cmd;
pub mod deploy;
pub mod sites;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a parsed command to the appropriate handler.
pub fn dispatch(command: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match command {
        Command::Deploy(args) => deploy::handle(args, global),
        Command::Sites(args) => sites::handle(args, global),
        Command::Config(args) => config_cmd::handle(args, global),
        // Completions are handled before dispatch
        Command::Completions(_) => unreachable!(),
    }
}
