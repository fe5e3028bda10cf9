// Runs the external utility that forces an immediate time resync.

use super::model::ResyncCommand;
use anyhow::{Context, Result};
use std::process::Command;
use tracing::{debug, warn};

/// Runs a program to completion with inherited stdio and returns its exit
/// code, or `None` if it was ended by a signal.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<Option<i32>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<Option<i32>> {
        let status = Command::new(program)
            .args(args)
            .status()
            .with_context(|| format!("Failed to execute {}", program))?;
        Ok(status.code())
    }
}

/// True only when the utility exits with code zero. Nothing is retried.
pub fn resync<R: CommandRunner + ?Sized>(runner: &R, command: &ResyncCommand) -> bool {
    debug!(%command, "invoking resync command");
    match runner.run(&command.program, &command.args) {
        Ok(Some(0)) => true,
        Ok(code) => {
            warn!(%command, ?code, "resync command exited unsuccessfully");
            false
        }
        Err(err) => {
            warn!(%command, error = %format!("{err:#}"), "resync command could not be run");
            false
        }
    }
}
