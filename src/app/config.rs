// Command-line and environment configuration.

use super::model::{ResyncCommand, WaitPolicy};
use clap::Parser;
use std::time::Duration;

#[cfg(windows)]
pub const DEFAULT_SERVICE: &str = "w32time";
#[cfg(not(windows))]
pub const DEFAULT_SERVICE: &str = "chronyd";

/// One day. Longer waits are a typo, not a slow service.
pub const MAX_TIMEOUT_SECS: u64 = 86_400;

/// Restart the system time service and force an immediate clock resync.
///
/// Needs administrator (or root) rights to control the service. Without
/// arguments it restarts the platform's time service and runs its resync
/// command.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Name of the time service to restart
    #[arg(long, env = "TIMESYNC_SERVICE", default_value = DEFAULT_SERVICE)]
    pub service: String,

    /// Seconds to wait for each state transition
    #[arg(
        long,
        env = "TIMESYNC_TIMEOUT",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..=MAX_TIMEOUT_SECS)
    )]
    pub timeout: u64,

    /// Milliseconds between status polls
    #[arg(
        long,
        env = "TIMESYNC_POLL_INTERVAL_MS",
        default_value_t = 250,
        value_parser = clap::value_parser!(u64).range(1..=MAX_TIMEOUT_SECS * 1000)
    )]
    pub poll_interval_ms: u64,

    /// Program that triggers the resync (defaults to the platform's utility)
    #[arg(long, env = "TIMESYNC_RESYNC_PROGRAM")]
    pub resync_program: Option<String>,

    /// Comma-separated arguments for the resync program
    #[arg(
        long,
        env = "TIMESYNC_RESYNC_ARGS",
        value_delimiter = ',',
        allow_hyphen_values = true
    )]
    pub resync_args: Option<Vec<String>>,

    /// Restart the service but skip the resync command
    #[arg(long, conflicts_with_all = ["resync_program", "resync_args"])]
    pub no_resync: bool,

    /// Exit non-zero when a step fails (1 stop, 2 start, 3 resync)
    #[arg(long, env = "TIMESYNC_STRICT_EXIT")]
    pub strict_exit: bool,

    /// Increase diagnostic output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Everything a run needs, resolved from the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub service: String,
    pub policy: WaitPolicy,
    pub resync: Option<ResyncCommand>,
    pub strict_exit: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            service: DEFAULT_SERVICE.to_string(),
            policy: WaitPolicy::default(),
            resync: Some(ResyncCommand::platform_default()),
            strict_exit: false,
        }
    }
}

impl From<Cli> for Settings {
    fn from(cli: Cli) -> Self {
        let resync = if cli.no_resync {
            None
        } else {
            let mut command = ResyncCommand::platform_default();
            if let Some(program) = cli.resync_program {
                command.program = program;
                // a custom program does not inherit the default's arguments
                command.args.clear();
            }
            if let Some(args) = cli.resync_args {
                command.args = args;
            }
            Some(command)
        };

        Self {
            service: cli.service,
            policy: WaitPolicy {
                timeout: Duration::from_secs(cli.timeout),
                interval: Duration::from_millis(cli.poll_interval_ms),
            },
            resync,
            strict_exit: cli.strict_exit,
        }
    }
}

impl Cli {
    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
