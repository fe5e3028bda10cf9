use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod app;

use app::App;
use app::backend::PlatformBackend;
use app::config::{Cli, Settings};
use app::poller::SystemClock;
use app::resync::SystemRunner;
use app::ui::Console;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v. Logs go to stderr, away from the transcript.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level())),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialise logging: {err}"))?;

    let settings = Settings::from(cli);
    tracing::debug!(?settings, "resolved settings");

    let app = App::new(settings, PlatformBackend::default(), SystemRunner, SystemClock);
    let mut console = Console::stdio();
    let outcome = app.run(&mut console);

    Ok(ExitCode::from(outcome.exit_code(app.settings().strict_exit)))
}
