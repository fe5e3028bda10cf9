// The central application controller: stop, start, then resync.

use std::io::Write;
use tracing::info;

pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod poller;
pub mod resync;
pub mod systemd;
pub mod ui;
#[cfg(windows)]
pub mod windows;

#[cfg(test)]
mod test_support;

use backend::ServiceBackend;
use config::Settings;
use model::Outcome;
use poller::Clock;
use resync::CommandRunner;
use ui::Console;

pub struct App<B, R, C> {
    settings: Settings,
    backend: B,
    runner: R,
    clock: C,
}

impl<B, R, C> App<B, R, C>
where
    B: ServiceBackend,
    R: CommandRunner,
    C: Clock,
{
    pub fn new(settings: Settings, backend: B, runner: R, clock: C) -> Self {
        Self {
            settings,
            backend,
            runner,
            clock,
        }
    }

    /// Runs the whole sequence. Each step only runs if the one before it
    /// succeeded. `Done.` is printed whatever happened.
    pub fn run<O: Write, E: Write>(&self, console: &mut Console<O, E>) -> Outcome {
        let outcome = self.restart(console);
        info!(?outcome, service = %self.settings.service, "run finished");
        console.done();
        outcome
    }

    fn restart<O: Write, E: Write>(&self, console: &mut Console<O, E>) -> Outcome {
        let name = self.settings.service.as_str();
        let policy = &self.settings.policy;

        console.heading(format_args!("Attempting to stop the '{}' service...", name));
        if let Err(err) = controller::stop_service(&self.backend, name, policy, &self.clock, console)
        {
            console.step_error(&err);
            console.failure("Failed to stop the service. Aborting.");
            return Outcome::StopFailed;
        }
        console.success("Service successfully stopped.");

        console.heading(format_args!("Attempting to start the '{}' service...", name));
        if let Err(err) =
            controller::start_service(&self.backend, name, policy, &self.clock, console)
        {
            console.step_error(&err);
            console.failure("Failed to start the service.");
            return Outcome::StartFailed;
        }
        console.success("Service successfully started.");

        let Some(command) = &self.settings.resync else {
            console.info("Resync disabled, skipping.");
            return Outcome::Completed;
        };

        console.heading("Resyncing system time...");
        if resync::resync(&self.runner, command) {
            console.note("Time resync command sent successfully.");
            Outcome::Completed
        } else {
            console.failure("Failed to execute time resync command.");
            Outcome::ResyncFailed
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
