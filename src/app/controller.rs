// Stop and start requests against a named service.
//
// Each call takes its own manager connection and service handle. Both are
// dropped, service first, before the call returns.

use super::backend::{ServiceBackend, ServiceHandle, ServiceManager};
use super::error::{Operation, StepError};
use super::model::{Access, ServiceState, StartOutcome, StopOutcome, WaitPolicy};
use super::poller::{Clock, wait_for_state};
use super::ui::Console;
use std::io::Write;
use tracing::info;

pub fn stop_service<B, C, O, E>(
    backend: &B,
    name: &str,
    policy: &WaitPolicy,
    clock: &C,
    console: &mut Console<O, E>,
) -> Result<StopOutcome, StepError>
where
    B: ServiceBackend,
    C: Clock,
    O: Write,
    E: Write,
{
    let manager = backend
        .connect()
        .map_err(StepError::platform(Operation::OpenManager))?;
    let service = manager
        .open_service(name, Access::Stop)
        .map_err(StepError::platform(Operation::OpenService))?;
    info!(service = name, "opened service for stop");

    match service
        .stop()
        .map_err(StepError::platform(Operation::ControlStop))?
    {
        StopOutcome::NotActive => {
            info!(service = name, "service was not active, nothing to stop");
            console.info("Service is not running.");
            Ok(StopOutcome::NotActive)
        }
        StopOutcome::Requested => {
            console.info("Stop request sent. Waiting for service to terminate...");
            wait_for_state(&service, ServiceState::Stopped, policy, clock)?;
            Ok(StopOutcome::Requested)
        }
    }
}

pub fn start_service<B, C, O, E>(
    backend: &B,
    name: &str,
    policy: &WaitPolicy,
    clock: &C,
    console: &mut Console<O, E>,
) -> Result<StartOutcome, StepError>
where
    B: ServiceBackend,
    C: Clock,
    O: Write,
    E: Write,
{
    let manager = backend
        .connect()
        .map_err(StepError::platform(Operation::OpenManager))?;
    let service = manager
        .open_service(name, Access::Start)
        .map_err(StepError::platform(Operation::OpenService))?;
    info!(service = name, "opened service for start");

    match service
        .start()
        .map_err(StepError::platform(Operation::Start))?
    {
        StartOutcome::AlreadyRunning => {
            console.info("Service is already running.");
            Ok(StartOutcome::AlreadyRunning)
        }
        StartOutcome::Requested => {
            console.info("Start request sent. Waiting for service to run...");
            let status = wait_for_state(&service, ServiceState::Running, policy, clock)?;
            info!(service = name, pid = ?status.process_id, "service running");
            Ok(StartOutcome::Requested)
        }
    }
}
