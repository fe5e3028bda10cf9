// Blocks until a service reports a target state or the wait policy runs out.

use super::backend::ServiceHandle;
use super::error::{Operation, StepError};
use super::model::{ServiceState, ServiceStatus, WaitPolicy};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Source of time for the polling loop.
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Polls first and sleeps after, so a target that already holds returns
/// without sleeping. The deadline is fixed once at entry. A timeout too
/// large to represent as an `Instant` means no deadline.
pub fn wait_for_state<S, C>(
    service: &S,
    target: ServiceState,
    policy: &WaitPolicy,
    clock: &C,
) -> Result<ServiceStatus, StepError>
where
    S: ServiceHandle + ?Sized,
    C: Clock + ?Sized,
{
    let started = clock.now();
    let deadline = started.checked_add(policy.timeout);

    loop {
        let status = service
            .query_status()
            .map_err(StepError::platform(Operation::QueryStatus))?;
        trace!(state = %status.state, pid = ?status.process_id, "polled service");

        if status.state == target {
            debug!(%target, elapsed = ?(clock.now() - started), "service reached target state");
            return Ok(status);
        }

        let now = clock.now();
        if deadline.is_some_and(|deadline| now >= deadline) {
            return Err(StepError::Timeout {
                target,
                waited: now - started,
            });
        }

        clock.sleep(policy.interval);
    }
}
