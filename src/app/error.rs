// Failures of a single stop or start step.

use super::model::ServiceState;
use std::fmt;
use std::io;
use std::time::Duration;
use thiserror::Error;

/// Platform call that failed, named after the service-control API it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    OpenManager,
    OpenService,
    ControlStop,
    Start,
    QueryStatus,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::OpenManager => "OpenSCManager",
            Operation::OpenService => "OpenService",
            Operation::ControlStop => "ControlService",
            Operation::Start => "StartService",
            Operation::QueryStatus => "QueryServiceStatusEx",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum StepError {
    #[error("{operation} failed")]
    Platform {
        operation: Operation,
        #[source]
        source: io::Error,
    },

    #[error("timeout waiting for service to reach state {target} after {waited:?}")]
    Timeout {
        target: ServiceState,
        waited: Duration,
    },
}

impl StepError {
    pub fn platform(operation: Operation) -> impl FnOnce(io::Error) -> StepError {
        move |source| StepError::Platform { operation, source }
    }
}
