// Defines the core data structures for the application.

use std::fmt;
use std::time::Duration;

/// Current state of a service as reported by the service manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Stopped,
    StartPending,
    StopPending,
    Running,
    ContinuePending,
    PausePending,
    Paused,
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ServiceState::Stopped => "STOPPED",
            ServiceState::StartPending => "START_PENDING",
            ServiceState::StopPending => "STOP_PENDING",
            ServiceState::Running => "RUNNING",
            ServiceState::ContinuePending => "CONTINUE_PENDING",
            ServiceState::PausePending => "PAUSE_PENDING",
            ServiceState::Paused => "PAUSED",
        };
        f.write_str(name)
    }
}

/// One status snapshot, read fresh on every poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceStatus {
    pub state: ServiceState,
    pub process_id: Option<u32>, // None while the service has no process
}

/// Rights a service handle is opened with. Both variants include query rights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Stop,
    Start,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// The manager accepted the stop request.
    Requested,
    /// The service was not active, so nothing was sent.
    NotActive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Requested,
    AlreadyRunning,
}

/// Bounds for the state polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            interval: Duration::from_millis(250),
        }
    }
}

/// External command that asks the time service to resync right away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResyncCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ResyncCommand {
    pub fn platform_default() -> Self {
        if cfg!(windows) {
            Self {
                program: "w32tm".to_string(),
                args: vec!["/resync".to_string(), "/nowait".to_string()],
            }
        } else {
            Self {
                program: "chronyc".to_string(),
                args: vec!["makestep".to_string()],
            }
        }
    }
}

impl fmt::Display for ResyncCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// How a full run ended. Each failure variant means the later steps were skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    StopFailed,
    StartFailed,
    ResyncFailed,
}

impl Outcome {
    /// Non-strict runs always exit zero, like the tool they replace.
    pub fn exit_code(self, strict: bool) -> u8 {
        if !strict {
            return 0;
        }
        match self {
            Outcome::Completed => 0,
            Outcome::StopFailed => 1,
            Outcome::StartFailed => 2,
            Outcome::ResyncFailed => 3,
        }
    }
}
