// Handles all interactions with the `systemctl` command.

use super::backend::{ServiceBackend, ServiceHandle, ServiceManager};
use super::model::{Access, ServiceState, ServiceStatus, StartOutcome, StopOutcome};
use std::io;
use std::process::{Command, Output};
use tracing::debug;

/// Drives system units through `systemctl`. There is no real connection to
/// hold, so the manager and unit handles only carry names and rights.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemdBackend;

#[derive(Debug)]
pub struct SystemdManager;

#[derive(Debug)]
pub struct SystemdUnit {
    name: String,
    access: Access,
}

impl ServiceBackend for SystemdBackend {
    type Manager = SystemdManager;

    fn connect(&self) -> io::Result<SystemdManager> {
        let output = systemctl(&["--version"])?;
        if !output.status.success() {
            return Err(command_error("--version", &output));
        }
        Ok(SystemdManager)
    }
}

impl ServiceManager for SystemdManager {
    type Service = SystemdUnit;

    fn open_service(&self, name: &str, access: Access) -> io::Result<SystemdUnit> {
        // `show` exits zero for unknown units, LoadState is what tells them apart
        let output = systemctl(&["show", name, "--property=LoadState", "--value"])?;
        if !output.status.success() {
            return Err(command_error("show", &output));
        }

        let load_state = String::from_utf8_lossy(&output.stdout);
        if load_state.trim() == "not-found" {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("unit {} not found", name),
            ));
        }

        Ok(SystemdUnit {
            name: name.to_string(),
            access,
        })
    }
}

impl SystemdUnit {
    fn require(&self, access: Access) -> io::Result<()> {
        if self.access == access {
            Ok(())
        } else {
            Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("unit {} was not opened with {:?} rights", self.name, access),
            ))
        }
    }

    /// Raw `is-active` answer, e.g. "active", "inactive", "activating".
    fn active_state(&self) -> io::Result<String> {
        // Non-zero exit just means "not active" here, so only stdout matters.
        let output = systemctl(&["is-active", &self.name])?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn request(&self, verb: &str) -> io::Result<()> {
        let output = systemctl(&[verb, "--no-block", &self.name])?;
        if output.status.success() {
            Ok(())
        } else {
            Err(command_error(verb, &output))
        }
    }
}

impl ServiceHandle for SystemdUnit {
    fn stop(&self) -> io::Result<StopOutcome> {
        self.require(Access::Stop)?;
        if let Some(outcome) = stop_outcome(&self.active_state()?) {
            return Ok(outcome);
        }
        self.request("stop")?;
        Ok(StopOutcome::Requested)
    }

    fn start(&self) -> io::Result<StartOutcome> {
        self.require(Access::Start)?;
        if let Some(outcome) = start_outcome(&self.active_state()?) {
            return Ok(outcome);
        }
        self.request("start")?;
        Ok(StartOutcome::Requested)
    }

    fn query_status(&self) -> io::Result<ServiceStatus> {
        let output = systemctl(&[
            "show",
            &self.name,
            "--property=ActiveState",
            "--property=MainPID",
        ])?;
        if !output.status.success() {
            return Err(command_error("show", &output));
        }
        Ok(parse_status(&String::from_utf8_lossy(&output.stdout)))
    }
}

fn systemctl(args: &[&str]) -> io::Result<Output> {
    debug!(?args, "running systemctl");
    Command::new("systemctl").args(args).output()
}

/// Parses `KEY=value` lines from `systemctl show`.
pub fn parse_status(text: &str) -> ServiceStatus {
    let mut status = ServiceStatus {
        state: ServiceState::Stopped,
        process_id: None,
    };

    for line in text.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        match key.trim() {
            "ActiveState" => status.state = map_active_state(value.trim()),
            "MainPID" => {
                status.process_id = value.trim().parse::<u32>().ok().filter(|pid| *pid != 0);
            }
            _ => {}
        }
    }

    status
}

pub fn map_active_state(active_state: &str) -> ServiceState {
    match active_state {
        "active" | "reloading" => ServiceState::Running,
        "activating" => ServiceState::StartPending,
        "deactivating" => ServiceState::StopPending,
        // inactive, failed, and anything systemd adds later
        _ => ServiceState::Stopped,
    }
}

/// Outcome decided by the `is-active` answer alone, or `None` when a stop
/// request has to be sent.
pub fn stop_outcome(active_state: &str) -> Option<StopOutcome> {
    match active_state {
        "inactive" | "failed" => Some(StopOutcome::NotActive),
        _ => None,
    }
}

/// Only a fully active unit counts as running; `activating` still gets a
/// start request and a wait.
pub fn start_outcome(active_state: &str) -> Option<StartOutcome> {
    match active_state {
        "active" | "reloading" => Some(StartOutcome::AlreadyRunning),
        _ => None,
    }
}

fn command_error(verb: &str, output: &Output) -> io::Error {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let detail = if stderr.is_empty() {
        format!("exit status {}", output.status)
    } else {
        stderr
    };
    io::Error::new(
        classify(&detail),
        format!("systemctl {} failed: {}", verb, detail),
    )
}

fn classify(detail: &str) -> io::ErrorKind {
    let lower = detail.to_lowercase();
    if lower.contains("access denied")
        || lower.contains("permission denied")
        || lower.contains("authentication")
    {
        io::ErrorKind::PermissionDenied
    } else {
        io::ErrorKind::Other
    }
}
