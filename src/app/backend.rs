// Seams between the restart flow and the platform's service manager.
//
// Every handle type releases its platform resource on drop, so a handle that
// goes out of scope on an early `?` return is still closed.

use super::model::{Access, ServiceStatus, StartOutcome, StopOutcome};
use std::io;

/// Entry point to a service manager. Each call yields a fresh connection.
pub trait ServiceBackend {
    type Manager: ServiceManager;

    fn connect(&self) -> io::Result<Self::Manager>;
}

/// An open connection to the service manager.
pub trait ServiceManager {
    type Service: ServiceHandle;

    fn open_service(&self, name: &str, access: Access) -> io::Result<Self::Service>;
}

/// An open service, scoped to the rights it was opened with.
pub trait ServiceHandle {
    /// Sends a stop request. A service that is not active yields
    /// `StopOutcome::NotActive` rather than an error.
    fn stop(&self) -> io::Result<StopOutcome>;

    /// Sends a start request. A service that is already running yields
    /// `StartOutcome::AlreadyRunning` rather than an error.
    fn start(&self) -> io::Result<StartOutcome>;

    fn query_status(&self) -> io::Result<ServiceStatus>;
}

#[cfg(windows)]
pub type PlatformBackend = super::windows::ScmBackend;

#[cfg(not(windows))]
pub type PlatformBackend = super::systemd::SystemdBackend;
