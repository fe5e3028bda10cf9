// Service Control Manager backend.

use super::backend::{ServiceBackend, ServiceHandle, ServiceManager};
use super::model::{Access, ServiceState, ServiceStatus, StartOutcome, StopOutcome};
use std::ffi::OsStr;
use std::io;
use tracing::debug;
use winapi::shared::winerror::{ERROR_SERVICE_ALREADY_RUNNING, ERROR_SERVICE_NOT_ACTIVE};
use windows_service::service::{self, ServiceAccess};
use windows_service::service_manager::{self, ServiceManagerAccess};

#[derive(Debug, Clone, Copy, Default)]
pub struct ScmBackend;

/// `windows_service` closes both handle types in `Drop`.
pub struct ScmManager(service_manager::ServiceManager);

pub struct ScmService(service::Service);

impl ServiceBackend for ScmBackend {
    type Manager = ScmManager;

    fn connect(&self) -> io::Result<ScmManager> {
        let manager =
            service_manager::ServiceManager::local_computer(None::<&str>, ServiceManagerAccess::CONNECT)
                .map_err(into_io)?;
        Ok(ScmManager(manager))
    }
}

impl ServiceManager for ScmManager {
    type Service = ScmService;

    fn open_service(&self, name: &str, access: Access) -> io::Result<ScmService> {
        let rights = match access {
            Access::Stop => ServiceAccess::STOP | ServiceAccess::QUERY_STATUS,
            Access::Start => ServiceAccess::START | ServiceAccess::QUERY_STATUS,
        };
        let service = self.0.open_service(name, rights).map_err(into_io)?;
        Ok(ScmService(service))
    }
}

impl ServiceHandle for ScmService {
    fn stop(&self) -> io::Result<StopOutcome> {
        match self.0.stop().map_err(into_io) {
            Ok(status) => {
                debug!(state = ?status.current_state, "stop control accepted");
                Ok(StopOutcome::Requested)
            }
            Err(err) if err.raw_os_error() == Some(ERROR_SERVICE_NOT_ACTIVE as i32) => {
                Ok(StopOutcome::NotActive)
            }
            Err(err) => Err(err),
        }
    }

    fn start(&self) -> io::Result<StartOutcome> {
        let no_args: &[&OsStr] = &[];
        match self.0.start(no_args).map_err(into_io) {
            Ok(()) => Ok(StartOutcome::Requested),
            Err(err) if err.raw_os_error() == Some(ERROR_SERVICE_ALREADY_RUNNING as i32) => {
                Ok(StartOutcome::AlreadyRunning)
            }
            Err(err) => Err(err),
        }
    }

    fn query_status(&self) -> io::Result<ServiceStatus> {
        let status = self.0.query_status().map_err(into_io)?;
        Ok(ServiceStatus {
            state: map_state(status.current_state),
            process_id: status.process_id,
        })
    }
}

fn map_state(state: service::ServiceState) -> ServiceState {
    match state {
        service::ServiceState::Stopped => ServiceState::Stopped,
        service::ServiceState::StartPending => ServiceState::StartPending,
        service::ServiceState::StopPending => ServiceState::StopPending,
        service::ServiceState::Running => ServiceState::Running,
        service::ServiceState::ContinuePending => ServiceState::ContinuePending,
        service::ServiceState::PausePending => ServiceState::PausePending,
        service::ServiceState::Paused => ServiceState::Paused,
    }
}

// Keeps the OS error code when there is one so callers can match on it.
fn into_io(err: windows_service::Error) -> io::Error {
    match err {
        windows_service::Error::Winapi(io_err) => io_err,
        other => io::Error::new(io::ErrorKind::InvalidInput, other.to_string()),
    }
}
