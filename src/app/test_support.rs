// Scripted service backend and clock for unit tests.

use super::backend::{ServiceBackend, ServiceHandle, ServiceManager};
use super::model::{Access, ServiceState, ServiceStatus, StartOutcome, StopOutcome};
use super::poller::Clock;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

pub const ERROR_ACCESS_DENIED: i32 = 5;

/// What the fake platform answers. Errors are raw OS codes since
/// `io::Error` cannot be cloned.
#[derive(Debug, Clone)]
pub struct Script {
    pub connect_error: Option<i32>,
    pub open_error: Option<i32>,
    pub stop: Result<StopOutcome, i32>,
    pub start: Result<StartOutcome, i32>,
    pub query_error: Option<i32>,
    /// States seen by handles opened with stop rights. The last one repeats.
    pub stop_states: Vec<ServiceState>,
    pub start_states: Vec<ServiceState>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            connect_error: None,
            open_error: None,
            stop: Ok(StopOutcome::Requested),
            start: Ok(StartOutcome::Requested),
            query_error: None,
            stop_states: vec![ServiceState::StopPending, ServiceState::Stopped],
            start_states: vec![ServiceState::StartPending, ServiceState::Running],
        }
    }
}

#[derive(Debug, Default)]
pub struct Calls {
    pub connects: u32,
    pub opens: Vec<(String, Access)>,
    pub stops: u32,
    pub starts: u32,
    pub queries: u32,
    /// Managers plus services currently alive.
    pub live_handles: i32,
}

#[derive(Debug)]
struct Shared {
    script: Script,
    stop_states: VecDeque<ServiceState>,
    start_states: VecDeque<ServiceState>,
    calls: Calls,
}

impl Shared {
    fn new(script: Script) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            stop_states: script.stop_states.iter().copied().collect(),
            start_states: script.start_states.iter().copied().collect(),
            script,
            calls: Calls::default(),
        }))
    }
}

#[derive(Debug, Clone)]
pub struct FakeBackend {
    shared: Rc<RefCell<Shared>>,
}

impl FakeBackend {
    pub fn new(script: Script) -> Self {
        Self {
            shared: Shared::new(script),
        }
    }

    pub fn calls(&self) -> std::cell::Ref<'_, Calls> {
        std::cell::Ref::map(self.shared.borrow(), |s| &s.calls)
    }
}

pub struct FakeManager {
    shared: Rc<RefCell<Shared>>,
}

pub struct FakeService {
    shared: Rc<RefCell<Shared>>,
    access: Access,
}

impl ServiceBackend for FakeBackend {
    type Manager = FakeManager;

    fn connect(&self) -> io::Result<FakeManager> {
        let mut shared = self.shared.borrow_mut();
        shared.calls.connects += 1;
        if let Some(code) = shared.script.connect_error {
            return Err(io::Error::from_raw_os_error(code));
        }
        shared.calls.live_handles += 1;
        Ok(FakeManager {
            shared: Rc::clone(&self.shared),
        })
    }
}

impl Drop for FakeManager {
    fn drop(&mut self) {
        self.shared.borrow_mut().calls.live_handles -= 1;
    }
}

impl ServiceManager for FakeManager {
    type Service = FakeService;

    fn open_service(&self, name: &str, access: Access) -> io::Result<FakeService> {
        let mut shared = self.shared.borrow_mut();
        shared.calls.opens.push((name.to_string(), access));
        if let Some(code) = shared.script.open_error {
            return Err(io::Error::from_raw_os_error(code));
        }
        shared.calls.live_handles += 1;
        Ok(FakeService {
            shared: Rc::clone(&self.shared),
            access,
        })
    }
}

impl FakeService {
    /// A lone stop-rights handle whose polls walk through `states`.
    pub fn with_states(states: &[ServiceState]) -> Self {
        let shared = Shared::new(Script {
            stop_states: states.to_vec(),
            ..Script::default()
        });
        shared.borrow_mut().calls.live_handles += 1;
        Self {
            shared,
            access: Access::Stop,
        }
    }

    pub fn failing_query(code: i32) -> Self {
        let service = Self::with_states(&[ServiceState::Stopped]);
        service.shared.borrow_mut().script.query_error = Some(code);
        service
    }

    pub fn queries(&self) -> u32 {
        self.shared.borrow().calls.queries
    }
}

impl Drop for FakeService {
    fn drop(&mut self) {
        self.shared.borrow_mut().calls.live_handles -= 1;
    }
}

impl ServiceHandle for FakeService {
    fn stop(&self) -> io::Result<StopOutcome> {
        let mut shared = self.shared.borrow_mut();
        shared.calls.stops += 1;
        shared.script.stop.map_err(io::Error::from_raw_os_error)
    }

    fn start(&self) -> io::Result<StartOutcome> {
        let mut shared = self.shared.borrow_mut();
        shared.calls.starts += 1;
        shared.script.start.map_err(io::Error::from_raw_os_error)
    }

    fn query_status(&self) -> io::Result<ServiceStatus> {
        let mut shared = self.shared.borrow_mut();
        shared.calls.queries += 1;
        if let Some(code) = shared.script.query_error {
            return Err(io::Error::from_raw_os_error(code));
        }

        let queue = match self.access {
            Access::Stop => &mut shared.stop_states,
            Access::Start => &mut shared.start_states,
        };
        let state = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().copied()
        }
        .unwrap_or(ServiceState::Stopped);

        Ok(ServiceStatus {
            state,
            process_id: (state == ServiceState::Running).then_some(4242),
        })
    }
}

/// Clock whose `sleep` advances time instantly.
#[derive(Debug)]
pub struct FakeClock {
    origin: Instant,
    elapsed: Cell<Duration>,
    sleeps: Cell<u32>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Cell::new(Duration::ZERO),
            sleeps: Cell::new(0),
        }
    }

    pub fn sleeps(&self) -> u32 {
        self.sleeps.get()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed.get()
    }

    fn sleep(&self, duration: Duration) {
        self.elapsed.set(self.elapsed.get() + duration);
        self.sleeps.set(self.sleeps.get() + 1);
    }
}

/// Cloneable in-memory sink for the console transcript.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
