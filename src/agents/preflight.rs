use crate::agents::step::{Step, StepContext};
use crate::error::{Result, StepFailure, StepId, StepOutcome, UubuError};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

pub const ROOT_UID: u32 = 0;

pub const PROBE_HOST: &str = "google.com";
pub const PROBE_PORT: u16 = 80;
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

pub fn effective_uid() -> u32 {
    rustix::process::geteuid().as_raw()
}

/// Refuses to run under the superuser; commands elevate themselves per call.
pub struct PrivilegeCheck {
    uid: u32,
}

impl PrivilegeCheck {
    pub fn current() -> Self {
        Self::for_uid(effective_uid())
    }

    pub fn for_uid(uid: u32) -> Self {
        Self { uid }
    }
}

pub fn ensure_unprivileged(uid: u32) -> Result<()> {
    if uid == ROOT_UID {
        return Err(UubuError::PrivilegedUser);
    }
    Ok(())
}

impl Step for PrivilegeCheck {
    fn id(&self) -> StepId {
        StepId::Privilege
    }

    fn execute(&self, ctx: &StepContext<'_>) -> StepOutcome {
        ensure_unprivileged(self.uid).map_err(|err| {
            ctx.error("no_root");
            ctx.warn("use_sudo");
            StepFailure::fatal(self.id(), err)
        })
    }
}

/// Something that can tell whether the network is usable.
pub trait Reachability {
    fn probe(&self) -> Result<()>;
}

/// TCP connect to a well-known host, bounded by a timeout that also covers
/// name resolution.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl Default for TcpProbe {
    fn default() -> Self {
        Self::new(PROBE_HOST, PROBE_PORT, PROBE_TIMEOUT)
    }
}

impl TcpProbe {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    fn connect(host: &str, port: u16, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        let addrs = (host, port)
            .to_socket_addrs()
            .map_err(|e| UubuError::Network(format!("{host}:{port}: {e}")))?;

        let mut last_error = None;
        for addr in addrs {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match TcpStream::connect_timeout(&addr, remaining) {
                Ok(_) => return Ok(()),
                Err(e) => last_error = Some(e),
            }
        }

        Err(match last_error {
            Some(e) => UubuError::Network(format!("{host}:{port}: {e}")),
            None => UubuError::Network(format!("{host}:{port}: no reachable address")),
        })
    }
}

impl Reachability for TcpProbe {
    fn probe(&self) -> Result<()> {
        tracing::debug!("probing {}:{} ({:?})", self.host, self.port, self.timeout);
        let (host, port, timeout) = (self.host.clone(), self.port, self.timeout);
        let target = format!("{host}:{port}");
        within(self.timeout, &target, move || Self::connect(&host, port, timeout))
    }
}

/// Run `work` on a worker thread and give up once `timeout` has passed.
///
/// Resolution can block past any socket timeout, so the worker is abandoned
/// rather than joined when the deadline passes.
fn within<F>(timeout: Duration, target: &str, work: F) -> Result<()>
where
    F: FnOnce() -> Result<()> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(work());
    });

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(_) => Err(UubuError::Network(format!(
            "{target}: timed out after {}s",
            timeout.as_secs_f32()
        ))),
    }
}

pub struct NetworkCheck {
    probe: Box<dyn Reachability>,
}

impl NetworkCheck {
    pub fn new(probe: Box<dyn Reachability>) -> Self {
        Self { probe }
    }
}

impl Step for NetworkCheck {
    fn id(&self) -> StepId {
        StepId::Network
    }

    fn execute(&self, ctx: &StepContext<'_>) -> StepOutcome {
        ctx.info("checking_internet");
        match self.probe.probe() {
            Ok(()) => {
                ctx.success("internet_ok");
                Ok(())
            }
            Err(err) => {
                ctx.error("internet_error");
                Err(StepFailure::fatal(self.id(), err))
            }
        }
    }
}
