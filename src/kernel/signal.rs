//! Process-group signal delivery.
//!
//! A job may have forked helpers that stayed in its process group. Stopping
//! the job means stopping all of them, so the signal is addressed to the
//! group rather than to the single pid the supervisor knows about.

use crate::config::types::{Result, SignalRequest, SystemError};
use nix::sys::signal::{kill, Signal};
use nix::unistd::{getpgid, Pid};

/// Send `signal` to every process in the group of `pid`.
///
/// `pid` need not be the group leader. When the group cannot be resolved
/// the signal goes to `pid` alone.
pub fn kill_group(pid: Pid, signal: Signal) -> Result<()> {
    if pid.as_raw() <= 0 {
        return Err(SystemError::InvalidArgument(format!(
            "pid must be positive, got {}",
            pid
        )));
    }

    let target = delivery_target(pid, getpgid(Some(pid)).ok());

    kill(target, signal).map_err(|source| SystemError::Signal {
        pid: target.as_raw(),
        signal,
        source,
    })?;

    if target == pid {
        log::info!("Sent {} to process {}", signal, pid);
    } else {
        log::info!("Sent {} to process group {} (via {})", signal, -target.as_raw(), pid);
    }
    Ok(())
}

/// Negated group id when the group is known, else the pid itself
fn delivery_target(pid: Pid, pgid: Option<Pid>) -> Pid {
    match pgid {
        Some(pgid) if pgid.as_raw() > 0 => Pid::from_raw(-pgid.as_raw()),
        _ => {
            log::warn!("No process group for {}, signalling it directly", pid);
            pid
        }
    }
}

impl SignalRequest {
    pub fn new(pid: Pid, signal: Signal) -> Self {
        Self { pid, signal }
    }

    pub fn deliver(&self) -> Result<()> {
        kill_group(self.pid, self.signal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_is_targeted_when_resolved() {
        let target = delivery_target(Pid::from_raw(120), Some(Pid::from_raw(100)));
        assert_eq!(target, Pid::from_raw(-100));
    }

    #[test]
    fn pid_is_targeted_without_group() {
        let pid = Pid::from_raw(120);
        assert_eq!(delivery_target(pid, None), pid);
        assert_eq!(delivery_target(pid, Some(Pid::from_raw(0))), pid);
    }

    #[test]
    fn non_positive_pid_is_rejected() {
        let result = kill_group(Pid::from_raw(0), Signal::SIGTERM);
        assert!(matches!(result, Err(SystemError::InvalidArgument(_))));

        let result = kill_group(Pid::from_raw(-1), Signal::SIGTERM);
        assert!(matches!(result, Err(SystemError::InvalidArgument(_))));
    }

    #[test]
    fn missing_process_reports_errno() {
        // Above any pid_max the kernel accepts
        let err = kill_group(Pid::from_raw(i32::MAX), Signal::SIGTERM).unwrap_err();
        assert_eq!(err.errno(), Some(nix::errno::Errno::ESRCH));
    }

    #[test]
    fn null_signal_probe_reaches_own_group() {
        // Signal 0 checks deliverability without side effects
        let me = Pid::this();
        let target = delivery_target(me, getpgid(Some(me)).ok());
        assert!(kill(target, None::<Signal>).is_ok());
    }
}
