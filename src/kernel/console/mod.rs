//! Standard descriptor wiring for job processes.
//!
//! Must run where nothing else relies on descriptors 0-2, normally a freshly
//! forked child before exec. There is no rollback: if the destination cannot
//! be opened the standard descriptors stay closed.

pub mod termios;

use crate::config::paths::SystemPaths;
use crate::config::types::{ConsoleType, Result, SystemError};
use nix::fcntl::{open, OFlag};
use nix::sys::stat::Mode;
use nix::sys::termios::{tcflush, tcgetattr, tcsetattr, FlushArg, SetArg};
use nix::unistd::{close, dup2};
use std::io::IsTerminal;
use std::os::fd::{BorrowedFd, RawFd};

const STDIN: RawFd = 0;
const STDOUT: RawFd = 1;
const STDERR: RawFd = 2;

mod ioctl {
    nix::ioctl_write_int_bad!(tiocsctty, libc::TIOCSCTTY);
}

/// Rebinds standard descriptors to a console destination
#[derive(Clone, Debug, Default)]
pub struct ConsoleConfigurator {
    paths: SystemPaths,
}

impl ConsoleConfigurator {
    pub fn new(paths: SystemPaths) -> Self {
        Self { paths }
    }

    /// Point descriptors 0, 1 and 2 at the destination for `console`,
    /// optionally resetting the terminal to sane defaults first.
    pub fn setup(&self, console: ConsoleType, reset: bool) -> Result<()> {
        let destination = console.destination(&self.paths);

        close_standard_fds();

        let fd = open(
            &destination.path,
            OFlag::O_RDWR | OFlag::O_NOCTTY,
            Mode::empty(),
        )
        .map_err(|source| SystemError::Open {
            path: destination.path.clone(),
            source,
        })?;
        move_to_stdin(fd)?;

        if destination.claim_controlling_terminal {
            // SAFETY: TIOCSCTTY takes an int argument; descriptor 0 is open.
            unsafe { ioctl::tiocsctty(STDIN, 1) }.map_err(|source| SystemError::Terminal {
                operation: "TIOCSCTTY",
                source,
            })?;
        }

        if reset {
            reset_terminal()?;
        }

        duplicate_stdin()?;

        log::info!(
            "Standard descriptors bound to {} (console {}, reset={})",
            destination.path.display(),
            console,
            reset
        );
        Ok(())
    }
}

/// Configure standard descriptors using the default device paths
pub fn setup_console(console: ConsoleType, reset: bool) -> Result<()> {
    ConsoleConfigurator::default().setup(console, reset)
}

/// Any of these may already be closed
fn close_standard_fds() {
    for fd in [STDIN, STDOUT, STDERR] {
        let _ = close(fd);
    }
}

fn move_to_stdin(fd: RawFd) -> Result<()> {
    if fd == STDIN {
        return Ok(());
    }

    dup2(fd, STDIN).map_err(|source| SystemError::Descriptor { fd: STDIN, source })?;
    let _ = close(fd);
    Ok(())
}

/// Directed copies of descriptor 0 onto 1 and 2
fn duplicate_stdin() -> Result<()> {
    for fd in [STDOUT, STDERR] {
        dup2(STDIN, fd).map_err(|source| SystemError::Descriptor { fd, source })?;
    }
    Ok(())
}

fn reset_terminal() -> Result<()> {
    // SAFETY: descriptor 0 was opened by setup() and is not closed while
    // this borrow is alive.
    let console = unsafe { BorrowedFd::borrow_raw(STDIN) };

    if !console.is_terminal() {
        log::debug!("Console destination is not a terminal, skipping reset");
        return Ok(());
    }

    let mut tty = tcgetattr(console).map_err(|source| SystemError::Terminal {
        operation: "tcgetattr",
        source,
    })?;

    termios::sanitize_termios(&mut tty);

    tcsetattr(console, SetArg::TCSANOW, &tty).map_err(|source| SystemError::Terminal {
        operation: "tcsetattr",
        source,
    })?;
    tcflush(console, FlushArg::TCIOFLUSH).map_err(|source| SystemError::Terminal {
        operation: "tcflush",
        source,
    })?;

    log::debug!("Terminal attributes reset to defaults");
    Ok(())
}
