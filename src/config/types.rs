/// Core types and structures shared by the system primitives
use nix::errno::Errno;
use nix::mount::MsFlags;
use nix::sys::signal::Signal;
use nix::sys::stat::{self, Mode, SFlag};
use nix::unistd::Pid;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use super::paths::SystemPaths;

/// Where a job's standard descriptors go
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleType {
    /// Console device, without becoming its controlling process
    Output,
    /// Console device, claimed as the controlling terminal
    Owner,
    /// Output is captured elsewhere; descriptors go to the null device
    Log,
    /// Null device
    #[default]
    None,
}

/// Resolved target of a [`ConsoleType`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsoleDestination {
    pub path: PathBuf,
    pub claim_controlling_terminal: bool,
}

impl ConsoleType {
    /// Map a console type to the device it opens and whether the caller
    /// takes the device as its controlling terminal.
    pub fn destination(self, paths: &SystemPaths) -> ConsoleDestination {
        let (path, claim_controlling_terminal) = match self {
            Self::Output => (&paths.console, false),
            Self::Owner => (&paths.console, true),
            Self::Log | Self::None => (&paths.dev_null, false),
        };

        ConsoleDestination {
            path: path.clone(),
            claim_controlling_terminal,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Output => "output",
            Self::Owner => "owner",
            Self::Log => "log",
            Self::None => "none",
        }
    }
}

impl fmt::Display for ConsoleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsoleType {
    type Err = SystemError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "output" => Ok(Self::Output),
            "owner" => Ok(Self::Owner),
            "log" => Ok(Self::Log),
            "none" => Ok(Self::None),
            other => Err(SystemError::Config(format!(
                "Unknown console type '{}' (expected output, owner, log or none)",
                other
            ))),
        }
    }
}

/// File type bits of a filesystem entry (the `S_IFMT` part of a mode)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Regular,
    Character,
    Block,
    Fifo,
    Directory,
    Socket,
    Symlink,
}

impl DeviceKind {
    pub fn sflag(self) -> SFlag {
        match self {
            Self::Regular => SFlag::S_IFREG,
            Self::Character => SFlag::S_IFCHR,
            Self::Block => SFlag::S_IFBLK,
            Self::Fifo => SFlag::S_IFIFO,
            Self::Directory => SFlag::S_IFDIR,
            Self::Socket => SFlag::S_IFSOCK,
            Self::Symlink => SFlag::S_IFLNK,
        }
    }

    /// Classify a raw `st_mode`
    pub fn from_mode(mode: libc::mode_t) -> Option<Self> {
        let kind = SFlag::from_bits_truncate(mode & libc::S_IFMT);
        [
            Self::Regular,
            Self::Character,
            Self::Block,
            Self::Fifo,
            Self::Directory,
            Self::Socket,
            Self::Symlink,
        ]
        .into_iter()
        .find(|candidate| candidate.sflag() == kind)
    }

    /// Character and block devices are identified by major/minor numbers
    pub fn has_device_number(self) -> bool {
        matches!(self, Self::Character | Self::Block)
    }
}

/// A device special file to create or verify
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    pub path: PathBuf,
    pub kind: DeviceKind,
    /// Permission bits, e.g. `0o600`
    pub permissions: u32,
    #[serde(default)]
    pub major: u64,
    #[serde(default)]
    pub minor: u64,
}

impl DeviceDescriptor {
    pub fn new<P: Into<PathBuf>>(
        path: P,
        kind: DeviceKind,
        permissions: u32,
        major: u64,
        minor: u64,
    ) -> Self {
        Self {
            path: path.into(),
            kind,
            permissions,
            major,
            minor,
        }
    }

    pub fn char_device<P: Into<PathBuf>>(path: P, permissions: u32, major: u64, minor: u64) -> Self {
        Self::new(path, DeviceKind::Character, permissions, major, minor)
    }

    pub fn mode(&self) -> Mode {
        Mode::from_bits_truncate(self.permissions as libc::mode_t)
    }

    /// Packed device number
    pub fn dev(&self) -> libc::dev_t {
        stat::makedev(self.major, self.minor)
    }
}

/// A filesystem to mount at a target directory
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MountDescriptor {
    pub fs_type: String,
    /// Absolute mountpoint
    pub target: PathBuf,
    pub flags: MsFlags,
    /// Passed to the kernel verbatim
    pub options: Option<String>,
}

impl MountDescriptor {
    pub fn new<P: Into<PathBuf>>(fs_type: &str, target: P, flags: MsFlags) -> Self {
        Self {
            fs_type: fs_type.to_string(),
            target: target.into(),
            flags,
            options: None,
        }
    }

    pub fn with_options(mut self, options: &str) -> Self {
        self.options = Some(options.to_string());
        self
    }
}

/// What a guarded mount actually did. Both outcomes are success.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MountOutcome {
    Mounted,
    AlreadyMounted,
}

/// A signal addressed to a process and, through it, to its group
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignalRequest {
    pub pid: Pid,
    pub signal: Signal,
}

/// Errors raised by the system primitives
#[derive(Error, Debug)]
pub enum SystemError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to send {signal} to process {pid}: {source}")]
    Signal {
        pid: i32,
        signal: Signal,
        #[source]
        source: Errno,
    },

    #[error("Failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: Errno,
    },

    #[error("Failed to duplicate onto descriptor {fd}: {source}")]
    Descriptor {
        fd: i32,
        #[source]
        source: Errno,
    },

    #[error("Terminal error during {operation}: {source}")]
    Terminal {
        operation: &'static str,
        #[source]
        source: Errno,
    },

    #[error("Failed to stat {}: {source}", .path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: Errno,
    },

    #[error("Failed to mount {fs_type} on {}: {source}", .target.display())]
    Mount {
        fs_type: String,
        target: PathBuf,
        #[source]
        source: Errno,
    },

    #[error("Device mismatch at {}: {details}", .path.display())]
    DeviceMismatch { path: PathBuf, details: String },
}

impl SystemError {
    /// Underlying OS error code, if the failure came from a syscall
    pub fn errno(&self) -> Option<Errno> {
        match self {
            Self::Signal { source, .. }
            | Self::Open { source, .. }
            | Self::Descriptor { source, .. }
            | Self::Terminal { source, .. }
            | Self::Stat { source, .. }
            | Self::Mount { source, .. } => Some(*source),
            Self::Io(e) => e.raw_os_error().map(Errno::from_i32),
            _ => None,
        }
    }

    pub(crate) fn stat(path: &Path, source: Errno) -> Self {
        Self::Stat {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type alias for system primitive operations
pub type Result<T> = std::result::Result<T, SystemError>;
