//! Integration tests for device node creation and verification
//!
//! FIFOs and regular files can be created without privileges, so most
//! scenarios run unprivileged in a scratch directory.

use nix::sys::stat::makedev;
use std::fs;
use std::path::{Path, PathBuf};
use sysprim::kernel::device::ensure_devices;
use sysprim::{
    ensure_device, materialize_device, verify_device, DeviceDescriptor, DeviceKind, SystemError,
};

/// Per-test directory under the system temp dir, removed on drop
struct Scratch(PathBuf);

impl Scratch {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!(
            "sysprim-devices-{}-{}",
            std::process::id(),
            name
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("failed to create scratch dir");
        Self(dir)
    }

    fn path(&self, name: &str) -> PathBuf {
        self.0.join(name)
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_materialize_twice_is_harmless() {
    init_logging();
    let scratch = Scratch::new("twice");
    let fifo = DeviceDescriptor::new(scratch.path("initctl"), DeviceKind::Fifo, 0o600, 0, 0);

    materialize_device(&fifo);
    materialize_device(&fifo);

    assert!(verify_device(&fifo.path, DeviceKind::Fifo, 0).is_ok());
}

#[test]
fn test_regular_file_is_not_a_character_device() {
    init_logging();
    let scratch = Scratch::new("regular");
    let path = scratch.path("console");
    fs::write(&path, b"").expect("failed to create regular file");

    let err = verify_device(&path, DeviceKind::Character, makedev(5, 1)).unwrap_err();
    assert!(matches!(err, SystemError::DeviceMismatch { .. }));

    assert!(verify_device(&path, DeviceKind::Regular, 0).is_ok());
}

#[test]
fn test_creation_failure_is_not_fatal() {
    init_logging();
    let missing = Path::new("/nonexistent/sysprim-dir/null");
    let null = DeviceDescriptor::char_device(missing, 0o666, 1, 3);

    // Logs and returns
    materialize_device(&null);
    ensure_device(&null);

    assert!(!missing.exists());
}

#[test]
fn test_ensure_creates_only_missing_nodes() {
    init_logging();
    let scratch = Scratch::new("ensure");
    let fifo = DeviceDescriptor::new(scratch.path("fifo"), DeviceKind::Fifo, 0o644, 0, 0);
    let stale = DeviceDescriptor::new(scratch.path("stale"), DeviceKind::Fifo, 0o644, 0, 0);
    fs::write(&stale.path, b"keep").expect("failed to create stale file");

    ensure_devices(&[fifo.clone(), stale.clone()]);

    assert!(fifo.verify().is_ok());
    // A mismatching entry is left untouched
    assert!(stale.verify().is_err());
    assert_eq!(fs::read(&stale.path).expect("stale file vanished"), b"keep");
}

#[test]
fn test_character_device_round_trip_when_privileged() {
    init_logging();
    if !nix::unistd::geteuid().is_root() {
        println!("Skipping character device test (needs CAP_MKNOD)");
        return;
    }

    let scratch = Scratch::new("chardev");
    let null = DeviceDescriptor::char_device(scratch.path("null"), 0o666, 1, 3);
    materialize_device(&null);

    if !null.path.exists() {
        println!("Skipping character device test (mknod denied in this environment)");
        return;
    }

    assert!(verify_device(&null.path, DeviceKind::Character, makedev(1, 3)).is_ok());
    assert!(verify_device(&null.path, DeviceKind::Character, makedev(1, 5)).is_err());
    assert!(verify_device(&null.path, DeviceKind::Block, makedev(1, 3)).is_err());
}
