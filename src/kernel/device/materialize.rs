//! Best-effort creation of device special files.
//!
//! A missing non-essential node must never stop boot, so nothing here
//! returns an error: failures are logged and the caller carries on.

use crate::config::types::{DeviceDescriptor, SystemError};
use nix::errno::Errno;
use nix::sys::stat::mknod;

use super::verify::verify_device;

/// Create the node described by `descriptor`. An existing entry at the path
/// counts as success.
pub fn materialize_device(descriptor: &DeviceDescriptor) {
    let path = &descriptor.path;

    match mknod(
        path,
        descriptor.kind.sflag(),
        descriptor.mode(),
        descriptor.dev(),
    ) {
        Ok(()) => log::debug!(
            "Created device node {} ({:?} {}:{})",
            path.display(),
            descriptor.kind,
            descriptor.major,
            descriptor.minor
        ),
        Err(Errno::EEXIST) => log::debug!("Device node {} already exists", path.display()),
        Err(e) => log::error!("Unable to create device {}: {}", path.display(), e),
    }
}

/// Create the node unless a matching one is already there.
///
/// A mismatching entry is reported and left in place.
pub fn ensure_device(descriptor: &DeviceDescriptor) {
    match verify_device(&descriptor.path, descriptor.kind, descriptor.dev()) {
        Ok(()) => {}
        Err(SystemError::DeviceMismatch { path, details }) => {
            log::warn!(
                "Existing node {} does not match ({}), leaving it in place",
                path.display(),
                details
            );
        }
        Err(_) => materialize_device(descriptor),
    }
}

/// Create every node in `devices`; one failure does not stop the rest
pub fn ensure_devices(devices: &[DeviceDescriptor]) {
    for device in devices {
        ensure_device(device);
    }
}
