//! Checks that an existing path is the device node callers expect.

use crate::config::types::{DeviceDescriptor, DeviceKind, Result, SystemError};
use nix::sys::stat::{major, minor, stat};
use std::path::Path;

/// Succeeds only when `path` has the type `kind` and, for character and
/// block devices, exactly the major/minor numbers packed in `dev`.
pub fn verify_device(path: &Path, kind: DeviceKind, dev: libc::dev_t) -> Result<()> {
    let st = stat(path).map_err(|e| SystemError::stat(path, e))?;

    let found = DeviceKind::from_mode(st.st_mode);
    if found != Some(kind) {
        return Err(SystemError::DeviceMismatch {
            path: path.to_path_buf(),
            details: format!("expected {:?}, found {:?}", kind, found),
        });
    }

    if kind.has_device_number() {
        let expected = (major(dev), minor(dev));
        let actual = (major(st.st_rdev), minor(st.st_rdev));
        if expected != actual {
            return Err(SystemError::DeviceMismatch {
                path: path.to_path_buf(),
                details: format!(
                    "expected device {}:{}, found {}:{}",
                    expected.0, expected.1, actual.0, actual.1
                ),
            });
        }
    }

    Ok(())
}

impl DeviceDescriptor {
    pub fn verify(&self) -> Result<()> {
        verify_device(&self.path, self.kind, self.dev())
    }
}
