//! Device node materialization and verification.
//!
//! Verification propagates errors so callers can decide whether to
//! re-create a node; creation itself is best-effort.

mod materialize;
mod verify;

pub use materialize::{ensure_device, ensure_devices, materialize_device};
pub use verify::verify_device;

use crate::config::paths::SystemPaths;
use crate::config::types::DeviceDescriptor;
use std::path::Path;

/// Nodes an init needs when started with an empty `/dev`
pub fn essential_devices(paths: &SystemPaths) -> Vec<DeviceDescriptor> {
    let dev_dir = paths
        .console
        .parent()
        .unwrap_or_else(|| Path::new("/dev"))
        .to_path_buf();

    vec![
        DeviceDescriptor::char_device(&paths.console, 0o600, 5, 1),
        DeviceDescriptor::char_device(&paths.dev_null, 0o666, 1, 3),
        DeviceDescriptor::char_device(dev_dir.join("tty"), 0o666, 5, 0),
        DeviceDescriptor::char_device(dev_dir.join("ptmx"), 0o666, 5, 2),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::DeviceKind;
    use std::path::PathBuf;

    #[test]
    fn essential_table_follows_configured_paths() {
        let paths = SystemPaths {
            console: PathBuf::from("/run/initdev/console"),
            dev_null: PathBuf::from("/run/initdev/null"),
        };

        let devices = essential_devices(&paths);
        assert_eq!(devices.len(), 4);
        assert!(devices.iter().all(|d| d.kind == DeviceKind::Character));

        assert_eq!(devices[0].path, paths.console);
        assert_eq!((devices[0].major, devices[0].minor), (5, 1));
        assert_eq!(devices[0].permissions, 0o600);

        assert_eq!(devices[1].path, paths.dev_null);
        assert_eq!((devices[1].major, devices[1].minor), (1, 3));

        assert_eq!(devices[2].path, PathBuf::from("/run/initdev/tty"));
        assert_eq!(devices[3].path, PathBuf::from("/run/initdev/ptmx"));
    }

    #[test]
    fn default_table_lives_in_dev() {
        let devices = essential_devices(&SystemPaths::default());
        assert_eq!(devices[2].path, PathBuf::from("/dev/tty"));
    }
}
