/// Idempotent mounting of kernel pseudo filesystems
use crate::config::types::{MountDescriptor, MountOutcome, Result, SystemError};
use nix::mount::mount;
use nix::sys::stat::stat;
use std::path::Path;

/// Source argument for pseudo filesystems, which have no backing device
const MOUNT_SOURCE: &str = "none";

/// Filesystem metadata lookup and the mount call itself.
///
/// [`HostMounts`] talks to the kernel; tests substitute canned metadata.
pub trait MountBackend {
    /// Device id (`st_dev`) of the filesystem holding `path`
    fn device_id(&self, path: &Path) -> Result<u64>;

    fn mount(&self, descriptor: &MountDescriptor) -> Result<()>;
}

/// Backend for the running host
#[derive(Clone, Copy, Debug, Default)]
pub struct HostMounts;

impl MountBackend for HostMounts {
    fn device_id(&self, path: &Path) -> Result<u64> {
        let st = stat(path).map_err(|e| SystemError::stat(path, e))?;
        Ok(st.st_dev as u64)
    }

    fn mount(&self, descriptor: &MountDescriptor) -> Result<()> {
        mount(
            Some(MOUNT_SOURCE),
            &descriptor.target,
            Some(descriptor.fs_type.as_str()),
            descriptor.flags,
            descriptor.options.as_deref(),
        )
        .map_err(|source| SystemError::Mount {
            fs_type: descriptor.fs_type.clone(),
            target: descriptor.target.clone(),
            source,
        })
    }
}

/// Mounts a filesystem only when nothing is mounted at the target yet.
///
/// A target whose device id differs from its parent's is already a
/// mountpoint. This cannot tell whether the mounted filesystem is the one
/// requested; any mount there counts.
#[derive(Debug, Default)]
pub struct MountGuard<B: MountBackend = HostMounts> {
    backend: B,
}

impl<B: MountBackend> MountGuard<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn mount(&self, descriptor: &MountDescriptor) -> Result<MountOutcome> {
        let target = &descriptor.target;
        let parent = parent_dir(target)?;

        let parent_dev = self.backend.device_id(parent)?;
        let target_dev = self.backend.device_id(target)?;

        if parent_dev != target_dev {
            log::debug!(
                "{} already mounted (dev {} vs parent dev {}), skipping {}",
                target.display(),
                target_dev,
                parent_dev,
                descriptor.fs_type
            );
            return Ok(MountOutcome::AlreadyMounted);
        }

        self.backend.mount(descriptor)?;

        log::info!(
            "Mounted {} on {} (flags {:?})",
            descriptor.fs_type,
            target.display(),
            descriptor.flags
        );
        Ok(MountOutcome::Mounted)
    }
}

/// Mount on the host unless the target is already a mountpoint
pub fn mount_once(descriptor: &MountDescriptor) -> Result<MountOutcome> {
    MountGuard::new(HostMounts).mount(descriptor)
}

/// Everything before the last `/`, ignoring trailing separators; the root
/// is its own parent.
pub fn parent_dir(target: &Path) -> Result<&Path> {
    if !target.is_absolute() {
        return Err(SystemError::InvalidArgument(format!(
            "Mountpoint must be an absolute path: {}",
            target.display()
        )));
    }

    let raw = target.to_str().ok_or_else(|| {
        SystemError::InvalidArgument(format!("Mountpoint is not valid UTF-8: {}", target.display()))
    })?;

    // "/proc/" must not resolve to "/proc" itself
    let trimmed = raw.trim_end_matches('/');

    match trimmed.rfind('/') {
        Some(idx) if idx > 0 => Ok(Path::new(&trimmed[..idx])),
        _ => Ok(Path::new("/")),
    }
}
