use crate::errors::DiskError;
use crate::packer::Disk;

/// Probe a mount's capacity via statvfs and build the planner's view of it.
#[cfg(unix)]
#[allow(unsafe_code)]
pub(crate) fn probe_disk(mount_path: &str) -> Result<Disk, DiskError> {
    use std::ffi::CString;

    let c_path = CString::new(mount_path).map_err(|_| DiskError::NotFound {
        path: mount_path.to_string(),
    })?;
    let mut stat: libc::statvfs = unsafe { std::mem::zeroed() };

    let ret = unsafe { libc::statvfs(c_path.as_ptr(), &raw mut stat) };
    if ret != 0 {
        return Err(DiskError::StatsFailed {
            path: mount_path.to_string(),
            source: std::io::Error::last_os_error(),
        });
    }

    let block_size = stat.f_frsize as u64;
    let total = stat.f_blocks as u64 * block_size;
    let free = stat.f_bfree as u64 * block_size;

    Ok(Disk::new(mount_path, total, free))
}

/// Fallback for non-unix platforms (development on macOS/Windows).
#[cfg(not(unix))]
pub(crate) fn probe_disk(mount_path: &str) -> Result<Disk, DiskError> {
    tracing::warn!("probe_disk: using dummy values on non-unix platform");
    Ok(Disk::new(mount_path, 1_000_000_000_000, 500_000_000_000))
}
