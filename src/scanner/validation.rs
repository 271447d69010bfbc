use crate::errors::{classify_io, DiskError, IoClass};
use std::path::Path;

/// Hard reject any path under Unraid's FUSE layer (/mnt/user/). Mixing FUSE
/// paths with direct disk paths can corrupt data; only /mnt/diskX paths are
/// ever allowed through.
pub(crate) fn reject_fuse_path(path: &str) -> Result<(), DiskError> {
    if path.contains("/mnt/user/") || path.contains("/mnt/user0/") {
        return Err(DiskError::NotAMountPoint { path: path.to_string() });
    }
    Ok(())
}

fn probe(path: &str) -> Result<std::fs::Metadata, DiskError> {
    std::fs::metadata(path).map_err(|e| match classify_io(&e) {
        IoClass::NotFound => DiskError::NotFound { path: path.to_string() },
        IoClass::NotADirectory => DiskError::NotADirectory { path: path.to_string() },
        IoClass::PermissionDenied => DiskError::PermissionDenied { path: path.to_string() },
        IoClass::Other => DiskError::StatsFailed { path: path.to_string(), source: e },
    })
}

/// Validate a candidate disk path: it must exist, be a directory, and be a
/// real mount point (its device id differs from its parent's). The root
/// directory is always accepted.
#[cfg(unix)]
pub(crate) fn validate_disk_path(path: &str) -> Result<(), DiskError> {
    use std::os::unix::fs::MetadataExt;

    reject_fuse_path(path)?;

    let meta = probe(path)?;
    if !meta.is_dir() {
        return Err(DiskError::NotADirectory { path: path.to_string() });
    }

    let p = Path::new(path);
    if p == Path::new("/") {
        return Ok(());
    }

    let parent = p.parent().unwrap_or_else(|| Path::new("/"));
    let parent_meta = probe(&parent.to_string_lossy())?;

    if meta.dev() == parent_meta.dev() {
        return Err(DiskError::NotAMountPoint { path: path.to_string() });
    }

    Ok(())
}

/// Development fallback: no device ids to compare, so only existence and
/// directory-ness are checked.
#[cfg(not(unix))]
pub(crate) fn validate_disk_path(path: &str) -> Result<(), DiskError> {
    reject_fuse_path(path)?;
    let meta = probe(path)?;
    if !meta.is_dir() {
        return Err(DiskError::NotADirectory { path: path.to_string() });
    }
    Ok(())
}
