use super::validation::reject_fuse_path;
use crate::errors::{classify_io, IoClass, ScanError};
use crate::packer::FileEntry;
use jwalk::{Parallelism, WalkDir};
use std::path::Path;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// All context needed to scan a single disk.
#[derive(Debug, Clone)]
pub(crate) struct ScanContext {
    pub mount_path: String,
    /// Substrings that exclude a file when found in its absolute path.
    pub excludes: Vec<String>,
    pub num_threads: usize,
    pub cancel: CancellationToken,
}

/// Walk one disk and inventory its regular files.
///
/// Unreadable entries are logged and skipped; the walk itself only fails when
/// the mount is gone, unreadable at the root, or the scan is cancelled.
pub(crate) fn scan_disk(ctx: &ScanContext) -> Result<Vec<FileEntry>, ScanError> {
    let mount_path = ctx.mount_path.as_str();
    reject_fuse_path(mount_path)
        .map_err(|_| ScanError::PathNotFound { path: mount_path.to_string() })?;

    let mount = Path::new(mount_path);
    match std::fs::metadata(mount) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(ScanError::Failed {
                path: mount_path.to_string(),
                message: "not a directory".to_string(),
            })
        }
        Err(e) => {
            return Err(match classify_io(&e) {
                IoClass::PermissionDenied => {
                    ScanError::PermissionDenied { path: mount_path.to_string() }
                }
                IoClass::NotFound | IoClass::NotADirectory | IoClass::Other => {
                    ScanError::PathNotFound { path: mount_path.to_string() }
                }
            })
        }
    }

    info!("Starting scan of {mount_path}");
    let start = Instant::now();

    let parallelism = if ctx.num_threads > 1 {
        Parallelism::RayonNewPool(ctx.num_threads)
    } else {
        Parallelism::Serial
    };

    let walker = WalkDir::new(mount_path).parallelism(parallelism).skip_hidden(false);

    let mut files: Vec<FileEntry> = Vec::new();
    let mut bytes_seen = 0u64;

    for entry_result in walker {
        if ctx.cancel.is_cancelled() {
            info!("Scan cancelled for {mount_path}");
            return Err(ScanError::Failed {
                path: mount_path.to_string(),
                message: "scan cancelled".to_string(),
            });
        }

        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                warn!("Error reading directory entry under {mount_path}: {err}");
                continue;
            }
        };

        let Some(file) = process_dir_entry(&entry, mount, mount_path, &ctx.excludes) else {
            continue;
        };

        bytes_seen += file.size_bytes;
        files.push(file);
    }

    info!(
        "Scan complete for {mount_path}: {} files, {} bytes in {:.1}s",
        files.len(),
        bytes_seen,
        start.elapsed().as_secs_f64()
    );

    Ok(files)
}

/// Convert a jwalk entry into a `FileEntry`, or `None` if it is the mount
/// itself, a directory, excluded, or unreadable.
fn process_dir_entry(
    entry: &jwalk::DirEntry<((), ())>,
    mount: &Path,
    mount_path: &str,
    excludes: &[String],
) -> Option<FileEntry> {
    let entry_path = entry.path();
    if entry_path == mount {
        return None;
    }

    let path_str = entry_path.to_string_lossy();
    if reject_fuse_path(&path_str).is_err() {
        warn!("Skipping FUSE-layer path {path_str}");
        return None;
    }
    if excludes.iter().any(|needle| path_str.contains(needle.as_str())) {
        return None;
    }

    let metadata = match entry.metadata() {
        Ok(m) => m,
        Err(err) => {
            let e = ScanError::FileStatFailed {
                path: path_str.to_string(),
                source: std::io::Error::other(err.to_string()),
            };
            warn!("{e}");
            return None;
        }
    };
    if metadata.is_dir() {
        return None;
    }

    let relative = entry_path.strip_prefix(mount_path).ok()?.to_string_lossy();
    let relative_path = relative.trim_start_matches('/').to_string();
    if relative_path.is_empty() {
        return None;
    }

    Some(FileEntry::new(mount_path, relative_path, metadata.len()))
}
