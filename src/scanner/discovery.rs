use crate::errors::{classify_io, DiskError, IoClass};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

#[allow(clippy::unwrap_used)]
fn array_disk_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^disk\d+$").unwrap())
}

/// Discover Unraid array disks by listing the /mnt hierarchy.
///
/// Keeps `diskN` entries only (which also drops the `/mnt/disks`
/// unassigned-devices mount and the FUSE `user` shares), prepends the base,
/// and sorts numerically so disk10 lands after disk9.
pub(crate) fn discover_disks(mnt_base: &str) -> Result<Vec<String>, DiskError> {
    let entries = std::fs::read_dir(Path::new(mnt_base)).map_err(|e| match classify_io(&e) {
        IoClass::NotFound => DiskError::NotFound { path: mnt_base.to_string() },
        IoClass::NotADirectory => DiskError::NotADirectory { path: mnt_base.to_string() },
        IoClass::PermissionDenied => DiskError::PermissionDenied { path: mnt_base.to_string() },
        IoClass::Other => DiskError::StatsFailed { path: mnt_base.to_string(), source: e },
    })?;

    let mut found: Vec<(u64, String)> = Vec::new();
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().to_string();
        if !array_disk_regex().is_match(&name) {
            continue;
        }
        let Ok(number) = name["disk".len()..].parse::<u64>() else {
            continue;
        };
        found.push((number, format!("{mnt_base}/{name}")));
    }

    found.sort();
    Ok(found.into_iter().map(|(_, path)| path).collect())
}
