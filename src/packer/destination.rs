use super::world::{FileEntry, WorldView};
use std::collections::HashSet;

/// Pick the best-fit destination for one file: among disks that are neither
/// the source nor already processed and can hold the file while keeping
/// `min_space_bytes` free, the one with the *least* free space wins. Filling
/// the fullest viable disk concentrates the remaining free space.
pub(crate) fn find_best_destination(
    file: &FileEntry,
    wv: &WorldView,
    source_disk: &str,
    processed: &HashSet<String>,
    min_space_bytes: u64,
) -> Option<String> {
    let mut best: Option<(&str, u64)> = None;

    for disk in wv.disks.values() {
        if disk.path == source_disk || processed.contains(&disk.path) {
            continue;
        }
        if disk.free_bytes.saturating_sub(min_space_bytes) < file.size_bytes {
            continue;
        }
        match best {
            Some((_, free)) if disk.free_bytes >= free => {}
            _ => best = Some((&disk.path, disk.free_bytes)),
        }
    }

    best.map(|(path, _)| path.to_string())
}
