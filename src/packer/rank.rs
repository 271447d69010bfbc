use super::world::{Disk, FileEntry, WorldView};
use std::collections::BTreeSet;

/// A disk annotated with fullness metrics for source ordering.
#[derive(Debug, Clone)]
pub(crate) struct RankedDisk {
    pub disk: Disk,
    pub used_bytes: u64,
    pub used_pct: f64,
}

/// Order evacuation candidates least-full first.
///
/// Only disks holding at least one of `files` qualify; an empty disk has
/// nothing to evacuate. Ties on fullness break by path so the ordering is
/// stable across runs.
pub(crate) fn rank_disks_by_fullness(wv: &WorldView, files: &[FileEntry]) -> Vec<RankedDisk> {
    let populated: BTreeSet<&str> = files.iter().map(|f| f.disk_path.as_str()).collect();

    let mut ranked: Vec<RankedDisk> = wv
        .disks
        .values()
        .filter(|d| populated.contains(d.path.as_str()))
        .map(|d| RankedDisk { disk: d.clone(), used_bytes: d.used_bytes(), used_pct: d.used_pct() })
        .collect();

    ranked.sort_by(|a, b| {
        a.used_pct
            .partial_cmp(&b.used_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.disk.path.cmp(&b.disk.path))
    });

    ranked
}
