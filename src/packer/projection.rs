use super::world::{Disk, FileMove};
use std::collections::HashMap;

/// One disk's free space before and after a plan.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub(crate) struct ProjectedDisk {
    pub path: String,
    pub total_bytes: u64,
    pub initial_free_bytes: u64,
    pub final_free_bytes: u64,
}

impl ProjectedDisk {
    pub(crate) const fn initial_used(&self) -> u64 {
        self.total_bytes.saturating_sub(self.initial_free_bytes)
    }

    pub(crate) const fn final_used(&self) -> u64 {
        self.total_bytes.saturating_sub(self.final_free_bytes)
    }

    /// Held data initially and holds nothing once the plan lands.
    pub(crate) const fn evacuated(&self) -> bool {
        self.initial_used() > 0 && self.final_used() == 0
    }
}

/// Simulate the final move list against the initial disk states.
///
/// Each move credits its size back to the source disk's free space and debits
/// it from the target's. Pure arithmetic; the WorldView itself is not needed.
pub(crate) fn project_disk_states(initial: &[Disk], moves: &[FileMove]) -> Vec<ProjectedDisk> {
    // Signed per-disk free-space deltas.
    let mut changes: HashMap<&str, i64> = HashMap::new();
    for mv in moves {
        let size = mv.file.size_bytes as i64;
        *changes.entry(mv.file.disk_path.as_str()).or_default() += size;
        *changes.entry(mv.target_disk.as_str()).or_default() -= size;
    }

    initial
        .iter()
        .map(|disk| {
            let delta = changes.get(disk.path.as_str()).copied().unwrap_or(0);
            let final_free = (disk.free_bytes as i64 + delta).clamp(0, disk.total_bytes as i64);
            ProjectedDisk {
                path: disk.path.clone(),
                total_bytes: disk.total_bytes,
                initial_free_bytes: disk.free_bytes,
                final_free_bytes: final_free as u64,
            }
        })
        .collect()
}

pub(crate) fn count_evacuated(projections: &[ProjectedDisk]) -> usize {
    projections.iter().filter(|p| p.evacuated()).count()
}
