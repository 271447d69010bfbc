use super::projection::ProjectedDisk;
use super::world::{FileMove, MoveStatus};
use crate::events::{CompactEvent, Snapshot};
use std::collections::BTreeMap;

/// Per-plan totals, derived purely from the pending moves.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub(crate) struct PlanSummary {
    pub total_files: usize,
    pub total_bytes: u64,
    pub moves_per_disk: BTreeMap<String, usize>,
    pub bytes_per_disk: BTreeMap<String, u64>,
}

/// The ordered move list plus its summary. Skipped and failed moves stay in
/// the list for reporting but never count toward the totals.
#[derive(Debug, Clone, Default)]
pub(crate) struct MovePlan {
    pub moves: Vec<FileMove>,
    pub summary: PlanSummary,
}

impl MovePlan {
    pub(crate) fn from_moves(moves: Vec<FileMove>) -> Self {
        let mut summary = PlanSummary::default();
        for mv in moves.iter().filter(|m| m.status == MoveStatus::Pending) {
            summary.total_files += 1;
            summary.total_bytes += mv.file.size_bytes;
            *summary.moves_per_disk.entry(mv.target_disk.clone()).or_default() += 1;
            *summary.bytes_per_disk.entry(mv.target_disk.clone()).or_default() +=
                mv.file.size_bytes;
        }
        Self { moves, summary }
    }

    pub(crate) fn pending(&self) -> impl Iterator<Item = &FileMove> {
        self.moves.iter().filter(|m| m.status == MoveStatus::Pending)
    }
}

/// Headline numbers for the end of a planning run.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub(crate) struct PlanStats {
    pub bytes_consolidated: u64,
    pub moves_planned: usize,
    pub skipped: usize,
    pub disks_evacuated: usize,
}

/// The complete output of one planning invocation.
#[derive(Debug)]
pub(crate) struct PlanResult {
    /// Rendered transfer script, ready to write to the plan file.
    pub script: String,
    pub stats: PlanStats,
    pub disk_projections: Vec<ProjectedDisk>,
    pub snapshots: Vec<Snapshot>,
    pub compact_events: Vec<CompactEvent>,
}
