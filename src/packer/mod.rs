mod combinations;
mod destination;
mod filter;
mod optimizer;
mod pack;
mod paths;
mod plan;
mod projection;
mod rank;
mod world;

pub(crate) use combinations::{
    find_best_combination, Combination, DEFAULT_MAX_COMBINATION_SIZE,
};
pub(crate) use destination::find_best_destination;
pub(crate) use filter::FileFilter;
pub(crate) use optimizer::optimize_moves;
pub(crate) use pack::{
    pack_tightly, PackOutcome, PackRequest, REASON_NO_DESTINATION, REASON_TOO_LARGE,
};
pub(crate) use paths::{disk_relative, split_disk_prefix};
pub(crate) use plan::{MovePlan, PlanResult, PlanStats, PlanSummary};
pub(crate) use projection::{count_evacuated, project_disk_states, ProjectedDisk};
pub(crate) use rank::{rank_disks_by_fullness, RankedDisk};
pub(crate) use world::{apply_move, Disk, FileEntry, FileMove, MoveStatus, WorldView};
