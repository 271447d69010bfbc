/// Default reserved headroom every destination keeps free (50 MB).
pub(super) const DEFAULT_MIN_SPACE: u64 = 50 * 1024 * 1024;

/// Default minimum file size worth planning a move for (1 MB).
pub(super) const DEFAULT_MIN_FILE_SIZE: u64 = 1024 * 1024;

/// Default folder-split threshold size (1 GB). Reserved knob.
pub(super) const DEFAULT_MIN_SPLIT_SIZE: u64 = 1024 * 1024 * 1024;

/// Default move-as-folder dominance threshold. Reserved knob.
pub(super) const DEFAULT_MOVE_AS_FOLDER_THRESHOLD: f64 = 0.9;

/// Default location of the rendered plan script.
pub(super) const DEFAULT_PLAN_FILE: &str = "/config/plan.sh";

/// Default number of rsync batches run at once by `apply`.
pub(super) const DEFAULT_CONCURRENCY: usize = 4;

/// The base path where Unraid mounts array disks.
pub(super) const UNRAID_MNT_BASE: &str = "/mnt";

/// Default number of parallel walk threads per disk scan.
pub(super) const DEFAULT_SCAN_THREADS: usize = 2;

/// Event hub channel capacity; slow subscribers past this lag drop events.
pub(super) const DEFAULT_EVENT_CAPACITY: usize = 256;
