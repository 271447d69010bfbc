use super::defaults::{
    DEFAULT_CONCURRENCY, DEFAULT_EVENT_CAPACITY, DEFAULT_MIN_FILE_SIZE, DEFAULT_MIN_SPACE,
    DEFAULT_MIN_SPLIT_SIZE, DEFAULT_MOVE_AS_FOLDER_THRESHOLD, DEFAULT_PLAN_FILE,
    DEFAULT_SCAN_THREADS, UNRAID_MNT_BASE,
};
use anyhow::Result;
use std::path::PathBuf;

/// Resolved options for one `plan` invocation.
#[derive(Debug, Clone)]
pub(crate) struct PlanOptions {
    /// Evacuation sources; empty means evacuate least-full disks automatically.
    pub src: Vec<String>,
    /// Candidate disks; empty means auto-discover /mnt/disk*.
    pub dest: Vec<String>,
    pub min_space_bytes: u64,
    pub min_file_size_bytes: u64,
    pub path_filters: Vec<String>,
    /// Reserved; accepted but not consumed by the packer.
    pub includes: Vec<String>,
    /// Scan-time exclusion substrings.
    pub excludes: Vec<String>,
    /// Reserved folder-grouping knob.
    pub min_split_size_bytes: u64,
    /// Reserved folder-grouping knob.
    pub move_as_folder_threshold: f64,
    pub plan_file: PathBuf,
    pub force: bool,
    pub debug: bool,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            src: Vec::new(),
            dest: Vec::new(),
            min_space_bytes: DEFAULT_MIN_SPACE,
            min_file_size_bytes: DEFAULT_MIN_FILE_SIZE,
            path_filters: Vec::new(),
            includes: Vec::new(),
            excludes: Vec::new(),
            min_split_size_bytes: DEFAULT_MIN_SPLIT_SIZE,
            move_as_folder_threshold: DEFAULT_MOVE_AS_FOLDER_THRESHOLD,
            plan_file: PathBuf::from(DEFAULT_PLAN_FILE),
            force: false,
            debug: false,
        }
    }
}

impl PlanOptions {
    /// Validate option values are sane.
    pub(crate) fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.move_as_folder_threshold),
            "move-as-folder-threshold must be between 0.0 and 1.0"
        );
        anyhow::ensure!(
            !self.plan_file.as_os_str().is_empty(),
            "plan-file must not be empty"
        );
        Ok(())
    }
}

/// Resolved options for one `apply` invocation.
#[derive(Debug, Clone)]
pub(crate) struct ApplyOptions {
    pub plan_file: PathBuf,
    pub concurrency: usize,
    pub dry_run: bool,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            plan_file: PathBuf::from(DEFAULT_PLAN_FILE),
            concurrency: DEFAULT_CONCURRENCY,
            dry_run: false,
        }
    }
}

impl ApplyOptions {
    pub(crate) fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.concurrency >= 1 && self.concurrency <= 32,
            "concurrency must be between 1 and 32"
        );
        Ok(())
    }
}

/// Fixed environment knobs shared by every subcommand.
#[derive(Debug, Clone)]
pub(crate) struct RuntimeConfig {
    pub mnt_base: String,
    pub scan_threads: usize,
    pub event_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            mnt_base: UNRAID_MNT_BASE.to_string(),
            scan_threads: DEFAULT_SCAN_THREADS,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl RuntimeConfig {
    /// Environment overrides, mainly for development off-box.
    pub(crate) fn load() -> Self {
        let mut config = Self::default();
        if let Ok(base) = std::env::var("TIGHTPACK_MNT_BASE") {
            config.mnt_base = base;
        }
        if let Ok(threads) = std::env::var("TIGHTPACK_SCAN_THREADS") {
            if let Ok(v) = threads.parse() {
                config.scan_threads = v;
            }
        }
        config
    }
}

pub(crate) const fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

pub(crate) const fn default_plan_file() -> &'static str {
    DEFAULT_PLAN_FILE
}

pub(crate) const fn default_min_space() -> u64 {
    DEFAULT_MIN_SPACE
}

pub(crate) const fn default_min_file_size() -> u64 {
    DEFAULT_MIN_FILE_SIZE
}

pub(crate) const fn default_min_split_size() -> u64 {
    DEFAULT_MIN_SPLIT_SIZE
}

pub(crate) const fn default_move_as_folder_threshold() -> f64 {
    DEFAULT_MOVE_AS_FOLDER_THRESHOLD
}
