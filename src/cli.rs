use crate::config::{
    default_concurrency, default_min_file_size, default_min_space, default_min_split_size,
    default_move_as_folder_threshold, default_plan_file, ApplyOptions, PlanOptions,
};
use crate::units::parse_size;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tightpack")]
#[command(about = "Consolidate Unraid array data onto fewer disks")]
#[command(version)]
#[command(after_help = "Run '<command> --help' for detailed options on each command.")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Compute a consolidation plan and write it as a transfer script
    Plan(PlanArgs),
    /// Execute a previously written plan script
    Apply(ApplyArgs),
    /// Summarize a previously written plan script
    Show(ShowArgs),
}

fn parse_size_arg(raw: &str) -> Result<u64, String> {
    parse_size(raw).map_err(|e| e.to_string())
}

#[derive(Args, Clone, Debug, Default)]
pub(crate) struct PlanArgs {
    /// Comma-separated disk paths to evacuate (default: least-full disks automatically)
    #[arg(long, value_delimiter = ',', value_name = "PATHS")]
    pub src: Vec<String>,
    /// Comma-separated candidate disk paths (default: auto-discover /mnt/disk*)
    #[arg(long, value_delimiter = ',', value_name = "PATHS")]
    pub dest: Vec<String>,
    /// Headroom to keep free on every destination (default: 50MB)
    #[arg(long, value_parser = parse_size_arg, value_name = "SIZE")]
    pub min_space: Option<u64>,
    /// Ignore files smaller than this (default: 1MB)
    #[arg(long, value_parser = parse_size_arg, value_name = "SIZE")]
    pub min_file_size: Option<u64>,
    /// Comma-separated path prefixes to restrict moves to
    #[arg(long, value_delimiter = ',', value_name = "PREFIXES")]
    pub path_filter: Vec<String>,
    /// Reserved for future filtering; accepted but currently unused
    #[arg(long, value_delimiter = ',', value_name = "PATTERNS")]
    pub include: Vec<String>,
    /// Comma-separated substrings excluded at scan time
    #[arg(long, value_delimiter = ',', value_name = "SUBSTRINGS")]
    pub exclude: Vec<String>,
    /// Folder-grouping split threshold (default: 1GB; reserved)
    #[arg(long, value_parser = parse_size_arg, value_name = "SIZE")]
    pub min_split_size: Option<u64>,
    /// Folder-grouping dominance threshold 0..1 (default: 0.9; reserved)
    #[arg(long, value_name = "FRACTION")]
    pub move_as_folder_threshold: Option<f64>,
    /// Where to write the plan script (default: /config/plan.sh)
    #[arg(long, value_name = "PATH")]
    pub plan_file: Option<PathBuf>,
    /// Overwrite an existing plan file without asking
    #[arg(long)]
    pub force: bool,
    /// Verbose planner logging, including compact event lines
    #[arg(long)]
    pub debug: bool,
}

impl PlanArgs {
    /// True when any plan-shaping flag was given; used to decide whether a
    /// TTY session should be prompted instead.
    pub(crate) fn any_option_given(&self) -> bool {
        !self.src.is_empty()
            || !self.dest.is_empty()
            || self.min_space.is_some()
            || self.min_file_size.is_some()
            || !self.path_filter.is_empty()
            || !self.include.is_empty()
            || !self.exclude.is_empty()
            || self.min_split_size.is_some()
            || self.move_as_folder_threshold.is_some()
            || self.plan_file.is_some()
    }

    /// Fill unset flags from the defaults.
    pub(crate) fn resolve(self) -> PlanOptions {
        let defaults = PlanOptions::default();
        PlanOptions {
            src: self.src,
            dest: self.dest,
            min_space_bytes: self.min_space.unwrap_or(default_min_space()),
            min_file_size_bytes: self.min_file_size.unwrap_or(default_min_file_size()),
            path_filters: self.path_filter,
            includes: self.include,
            excludes: self.exclude,
            min_split_size_bytes: self.min_split_size.unwrap_or(default_min_split_size()),
            move_as_folder_threshold: self
                .move_as_folder_threshold
                .unwrap_or(default_move_as_folder_threshold()),
            plan_file: self.plan_file.unwrap_or(defaults.plan_file),
            force: self.force,
            debug: self.debug,
        }
    }
}

#[derive(Args, Clone, Debug)]
pub(crate) struct ApplyArgs {
    /// Plan script to execute (default: /config/plan.sh)
    #[arg(long, default_value = default_plan_file(), value_name = "PATH")]
    pub plan_file: PathBuf,
    /// How many transfer batches to run at once
    #[arg(long, default_value_t = default_concurrency(), value_name = "N")]
    pub concurrency: usize,
    /// Print the batches without running rsync
    #[arg(long)]
    pub dry_run: bool,
}

impl ApplyArgs {
    pub(crate) fn resolve(self) -> ApplyOptions {
        ApplyOptions {
            plan_file: self.plan_file,
            concurrency: self.concurrency,
            dry_run: self.dry_run,
        }
    }
}

#[derive(Args, Clone, Debug)]
pub(crate) struct ShowArgs {
    /// Plan script to summarize (default: /config/plan.sh)
    #[arg(long, default_value = default_plan_file(), value_name = "PATH")]
    pub plan_file: PathBuf,
}
