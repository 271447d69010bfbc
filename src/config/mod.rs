mod defaults;
mod options;

pub(crate) use options::{
    default_concurrency, default_min_file_size, default_min_space, default_min_split_size,
    default_move_as_folder_threshold, default_plan_file, ApplyOptions, PlanOptions, RuntimeConfig,
};
