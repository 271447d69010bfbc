mod apply;
mod plan;
mod show;

pub(crate) use apply::run_apply;
pub(crate) use plan::run_plan;
pub(crate) use show::run_show;
