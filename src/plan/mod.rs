mod reader;
mod script;

pub(crate) use reader::{load_plan_file, parse_plan, PlanBatch, PlanFile};
pub(crate) use script::{batch_moves, render_script, ScriptBatch, EMPTY_SCRIPT};
