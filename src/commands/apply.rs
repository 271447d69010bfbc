use crate::config::ApplyOptions;
use crate::errors::AppError;
use crate::executor::apply_plan;
use crate::plan::load_plan_file;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Execute a previously written plan script batch by batch.
pub(crate) async fn run_apply(
    opts: &ApplyOptions,
    cancel: &CancellationToken,
) -> Result<(), AppError> {
    opts.validate()?;

    let plan = load_plan_file(&opts.plan_file)?;
    if plan.is_empty() {
        println!("Plan {} has no pending moves; nothing to do.", opts.plan_file.display());
        return Ok(());
    }

    info!(
        "Applying {} ({} batches, concurrency {})",
        opts.plan_file.display(),
        plan.batches.len(),
        opts.concurrency
    );

    let stats = apply_plan(&plan, opts.concurrency, opts.dry_run, cancel).await?;

    if opts.dry_run {
        println!(
            "Dry run: {} batches, {} files would move.",
            plan.batches.len(),
            stats.files_requested
        );
    } else {
        println!(
            "Applied {} batches ({} files requested).",
            stats.batches_run, stats.files_requested
        );
    }
    Ok(())
}
