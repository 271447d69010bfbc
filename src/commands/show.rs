use crate::cli::ShowArgs;
use crate::errors::AppError;
use crate::plan::load_plan_file;

/// Print a human summary of a plan script without touching any data.
pub(crate) fn run_show(args: &ShowArgs) -> Result<(), AppError> {
    let plan = load_plan_file(&args.plan_file)?;

    println!("Plan: {}", args.plan_file.display());
    if plan.is_empty() {
        println!("  No pending moves.");
        return Ok(());
    }

    if let Some(generated) = &plan.generated {
        println!("  Generated:  {generated}");
    }
    if let Some(source) = &plan.source_disk {
        println!("  Source:     {source}");
    }
    if let Some(files) = plan.total_files {
        println!("  Files:      {files}");
    }
    if let Some(size) = &plan.total_size {
        println!("  Total size: {size}");
    }
    if let Some(concurrency) = plan.concurrency {
        println!("  Concurrency: {concurrency}");
    }

    println!("  Batches:");
    for batch in &plan.batches {
        println!(
            "    {} -> {}: {} files ({})",
            batch.source_disk,
            batch.target_disk,
            batch.relative_paths.len(),
            batch.size_label,
        );
    }
    Ok(())
}
