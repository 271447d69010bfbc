use crate::packer::MovePlan;
use crate::units::format_size;
use chrono::NaiveDate;
use std::fmt::Write as _;

/// Emitted when the packer found nothing to move; still a runnable script.
pub(crate) const EMPTY_SCRIPT: &str = "#!/bin/bash\nexit 0\n";

/// One (source disk, target disk) group of pending moves, in the order the
/// pair first appears in the plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScriptBatch {
    pub source_disk: String,
    pub target_disk: String,
    pub relative_paths: Vec<String>,
    pub total_bytes: u64,
}

/// Group a plan's pending moves into per-(source, target) transfer batches.
pub(crate) fn batch_moves(plan: &MovePlan) -> Vec<ScriptBatch> {
    let mut batches: Vec<ScriptBatch> = Vec::new();

    for mv in plan.pending() {
        let source_disk = mv.file.disk_path.as_str();
        let target_disk = mv.target_disk.as_str();

        let existing = batches
            .iter()
            .position(|b| b.source_disk == source_disk && b.target_disk == target_disk);
        let idx = match existing {
            Some(i) => i,
            None => {
                batches.push(ScriptBatch {
                    source_disk: source_disk.to_string(),
                    target_disk: target_disk.to_string(),
                    relative_paths: Vec::new(),
                    total_bytes: 0,
                });
                batches.len() - 1
            }
        };

        batches[idx].relative_paths.push(mv.file.relative_path.clone());
        batches[idx].total_bytes += mv.file.size_bytes;
    }

    batches
}

/// Render the executable transfer script: a commented header, one
/// backgrounded rsync per batch, and a final `wait`. This text is the
/// contract the executor parses, so the shape here is load-bearing.
pub(crate) fn render_script(
    plan: &MovePlan,
    primary_source: Option<&str>,
    concurrency: usize,
    generated: NaiveDate,
) -> String {
    let batches = batch_moves(plan);
    if batches.is_empty() {
        return EMPTY_SCRIPT.to_string();
    }

    let mut out = String::new();
    out.push_str("#!/bin/bash\n");
    out.push_str("#\n");
    out.push_str("# Unraid Bin-Pack Plan\n");
    let _ = writeln!(out, "# Generated: {}", generated.format("%Y-%m-%d"));
    let _ = writeln!(out, "# Source disk: {}", primary_source.unwrap_or("auto"));
    let _ = writeln!(out, "# Total files: {}", plan.summary.total_files);
    let _ = writeln!(out, "# Total size: {}", format_size(plan.summary.total_bytes as i64));
    let _ = writeln!(out, "# Concurrency: {concurrency}");
    out.push_str("#\n");
    out.push_str("set -e\n");

    for batch in &batches {
        out.push('\n');
        let _ = writeln!(
            out,
            "# Batch: {} -> {} ({} files, {})",
            batch.source_disk,
            batch.target_disk,
            batch.relative_paths.len(),
            format_size(batch.total_bytes as i64)
        );
        out.push_str("rsync -a --remove-source-files --files-from=<(cat <<'EOF'\n");
        for rel in &batch.relative_paths {
            out.push_str(rel);
            out.push('\n');
        }
        out.push_str("EOF\n");
        let _ = writeln!(out, ") \"{}/\" \"{}/\" &", batch.source_disk, batch.target_disk);
    }

    out.push_str("\nwait\n");
    out
}
