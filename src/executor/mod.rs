use crate::errors::TransferError;
use crate::plan::{PlanBatch, PlanFile};
use futures::stream::{self, StreamExt};
use regex::Regex;
use std::process::Stdio;
use std::sync::OnceLock;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Totals from one apply run.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ApplyStats {
    pub batches_run: usize,
    pub batches_failed: usize,
    pub files_requested: usize,
}

#[allow(clippy::unwrap_used)]
fn rsync_version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"rsync\s+version\s+(\d+)\.(\d+)\.(\d+)").unwrap())
}

/// Confirm rsync is runnable before touching any data.
pub(crate) async fn probe_rsync() -> Result<(), TransferError> {
    let output = Command::new("rsync").arg("--version").output().await.map_err(|e| {
        TransferError::BackendUnavailable { message: format!("cannot run rsync: {e}") }
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if let Some(caps) = rsync_version_regex().captures(&stdout) {
        info!("rsync version: {}.{}.{}", &caps[1], &caps[2], &caps[3]);
        Ok(())
    } else {
        Err(TransferError::BackendUnavailable {
            message: "could not parse rsync version output".to_string(),
        })
    }
}

/// Map a failed rsync run onto the transfer taxonomy using its stderr text.
fn classify_rsync_failure(batch: &PlanBatch, code: Option<i32>, stderr: &str) -> TransferError {
    let lower = stderr.to_ascii_lowercase();
    if lower.contains("no space left") {
        TransferError::DiskFull { path: batch.target_disk.clone() }
    } else if lower.contains("permission denied") {
        // rsync reports receiver-side failures with "(in receiver)".
        if lower.contains("receiver") {
            TransferError::DestinationPermissionDenied { path: batch.target_disk.clone() }
        } else {
            TransferError::SourcePermissionDenied { path: batch.source_disk.clone() }
        }
    } else if lower.contains("no such file") {
        TransferError::SourceNotFound { path: batch.source_disk.clone() }
    } else {
        TransferError::Failed {
            message: format!(
                "rsync {} -> {} exited with {:?}",
                batch.source_disk, batch.target_disk, code
            ),
        }
    }
}

/// Run one batch: rsync with the batch's file list on stdin. Mirrors the
/// command the plan script embeds, minus the shell.
async fn run_batch(batch: &PlanBatch) -> Result<(), TransferError> {
    let mut child = Command::new("rsync")
        .arg("-a")
        .arg("--remove-source-files")
        .arg("--files-from=-")
        .arg(format!("{}/", batch.source_disk))
        .arg(format!("{}/", batch.target_disk))
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| TransferError::BackendUnavailable {
            message: format!("cannot run rsync: {e}"),
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        let mut list = batch.relative_paths.join("\n");
        list.push('\n');
        stdin.write_all(list.as_bytes()).await.map_err(|e| TransferError::Failed {
            message: format!("could not send file list to rsync: {e}"),
        })?;
    }

    let output = child.wait_with_output().await.map_err(|e| TransferError::Failed {
        message: format!("rsync did not finish: {e}"),
    })?;

    if output.status.success() {
        info!(
            "Batch complete: {} -> {} ({} files)",
            batch.source_disk,
            batch.target_disk,
            batch.relative_paths.len()
        );
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(classify_rsync_failure(batch, output.status.code(), &stderr))
    }
}

/// Apply a parsed plan, running up to `concurrency` batches at once.
///
/// Every batch is attempted even when earlier ones fail; a single summary
/// error is raised afterwards so the CLI exits non-zero. Dry-run only prints
/// what would move.
pub(crate) async fn apply_plan(
    plan: &PlanFile,
    concurrency: usize,
    dry_run: bool,
    cancel: &CancellationToken,
) -> Result<ApplyStats, TransferError> {
    let mut stats = ApplyStats {
        batches_run: 0,
        batches_failed: 0,
        files_requested: plan.batches.iter().map(|b| b.relative_paths.len()).sum(),
    };

    if dry_run {
        for batch in &plan.batches {
            info!(
                "[dry-run] {} -> {}: {} files ({})",
                batch.source_disk,
                batch.target_disk,
                batch.relative_paths.len(),
                batch.size_label
            );
        }
        return Ok(stats);
    }

    probe_rsync().await?;

    let results: Vec<Result<(), TransferError>> = stream::iter(plan.batches.iter())
        .map(|batch| async move {
            if cancel.is_cancelled() {
                return Err(TransferError::Failed { message: "apply cancelled".to_string() });
            }
            run_batch(batch).await
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    for result in results {
        stats.batches_run += 1;
        if let Err(e) = result {
            stats.batches_failed += 1;
            warn!("Batch failed: {e}");
        }
    }

    if stats.batches_failed > 0 {
        return Err(TransferError::Failed {
            message: format!("{} of {} batches failed", stats.batches_failed, stats.batches_run),
        });
    }

    Ok(stats)
}
