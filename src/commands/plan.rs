use crate::config::{default_concurrency, PlanOptions, RuntimeConfig};
use crate::errors::{classify_io, AppError, IoClass, PlanFileError};
use crate::events::{EventHub, PlanEvent};
use crate::packer::{
    count_evacuated, optimize_moves, pack_tightly, project_disk_states, Disk, FileEntry,
    FileFilter, MovePlan, PackRequest, PlanResult, PlanStats, WorldView,
};
use crate::plan::render_script;
use crate::prompt::confirm_overwrite;
use crate::scanner::{discover_disks, probe_disk, scan_disk, validation, ScanContext};
use crate::units::format_size;
use anyhow::Context;
use std::collections::BTreeSet;
use std::io;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Run the full planning pipeline: discover and probe disks, scan them in
/// parallel, pack, optimize, project, render, and write the script.
pub(crate) async fn run_plan(
    opts: &PlanOptions,
    cfg: &RuntimeConfig,
    cancel: &CancellationToken,
) -> Result<(), AppError> {
    opts.validate()?;

    let disk_paths = resolve_disk_paths(opts, cfg)?;
    info!("Planning against {} disks", disk_paths.len());

    let mut disks: Vec<Disk> = Vec::with_capacity(disk_paths.len());
    for path in &disk_paths {
        validation::validate_disk_path(path)?;
        disks.push(probe_disk(path)?);
    }

    let files = scan_all(&disks, opts, cfg, cancel).await?;
    info!("Scanned {} files total", files.len());

    let src_disk_paths: Vec<String> = opts.src.iter().map(|p| normalize_disk_path(p)).collect();
    let world = WorldView::new(disks.clone(), files);
    let request = PackRequest {
        filter: FileFilter {
            min_size_bytes: Some(opts.min_file_size_bytes),
            path_prefixes: opts.path_filters.clone(),
        },
        src_disk_paths: src_disk_paths.clone(),
        min_space_bytes: opts.min_space_bytes,
    };

    let hub = EventHub::new(cfg.event_capacity);
    let mut rx = hub.subscribe();
    let show_compact = opts.debug;
    let printer = tokio::spawn(async move {
        while let Ok(event) = rx.recv().await {
            match event {
                PlanEvent::Snapshot(snap) => {
                    if show_compact {
                        let json = serde_json::to_string(&snap).unwrap_or_default();
                        debug!("snapshot: {json}");
                    }
                    info!("{}", snap.action);
                }
                PlanEvent::Compact(ev) => {
                    if show_compact {
                        debug!("{}", ev.to_line());
                    }
                }
            }
        }
    });

    let pack_hub = hub.clone();
    let pack_cancel = cancel.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        pack_tightly(&world, &request, Some(&pack_hub), &pack_cancel)
    })
    .await
    .map_err(|e| AppError::Unexpected(anyhow::Error::new(e).context("packer task failed")))?;

    drop(hub);
    printer.await.ok();

    let optimized = optimize_moves(&outcome.moves);
    let plan = MovePlan::from_moves(optimized);

    let projections = project_disk_states(&disks, &plan.moves);
    let evacuated = count_evacuated(&projections);

    let script = render_script(
        &plan,
        src_disk_paths.first().map(String::as_str),
        default_concurrency(),
        chrono::Local::now().date_naive(),
    );

    let result = PlanResult {
        script,
        stats: PlanStats {
            bytes_consolidated: plan.summary.total_bytes,
            moves_planned: plan.summary.total_files,
            skipped: outcome.skipped,
            disks_evacuated: evacuated,
        },
        disk_projections: projections,
        snapshots: outcome.snapshots,
        compact_events: outcome.compact_events,
    };

    write_plan_file(opts, &result.script)?;
    print_plan_summary(opts, &result);
    Ok(())
}

/// The world the planner sees: explicit destinations when given (plus any
/// explicit sources), otherwise whatever /mnt holds.
fn resolve_disk_paths(opts: &PlanOptions, cfg: &RuntimeConfig) -> Result<Vec<String>, AppError> {
    let mut paths: BTreeSet<String> = if opts.dest.is_empty() {
        discover_disks(&cfg.mnt_base)?.into_iter().collect()
    } else {
        opts.dest.iter().map(|p| normalize_disk_path(p)).collect()
    };
    for src in &opts.src {
        paths.insert(normalize_disk_path(src));
    }
    Ok(paths.into_iter().collect())
}

/// Strip trailing slashes so `/mnt/disk1/` and `/mnt/disk1` are one disk.
fn normalize_disk_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/".to_string() } else { trimmed.to_string() }
}

/// Fan out one blocking scan per disk and gather every file found.
async fn scan_all(
    disks: &[Disk],
    opts: &PlanOptions,
    cfg: &RuntimeConfig,
    cancel: &CancellationToken,
) -> Result<Vec<FileEntry>, AppError> {
    let mut handles = Vec::with_capacity(disks.len());
    for disk in disks {
        let ctx = ScanContext {
            mount_path: disk.path.clone(),
            excludes: opts.excludes.clone(),
            num_threads: cfg.scan_threads,
            cancel: cancel.clone(),
        };
        handles.push(tokio::task::spawn_blocking(move || scan_disk(&ctx)));
    }

    let mut files = Vec::new();
    for handle in handles {
        let scanned = handle.await.map_err(|e| {
            AppError::Unexpected(anyhow::Error::new(e).context("scan task failed"))
        })??;
        files.extend(scanned);
    }
    Ok(files)
}

fn write_plan_file(opts: &PlanOptions, script: &str) -> Result<(), AppError> {
    let path = &opts.plan_file;
    let path_display = path.display().to_string();

    if path.exists() && !opts.force {
        let overwrite = confirm_overwrite(path).context("overwrite prompt failed")?;
        if !overwrite {
            return Err(PlanFileError::SaveFailed {
                path: path_display,
                source: io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    "plan file exists; pass --force to overwrite",
                ),
            }
            .into());
        }
    }

    std::fs::write(path, script).map_err(|e| match classify_io(&e) {
        IoClass::PermissionDenied => PlanFileError::PermissionDenied { path: path_display.clone() },
        IoClass::NotFound | IoClass::NotADirectory | IoClass::Other => {
            PlanFileError::SaveFailed { path: path_display.clone(), source: e }
        }
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
            .map_err(|e| PlanFileError::SaveFailed { path: path_display.clone(), source: e })?;
    }

    info!("Plan written to {}", path_display);
    Ok(())
}

fn print_plan_summary(opts: &PlanOptions, result: &PlanResult) {
    println!("Plan: {}", opts.plan_file.display());
    println!(
        "  {} moves, {} to consolidate, {} skipped, {} disk(s) evacuated",
        result.stats.moves_planned,
        format_size(result.stats.bytes_consolidated as i64),
        result.stats.skipped,
        result.stats.disks_evacuated,
    );
    for proj in &result.disk_projections {
        let marker = if proj.evacuated() { "  → EMPTY" } else { "" };
        println!(
            "  {}: free {} → {}{}",
            proj.path,
            format_size(proj.initial_free_bytes as i64),
            format_size(proj.final_free_bytes as i64),
            marker,
        );
    }
    if result.stats.moves_planned == 0 {
        println!("  Nothing to move; the script is a no-op.");
    } else {
        println!("  Review it, then run: tightpack apply --plan-file {}", opts.plan_file.display());
    }
}
