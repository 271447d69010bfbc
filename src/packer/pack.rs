use super::combinations::{find_best_combination, DEFAULT_MAX_COMBINATION_SIZE};
use super::destination::find_best_destination;
use super::filter::FileFilter;
use super::rank::rank_disks_by_fullness;
use super::world::{apply_move, FileEntry, FileMove, WorldView};
use crate::events::{
    bytes_to_gb, bytes_to_mb, CompactEvent, DiskTriple, EventHub, PlanEvent, Snapshot,
};
use std::collections::{HashMap, HashSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Unraid's unassigned-devices pseudo-mount; never a source, never a target.
const PSEUDO_DISK: &str = "/mnt/disks";

/// Fail reason for a file bigger than every destination's headroom.
pub(crate) const REASON_TOO_LARGE: &str = "too large";

/// Fail reason when no destination passes the best-fit check.
pub(crate) const REASON_NO_DESTINATION: &str = "no destination fits";

/// Inputs to a packing run.
#[derive(Debug, Clone, Default)]
pub(crate) struct PackRequest {
    pub filter: FileFilter,
    /// Restrict evacuation sources to these disks; empty means rank all.
    pub src_disk_paths: Vec<String>,
    /// Headroom every destination must keep free after a fill.
    pub min_space_bytes: u64,
}

/// Everything a packing run produced: the move list, the simulated end state,
/// and both advisory event streams.
#[derive(Debug)]
pub(crate) struct PackOutcome {
    pub moves: Vec<FileMove>,
    pub final_world: WorldView,
    pub snapshots: Vec<Snapshot>,
    pub compact_events: Vec<CompactEvent>,
    /// Files that could not be placed anywhere.
    pub skipped: usize,
}

/// Both event streams share a step counter and an optional live hub; the
/// vectors are always collected so the outcome is self-contained.
struct EventSink<'a> {
    hub: Option<&'a EventHub>,
    snapshots: Vec<Snapshot>,
    compact_events: Vec<CompactEvent>,
    step: u64,
}

impl EventSink<'_> {
    fn next_step(&mut self) -> u64 {
        let step = self.step;
        self.step += 1;
        step
    }

    fn snapshot(&mut self, snap: Snapshot) {
        if let Some(hub) = self.hub {
            hub.publish(PlanEvent::Snapshot(snap.clone()));
        }
        self.snapshots.push(snap);
    }

    fn compact(&mut self, event: CompactEvent) {
        debug!("compact event: {}", event.to_line());
        if let Some(hub) = self.hub {
            hub.publish(PlanEvent::Compact(event.clone()));
        }
        self.compact_events.push(event);
    }
}

/// Evacuate the least-full disks first, filling the fullest destination that
/// still fits each time, so free space concentrates and disks empty out
/// entirely. Once a destination is chosen, the combination search picks the
/// file tuple that fills it tightest; a lone big file loses to a pair that
/// leaves less slack.
///
/// Never fails: files that cannot be placed become fail events and count as
/// skipped. Cancellation is honored between placements; the moves accumulated
/// so far are returned.
pub(crate) fn pack_tightly(
    initial: &WorldView,
    request: &PackRequest,
    hub: Option<&EventHub>,
    cancel: &CancellationToken,
) -> PackOutcome {
    let mut sink =
        EventSink { hub, snapshots: Vec::new(), compact_events: Vec::new(), step: 0 };

    // Disk indices for compact events are fixed by the initial state.
    let disk_order: Vec<String> = initial.disks.keys().cloned().collect();
    let disk_idx: HashMap<&str, usize> =
        disk_order.iter().enumerate().map(|(i, p)| (p.as_str(), i)).collect();

    sink.compact(CompactEvent::Init(
        initial
            .disks
            .values()
            .map(|d| DiskTriple {
                path: d.path.clone(),
                total_bytes: d.total_bytes,
                free_bytes: d.free_bytes,
            })
            .collect(),
    ));

    let filtered = request.filter.apply(&initial.files);

    let mut ranked: Vec<String> = rank_disks_by_fullness(initial, &filtered)
        .into_iter()
        .map(|r| r.disk.path)
        .filter(|p| p != PSEUDO_DISK)
        .collect();
    if !request.src_disk_paths.is_empty() {
        ranked.retain(|p| request.src_disk_paths.contains(p));
    }

    info!(
        "Packing: {} candidate files across {} evacuation sources, min_space={}",
        filtered.len(),
        ranked.len(),
        request.min_space_bytes
    );

    let start_step = sink.next_step();
    let mut start = Snapshot::new(start_step, "Start");
    start.total_files = Some(filtered.len());
    sink.snapshot(start);

    let mut world = initial.clone();
    let mut processed: HashSet<String> = HashSet::new();
    processed.insert(PSEUDO_DISK.to_string());
    let mut moves: Vec<FileMove> = Vec::new();
    let mut skipped = 0usize;
    let mut moved_count = 0usize;

    for source in &ranked {
        if cancel.is_cancelled() {
            info!("Packing cancelled; returning {} moves planned so far", moves.len());
            break;
        }
        if processed.contains(source) {
            continue;
        }

        let source_free = world.disks.get(source).map_or(0, |d| d.free_bytes);
        let source_step = sink.next_step();
        let mut snap = Snapshot::new(source_step, format!("Processing {source}"));
        snap.source_free_gb = Some(bytes_to_gb(source_free));
        sink.snapshot(snap);
        sink.compact(CompactEvent::Note(format!("Processing {source}")));

        let mut candidates: Vec<FileEntry> = world
            .files_on(source)
            .filter(|f| request.filter.matches(f))
            .cloned()
            .collect();
        candidates.sort_by(|a, b| {
            b.size_bytes.cmp(&a.size_bytes).then_with(|| a.absolute_path.cmp(&b.absolute_path))
        });

        let max_available = world
            .disks
            .values()
            .filter(|d| d.path != *source && !processed.contains(&d.path))
            .map(|d| d.free_bytes.saturating_sub(request.min_space_bytes))
            .max()
            .unwrap_or(0);

        // Every pass either places a tuple of files or retires the largest
        // remaining candidate with a fail event, so the loop always shrinks.
        while let Some(head) = candidates.first().cloned() {
            if cancel.is_cancelled() {
                break;
            }

            if head.size_bytes > max_available {
                skipped += 1;
                emit_fail(&mut sink, &disk_idx, &head, REASON_TOO_LARGE);
                candidates.remove(0);
                continue;
            }

            let Some(target) = find_best_destination(
                &head,
                &world,
                source,
                &processed,
                request.min_space_bytes,
            ) else {
                skipped += 1;
                emit_fail(&mut sink, &disk_idx, &head, REASON_NO_DESTINATION);
                candidates.remove(0);
                continue;
            };

            // The chosen destination fits the largest file, but a small
            // tuple of the remaining candidates may fill it tighter.
            let available = world
                .disks
                .get(&target)
                .map_or(0, |d| d.free_bytes.saturating_sub(request.min_space_bytes));
            let chosen =
                find_best_combination(&candidates, available, DEFAULT_MAX_COMBINATION_SIZE)
                    .map_or_else(|| vec![head], |c| c.files);

            for file in chosen {
                candidates.retain(|f| f.absolute_path != file.absolute_path);
                let mv = FileMove::pending(file, &target);
                moved_count += 1;
                emit_move(&mut sink, &disk_idx, &world, &mv, moved_count);
                world = apply_move(&world, &mv);
                moves.push(mv);
            }
        }

        if world.files_on(source).next().is_none() {
            let empty_step = sink.next_step();
            sink.snapshot(Snapshot::new(empty_step, format!("🎉 {source}: EMPTY!")));
            sink.compact(CompactEvent::Note(format!("{source}: EMPTY!")));
        }

        processed.insert(source.clone());
    }

    info!("Packing done: {} moves planned, {} files skipped", moves.len(), skipped);

    PackOutcome {
        moves,
        final_world: world,
        snapshots: sink.snapshots,
        compact_events: sink.compact_events,
        skipped,
    }
}

fn emit_fail(
    sink: &mut EventSink<'_>,
    disk_idx: &HashMap<&str, usize>,
    file: &FileEntry,
    reason: &str,
) {
    let step = sink.next_step();
    let mut snap = Snapshot::new(step, format!("❌ Can't move {}", file.file_name()));
    snap.file_name = Some(file.file_name().to_string());
    snap.file_size_mb = Some(bytes_to_mb(file.size_bytes));
    snap.reason = Some(reason.to_string());
    sink.snapshot(snap);

    sink.compact(CompactEvent::Fail {
        file_name: file.file_name().to_string(),
        from_idx: disk_idx.get(file.disk_path.as_str()).copied().unwrap_or(0),
        reason: reason.to_string(),
    });
}

fn emit_move(
    sink: &mut EventSink<'_>,
    disk_idx: &HashMap<&str, usize>,
    world: &WorldView,
    mv: &FileMove,
    moved_count: usize,
) {
    let source_free = world.disks.get(&mv.file.disk_path).map_or(0, |d| d.free_bytes);
    let target_free = world.disks.get(&mv.target_disk).map_or(0, |d| d.free_bytes);

    let step = sink.next_step();
    let mut snap =
        Snapshot::new(step, format!("✓ {} → {}", mv.file.file_name(), mv.target_disk));
    snap.source_free_gb = Some(bytes_to_gb(source_free));
    snap.target_free_gb = Some(bytes_to_gb(target_free));
    snap.file_name = Some(mv.file.file_name().to_string());
    snap.file_size_mb = Some(bytes_to_mb(mv.file.size_bytes));
    snap.moved_count = Some(moved_count);
    sink.snapshot(snap);

    sink.compact(CompactEvent::Move {
        file_name: mv.file.file_name().to_string(),
        from_idx: disk_idx.get(mv.file.disk_path.as_str()).copied().unwrap_or(0),
        to_idx: disk_idx.get(mv.target_disk.as_str()).copied().unwrap_or(0),
        size_bytes: mv.file.size_bytes,
    });
}
