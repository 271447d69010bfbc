use super::helpers::{disk, file, mb};
use crate::events::CompactEvent;
use crate::packer::{
    apply_move, optimize_moves, pack_tightly, Disk, FileEntry, FileFilter, MoveStatus,
    PackOutcome, PackRequest, WorldView, REASON_NO_DESTINATION, REASON_TOO_LARGE,
};
use std::collections::HashSet;
use tokio_util::sync::CancellationToken;

fn pack(world: &WorldView, request: &PackRequest) -> PackOutcome {
    pack_tightly(world, request, None, &CancellationToken::new())
}

fn request_with_min_space(min_space: u64) -> PackRequest {
    PackRequest { filter: FileFilter::default(), src_disk_paths: Vec::new(), min_space_bytes: min_space }
}

/// Replay the emitted moves over the initial world, checking headroom at the
/// moment each move was appended.
fn assert_capacity_respected(initial: &WorldView, outcome: &PackOutcome, min_space: u64) {
    let mut world = initial.clone();
    for mv in &outcome.moves {
        let target = &world.disks[&mv.target_disk];
        assert!(
            target.free_bytes.saturating_sub(min_space) >= mv.file.size_bytes,
            "move of {} violates headroom on {}",
            mv.file.absolute_path,
            mv.target_disk
        );
        world = apply_move(&world, mv);
    }
}

#[test]
fn nothing_fits_nothing_moves() {
    // disk1 is completely full; disk2's 2 MB file has nowhere to go once the
    // 2 MB reserve is held back.
    let world = WorldView::new(
        vec![disk("/mnt/disk1", mb(1000), 0), disk("/mnt/disk2", mb(1000), mb(998))],
        vec![
            file("/mnt/disk1", "huge.bin", mb(1000)),
            file("/mnt/disk2", "small.bin", mb(2)),
        ],
    );

    let outcome = pack(&world, &request_with_min_space(mb(2)));
    assert!(outcome.moves.is_empty());
    assert_eq!(outcome.skipped, 2);
}

#[test]
fn perfect_fit_consolidates_onto_the_fullest_disk() {
    let world = WorldView::new(
        vec![
            disk("/mnt/disk1", mb(1000), mb(502)),
            disk("/mnt/disk2", mb(1000), mb(750)),
            disk("/mnt/disk3", mb(1000), mb(750)),
        ],
        vec![
            file("/mnt/disk1", "a.bin", mb(498)),
            file("/mnt/disk2", "b.bin", mb(250)),
            file("/mnt/disk3", "c.bin", mb(250)),
        ],
    );

    let outcome = pack(&world, &request_with_min_space(mb(2)));

    assert_eq!(outcome.moves.len(), 2);
    assert!(outcome.moves.iter().all(|m| m.target_disk == "/mnt/disk1"));
    let sources: Vec<&str> = outcome.moves.iter().map(|m| m.file.disk_path.as_str()).collect();
    assert_eq!(sources, vec!["/mnt/disk2", "/mnt/disk3"]);
    assert_capacity_respected(&world, &outcome, mb(2));
}

#[test]
fn single_source_restriction_is_honored() {
    let world = WorldView::new(
        vec![disk("/mnt/disk1", mb(1000), mb(900)), disk("/mnt/disk2", mb(1000), mb(100))],
        vec![file("/mnt/disk1", "a.bin", mb(50))],
    );

    let request = PackRequest {
        filter: FileFilter::default(),
        src_disk_paths: vec!["/mnt/disk1".to_string()],
        min_space_bytes: mb(2),
    };
    let outcome = pack(&world, &request);

    assert_eq!(outcome.moves.len(), 1);
    assert_eq!(outcome.moves[0].file.disk_path, "/mnt/disk1");
    assert_eq!(outcome.moves[0].target_disk, "/mnt/disk2");
    assert_eq!(outcome.moves[0].file.size_bytes, mb(50));
}

#[test]
fn sources_outside_the_restriction_never_move() {
    // disk2 is emptier and would normally rank first, but only disk3 may move.
    let world = WorldView::new(
        vec![
            disk("/mnt/disk1", mb(1000), mb(800)),
            disk("/mnt/disk2", mb(1000), mb(700)),
            disk("/mnt/disk3", mb(1000), mb(400)),
        ],
        vec![
            file("/mnt/disk2", "b.bin", mb(300)),
            file("/mnt/disk3", "c1.bin", mb(300)),
            file("/mnt/disk3", "c2.bin", mb(300)),
        ],
    );

    let request = PackRequest {
        filter: FileFilter::default(),
        src_disk_paths: vec!["/mnt/disk3".to_string()],
        min_space_bytes: mb(2),
    };
    let outcome = pack(&world, &request);

    assert!(!outcome.moves.is_empty());
    assert!(outcome.moves.iter().all(|m| m.file.disk_path == "/mnt/disk3"));
}

#[test]
fn min_file_size_filter_holds_small_files_back() {
    let world = WorldView::new(
        vec![disk("/mnt/disk1", mb(1000), mb(890)), disk("/mnt/disk2", mb(1000), mb(500))],
        vec![
            file("/mnt/disk1", "small.bin", mb(10)),
            file("/mnt/disk1", "large.bin", mb(100)),
        ],
    );

    let request = PackRequest {
        filter: FileFilter { min_size_bytes: Some(mb(50)), path_prefixes: Vec::new() },
        src_disk_paths: Vec::new(),
        min_space_bytes: mb(2),
    };
    let outcome = pack(&world, &request);

    assert_eq!(outcome.moves.len(), 1);
    assert_eq!(outcome.moves[0].file.relative_path, "large.bin");
}

#[test]
fn path_prefix_filter_restricts_moves() {
    let world = WorldView::new(
        vec![disk("/mnt/disk1", mb(1000), mb(700)), disk("/mnt/disk2", mb(1000), mb(500))],
        vec![
            file("/mnt/disk1", "videos/a.mkv", mb(100)),
            file("/mnt/disk1", "videos/b.mkv", mb(100)),
            file("/mnt/disk1", "photos/c.jpg", mb(100)),
        ],
    );

    let request = PackRequest {
        filter: FileFilter { min_size_bytes: None, path_prefixes: vec!["/videos/".to_string()] },
        src_disk_paths: Vec::new(),
        min_space_bytes: mb(2),
    };
    let outcome = pack(&world, &request);

    assert_eq!(outcome.moves.len(), 2);
    assert!(outcome.moves.iter().all(|m| m.file.relative_path.starts_with("videos/")));
}

#[test]
fn reserved_headroom_blocks_the_move() {
    let world = WorldView::new(
        vec![disk("/mnt/disk1", mb(1000), mb(900)), disk("/mnt/disk2", mb(1000), mb(150))],
        vec![file("/mnt/disk1", "a.bin", mb(100))],
    );

    let outcome = pack(&world, &request_with_min_space(mb(100)));
    assert!(outcome.moves.is_empty());
    assert_eq!(outcome.skipped, 1);

    let reasons: Vec<&str> = outcome
        .compact_events
        .iter()
        .filter_map(|e| match e {
            CompactEvent::Fail { reason, .. } => Some(reason.as_str()),
            CompactEvent::Init(_) | CompactEvent::Move { .. } | CompactEvent::Note(_) => None,
        })
        .collect();
    assert_eq!(reasons, vec![REASON_TOO_LARGE]);
}

#[test]
fn oversized_files_fail_fast_and_the_rest_proceed() {
    let world = WorldView::new(
        vec![disk("/mnt/disk1", mb(1000), mb(500)), disk("/mnt/disk2", mb(1000), mb(200))],
        vec![
            file("/mnt/disk1", "too_big.bin", mb(400)),
            file("/mnt/disk1", "fits.bin", mb(100)),
        ],
    );

    let outcome = pack(&world, &request_with_min_space(mb(2)));

    assert_eq!(outcome.moves.len(), 1);
    assert_eq!(outcome.moves[0].file.relative_path, "fits.bin");
    assert_eq!(outcome.skipped, 1);
}

#[test]
fn no_destination_reason_when_headroom_ran_out_mid_source() {
    // Both files pass the max-available check computed up front, but the
    // first fill leaves no room for the second.
    let world = WorldView::new(
        vec![disk("/mnt/disk1", mb(1000), mb(600)), disk("/mnt/disk2", mb(1000), mb(250))],
        vec![
            file("/mnt/disk1", "first.bin", mb(200)),
            file("/mnt/disk1", "second.bin", mb(150)),
        ],
    );

    let outcome = pack(&world, &request_with_min_space(mb(2)));

    assert_eq!(outcome.moves.len(), 1);
    assert_eq!(outcome.moves[0].file.relative_path, "first.bin");
    assert_eq!(outcome.skipped, 1);
    assert!(outcome.compact_events.iter().any(|e| matches!(
        e,
        CompactEvent::Fail { reason, .. } if reason == REASON_NO_DESTINATION
    )));
}

#[test]
fn a_pair_that_fills_the_destination_beats_the_biggest_single_file() {
    // disk1 has exactly 545 MB free; disk2 holds {540, 345, 200}. The pair
    // {345, 200} fills disk1 to the byte, so the lone 540 must not win.
    let world = WorldView::new(
        vec![disk("/mnt/disk1", mb(1000), mb(545)), disk("/mnt/disk2", mb(2000), mb(915))],
        vec![
            file("/mnt/disk2", "big.bin", mb(540)),
            file("/mnt/disk2", "mid.bin", mb(345)),
            file("/mnt/disk2", "small.bin", mb(200)),
        ],
    );

    let outcome = pack(&world, &request_with_min_space(0));

    assert_eq!(outcome.moves.len(), 2);
    assert!(outcome.moves.iter().all(|m| m.target_disk == "/mnt/disk1"));
    let mut sizes: Vec<u64> = outcome.moves.iter().map(|m| m.file.size_bytes).collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![mb(200), mb(345)]);

    // disk1 is filled to the byte and the 540 has nowhere left to go.
    assert_eq!(outcome.final_world.disks["/mnt/disk1"].free_bytes, 0);
    assert_eq!(outcome.skipped, 1);
    assert!(outcome.compact_events.iter().any(|e| matches!(
        e,
        CompactEvent::Fail { file_name, reason, .. }
            if file_name == "big.bin" && reason == REASON_NO_DESTINATION
    )));
    assert_capacity_respected(&world, &outcome, 0);
}

#[test]
fn the_pseudo_disk_is_invisible_to_packing() {
    let world = WorldView::new(
        vec![
            disk("/mnt/disk1", mb(1000), mb(900)),
            disk("/mnt/disks", mb(10000), mb(10000)),
        ],
        vec![
            file("/mnt/disk1", "a.bin", mb(50)),
            file("/mnt/disks", "usb/b.bin", mb(50)),
        ],
    );

    let outcome = pack(&world, &request_with_min_space(mb(2)));

    // Nothing may target the pseudo-disk and its files never move.
    assert!(outcome.moves.iter().all(|m| m.target_disk != "/mnt/disks"));
    assert!(outcome.moves.iter().all(|m| m.file.disk_path != "/mnt/disks"));
}

#[test]
fn each_world_file_moves_at_most_once_after_optimization() {
    let world = eight_disk_world();
    let outcome = pack(&world, &request_with_min_space(mb(2)));
    let optimized = optimize_moves(&outcome.moves);

    let mut seen = HashSet::new();
    for mv in optimized.iter().filter(|m| m.status == MoveStatus::Pending) {
        assert_ne!(mv.file.disk_path, mv.target_disk, "self-move survived optimization");
        assert!(
            seen.insert(mv.file.absolute_path.clone()),
            "{} moved twice",
            mv.file.absolute_path
        );
    }
}

#[test]
fn cancellation_before_the_first_source_yields_no_moves() {
    let world = WorldView::new(
        vec![disk("/mnt/disk1", mb(1000), mb(900)), disk("/mnt/disk2", mb(1000), mb(100))],
        vec![file("/mnt/disk1", "a.bin", mb(50))],
    );

    let cancel = CancellationToken::new();
    cancel.cancel();
    let outcome = pack_tightly(&world, &request_with_min_space(mb(2)), None, &cancel);

    assert!(outcome.moves.is_empty());
}

#[test]
fn event_stream_opens_with_the_initial_disk_state() {
    let world = WorldView::new(
        vec![disk("/mnt/disk1", mb(1000), mb(900)), disk("/mnt/disk2", mb(1000), mb(100))],
        vec![file("/mnt/disk1", "a.bin", mb(50))],
    );

    let outcome = pack(&world, &request_with_min_space(mb(2)));

    let CompactEvent::Init(disks) = &outcome.compact_events[0] else {
        panic!("first compact event must be Init");
    };
    assert_eq!(disks.len(), 2);
    assert_eq!(disks[0].path, "/mnt/disk1");
    assert_eq!(disks[0].total_bytes, mb(1000));
    assert_eq!(disks[0].free_bytes, mb(900));

    // The move event indexes into that disk list.
    assert!(outcome.compact_events.iter().any(|e| matches!(
        e,
        CompactEvent::Move { from_idx: 0, to_idx: 1, size_bytes, .. } if *size_bytes == mb(50)
    )));

    assert_eq!(outcome.snapshots[0].action, "Start");
    assert_eq!(outcome.snapshots[0].total_files, Some(1));
    let steps: Vec<u64> = outcome.snapshots.iter().map(|s| s.step).collect();
    assert!(steps.windows(2).all(|w| w[0] < w[1]), "steps must increase monotonically");
}

#[test]
fn evacuated_source_announces_itself() {
    let world = WorldView::new(
        vec![disk("/mnt/disk1", mb(1000), mb(900)), disk("/mnt/disk2", mb(1000), mb(100))],
        vec![file("/mnt/disk1", "a.bin", mb(50))],
    );

    let outcome = pack(&world, &request_with_min_space(mb(2)));

    assert!(outcome
        .snapshots
        .iter()
        .any(|s| s.action == "🎉 /mnt/disk1: EMPTY!"));
}

/// Eight 974 MB disks with mixed fullness, four files each: a shrunken
/// version of a real half-full array.
fn eight_disk_world() -> WorldView {
    let free = [213_u64, 159, 136, 94, 60, 32, 24, 295];
    let mut disks: Vec<Disk> = Vec::new();
    let mut files: Vec<FileEntry> = Vec::new();

    for (i, free_mb) in free.iter().enumerate() {
        let path = format!("/mnt/disk{}", i + 1);
        disks.push(disk(&path, mb(974), mb(*free_mb)));

        let used = 974 - free_mb;
        files.push(file(&path, &format!("data/big{}.bin", i + 1), mb(used - 60)));
        files.push(file(&path, &format!("data/mid{}.bin", i + 1), mb(30)));
        files.push(file(&path, &format!("data/small{}.bin", i + 1), mb(20)));
        files.push(file(&path, &format!("data/tiny{}.bin", i + 1), mb(10)));
    }

    WorldView::new(disks, files)
}

#[test]
fn eight_disk_array_evacuates_the_emptiest_disks_first() {
    let world = eight_disk_world();
    let min_space = mb(2);
    let outcome = pack(&world, &request_with_min_space(min_space));

    assert_capacity_respected(&world, &outcome, min_space);

    // disk8 is the emptiest, disk1 the runner-up; their movable files go
    // first, landing on the fullest disks with room (6, 7, then 5).
    let first_sources: Vec<&str> =
        outcome.moves.iter().take(3).map(|m| m.file.disk_path.as_str()).collect();
    assert_eq!(first_sources, vec!["/mnt/disk8", "/mnt/disk8", "/mnt/disk8"]);

    let first_targets: Vec<&str> =
        outcome.moves.iter().take(3).map(|m| m.target_disk.as_str()).collect();
    assert_eq!(first_targets, vec!["/mnt/disk6", "/mnt/disk7", "/mnt/disk5"]);

    let next_sources: Vec<&str> =
        outcome.moves.iter().skip(3).take(3).map(|m| m.file.disk_path.as_str()).collect();
    assert_eq!(next_sources, vec!["/mnt/disk1", "/mnt/disk1", "/mnt/disk1"]);

    for receiver in ["/mnt/disk5", "/mnt/disk6", "/mnt/disk7"] {
        assert!(
            outcome.moves.iter().any(|m| m.target_disk == receiver),
            "{receiver} should receive data"
        );
    }

    // Free space is conserved across the whole simulation.
    assert_eq!(world.total_free(), outcome.final_world.total_free());
}
