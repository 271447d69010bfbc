use super::helpers::{file, mb};
use crate::packer::{FileMove, MovePlan, MoveStatus};

fn pending(disk: &str, rel: &str, size: u64, target: &str) -> FileMove {
    FileMove::pending(file(disk, rel, size), target)
}

#[test]
fn summary_totals_cover_pending_moves() {
    let plan = MovePlan::from_moves(vec![
        pending("/mnt/disk2", "a.bin", mb(100), "/mnt/disk1"),
        pending("/mnt/disk3", "b.bin", mb(200), "/mnt/disk1"),
        pending("/mnt/disk3", "c.bin", mb(50), "/mnt/disk4"),
    ]);

    assert_eq!(plan.summary.total_files, 3);
    assert_eq!(plan.summary.total_bytes, mb(350));
    assert_eq!(plan.summary.moves_per_disk["/mnt/disk1"], 2);
    assert_eq!(plan.summary.moves_per_disk["/mnt/disk4"], 1);
    assert_eq!(plan.summary.bytes_per_disk["/mnt/disk1"], mb(300));
    assert_eq!(plan.summary.bytes_per_disk["/mnt/disk4"], mb(50));
}

#[test]
fn skipped_and_failed_moves_stay_listed_but_uncounted() {
    let mut skipped = pending("/mnt/disk2", "a.bin", mb(100), "/mnt/disk1");
    skipped.status = MoveStatus::Skipped;
    skipped.reason = Some("already present".to_string());

    let mut failed = pending("/mnt/disk2", "b.bin", mb(100), "/mnt/disk1");
    failed.status = MoveStatus::Failed;

    let ok = pending("/mnt/disk2", "c.bin", mb(100), "/mnt/disk1");

    let plan = MovePlan::from_moves(vec![skipped, failed, ok]);

    assert_eq!(plan.moves.len(), 3);
    assert_eq!(plan.summary.total_files, 1);
    assert_eq!(plan.summary.total_bytes, mb(100));
    assert_eq!(plan.pending().count(), 1);
}

#[test]
fn empty_plan_has_zeroed_summary() {
    let plan = MovePlan::from_moves(Vec::new());
    assert_eq!(plan.summary.total_files, 0);
    assert_eq!(plan.summary.total_bytes, 0);
    assert!(plan.summary.moves_per_disk.is_empty());
}
