use super::paths::split_disk_prefix;
use super::world::{FileMove, MoveStatus};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Collapse transitive move chains so each file is transferred at most once.
///
/// A cascade like disk8 → disk7, disk7 → disk6 (the second move picking up
/// the file where the first dropped it) becomes a single disk8 → disk6 move.
/// Intermediate hops and moves that end up back on their own disk are
/// dropped. Non-pending moves pass through untouched. Idempotent.
pub(crate) fn optimize_moves(moves: &[FileMove]) -> Vec<FileMove> {
    // Chain edges over pending moves only, keyed by absolute path.
    let mut dest_to_src: HashMap<&str, &str> = HashMap::new();
    let mut src_to_dest: HashMap<&str, &str> = HashMap::new();
    for mv in moves {
        if mv.status == MoveStatus::Pending {
            dest_to_src.insert(&mv.dest_path, &mv.file.absolute_path);
            src_to_dest.insert(&mv.file.absolute_path, &mv.dest_path);
        }
    }

    let mut optimized: Vec<FileMove> = Vec::with_capacity(moves.len());

    for mv in moves {
        if mv.status != MoveStatus::Pending {
            optimized.push(mv.clone());
            continue;
        }

        // Intermediate hop: something else picks the file up at our destination.
        if src_to_dest.contains_key(mv.dest_path.as_str()) {
            debug!("dropping intermediate hop {} → {}", mv.file.absolute_path, mv.dest_path);
            continue;
        }

        let origin = chain_origin(&dest_to_src, &mv.file.absolute_path);
        let mut mv = mv.clone();
        if origin != mv.file.absolute_path {
            debug!("rewriting chain: {} now moves from {}", mv.dest_path, origin);
            if let Some((disk, rest)) = split_disk_prefix(&origin) {
                mv.file.disk_path = disk.to_string();
                mv.file.relative_path = rest.trim_start_matches('/').to_string();
            }
            mv.file.absolute_path = origin;
        }

        // Post-rewrite self-move: the chain came home.
        if mv.file.disk_path == mv.target_disk {
            continue;
        }

        optimized.push(mv);
    }

    optimized
}

/// Walk destination→source edges back to the start of a chain. The visited
/// set breaks cycles (a cycle has no origin; the walk stops where it started).
fn chain_origin(dest_to_src: &HashMap<&str, &str>, start: &str) -> String {
    let mut current = start;
    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(current);

    while let Some(&prev) = dest_to_src.get(current) {
        if !visited.insert(prev) {
            break;
        }
        current = prev;
    }

    current.to_string()
}
