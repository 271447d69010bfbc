use super::world::FileEntry;

/// Upper size bounds (exclusive) of the sampling buckets; the last bucket is
/// unbounded. 100 KiB / 1 MiB / 10 MiB / 100 MiB.
const BUCKET_BOUNDS: [u64; 4] = [100 * 1024, 1024 * 1024, 10 * 1024 * 1024, 100 * 1024 * 1024];

/// Representatives sampled per non-empty bucket: smallest, median, largest.
const SAMPLES_PER_BUCKET: usize = 3;

/// Largest tuple of files considered together.
pub(crate) const DEFAULT_MAX_COMBINATION_SIZE: usize = 5;

/// A set of files chosen to fill a destination, with its utilization score.
#[derive(Debug, Clone)]
pub(crate) struct Combination {
    pub files: Vec<FileEntry>,
    pub total_bytes: u64,
    /// `total_bytes / available_bytes`; 1.0 is a perfect fill.
    pub score: f64,
}

/// Pick the move set that best fills `available_bytes` from one source disk's
/// candidates.
///
/// Two passes: the best single file (largest that fits), and tuples of
/// 2..=`max_combination_size` drawn from a per-bucket sample of the
/// candidates. Sampling caps the combinatorics at a handful of files per size
/// class instead of the whole candidate list. Higher score wins; the single
/// pass wins exact ties.
pub(crate) fn find_best_combination(
    files: &[FileEntry],
    available_bytes: u64,
    max_combination_size: usize,
) -> Option<Combination> {
    if available_bytes == 0 {
        return None;
    }

    let best_single = files
        .iter()
        .filter(|f| f.size_bytes <= available_bytes)
        .max_by_key(|f| f.size_bytes)
        .map(|f| Combination {
            files: vec![f.clone()],
            total_bytes: f.size_bytes,
            score: f.size_bytes as f64 / available_bytes as f64,
        });

    let sample = sample_by_bucket(files);
    let max_k = max_combination_size.min(sample.len());

    let mut best = best_single;
    for k in 2..=max_k {
        each_combination(&sample, k, &mut |combo| {
            let total: u64 = combo.iter().map(|f| f.size_bytes).sum();
            if total > available_bytes {
                return;
            }
            let score = total as f64 / available_bytes as f64;
            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(Combination {
                    files: combo.iter().map(|&f| f.clone()).collect(),
                    total_bytes: total,
                    score,
                });
            }
        });
    }

    best
}

/// Partition candidates into size buckets and keep three representatives per
/// non-empty bucket (smallest, median, largest), deduplicated. Buckets are
/// sorted ascending by size so iteration order, and therefore tie-breaking,
/// is deterministic.
fn sample_by_bucket(files: &[FileEntry]) -> Vec<FileEntry> {
    let mut buckets: Vec<Vec<&FileEntry>> = vec![Vec::new(); BUCKET_BOUNDS.len() + 1];
    for file in files {
        let idx = BUCKET_BOUNDS
            .iter()
            .position(|&bound| file.size_bytes < bound)
            .unwrap_or(BUCKET_BOUNDS.len());
        buckets[idx].push(file);
    }

    let mut sample: Vec<FileEntry> = Vec::with_capacity(buckets.len() * SAMPLES_PER_BUCKET);
    for bucket in &mut buckets {
        if bucket.is_empty() {
            continue;
        }
        bucket.sort_by(|a, b| {
            a.size_bytes.cmp(&b.size_bytes).then_with(|| a.absolute_path.cmp(&b.absolute_path))
        });

        let picks = [0, bucket.len() / 2, bucket.len() - 1];
        for idx in picks {
            let candidate = bucket[idx];
            if !sample.iter().any(|f| f.absolute_path == candidate.absolute_path) {
                sample.push(candidate.clone());
            }
        }
    }

    sample
}

/// Visit every k-combination of `items`, preserving item order within each
/// combination.
fn each_combination<'a>(
    items: &'a [FileEntry],
    k: usize,
    visit: &mut impl FnMut(&[&'a FileEntry]),
) {
    fn recurse<'a>(
        items: &'a [FileEntry],
        k: usize,
        start: usize,
        current: &mut Vec<&'a FileEntry>,
        visit: &mut impl FnMut(&[&'a FileEntry]),
    ) {
        if current.len() == k {
            visit(current);
            return;
        }
        let needed = k - current.len();
        for i in start..=items.len().saturating_sub(needed) {
            current.push(&items[i]);
            recurse(items, k, i + 1, current, visit);
            current.pop();
        }
    }

    if k == 0 || k > items.len() {
        return;
    }
    recurse(items, k, 0, &mut Vec::with_capacity(k), visit);
}
