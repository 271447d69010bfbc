use super::helpers::{file, mb};
use crate::packer::{find_best_combination, FileEntry, DEFAULT_MAX_COMBINATION_SIZE};

fn src(rel: &str, size: u64) -> FileEntry {
    file("/mnt/disk2", rel, size)
}

#[test]
fn single_pass_picks_the_largest_file_that_fits() {
    let files = vec![src("a.bin", mb(300)), src("b.bin", mb(500)), src("c.bin", mb(700))];

    let best = find_best_combination(&files, mb(600), DEFAULT_MAX_COMBINATION_SIZE)
        .expect("something fits");
    assert_eq!(best.total_bytes, mb(500));
    assert_eq!(best.files.len(), 1);
    assert_eq!(best.files[0].relative_path, "b.bin");
}

#[test]
fn pair_beats_single_when_it_fills_tighter() {
    // 545 MB available; {345, 200} fills it exactly while the best single
    // (540) leaves 5 MB on the table.
    let files = vec![src("big.bin", mb(540)), src("mid.bin", mb(345)), src("small.bin", mb(200))];

    let best =
        find_best_combination(&files, mb(545), DEFAULT_MAX_COMBINATION_SIZE).expect("fits");

    assert_eq!(best.files.len(), 2);
    let mut names: Vec<&str> = best.files.iter().map(|f| f.relative_path.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["mid.bin", "small.bin"]);
    assert_eq!(best.total_bytes, mb(545));
    assert!((best.score - 1.0).abs() < 1e-9);
}

#[test]
fn none_when_nothing_fits() {
    let files = vec![src("a.bin", mb(100))];
    assert!(find_best_combination(&files, mb(50), DEFAULT_MAX_COMBINATION_SIZE).is_none());
    assert!(find_best_combination(&files, 0, DEFAULT_MAX_COMBINATION_SIZE).is_none());
    assert!(find_best_combination(&[], mb(50), DEFAULT_MAX_COMBINATION_SIZE).is_none());
}

#[test]
fn tuple_size_is_capped() {
    // Five 100 MB files would fill 500 MB exactly, but with the cap at 2 the
    // best reachable sum is 200 MB.
    let files: Vec<FileEntry> =
        (0..5).map(|i| src(&format!("f{i}.bin"), mb(100))).collect();

    let best = find_best_combination(&files, mb(500), 2).expect("fits");
    assert_eq!(best.total_bytes, mb(200));
}

#[test]
fn sampling_keeps_small_files_reachable() {
    // A crowd of tiny files plus one large one: the sample keeps bucket
    // extremes, so a large+small pairing is still found.
    let mut files: Vec<FileEntry> = (0..50)
        .map(|i| src(&format!("tiny{i:02}.bin"), 10 * 1024 + i as u64))
        .collect();
    files.push(src("large.bin", mb(400)));

    let best = find_best_combination(&files, mb(400) + 10 * 1024 + 49, 5).expect("fits");
    assert!(best.files.iter().any(|f| f.relative_path == "large.bin"));
    assert!(best.total_bytes > mb(400));
}

#[test]
fn duplicate_representatives_collapse() {
    // One file per bucket: smallest == median == largest must not triple up.
    let files = vec![src("only.bin", mb(5))];
    let best = find_best_combination(&files, mb(50), 5).expect("fits");
    assert_eq!(best.files.len(), 1);
    assert_eq!(best.total_bytes, mb(5));
}
