use regex::Regex;
use std::sync::OnceLock;

#[allow(clippy::unwrap_used)]
fn disk_prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^/mnt/disk\d+").unwrap())
}

/// Split an absolute path into its leading `/mnt/diskN` mount segment and the
/// remainder (which keeps its leading slash). `None` when the path does not
/// live under an array mount.
pub(crate) fn split_disk_prefix(path: &str) -> Option<(&str, &str)> {
    let m = disk_prefix_regex().find(path)?;
    let rest = &path[m.end()..];
    if rest.is_empty() || rest.starts_with('/') {
        Some((m.as_str(), rest))
    } else {
        // e.g. /mnt/disk10foo: digits ran into a longer name, not a mount.
        None
    }
}

/// The disk-relative portion of an absolute path: the part after the
/// `/mnt/diskN` mount, or the whole path when there is no such mount.
pub(crate) fn disk_relative(path: &str) -> &str {
    match split_disk_prefix(path) {
        Some((_, rest)) => rest,
        None => path,
    }
}
