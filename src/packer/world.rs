use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A mounted array disk, treated as an opaque capacity unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Disk {
    /// Mount path, e.g. `/mnt/disk3`. Unique key within a WorldView.
    pub path: String,
    pub total_bytes: u64,
    pub free_bytes: u64,
}

impl Disk {
    pub(crate) fn new(path: impl Into<String>, total_bytes: u64, free_bytes: u64) -> Self {
        Self { path: path.into(), total_bytes, free_bytes }
    }

    pub(crate) const fn used_bytes(&self) -> u64 {
        self.total_bytes.saturating_sub(self.free_bytes)
    }

    /// Used fraction (0.0 - 1.0).
    pub(crate) fn used_pct(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        self.used_bytes() as f64 / self.total_bytes as f64
    }
}

/// One regular file as the planner sees it. Immutable; relocation happens by
/// producing an edited copy inside `apply_move`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct FileEntry {
    /// Full path including the mount, e.g. `/mnt/disk3/videos/a.mkv`.
    pub absolute_path: String,
    /// Path relative to the disk mount, e.g. `videos/a.mkv`.
    pub relative_path: String,
    pub size_bytes: u64,
    /// Mount path of the disk currently holding the file.
    pub disk_path: String,
}

impl FileEntry {
    pub(crate) fn new(
        disk_path: impl Into<String>,
        relative_path: impl Into<String>,
        size_bytes: u64,
    ) -> Self {
        let disk_path = disk_path.into();
        let relative_path = relative_path.into();
        Self {
            absolute_path: format!("{disk_path}/{relative_path}"),
            relative_path,
            size_bytes,
            disk_path,
        }
    }

    pub(crate) fn file_name(&self) -> &str {
        self.relative_path.rsplit('/').next().unwrap_or(&self.relative_path)
    }
}

/// Lifecycle of a planned relocation. The planner only ever emits `Pending`;
/// the executor owns the other transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum MoveStatus {
    Pending,
    Skipped,
    Completed,
    Failed,
}

impl MoveStatus {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Skipped => "skipped",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for MoveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A planned relocation of one file to another disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct FileMove {
    pub file: FileEntry,
    /// Mount path of the disk the file should land on.
    pub target_disk: String,
    /// `target_disk + "/" + file.relative_path`.
    pub dest_path: String,
    pub status: MoveStatus,
    pub reason: Option<String>,
}

impl FileMove {
    /// Build a pending move; the destination path is derived, never supplied.
    pub(crate) fn pending(file: FileEntry, target_disk: impl Into<String>) -> Self {
        let target_disk = target_disk.into();
        let dest_path = format!("{}/{}", target_disk, file.relative_path);
        Self { file, target_disk, dest_path, status: MoveStatus::Pending, reason: None }
    }
}

/// The planner's complete picture of the array: disks keyed by mount path
/// (ordered, so iteration is deterministic) plus every known file.
///
/// Treated as a value: transitions clone and edit, they never alias.
#[derive(Debug, Clone, Default)]
pub(crate) struct WorldView {
    pub disks: BTreeMap<String, Disk>,
    pub files: Vec<FileEntry>,
}

impl WorldView {
    pub(crate) fn new(disks: Vec<Disk>, files: Vec<FileEntry>) -> Self {
        Self { disks: disks.into_iter().map(|d| (d.path.clone(), d)).collect(), files }
    }

    pub(crate) fn files_on<'a>(&'a self, disk_path: &'a str) -> impl Iterator<Item = &'a FileEntry> {
        self.files.iter().filter(move |f| f.disk_path == disk_path)
    }

    /// Sum of free bytes across all disks; invariant under `apply_move`.
    pub(crate) fn total_free(&self) -> u64 {
        self.disks.values().map(|d| d.free_bytes).sum()
    }
}

/// Apply one pending move to a WorldView, producing the next WorldView.
///
/// Two atomic edits: free bytes shift from target to source, and the file is
/// re-homed to its derived destination path. Preconditions (both disks exist,
/// the target has headroom) are the caller's; the reducer itself never fails.
pub(crate) fn apply_move(wv: &WorldView, mv: &FileMove) -> WorldView {
    let mut next = wv.clone();

    if let Some(src) = next.disks.get_mut(&mv.file.disk_path) {
        src.free_bytes = src.free_bytes.saturating_add(mv.file.size_bytes);
    }
    if let Some(dst) = next.disks.get_mut(&mv.target_disk) {
        dst.free_bytes = dst.free_bytes.saturating_sub(mv.file.size_bytes);
    }

    for file in &mut next.files {
        if file.absolute_path == mv.file.absolute_path {
            file.disk_path = mv.target_disk.clone();
            file.absolute_path = mv.dest_path.clone();
            break;
        }
    }

    next
}
