use super::paths::disk_relative;
use super::world::FileEntry;

/// File-selection criteria for a planning run. Size and prefix criteria are
/// ANDed; entries within the prefix list are ORed.
#[derive(Debug, Clone, Default)]
pub(crate) struct FileFilter {
    pub min_size_bytes: Option<u64>,
    pub path_prefixes: Vec<String>,
}

impl FileFilter {
    pub(crate) fn matches(&self, file: &FileEntry) -> bool {
        if let Some(min) = self.min_size_bytes {
            if file.size_bytes < min {
                return false;
            }
        }

        if self.path_prefixes.is_empty() {
            return true;
        }

        let relative = disk_relative(&file.absolute_path);
        self.path_prefixes.iter().any(|prefix| relative.starts_with(prefix.as_str()))
    }

    /// Pure transform: the passing subset, in input order.
    pub(crate) fn apply(&self, files: &[FileEntry]) -> Vec<FileEntry> {
        files.iter().filter(|f| self.matches(f)).cloned().collect()
    }
}
