use serde::Serialize;

/// One rich progress record from the packer, for interactive debugging UIs.
///
/// `step` increases monotonically within a run; `action` is the human line
/// ("Start", "Processing /mnt/disk2", "✓ a.mkv → /mnt/disk5", ...). All other
/// fields are optional metadata for whichever action kind is being reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct Snapshot {
    pub step: u64,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_free_gb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_free_gb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size_mb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moved_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_files: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Snapshot {
    pub(crate) fn new(step: u64, action: impl Into<String>) -> Self {
        Self {
            step,
            action: action.into(),
            source_free_gb: None,
            target_free_gb: None,
            file_name: None,
            file_size_mb: None,
            moved_count: None,
            total_files: None,
            reason: None,
        }
    }
}

pub(crate) fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0 * 1024.0)
}

pub(crate) fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}
