use std::io;
use thiserror::Error;

/// Disk probing failures raised while validating candidate mount points.
#[derive(Debug, Error)]
pub(crate) enum DiskError {
    #[error("disk path not found: {path}")]
    NotFound { path: String },

    #[error("disk path is not a directory: {path}")]
    NotADirectory { path: String },

    #[error("disk path is not a mount point: {path}")]
    NotAMountPoint { path: String },

    #[error("permission denied probing disk: {path}")]
    PermissionDenied { path: String },

    #[error("failed to read disk stats for {path}: {source}")]
    StatsFailed { path: String, source: io::Error },
}

/// Failures raised while walking a disk's filesystem.
#[derive(Debug, Error)]
pub(crate) enum ScanError {
    #[error("scan path not found: {path}")]
    PathNotFound { path: String },

    #[error("permission denied scanning {path}")]
    PermissionDenied { path: String },

    #[error("scan of {path} failed: {message}")]
    Failed { path: String, message: String },

    #[error("failed to stat file {path}: {source}")]
    FileStatFailed { path: String, source: io::Error },
}

/// Failures raised by the rsync executor while applying a plan.
#[derive(Debug, Error)]
pub(crate) enum TransferError {
    #[error("transfer source not found: {path}")]
    SourceNotFound { path: String },

    #[error("permission denied reading transfer source: {path}")]
    SourcePermissionDenied { path: String },

    #[error("permission denied writing transfer destination: {path}")]
    DestinationPermissionDenied { path: String },

    #[error("destination disk is full: {path}")]
    DiskFull { path: String },

    #[error("transfer backend unavailable: {message}")]
    BackendUnavailable { message: String },

    #[error("transfer failed: {message}")]
    Failed { message: String },
}

/// Failures raised while reading or writing the plan script.
#[derive(Debug, Error)]
pub(crate) enum PlanFileError {
    #[error("plan file not found: {path}")]
    NotFound { path: String },

    #[error("permission denied accessing plan file: {path}")]
    PermissionDenied { path: String },

    #[error("plan file {path} is malformed at line {line}: {message}")]
    ParseError { path: String, line: usize, message: String },

    #[error("failed to save plan to {path}: {source}")]
    SaveFailed { path: String, source: io::Error },

    #[error("failed to load plan from {path}: {source}")]
    LoadFailed { path: String, source: io::Error },
}

/// Every domain error the CLI boundary knows how to translate.
#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Disk(#[from] DiskError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error(transparent)]
    PlanFile(#[from] PlanFileError),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// User-facing rendering of a domain error: what happened, where, and one
/// concrete thing to try.
pub(crate) struct UserMessage {
    pub title: &'static str,
    pub detail: String,
    pub hint: &'static str,
}

impl AppError {
    /// Map this error to its CLI presentation. This is the single translation
    /// point; nothing else in the tree formats errors for humans.
    pub(crate) fn user_message(&self) -> UserMessage {
        let detail = self.to_string();
        match self {
            Self::Disk(e) => match e {
                DiskError::NotFound { .. } => UserMessage {
                    title: "Disk not found",
                    detail,
                    hint: "Check the path and whether the array is started.",
                },
                DiskError::NotADirectory { .. } => UserMessage {
                    title: "Not a directory",
                    detail,
                    hint: "Disk paths must be directories like /mnt/disk1.",
                },
                DiskError::NotAMountPoint { .. } => UserMessage {
                    title: "Not a mount point",
                    detail,
                    hint: "The path exists but no filesystem is mounted there.",
                },
                DiskError::PermissionDenied { .. } => UserMessage {
                    title: "Permission denied",
                    detail,
                    hint: "Run with sufficient privileges to read the array disks.",
                },
                DiskError::StatsFailed { .. } => UserMessage {
                    title: "Disk stats unavailable",
                    detail,
                    hint: "Verify the disk is mounted and healthy (check syslog).",
                },
            },
            Self::Scan(e) => match e {
                ScanError::PathNotFound { .. } => UserMessage {
                    title: "Scan path not found",
                    detail,
                    hint: "The disk may have been unmounted mid-scan; remount and retry.",
                },
                ScanError::PermissionDenied { .. } => UserMessage {
                    title: "Permission denied during scan",
                    detail,
                    hint: "Some directories are unreadable; run with elevated privileges.",
                },
                ScanError::Failed { .. } => UserMessage {
                    title: "Scan failed",
                    detail,
                    hint: "Retry; if it persists, check the disk for filesystem errors.",
                },
                ScanError::FileStatFailed { .. } => UserMessage {
                    title: "File stat failed",
                    detail,
                    hint: "The file may have been deleted mid-scan; re-run the plan.",
                },
            },
            Self::Transfer(e) => match e {
                TransferError::SourceNotFound { .. } => UserMessage {
                    title: "Transfer source missing",
                    detail,
                    hint: "The plan is stale; regenerate it with `tightpack plan`.",
                },
                TransferError::SourcePermissionDenied { .. } => UserMessage {
                    title: "Cannot read source",
                    detail,
                    hint: "Fix ownership/permissions on the source file and retry.",
                },
                TransferError::DestinationPermissionDenied { .. } => UserMessage {
                    title: "Cannot write destination",
                    detail,
                    hint: "Fix ownership/permissions on the target disk and retry.",
                },
                TransferError::DiskFull { .. } => UserMessage {
                    title: "Destination disk full",
                    detail,
                    hint: "Free space changed since planning; regenerate the plan.",
                },
                TransferError::BackendUnavailable { .. } => UserMessage {
                    title: "rsync unavailable",
                    detail,
                    hint: "Install rsync and make sure it is on PATH.",
                },
                TransferError::Failed { .. } => UserMessage {
                    title: "Transfer failed",
                    detail,
                    hint: "See the rsync output above for the failing batch.",
                },
            },
            Self::PlanFile(e) => match e {
                PlanFileError::NotFound { .. } => UserMessage {
                    title: "Plan file not found",
                    detail,
                    hint: "Generate one first with `tightpack plan`.",
                },
                PlanFileError::PermissionDenied { .. } => UserMessage {
                    title: "Plan file permission denied",
                    detail,
                    hint: "Check permissions on the plan file's directory.",
                },
                PlanFileError::ParseError { .. } => UserMessage {
                    title: "Plan file malformed",
                    detail,
                    hint: "The file was edited or truncated; regenerate the plan.",
                },
                PlanFileError::SaveFailed { .. } => UserMessage {
                    title: "Could not save plan",
                    detail,
                    hint: "Check free space and permissions at the plan path.",
                },
                PlanFileError::LoadFailed { .. } => UserMessage {
                    title: "Could not load plan",
                    detail,
                    hint: "Check the plan file is readable and regenerate if needed.",
                },
            },
            Self::PermissionDenied(_) => UserMessage {
                title: "Permission denied",
                detail,
                hint: "Re-run with sufficient privileges.",
            },
            Self::Unexpected(_) => UserMessage {
                title: "Unexpected error",
                detail,
                hint: "Re-run with --debug and report the log output.",
            },
        }
    }
}

/// Coarse classification of an OS error for mapping into the taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IoClass {
    NotFound,
    PermissionDenied,
    NotADirectory,
    Other,
}

/// Second-chance classification at the CLI boundary: an error that fell
/// through to the unexpected bucket but whose cause chain is really a
/// permission problem gets the permission-denied presentation instead.
pub(crate) fn reclassify(err: AppError) -> AppError {
    if let AppError::Unexpected(inner) = &err {
        for cause in inner.chain() {
            if let Some(io_err) = cause.downcast_ref::<io::Error>() {
                if classify_io(io_err) == IoClass::PermissionDenied {
                    return AppError::PermissionDenied(format!("{inner:#}"));
                }
            }
        }
    }
    err
}

/// Classify an I/O error by errno first, message substrings second.
/// When both are present the errno wins.
pub(crate) fn classify_io(err: &io::Error) -> IoClass {
    if let Some(code) = err.raw_os_error() {
        match code {
            libc::ENOENT => return IoClass::NotFound,
            libc::EACCES | libc::EPERM => return IoClass::PermissionDenied,
            libc::ENOTDIR => return IoClass::NotADirectory,
            _ => {}
        }
    }

    let msg = err.to_string().to_ascii_lowercase();
    if msg.contains("permission denied") || msg.contains("operation not permitted") {
        IoClass::PermissionDenied
    } else if msg.contains("no such file") || msg.contains("not found") {
        IoClass::NotFound
    } else if msg.contains("not a directory") {
        IoClass::NotADirectory
    } else {
        IoClass::Other
    }
}
