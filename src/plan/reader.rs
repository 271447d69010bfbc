use crate::errors::{classify_io, IoClass, PlanFileError};
use std::path::Path;

/// A transfer batch recovered from a plan script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlanBatch {
    pub source_disk: String,
    pub target_disk: String,
    pub relative_paths: Vec<String>,
    /// Human-formatted size from the stanza header, verbatim.
    pub size_label: String,
}

/// Everything `show` and `apply` need from a previously written plan script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PlanFile {
    pub generated: Option<String>,
    pub source_disk: Option<String>,
    pub total_files: Option<usize>,
    pub total_size: Option<String>,
    pub concurrency: Option<usize>,
    pub batches: Vec<PlanBatch>,
}

impl PlanFile {
    pub(crate) fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}

/// Read and parse a plan script from disk.
pub(crate) fn load_plan_file(path: &Path) -> Result<PlanFile, PlanFileError> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| match classify_io(&e) {
        IoClass::NotFound => PlanFileError::NotFound { path: display.clone() },
        IoClass::PermissionDenied => PlanFileError::PermissionDenied { path: display.clone() },
        IoClass::NotADirectory | IoClass::Other => {
            PlanFileError::LoadFailed { path: display.clone(), source: e }
        }
    })?;

    parse_plan(&content, &display)
}

/// Parse the plan-script text. The inverse of the renderer for everything the
/// executor cares about; unknown lines (`set -e`, blanks, `wait`) pass by.
pub(crate) fn parse_plan(content: &str, path: &str) -> Result<PlanFile, PlanFileError> {
    let mut plan = PlanFile::default();
    let mut lines = content.lines().enumerate();

    while let Some((line_no, line)) = lines.next() {
        if let Some(rest) = line.strip_prefix("# Batch: ") {
            let (source_disk, target_disk, size_label) =
                parse_batch_header(rest, path, line_no + 1)?;

            // The rsync command line, then the heredoc body up to EOF.
            match lines.next() {
                Some((_, cmd)) if cmd.starts_with("rsync ") => {}
                _ => {
                    return Err(PlanFileError::ParseError {
                        path: path.to_string(),
                        line: line_no + 2,
                        message: "expected an rsync command after the batch header".to_string(),
                    })
                }
            }

            let mut relative_paths = Vec::new();
            loop {
                match lines.next() {
                    Some((_, "EOF")) => break,
                    Some((_, rel)) => relative_paths.push(rel.to_string()),
                    None => {
                        return Err(PlanFileError::ParseError {
                            path: path.to_string(),
                            line: line_no + 1,
                            message: "unterminated file list (missing EOF)".to_string(),
                        })
                    }
                }
            }
            // Closing `) "src/" "dst/" &` line.
            let _ = lines.next();

            plan.batches.push(PlanBatch { source_disk, target_disk, relative_paths, size_label });
        } else if let Some(value) = line.strip_prefix("# Generated: ") {
            plan.generated = Some(value.trim().to_string());
        } else if let Some(value) = line.strip_prefix("# Source disk: ") {
            plan.source_disk = Some(value.trim().to_string());
        } else if let Some(value) = line.strip_prefix("# Total files: ") {
            plan.total_files = value.trim().parse().ok();
        } else if let Some(value) = line.strip_prefix("# Total size: ") {
            plan.total_size = Some(value.trim().to_string());
        } else if let Some(value) = line.strip_prefix("# Concurrency: ") {
            plan.concurrency = value.trim().parse().ok();
        }
    }

    Ok(plan)
}

/// Parse `"<src> -> <dst> (<n> files, <size>)"`.
fn parse_batch_header(
    rest: &str,
    path: &str,
    line: usize,
) -> Result<(String, String, String), PlanFileError> {
    let malformed = |message: &str| PlanFileError::ParseError {
        path: path.to_string(),
        line,
        message: message.to_string(),
    };

    let (source, rest) = rest.split_once(" -> ").ok_or_else(|| malformed("missing '->'"))?;
    let (target, annot) =
        rest.split_once(" (").ok_or_else(|| malformed("missing batch annotation"))?;
    let annot = annot.strip_suffix(')').ok_or_else(|| malformed("unclosed batch annotation"))?;
    let size_label = annot.split_once(", ").map_or(annot, |(_, size)| size);

    Ok((source.to_string(), target.to_string(), size_label.to_string()))
}
