use thiserror::Error;

/// A disk's identity and capacity as carried by an init event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DiskTriple {
    pub path: String,
    pub total_bytes: u64,
    pub free_bytes: u64,
}

/// Pipe-delimited planner events for persistable log streaming.
///
/// Four kinds, all fields positional:
///
/// ```text
/// I|path:total:free|path:total:free|...
/// M|fileName|fromIdx|toIdx|sizeBytes
/// F|fileName|fromIdx|reason
/// N|message
/// ```
///
/// `fromIdx`/`toIdx` index into the disk list established by the `I` event.
/// A fail reason or note message may itself contain `|`; everything after the
/// fixed fields is joined back together on parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CompactEvent {
    Init(Vec<DiskTriple>),
    Move { file_name: String, from_idx: usize, to_idx: usize, size_bytes: u64 },
    Fail { file_name: String, from_idx: usize, reason: String },
    Note(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unparsable compact event '{line}': {message}")]
pub(crate) struct CompactParseError {
    pub line: String,
    pub message: String,
}

impl CompactParseError {
    fn new(line: &str, message: impl Into<String>) -> Self {
        Self { line: line.to_string(), message: message.into() }
    }
}

impl CompactEvent {
    /// Render to the one-line wire form.
    pub(crate) fn to_line(&self) -> String {
        match self {
            Self::Init(disks) => {
                let mut line = String::from("I");
                for d in disks {
                    line.push('|');
                    line.push_str(&format!("{}:{}:{}", d.path, d.total_bytes, d.free_bytes));
                }
                line
            }
            Self::Move { file_name, from_idx, to_idx, size_bytes } => {
                format!("M|{file_name}|{from_idx}|{to_idx}|{size_bytes}")
            }
            Self::Fail { file_name, from_idx, reason } => {
                format!("F|{file_name}|{from_idx}|{reason}")
            }
            Self::Note(message) => format!("N|{message}"),
        }
    }

    /// Parse one wire line; the inverse of [`to_line`](Self::to_line).
    pub(crate) fn parse(line: &str) -> Result<Self, CompactParseError> {
        let mut fields = line.split('|');
        let kind = fields.next().unwrap_or_default();

        match kind {
            "I" => {
                let disks = fields
                    .map(|field| parse_disk_triple(line, field))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::Init(disks))
            }
            "M" => {
                let rest: Vec<&str> = fields.collect();
                let &[file_name, from, to, size] = rest.as_slice() else {
                    return Err(CompactParseError::new(line, "move event needs 4 fields"));
                };
                Ok(Self::Move {
                    file_name: file_name.to_string(),
                    from_idx: parse_field(line, from, "fromIdx")?,
                    to_idx: parse_field(line, to, "toIdx")?,
                    size_bytes: parse_field(line, size, "sizeBytes")?,
                })
            }
            "F" => {
                let file_name = fields
                    .next()
                    .ok_or_else(|| CompactParseError::new(line, "fail event needs a file name"))?;
                let from = fields
                    .next()
                    .ok_or_else(|| CompactParseError::new(line, "fail event needs a fromIdx"))?;
                let reason: Vec<&str> = fields.collect();
                Ok(Self::Fail {
                    file_name: file_name.to_string(),
                    from_idx: parse_field(line, from, "fromIdx")?,
                    reason: reason.join("|"),
                })
            }
            "N" => {
                let message: Vec<&str> = fields.collect();
                Ok(Self::Note(message.join("|")))
            }
            other => Err(CompactParseError::new(line, format!("unknown event kind '{other}'"))),
        }
    }
}

fn parse_disk_triple(line: &str, field: &str) -> Result<DiskTriple, CompactParseError> {
    let parts: Vec<&str> = field.rsplitn(3, ':').collect();
    let &[free, total, path] = parts.as_slice() else {
        return Err(CompactParseError::new(line, format!("bad disk triple '{field}'")));
    };
    Ok(DiskTriple {
        path: path.to_string(),
        total_bytes: parse_field(line, total, "total")?,
        free_bytes: parse_field(line, free, "free")?,
    })
}

fn parse_field<T: std::str::FromStr>(
    line: &str,
    raw: &str,
    name: &str,
) -> Result<T, CompactParseError> {
    raw.parse().map_err(|_| CompactParseError::new(line, format!("bad {name} '{raw}'")))
}
