use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;
const GIB: u64 = MIB * 1024;
const TIB: u64 = GIB * 1024;

/// A size string that matches neither the bare-integer nor the number+unit shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid size '{0}' (expected e.g. \"1024\", \"500MB\", \"1.5GiB\")")]
pub(crate) struct InvalidSize(pub String);

// Group 1: bare integer. Groups 2+3: decimal number with unit.
#[allow(clippy::unwrap_used)]
fn size_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(?:(\d+)|(\d+(?:\.\d+)?)\s*([A-Za-z]+))\s*$").unwrap())
}

fn unit_multiplier(unit: &str) -> Option<u64> {
    match unit {
        "b" => Some(1),
        "k" | "kb" | "kib" => Some(KIB),
        "m" | "mb" | "mib" => Some(MIB),
        "g" | "gb" | "gib" => Some(GIB),
        "t" | "tb" | "tib" => Some(TIB),
        _ => None,
    }
}

/// Parse a human-readable size into bytes.
///
/// Accepts a bare non-negative integer (bytes) or a decimal number followed by
/// a case-insensitive binary unit (B, K/KB/KiB, M/MB/MiB, G/GB/GiB, T/TB/TiB).
/// The result is `floor(number * multiplier)`.
pub(crate) fn parse_size(s: &str) -> Result<u64, InvalidSize> {
    let caps = size_regex().captures(s).ok_or_else(|| InvalidSize(s.to_string()))?;

    if let Some(bare) = caps.get(1) {
        return bare.as_str().parse().map_err(|_| InvalidSize(s.to_string()));
    }

    let number: f64 = caps
        .get(2)
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| InvalidSize(s.to_string()))?;
    let unit = caps.get(3).map(|m| m.as_str().to_ascii_lowercase()).unwrap_or_default();
    let multiplier = unit_multiplier(&unit).ok_or_else(|| InvalidSize(s.to_string()))?;

    Ok((number * multiplier as f64).floor() as u64)
}

/// Format a signed byte count with the smallest unit that keeps the value
/// under 1024: bytes verbatim, one decimal for KB/MB, two for GB/TB.
pub(crate) fn format_size(bytes: i64) -> String {
    let sign = if bytes < 0 { "-" } else { "" };
    let abs = bytes.unsigned_abs();

    if abs < KIB {
        format!("{sign}{abs} B")
    } else if abs < MIB {
        format!("{sign}{:.1} KB", abs as f64 / KIB as f64)
    } else if abs < GIB {
        format!("{sign}{:.1} MB", abs as f64 / MIB as f64)
    } else if abs < TIB {
        format!("{sign}{:.2} GB", abs as f64 / GIB as f64)
    } else {
        format!("{sign}{:.2} TB", abs as f64 / TIB as f64)
    }
}
