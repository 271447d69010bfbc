mod compact;
mod hub;
mod snapshot;

pub(crate) use compact::{CompactEvent, CompactParseError, DiskTriple};
pub(crate) use hub::{EventHub, PlanEvent};
pub(crate) use snapshot::{bytes_to_gb, bytes_to_mb, Snapshot};
