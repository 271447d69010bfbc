use super::compact::CompactEvent;
use super::snapshot::Snapshot;
use tokio::sync::broadcast;

/// The two advisory streams the packer can emit while planning. Rich
/// snapshots feed interactive UIs; compact events feed persistable logs.
#[derive(Debug, Clone)]
pub(crate) enum PlanEvent {
    Snapshot(Snapshot),
    Compact(CompactEvent),
}

/// Broadcast hub between the planner and anything watching it.
///
/// The packer publishes fire-and-forget; planning is correct with zero
/// subscribers. Slow subscribers that fall more than `capacity` events behind
/// receive a `Lagged` error and miss intermediate events.
#[derive(Debug, Clone)]
pub(crate) struct EventHub {
    sender: broadcast::Sender<PlanEvent>,
}

impl EventHub {
    pub(crate) fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all current subscribers; an error just means nobody is
    /// listening, which is fine.
    pub(crate) fn publish(&self, event: PlanEvent) {
        let _ = self.sender.send(event);
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<PlanEvent> {
        self.sender.subscribe()
    }
}
