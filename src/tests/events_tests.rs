use crate::events::{CompactEvent, DiskTriple, EventHub, PlanEvent, Snapshot};

fn triples() -> Vec<DiskTriple> {
    vec![
        DiskTriple { path: "/mnt/disk1".to_string(), total_bytes: 1000, free_bytes: 200 },
        DiskTriple { path: "/mnt/disk2".to_string(), total_bytes: 2000, free_bytes: 1500 },
    ]
}

#[test]
fn init_event_round_trips() {
    let event = CompactEvent::Init(triples());
    let line = event.to_line();
    assert_eq!(line, "I|/mnt/disk1:1000:200|/mnt/disk2:2000:1500");
    assert_eq!(CompactEvent::parse(&line), Ok(event));
}

#[test]
fn move_event_round_trips() {
    let event = CompactEvent::Move {
        file_name: "a.mkv".to_string(),
        from_idx: 7,
        to_idx: 4,
        size_bytes: 123_456_789,
    };
    let line = event.to_line();
    assert_eq!(line, "M|a.mkv|7|4|123456789");
    assert_eq!(CompactEvent::parse(&line), Ok(event));
}

#[test]
fn fail_event_round_trips_with_pipes_in_the_reason() {
    let event = CompactEvent::Fail {
        file_name: "a.mkv".to_string(),
        from_idx: 2,
        reason: "no destination fits | all disks full".to_string(),
    };
    let line = event.to_line();
    assert_eq!(line, "F|a.mkv|2|no destination fits | all disks full");
    assert_eq!(CompactEvent::parse(&line), Ok(event));
}

#[test]
fn note_event_round_trips_with_pipes_in_the_message() {
    let event = CompactEvent::Note("phase 1 | warming up".to_string());
    let line = event.to_line();
    assert_eq!(line, "N|phase 1 | warming up");
    assert_eq!(CompactEvent::parse(&line), Ok(event));
}

#[test]
fn empty_note_round_trips() {
    let event = CompactEvent::Note(String::new());
    assert_eq!(CompactEvent::parse(&event.to_line()), Ok(event));
}

#[test]
fn unknown_kinds_and_short_lines_are_rejected() {
    assert!(CompactEvent::parse("X|what").is_err());
    assert!(CompactEvent::parse("").is_err());
    assert!(CompactEvent::parse("M|file|1").is_err());
    assert!(CompactEvent::parse("M|file|a|b|c").is_err());
    assert!(CompactEvent::parse("F|file").is_err());
    assert!(CompactEvent::parse("I|missing-colons").is_err());
}

#[test]
fn init_disk_paths_may_contain_colons() {
    let event = CompactEvent::Init(vec![DiskTriple {
        path: "/mnt/odd:name".to_string(),
        total_bytes: 10,
        free_bytes: 5,
    }]);
    assert_eq!(CompactEvent::parse(&event.to_line()), Ok(event));
}

#[tokio::test]
async fn hub_delivers_to_subscribers_and_tolerates_none() {
    let hub = EventHub::new(8);

    // No subscribers: publish must not panic or error out.
    hub.publish(PlanEvent::Compact(CompactEvent::Note("ignored".to_string())));

    let mut rx = hub.subscribe();
    hub.publish(PlanEvent::Snapshot(Snapshot::new(1, "Processing /mnt/disk1")));

    match rx.recv().await {
        Ok(PlanEvent::Snapshot(snap)) => {
            assert_eq!(snap.step, 1);
            assert_eq!(snap.action, "Processing /mnt/disk1");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn snapshots_serialize_without_empty_metadata() {
    let snap = Snapshot::new(3, "Start");
    let json = serde_json::to_value(&snap).expect("snapshot serializes");
    assert_eq!(json["step"], 3);
    assert_eq!(json["action"], "Start");
    assert!(json.get("reason").is_none(), "unset metadata must be omitted");
}
