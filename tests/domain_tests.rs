use chrono::{DateTime, TimeZone, Utc};
use contact_tracker::common::SteppingClock;
use contact_tracker::domains::contact_tracing::*;
use std::collections::HashSet;
use std::num::NonZeroUsize;

fn t0() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

fn history(bound: usize) -> ContactHistory {
    ContactHistory::new(NonZeroUsize::new(bound).unwrap())
}

fn contact(peer: &str, n: u32) -> ContactEvent {
    ContactEvent::new(AgentId::from(peer), Position::new(n, n), t0())
}

fn peers(events: &[ContactEvent]) -> Vec<&str> {
    events.iter().map(|e| e.peer.as_str()).collect()
}

#[test]
fn test_history_is_bounded_with_fifo_eviction() {
    let mut history = history(5);
    let agent = AgentId::from("test1");

    for i in 0..15 {
        history.append(&agent, contact(&format!("p{}", i), i));
        assert!(history.len_for(&agent) <= 5);
    }

    let snapshot = history.snapshot(&agent);
    assert_eq!(snapshot.len(), 5);
    assert_eq!(peers(&snapshot), vec!["p10", "p11", "p12", "p13", "p14"]);
}

#[test]
fn test_snapshot_preserves_append_order_below_bound() {
    let mut history = history(10);
    let agent = AgentId::from("a");
    for (i, peer) in ["x", "y", "z"].iter().enumerate() {
        history.append(&agent, contact(peer, i as u32));
    }
    assert_eq!(peers(&history.snapshot(&agent)), vec!["x", "y", "z"]);
}

#[test]
fn test_histories_are_independent_per_agent() {
    let mut history = history(2);
    let a = AgentId::from("a");
    let b = AgentId::from("b");

    history.append(&b, contact("first", 0));
    for i in 0..5 {
        history.append(&a, contact("other", i));
    }

    assert_eq!(history.len_for(&a), 2);
    assert_eq!(peers(&history.snapshot(&b)), vec!["first"]);
}

#[test]
fn test_snapshot_of_unknown_agent_is_empty() {
    let history = history(3);
    assert!(history.snapshot(&AgentId::from("nobody")).is_empty());
}

#[test]
fn test_position_store_returns_previous_position() {
    let mut store = PositionStore::new();
    let agent = AgentId::from("a");

    assert_eq!(store.set_position(agent.clone(), Position::new(1, 1)), None);
    assert_eq!(
        store.set_position(agent.clone(), Position::new(2, 1)),
        Some(Position::new(1, 1))
    );
    assert_eq!(store.position_of(&agent), Some(Position::new(2, 1)));
    assert_eq!(store.position_of(&AgentId::from("b")), None);
    assert_eq!(store.len(), 1);
    assert_eq!(store.all_positions(), vec![(agent, Position::new(2, 1))]);
}

#[test]
fn test_detects_contact_between_co_located_agents_only() {
    let clock = SteppingClock::starting_at(t0());
    let mut positions = PositionStore::new();
    let mut history = history(100);
    positions.set_position("person2".into(), Position::new(1, 1));
    positions.set_position("person3".into(), Position::new(2, 2));

    let detection = ContactDetector::on_position_update(
        &mut positions,
        &mut history,
        &AgentId::from("person1"),
        Position::new(1, 1),
        &clock,
    );

    assert!(detection.moved);
    assert_eq!(detection.peers, vec![AgentId::from("person2")]);

    let p1 = history.snapshot(&"person1".into());
    let p2 = history.snapshot(&"person2".into());
    assert_eq!(peers(&p1), vec!["person2"]);
    assert_eq!(peers(&p2), vec!["person1"]);
    assert_eq!(p1[0].position, Position::new(1, 1));
    assert_eq!(p2[0].position, Position::new(1, 1));
    assert!(history.snapshot(&"person3".into()).is_empty());
}

#[test]
fn test_each_direction_is_stamped_separately() {
    let clock = SteppingClock::starting_at(t0());
    let mut positions = PositionStore::new();
    let mut history = history(10);
    positions.set_position("b".into(), Position::new(4, 4));

    ContactDetector::on_position_update(
        &mut positions,
        &mut history,
        &"a".into(),
        Position::new(4, 4),
        &clock,
    );

    let a_stamp = history.snapshot(&"a".into())[0].timestamp;
    let b_stamp = history.snapshot(&"b".into())[0].timestamp;
    assert_ne!(a_stamp, b_stamp);
    assert!((b_stamp - a_stamp).num_milliseconds().abs() < 1);
}

#[test]
fn test_republishing_same_position_records_nothing() {
    let clock = SteppingClock::starting_at(t0());
    let mut positions = PositionStore::new();
    let mut history = history(10);
    let a = AgentId::from("a");
    positions.set_position(a.clone(), Position::new(3, 3));
    positions.set_position("b".into(), Position::new(3, 3));

    let detection =
        ContactDetector::on_position_update(&mut positions, &mut history, &a, Position::new(3, 3), &clock);

    assert!(!detection.moved);
    assert!(detection.peers.is_empty());
    assert!(history.snapshot(&a).is_empty());
    assert!(history.snapshot(&"b".into()).is_empty());
}

#[test]
fn test_first_report_on_occupied_cell_is_a_contact() {
    let clock = SteppingClock::starting_at(t0());
    let mut positions = PositionStore::new();
    let mut history = history(10);
    positions.set_position("resident".into(), Position::new(0, 9));

    let detection = ContactDetector::on_position_update(
        &mut positions,
        &mut history,
        &"newcomer".into(),
        Position::new(0, 9),
        &clock,
    );

    assert!(detection.moved);
    assert_eq!(peers(&history.snapshot(&"newcomer".into())), vec!["resident"]);
    assert_eq!(peers(&history.snapshot(&"resident".into())), vec!["newcomer"]);
}

#[test]
fn test_moving_onto_a_crowded_cell_contacts_every_occupant() {
    let clock = SteppingClock::starting_at(t0());
    let mut positions = PositionStore::new();
    let mut history = history(10);
    for peer in ["b", "c", "d"] {
        positions.set_position(peer.into(), Position::new(5, 5));
    }
    positions.set_position("a".into(), Position::new(5, 4));

    let detection = ContactDetector::on_position_update(
        &mut positions,
        &mut history,
        &"a".into(),
        Position::new(5, 5),
        &clock,
    );

    let found: HashSet<&str> = detection.peers.iter().map(AgentId::as_str).collect();
    assert_eq!(found, HashSet::from(["b", "c", "d"]));
    let a_history = history.snapshot(&"a".into());
    let recorded: HashSet<&str> = peers(&a_history).into_iter().collect();
    assert_eq!(a_history.len(), 3);
    assert_eq!(recorded, found);
    for peer in ["b", "c", "d"] {
        assert_eq!(peers(&history.snapshot(&peer.into())), vec!["a"]);
    }
}

#[test]
fn test_agent_is_never_its_own_contact() {
    let clock = SteppingClock::starting_at(t0());
    let mut positions = PositionStore::new();
    let mut history = history(10);

    ContactDetector::on_position_update(&mut positions, &mut history, &"solo".into(), Position::new(1, 2), &clock);
    ContactDetector::on_position_update(&mut positions, &mut history, &"solo".into(), Position::new(1, 3), &clock);

    assert!(history.snapshot(&"solo".into()).is_empty());
}

#[test]
fn test_responder_answers_unknown_agent_with_empty_contacts() {
    let history = history(10);
    let result = QueryResponder::respond(&history, &"ghost".into(), t0());

    assert_eq!(result.agent, AgentId::from("ghost"));
    assert!(result.contacts.is_empty());
    assert_eq!(result.timestamp, t0());
}
