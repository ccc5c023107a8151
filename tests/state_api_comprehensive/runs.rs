//! Run Catalog Tests
//!
//! Creation fixtures for flow and task runs, catalog reads, and the
//! append-only transition history.

use crate::*;
use chrono::{TimeZone, Utc};

// ===== Creation =====

#[test]
fn test_flow_run_lands_scheduled_at_version_two() {
    let (db, tenant, group) = harness();

    let flow = flow_with_labels(&db, tenant, group, &[]);

    assert_eq!(flow.kind, RunKind::Flow);
    assert_eq!(flow.state, StateTag::Scheduled);
    assert_eq!(flow.version, 2);
    assert_eq!(flow.parent, None);
    assert_eq!(flow.tenant, tenant);
    assert_eq!(flow.flow_group, group);

    let history = db.runs.history(&flow.id);
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].version, 1);
    assert_eq!(history[0].state, StateTag::Pending);
    assert_eq!(history[1].version, 2);
    assert_eq!(history[1].state, StateTag::Scheduled);
}

#[test]
fn test_task_run_lands_pending_at_version_one() {
    let (db, tenant, group) = harness();
    let flow = flow_with_labels(&db, tenant, group, &[]);

    let task = db
        .runs
        .create_task(flow.id, vec!["gpu".to_string()])
        .unwrap();

    assert_eq!(task.kind, RunKind::Task);
    assert_eq!(task.state, StateTag::Pending);
    assert_eq!(task.version, 1);
    assert_eq!(task.parent, Some(flow.id));
    assert_eq!(task.labels, vec!["gpu".to_string()]);

    // Identity comes from the parent, not the caller.
    assert_eq!(task.tenant, tenant);
    assert_eq!(task.flow_group, group);

    let history = db.runs.history(&task.id);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].state, StateTag::Pending);
}

#[test]
fn test_task_run_requires_existing_flow_parent() {
    let (db, tenant, group) = harness();

    let err = db
        .runs
        .create_task(RunId::new(), vec![])
        .unwrap_err();
    assert!(err.is_not_found());

    // A task run cannot parent another task run.
    let flow = flow_with_labels(&db, tenant, group, &[]);
    let task = db.runs.create_task(flow.id, vec![]).unwrap();
    let err = db
        .runs
        .create_task(task.id, vec![])
        .unwrap_err();
    assert!(err.to_string().contains("flow run"));

    // The failed creation left no orphan behind.
    assert_eq!(db.runs.list().len(), 2);
}

#[test]
fn test_labels_preserved_on_record() {
    let (db, tenant, group) = harness();

    let flow = flow_with_labels(&db, tenant, group, &["db", "gpu"]);
    let fetched = db.runs.get(&flow.id).unwrap();

    assert_eq!(fetched.labels, vec!["db".to_string(), "gpu".to_string()]);
}

// ===== Reads =====

#[test]
fn test_get_and_exists() {
    let (db, tenant, group) = harness();
    let flow = flow_with_labels(&db, tenant, group, &[]);

    assert!(db.runs.exists(&flow.id));
    assert_eq!(db.runs.get(&flow.id).unwrap().id, flow.id);

    let ghost = RunId::new();
    assert!(!db.runs.exists(&ghost));
    assert!(db.runs.get(&ghost).unwrap_err().is_not_found());
}

#[test]
fn test_list_by_state_tracks_transitions() {
    let (db, tenant, group) = harness();
    let a = flow_with_labels(&db, tenant, group, &[]);
    let b = flow_with_labels(&db, tenant, group, &[]);
    let c = flow_with_labels(&db, tenant, group, &[]);

    assert_eq!(db.runs.list().len(), 3);
    assert_eq!(db.runs.list_by_state(StateTag::Scheduled).len(), 3);

    move_to(&db, a.id, StateTag::Running);
    move_to(&db, b.id, StateTag::Running);
    move_to(&db, b.id, StateTag::Success);

    assert_eq!(db.runs.list_by_state(StateTag::Scheduled).len(), 1);
    assert_eq!(db.runs.list_by_state(StateTag::Running).len(), 1);
    assert_eq!(db.runs.list_by_state(StateTag::Success).len(), 1);
    let _ = c;
}

#[test]
fn test_history_last_entry_agrees_with_record() {
    let (db, tenant, group) = harness();
    let flow = flow_with_labels(&db, tenant, group, &[]);

    move_to(&db, flow.id, StateTag::Running);
    move_to(&db, flow.id, StateTag::Retrying);
    move_to(&db, flow.id, StateTag::Running);
    move_to(&db, flow.id, StateTag::Success);

    let record = db.runs.get(&flow.id).unwrap();
    let history = db.runs.history(&flow.id);
    let last = history.last().unwrap();

    assert_eq!(record.version, 6);
    assert_eq!(history.len(), 6);
    assert_eq!(last.version, record.version);
    assert_eq!(last.state, record.state);
    assert_eq!(record.state, StateTag::Success);
}

#[test]
fn test_record_updated_follows_payload_timestamp() {
    let (db, tenant, group) = harness();
    let flow = flow_with_labels(&db, tenant, group, &[]);

    let at = Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap();
    let mut payload = StatePayload::new(StateTag::Running);
    payload.timestamp = at;

    db.states
        .set_one(TransitionRequest::new(flow.id, payload))
        .unwrap();

    let record = db.runs.get(&flow.id).unwrap();
    assert_eq!(record.updated, at);
    assert_eq!(db.runs.history(&flow.id).last().unwrap().timestamp, at);
}

#[test]
fn test_stored_payload_round_trips_message_and_result() {
    let (db, tenant, group) = harness();
    let flow = flow_with_labels(&db, tenant, group, &[]);

    let payload = StatePayload::new(StateTag::Success)
        .with_message("wrapped up")
        .with_result(ResultRef::new(json!({"rows": 42})));
    db.states
        .set_one(TransitionRequest::new(flow.id, payload))
        .unwrap();

    let stored = db.runs.get(&flow.id).unwrap().decode_state().unwrap();
    assert_eq!(stored.tag, StateTag::Success);
    assert_eq!(stored.message.as_deref(), Some("wrapped up"));
    assert_eq!(stored.result, Some(ResultRef::new(json!({"rows": 42}))));
}
