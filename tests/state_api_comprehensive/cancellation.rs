//! Cancellation Tests
//!
//! The cancel translation table: executing runs wind down through
//! `Cancelling`, runs that never started drop straight to `Cancelled`,
//! finished runs are left exactly as they are.

use crate::*;

#[test]
fn test_cancel_running_run_starts_winddown() {
    let (db, tenant, group) = harness();
    let flow = flow_with_labels(&db, tenant, group, &[]);
    move_to(&db, flow.id, StateTag::Running);

    let payload = db.states.cancel(flow.id).unwrap();

    assert_eq!(payload.tag, StateTag::Cancelling);
    assert_eq!(payload.message.as_deref(), Some("cancellation requested"));
    let record = db.runs.get(&flow.id).unwrap();
    assert_eq!(record.state, StateTag::Cancelling);
    assert_eq!(record.version, flow.version + 2);
}

#[test]
fn test_cancel_before_start_drops_to_cancelled() {
    let (db, tenant, group) = harness();

    // Scheduled, Queued and Retrying flows, plus a Pending task.
    let scheduled = flow_with_labels(&db, tenant, group, &[]);
    let queued = flow_with_labels(&db, tenant, group, &[]);
    move_to(&db, queued.id, StateTag::Queued);
    let retrying = flow_with_labels(&db, tenant, group, &[]);
    move_to(&db, retrying.id, StateTag::Retrying);
    let task = db
        .runs
        .create_task(scheduled.id, vec![])
        .unwrap();

    for run_id in [scheduled.id, queued.id, retrying.id, task.id] {
        let payload = db.states.cancel(run_id).unwrap();
        assert_eq!(payload.tag, StateTag::Cancelled);
        assert_eq!(payload.message.as_deref(), Some("run cancelled"));
        assert_eq!(db.runs.get(&run_id).unwrap().state, StateTag::Cancelled);
    }
}

#[test]
fn test_cancel_submitted_run_releases_its_slot() {
    let (db, tenant, group) = harness();
    db.limits.set("db", 1);
    let flow = flow_with_labels(&db, tenant, group, &["db"]);
    move_to(&db, flow.id, StateTag::Submitted);
    assert_eq!(db.limits.occupancy("db"), 1);

    let payload = db.states.cancel(flow.id).unwrap();

    assert_eq!(payload.tag, StateTag::Cancelled);
    assert_eq!(db.limits.occupancy("db"), 0);
}

#[test]
fn test_cancel_running_run_releases_its_slot() {
    let (db, tenant, group) = harness();
    db.limits.set("db", 1);
    let flow = flow_with_labels(&db, tenant, group, &["db"]);
    move_to(&db, flow.id, StateTag::Submitted);
    move_to(&db, flow.id, StateTag::Running);

    db.states.cancel(flow.id).unwrap();

    // Winding down no longer holds the slot; the next run may enter.
    assert_eq!(db.runs.get(&flow.id).unwrap().state, StateTag::Cancelling);
    assert_eq!(db.limits.occupancy("db"), 0);
    let next = flow_with_labels(&db, tenant, group, &["db"]);
    assert_eq!(
        move_to(&db, next.id, StateTag::Submitted).status,
        SetStateStatus::Success
    );
}

#[test]
fn test_cancel_finished_run_is_left_alone() {
    let (db, tenant, group) = harness();

    for terminal in [StateTag::Success, StateTag::Failed, StateTag::Cancelled] {
        let flow = flow_with_labels(&db, tenant, group, &[]);
        db.states
            .set_one(TransitionRequest::new(
                flow.id,
                StatePayload::new(terminal).with_message("done"),
            ))
            .unwrap();
        let before = db.runs.get(&flow.id).unwrap();

        let payload = db.states.cancel(flow.id).unwrap();

        // The stored terminal payload comes back untouched.
        assert_eq!(payload.tag, terminal);
        assert_eq!(payload.message.as_deref(), Some("done"));
        let after = db.runs.get(&flow.id).unwrap();
        assert_eq!(after.version, before.version);
        assert_eq!(db.runs.history(&flow.id).len(), 3);
    }
}

#[test]
fn test_cancel_is_idempotent_while_winding_down() {
    let (db, tenant, group) = harness();
    let flow = flow_with_labels(&db, tenant, group, &[]);
    move_to(&db, flow.id, StateTag::Running);

    let first = db.states.cancel(flow.id).unwrap();
    let version_after_first = db.runs.get(&flow.id).unwrap().version;
    let second = db.states.cancel(flow.id).unwrap();

    assert_eq!(first.tag, StateTag::Cancelling);
    assert_eq!(second.tag, StateTag::Cancelling);
    assert_eq!(db.runs.get(&flow.id).unwrap().version, version_after_first);
}

#[test]
fn test_cancelling_run_can_report_cancelled() {
    let (db, tenant, group) = harness();
    let flow = flow_with_labels(&db, tenant, group, &[]);
    move_to(&db, flow.id, StateTag::Running);
    db.states.cancel(flow.id).unwrap();

    // The worker acknowledges the winddown through the normal batch API.
    let update = move_to(&db, flow.id, StateTag::Cancelled);

    assert_eq!(update.status, SetStateStatus::Success);
    let record = db.runs.get(&flow.id).unwrap();
    assert_eq!(record.state, StateTag::Cancelled);
    assert!(record.state.is_terminal());
}

#[test]
fn test_cancel_appends_history() {
    let (db, tenant, group) = harness();
    let flow = flow_with_labels(&db, tenant, group, &[]);
    move_to(&db, flow.id, StateTag::Running);
    let before = db.runs.history(&flow.id).len();

    db.states.cancel(flow.id).unwrap();

    let history = db.runs.history(&flow.id);
    assert_eq!(history.len(), before + 1);
    let last = history.last().unwrap();
    assert_eq!(last.state, StateTag::Cancelling);
    assert_eq!(last.message.as_deref(), Some("cancellation requested"));
}

#[test]
fn test_cancel_unknown_run_is_not_found() {
    let (db, _, _) = harness();
    assert!(db.states.cancel(RunId::new()).unwrap_err().is_not_found());
}
