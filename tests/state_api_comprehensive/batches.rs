//! Batch Semantics Tests
//!
//! Ordered evaluation, all-or-nothing atomicity, read-your-own-writes
//! inside a batch, and the pre-transaction payload size guard.

use crate::*;

// ===== Ordering and outcomes =====

#[test]
fn test_statuses_reported_in_request_order() {
    let (db, tenant, group) = harness();
    db.limits.set("db", 1);
    let a = flow_with_labels(&db, tenant, group, &["db"]);
    let b = flow_with_labels(&db, tenant, group, &["db"]);
    let c = flow_with_labels(&db, tenant, group, &["db"]);

    let updates = db
        .states
        .set(&[
            TransitionRequest::new(a.id, StatePayload::new(StateTag::Submitted)),
            TransitionRequest::new(b.id, StatePayload::new(StateTag::Submitted)),
            TransitionRequest::new(c.id, StatePayload::new(StateTag::Running)),
        ])
        .unwrap();

    assert_eq!(updates.len(), 3);
    assert_eq!(updates[0].run_id, a.id);
    assert_eq!(updates[1].run_id, b.id);
    assert_eq!(updates[2].run_id, c.id);

    // A took the only slot, B was held back, C was parked in Queued.
    assert_eq!(updates[0].status, SetStateStatus::Success);
    assert_eq!(updates[1].status, SetStateStatus::NoOp);
    assert_eq!(updates[2].status, SetStateStatus::Queued);

    assert!(updates[1].message.as_deref().unwrap_or_default().contains("db"));
    assert_eq!(updates[2].message, None);
    let parked = db.runs.get(&c.id).unwrap().decode_state().unwrap();
    assert!(parked.message.unwrap_or_default().contains("db"));
}

#[test]
fn test_batch_sees_earlier_items_in_same_batch() {
    let (db, tenant, group) = harness();
    db.groups.set_version_locking(group, true);
    let flow = flow_with_labels(&db, tenant, group, &[]);

    // The second expectation is only satisfiable if the first item's bump
    // is visible before the batch commits.
    let updates = db
        .states
        .set(&[
            TransitionRequest::new(flow.id, StatePayload::new(StateTag::Running))
                .with_expected_version(flow.version),
            TransitionRequest::new(flow.id, StatePayload::new(StateTag::Success))
                .with_expected_version(flow.version + 1),
        ])
        .unwrap();

    assert!(updates.iter().all(|u| u.status == SetStateStatus::Success));

    let record = db.runs.get(&flow.id).unwrap();
    assert_eq!(record.version, flow.version + 2);
    assert_eq!(record.state, StateTag::Success);

    let history = db.runs.history(&flow.id);
    let tail: Vec<_> = history[history.len() - 2..]
        .iter()
        .map(|e| (e.version, e.state))
        .collect();
    assert_eq!(
        tail,
        vec![
            (flow.version + 1, StateTag::Running),
            (flow.version + 2, StateTag::Success),
        ]
    );
}

#[test]
fn test_parent_checks_observe_earlier_items() {
    let (db, tenant, group) = harness();
    let flow = flow_with_labels(&db, tenant, group, &[]);
    let task = db.runs.create_task(flow.id, vec![]).unwrap();

    let updates = db
        .states
        .set(&[
            TransitionRequest::new(flow.id, StatePayload::new(StateTag::Running)),
            TransitionRequest::new(task.id, StatePayload::new(StateTag::Running))
                .with_parent_version_check(flow.version + 1),
        ])
        .unwrap();

    assert!(updates.iter().all(|u| u.status == SetStateStatus::Success));
}

#[test]
fn test_empty_batch_is_a_successful_noop() {
    let (db, _, _) = harness();
    assert_eq!(db.states.set(&[]).unwrap(), Vec::new());
}

// ===== Atomicity =====

#[test]
fn test_rejected_item_rolls_back_entire_batch() {
    let (db, tenant, group) = harness();
    db.groups.set_version_locking(group, true);
    db.limits.set("db", 2);
    let a = flow_with_labels(&db, tenant, group, &[]);
    let b = flow_with_labels(&db, tenant, group, &["db"]);
    let c = flow_with_labels(&db, tenant, group, &[]);

    let err = db
        .states
        .set(&[
            TransitionRequest::new(a.id, StatePayload::new(StateTag::Running)),
            TransitionRequest::new(b.id, StatePayload::new(StateTag::Submitted)),
            TransitionRequest::new(c.id, StatePayload::new(StateTag::Running))
                .with_expected_version(c.version + 7),
        ])
        .unwrap_err();
    assert!(err.is_conflict());

    // Items one and two had already validated; they must not stick.
    for run in [&a, &b, &c] {
        let record = db.runs.get(&run.id).unwrap();
        assert_eq!(record.version, run.version);
        assert_eq!(record.state, StateTag::Scheduled);
        assert_eq!(db.runs.history(&run.id).len(), 2);
    }

    // B's slot reservation died with the batch.
    assert_eq!(db.limits.occupancy("db"), 0);
}

#[test]
fn test_unknown_run_anywhere_aborts_batch() {
    let (db, tenant, group) = harness();
    let a = flow_with_labels(&db, tenant, group, &[]);

    let err = db
        .states
        .set(&[
            TransitionRequest::new(a.id, StatePayload::new(StateTag::Running)),
            TransitionRequest::new(RunId::new(), StatePayload::new(StateTag::Running)),
        ])
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(db.runs.get(&a.id).unwrap().state, StateTag::Scheduled);
}

// ===== Payload guard =====

#[test]
fn test_oversized_item_rejects_batch_before_any_work() {
    let db = Gantry::builder().max_state_payload_bytes(512).build();
    let tenant = TenantId::new();
    let group = FlowGroupId::new();
    let flow = flow_with_labels(&db, tenant, group, &[]);
    let before = db.metrics();

    let err = db
        .states
        .set(&[
            TransitionRequest::new(flow.id, StatePayload::new(StateTag::Running)),
            TransitionRequest::new(
                flow.id,
                StatePayload::new(StateTag::Success).with_message("x".repeat(4096)),
            ),
        ])
        .unwrap_err();

    assert!(err.is_payload_too_large());
    assert_eq!(err.to_string(), "State payload is too large");

    // Rejection happened before the transaction: nothing committed, nothing
    // aborted, and the small first item never applied.
    let after = db.metrics();
    assert_eq!(after.transactions_committed, before.transactions_committed);
    assert_eq!(after.transactions_aborted, before.transactions_aborted);
    assert_eq!(db.runs.get(&flow.id).unwrap().state, StateTag::Scheduled);
}

#[test]
fn test_batch_total_counts_against_the_cap() {
    let db = Gantry::builder().max_state_payload_bytes(2_000).build();
    let tenant = TenantId::new();
    let group = FlowGroupId::new();
    let flow = flow_with_labels(&db, tenant, group, &[]);

    let item = |tag| {
        TransitionRequest::new(
            flow.id,
            StatePayload::new(tag).with_message("x".repeat(900)),
        )
    };

    // One item fits comfortably.
    assert!(db.states.set(&[item(StateTag::Running)]).is_ok());

    // Three of the same size do not, even though each passes alone.
    let err = db
        .states
        .set(&[
            item(StateTag::Retrying),
            item(StateTag::Running),
            item(StateTag::Success),
        ])
        .unwrap_err();
    assert!(err.is_payload_too_large());
}
