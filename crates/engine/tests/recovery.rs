//! Restart recovery: queues are rebuilt from persisted rows, sequences
//! survive, and rows that cannot form a valid queue poison only their
//! own workspace.

mod common;

use assert_matches::assert_matches;
use brigade_db::models::ticket::NewQueuedTicket;
use brigade_db::Store;
use brigade_engine::{Engine, EngineConfig, EngineError};
use chrono::{Duration, Utc};

use common::{admit, create_workspace, seed_dish, test_engine_with_store};

// ---------------------------------------------------------------------------
// Rebuild across a restart
// ---------------------------------------------------------------------------

#[tokio::test]
async fn queue_and_history_survive_a_restart() {
    let (engine, store) = test_engine_with_store();
    let ws = create_workspace(&engine, "Bistro").await.workspace_id;
    let soup = seed_dish(&engine, ws, "Soup", 8, &[]).await;
    let steak = seed_dish(&engine, ws, "Steak", 20, &[]).await;

    let soup_ticket = admit(&engine, ws, soup.id, false).await.ticket;
    let steak_ticket = admit(&engine, ws, steak.id, true).await.ticket;
    engine.complete_ticket(ws, soup_ticket.id).await.unwrap();

    // A fresh engine over the same store rebuilds from rows.
    let restarted = Engine::new(store, EngineConfig::default());
    let queue = restarted.list_queue(ws).await.unwrap();
    assert_eq!(queue, vec![steak_ticket]);

    let history = restarted.list_history(ws).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].ticket, soup_ticket);
}

#[tokio::test]
async fn undo_after_restart_restores_the_exact_ticket() {
    let (engine, store) = test_engine_with_store();
    let ws = create_workspace(&engine, "Bistro").await.workspace_id;
    let soup = seed_dish(&engine, ws, "Soup", 8, &[]).await;
    let ticket = admit(&engine, ws, soup.id, false).await.ticket;
    engine.complete_ticket(ws, ticket.id).await.unwrap();

    let restarted = Engine::new(store, EngineConfig::default());
    let restored = restarted.undo_last(ws).await.unwrap();
    assert_eq!(restored, ticket, "deadline and sequence must be preserved");
    assert_eq!(restarted.list_queue(ws).await.unwrap(), vec![ticket]);
}

#[tokio::test]
async fn sequences_continue_past_completed_tickets_after_restart() {
    let (engine, store) = test_engine_with_store();
    let ws = create_workspace(&engine, "Bistro").await.workspace_id;
    let soup = seed_dish(&engine, ws, "Soup", 8, &[]).await;

    let first = admit(&engine, ws, soup.id, false).await.ticket;
    assert_eq!(first.admission_sequence, 1);
    engine.complete_ticket(ws, first.id).await.unwrap();

    // With the queue empty, a restarted engine must still not reuse
    // sequence 1 — the undo of `first` has to coexist with `second`.
    let restarted = Engine::new(store, EngineConfig::default());
    let second = admit(&restarted, ws, soup.id, false).await.ticket;
    assert_eq!(second.admission_sequence, 2);

    let restored = restarted.undo_last(ws).await.unwrap();
    assert_eq!(restored.admission_sequence, 1);
    assert_eq!(restarted.list_queue(ws).await.unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Corruption poisons exactly one workspace
// ---------------------------------------------------------------------------

#[tokio::test]
async fn duplicate_sequences_refuse_the_workspace_only() {
    let (engine, store) = test_engine_with_store();
    let healthy = create_workspace(&engine, "Bistro").await.workspace_id;
    let corrupt = create_workspace(&engine, "Trattoria").await.workspace_id;
    let dish = seed_dish(&engine, healthy, "Soup", 8, &[]).await;
    admit(&engine, healthy, dish.id, false).await;

    // Hand-craft two rows sharing an admission sequence, as a broken
    // writer or manual edit might leave behind.
    for _ in 0..2 {
        let admitted_at = Utc::now();
        store
            .insert_queued_ticket(&NewQueuedTicket {
                workspace_id: corrupt,
                dish_id: 1,
                dish_name: "Phantom".to_string(),
                prep_time_minutes: 5,
                ingredients: Vec::new(),
                quantity: 1,
                table_number: 1,
                is_vip: false,
                requested_allergies: Vec::new(),
                admitted_at,
                admission_sequence: 7,
                calculated_start_time: admitted_at + Duration::minutes(5),
            })
            .await
            .unwrap();
    }

    let restarted = Engine::new(store, EngineConfig::default());

    let err = restarted.list_queue(corrupt).await.unwrap_err();
    assert_matches!(err, EngineError::CorruptState(_));
    // The refusal is sticky: the workspace stays poisoned.
    let err = restarted.undo_last(corrupt).await.unwrap_err();
    assert_matches!(err, EngineError::CorruptState(_));

    // The healthy workspace is still fully served.
    assert_eq!(restarted.list_queue(healthy).await.unwrap().len(), 1);
}
