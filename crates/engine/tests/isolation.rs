//! Workspace isolation: no operation on one workspace ever observes or
//! mutates another's dishes or tickets.

mod common;

use assert_matches::assert_matches;
use brigade_core::CoreError;
use brigade_engine::EngineError;

use common::{admit, create_workspace, seed_dish, test_engine};

#[tokio::test]
async fn queues_and_menus_never_cross_workspaces() {
    let engine = test_engine();
    let ws_a = create_workspace(&engine, "Bistro").await.workspace_id;
    let ws_b = create_workspace(&engine, "Trattoria").await.workspace_id;

    let dish_a = seed_dish(&engine, ws_a, "Soup", 8, &["Tomatoes"]).await;
    let dish_b = seed_dish(&engine, ws_b, "Pasta", 14, &["Gluten"]).await;

    let ticket_a = admit(&engine, ws_a, dish_a.id, false).await.ticket;
    let ticket_b = admit(&engine, ws_b, dish_b.id, true).await.ticket;

    // Menus are strictly filtered.
    let menu_a = engine.list_dishes(ws_a).await.unwrap();
    assert_eq!(menu_a.len(), 1);
    assert_eq!(menu_a[0].id, dish_a.id);

    // Queues are strictly filtered.
    let queue_a = engine.list_queue(ws_a).await.unwrap();
    assert_eq!(queue_a.len(), 1);
    assert_eq!(queue_a[0].id, ticket_a.id);

    // Sequences are per-workspace: both first admissions get 1.
    assert_eq!(ticket_a.admission_sequence, 1);
    assert_eq!(ticket_b.admission_sequence, 1);

    // A cannot complete B's ticket.
    let err = engine.complete_ticket(ws_a, ticket_b.id).await.unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::NotFound { .. }));
    assert_eq!(engine.list_queue(ws_b).await.unwrap().len(), 1);

    // A's undo never resurrects into B.
    engine.complete_ticket(ws_b, ticket_b.id).await.unwrap();
    let err = engine.undo_last(ws_a).await.unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Conflict(_)));
    assert_eq!(engine.list_history(ws_b).await.unwrap().len(), 1);
}

#[tokio::test]
async fn foreign_dishes_are_invisible_to_admission_and_deletion() {
    let engine = test_engine();
    let ws_a = create_workspace(&engine, "Bistro").await.workspace_id;
    let ws_b = create_workspace(&engine, "Trattoria").await.workspace_id;
    let dish_b = seed_dish(&engine, ws_b, "Pasta", 14, &[]).await;

    // Admitting against a foreign dish id fails validation.
    let err = engine
        .admit_ticket(brigade_engine::scheduler::AdmitTicketRequest {
            workspace_id: ws_a,
            dish_id: dish_b.id,
            quantity: 1,
            table_number: 1,
            is_vip: false,
            allergies: Vec::new(),
        })
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Validation(_)));

    // Deleting a foreign dish answers NotFound and leaves it in place.
    let err = engine.delete_dish(ws_a, dish_b.id).await.unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::NotFound { .. }));
    assert_eq!(engine.list_dishes(ws_b).await.unwrap().len(), 1);

    // Unloading A's menu never touches B's.
    engine.unload_menu(ws_a).await.unwrap();
    assert_eq!(engine.list_dishes(ws_b).await.unwrap().len(), 1);
}
