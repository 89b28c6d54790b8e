//! Tests for the queue operation surface: admission, ordering,
//! completion by arbitrary id, undo, history.

mod common;

use assert_matches::assert_matches;
use brigade_core::CoreError;
use brigade_engine::scheduler::AdmitTicketRequest;
use brigade_engine::EngineError;
use chrono::Duration;

use common::{admit, create_workspace, seed_dish, test_engine};

// ---------------------------------------------------------------------------
// Admission stamps the deadline and snapshots the dish
// ---------------------------------------------------------------------------

#[tokio::test]
async fn admission_stamps_deadline_from_prep_time() {
    let engine = test_engine();
    let ws = create_workspace(&engine, "Bistro").await.workspace_id;
    let dish = seed_dish(&engine, ws, "Tacos", 10, &["Corn", "Beef"]).await;

    let admitted = admit(&engine, ws, dish.id, false).await;
    let ticket = &admitted.ticket;

    assert_eq!(
        ticket.calculated_start_time,
        ticket.admitted_at + Duration::minutes(10)
    );
    assert_eq!(ticket.dish_name, "Tacos");
    assert_eq!(ticket.ingredients, vec!["Corn", "Beef"]);
    assert_eq!(ticket.admission_sequence, 1);
}

#[tokio::test]
async fn later_dish_edits_never_touch_admitted_tickets() {
    let engine = test_engine();
    let ws = create_workspace(&engine, "Bistro").await.workspace_id;
    let dish = seed_dish(&engine, ws, "Tacos", 10, &["Corn", "Beef"]).await;
    let admitted = admit(&engine, ws, dish.id, false).await;

    // Rename the dish and triple its prep time.
    engine
        .upsert_dish(brigade_engine::catalog::UpsertDishRequest {
            workspace_id: ws,
            id: Some(dish.id),
            name: "Deluxe Tacos".to_string(),
            prep_time_minutes: 30,
            image_ref: None,
            ingredients: brigade_core::ingredient::IngredientsInput::List(vec![
                "Corn".to_string(),
                "Pork".to_string(),
            ]),
            substitutions: Default::default(),
        })
        .await
        .unwrap();

    let queue = engine.list_queue(ws).await.unwrap();
    assert_eq!(queue[0], admitted.ticket, "snapshot must be immutable");
}

// ---------------------------------------------------------------------------
// Ordering: VIP class, then deadline, then admission order
// ---------------------------------------------------------------------------

#[tokio::test]
async fn vip_preempts_earlier_deadlines() {
    let engine = test_engine();
    let ws = create_workspace(&engine, "Bistro").await.workspace_id;
    let tacos = seed_dish(&engine, ws, "Tacos", 10, &[]).await;
    let steak = seed_dish(&engine, ws, "Steak", 20, &[]).await;

    // Tacos admitted first with the earlier deadline; VIP steak must
    // still rank ahead of it.
    let tacos_ticket = admit(&engine, ws, tacos.id, false).await.ticket;
    let steak_ticket = admit(&engine, ws, steak.id, true).await.ticket;

    let names: Vec<String> = engine
        .list_queue(ws)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.dish_name)
        .collect();
    assert_eq!(names, vec!["Steak", "Tacos"]);

    // Complete the non-head ticket, undo, and land exactly where we
    // started — deadline and sequence included.
    let completed = engine.complete_ticket(ws, tacos_ticket.id).await.unwrap();
    assert_eq!(completed, tacos_ticket);

    let queue = engine.list_queue(ws).await.unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].id, steak_ticket.id);
    let history = engine.list_history(ws).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].ticket, tacos_ticket);

    let restored = engine.undo_last(ws).await.unwrap();
    assert_eq!(restored, tacos_ticket);

    let queue = engine.list_queue(ws).await.unwrap();
    assert_eq!(queue.len(), 2);
    assert_eq!(queue[1], tacos_ticket);
    assert!(engine.list_history(ws).await.unwrap().is_empty());
}

#[tokio::test]
async fn queue_reads_are_repeatable() {
    let engine = test_engine();
    let ws = create_workspace(&engine, "Bistro").await.workspace_id;
    let dish = seed_dish(&engine, ws, "Soup", 8, &[]).await;
    for _ in 0..5 {
        admit(&engine, ws, dish.id, false).await;
    }

    let first = engine.list_queue(ws).await.unwrap();
    let second = engine.list_queue(ws).await.unwrap();
    assert_eq!(first, second);

    // Ascending by (class, deadline, sequence).
    let keys: Vec<_> = first.iter().map(|t| t.priority_key()).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

// ---------------------------------------------------------------------------
// Completion failure modes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn completing_twice_answers_not_found() {
    let engine = test_engine();
    let ws = create_workspace(&engine, "Bistro").await.workspace_id;
    let dish = seed_dish(&engine, ws, "Soup", 8, &[]).await;
    let ticket = admit(&engine, ws, dish.id, false).await.ticket;

    engine.complete_ticket(ws, ticket.id).await.unwrap();
    let err = engine.complete_ticket(ws, ticket.id).await.unwrap_err();
    assert_matches!(
        err,
        EngineError::Core(CoreError::NotFound { entity: "Ticket", .. })
    );
}

#[tokio::test]
async fn completing_an_unknown_id_answers_not_found() {
    let engine = test_engine();
    let ws = create_workspace(&engine, "Bistro").await.workspace_id;
    let err = engine.complete_ticket(ws, 424_242).await.unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::NotFound { .. }));
}

#[tokio::test]
async fn undo_on_empty_history_is_a_conflict() {
    let engine = test_engine();
    let ws = create_workspace(&engine, "Bistro").await.workspace_id;
    let err = engine.undo_last(ws).await.unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Conflict(_)));
}

// ---------------------------------------------------------------------------
// Admission validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn admission_rejects_bad_fields() {
    let engine = test_engine();
    let ws = create_workspace(&engine, "Bistro").await.workspace_id;
    let dish = seed_dish(&engine, ws, "Soup", 8, &[]).await;

    for (quantity, table_number, dish_id) in
        [(0, 4, dish.id), (1, 0, dish.id), (1, 4, 999_999)]
    {
        let err = engine
            .admit_ticket(AdmitTicketRequest {
                workspace_id: ws,
                dish_id,
                quantity,
                table_number,
                is_vip: false,
                allergies: Vec::new(),
            })
            .await
            .unwrap_err();
        assert_matches!(err, EngineError::Core(CoreError::Validation(_)));
    }
    assert!(engine.list_queue(ws).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Allergy handling at admission
// ---------------------------------------------------------------------------

#[tokio::test]
async fn allergies_are_restricted_and_annotated() {
    let engine = test_engine();
    let ws = create_workspace(&engine, "Bistro").await.workspace_id;
    let dish = engine
        .upsert_dish(brigade_engine::catalog::UpsertDishRequest {
            workspace_id: ws,
            id: None,
            name: "Risotto".to_string(),
            prep_time_minutes: 25,
            image_ref: None,
            ingredients: brigade_core::ingredient::IngredientsInput::List(vec![
                "Shellfish".to_string(),
                "Dairy".to_string(),
                "Rice".to_string(),
            ]),
            substitutions: [("Dairy".to_string(), "Oat Cream".to_string())].into(),
        })
        .await
        .unwrap();

    let admitted = engine
        .admit_ticket(AdmitTicketRequest {
            workspace_id: ws,
            dish_id: dish.id,
            quantity: 1,
            table_number: 2,
            is_vip: false,
            allergies: vec!["dairy".to_string(), "Plutonium".to_string()],
        })
        .await
        .unwrap();

    // Only allergies present in the snapshot are kept.
    assert_eq!(admitted.ticket.requested_allergies, vec!["dairy"]);

    let dairy = admitted
        .ingredients
        .iter()
        .find(|i| i.name == "Dairy")
        .unwrap();
    assert!(dairy.excluded);
    assert_eq!(dairy.substitute.as_deref(), Some("Oat Cream"));
    let rice = admitted.ingredients.iter().find(|i| i.name == "Rice").unwrap();
    assert!(!rice.excluded);
}

// ---------------------------------------------------------------------------
// Serialized shape of the polled surface
// ---------------------------------------------------------------------------

#[tokio::test]
async fn admitted_ticket_serializes_for_polling_clients() {
    let engine = test_engine();
    let ws = create_workspace(&engine, "Bistro").await.workspace_id;
    let dish = seed_dish(&engine, ws, "Soup", 8, &["Tomatoes"]).await;
    let admitted = admit(&engine, ws, dish.id, true).await;

    let json = serde_json::to_value(&admitted).unwrap();
    assert_eq!(json["ticket"]["dish_name"], "Soup");
    assert_eq!(json["ticket"]["is_vip"], true);
    assert_eq!(json["ingredients"][0]["name"], "Tomatoes");
    assert_eq!(json["ingredients"][0]["excluded"], false);
}
