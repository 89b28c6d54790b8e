//! Shared helpers for the engine integration tests.
//!
//! Every test runs the real engine over the in-memory storage backend,
//! so the full operation surface is exercised without a database.

use std::sync::Arc;

use brigade_db::models::dish::DishRow;
use brigade_db::MemStore;
use brigade_engine::catalog::UpsertDishRequest;
use brigade_engine::registry::{CreateWorkspaceRequest, CreatedWorkspace};
use brigade_engine::scheduler::{AdmitTicketRequest, AdmittedTicket};
use brigade_engine::{Engine, EngineConfig};

/// Engine over a fresh in-memory store.
pub fn test_engine() -> Engine {
    Engine::new(Arc::new(MemStore::new()), EngineConfig::default())
}

/// Engine plus a handle on its store, for tests that restart the
/// engine or seed rows directly.
pub fn test_engine_with_store() -> (Engine, Arc<MemStore>) {
    let store = Arc::new(MemStore::new());
    let engine = Engine::new(store.clone(), EngineConfig::default());
    (engine, store)
}

/// Create a workspace with a fixed admin credential.
pub async fn create_workspace(engine: &Engine, name: &str) -> CreatedWorkspace {
    engine
        .create_workspace(CreateWorkspaceRequest {
            name: name.to_string(),
            admin_email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            admin_password: "admin-pass-1".to_string(),
            invites: Vec::new(),
        })
        .await
        .expect("workspace creation should succeed")
}

/// Seed one dish with plain ingredients and no substitutions.
pub async fn seed_dish(
    engine: &Engine,
    workspace_id: i64,
    name: &str,
    prep_time_minutes: i32,
    ingredients: &[&str],
) -> DishRow {
    engine
        .upsert_dish(UpsertDishRequest {
            workspace_id,
            id: None,
            name: name.to_string(),
            prep_time_minutes,
            image_ref: None,
            ingredients: brigade_core::ingredient::IngredientsInput::List(
                ingredients.iter().map(|s| s.to_string()).collect(),
            ),
            substitutions: Default::default(),
        })
        .await
        .expect("dish upsert should succeed")
}

/// Admit a plain one-item ticket for table 4.
pub async fn admit(
    engine: &Engine,
    workspace_id: i64,
    dish_id: i64,
    is_vip: bool,
) -> AdmittedTicket {
    engine
        .admit_ticket(AdmitTicketRequest {
            workspace_id,
            dish_id,
            quantity: 1,
            table_number: 4,
            is_vip,
            allergies: Vec::new(),
        })
        .await
        .expect("admission should succeed")
}
