//! In-memory storage backend.
//!
//! Holds the same row shapes as PostgreSQL in process memory behind a
//! single async mutex. Backs the engine test suite and single-node
//! deployments that can afford to lose history on restart.

use std::collections::BTreeMap;

use async_trait::async_trait;
use brigade_core::ledger::CompletionRecord;
use brigade_core::types::DbId;
use chrono::Utc;
use sqlx::types::Json;
use tokio::sync::Mutex;

use crate::models::completion::CompletionRow;
use crate::models::dish::{DishRow, NewDish};
use crate::models::ticket::{NewQueuedTicket, QueuedTicketRow};
use crate::models::workspace::{NewWorkspace, WorkspaceRow};
use crate::{Store, StoreError};

#[derive(Debug, Default)]
struct MemState {
    workspaces: BTreeMap<DbId, WorkspaceRow>,
    dishes: BTreeMap<DbId, DishRow>,
    queued: BTreeMap<DbId, QueuedTicketRow>,
    completions: Vec<CompletionRow>,
    last_workspace_id: DbId,
    last_dish_id: DbId,
    last_ticket_id: DbId,
    last_completion_id: DbId,
}

/// [`Store`] kept entirely in process memory.
#[derive(Debug, Default)]
pub struct MemStore {
    inner: Mutex<MemState>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemStore {
    async fn insert_workspace(&self, new: &NewWorkspace) -> Result<WorkspaceRow, StoreError> {
        let mut state = self.inner.lock().await;
        if state
            .workspaces
            .values()
            .any(|w| w.entry_password_digest == new.entry_password_digest)
        {
            return Err(StoreError::Inconsistent(
                "entry password digest already in use".to_string(),
            ));
        }
        state.last_workspace_id += 1;
        let row = WorkspaceRow {
            id: state.last_workspace_id,
            name: new.name.clone(),
            admin_email: new.admin_email.clone(),
            admin_password_hash: new.admin_password_hash.clone(),
            entry_password_digest: new.entry_password_digest.clone(),
            created_at: Utc::now(),
        };
        state.workspaces.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_workspace(&self, id: DbId) -> Result<Option<WorkspaceRow>, StoreError> {
        let state = self.inner.lock().await;
        Ok(state.workspaces.get(&id).cloned())
    }

    async fn find_workspace_by_entry_digest(
        &self,
        digest: &str,
    ) -> Result<Option<WorkspaceRow>, StoreError> {
        let state = self.inner.lock().await;
        Ok(state
            .workspaces
            .values()
            .find(|w| w.entry_password_digest == digest)
            .cloned())
    }

    async fn list_workspace_ids(&self) -> Result<Vec<DbId>, StoreError> {
        let state = self.inner.lock().await;
        Ok(state.workspaces.keys().copied().collect())
    }

    async fn list_dishes(&self, workspace_id: DbId) -> Result<Vec<DishRow>, StoreError> {
        let state = self.inner.lock().await;
        Ok(state
            .dishes
            .values()
            .filter(|d| d.workspace_id == workspace_id)
            .cloned()
            .collect())
    }

    async fn find_dish(
        &self,
        workspace_id: DbId,
        id: DbId,
    ) -> Result<Option<DishRow>, StoreError> {
        let state = self.inner.lock().await;
        Ok(state
            .dishes
            .get(&id)
            .filter(|d| d.workspace_id == workspace_id)
            .cloned())
    }

    async fn insert_dish(&self, new: &NewDish) -> Result<DishRow, StoreError> {
        let mut state = self.inner.lock().await;
        state.last_dish_id += 1;
        let now = Utc::now();
        let row = DishRow {
            id: state.last_dish_id,
            workspace_id: new.workspace_id,
            name: new.name.clone(),
            prep_time_minutes: new.prep_time_minutes,
            image_ref: new.image_ref.clone(),
            ingredients: new.ingredients.clone(),
            substitutions: Json(new.substitutions.clone()),
            created_at: now,
            updated_at: now,
        };
        state.dishes.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_dish(
        &self,
        workspace_id: DbId,
        id: DbId,
        new: &NewDish,
    ) -> Result<Option<DishRow>, StoreError> {
        let mut state = self.inner.lock().await;
        let Some(row) = state
            .dishes
            .get_mut(&id)
            .filter(|d| d.workspace_id == workspace_id)
        else {
            return Ok(None);
        };
        row.name = new.name.clone();
        row.prep_time_minutes = new.prep_time_minutes;
        row.image_ref = new.image_ref.clone();
        row.ingredients = new.ingredients.clone();
        row.substitutions = Json(new.substitutions.clone());
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn set_dish_prep_time(
        &self,
        workspace_id: DbId,
        id: DbId,
        prep_time_minutes: i32,
    ) -> Result<bool, StoreError> {
        let mut state = self.inner.lock().await;
        let Some(row) = state
            .dishes
            .get_mut(&id)
            .filter(|d| d.workspace_id == workspace_id)
        else {
            return Ok(false);
        };
        row.prep_time_minutes = prep_time_minutes;
        row.updated_at = Utc::now();
        Ok(true)
    }

    async fn delete_dish(&self, workspace_id: DbId, id: DbId) -> Result<bool, StoreError> {
        let mut state = self.inner.lock().await;
        let matches = state
            .dishes
            .get(&id)
            .is_some_and(|d| d.workspace_id == workspace_id);
        if matches {
            state.dishes.remove(&id);
        }
        Ok(matches)
    }

    async fn delete_all_dishes(&self, workspace_id: DbId) -> Result<u64, StoreError> {
        let mut state = self.inner.lock().await;
        let before = state.dishes.len();
        state.dishes.retain(|_, d| d.workspace_id != workspace_id);
        Ok((before - state.dishes.len()) as u64)
    }

    async fn count_dishes(&self, workspace_id: DbId) -> Result<i64, StoreError> {
        let state = self.inner.lock().await;
        Ok(state
            .dishes
            .values()
            .filter(|d| d.workspace_id == workspace_id)
            .count() as i64)
    }

    async fn load_queued_tickets(
        &self,
        workspace_id: DbId,
    ) -> Result<Vec<QueuedTicketRow>, StoreError> {
        let state = self.inner.lock().await;
        let mut rows: Vec<QueuedTicketRow> = state
            .queued
            .values()
            .filter(|t| t.workspace_id == workspace_id)
            .cloned()
            .collect();
        rows.sort_by_key(|t| t.admission_sequence);
        Ok(rows)
    }

    async fn load_completions(
        &self,
        workspace_id: DbId,
    ) -> Result<Vec<CompletionRow>, StoreError> {
        let state = self.inner.lock().await;
        Ok(state
            .completions
            .iter()
            .filter(|c| c.workspace_id == workspace_id)
            .cloned()
            .collect())
    }

    async fn insert_queued_ticket(
        &self,
        new: &NewQueuedTicket,
    ) -> Result<QueuedTicketRow, StoreError> {
        let mut state = self.inner.lock().await;
        state.last_ticket_id += 1;
        let row = QueuedTicketRow {
            id: state.last_ticket_id,
            workspace_id: new.workspace_id,
            dish_id: new.dish_id,
            dish_name: new.dish_name.clone(),
            prep_time_minutes: new.prep_time_minutes,
            ingredients: new.ingredients.clone(),
            quantity: new.quantity,
            table_number: new.table_number,
            is_vip: new.is_vip,
            requested_allergies: new.requested_allergies.clone(),
            admitted_at: new.admitted_at,
            admission_sequence: new.admission_sequence,
            calculated_start_time: new.calculated_start_time,
        };
        state.queued.insert(row.id, row.clone());
        Ok(row)
    }

    async fn record_completion(&self, record: &CompletionRecord) -> Result<(), StoreError> {
        let ticket = &record.ticket;
        let mut state = self.inner.lock().await;
        let matches = state
            .queued
            .get(&ticket.id)
            .is_some_and(|t| t.workspace_id == ticket.workspace_id);
        if !matches {
            return Err(StoreError::Inconsistent(format!(
                "queued row for ticket {} is missing",
                ticket.id
            )));
        }
        state.queued.remove(&ticket.id);
        state.last_completion_id += 1;
        let row = CompletionRow {
            id: state.last_completion_id,
            workspace_id: ticket.workspace_id,
            ticket_id: ticket.id,
            dish_id: ticket.dish_id,
            dish_name: ticket.dish_name.clone(),
            prep_time_minutes: ticket.prep_time_minutes,
            ingredients: ticket.ingredients.clone(),
            quantity: ticket.quantity,
            table_number: ticket.table_number,
            is_vip: ticket.is_vip,
            requested_allergies: ticket.requested_allergies.clone(),
            admitted_at: ticket.admitted_at,
            admission_sequence: ticket.admission_sequence,
            calculated_start_time: ticket.calculated_start_time,
            completed_at: record.completed_at,
        };
        state.completions.push(row);
        Ok(())
    }

    async fn revert_completion(&self, record: &CompletionRecord) -> Result<(), StoreError> {
        let ticket = &record.ticket;
        let mut state = self.inner.lock().await;
        let Some(pos) = state
            .completions
            .iter()
            .position(|c| c.workspace_id == ticket.workspace_id && c.ticket_id == ticket.id)
        else {
            return Err(StoreError::Inconsistent(format!(
                "completion record for ticket {} is missing",
                ticket.id
            )));
        };
        state.completions.remove(pos);
        state
            .queued
            .insert(ticket.id, QueuedTicketRow::from(ticket));
        Ok(())
    }
}
