//! PostgreSQL storage backend, delegating to the repositories.

use async_trait::async_trait;
use brigade_core::ledger::CompletionRecord;
use brigade_core::types::DbId;

use crate::models::completion::CompletionRow;
use crate::models::dish::{DishRow, NewDish};
use crate::models::ticket::{NewQueuedTicket, QueuedTicketRow};
use crate::models::workspace::{NewWorkspace, WorkspaceRow};
use crate::repositories::{CompletionRepo, DishRepo, TicketRepo, WorkspaceRepo};
use crate::{DbPool, Store, StoreError};

/// [`Store`] backed by a PostgreSQL pool.
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// The underlying pool (health checks, migrations).
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_workspace(&self, new: &NewWorkspace) -> Result<WorkspaceRow, StoreError> {
        Ok(WorkspaceRepo::insert(&self.pool, new).await?)
    }

    async fn find_workspace(&self, id: DbId) -> Result<Option<WorkspaceRow>, StoreError> {
        Ok(WorkspaceRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_workspace_by_entry_digest(
        &self,
        digest: &str,
    ) -> Result<Option<WorkspaceRow>, StoreError> {
        Ok(WorkspaceRepo::find_by_entry_digest(&self.pool, digest).await?)
    }

    async fn list_workspace_ids(&self) -> Result<Vec<DbId>, StoreError> {
        Ok(WorkspaceRepo::list_ids(&self.pool).await?)
    }

    async fn list_dishes(&self, workspace_id: DbId) -> Result<Vec<DishRow>, StoreError> {
        Ok(DishRepo::list_for_workspace(&self.pool, workspace_id).await?)
    }

    async fn find_dish(
        &self,
        workspace_id: DbId,
        id: DbId,
    ) -> Result<Option<DishRow>, StoreError> {
        Ok(DishRepo::find(&self.pool, workspace_id, id).await?)
    }

    async fn insert_dish(&self, new: &NewDish) -> Result<DishRow, StoreError> {
        Ok(DishRepo::insert(&self.pool, new).await?)
    }

    async fn update_dish(
        &self,
        workspace_id: DbId,
        id: DbId,
        new: &NewDish,
    ) -> Result<Option<DishRow>, StoreError> {
        Ok(DishRepo::update(&self.pool, workspace_id, id, new).await?)
    }

    async fn set_dish_prep_time(
        &self,
        workspace_id: DbId,
        id: DbId,
        prep_time_minutes: i32,
    ) -> Result<bool, StoreError> {
        Ok(DishRepo::set_prep_time(&self.pool, workspace_id, id, prep_time_minutes).await?)
    }

    async fn delete_dish(&self, workspace_id: DbId, id: DbId) -> Result<bool, StoreError> {
        Ok(DishRepo::delete(&self.pool, workspace_id, id).await?)
    }

    async fn delete_all_dishes(&self, workspace_id: DbId) -> Result<u64, StoreError> {
        Ok(DishRepo::delete_all(&self.pool, workspace_id).await?)
    }

    async fn count_dishes(&self, workspace_id: DbId) -> Result<i64, StoreError> {
        Ok(DishRepo::count(&self.pool, workspace_id).await?)
    }

    async fn load_queued_tickets(
        &self,
        workspace_id: DbId,
    ) -> Result<Vec<QueuedTicketRow>, StoreError> {
        Ok(TicketRepo::list_for_workspace(&self.pool, workspace_id).await?)
    }

    async fn load_completions(
        &self,
        workspace_id: DbId,
    ) -> Result<Vec<CompletionRow>, StoreError> {
        Ok(CompletionRepo::list_for_workspace(&self.pool, workspace_id).await?)
    }

    async fn insert_queued_ticket(
        &self,
        new: &NewQueuedTicket,
    ) -> Result<QueuedTicketRow, StoreError> {
        Ok(TicketRepo::insert(&self.pool, new).await?)
    }

    async fn record_completion(&self, record: &CompletionRecord) -> Result<(), StoreError> {
        let ticket = &record.ticket;
        let mut tx = self.pool.begin().await?;

        let deleted =
            TicketRepo::delete(&mut tx, ticket.workspace_id, ticket.id).await?;
        if !deleted {
            return Err(StoreError::Inconsistent(format!(
                "queued row for ticket {} is missing",
                ticket.id
            )));
        }
        CompletionRepo::append(&mut tx, record).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn revert_completion(&self, record: &CompletionRecord) -> Result<(), StoreError> {
        let ticket = &record.ticket;
        let mut tx = self.pool.begin().await?;

        let removed =
            CompletionRepo::delete_for_ticket(&mut tx, ticket.workspace_id, ticket.id).await?;
        if !removed {
            return Err(StoreError::Inconsistent(format!(
                "completion record for ticket {} is missing",
                ticket.id
            )));
        }
        TicketRepo::restore(&mut tx, &QueuedTicketRow::from(ticket)).await?;

        tx.commit().await?;
        Ok(())
    }
}
