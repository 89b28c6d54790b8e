//! Storage backend abstraction.
//!
//! One trait, two backends: [`PgStore`] persists to PostgreSQL through
//! the repositories; [`MemStore`] keeps everything in process memory
//! (tests, single-node deployments). The engine only ever talks to
//! `Arc<dyn Store>`.

use async_trait::async_trait;
use brigade_core::ledger::CompletionRecord;
use brigade_core::types::DbId;

use crate::models::completion::CompletionRow;
use crate::models::dish::{DishRow, NewDish};
use crate::models::ticket::{NewQueuedTicket, QueuedTicketRow};
use crate::models::workspace::{NewWorkspace, WorkspaceRow};

mod mem;
mod pg;

pub use mem::MemStore;
pub use pg::PgStore;

/// Failures surfaced by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The stored rows disagree with what the caller knows must hold
    /// (e.g. completing a ticket whose queued row is gone). The
    /// operation was rolled back.
    #[error("store inconsistency: {0}")]
    Inconsistent(String),
}

/// Persistence surface for the engine: workspaces, dishes, queued
/// ticket rows, and the completion log.
///
/// The two compound mutations (`record_completion`,
/// `revert_completion`) are atomic: both tables change or neither does.
#[async_trait]
pub trait Store: Send + Sync {
    // --- Workspaces ---

    async fn insert_workspace(&self, new: &NewWorkspace) -> Result<WorkspaceRow, StoreError>;

    async fn find_workspace(&self, id: DbId) -> Result<Option<WorkspaceRow>, StoreError>;

    /// Value-only lookup by entry-password digest.
    async fn find_workspace_by_entry_digest(
        &self,
        digest: &str,
    ) -> Result<Option<WorkspaceRow>, StoreError>;

    async fn list_workspace_ids(&self) -> Result<Vec<DbId>, StoreError>;

    // --- Dishes ---

    async fn list_dishes(&self, workspace_id: DbId) -> Result<Vec<DishRow>, StoreError>;

    async fn find_dish(&self, workspace_id: DbId, id: DbId)
        -> Result<Option<DishRow>, StoreError>;

    async fn insert_dish(&self, new: &NewDish) -> Result<DishRow, StoreError>;

    /// Returns `None` when the id is absent from the workspace.
    async fn update_dish(
        &self,
        workspace_id: DbId,
        id: DbId,
        new: &NewDish,
    ) -> Result<Option<DishRow>, StoreError>;

    /// Returns `false` when the dish no longer exists.
    async fn set_dish_prep_time(
        &self,
        workspace_id: DbId,
        id: DbId,
        prep_time_minutes: i32,
    ) -> Result<bool, StoreError>;

    async fn delete_dish(&self, workspace_id: DbId, id: DbId) -> Result<bool, StoreError>;

    async fn delete_all_dishes(&self, workspace_id: DbId) -> Result<u64, StoreError>;

    async fn count_dishes(&self, workspace_id: DbId) -> Result<i64, StoreError>;

    // --- Queue rows + completion log ---

    async fn load_queued_tickets(
        &self,
        workspace_id: DbId,
    ) -> Result<Vec<QueuedTicketRow>, StoreError>;

    /// Ascending completion order.
    async fn load_completions(
        &self,
        workspace_id: DbId,
    ) -> Result<Vec<CompletionRow>, StoreError>;

    async fn insert_queued_ticket(
        &self,
        new: &NewQueuedTicket,
    ) -> Result<QueuedTicketRow, StoreError>;

    /// Move a ticket from the queued rows into the completion log.
    async fn record_completion(&self, record: &CompletionRecord) -> Result<(), StoreError>;

    /// Reverse of [`Store::record_completion`]: drop the log entry and
    /// restore the queued row under its original id.
    async fn revert_completion(&self, record: &CompletionRecord) -> Result<(), StoreError>;
}
