//! Repository for the `queued_tickets` table.
//!
//! Plain reads and admission inserts run against the pool; the delete
//! and restore halves of complete/undo take a connection so the store
//! can run them inside one transaction with the completion log.

use brigade_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::ticket::{NewQueuedTicket, QueuedTicketRow};

/// Column list for `queued_tickets` queries.
const COLUMNS: &str = "id, workspace_id, dish_id, dish_name, prep_time_minutes, ingredients, \
                       quantity, table_number, is_vip, requested_allergies, admitted_at, \
                       admission_sequence, calculated_start_time";

/// Provides access to raw queued-ticket rows.
pub struct TicketRepo;

impl TicketRepo {
    /// All queued rows of a workspace, in admission order. The caller
    /// rebuilds the heap; no ordering guarantee is needed here beyond
    /// determinism.
    pub async fn list_for_workspace(
        pool: &PgPool,
        workspace_id: DbId,
    ) -> Result<Vec<QueuedTicketRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM queued_tickets WHERE workspace_id = $1 ORDER BY admission_sequence"
        );
        sqlx::query_as::<_, QueuedTicketRow>(&query)
            .bind(workspace_id)
            .fetch_all(pool)
            .await
    }

    /// Insert an admission row; the id is assigned by the database.
    pub async fn insert(
        pool: &PgPool,
        new: &NewQueuedTicket,
    ) -> Result<QueuedTicketRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO queued_tickets (workspace_id, dish_id, dish_name, prep_time_minutes, \
                 ingredients, quantity, table_number, is_vip, requested_allergies, admitted_at, \
                 admission_sequence, calculated_start_time) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QueuedTicketRow>(&query)
            .bind(new.workspace_id)
            .bind(new.dish_id)
            .bind(&new.dish_name)
            .bind(new.prep_time_minutes)
            .bind(&new.ingredients)
            .bind(new.quantity)
            .bind(new.table_number)
            .bind(new.is_vip)
            .bind(&new.requested_allergies)
            .bind(new.admitted_at)
            .bind(new.admission_sequence)
            .bind(new.calculated_start_time)
            .fetch_one(pool)
            .await
    }

    /// Re-insert a previously completed ticket under its original id
    /// (the undo path). Runs inside the caller's transaction.
    pub async fn restore(
        conn: &mut PgConnection,
        row: &QueuedTicketRow,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO queued_tickets (id, workspace_id, dish_id, dish_name, prep_time_minutes, \
                 ingredients, quantity, table_number, is_vip, requested_allergies, admitted_at, \
                 admission_sequence, calculated_start_time) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(row.id)
        .bind(row.workspace_id)
        .bind(row.dish_id)
        .bind(&row.dish_name)
        .bind(row.prep_time_minutes)
        .bind(&row.ingredients)
        .bind(row.quantity)
        .bind(row.table_number)
        .bind(row.is_vip)
        .bind(&row.requested_allergies)
        .bind(row.admitted_at)
        .bind(row.admission_sequence)
        .bind(row.calculated_start_time)
        .execute(conn)
        .await
        .map(|_| ())
    }

    /// Delete one queued row. Runs inside the caller's transaction;
    /// returns `false` when nothing matched.
    pub async fn delete(
        conn: &mut PgConnection,
        workspace_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM queued_tickets WHERE workspace_id = $1 AND id = $2")
            .bind(workspace_id)
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
