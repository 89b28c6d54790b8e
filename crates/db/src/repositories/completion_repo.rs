//! Repository for the append-only `completion_log` table.

use brigade_core::ledger::CompletionRecord;
use brigade_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::completion::CompletionRow;

/// Column list for `completion_log` queries.
const COLUMNS: &str = "id, workspace_id, ticket_id, dish_id, dish_name, prep_time_minutes, \
                       ingredients, quantity, table_number, is_vip, requested_allergies, \
                       admitted_at, admission_sequence, calculated_start_time, completed_at";

/// Provides access to the completion log.
pub struct CompletionRepo;

impl CompletionRepo {
    /// All completions of a workspace, ascending completion order.
    pub async fn list_for_workspace(
        pool: &PgPool,
        workspace_id: DbId,
    ) -> Result<Vec<CompletionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM completion_log WHERE workspace_id = $1 ORDER BY id");
        sqlx::query_as::<_, CompletionRow>(&query)
            .bind(workspace_id)
            .fetch_all(pool)
            .await
    }

    /// Append one completion record. Runs inside the caller's
    /// transaction.
    pub async fn append(
        conn: &mut PgConnection,
        record: &CompletionRecord,
    ) -> Result<(), sqlx::Error> {
        let t = &record.ticket;
        sqlx::query(
            "INSERT INTO completion_log (workspace_id, ticket_id, dish_id, dish_name, \
                 prep_time_minutes, ingredients, quantity, table_number, is_vip, \
                 requested_allergies, admitted_at, admission_sequence, calculated_start_time, \
                 completed_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(t.workspace_id)
        .bind(t.id)
        .bind(t.dish_id)
        .bind(&t.dish_name)
        .bind(t.prep_time_minutes)
        .bind(&t.ingredients)
        .bind(t.quantity)
        .bind(t.table_number)
        .bind(t.is_vip)
        .bind(&t.requested_allergies)
        .bind(t.admitted_at)
        .bind(t.admission_sequence)
        .bind(t.calculated_start_time)
        .bind(record.completed_at)
        .execute(conn)
        .await
        .map(|_| ())
    }

    /// Remove the record holding `ticket_id` (unique per workspace).
    /// Runs inside the caller's transaction; returns `false` when
    /// nothing matched.
    pub async fn delete_for_ticket(
        conn: &mut PgConnection,
        workspace_id: DbId,
        ticket_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM completion_log WHERE workspace_id = $1 AND ticket_id = $2")
                .bind(workspace_id)
                .bind(ticket_id)
                .execute(conn)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
