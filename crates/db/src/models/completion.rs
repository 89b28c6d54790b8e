//! Completion-log rows.

use brigade_core::ledger::CompletionRecord;
use brigade_core::ticket::Ticket;
use brigade_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the append-only `completion_log` table. Carries the full
/// ticket snapshot at completion time; the BIGSERIAL `id` is the
/// completion order.
#[derive(Debug, Clone, FromRow)]
pub struct CompletionRow {
    pub id: DbId,
    pub workspace_id: DbId,
    pub ticket_id: DbId,
    pub dish_id: DbId,
    pub dish_name: String,
    pub prep_time_minutes: i32,
    pub ingredients: Vec<String>,
    pub quantity: i32,
    pub table_number: i32,
    pub is_vip: bool,
    pub requested_allergies: Vec<String>,
    pub admitted_at: Timestamp,
    pub admission_sequence: i64,
    pub calculated_start_time: Timestamp,
    pub completed_at: Timestamp,
}

impl From<CompletionRow> for CompletionRecord {
    fn from(row: CompletionRow) -> Self {
        CompletionRecord {
            ticket: Ticket {
                id: row.ticket_id,
                workspace_id: row.workspace_id,
                dish_id: row.dish_id,
                dish_name: row.dish_name,
                prep_time_minutes: row.prep_time_minutes,
                ingredients: row.ingredients,
                quantity: row.quantity,
                table_number: row.table_number,
                is_vip: row.is_vip,
                requested_allergies: row.requested_allergies,
                admitted_at: row.admitted_at,
                admission_sequence: row.admission_sequence,
                calculated_start_time: row.calculated_start_time,
            },
            completed_at: row.completed_at,
        }
    }
}
