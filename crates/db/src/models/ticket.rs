//! Queued-ticket rows.

use brigade_core::ticket::Ticket;
use brigade_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `queued_tickets` table. One row per Queued ticket;
/// the workspace heap is rebuilt from these rows on load.
#[derive(Debug, Clone, FromRow)]
pub struct QueuedTicketRow {
    pub id: DbId,
    pub workspace_id: DbId,
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
}

impl From<QueuedTicketRow> for Ticket {
    fn from(row: QueuedTicketRow) -> Self {
        Ticket {
            id: row.id,
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
        }
    }
}

impl From<&Ticket> for QueuedTicketRow {
    fn from(ticket: &Ticket) -> Self {
        QueuedTicketRow {
            id: ticket.id,
            workspace_id: ticket.workspace_id,
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
        }
    }
}

/// Insert payload for admission; the row id is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewQueuedTicket {
    pub workspace_id: DbId,
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
}
