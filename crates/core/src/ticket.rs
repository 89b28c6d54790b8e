//! The ticket entity, the dish snapshot taken at admission, and the
//! priority key that orders the queue.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::CoreError;
use crate::ingredient::{self, AnnotatedIngredient};
use crate::types::{DbId, Timestamp};

/// The slice of a dish copied into a ticket at admission.
///
/// Later catalog edits never retroactively alter an admitted ticket;
/// this snapshot is what the ticket keeps. The substitution map is part
/// of the snapshot only for annotation at admission time — it is not
/// persisted with the ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DishSnapshot {
    pub name: String,
    pub prep_time_minutes: i32,
    pub ingredients: Vec<String>,
    pub substitutions: BTreeMap<String, String>,
}

impl DishSnapshot {
    /// Annotate this snapshot's ingredients against a requested-allergy
    /// set. Pure; delegates to [`ingredient::annotate`].
    pub fn annotate(&self, allergies: &[String]) -> Vec<AnnotatedIngredient> {
        ingredient::annotate(&self.ingredients, &self.substitutions, allergies)
    }
}

/// One kitchen order instance.
///
/// Constructed only by admission; a ticket is Queued while it lives in
/// the workspace heap and Completed while it lives in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ticket {
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
    /// Per-workspace monotonic admission counter; the deterministic
    /// tie-break.
    pub admission_sequence: i64,
    /// Expected ready time, fixed at admission. Never changes except by
    /// being restored verbatim on undo.
    pub calculated_start_time: Timestamp,
}

impl Ticket {
    /// The heap key for this ticket.
    pub fn priority_key(&self) -> PriorityKey {
        PriorityKey::new(
            self.is_vip,
            self.calculated_start_time,
            self.admission_sequence,
        )
    }
}

/// Lexicographic queue ordering: VIP class, then deadline, then
/// admission order.
///
/// The derived `Ord` compares fields top to bottom, so every VIP ticket
/// ranks ahead of every non-VIP ticket regardless of deadline, and ties
/// within a class resolve deterministically by admission sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PriorityKey {
    /// 0 for VIP, 1 otherwise.
    class: u8,
    start_time: Timestamp,
    sequence: i64,
}

impl PriorityKey {
    pub fn new(is_vip: bool, start_time: Timestamp, sequence: i64) -> Self {
        Self {
            class: if is_vip { 0 } else { 1 },
            start_time,
            sequence,
        }
    }
}

/// Validate the caller-supplied admission fields.
pub fn validate_admission(quantity: i32, table_number: i32) -> Result<(), CoreError> {
    if quantity <= 0 {
        return Err(CoreError::Validation(
            "Quantity must be a positive number".to_string(),
        ));
    }
    if table_number <= 0 {
        return Err(CoreError::Validation(
            "Table number must be a positive number".to_string(),
        ));
    }
    Ok(())
}
