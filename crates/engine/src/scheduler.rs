//! Queue operations: admission, ordered reads, completion, undo,
//! history.

use brigade_core::dish::revise_prep_estimate;
use brigade_core::ingredient::{normalize_allergies, AnnotatedIngredient};
use brigade_core::ledger::CompletionRecord;
use brigade_core::ticket::{validate_admission, DishSnapshot, Ticket};
use brigade_core::types::DbId;
use brigade_core::CoreError;
use brigade_db::models::ticket::NewQueuedTicket;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::state::Engine;

/// Request body for ticket admission.
#[derive(Debug, Clone, Deserialize)]
pub struct AdmitTicketRequest {
    pub workspace_id: DbId,
    pub dish_id: DbId,
    pub quantity: i32,
    pub table_number: i32,
    #[serde(default)]
    pub is_vip: bool,
    #[serde(default)]
    pub allergies: Vec<String>,
}

/// An admitted ticket with its resolver-annotated ingredients, for
/// display.
#[derive(Debug, Clone, Serialize)]
pub struct AdmittedTicket {
    pub ticket: Ticket,
    pub ingredients: Vec<AnnotatedIngredient>,
}

impl Engine {
    /// Admit a ticket into the workspace queue.
    ///
    /// Snapshots the dish so later catalog edits never retroactively
    /// alter this ticket, stamps the deadline
    /// (`admitted_at + prep_time`), and inserts under the VIP-first
    /// priority key.
    pub async fn admit_ticket(&self, request: AdmitTicketRequest) -> EngineResult<AdmittedTicket> {
        // 1. Field validation.
        validate_admission(request.quantity, request.table_number)?;

        // 2. Snapshot the dish; an unknown dish is a validation
        //    failure, not a not-found, because the id arrived in the
        //    request body.
        let dish = self
            .store
            .find_dish(request.workspace_id, request.dish_id)
            .await?
            .ok_or_else(|| {
                CoreError::Validation(format!("Unknown dish id {}", request.dish_id))
            })?;
        let snapshot = DishSnapshot {
            name: dish.name.clone(),
            prep_time_minutes: dish.prep_time_minutes,
            ingredients: dish.ingredients.clone(),
            substitutions: dish.substitutions().clone(),
        };
        let allergies = normalize_allergies(&request.allergies, &snapshot.ingredients);

        // 3. Serialize against other mutations of this workspace.
        let kitchen = self.kitchens.get(self.store.as_ref(), request.workspace_id).await?;
        let _mutation = kitchen.mutation.lock().await;

        let sequence = kitchen.state.read().await.next_sequence;
        let admitted_at = Utc::now();
        let calculated_start_time =
            admitted_at + Duration::minutes(i64::from(snapshot.prep_time_minutes));

        // 4. Persist the row first; the heap only learns about tickets
        //    that are durable.
        let row = self
            .store
            .insert_queued_ticket(&NewQueuedTicket {
                workspace_id: request.workspace_id,
                dish_id: request.dish_id,
                dish_name: snapshot.name.clone(),
                prep_time_minutes: snapshot.prep_time_minutes,
                ingredients: snapshot.ingredients.clone(),
                quantity: request.quantity,
                table_number: request.table_number,
                is_vip: request.is_vip,
                requested_allergies: allergies.clone(),
                admitted_at,
                admission_sequence: sequence,
                calculated_start_time,
            })
            .await?;
        let ticket: Ticket = row.into();

        // 5. In-memory step, under the write lock only.
        {
            let mut state = kitchen.state.write().await;
            state.heap.insert(ticket.clone())?;
            state.next_sequence = sequence + 1;
        }
        tracing::info!(
            workspace_id = request.workspace_id,
            ticket_id = ticket.id,
            dish = %ticket.dish_name,
            is_vip = ticket.is_vip,
            "ticket admitted"
        );

        let ingredients = snapshot.annotate(&allergies);
        Ok(AdmittedTicket {
            ticket,
            ingredients,
        })
    }

    /// The full queue in ascending priority order. Non-destructive and
    /// repeatable; runs concurrently with other reads.
    pub async fn list_queue(&self, workspace_id: DbId) -> EngineResult<Vec<Ticket>> {
        let kitchen = self.kitchens.get(self.store.as_ref(), workspace_id).await?;
        let state = kitchen.state.read().await;
        Ok(state.heap.ordered())
    }

    /// Complete a ticket by id — any ticket, not just the head.
    ///
    /// Moves it from the queue into the completion ledger. A second
    /// call for the same id answers `NotFound`; completion is never
    /// accidentally retryable.
    pub async fn complete_ticket(
        &self,
        workspace_id: DbId,
        ticket_id: DbId,
    ) -> EngineResult<Ticket> {
        let kitchen = self.kitchens.get(self.store.as_ref(), workspace_id).await?;
        let _mutation = kitchen.mutation.lock().await;

        // 1. The ticket must currently be queued in this workspace.
        let ticket = kitchen
            .state
            .read()
            .await
            .heap
            .get(ticket_id)
            .cloned()
            .ok_or(CoreError::NotFound {
                entity: "Ticket",
                id: ticket_id,
            })?;

        // 2. Persist the move; on failure nothing changed in memory.
        let record = CompletionRecord {
            ticket: ticket.clone(),
            completed_at: Utc::now(),
        };
        self.store.record_completion(&record).await?;

        // 3. In-memory step.
        {
            let mut state = kitchen.state.write().await;
            state.heap.remove(ticket_id);
            state.ledger.append(record.clone());
        }
        tracing::info!(
            workspace_id,
            ticket_id,
            dish = %ticket.dish_name,
            "ticket completed"
        );

        // 4. Adaptive prep revision — touches only the dish, never any
        //    ticket, and never fails the completion.
        if self.config.adaptive_prep {
            self.revise_dish_prep(&record).await;
        }

        Ok(ticket)
    }

    /// Undo the most recent completion, restoring the ticket exactly as
    /// it left — same deadline, same admission sequence.
    pub async fn undo_last(&self, workspace_id: DbId) -> EngineResult<Ticket> {
        let kitchen = self.kitchens.get(self.store.as_ref(), workspace_id).await?;
        let _mutation = kitchen.mutation.lock().await;

        let record = kitchen
            .state
            .read()
            .await
            .ledger
            .last()
            .cloned()
            .ok_or_else(|| CoreError::Conflict("Completion history is empty".to_string()))?;

        self.store.revert_completion(&record).await?;

        {
            let mut state = kitchen.state.write().await;
            state.ledger.pop_last();
            state.heap.insert(record.ticket.clone())?;
        }
        tracing::info!(
            workspace_id,
            ticket_id = record.ticket.id,
            dish = %record.ticket.dish_name,
            "completion undone"
        );
        Ok(record.ticket)
    }

    /// Completion history, ascending completion order.
    pub async fn list_history(&self, workspace_id: DbId) -> EngineResult<Vec<CompletionRecord>> {
        let kitchen = self.kitchens.get(self.store.as_ref(), workspace_id).await?;
        let state = kitchen.state.read().await;
        Ok(state.ledger.records().to_vec())
    }

    /// Blend the observed fulfillment time into the dish's prep
    /// estimate. Failures are logged; a deleted dish skips silently.
    ///
    /// The blend starts from the dish's current estimate, not the
    /// ticket snapshot, so concurrent completions of the same dish
    /// compound rather than overwrite each other.
    async fn revise_dish_prep(&self, record: &CompletionRecord) {
        let ticket = &record.ticket;
        let observed = (record.completed_at - ticket.admitted_at).num_minutes();
        let dish = match self
            .store
            .find_dish(ticket.workspace_id, ticket.dish_id)
            .await
        {
            Ok(Some(dish)) => dish,
            Ok(None) => {
                tracing::debug!(
                    workspace_id = ticket.workspace_id,
                    dish_id = ticket.dish_id,
                    "dish gone; prep revision skipped"
                );
                return;
            }
            Err(e) => {
                tracing::warn!(
                    workspace_id = ticket.workspace_id,
                    dish_id = ticket.dish_id,
                    error = %e,
                    "prep revision read failed"
                );
                return;
            }
        };
        let Some(revised) = revise_prep_estimate(dish.prep_time_minutes, observed) else {
            return;
        };
        if revised == dish.prep_time_minutes {
            return;
        }
        match self
            .store
            .set_dish_prep_time(ticket.workspace_id, ticket.dish_id, revised)
            .await
        {
            Ok(true) => tracing::info!(
                workspace_id = ticket.workspace_id,
                dish_id = ticket.dish_id,
                observed_minutes = observed,
                revised_minutes = revised,
                "prep estimate revised"
            ),
            Ok(false) => tracing::debug!(
                workspace_id = ticket.workspace_id,
                dish_id = ticket.dish_id,
                "dish gone; prep revision skipped"
            ),
            Err(e) => tracing::warn!(
                workspace_id = ticket.workspace_id,
                dish_id = ticket.dish_id,
                error = %e,
                "prep revision write failed"
            ),
        }
    }
}
