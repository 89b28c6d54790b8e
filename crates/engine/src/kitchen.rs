//! Per-workspace concurrency shards.
//!
//! Each workspace owns one [`Kitchen`]: an async mutation mutex that
//! serializes every mutating operation on the workspace (including its
//! storage writes, establishing the total order), and an inner RwLock
//! guarding the in-memory queue state. The inner lock is held only for
//! the in-memory step of a mutation, so storage I/O never happens
//! inside it and readers never observe a heap mid-swap. Shards for
//! different workspaces never contend.
//!
//! A shard is built lazily on first touch by rebuilding the heap from
//! the persisted queued-ticket rows and the ledger from the completion
//! log. Rows that cannot form a valid queue poison the workspace: it
//! refuses service until repaired, while every other workspace keeps
//! working.

use std::collections::HashMap;
use std::sync::Arc;

use brigade_core::heap::TicketHeap;
use brigade_core::ledger::{CompletionLog, CompletionRecord};
use brigade_core::ticket::Ticket;
use brigade_core::types::DbId;
use brigade_db::Store;
use tokio::sync::{Mutex, RwLock};

use crate::error::{EngineError, EngineResult};

/// In-memory queue state of one workspace.
pub(crate) struct KitchenState {
    pub(crate) heap: TicketHeap,
    pub(crate) ledger: CompletionLog,
    /// Next admission sequence; strictly greater than every sequence in
    /// the heap and the ledger.
    pub(crate) next_sequence: i64,
}

/// One workspace's concurrency shard.
pub(crate) struct Kitchen {
    /// Serializes all mutating operations on this workspace.
    pub(crate) mutation: Mutex<()>,
    /// Guards the queue state. Mutations write-lock only for the
    /// in-memory step; reads take read locks and may run concurrently.
    pub(crate) state: RwLock<KitchenState>,
}

/// A cached shard, or the corruption that prevented building one.
enum Shard {
    Ready(Arc<Kitchen>),
    Poisoned(String),
}

/// Lazily populated map of workspace id → shard.
pub(crate) struct KitchenMap {
    shards: RwLock<HashMap<DbId, Shard>>,
}

impl KitchenMap {
    pub(crate) fn new() -> Self {
        Self {
            shards: RwLock::new(HashMap::new()),
        }
    }

    /// Fetch the shard for a workspace, rebuilding it from the store on
    /// first touch.
    pub(crate) async fn get(
        &self,
        store: &dyn Store,
        workspace_id: DbId,
    ) -> EngineResult<Arc<Kitchen>> {
        {
            let shards = self.shards.read().await;
            match shards.get(&workspace_id) {
                Some(Shard::Ready(kitchen)) => return Ok(kitchen.clone()),
                Some(Shard::Poisoned(msg)) => {
                    return Err(EngineError::CorruptState(msg.clone()))
                }
                None => {}
            }
        }

        // Load outside the map lock; a racing loader for the same
        // workspace reads identical rows, and the first insert wins.
        let loaded = load_state(store, workspace_id).await;

        let mut shards = self.shards.write().await;
        match shards.get(&workspace_id) {
            Some(Shard::Ready(kitchen)) => return Ok(kitchen.clone()),
            Some(Shard::Poisoned(msg)) => return Err(EngineError::CorruptState(msg.clone())),
            None => {}
        }
        match loaded {
            Ok(state) => {
                tracing::info!(
                    workspace_id,
                    queued = state.heap.len(),
                    completed = state.ledger.len(),
                    "workspace queue rebuilt"
                );
                let kitchen = Arc::new(Kitchen {
                    mutation: Mutex::new(()),
                    state: RwLock::new(state),
                });
                shards.insert(workspace_id, Shard::Ready(kitchen.clone()));
                Ok(kitchen)
            }
            Err(EngineError::CorruptState(msg)) => {
                tracing::error!(workspace_id, error = %msg, "refusing to serve workspace");
                shards.insert(workspace_id, Shard::Poisoned(msg.clone()));
                Err(EngineError::CorruptState(msg))
            }
            // Transient failures (e.g. storage) are not cached.
            Err(e) => Err(e),
        }
    }
}

/// Rebuild one workspace's queue state from persisted rows, checking
/// the invariants a valid queue must satisfy.
async fn load_state(store: &dyn Store, workspace_id: DbId) -> EngineResult<KitchenState> {
    let queued_rows = store.load_queued_tickets(workspace_id).await?;
    let completion_rows = store.load_completions(workspace_id).await?;

    let tickets: Vec<Ticket> = queued_rows.into_iter().map(Into::into).collect();
    let heap = TicketHeap::rebuild(tickets)?;

    let records: Vec<CompletionRecord> =
        completion_rows.into_iter().map(Into::into).collect();
    for record in &records {
        if heap.contains(record.ticket.id) {
            return Err(EngineError::CorruptState(format!(
                "ticket {} present in both the queue and the completion log",
                record.ticket.id
            )));
        }
    }
    let ledger = CompletionLog::from_records(records);

    // The counter must clear both live and completed sequences so an
    // undo can never collide with a later admission.
    let max_completed = ledger
        .records()
        .iter()
        .map(|r| r.ticket.admission_sequence)
        .max();
    let next_sequence = heap
        .max_sequence()
        .max(max_completed)
        .map_or(1, |max| max + 1);

    Ok(KitchenState {
        heap,
        ledger,
        next_sequence,
    })
}
