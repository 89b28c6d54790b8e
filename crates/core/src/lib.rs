//! Pure domain logic for the brigade kitchen order engine.
//!
//! This crate has zero internal dependencies so it can be used by the
//! persistence layer, the service layer, and any future CLI tooling:
//!
//! - [`heap::TicketHeap`] — per-workspace priority queue with
//!   arbitrary-id removal (the scheduling core).
//! - [`ledger::CompletionLog`] — append-only completion history with
//!   single-step undo.
//! - [`ingredient`] — ingredient canonicalization and the allergy
//!   substitution resolver.
//! - [`dish`] — dish field validation and prep-time revision.
//! - [`ticket`] — the ticket entity and its priority key.
//! - [`error::CoreError`] — the domain error taxonomy.

pub mod dish;
pub mod error;
pub mod heap;
pub mod ingredient;
pub mod ledger;
pub mod ticket;
pub mod types;

pub use error::CoreError;
pub use heap::TicketHeap;
pub use ledger::{CompletionLog, CompletionRecord};
pub use ticket::{DishSnapshot, PriorityKey, Ticket};
