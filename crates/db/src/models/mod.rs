//! Row structs and insert payloads.
//!
//! Each submodule contains a `FromRow` entity struct matching the
//! database row and the insert payload the repositories bind from.
//! Credential columns never leave the crate serialized.

pub mod completion;
pub mod dish;
pub mod ticket;
pub mod workspace;

pub use completion::CompletionRow;
pub use dish::{DishRow, NewDish};
pub use ticket::{NewQueuedTicket, QueuedTicketRow};
pub use workspace::{NewWorkspace, WorkspaceRow};
