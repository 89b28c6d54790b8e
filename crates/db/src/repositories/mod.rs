//! sqlx query modules, one unit struct per table.

pub mod completion_repo;
pub mod dish_repo;
pub mod ticket_repo;
pub mod workspace_repo;

pub use completion_repo::CompletionRepo;
pub use dish_repo::DishRepo;
pub use ticket_repo::TicketRepo;
pub use workspace_repo::WorkspaceRepo;
