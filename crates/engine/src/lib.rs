//! Service layer of the brigade kitchen order engine.
//!
//! Exposes the transport-agnostic operation surface: workspace
//! registration and authentication ([`registry`]), menu management
//! ([`catalog`]), and the order queue with its completion ledger
//! ([`scheduler`]). All operations hang off [`Engine`], a cheaply
//! cloneable handle over a storage backend and the per-workspace
//! concurrency shards.
//!
//! The engine is a pull-based read model: it never pushes updates;
//! clients poll `list_queue` / `list_history`.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
mod kitchen;
pub mod mailer;
pub mod registry;
pub mod scheduler;
mod state;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use mailer::{InviteMailer, MailerConfig};
pub use state::Engine;
