//! The shared engine handle.

use std::sync::Arc;

use brigade_db::Store;

use crate::config::EngineConfig;
use crate::kitchen::KitchenMap;
use crate::mailer::InviteMailer;

/// Shared engine state; the receiver of every operation.
///
/// Cheaply cloneable: inner data is behind `Arc`. One `Engine` is
/// expected per process, handed to whatever transport fronts it.
#[derive(Clone)]
pub struct Engine {
    pub(crate) store: Arc<dyn Store>,
    pub(crate) config: Arc<EngineConfig>,
    pub(crate) kitchens: Arc<KitchenMap>,
    pub(crate) mailer: Option<Arc<InviteMailer>>,
}

impl Engine {
    /// Create an engine over a storage backend.
    pub fn new(store: Arc<dyn Store>, config: EngineConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
            kitchens: Arc::new(KitchenMap::new()),
            mailer: None,
        }
    }

    /// Attach an invitation mailer.
    pub fn with_mailer(self, mailer: InviteMailer) -> Self {
        Self {
            mailer: Some(Arc::new(mailer)),
            ..self
        }
    }
}
