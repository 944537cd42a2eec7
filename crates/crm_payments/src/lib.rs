//! Core payment module of the CRM.
//!
//! Orchestrates one synchronous transaction per invocation: field mapping
//! through the connector, the local guard and duplicate checks, the opaque
//! gateway call, and reply classification back into the CRM error
//! contract.

pub mod core;
pub mod db;
pub mod registry;

use std::sync::Arc;

use crate::core::payments::{guard::GuardConfig, PaymentParamsHook};

/// Per-process state threaded through the payment flows.
///
/// Carries the storage collaborator, the registered parameter hooks, and
/// the guard configuration. Everything request-scoped stays on the stack of
/// the flow functions; this struct holds only process-lifetime wiring.
pub struct SessionState {
    /// Storage collaborator for contributions and blacklist tables.
    pub store: Arc<dyn db::StorageInterface>,
    /// Extension points run after the gateway parameter map is built.
    pub hooks: Vec<Arc<dyn PaymentParamsHook>>,
    /// Local guard configuration.
    pub guard: GuardConfig,
}

impl SessionState {
    /// State with no hooks and the default guard configuration.
    pub fn new(store: Arc<dyn db::StorageInterface>) -> Self {
        Self {
            store,
            hooks: Vec::new(),
            guard: GuardConfig::default(),
        }
    }

    /// Register a parameter hook.
    pub fn with_hook(mut self, hook: Arc<dyn PaymentParamsHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Override the guard configuration.
    pub fn with_guard(mut self, guard: GuardConfig) -> Self {
        self.guard = guard;
        self
    }
}
