//! Processor registry.
//!
//! The host application historically cached one processor object per
//! configured processor name in a hidden global. The registry makes that
//! cache explicit and hands ownership to the host's wiring layer: process
//! lifetime, no eviction, one instance per processor name.

use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use common_utils::errors::CustomResult;
use crm_connectors::connectors::trustcommerce::Trustcommerce;
use crm_domain_models::{
    errors::PaymentError,
    gateway::GatewayTransport,
    payments::{PaymentProcessorConfig, ProcessorMode},
};

/// Registry of configured processor instances, keyed by processor name.
#[derive(Default)]
pub struct ProcessorRegistry {
    processors: RwLock<HashMap<String, Arc<Trustcommerce>>>,
}

impl ProcessorRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an already-registered processor.
    pub fn get(&self, name: &str) -> Option<Arc<Trustcommerce>> {
        self.processors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Fetch the processor for `config.name`, constructing and registering
    /// it on first use. Construction validates the configuration, so a
    /// missing credential surfaces here, before any transaction.
    pub fn get_or_build<F>(
        &self,
        mode: ProcessorMode,
        config: &PaymentProcessorConfig,
        build_transport: F,
    ) -> CustomResult<Arc<Trustcommerce>, PaymentError>
    where
        F: FnOnce() -> Box<dyn GatewayTransport>,
    {
        let mut processors = self
            .processors
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(processor) = processors.get(&config.name) {
            return Ok(Arc::clone(processor));
        }
        let processor = Arc::new(Trustcommerce::new(mode, config, build_transport())?);
        processors.insert(config.name.clone(), Arc::clone(&processor));
        Ok(processor)
    }
}
