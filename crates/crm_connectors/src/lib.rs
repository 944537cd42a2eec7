//! Connector implementations bridging the CRM payment core to external
//! card-processing gateways.

pub mod connectors;

pub use connectors::Trustcommerce;
