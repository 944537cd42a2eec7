//! TrustCommerce connector.
//!
//! Speaks the tclink vocabulary: flat string-keyed parameter maps in, flat
//! string-keyed reply maps out. The transport itself (the gateway's native
//! client library) stays behind [`GatewayTransport`]; this module builds the
//! parameter maps, logs them redacted, and narrows the replies.

pub mod constants;
pub mod transformers;

use std::collections::BTreeMap;

use common_utils::errors::CustomResult;
use crm_domain_models::{
    errors::PaymentError,
    gateway::{GatewayReply, GatewayTransport, RawReply},
    payments::{PaymentProcessorConfig, ProcessorMode, TransactionRequest},
};
use error_stack::report;

use transformers::{TclinkRequest, TrustcommerceAuthType};

/// A configured TrustCommerce processor instance.
pub struct Trustcommerce {
    mode: ProcessorMode,
    auth: TrustcommerceAuthType,
    transport: Box<dyn GatewayTransport>,
}

impl std::fmt::Debug for Trustcommerce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trustcommerce")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl Trustcommerce {
    /// Build a processor instance, validating its configuration first.
    pub fn new(
        mode: ProcessorMode,
        config: &PaymentProcessorConfig,
        transport: Box<dyn GatewayTransport>,
    ) -> CustomResult<Self, PaymentError> {
        Self::check_config(config)?;
        Ok(Self {
            mode,
            auth: TrustcommerceAuthType::from(config),
            transport,
        })
    }

    /// Connector identifier, used as the registry key prefix and in logs.
    pub fn id(&self) -> &'static str {
        "trustcommerce"
    }

    /// Processing mode of this instance.
    pub fn mode(&self) -> ProcessorMode {
        self.mode
    }

    /// Validate that the mandatory configuration values are set.
    ///
    /// Surfaced before any transaction is attempted; both credentials are
    /// reported when both are missing.
    pub fn check_config(config: &PaymentProcessorConfig) -> CustomResult<(), PaymentError> {
        let missing = config.missing_credentials();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(report!(PaymentError::PolicyViolation(missing.join(". "))))
        }
    }

    /// Build a one-time sale request from the caller's field map.
    pub fn build_sale_request(&self, request: &TransactionRequest) -> TclinkRequest {
        TclinkRequest::sale(&self.auth, self.mode, request)
    }

    /// Build a billing-details update for an existing subscription.
    pub fn build_billing_update_request(&self, request: &TransactionRequest) -> TclinkRequest {
        TclinkRequest::billing_update(&self.auth, self.mode, request)
    }

    /// Build a subscription cancellation.
    pub fn build_unstore_request(&self, billingid: String) -> TclinkRequest {
        TclinkRequest::unstore(&self.auth, self.mode, billingid)
    }

    /// Build a subscription amount/installments change.
    pub fn build_amount_change_request(&self, request: &TransactionRequest) -> TclinkRequest {
        TclinkRequest::amount_change(&self.auth, self.mode, request)
    }

    /// Dispatch a request to the gateway and narrow the reply.
    ///
    /// Returns `None` when the transport produced no reply at all. The
    /// outbound map and the raw reply are logged in redacted form only.
    pub fn submit(&self, request: &TclinkRequest) -> Option<GatewayReply> {
        tracing::info!(
            connector = self.id(),
            params = ?request.redacted_param_map(),
            "dispatching tclink request"
        );

        match self.transport.send(&request.to_param_map()) {
            Some(raw) => {
                tracing::info!(
                    connector = self.id(),
                    reply = ?redact_raw_map(&raw),
                    "gateway reply received"
                );
                Some(transformers::parse_raw_reply(&raw))
            }
            None => {
                tracing::warn!(connector = self.id(), "no reply from gateway");
                None
            }
        }
    }
}

/// Strip the sensitive fields out of a raw gateway map before logging it.
pub fn redact_raw_map(raw: &RawReply) -> BTreeMap<String, String> {
    raw.iter()
        .filter(|(key, _)| !constants::SENSITIVE_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use masking::Secret;

    use super::*;

    struct NullTransport;

    impl GatewayTransport for NullTransport {
        fn send(&self, _params: &BTreeMap<String, String>) -> Option<RawReply> {
            None
        }
    }

    fn config(user_name: &str, password: &str) -> PaymentProcessorConfig {
        PaymentProcessorConfig {
            name: "trustcommerce".to_string(),
            user_name: Secret::new(user_name.to_string()),
            password: Secret::new(password.to_string()),
        }
    }

    #[test]
    fn missing_credentials_fail_construction() {
        let err = Trustcommerce::new(
            ProcessorMode::Test,
            &config("", "secret"),
            Box::new(NullTransport),
        )
        .err()
        .map(|report| report.current_context().clone());
        assert_eq!(
            err,
            Some(PaymentError::PolicyViolation(
                "Customer ID is not set for this payment processor".to_string()
            ))
        );
    }

    #[test]
    fn both_missing_credentials_are_reported_together() {
        let err = Trustcommerce::check_config(&config("", ""))
            .err()
            .map(|report| report.current_context().clone());
        let Some(PaymentError::PolicyViolation(message)) = err else {
            panic!("expected a policy violation");
        };
        assert!(message.contains("Customer ID"));
        assert!(message.contains("Password"));
    }

    #[test]
    fn no_reply_surfaces_as_none() {
        let processor = Trustcommerce::new(
            ProcessorMode::Test,
            &config("999999", "secret"),
            Box::new(NullTransport),
        )
        .ok();
        let processor = processor.expect("valid config");
        let request = processor.build_sale_request(&TransactionRequest::new());
        assert!(processor.submit(&request).is_none());
    }

    #[test]
    fn raw_map_redaction_drops_sensitive_keys() {
        let mut raw = RawReply::new();
        raw.insert("status".to_string(), "approve".to_string());
        raw.insert("cc".to_string(), "4111111111111111".to_string());
        let redacted = redact_raw_map(&raw);
        assert!(redacted.contains_key("status"));
        assert!(!redacted.contains_key("cc"));
    }
}
