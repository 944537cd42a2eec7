//! Caller-side payment types: processor configuration, the per-call
//! transaction request, and the success payload.

use std::collections::BTreeMap;

use masking::{PeekInterface, Secret};
use serde::{Deserialize, Serialize};

/// Well-known field names used by the CRM billing forms.
///
/// The transaction request is an open field map; these constants cover the
/// fields the processor module itself consumes.
pub mod fields {
    /// Total amount of the contribution, major units, free-form string.
    pub const TOTAL_AMOUNT: &str = "total_amount";
    /// Fallback amount field when `total_amount` is absent or empty.
    pub const AMOUNT: &str = "amount";
    /// Billing first name.
    pub const BILLING_FIRST_NAME: &str = "billing_first_name";
    /// Billing last name.
    pub const BILLING_LAST_NAME: &str = "billing_last_name";
    /// First name as collected on subscription-update forms.
    pub const FIRST_NAME: &str = "first_name";
    /// Last name as collected on subscription-update forms.
    pub const LAST_NAME: &str = "last_name";
    /// Billing street address.
    pub const STREET_ADDRESS: &str = "street_address";
    /// Billing postal code.
    pub const POSTAL_CODE: &str = "postal_code";
    /// Billing country.
    pub const COUNTRY: &str = "country";
    /// Card number.
    pub const CREDIT_CARD_NUMBER: &str = "credit_card_number";
    /// Card verification value.
    pub const CVV2: &str = "cvv2";
    /// Card expiration month (1-12).
    pub const MONTH: &str = "month";
    /// Card expiration year, 2 or 4 digits.
    pub const YEAR: &str = "year";
    /// Invoice identifier the idempotency ticket derives from.
    pub const INVOICE_ID: &str = "invoiceID";
    /// Set to 1 when the contribution is recurring.
    pub const IS_RECUR: &str = "is_recur";
    /// Recurrence unit: day, week, month or year.
    pub const FREQUENCY_UNIT: &str = "frequency_unit";
    /// Recurrence interval; 1 means indefinite in CRM semantics.
    pub const FREQUENCY_INTERVAL: &str = "frequency_interval";
    /// Recurring-contribution record id.
    pub const CONTRIBUTION_RECUR_ID: &str = "contributionRecurID";
    /// Gateway-issued billing id of an existing subscription.
    pub const SUBSCRIPTION_ID: &str = "subscriptionId";
    /// Number of installments for a subscription amount change.
    pub const INSTALLMENTS: &str = "installments";
}

/// Processing mode of a processor instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProcessorMode {
    /// Real charges.
    Live,
    /// Gateway-side demo transactions; no money moves.
    Test,
}

impl ProcessorMode {
    /// Whether this instance performs real charges.
    pub fn is_live(self) -> bool {
        matches!(self, Self::Live)
    }
}

/// Per-processor configuration handed down by the host application.
#[derive(Debug, Clone)]
pub struct PaymentProcessorConfig {
    /// Processor instance name, the registry key.
    pub name: String,
    /// Gateway customer id.
    pub user_name: Secret<String>,
    /// Gateway password.
    pub password: Secret<String>,
}

impl PaymentProcessorConfig {
    /// Both credentials must be present before any transaction is attempted.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.user_name.peek().is_empty() {
            missing.push("Customer ID is not set for this payment processor");
        }
        if self.password.peek().is_empty() {
            missing.push("Password is not set for this payment processor");
        }
        missing
    }
}

/// A single scalar form value.
///
/// The transaction request only carries scalars; composite values are
/// dropped at the boundary rather than propagated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Free-form text.
    Text(String),
    /// Integral value.
    Integer(i64),
    /// Flag value.
    Boolean(bool),
}

impl FieldValue {
    /// Render the value the way the billing form layer stringifies scalars:
    /// booleans become `"1"`/`""`.
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Integer(value) => value.to_string(),
            Self::Boolean(true) => "1".to_string(),
            Self::Boolean(false) => String::new(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// Ephemeral field map built per call from the caller's billing form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionRequest {
    fields: BTreeMap<String, FieldValue>,
}

impl TransactionRequest {
    /// Empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a scalar field.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Copy a loosely typed value in, keeping only scalars.
    ///
    /// Arrays, objects and nulls are silently dropped; returns whether the
    /// value was kept. Non-integral numbers are carried as text.
    pub fn set_json(&mut self, field: impl Into<String>, value: serde_json::Value) -> bool {
        let scalar = match value {
            serde_json::Value::String(text) => FieldValue::Text(text),
            serde_json::Value::Bool(flag) => FieldValue::Boolean(flag),
            serde_json::Value::Number(number) => match number.as_i64() {
                Some(int) => FieldValue::Integer(int),
                None => FieldValue::Text(number.to_string()),
            },
            serde_json::Value::Null | serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                return false
            }
        };
        self.fields.insert(field.into(), scalar);
        true
    }

    /// Raw field lookup.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Stringified field value; empty string when the field is absent.
    pub fn text(&self, field: &str) -> String {
        self.fields.get(field).map(FieldValue::as_text).unwrap_or_default()
    }

    /// Integral view of a field, parsing text values when possible.
    pub fn integer(&self, field: &str) -> Option<i64> {
        match self.fields.get(field)? {
            FieldValue::Integer(value) => Some(*value),
            FieldValue::Text(text) => text.trim().parse().ok(),
            FieldValue::Boolean(flag) => Some(i64::from(*flag)),
        }
    }

    /// Truthiness test matching the form layer's `== 1` convention.
    pub fn is_truthy(&self, field: &str) -> bool {
        self.integer(field) == Some(1)
    }
}

/// Recurrence unit collected on the contribution form.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FrequencyUnit {
    /// Daily billing cycle.
    Day,
    /// Weekly billing cycle.
    Week,
    /// Monthly billing cycle.
    Month,
    /// Yearly billing cycle.
    Year,
}

/// Request-scoped facts about the caller, used by the local guard.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    /// Source address of the request as seen by the web tier.
    pub remote_addr: String,
    /// User-agent header of the request.
    pub user_agent: String,
}

/// Successful payment outcome returned to the CRM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentsResponse {
    /// Gateway transaction id, verbatim.
    pub trxn_id: String,
    /// Charged amount converted back to major currency units.
    pub gross_amount: f64,
    /// Billing id issued on recurring setup, when present.
    pub recurr_profile_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_values_are_dropped() {
        let mut request = TransactionRequest::new();
        assert!(request.set_json("amount", serde_json::json!("10.00")));
        assert!(!request.set_json("billing", serde_json::json!({"zip": "02110"})));
        assert!(!request.set_json("lines", serde_json::json!([1, 2])));
        assert_eq!(request.text("amount"), "10.00");
        assert!(request.get("billing").is_none());
        assert!(request.get("lines").is_none());
    }

    #[test]
    fn absent_fields_read_as_empty_text() {
        let request = TransactionRequest::new();
        assert_eq!(request.text(fields::TOTAL_AMOUNT), "");
    }

    #[test]
    fn truthiness_matches_the_form_convention() {
        let mut request = TransactionRequest::new();
        request.set(fields::IS_RECUR, 1);
        assert!(request.is_truthy(fields::IS_RECUR));
        request.set(fields::IS_RECUR, "1");
        assert!(request.is_truthy(fields::IS_RECUR));
        request.set(fields::IS_RECUR, 0);
        assert!(!request.is_truthy(fields::IS_RECUR));
    }

    #[test]
    fn frequency_unit_parses_form_values() {
        assert_eq!("month".parse::<FrequencyUnit>().ok(), Some(FrequencyUnit::Month));
        assert!("fortnight".parse::<FrequencyUnit>().is_err());
    }

    #[test]
    fn missing_credentials_are_each_reported() {
        let config = PaymentProcessorConfig {
            name: "trustcommerce".to_string(),
            user_name: Secret::new(String::new()),
            password: Secret::new(String::new()),
        };
        assert_eq!(config.missing_credentials().len(), 2);
    }
}
