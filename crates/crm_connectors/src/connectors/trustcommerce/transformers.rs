use std::collections::BTreeMap;

use common_utils::{errors::CustomResult, types::MinorUnit};
use crm_domain_models::{
    errors::PaymentError,
    gateway::{DeclineType, GatewayApproval, GatewayReply, RawReply},
    payments::{fields, FrequencyUnit, PaymentProcessorConfig, ProcessorMode, TransactionRequest},
};
use error_stack::report;
use masking::{PeekInterface, Secret};

use super::constants;

/// Gateway credentials for a processor instance.
pub struct TrustcommerceAuthType {
    pub(super) custid: Secret<String>,
    pub(super) password: Secret<String>,
}

impl From<&PaymentProcessorConfig> for TrustcommerceAuthType {
    fn from(config: &PaymentProcessorConfig) -> Self {
        Self {
            custid: config.user_name.clone(),
            password: config.password.clone(),
        }
    }
}

/// Action verb of a tclink call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum TclinkAction {
    /// One-time card authorization and capture.
    Sale,
    /// Create or update a stored billing profile.
    Store,
    /// Remove a stored billing profile.
    Unstore,
}

/// Typed form of the flat parameter map the tclink client consumes.
///
/// Sensitive fields stay wrapped in [`Secret`] until [`Self::to_param_map`]
/// hands them to the transport; [`Self::redacted_param_map`] never touches
/// them at all.
#[derive(Debug)]
pub struct TclinkRequest {
    pub custid: Secret<String>,
    pub password: Secret<String>,
    pub action: TclinkAction,
    pub amount: Option<MinorUnit>,
    pub cc: Option<Secret<String>>,
    pub exp: Option<Secret<String>>,
    pub cvv: Option<Secret<String>>,
    pub name: Option<String>,
    pub address1: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    pub ticket: Option<String>,
    pub avs: bool,
    pub demo: bool,
    pub cycle: Option<String>,
    pub payments: Option<u32>,
    pub billingid: Option<String>,
}

impl TclinkRequest {
    fn base(auth: &TrustcommerceAuthType, action: TclinkAction, mode: ProcessorMode) -> Self {
        Self {
            custid: auth.custid.clone(),
            password: auth.password.clone(),
            action,
            amount: None,
            cc: None,
            exp: None,
            cvv: None,
            name: None,
            address1: None,
            zip: None,
            country: None,
            ticket: None,
            avs: false,
            demo: !mode.is_live(),
            cycle: None,
            payments: None,
            billingid: None,
        }
    }

    /// Build a one-time `sale` request from the caller's field map.
    pub fn sale(
        auth: &TrustcommerceAuthType,
        mode: ProcessorMode,
        request: &TransactionRequest,
    ) -> Self {
        let mut raw_amount = request.text(fields::TOTAL_AMOUNT);
        if raw_amount.is_empty() {
            raw_amount = request.text(fields::AMOUNT);
        }

        Self {
            amount: Some(MinorUnit::from_major_unit_str(&raw_amount)),
            cc: Some(Secret::new(request.text(fields::CREDIT_CARD_NUMBER))),
            cvv: Some(Secret::new(request.text(fields::CVV2))),
            exp: Some(format_expiration_date(
                &request.text(fields::MONTH),
                &request.text(fields::YEAR),
            )),
            name: Some(format_billing_name(
                &request.text(fields::BILLING_FIRST_NAME),
                &request.text(fields::BILLING_LAST_NAME),
            )),
            address1: Some(request.text(fields::STREET_ADDRESS)),
            zip: Some(request.text(fields::POSTAL_CODE)),
            country: Some(request.text(fields::COUNTRY)),
            ticket: Some(truncate_ticket(&request.text(fields::INVOICE_ID))),
            avs: true,
            ..Self::base(auth, TclinkAction::Sale, mode)
        }
    }

    /// Extend a sale request with the recurring-billing fields, switching
    /// the action to `store`.
    ///
    /// The cycle step is always 1 (e.g. `1m` bills monthly); a payments
    /// count of 1 means "indefinite" on the CRM side and is translated to
    /// the gateway's 0 sentinel.
    pub fn apply_recurrence(&mut self, unit: FrequencyUnit, payments: Option<u32>) {
        self.cycle = Some(format!("1{}", cycle_code(unit)));
        self.payments = payments.map(|count| if count == 1 { 0 } else { count });
        self.action = TclinkAction::Store;
    }

    /// Build a `store` request updating the billing details of an existing
    /// subscription.
    pub fn billing_update(
        auth: &TrustcommerceAuthType,
        mode: ProcessorMode,
        request: &TransactionRequest,
    ) -> Self {
        Self {
            billingid: Some(request.text(fields::SUBSCRIPTION_ID)),
            avs: true,
            address1: Some(request.text(fields::STREET_ADDRESS)),
            zip: Some(request.text(fields::POSTAL_CODE)),
            name: Some(format_billing_name(
                &request.text(fields::FIRST_NAME),
                &request.text(fields::LAST_NAME),
            )),
            cc: Some(Secret::new(request.text(fields::CREDIT_CARD_NUMBER))),
            cvv: Some(Secret::new(request.text(fields::CVV2))),
            exp: Some(format_expiration_date(
                &request.text(fields::MONTH),
                &request.text(fields::YEAR),
            )),
            amount: Some(MinorUnit::from_major_unit_str(&request.text(fields::AMOUNT))),
            ..Self::base(auth, TclinkAction::Store, mode)
        }
    }

    /// Build an `unstore` request cancelling a subscription.
    pub fn unstore(
        auth: &TrustcommerceAuthType,
        mode: ProcessorMode,
        billingid: String,
    ) -> Self {
        Self {
            billingid: Some(billingid),
            ..Self::base(auth, TclinkAction::Unstore, mode)
        }
    }

    /// Build a `store` request changing the amount or installment count of
    /// an existing subscription.
    pub fn amount_change(
        auth: &TrustcommerceAuthType,
        mode: ProcessorMode,
        request: &TransactionRequest,
    ) -> Self {
        let payments = request
            .integer(fields::INSTALLMENTS)
            .and_then(|count| u32::try_from(count).ok());

        Self {
            billingid: Some(request.text(fields::SUBSCRIPTION_ID)),
            payments: payments.map(|count| if count == 1 { 0 } else { count }),
            amount: Some(MinorUnit::from_major_unit_str(&request.text(fields::AMOUNT))),
            ..Self::base(auth, TclinkAction::Store, mode)
        }
    }

    fn public_params(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert("action".to_string(), self.action.to_string());
        if let Some(amount) = self.amount {
            params.insert("amount".to_string(), amount.to_string());
        }
        if let Some(name) = &self.name {
            params.insert("name".to_string(), name.clone());
        }
        if let Some(address1) = &self.address1 {
            params.insert("address1".to_string(), address1.clone());
        }
        if let Some(zip) = &self.zip {
            params.insert("zip".to_string(), zip.clone());
        }
        if let Some(country) = &self.country {
            params.insert("country".to_string(), country.clone());
        }
        if let Some(ticket) = &self.ticket {
            params.insert("ticket".to_string(), ticket.clone());
        }
        if self.avs {
            params.insert("avs".to_string(), "y".to_string());
        }
        if self.demo {
            params.insert("demo".to_string(), "y".to_string());
        }
        if let Some(cycle) = &self.cycle {
            params.insert("cycle".to_string(), cycle.clone());
        }
        if let Some(payments) = self.payments {
            params.insert("payments".to_string(), payments.to_string());
        }
        if let Some(billingid) = &self.billingid {
            params.insert("billingid".to_string(), billingid.clone());
        }
        params
    }

    /// The complete flat map handed to the transport, credentials and card
    /// data included.
    pub fn to_param_map(&self) -> BTreeMap<String, String> {
        let mut params = self.public_params();
        params.insert("custid".to_string(), self.custid.peek().clone());
        params.insert("password".to_string(), self.password.peek().clone());
        if let Some(cc) = &self.cc {
            params.insert("cc".to_string(), cc.peek().clone());
        }
        if let Some(exp) = &self.exp {
            params.insert("exp".to_string(), exp.peek().clone());
        }
        if let Some(cvv) = &self.cvv {
            params.insert("cvv".to_string(), cvv.peek().clone());
        }
        params
    }

    /// The loggable view of the request: built without ever reading the
    /// fields named in [`constants::SENSITIVE_FIELDS`].
    pub fn redacted_param_map(&self) -> BTreeMap<String, String> {
        self.public_params()
    }
}

/// Billing name as the gateway expects it; no further sanitization.
fn format_billing_name(first_name: &str, last_name: &str) -> String {
    format!("{first_name} {last_name}")
}

/// Card expiration in the gateway's `MMYY` form.
///
/// The month is zero-padded to two digits; the year contributes its two
/// low-order digits, so both 2-digit and 4-digit year inputs work. The
/// result is always exactly four characters.
fn format_expiration_date(month_raw: &str, year_raw: &str) -> Secret<String> {
    let month = month_raw
        .chars()
        .filter(char::is_ascii_digit)
        .collect::<String>()
        .parse::<u32>()
        .unwrap_or(0)
        % 100;

    let year_digits: String = year_raw.chars().filter(char::is_ascii_digit).collect();
    let year_tail: String = year_digits
        .chars()
        .rev()
        .take(2)
        .collect::<String>()
        .chars()
        .rev()
        .collect();

    Secret::new(format!("{month:02}{year_tail:0>2}"))
}

/// Idempotency ticket derived from the invoice id, capped at the gateway's
/// 20-character limit.
fn truncate_ticket(invoice_id: &str) -> String {
    invoice_id.chars().take(constants::TICKET_MAX_LENGTH).collect()
}

fn cycle_code(unit: FrequencyUnit) -> char {
    match unit {
        FrequencyUnit::Day => 'd',
        FrequencyUnit::Week => 'w',
        FrequencyUnit::Month => 'm',
        FrequencyUnit::Year => 'y',
    }
}

/// Reply statuses the gateway documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
enum TclinkStatus {
    Approve,
    Accepted,
    Decline,
    Baddata,
    Error,
    Blacklisted,
}

/// Narrow a raw reply map into the typed [`GatewayReply`].
///
/// A missing or unrecognized status is treated like a gateway-side error;
/// the classifier turns that into the connectivity failure code.
pub fn parse_raw_reply(raw: &RawReply) -> GatewayReply {
    let status = raw
        .get("status")
        .and_then(|status| status.parse::<TclinkStatus>().ok());

    match status {
        Some(TclinkStatus::Approve) => GatewayReply::Approved {
            transid: raw.get("transid").cloned(),
            billingid: raw.get("billingid").cloned(),
        },
        Some(TclinkStatus::Accepted) => GatewayReply::Accepted {
            transid: raw.get("transid").cloned(),
            billingid: raw.get("billingid").cloned(),
        },
        Some(TclinkStatus::Decline) => GatewayReply::Declined {
            decline_type: raw
                .get("declinetype")
                .and_then(|detail| detail.parse::<DeclineType>().ok()),
        },
        Some(TclinkStatus::Baddata) => GatewayReply::BadData {
            offenders: raw.get("offenders").cloned().unwrap_or_default(),
            error: raw.get("error").cloned(),
        },
        Some(TclinkStatus::Error) => GatewayReply::Error,
        Some(TclinkStatus::Blacklisted) => GatewayReply::Blacklisted,
        None => {
            tracing::warn!(status = ?raw.get("status"), "unrecognized gateway reply status");
            GatewayReply::Error
        }
    }
}

/// Map a typed reply onto the caller-facing outcome.
pub fn classify_reply(reply: &GatewayReply) -> CustomResult<GatewayApproval, PaymentError> {
    match reply {
        GatewayReply::Blacklisted => Err(report!(PaymentError::PolicyViolation(
            constants::ADDRESS_VERIFICATION_DECLINE_MESSAGE.to_string(),
        ))),
        GatewayReply::Approved { transid, billingid }
        | GatewayReply::Accepted { transid, billingid } => Ok(GatewayApproval {
            transid: transid.clone(),
            billingid: billingid.clone(),
        }),
        GatewayReply::Declined {
            decline_type: Some(DeclineType::Avs),
        } => Err(report!(PaymentError::CardDeclined {
            message: constants::ADDRESS_VERIFICATION_DECLINE_MESSAGE.to_string(),
        })),
        GatewayReply::Declined { .. } => Err(report!(PaymentError::CardDeclined {
            message: constants::GENERIC_DECLINE_MESSAGE.to_string(),
        })),
        GatewayReply::BadData { offenders, .. } => Err(report!(PaymentError::InvalidCardData {
            offenders: offenders.clone(),
        })),
        GatewayReply::Error => Err(report!(PaymentError::GatewayUnavailable)),
    }
}

/// Classify a transport outcome: no reply at all is a connectivity failure.
pub fn classify_transport_reply(
    reply: Option<GatewayReply>,
) -> CustomResult<GatewayApproval, PaymentError> {
    match reply {
        Some(reply) => classify_reply(&reply),
        None => Err(report!(PaymentError::GatewayUnavailable)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_auth() -> TrustcommerceAuthType {
        TrustcommerceAuthType {
            custid: Secret::new("999999".to_string()),
            password: Secret::new("s3cret".to_string()),
        }
    }

    fn sale_request(amount: &str) -> TransactionRequest {
        let mut request = TransactionRequest::new();
        request.set(fields::TOTAL_AMOUNT, amount);
        request.set(fields::BILLING_FIRST_NAME, "Ada");
        request.set(fields::BILLING_LAST_NAME, "Lovelace");
        request.set(fields::STREET_ADDRESS, "51 Franklin St");
        request.set(fields::POSTAL_CODE, "02110");
        request.set(fields::COUNTRY, "US");
        request.set(fields::CREDIT_CARD_NUMBER, "4111111111111111");
        request.set(fields::CVV2, "123");
        request.set(fields::MONTH, 7);
        request.set(fields::YEAR, 2027);
        request.set(fields::INVOICE_ID, "f3b9caf12ab4fe89d0817ccba5e186ad");
        request
    }

    #[test]
    fn sale_converts_amount_to_minor_units() {
        let tclink = TclinkRequest::sale(&test_auth(), ProcessorMode::Live, &sale_request("10.00"));
        let params = tclink.to_param_map();
        assert_eq!(params.get("amount").map(String::as_str), Some("1000"));
        assert_eq!(params.get("action").map(String::as_str), Some("sale"));
        assert!(!params.contains_key("demo"));
    }

    #[test]
    fn test_mode_always_sets_the_demo_flag() {
        let tclink = TclinkRequest::sale(&test_auth(), ProcessorMode::Test, &sale_request("5.00"));
        assert_eq!(
            tclink.to_param_map().get("demo").map(String::as_str),
            Some("y")
        );
    }

    #[test]
    fn total_amount_falls_back_to_amount() {
        let mut request = sale_request("");
        request.set(fields::AMOUNT, "2.50");
        let tclink = TclinkRequest::sale(&test_auth(), ProcessorMode::Live, &request);
        assert_eq!(tclink.amount, Some(MinorUnit::new(250)));
    }

    #[test]
    fn expiration_is_always_four_characters() {
        for (month, year, expected) in [
            ("7", "2027", "0727"),
            ("12", "99", "1299"),
            ("1", "5", "0105"),
            ("", "", "0000"),
        ] {
            let exp = format_expiration_date(month, year);
            assert_eq!(exp.peek(), expected);
            assert_eq!(exp.peek().len(), 4);
        }
    }

    #[test]
    fn billing_name_is_a_single_space_concatenation() {
        assert_eq!(format_billing_name("Ada", "Lovelace"), "Ada Lovelace");
    }

    #[test]
    fn ticket_is_truncated_to_twenty_characters() {
        let tclink = TclinkRequest::sale(&test_auth(), ProcessorMode::Live, &sale_request("1.00"));
        assert_eq!(
            tclink.ticket.as_deref(),
            Some("f3b9caf12ab4fe89d081"),
        );
    }

    #[test]
    fn recurrence_maps_units_to_single_step_cycles() {
        for (unit, cycle) in [
            (FrequencyUnit::Day, "1d"),
            (FrequencyUnit::Week, "1w"),
            (FrequencyUnit::Month, "1m"),
            (FrequencyUnit::Year, "1y"),
        ] {
            let mut tclink =
                TclinkRequest::sale(&test_auth(), ProcessorMode::Live, &sale_request("1.00"));
            tclink.apply_recurrence(unit, Some(12));
            assert_eq!(tclink.cycle.as_deref(), Some(cycle));
            assert_eq!(tclink.action, TclinkAction::Store);
        }
    }

    #[test]
    fn indefinite_payments_sentinel_is_translated() {
        let mut tclink =
            TclinkRequest::sale(&test_auth(), ProcessorMode::Live, &sale_request("1.00"));
        tclink.apply_recurrence(FrequencyUnit::Month, Some(1));
        assert_eq!(tclink.payments, Some(0));

        tclink.apply_recurrence(FrequencyUnit::Month, Some(24));
        assert_eq!(tclink.payments, Some(24));
    }

    #[test]
    fn redacted_map_never_contains_sensitive_fields() {
        let tclink = TclinkRequest::sale(&test_auth(), ProcessorMode::Live, &sale_request("9.99"));
        let redacted = tclink.redacted_param_map();
        for field in constants::SENSITIVE_FIELDS {
            assert!(!redacted.contains_key(field), "{field} leaked into the log view");
        }
        assert!(redacted.contains_key("amount"));
        assert!(redacted.contains_key("ticket"));
    }

    #[test]
    fn amount_change_translates_the_installments_sentinel() {
        let mut request = TransactionRequest::new();
        request.set(fields::SUBSCRIPTION_ID, "BILL-77");
        request.set(fields::INSTALLMENTS, 1);
        request.set(fields::AMOUNT, "25.00");
        let tclink = TclinkRequest::amount_change(&test_auth(), ProcessorMode::Live, &request);
        assert_eq!(tclink.payments, Some(0));
        assert_eq!(tclink.amount, Some(MinorUnit::new(2500)));
        assert_eq!(tclink.billingid.as_deref(), Some("BILL-77"));
    }

    #[test]
    fn approve_reply_parses_with_transaction_id() {
        let mut raw = RawReply::new();
        raw.insert("status".to_string(), "approve".to_string());
        raw.insert("transid".to_string(), "025-0009210987".to_string());
        assert_eq!(
            parse_raw_reply(&raw),
            GatewayReply::Approved {
                transid: Some("025-0009210987".to_string()),
                billingid: None,
            }
        );
    }

    #[test]
    fn unknown_status_is_treated_as_gateway_error() {
        let mut raw = RawReply::new();
        raw.insert("status".to_string(), "chargeback".to_string());
        assert_eq!(parse_raw_reply(&raw), GatewayReply::Error);
        assert_eq!(parse_raw_reply(&RawReply::new()), GatewayReply::Error);
    }

    #[test]
    fn classification_matches_the_reply_table() {
        let avs_decline = classify_reply(&GatewayReply::Declined {
            decline_type: Some(DeclineType::Avs),
        })
        .unwrap_err();
        assert_eq!(avs_decline.current_context().error_code(), 9009);
        assert!(avs_decline
            .current_context()
            .to_string()
            .contains("address verification"));

        let generic_decline = classify_reply(&GatewayReply::Declined { decline_type: None })
            .unwrap_err();
        assert_eq!(generic_decline.current_context().error_code(), 9009);
        assert!(generic_decline.current_context().to_string().contains("CVV"));

        let baddata = classify_reply(&GatewayReply::BadData {
            offenders: "cc,exp".to_string(),
            error: None,
        })
        .unwrap_err();
        assert_eq!(baddata.current_context().error_code(), 9011);
        assert!(baddata.current_context().to_string().contains("cc,exp"));

        let blacklisted = classify_reply(&GatewayReply::Blacklisted).unwrap_err();
        assert_eq!(blacklisted.current_context().error_code(), 9001);

        let error = classify_reply(&GatewayReply::Error).unwrap_err();
        assert_eq!(error.current_context().error_code(), 9002);

        let no_reply = classify_transport_reply(None).unwrap_err();
        assert_eq!(no_reply.current_context().error_code(), 9002);
    }
}
