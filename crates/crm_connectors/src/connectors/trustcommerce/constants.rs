/// Parameter keys that must never appear in any logged representation of a
/// gateway parameter or reply map. Every logging call site goes through
/// [`super::redact_raw_map`] or [`super::transformers::TclinkRequest::redacted_param_map`],
/// both of which consume this list.
pub const SENSITIVE_FIELDS: [&str; 5] = ["custid", "password", "cc", "exp", "cvv"];

/// The gateway truncates the idempotency ticket at 20 characters.
pub const TICKET_MAX_LENGTH: usize = 20;

/// Payer-facing message for address-verification declines; also used for
/// the local-policy (blacklist) decline so blocked clients cannot tell the
/// two apart.
pub const ADDRESS_VERIFICATION_DECLINE_MESSAGE: &str =
    "Your transaction was declined for address verification reasons. If your address was \
     correct please contact the site administrator before attempting to retry your transaction.";

/// Payer-facing message for all other declines.
pub const GENERIC_DECLINE_MESSAGE: &str =
    "Your transaction was declined. Please check the correctness of your credit card \
     information, including CC number, expiration date and CVV code.";
