//! Gateway-side types: the opaque transport seam and the typed reply.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The flat string-keyed map the native gateway client consumes and
/// produces.
pub type RawReply = BTreeMap<String, String>;

/// The opaque request/response call into the gateway's client library.
///
/// `None` means the transport could not even connect and produced no reply
/// at all, which is a distinct case from a reply with an error status.
/// The call blocks the invoking thread; the module processes one
/// transaction per invocation by design.
pub trait GatewayTransport: Send + Sync {
    /// Submit the parameter map and collect the raw reply, if any.
    fn send(&self, params: &BTreeMap<String, String>) -> Option<RawReply>;
}

/// Decline sub-reason reported by the gateway.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeclineType {
    /// Plain decline.
    Decline,
    /// Address verification failed.
    Avs,
    /// CVV check failed.
    Cvv,
    /// Issuer requests a call.
    Call,
    /// Card past its expiration date.
    ExpiredCard,
    /// Malformed or unusable card.
    CardError,
    /// Authorization expired before capture.
    AuthExpired,
    /// Gateway-side fraud screen.
    Fraud,
    /// Gateway-side blacklist.
    Blacklist,
    /// Velocity limit exceeded.
    Velocity,
}

/// A gateway reply narrowed to the statuses the module understands.
///
/// Modeling the reply as a tagged variant keeps the classifier's mapping
/// exhaustive instead of a string-keyed lookup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GatewayReply {
    /// Transaction authorized.
    Approved {
        /// Gateway transaction id.
        transid: Option<String>,
        /// Billing id issued on `store` actions.
        billingid: Option<String>,
    },
    /// Store/unstore action accepted.
    Accepted {
        /// Gateway transaction id.
        transid: Option<String>,
        /// Billing id issued on `store` actions.
        billingid: Option<String>,
    },
    /// Card declined.
    Declined {
        /// Decline sub-reason, when the gateway reported one it knows.
        decline_type: Option<DeclineType>,
    },
    /// Request data rejected before authorization.
    BadData {
        /// Comma-separated names of the offending fields.
        offenders: String,
        /// Free-form error detail, when present.
        error: Option<String>,
    },
    /// Gateway-side processing error.
    Error,
    /// Synthesized locally when the guard blocks the request.
    Blacklisted,
}

/// Success payload extracted from an approved/accepted reply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayApproval {
    /// Gateway transaction id, when the reply carried one.
    pub transid: Option<String>,
    /// Billing id for recurring setup, when the reply carried one.
    pub billingid: Option<String>,
}
