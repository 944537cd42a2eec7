//! Error taxonomy surfaced to the CRM.
//!
//! Every failure is returned as a value. The numeric codes are part of the
//! caller contract and must stay stable; the message text is shown verbatim
//! to the payer for decline, bad-data and blacklist outcomes.

/// Failure outcome of a payment or subscription operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentError {
    /// Code 9001: module prerequisite missing, misconfiguration, or a
    /// local-policy (blacklist) decline. The message carries the detail.
    #[error("{0}")]
    PolicyViolation(String),

    /// Code 9002: the gateway could not be reached, or reported an
    /// internal error status.
    #[error("Could not initiate connection to payment gateway.")]
    GatewayUnavailable,

    /// Code 9004: a contribution with the same invoice id already exists.
    #[error(
        "It appears that this transaction is a duplicate. Have you already submitted the form \
         once? If so there may have been a connection problem. You can try your transaction \
         again. If you continue to have problems please contact the site administrator."
    )]
    DuplicateTransaction,

    /// Code 9009: the card was declined. The message distinguishes the
    /// address-verification case from the generic one.
    #[error("{message}")]
    CardDeclined {
        /// Payer-facing decline message.
        message: String,
    },

    /// Code 9011: the gateway rejected the card/billing data outright,
    /// naming the offending fields.
    #[error("Invalid credit card information. The following fields were invalid: {offenders}.")]
    InvalidCardData {
        /// Comma-separated field names reported by the gateway.
        offenders: String,
    },
}

impl PaymentError {
    /// Stable numeric error code for the CRM error contract.
    pub const fn error_code(&self) -> u16 {
        match self {
            Self::PolicyViolation(_) => 9001,
            Self::GatewayUnavailable => 9002,
            Self::DuplicateTransaction => 9004,
            Self::CardDeclined { .. } => 9009,
            Self::InvalidCardData { .. } => 9011,
        }
    }
}

/// Errors produced by the storage collaborators.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum StorageError {
    /// The requested record does not exist.
    #[error("Value not found: {0}")]
    ValueNotFound(String),
    /// The underlying store failed.
    #[error("Database error: {0}")]
    DatabaseError(String),
    /// An operation the mock store does not support.
    #[error("Mock storage error: {0}")]
    MockDbError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(PaymentError::PolicyViolation(String::new()).error_code(), 9001);
        assert_eq!(PaymentError::GatewayUnavailable.error_code(), 9002);
        assert_eq!(PaymentError::DuplicateTransaction.error_code(), 9004);
        assert_eq!(
            PaymentError::CardDeclined {
                message: String::new()
            }
            .error_code(),
            9009
        );
        assert_eq!(
            PaymentError::InvalidCardData {
                offenders: String::new()
            }
            .error_code(),
            9011
        );
    }
}
