//! Error types and conversions for the core flows.

use common_utils::errors::CustomResult;
use error_stack::ResultExt;

pub use crm_domain_models::errors::{PaymentError, StorageError};

/// Result type of every caller-facing flow.
pub type PaymentResponse<T> = CustomResult<T, PaymentError>;

/// Extension for folding storage failures into the caller-facing taxonomy.
pub trait StorageErrorExt<T> {
    /// Storage failures surface as code 9001 with a generic message; the
    /// underlying cause stays attached to the report for the logs.
    fn to_payment_failed_response(self) -> CustomResult<T, PaymentError>;
}

impl<T> StorageErrorExt<T> for CustomResult<T, StorageError> {
    fn to_payment_failed_response(self) -> CustomResult<T, PaymentError> {
        self.change_context(PaymentError::PolicyViolation(
            "Unable to complete the transaction due to an internal error. Please contact the \
             site administrator."
                .to_string(),
        ))
    }
}
