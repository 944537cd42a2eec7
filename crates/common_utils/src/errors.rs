//! Errors and error specific types for universal use.

/// Custom Result, a wrapper around the [`error_stack::Result`] type alias.
pub type CustomResult<T, E> = error_stack::Result<T, E>;

/// Validation errors raised while inspecting caller-supplied values.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was absent from the request.
    #[error("Missing required field: {field_name}")]
    MissingRequiredField {
        /// Name of the missing field.
        field_name: String,
    },
    /// A field value did not match its expected format.
    #[error("Incorrect value provided for field: {field_name}")]
    IncorrectValueProvided {
        /// Name of the offending field.
        field_name: String,
    },
}
