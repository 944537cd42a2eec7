//! Extension traits for foreign types.

use error_stack::report;

use crate::errors::{CustomResult, ValidationError};

/// Extensions on [`Option`] for unwrapping required values with a named
/// error instead of a panic.
pub trait OptionExt<T> {
    /// Unwrap the value, or fail with a `MissingRequiredField` naming it.
    fn get_required_value(self, field_name: &str) -> CustomResult<T, ValidationError>;
}

impl<T> OptionExt<T> for Option<T> {
    fn get_required_value(self, field_name: &str) -> CustomResult<T, ValidationError> {
        match self {
            Some(value) => Ok(value),
            None => Err(report!(ValidationError::MissingRequiredField {
                field_name: field_name.to_string(),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_value_present() {
        assert_eq!(Some(7).get_required_value("count").ok(), Some(7));
    }

    #[test]
    fn required_value_absent_names_the_field() {
        let err = None::<u8>.get_required_value("billingid").unwrap_err();
        assert_eq!(
            err.current_context(),
            &ValidationError::MissingRequiredField {
                field_name: "billingid".to_string()
            }
        );
    }
}
