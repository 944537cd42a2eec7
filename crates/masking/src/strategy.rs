use std::{any::type_name, fmt};

/// Debug/Display masking strategy for a secret of type `T`.
pub trait Strategy<T> {
    /// Format the masked representation of `value`.
    fn fmt(value: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

/// Masks the value, printing only its type name.
pub enum WithType {}

impl<T> Strategy<T> for WithType {
    fn fmt(_value: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("*** ")?;
        f.write_str(type_name::<T>())?;
        f.write_str(" ***")
    }
}

/// Masks the value without revealing its type.
pub enum WithoutType {}

impl<T> Strategy<T> for WithoutType {
    fn fmt(_value: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("*** ***")
    }
}
