use std::{fmt, marker::PhantomData};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

use crate::{strategy::Strategy, ExposeInterface, PeekInterface, WithType};

/// Wrapper for a secret value.
///
/// The inner value is inaccessible except through [`PeekInterface`] and
/// [`ExposeInterface`]; `Debug` and `Display` emit only the masked form
/// produced by the `MaskingStrategy` type parameter. Serialization passes
/// the inner value through untouched, since serialized forms are what cross
/// the transport boundary.
pub struct Secret<SecretValue, MaskingStrategy = WithType>
where
    MaskingStrategy: Strategy<SecretValue>,
{
    inner_secret: SecretValue,
    masking_strategy: PhantomData<MaskingStrategy>,
}

impl<SecretValue, MaskingStrategy> Secret<SecretValue, MaskingStrategy>
where
    MaskingStrategy: Strategy<SecretValue>,
{
    /// Take ownership of a secret value.
    pub fn new(secret: SecretValue) -> Self {
        Self {
            inner_secret: secret,
            masking_strategy: PhantomData,
        }
    }

    /// Map the inner secret into another secret.
    pub fn map<OtherValue, F>(self, f: F) -> Secret<OtherValue, WithType>
    where
        F: FnOnce(SecretValue) -> OtherValue,
    {
        Secret::new(f(self.inner_secret))
    }
}

impl<SecretValue, MaskingStrategy> PeekInterface<SecretValue>
    for Secret<SecretValue, MaskingStrategy>
where
    MaskingStrategy: Strategy<SecretValue>,
{
    fn peek(&self) -> &SecretValue {
        &self.inner_secret
    }
}

impl<SecretValue, MaskingStrategy> ExposeInterface<SecretValue>
    for Secret<SecretValue, MaskingStrategy>
where
    MaskingStrategy: Strategy<SecretValue>,
{
    fn expose(self) -> SecretValue {
        self.inner_secret
    }
}

impl<SecretValue, MaskingStrategy> From<SecretValue> for Secret<SecretValue, MaskingStrategy>
where
    MaskingStrategy: Strategy<SecretValue>,
{
    fn from(secret: SecretValue) -> Self {
        Self::new(secret)
    }
}

impl<SecretValue, MaskingStrategy> Clone for Secret<SecretValue, MaskingStrategy>
where
    SecretValue: Clone,
    MaskingStrategy: Strategy<SecretValue>,
{
    fn clone(&self) -> Self {
        Self::new(self.inner_secret.clone())
    }
}

impl<SecretValue, MaskingStrategy> Default for Secret<SecretValue, MaskingStrategy>
where
    SecretValue: Default,
    MaskingStrategy: Strategy<SecretValue>,
{
    fn default() -> Self {
        Self::new(SecretValue::default())
    }
}

impl<SecretValue, MaskingStrategy> PartialEq for Secret<SecretValue, MaskingStrategy>
where
    SecretValue: PartialEq,
    MaskingStrategy: Strategy<SecretValue>,
{
    fn eq(&self, other: &Self) -> bool {
        self.peek().eq(other.peek())
    }
}

impl<SecretValue, MaskingStrategy> Eq for Secret<SecretValue, MaskingStrategy>
where
    SecretValue: Eq,
    MaskingStrategy: Strategy<SecretValue>,
{
}

impl<SecretValue, MaskingStrategy> fmt::Debug for Secret<SecretValue, MaskingStrategy>
where
    MaskingStrategy: Strategy<SecretValue>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        MaskingStrategy::fmt(&self.inner_secret, f)
    }
}

impl<SecretValue, MaskingStrategy> fmt::Display for Secret<SecretValue, MaskingStrategy>
where
    MaskingStrategy: Strategy<SecretValue>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        MaskingStrategy::fmt(&self.inner_secret, f)
    }
}

impl<SecretValue, MaskingStrategy> Zeroize for Secret<SecretValue, MaskingStrategy>
where
    SecretValue: Zeroize,
    MaskingStrategy: Strategy<SecretValue>,
{
    fn zeroize(&mut self) {
        self.inner_secret.zeroize()
    }
}

impl<SecretValue, MaskingStrategy> Serialize for Secret<SecretValue, MaskingStrategy>
where
    SecretValue: Serialize,
    MaskingStrategy: Strategy<SecretValue>,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.peek().serialize(serializer)
    }
}

impl<'de, SecretValue, MaskingStrategy> Deserialize<'de> for Secret<SecretValue, MaskingStrategy>
where
    SecretValue: Deserialize<'de>,
    MaskingStrategy: Strategy<SecretValue>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        SecretValue::deserialize(deserializer).map(Self::new)
    }
}
