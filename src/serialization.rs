//! Serialization of fitted parameters.
//!
//! Fitted transformers and the regressor expose their learned state as plain
//! `*Params` structs. Anything that derives serde's traits gets a bincode
//! encoding for free through the blanket impl below; the artifact envelope
//! nests these params rather than re-encoding them by hand.

use std::error::Error;

/// A parameter representation that can be turned into bytes and back.
///
/// Implementors hold only plain numerical data and category labels, never
/// borrowed views into training matrices.
pub trait SerializableParams: Sized {
    /// The error type returned during (de)serialization.
    type Error: Error + Send + Sync + 'static;

    /// Serialize the parameters into a byte buffer.
    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error>;

    /// Deserialize the parameters from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error>;
}

impl<T> SerializableParams for T
where
    T: serde::Serialize + for<'de> serde::Deserialize<'de>,
{
    type Error = bincode::Error;

    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error> {
        bincode::serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        bincode::deserialize(bytes)
    }
}
