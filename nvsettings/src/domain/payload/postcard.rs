//! Serde-backed payloads.

use core::ops::{Deref, DerefMut};

use serde::{Serialize, de::DeserializeOwned};

use super::{Payload, take_mut};
use crate::domain::error::EncodeError;

/// Stores any serde type as a postcard-encoded payload of `N` bytes.
///
/// The encoding is zero-padded to `N`. Values whose encoding is longer than
/// `N` fail to encode with [`EncodeError::Serialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Postcard<T, const N: usize>(pub T);

impl<T, const N: usize> Postcard<T, N> {
    /// Unwrap the inner value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, const N: usize> Deref for Postcard<T, N> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T, const N: usize> DerefMut for Postcard<T, N> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T, const N: usize> Payload for Postcard<T, N>
where
    T: Serialize + DeserializeOwned,
{
    const SIZE: usize = N;

    fn encode(&self, out: &mut [u8]) -> Result<(), EncodeError> {
        let dest = take_mut(out, N)?;
        dest.fill(0);
        ::postcard::to_slice(&self.0, dest).map_err(|_| EncodeError::Serialize)?;
        Ok(())
    }

    fn decode(bytes: &[u8]) -> Option<Self> {
        let raw = bytes.get(..N)?;
        ::postcard::take_from_bytes::<T>(raw)
            .ok()
            .map(|(value, _)| Postcard(value))
    }
}
