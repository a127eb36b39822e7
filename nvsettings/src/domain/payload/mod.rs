//! Typed payloads.
//!
//! A settings object is bound to one fixed-size, plain-data type at compile
//! time through the [`Payload`] trait. Implementations exist for the
//! primitive integer, float and bool types and for byte arrays; structs are
//! composed field by field with [`PayloadWriter`] and [`PayloadReader`].
//!
//! All multi-byte values are little-endian.

mod cursor;
mod fixed_str;
#[cfg(feature = "postcard")]
mod postcard;

pub use cursor::{PayloadReader, PayloadWriter};
pub use fixed_str::FixedStr;
#[cfg(feature = "postcard")]
pub use self::postcard::Postcard;

use crate::domain::error::EncodeError;

/// A fixed-size value that can be stored as a record payload.
///
/// `SIZE` must not depend on the value: every value of the type encodes to
/// exactly `SIZE` bytes. Change the schema version whenever `SIZE` or the
/// field layout changes.
///
/// # Examples
///
/// ```
/// use nvsettings::domain::{EncodeError, Payload, PayloadReader, PayloadWriter};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Display {
///     brightness: u8,
///     contrast: u8,
///     timeout_s: u16,
/// }
///
/// impl Payload for Display {
///     const SIZE: usize = 4;
///
///     fn encode(&self, out: &mut [u8]) -> Result<(), EncodeError> {
///         let mut w = PayloadWriter::new(out);
///         w.put(&self.brightness)?;
///         w.put(&self.contrast)?;
///         w.put(&self.timeout_s)
///     }
///
///     fn decode(bytes: &[u8]) -> Option<Self> {
///         let mut r = PayloadReader::new(bytes);
///         Some(Self { brightness: r.get()?, contrast: r.get()?, timeout_s: r.get()? })
///     }
/// }
///
/// let mut buf = [0u8; 4];
/// Display { brightness: 200, contrast: 50, timeout_s: 30 }.encode(&mut buf).unwrap();
/// assert_eq!(buf, [200, 50, 30, 0]);
/// ```
pub trait Payload: Sized {
    /// Encoded size in bytes.
    const SIZE: usize;

    /// Encode into the first `SIZE` bytes of `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if `out` is shorter than `SIZE` or the value cannot
    /// be represented.
    fn encode(&self, out: &mut [u8]) -> Result<(), EncodeError>;

    /// Decode from the first `SIZE` bytes of `bytes`.
    ///
    /// Returns `None` if the bytes do not form a valid value.
    fn decode(bytes: &[u8]) -> Option<Self>;
}

/// Borrow the first `n` bytes of `out` for writing.
pub(crate) fn take_mut(out: &mut [u8], n: usize) -> Result<&mut [u8], EncodeError> {
    let available = out.len();
    out.get_mut(..n).ok_or(EncodeError::BufferTooSmall {
        needed: n,
        available,
    })
}

macro_rules! impl_le_payload {
    ($($t:ty),* $(,)?) => {
        $(
            impl Payload for $t {
                const SIZE: usize = core::mem::size_of::<$t>();

                fn encode(&self, out: &mut [u8]) -> Result<(), EncodeError> {
                    take_mut(out, Self::SIZE)?.copy_from_slice(&self.to_le_bytes());
                    Ok(())
                }

                fn decode(bytes: &[u8]) -> Option<Self> {
                    let raw = bytes.get(..Self::SIZE)?;
                    Some(<$t>::from_le_bytes(raw.try_into().ok()?))
                }
            }
        )*
    };
}

impl_le_payload!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl Payload for bool {
    const SIZE: usize = 1;

    fn encode(&self, out: &mut [u8]) -> Result<(), EncodeError> {
        take_mut(out, 1)?[0] = u8::from(*self);
        Ok(())
    }

    fn decode(bytes: &[u8]) -> Option<Self> {
        match bytes.first()? {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        }
    }
}

impl<const N: usize> Payload for [u8; N] {
    const SIZE: usize = N;

    fn encode(&self, out: &mut [u8]) -> Result<(), EncodeError> {
        take_mut(out, N)?.copy_from_slice(self);
        Ok(())
    }

    fn decode(bytes: &[u8]) -> Option<Self> {
        bytes.get(..N)?.try_into().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_layout_is_little_endian() {
        let mut buf = [0u8; 4];
        0x1234_5678u32.encode(&mut buf).unwrap();
        assert_eq!(buf, [0x78, 0x56, 0x34, 0x12]);
        assert_eq!(u32::decode(&buf), Some(0x1234_5678));

        (-2i16).encode(&mut buf).unwrap();
        assert_eq!(&buf[..2], &[0xFE, 0xFF]);
    }

    #[test]
    fn test_float_payload() {
        let mut buf = [0u8; 8];
        1.5f32.encode(&mut buf).unwrap();
        assert_eq!(f32::decode(&buf), Some(1.5));
        core::f64::consts::PI.encode(&mut buf).unwrap();
        assert_eq!(f64::decode(&buf), Some(core::f64::consts::PI));
    }

    #[test]
    fn test_bool_rejects_other_bytes() {
        assert_eq!(bool::decode(&[0]), Some(false));
        assert_eq!(bool::decode(&[1]), Some(true));
        assert_eq!(bool::decode(&[0xFF]), None);
        assert_eq!(bool::decode(&[]), None);
    }

    #[test]
    fn test_byte_array_payload() {
        let mut buf = [0u8; 6];
        [1u8, 2, 3].encode(&mut buf).unwrap();
        assert_eq!(&buf[..3], &[1, 2, 3]);
        assert_eq!(<[u8; 3]>::decode(&buf), Some([1, 2, 3]));
        assert_eq!(<[u8; 8]>::decode(&buf), None);
    }

    #[test]
    fn test_encode_into_short_buffer() {
        let mut buf = [0u8; 2];
        assert_eq!(
            7u64.encode(&mut buf),
            Err(EncodeError::BufferTooSmall {
                needed: 8,
                available: 2
            })
        );
    }
}
