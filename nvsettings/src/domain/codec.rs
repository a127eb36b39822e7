//! Versioned record codec.
//!
//! Every slot holds one record: a fixed header followed by the payload.
//!
//! ```text
//! offset  size  field
//!      0     2  magic           "NV"
//!      2     2  schema_version  u16 LE
//!      4     2  payload_len     u16 LE
//!      6     4  checksum        u32 LE, CRC-32/ISO-HDLC over bytes 0..6 + payload
//!     10     n  payload
//! ```
//!
//! Decoding checks the cheap things first: magic, then bounds, then the
//! checksum, and only then whether the schema matches what the caller expects.
//! The codec never tries to convert between schemas; see
//! [`SettingsManager::load_or_migrate`](crate::domain::SettingsManager::load_or_migrate).

use crate::domain::{
    error::{DecodeError, EncodeError},
    payload::Payload,
    value_objects::SchemaVersion,
};
use crc::{CRC_32_ISO_HDLC, Crc};

/// Magic tag at the start of every record.
pub const RECORD_MAGIC: [u8; 2] = *b"NV";

/// CRC algorithm used for record checksums (ISO HDLC / Ethernet / ZIP).
const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Bytes of the header covered by the checksum.
const CHECKED_HEADER_LEN: usize = 6;

/// Total record size for a payload of `payload_size` bytes.
///
/// # Examples
///
/// ```
/// use nvsettings::domain::{record_len, RecordHeader};
///
/// assert_eq!(record_len(8), RecordHeader::SIZE + 8);
/// ```
#[inline]
pub const fn record_len(payload_size: usize) -> usize {
    RecordHeader::SIZE + payload_size
}

/// Record header.
///
/// The checksum doubles as the identity of a record's content: equal payloads
/// under equal versions always produce equal checksums, which is what the
/// manager uses to skip redundant writes.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Schema version of the payload.
    pub schema_version: SchemaVersion,
    /// Payload length in bytes.
    pub payload_len: u16,
    /// CRC-32 over the first six header bytes and the payload.
    pub checksum: u32,
}

impl RecordHeader {
    /// Size of the header in bytes.
    pub const SIZE: usize = 10;

    /// Total length of the record this header describes.
    #[inline]
    pub const fn record_len(&self) -> usize {
        record_len(self.payload_len as usize)
    }

    /// Serialize the header (little-endian).
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[0..2].copy_from_slice(&RECORD_MAGIC);
        buf[2..4].copy_from_slice(&self.schema_version.value().to_le_bytes());
        buf[4..6].copy_from_slice(&self.payload_len.to_le_bytes());
        buf[6..10].copy_from_slice(&self.checksum.to_le_bytes());
        buf
    }

    /// Parse a header (little-endian).
    ///
    /// # Errors
    ///
    /// `Truncated` if fewer than [`SIZE`](Self::SIZE) bytes are given,
    /// `MissingMagic` if the tag does not match.
    pub fn from_bytes(buf: &[u8]) -> Result<Self, DecodeError> {
        if buf.len() < Self::SIZE {
            return Err(DecodeError::Truncated {
                needed: Self::SIZE,
                available: buf.len(),
            });
        }

        if buf[0..2] != RECORD_MAGIC {
            return Err(DecodeError::MissingMagic);
        }

        Ok(Self {
            schema_version: SchemaVersion::new(u16::from_le_bytes([buf[2], buf[3]])),
            payload_len: u16::from_le_bytes([buf[4], buf[5]]),
            checksum: u32::from_le_bytes([buf[6], buf[7], buf[8], buf[9]]),
        })
    }
}

/// A record that passed the integrity checks but whose payload has not been
/// interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRecord<'a> {
    /// The parsed header.
    pub header: RecordHeader,
    /// The payload bytes.
    pub payload: &'a [u8],
}

/// Compute the checksum of a record's checked header bytes and payload.
pub fn record_checksum(version: SchemaVersion, payload: &[u8]) -> u32 {
    let mut digest = CRC32.digest();
    digest.update(&checked_header(version, payload.len() as u16));
    digest.update(payload);
    digest.finalize()
}

fn checked_header(version: SchemaVersion, payload_len: u16) -> [u8; CHECKED_HEADER_LEN] {
    let mut buf = [0u8; CHECKED_HEADER_LEN];
    buf[0..2].copy_from_slice(&RECORD_MAGIC);
    buf[2..4].copy_from_slice(&version.value().to_le_bytes());
    buf[4..6].copy_from_slice(&payload_len.to_le_bytes());
    buf
}

/// Encode `payload` under `version` into the front of `out`.
///
/// Writes exactly `record_len(P::SIZE)` bytes and returns the header.
///
/// # Errors
///
/// Returns an error if `out` is too small, the payload is too large for the
/// length field, or the payload's own encoder fails.
pub fn encode_record<P: Payload>(
    payload: &P,
    version: SchemaVersion,
    out: &mut [u8],
) -> Result<RecordHeader, EncodeError> {
    let payload_len =
        u16::try_from(P::SIZE).map_err(|_| EncodeError::PayloadTooLarge { size: P::SIZE })?;

    let total = record_len(P::SIZE);
    if out.len() < total {
        return Err(EncodeError::BufferTooSmall {
            needed: total,
            available: out.len(),
        });
    }

    let (head, body) = out[..total].split_at_mut(RecordHeader::SIZE);
    payload.encode(body)?;

    let header = RecordHeader {
        schema_version: version,
        payload_len,
        checksum: record_checksum(version, body),
    };
    head.copy_from_slice(&header.to_bytes());

    Ok(header)
}

/// Validate magic, bounds and checksum of the record at the front of `bytes`.
///
/// # Errors
///
/// `MissingMagic`, `Truncated` or `ChecksumMismatch`.
pub fn inspect_record(bytes: &[u8]) -> Result<RawRecord<'_>, DecodeError> {
    let header = RecordHeader::from_bytes(bytes)?;

    let total = header.record_len();
    if bytes.len() < total {
        return Err(DecodeError::Truncated {
            needed: total,
            available: bytes.len(),
        });
    }

    let payload = &bytes[RecordHeader::SIZE..total];
    let computed = record_checksum(header.schema_version, payload);
    if computed != header.checksum {
        return Err(DecodeError::ChecksumMismatch {
            stored: header.checksum,
            computed,
        });
    }

    Ok(RawRecord { header, payload })
}

/// Decode and fully validate the record at the front of `bytes`.
///
/// # Errors
///
/// Any [`DecodeError`]; see the module docs for the order of checks.
pub fn decode_record<P: Payload>(
    bytes: &[u8],
    expected: SchemaVersion,
) -> Result<(P, RecordHeader), DecodeError> {
    let raw = inspect_record(bytes)?;

    if raw.header.schema_version != expected {
        return Err(DecodeError::VersionMismatch {
            stored: raw.header.schema_version.value(),
            expected: expected.value(),
        });
    }

    if raw.payload.len() != P::SIZE {
        return Err(DecodeError::LengthMismatch {
            stored: raw.header.payload_len,
            expected: P::SIZE,
        });
    }

    let value = P::decode(raw.payload).ok_or(DecodeError::InvalidPayload)?;
    Ok((value, raw.header))
}
