// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Wire primitives: base-128 varints, length-delimited byte strings and tags.
//!
//! Layout of one encoded field occurrence:
//!
//! ```text
//! varint(number << 3 | wire_type) || payload
//!
//! wire_type 0  payload = varint(value)
//! wire_type 2  payload = varint(len) || len raw bytes
//! ```
//!
//! Varints are little-endian groups of 7 bits; every byte except the last has
//! its top bit set. Encoders always emit the minimal form.

use crate::error::CodecError;

/// Longest legal varint encoding of a `u64`.
pub const MAX_VARINT_LEN: usize = 10;

/// Largest field number a tag can carry (29 bits).
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

/// Framing of a field payload on the wire.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    /// Payload is a single varint.
    Varint = 0,
    /// Payload is a varint length followed by that many bytes.
    LengthDelimited = 2,
}

impl WireType {
    /// Numeric wire type code carried in the low three tag bits.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Map a tag's wire type code back to a [`WireType`].
    pub fn from_code(code: u8) -> Result<Self, CodecError> {
        match code {
            0 => Ok(Self::Varint),
            2 => Ok(Self::LengthDelimited),
            other => Err(CodecError::UnsupportedWireType(other)),
        }
    }
}

/// Number of bytes `encode_varint(n)` produces.
#[inline]
pub const fn varint_len(n: u64) -> usize {
    if n == 0 {
        1
    } else {
        (64 - n.leading_zeros() as usize).div_ceil(7)
    }
}

/// Append the minimal varint encoding of `n` to `out`.
// Both casts keep the low seven bits only, after masking or once `n < 0x80`.
#[allow(clippy::cast_possible_truncation)]
pub fn write_varint(out: &mut Vec<u8>, mut n: u64) {
    while n >= 0x80 {
        out.push((n & 0x7f) as u8 | 0x80);
        n >>= 7;
    }
    out.push(n as u8);
}

/// Encode `n` as a minimal varint.
pub fn encode_varint(n: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(varint_len(n));
    write_varint(&mut out, n);
    out
}

/// Narrow a wide integer into the varint domain.
///
/// Fails with [`CodecError::ValueOutOfRange`] for negative values and values
/// above `u64::MAX`.
pub fn varint_from_i128(n: i128) -> Result<u64, CodecError> {
    u64::try_from(n).map_err(|_| CodecError::ValueOutOfRange)
}

/// Decode a varint from the front of `bytes`, returning the value and the
/// number of bytes consumed.
pub fn decode_varint(bytes: &[u8]) -> Result<(u64, usize), CodecError> {
    let mut value = 0u64;
    for (i, &byte) in bytes.iter().enumerate() {
        if i == MAX_VARINT_LEN {
            return Err(CodecError::VarintOverflow);
        }
        let group = u64::from(byte & 0x7f);
        // The tenth group holds bit 63 only.
        if i == MAX_VARINT_LEN - 1 && group > 1 {
            return Err(CodecError::VarintOverflow);
        }
        value |= group << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(CodecError::MalformedVarint)
}

/// Append `varint(len) || bytes` to `out`.
pub fn write_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    write_varint(out, bytes.len() as u64);
    out.extend_from_slice(bytes);
}

/// Encode `bytes` as a length-delimited string.
pub fn encode_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(varint_len(bytes.len() as u64) + bytes.len());
    write_bytes(&mut out, bytes);
    out
}

/// Decode a length-delimited string from the front of `bytes`, returning the
/// payload and the total number of bytes consumed (prefix included).
pub fn decode_bytes(bytes: &[u8]) -> Result<(&[u8], usize), CodecError> {
    let mut reader = Reader::new(bytes);
    let payload = reader.read_len_delimited(usize::MAX)?;
    Ok((payload, reader.position()))
}

/// Build a tag from a field number and wire type.
#[inline]
pub fn make_tag(number: u32, wire_type: WireType) -> u64 {
    (u64::from(number) << 3) | u64::from(wire_type.code())
}

/// Split a raw tag into field number and wire type.
pub fn split_tag(tag: u64) -> Result<(u32, WireType), CodecError> {
    let number = u32::try_from(tag >> 3)
        .ok()
        .filter(|n| (1..=MAX_FIELD_NUMBER).contains(n))
        .ok_or(CodecError::InvalidTag(tag))?;
    let code = u8::try_from(tag & 0x7).map_err(|_| CodecError::InvalidTag(tag))?;
    let wire_type = WireType::from_code(code)?;
    Ok((number, wire_type))
}

/// Append-only writer for tags, varints and length-delimited payloads.
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Create a new writer with a pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Write a varint.
    pub fn write_varint(&mut self, value: u64) {
        write_varint(&mut self.buf, value);
    }

    /// Write the tag for `number` with the given wire type.
    pub fn write_tag(&mut self, number: u32, wire_type: WireType) {
        self.write_varint(make_tag(number, wire_type));
    }

    /// Write a length-prefixed payload.
    pub fn write_len_delimited(&mut self, bytes: &[u8]) {
        write_bytes(&mut self.buf, bytes);
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consume the writer and return the buffer.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over a bounded byte region.
///
/// Nested messages get their own reader over the sub-slice returned by
/// [`Reader::read_len_delimited`], so a nested decode can never run past its
/// parent's length prefix.
#[derive(Debug)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader over the provided byte slice.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Bytes left in the region.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    /// Whether the region is exhausted.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, len: u64, max_len: usize) -> Result<&'a [u8], CodecError> {
        if len > max_len as u64 {
            return Err(CodecError::LengthLimitExceeded {
                len,
                limit: max_len,
            });
        }
        let remaining = self.remaining();
        if len > remaining as u64 {
            return Err(CodecError::TruncatedStream {
                needed: len,
                remaining,
            });
        }
        // `len <= remaining`, so it fits in `usize`.
        let end = self.offset + usize::try_from(len).unwrap_or(remaining);
        let out = &self.bytes[self.offset..end];
        self.offset = end;
        Ok(out)
    }

    /// Read a varint.
    pub fn read_varint(&mut self) -> Result<u64, CodecError> {
        let (value, used) = decode_varint(&self.bytes[self.offset..])?;
        self.offset += used;
        Ok(value)
    }

    /// Read and split a tag.
    pub fn read_tag(&mut self) -> Result<(u32, WireType), CodecError> {
        split_tag(self.read_varint()?)
    }

    /// Read a length-prefixed payload no longer than `max_len`.
    pub fn read_len_delimited(&mut self, max_len: usize) -> Result<&'a [u8], CodecError> {
        let len = self.read_varint()?;
        self.take(len, max_len)
    }

    /// Skip one payload of the given wire type.
    pub fn skip(&mut self, wire_type: WireType, max_len: usize) -> Result<(), CodecError> {
        match wire_type {
            WireType::Varint => self.read_varint().map(drop),
            WireType::LengthDelimited => self.read_len_delimited(max_len).map(drop),
        }
    }
}
