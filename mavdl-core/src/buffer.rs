//! Little-endian buffer access used by generated message codecs.
//!
//! This module provides:
//! - [`ReadBuffer`] trait for read-only payload access
//! - [`WriteBuffer`] trait for writing payloads in place
//! - [`pad_payload`] for zero-extending truncated payloads

use std::borrow::Cow;

/// Trait for read-only buffer access with primitive reads.
///
/// All read methods use little-endian byte order, as MAVLink does. Offsets
/// are trusted: generated decoders pad the payload to the message length
/// before reading.
pub trait ReadBuffer {
    /// Returns the buffer as a byte slice.
    fn as_slice(&self) -> &[u8];

    /// Returns the length of the buffer in bytes.
    fn len(&self) -> usize;

    /// Returns true if the buffer is empty.
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads a u8 at the given offset.
    #[inline(always)]
    fn get_u8(&self, offset: usize) -> u8 {
        self.as_slice()[offset]
    }

    /// Reads an i8 at the given offset.
    #[inline(always)]
    fn get_i8(&self, offset: usize) -> i8 {
        self.as_slice()[offset] as i8
    }

    /// Reads a u16 in little-endian at the given offset.
    #[inline(always)]
    fn get_u16_le(&self, offset: usize) -> u16 {
        u16::from_le_bytes(self.get_array(offset))
    }

    /// Reads an i16 in little-endian at the given offset.
    #[inline(always)]
    fn get_i16_le(&self, offset: usize) -> i16 {
        i16::from_le_bytes(self.get_array(offset))
    }

    /// Reads a u32 in little-endian at the given offset.
    #[inline(always)]
    fn get_u32_le(&self, offset: usize) -> u32 {
        u32::from_le_bytes(self.get_array(offset))
    }

    /// Reads an i32 in little-endian at the given offset.
    #[inline(always)]
    fn get_i32_le(&self, offset: usize) -> i32 {
        i32::from_le_bytes(self.get_array(offset))
    }

    /// Reads a u64 in little-endian at the given offset.
    #[inline(always)]
    fn get_u64_le(&self, offset: usize) -> u64 {
        u64::from_le_bytes(self.get_array(offset))
    }

    /// Reads an i64 in little-endian at the given offset.
    #[inline(always)]
    fn get_i64_le(&self, offset: usize) -> i64 {
        i64::from_le_bytes(self.get_array(offset))
    }

    /// Reads an f32 in little-endian at the given offset.
    #[inline(always)]
    fn get_f32_le(&self, offset: usize) -> f32 {
        f32::from_bits(self.get_u32_le(offset))
    }

    /// Reads an f64 in little-endian at the given offset.
    #[inline(always)]
    fn get_f64_le(&self, offset: usize) -> f64 {
        f64::from_bits(self.get_u64_le(offset))
    }

    /// Copies `N` bytes starting at `offset` into an array.
    #[inline(always)]
    fn get_array<const N: usize>(&self, offset: usize) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.as_slice()[offset..offset + N]);
        out
    }

    /// Returns a slice of bytes at the given offset and length.
    ///
    /// # Arguments
    /// * `offset` - Byte offset to start from
    /// * `len` - Number of bytes to read
    #[inline(always)]
    fn get_bytes(&self, offset: usize, len: usize) -> &[u8] {
        &self.as_slice()[offset..offset + len]
    }

    /// Reads a fixed-capacity character array as a string.
    ///
    /// Stops at the first NUL byte or at `len`, whichever comes first.
    /// Invalid UTF-8 sequences are replaced rather than rejected.
    ///
    /// # Arguments
    /// * `offset` - Byte offset to start from
    /// * `len` - Capacity of the field in bytes
    #[inline]
    fn get_str(&self, offset: usize, len: usize) -> Cow<'_, str> {
        let bytes = self.get_bytes(offset, len);
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(len);
        String::from_utf8_lossy(&bytes[..end])
    }
}

/// Trait for read-write buffer access with primitive writes.
///
/// All write methods use little-endian byte order.
pub trait WriteBuffer: ReadBuffer {
    /// Returns the buffer as a mutable byte slice.
    fn as_mut_slice(&mut self) -> &mut [u8];

    /// Writes a u8 at the given offset.
    #[inline(always)]
    fn put_u8(&mut self, offset: usize, value: u8) {
        self.as_mut_slice()[offset] = value;
    }

    /// Writes an i8 at the given offset.
    #[inline(always)]
    fn put_i8(&mut self, offset: usize, value: i8) {
        self.as_mut_slice()[offset] = value as u8;
    }

    /// Writes a u16 in little-endian at the given offset.
    #[inline(always)]
    fn put_u16_le(&mut self, offset: usize, value: u16) {
        self.put_bytes(offset, &value.to_le_bytes());
    }

    /// Writes an i16 in little-endian at the given offset.
    #[inline(always)]
    fn put_i16_le(&mut self, offset: usize, value: i16) {
        self.put_bytes(offset, &value.to_le_bytes());
    }

    /// Writes a u32 in little-endian at the given offset.
    #[inline(always)]
    fn put_u32_le(&mut self, offset: usize, value: u32) {
        self.put_bytes(offset, &value.to_le_bytes());
    }

    /// Writes an i32 in little-endian at the given offset.
    #[inline(always)]
    fn put_i32_le(&mut self, offset: usize, value: i32) {
        self.put_bytes(offset, &value.to_le_bytes());
    }

    /// Writes a u64 in little-endian at the given offset.
    #[inline(always)]
    fn put_u64_le(&mut self, offset: usize, value: u64) {
        self.put_bytes(offset, &value.to_le_bytes());
    }

    /// Writes an i64 in little-endian at the given offset.
    #[inline(always)]
    fn put_i64_le(&mut self, offset: usize, value: i64) {
        self.put_bytes(offset, &value.to_le_bytes());
    }

    /// Writes an f32 in little-endian at the given offset.
    #[inline(always)]
    fn put_f32_le(&mut self, offset: usize, value: f32) {
        self.put_u32_le(offset, value.to_bits());
    }

    /// Writes an f64 in little-endian at the given offset.
    #[inline(always)]
    fn put_f64_le(&mut self, offset: usize, value: f64) {
        self.put_u64_le(offset, value.to_bits());
    }

    /// Writes a byte slice at the given offset.
    ///
    /// # Arguments
    /// * `offset` - Byte offset to write to
    /// * `src` - Source bytes to copy
    #[inline(always)]
    fn put_bytes(&mut self, offset: usize, src: &[u8]) {
        self.as_mut_slice()[offset..offset + src.len()].copy_from_slice(src);
    }

    /// Writes a string to a fixed-capacity field, padding with NUL bytes.
    ///
    /// Strings longer than `max_len` bytes are truncated.
    ///
    /// # Arguments
    /// * `offset` - Byte offset to write to
    /// * `value` - String value to write
    /// * `max_len` - Field capacity in bytes
    #[inline]
    fn put_str(&mut self, offset: usize, value: &str, max_len: usize) {
        let bytes = value.as_bytes();
        let copy_len = bytes.len().min(max_len);
        self.as_mut_slice()[offset..offset + copy_len].copy_from_slice(&bytes[..copy_len]);
        if copy_len < max_len {
            self.zero(offset + copy_len, max_len - copy_len);
        }
    }

    /// Fills a range with zeros.
    ///
    /// # Arguments
    /// * `offset` - Byte offset to start from
    /// * `len` - Number of bytes to zero
    #[inline]
    fn zero(&mut self, offset: usize, len: usize) {
        self.as_mut_slice()[offset..offset + len].fill(0);
    }
}

impl ReadBuffer for [u8] {
    #[inline(always)]
    fn as_slice(&self) -> &[u8] {
        self
    }

    #[inline(always)]
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }
}

impl WriteBuffer for [u8] {
    #[inline(always)]
    fn as_mut_slice(&mut self) -> &mut [u8] {
        self
    }
}

impl ReadBuffer for Vec<u8> {
    #[inline(always)]
    fn as_slice(&self) -> &[u8] {
        self
    }

    #[inline(always)]
    fn len(&self) -> usize {
        Vec::len(self)
    }
}

impl WriteBuffer for Vec<u8> {
    #[inline(always)]
    fn as_mut_slice(&mut self) -> &mut [u8] {
        self
    }
}

/// Zero-extends a payload to `len` bytes.
///
/// MAVLink 2 senders strip trailing zero bytes from payloads, so a decoder
/// must treat missing bytes as zero. Payloads that are already long enough
/// are borrowed unchanged.
#[must_use]
pub fn pad_payload(payload: &[u8], len: usize) -> Cow<'_, [u8]> {
    if payload.len() >= len {
        Cow::Borrowed(payload)
    } else {
        let mut padded = vec![0u8; len];
        padded[..payload.len()].copy_from_slice(payload);
        Cow::Owned(padded)
    }
}

/// Returns `payload` with its trailing zero bytes removed.
///
/// At least one byte is always kept, as MAVLink 2 requires.
#[must_use]
pub fn truncate_payload(payload: &[u8]) -> &[u8] {
    let end = payload
        .iter()
        .rposition(|&b| b != 0)
        .map_or(1, |last| last + 1);
    &payload[..end.min(payload.len())]
}
