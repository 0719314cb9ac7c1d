//! The [`MavMessage`] trait implemented by every generated message type.

use crate::error::Result;

/// A message type generated from a MAVLink dialect.
///
/// Implementations encode their fields in canonical wire order: descending
/// element width, declaration order within a width, extension fields after
/// the base fields. The protocol-version field, if the message has one, is
/// not part of the payload and is filled in by the runtime through
/// [`MavMessage::set_protocol_version`].
///
/// # Example
/// ```ignore
/// let hb = Heartbeat { custom_mode: 4, ..Default::default() };
/// let bytes = hb.to_bytes()?;
/// let back = Heartbeat::decode(&bytes)?;
/// assert_eq!(back, hb);
/// ```
pub trait MavMessage: Sized {
    /// Message id within the dialect.
    const ID: u32;

    /// Message name as declared in the dialect.
    const NAME: &'static str;

    /// CRC-extra byte derived from the message definition.
    const CRC_EXTRA: u8;

    /// Payload length in bytes, extensions included.
    const ENCODED_LEN: usize;

    /// Encodes the message into `buf` and returns the number of bytes written.
    ///
    /// # Errors
    /// Returns `BufferTooShort` if `buf` is smaller than [`Self::ENCODED_LEN`].
    fn encode(&self, buf: &mut [u8]) -> Result<usize>;

    /// Decodes a message from a payload.
    ///
    /// Payloads shorter than [`Self::ENCODED_LEN`] are zero-extended first.
    ///
    /// # Errors
    /// Returns `PayloadTooLong` if the payload exceeds the message length.
    fn decode(payload: &[u8]) -> Result<Self>;

    /// Stores the protocol version reported by the runtime.
    ///
    /// Messages without a protocol-version field ignore the call.
    fn set_protocol_version(&mut self, _version: u8) {}

    /// Encodes the message into a freshly allocated buffer.
    ///
    /// # Errors
    /// Propagates any error from [`MavMessage::encode`].
    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; Self::ENCODED_LEN];
        let len = self.encode(&mut buf)?;
        buf.truncate(len);
        Ok(buf)
    }
}
