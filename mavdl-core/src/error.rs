//! Error types for mavdl runtime operations.

use thiserror::Error;

/// Core error type returned by generated encoders and decoders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Buffer is too short for the requested operation.
    #[error("buffer too short: required {required} bytes, available {available} bytes")]
    BufferTooShort {
        /// Required buffer size in bytes.
        required: usize,
        /// Available buffer size in bytes.
        available: usize,
    },

    /// Payload is longer than the message it claims to be.
    #[error("payload too long for message {message}: {len} bytes, max {max} bytes")]
    PayloadTooLong {
        /// Message name.
        message: &'static str,
        /// Payload length in bytes.
        len: usize,
        /// Encoded length of the message.
        max: usize,
    },

    /// No message with this id exists in the dialect.
    #[error("unknown message id {id}")]
    UnknownMessageId {
        /// Message id that was looked up.
        id: u32,
    },

    /// No message with this name exists in the dialect.
    #[error("unknown message name '{name}'")]
    UnknownMessageName {
        /// Message name that was looked up.
        name: String,
    },

    /// Integer does not correspond to any entry of the enum.
    #[error("invalid value {value} for enum {enum_name}")]
    InvalidEnumValue {
        /// Enum type name.
        enum_name: &'static str,
        /// Value that was rejected.
        value: u64,
    },
}

impl Error {
    /// Fails with [`Error::BufferTooShort`] when `available < required`.
    ///
    /// # Errors
    /// Returns `BufferTooShort` if the buffer cannot hold `required` bytes.
    #[inline]
    pub fn check_len(available: usize, required: usize) -> Result<()> {
        if available < required {
            return Err(Self::BufferTooShort {
                required,
                available,
            });
        }
        Ok(())
    }
}

/// Result type alias for mavdl runtime operations.
pub type Result<T> = std::result::Result<T, Error>;
