//! # mavdl core
//!
//! Runtime support for message types generated from MAVLink dialects.
//!
//! This crate provides:
//! - Buffer traits for little-endian reads and writes
//! - The [`MavMessage`] trait implemented by generated messages
//! - Error types for encoding and decoding

pub mod buffer;
pub mod error;
pub mod message;

pub use buffer::{ReadBuffer, WriteBuffer, pad_payload, truncate_payload};
pub use error::{Error, Result};
pub use message::MavMessage;
