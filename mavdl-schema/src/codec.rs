//! Reflective payload codec driven by a normalized [`MessageDef`].
//!
//! Generated code is the fast path; this module encodes and decodes any
//! message of a loaded dialect without code generation, which is what the
//! command-line `decode` tool and the round-trip tests need.

use crate::model::{FieldDef, MessageDef};
use crate::types::{FieldType, Primitive};
use mavdl_core::{ReadBuffer, WriteBuffer, pad_payload};
use std::fmt;
use thiserror::Error;

/// Dynamically typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Unsigned integer (also used for `char` and the protocol version).
    Unsigned(u64),
    /// Signed integer.
    Signed(i64),
    /// Floating point value; `float` fields round through `f32`.
    Float(f64),
    /// Bounded string.
    Str(String),
    /// Numeric array.
    Array(Vec<FieldValue>),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsigned(v) => write!(f, "{v}"),
            Self::Signed(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Error type for reflective encoding and decoding.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Payload is longer than the message.
    #[error("payload too long for message {message}: {len} bytes, max {max} bytes")]
    PayloadTooLong {
        /// Message name.
        message: String,
        /// Payload length in bytes.
        len: usize,
        /// Encoded length of the message.
        max: usize,
    },

    /// A value names a field the message does not have.
    #[error("message '{message}' has no field '{field}'")]
    UnknownField {
        /// Message name.
        message: String,
        /// Field name.
        field: String,
    },

    /// A value does not match the field type.
    #[error("value for field '{field}' does not match type {expected}")]
    TypeMismatch {
        /// Field name.
        field: String,
        /// Declared field type.
        expected: FieldType,
    },

    /// A value does not fit the field type.
    #[error("value for field '{field}' is out of range for {expected}")]
    OutOfRange {
        /// Field name.
        field: String,
        /// Declared field type.
        expected: FieldType,
    },
}

/// Encodes `values` into a payload of `message.encoded_len` bytes.
///
/// Fields without a value are encoded as zero. The protocol-version field is
/// never encoded.
///
/// # Errors
/// Returns `UnknownField`, `TypeMismatch` or `OutOfRange`.
pub fn encode_payload(
    message: &MessageDef,
    values: &[(String, FieldValue)],
) -> Result<Vec<u8>, CodecError> {
    let mut buf = vec![0u8; message.encoded_len];

    for (name, value) in values {
        let field = message
            .fields
            .iter()
            .find(|f| &f.name == name)
            .ok_or_else(|| CodecError::UnknownField {
                message: message.name.clone(),
                field: name.clone(),
            })?;
        let Some(offset) = field.offset else {
            continue;
        };
        write_field(&mut buf, offset, field, value)?;
    }

    Ok(buf)
}

/// Decodes a payload into field values in declaration order.
///
/// Short payloads are zero-extended. The protocol-version field is left
/// out.
///
/// # Errors
/// Returns `PayloadTooLong` if the payload exceeds the message length.
pub fn decode_payload(
    message: &MessageDef,
    payload: &[u8],
) -> Result<Vec<(String, FieldValue)>, CodecError> {
    if payload.len() > message.encoded_len {
        return Err(CodecError::PayloadTooLong {
            message: message.name.clone(),
            len: payload.len(),
            max: message.encoded_len,
        });
    }
    let buf = pad_payload(payload, message.encoded_len);
    let buf: &[u8] = &buf;

    Ok(message
        .fields
        .iter()
        .filter_map(|field| {
            field
                .offset
                .map(|offset| (field.name.clone(), read_field(buf, offset, field)))
        })
        .collect())
}

fn write_field(
    buf: &mut [u8],
    offset: usize,
    field: &FieldDef,
    value: &FieldValue,
) -> Result<(), CodecError> {
    match (field.ty, value) {
        (FieldType::Scalar(prim), _) => write_scalar(buf, offset, prim, value, field),
        (FieldType::String(cap), FieldValue::Str(s)) => {
            buf.put_str(offset, s, cap);
            Ok(())
        }
        (FieldType::Array(prim, len), FieldValue::Array(items)) if items.len() <= len => {
            for (i, item) in items.iter().enumerate() {
                write_scalar(buf, offset + i * prim.size(), prim, item, field)?;
            }
            Ok(())
        }
        (FieldType::Array(..), FieldValue::Array(_)) => Err(CodecError::OutOfRange {
            field: field.name.clone(),
            expected: field.ty,
        }),
        _ => Err(mismatch(field)),
    }
}

fn write_scalar(
    buf: &mut [u8],
    offset: usize,
    prim: Primitive,
    value: &FieldValue,
    field: &FieldDef,
) -> Result<(), CodecError> {
    let range = || CodecError::OutOfRange {
        field: field.name.clone(),
        expected: field.ty,
    };
    match prim {
        Primitive::Uint8 | Primitive::Char => {
            buf.put_u8(offset, u8::try_from(unsigned(value, field)?).map_err(|_| range())?)
        }
        Primitive::Uint16 => {
            buf.put_u16_le(offset, u16::try_from(unsigned(value, field)?).map_err(|_| range())?)
        }
        Primitive::Uint32 => {
            buf.put_u32_le(offset, u32::try_from(unsigned(value, field)?).map_err(|_| range())?)
        }
        Primitive::Uint64 => buf.put_u64_le(offset, unsigned(value, field)?),
        Primitive::Int8 => {
            buf.put_i8(offset, i8::try_from(signed(value, field)?).map_err(|_| range())?)
        }
        Primitive::Int16 => {
            buf.put_i16_le(offset, i16::try_from(signed(value, field)?).map_err(|_| range())?)
        }
        Primitive::Int32 => {
            buf.put_i32_le(offset, i32::try_from(signed(value, field)?).map_err(|_| range())?)
        }
        Primitive::Int64 => buf.put_i64_le(offset, signed(value, field)?),
        Primitive::Float => buf.put_f32_le(offset, float(value, field)? as f32),
        Primitive::Double => buf.put_f64_le(offset, float(value, field)?),
    }
    Ok(())
}

fn read_field(buf: &[u8], offset: usize, field: &FieldDef) -> FieldValue {
    match field.ty {
        FieldType::Scalar(prim) => read_scalar(buf, offset, prim),
        FieldType::String(cap) => FieldValue::Str(buf.get_str(offset, cap).into_owned()),
        FieldType::Array(prim, len) => FieldValue::Array(
            (0..len)
                .map(|i| read_scalar(buf, offset + i * prim.size(), prim))
                .collect(),
        ),
        FieldType::ProtocolVersion => FieldValue::Unsigned(u64::from(buf.get_u8(offset))),
    }
}

fn read_scalar(buf: &[u8], offset: usize, prim: Primitive) -> FieldValue {
    match prim {
        Primitive::Uint8 | Primitive::Char => FieldValue::Unsigned(u64::from(buf.get_u8(offset))),
        Primitive::Uint16 => FieldValue::Unsigned(u64::from(buf.get_u16_le(offset))),
        Primitive::Uint32 => FieldValue::Unsigned(u64::from(buf.get_u32_le(offset))),
        Primitive::Uint64 => FieldValue::Unsigned(buf.get_u64_le(offset)),
        Primitive::Int8 => FieldValue::Signed(i64::from(buf.get_i8(offset))),
        Primitive::Int16 => FieldValue::Signed(i64::from(buf.get_i16_le(offset))),
        Primitive::Int32 => FieldValue::Signed(i64::from(buf.get_i32_le(offset))),
        Primitive::Int64 => FieldValue::Signed(buf.get_i64_le(offset)),
        Primitive::Float => FieldValue::Float(f64::from(buf.get_f32_le(offset))),
        Primitive::Double => FieldValue::Float(buf.get_f64_le(offset)),
    }
}

fn mismatch(field: &FieldDef) -> CodecError {
    CodecError::TypeMismatch {
        field: field.name.clone(),
        expected: field.ty,
    }
}

fn unsigned(value: &FieldValue, field: &FieldDef) -> Result<u64, CodecError> {
    match value {
        FieldValue::Unsigned(v) => Ok(*v),
        FieldValue::Signed(v) => u64::try_from(*v).map_err(|_| CodecError::OutOfRange {
            field: field.name.clone(),
            expected: field.ty,
        }),
        _ => Err(mismatch(field)),
    }
}

fn signed(value: &FieldValue, field: &FieldDef) -> Result<i64, CodecError> {
    match value {
        FieldValue::Signed(v) => Ok(*v),
        FieldValue::Unsigned(v) => i64::try_from(*v).map_err(|_| CodecError::OutOfRange {
            field: field.name.clone(),
            expected: field.ty,
        }),
        _ => Err(mismatch(field)),
    }
}

fn float(value: &FieldValue, field: &FieldDef) -> Result<f64, CodecError> {
    match value {
        FieldValue::Float(v) => Ok(*v),
        FieldValue::Unsigned(v) => Ok(*v as f64),
        FieldValue::Signed(v) => Ok(*v as f64),
        _ => Err(mismatch(field)),
    }
}
