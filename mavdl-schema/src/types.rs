//! Field type tokens and their wire properties.
//!
//! The tables in this module are fixed: every token the dialect format knows
//! maps to exactly one [`Primitive`].

use std::fmt;

/// Primitive wire types of the MAVLink dialect format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Unsigned 8-bit integer.
    Uint8,
    /// Signed 8-bit integer.
    Int8,
    /// Single character (1 byte).
    Char,
    /// Unsigned 16-bit integer.
    Uint16,
    /// Signed 16-bit integer.
    Int16,
    /// Unsigned 32-bit integer.
    Uint32,
    /// Signed 32-bit integer.
    Int32,
    /// 32-bit floating point.
    Float,
    /// Unsigned 64-bit integer.
    Uint64,
    /// Signed 64-bit integer.
    Int64,
    /// 64-bit floating point.
    Double,
}

/// Type token of the protocol-version field.
pub const PROTOCOL_VERSION_TOKEN: &str = "uint8_t_mavlink_version";

/// Scalar type tokens accepted in `field type="..."`.
pub const PRIMITIVE_TOKENS: &[(&str, Primitive)] = &[
    ("uint8_t", Primitive::Uint8),
    ("int8_t", Primitive::Int8),
    ("char", Primitive::Char),
    ("uint16_t", Primitive::Uint16),
    ("int16_t", Primitive::Int16),
    ("uint32_t", Primitive::Uint32),
    ("int32_t", Primitive::Int32),
    ("float", Primitive::Float),
    ("uint64_t", Primitive::Uint64),
    ("int64_t", Primitive::Int64),
    ("double", Primitive::Double),
    ("Double", Primitive::Double),
];

impl Primitive {
    /// Looks up a scalar type token.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        PRIMITIVE_TOKENS
            .iter()
            .find(|(t, _)| *t == token)
            .map(|&(_, p)| p)
    }

    /// Returns the size of the primitive in bytes.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::Uint8 | Self::Int8 | Self::Char => 1,
            Self::Uint16 | Self::Int16 => 2,
            Self::Uint32 | Self::Int32 | Self::Float => 4,
            Self::Uint64 | Self::Int64 | Self::Double => 8,
        }
    }

    /// Returns the canonical token, as used in CRC-extra computation.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Uint8 => "uint8_t",
            Self::Int8 => "int8_t",
            Self::Char => "char",
            Self::Uint16 => "uint16_t",
            Self::Int16 => "int16_t",
            Self::Uint32 => "uint32_t",
            Self::Int32 => "int32_t",
            Self::Float => "float",
            Self::Uint64 => "uint64_t",
            Self::Int64 => "int64_t",
            Self::Double => "double",
        }
    }

    /// Returns the Rust type name for this primitive.
    #[must_use]
    pub const fn rust_type(self) -> &'static str {
        match self {
            Self::Uint8 | Self::Char => "u8",
            Self::Int8 => "i8",
            Self::Uint16 => "u16",
            Self::Int16 => "i16",
            Self::Uint32 => "u32",
            Self::Int32 => "i32",
            Self::Float => "f32",
            Self::Uint64 => "u64",
            Self::Int64 => "i64",
            Self::Double => "f64",
        }
    }

    /// Returns true if this is a signed integer type.
    #[must_use]
    pub const fn is_signed(self) -> bool {
        matches!(self, Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64)
    }

    /// Returns true if this is a floating point type.
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Resolved type of a message field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Single primitive value.
    Scalar(Primitive),
    /// Fixed-size array of a numeric primitive.
    Array(Primitive, usize),
    /// `char[N]`: bounded string of at most N bytes.
    String(usize),
    /// Protocol-version field filled in by the runtime.
    ProtocolVersion,
}

/// Why a type token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTokenError {
    /// The element type is not a known primitive.
    Unknown,
    /// The `[N]` suffix is zero, negative or not a number.
    InvalidLength,
}

impl FieldType {
    /// Resolves a type token such as `uint16_t`, `float[4]` or `char[16]`.
    ///
    /// # Errors
    /// Returns `TypeTokenError::Unknown` for unrecognised element types and
    /// `TypeTokenError::InvalidLength` for a malformed array length.
    pub fn parse(token: &str) -> Result<Self, TypeTokenError> {
        let token = token.trim();
        if token == PROTOCOL_VERSION_TOKEN {
            return Ok(Self::ProtocolVersion);
        }

        let Some(open) = token.find('[') else {
            return Primitive::from_token(token)
                .map(Self::Scalar)
                .ok_or(TypeTokenError::Unknown);
        };
        let Some(len_text) = token[open + 1..].strip_suffix(']') else {
            return Err(TypeTokenError::Unknown);
        };
        let element = Primitive::from_token(&token[..open]).ok_or(TypeTokenError::Unknown)?;
        let len = match len_text.trim().parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => return Err(TypeTokenError::InvalidLength),
        };

        Ok(match element {
            Primitive::Char => Self::String(len),
            other => Self::Array(other, len),
        })
    }

    /// Returns the element primitive.
    #[must_use]
    pub const fn primitive(&self) -> Primitive {
        match self {
            Self::Scalar(p) | Self::Array(p, _) => *p,
            Self::String(_) => Primitive::Char,
            Self::ProtocolVersion => Primitive::Uint8,
        }
    }

    /// Returns the width of one element in bytes, the wire-order sort key.
    #[must_use]
    pub const fn element_size(&self) -> usize {
        self.primitive().size()
    }

    /// Returns the number of elements (1 for scalars).
    #[must_use]
    pub const fn array_len(&self) -> Option<usize> {
        match self {
            Self::Array(_, n) | Self::String(n) => Some(*n),
            Self::Scalar(_) | Self::ProtocolVersion => None,
        }
    }

    /// Returns the encoded size of the field in bytes.
    #[must_use]
    pub const fn encoded_len(&self) -> usize {
        match self.array_len() {
            Some(n) => n * self.element_size(),
            None => self.element_size(),
        }
    }

    /// Returns true for the protocol-version field type.
    #[must_use]
    pub const fn is_magic(&self) -> bool {
        matches!(self, Self::ProtocolVersion)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(p) => write!(f, "{p}"),
            Self::Array(p, n) => write!(f, "{p}[{n}]"),
            Self::String(n) => write!(f, "char[{n}]"),
            Self::ProtocolVersion => f.write_str(PROTOCOL_VERSION_TOKEN),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_tokens() {
        assert_eq!(
            FieldType::parse("uint32_t"),
            Ok(FieldType::Scalar(Primitive::Uint32))
        );
        assert_eq!(
            FieldType::parse("Double"),
            Ok(FieldType::Scalar(Primitive::Double))
        );
        assert_eq!(FieldType::parse("uint8_t").map(|t| t.encoded_len()), Ok(1));
    }

    #[test]
    fn test_array_tokens() {
        let ty = FieldType::parse("int16_t[4]").expect("Failed to parse");
        assert_eq!(ty, FieldType::Array(Primitive::Int16, 4));
        assert_eq!(ty.element_size(), 2);
        assert_eq!(ty.encoded_len(), 8);
    }

    #[test]
    fn test_char_array_is_string() {
        let ty = FieldType::parse("char[256]").expect("Failed to parse");
        assert_eq!(ty, FieldType::String(256));
        assert_eq!(ty.encoded_len(), 256);
        assert_eq!(ty.to_string(), "char[256]");
    }

    #[test]
    fn test_protocol_version_token() {
        let ty = FieldType::parse("uint8_t_mavlink_version").expect("Failed to parse");
        assert!(ty.is_magic());
        assert_eq!(ty.primitive(), Primitive::Uint8);
    }

    #[test]
    fn test_invalid_lengths() {
        for token in ["uint8_t[0]", "uint8_t[-1]", "uint8_t[x]", "float[]"] {
            assert_eq!(
                FieldType::parse(token),
                Err(TypeTokenError::InvalidLength),
                "{token}"
            );
        }
    }

    #[test]
    fn test_unknown_tokens() {
        for token in ["uint128_t", "bool[2]", "uint8_t[2", "", "string"] {
            assert_eq!(FieldType::parse(token), Err(TypeTokenError::Unknown), "{token}");
        }
    }
}
