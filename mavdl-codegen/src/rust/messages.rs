//! Message struct and codec generation.

use super::write_doc;
use crate::error::CodegenError;
use crate::naming::{field_ident, to_pascal_case};
use mavdl_schema::{FieldDef, FieldType, MessageDef, Primitive};
use std::collections::HashSet;

/// Arrays up to this length are emitted as `[T; N]`, longer ones as `Vec<T>`.
pub const MAX_FIXED_ARRAY: usize = 32;

/// Generator for message structs and their `MavMessage` impls.
pub struct MessageGenerator<'a> {
    runtime: &'a str,
    docs: bool,
}

impl<'a> MessageGenerator<'a> {
    /// Creates a new message generator.
    #[must_use]
    pub fn new(runtime: &'a str, docs: bool) -> Self {
        Self { runtime, docs }
    }

    /// Generates the struct and codec of one message.
    ///
    /// # Errors
    /// Returns `Generation` if field names clash once converted.
    pub fn generate(&self, msg: &MessageDef, type_name: &str) -> Result<String, CodegenError> {
        let idents = field_idents(msg)?;
        let mut output = String::new();
        output.push_str(&self.generate_struct(msg, type_name, &idents));
        output.push_str(&self.generate_impl(msg, type_name, &idents));
        Ok(output)
    }

    fn generate_struct(&self, msg: &MessageDef, type_name: &str, idents: &[String]) -> String {
        let mut output = String::new();

        if self.docs {
            match &msg.description {
                Some(text) => write_doc(&mut output, "", text),
                None => output.push_str(&format!("/// {} message.\n", msg.name)),
            }
            output.push_str("///\n");
            output.push_str(&format!(
                "/// Id {}, CRC-extra {}, {} payload bytes.\n",
                msg.id, msg.crc_extra, msg.encoded_len
            ));
            if msg.wip {
                output.push_str("///\n/// Work in progress: the definition may still change.\n");
            }
        }
        output.push_str("#[derive(Debug, Clone, PartialEq, Default)]\n");
        output.push_str(&format!("pub struct {type_name} {{\n"));
        for (field, ident) in msg.fields.iter().zip(idents) {
            if self.docs {
                self.write_field_doc(&mut output, field);
            }
            output.push_str(&format!("    pub {ident}: {},\n", rust_type(field.ty)));
        }
        output.push_str("}\n\n");
        output
    }

    fn write_field_doc(&self, output: &mut String, field: &FieldDef) {
        if let Some(text) = &field.description {
            write_doc(output, "    ", text);
        }
        if let Some(units) = &field.units {
            write_doc(output, "    ", &format!("Units: {units}."));
        }
        if let Some(enum_name) = &field.enum_ref {
            write_doc(
                output,
                "    ",
                &format!("Values from [`{}`].", to_pascal_case(enum_name)),
            );
        }
        if field.is_magic {
            write_doc(
                output,
                "    ",
                "Protocol version, filled in by the runtime and not part of the payload.",
            );
        }
    }

    fn generate_impl(&self, msg: &MessageDef, type_name: &str, idents: &[String]) -> String {
        let rt = self.runtime;
        let mut output = String::new();

        output.push_str(&format!("impl {rt}::MavMessage for {type_name} {{\n"));
        output.push_str(&format!("    const ID: u32 = {};\n", msg.id));
        output.push_str(&format!("    const NAME: &'static str = \"{}\";\n", msg.name));
        output.push_str(&format!("    const CRC_EXTRA: u8 = {};\n", msg.crc_extra));
        output.push_str(&format!(
            "    const ENCODED_LEN: usize = {};\n\n",
            msg.encoded_len
        ));

        output.push_str(&self.generate_encode(msg, idents));
        output.push_str(&self.generate_decode(msg, idents));

        if let Some(idx) = msg.fields.iter().position(|f| f.is_magic) {
            output.push_str("\n    fn set_protocol_version(&mut self, version: u8) {\n");
            output.push_str(&format!("        self.{} = version;\n", idents[idx]));
            output.push_str("    }\n");
        }

        output.push_str("}\n\n");
        output
    }

    /// Generates `encode`, writing fields in wire order.
    fn generate_encode(&self, msg: &MessageDef, idents: &[String]) -> String {
        let rt = self.runtime;
        let mut output = String::new();
        let payload: Vec<usize> = payload_fields(msg).collect();

        output.push_str(&format!(
            "    fn encode(&self, buf: &mut [u8]) -> {rt}::Result<usize> {{\n"
        ));
        if !payload.is_empty() {
            output.push_str(&format!("        use {rt}::WriteBuffer;\n"));
        }
        output.push_str(&format!(
            "        {rt}::Error::check_len(buf.len(), Self::ENCODED_LEN)?;\n"
        ));
        for idx in payload {
            let field = &msg.fields[idx];
            let ident = &idents[idx];
            let Some(offset) = field.offset else {
                continue;
            };
            output.push_str(&encode_field(field.ty, ident, offset));
        }
        output.push_str("        Ok(Self::ENCODED_LEN)\n");
        output.push_str("    }\n\n");
        output
    }

    /// Generates `decode`, reading fields in wire order into a struct
    /// literal laid out in declaration order.
    fn generate_decode(&self, msg: &MessageDef, idents: &[String]) -> String {
        let rt = self.runtime;
        let mut output = String::new();

        output.push_str(&format!(
            "    fn decode(payload: &[u8]) -> {rt}::Result<Self> {{\n"
        ));
        output.push_str("        if payload.len() > Self::ENCODED_LEN {\n");
        output.push_str(&format!(
            "            return Err({rt}::Error::PayloadTooLong {{\n                message: Self::NAME,\n                len: payload.len(),\n                max: Self::ENCODED_LEN,\n            }});\n"
        ));
        output.push_str("        }\n");

        if payload_fields(msg).next().is_none() {
            output.push_str("        Ok(Self::default())\n");
            output.push_str("    }\n");
            return output;
        }

        output.push_str(&format!("        use {rt}::ReadBuffer;\n"));
        output.push_str(&format!(
            "        let buf = {rt}::pad_payload(payload, Self::ENCODED_LEN);\n"
        ));
        output.push_str("        let buf: &[u8] = &buf;\n");
        output.push_str("        Ok(Self {\n");
        for (field, ident) in msg.fields.iter().zip(idents) {
            let value = match field.offset {
                Some(offset) if !field.is_magic => decode_field(field.ty, offset),
                _ => "0".to_string(),
            };
            output.push_str(&format!("            {ident}: {value},\n"));
        }
        output.push_str("        })\n");
        output.push_str("    }\n");
        output
    }
}

/// Indices of the fields that occupy payload bytes, in wire order.
fn payload_fields(msg: &MessageDef) -> impl Iterator<Item = usize> + '_ {
    msg.wire_order
        .iter()
        .copied()
        .filter(|&idx| !msg.fields[idx].is_magic)
}

/// Converts field names to Rust identifiers, rejecting clashes.
fn field_idents(msg: &MessageDef) -> Result<Vec<String>, CodegenError> {
    let mut seen = HashSet::new();
    let mut idents = Vec::with_capacity(msg.fields.len());
    for field in &msg.fields {
        let ident = field_ident(&field.name);
        if !seen.insert(ident.clone()) {
            return Err(CodegenError::generation(format!(
                "field {} of message {} clashes with another field as `{ident}`",
                field.name, msg.name
            )));
        }
        idents.push(ident);
    }
    Ok(idents)
}

/// Returns the Rust type of a field.
///
/// Library types are written with absolute paths, since dialect items share
/// the generated module and may take names like `String` or `Vec`.
#[must_use]
pub fn rust_type(ty: FieldType) -> String {
    match ty {
        FieldType::Scalar(prim) => prim.rust_type().to_string(),
        FieldType::Array(prim, len) if len <= MAX_FIXED_ARRAY => {
            format!("[{}; {len}]", prim.rust_type())
        }
        FieldType::Array(prim, _) => format!("::std::vec::Vec<{}>", prim.rust_type()),
        FieldType::String(_) => "::std::string::String".to_string(),
        FieldType::ProtocolVersion => "u8".to_string(),
    }
}

/// Suffix of the `ReadBuffer`/`WriteBuffer` accessor for a primitive.
const fn accessor(prim: Primitive) -> &'static str {
    match prim {
        Primitive::Uint8 | Primitive::Char => "u8",
        Primitive::Int8 => "i8",
        Primitive::Uint16 => "u16_le",
        Primitive::Int16 => "i16_le",
        Primitive::Uint32 => "u32_le",
        Primitive::Int32 => "i32_le",
        Primitive::Float => "f32_le",
        Primitive::Uint64 => "u64_le",
        Primitive::Int64 => "i64_le",
        Primitive::Double => "f64_le",
    }
}

/// Offset expression of element `i` of an array starting at `offset`.
fn element_offset(offset: usize, size: usize) -> String {
    let index = if size == 1 {
        "i".to_string()
    } else {
        format!("i * {size}")
    };
    if offset == 0 {
        index
    } else {
        format!("{offset} + {index}")
    }
}

fn encode_field(ty: FieldType, ident: &str, offset: usize) -> String {
    match ty {
        FieldType::Scalar(prim) => {
            format!("        buf.put_{}({offset}, self.{ident});\n", accessor(prim))
        }
        FieldType::ProtocolVersion => String::new(),
        FieldType::String(len) => {
            format!("        buf.put_str({offset}, &self.{ident}, {len});\n")
        }
        FieldType::Array(Primitive::Uint8, len) if len <= MAX_FIXED_ARRAY => {
            format!("        buf.put_bytes({offset}, &self.{ident});\n")
        }
        FieldType::Array(prim, len) if len <= MAX_FIXED_ARRAY => format!(
            "        for (i, value) in self.{ident}.iter().enumerate() {{\n            buf.put_{}({}, *value);\n        }}\n",
            accessor(prim),
            element_offset(offset, prim.size())
        ),
        FieldType::Array(prim, len) => format!(
            "        for i in 0..{len} {{\n            buf.put_{}({}, self.{ident}.get(i).copied().unwrap_or_default());\n        }}\n",
            accessor(prim),
            element_offset(offset, prim.size())
        ),
    }
}

fn decode_field(ty: FieldType, offset: usize) -> String {
    match ty {
        FieldType::Scalar(prim) => format!("buf.get_{}({offset})", accessor(prim)),
        FieldType::ProtocolVersion => "0".to_string(),
        FieldType::String(len) => format!("buf.get_str({offset}, {len}).into_owned()"),
        FieldType::Array(Primitive::Uint8, len) if len <= MAX_FIXED_ARRAY => {
            format!("buf.get_array::<{len}>({offset})")
        }
        FieldType::Array(Primitive::Uint8, len) => {
            format!("buf.get_bytes({offset}, {len}).to_vec()")
        }
        FieldType::Array(prim, len) if len <= MAX_FIXED_ARRAY => format!(
            "::core::array::from_fn(|i| buf.get_{}({}))",
            accessor(prim),
            element_offset(offset, prim.size())
        ),
        FieldType::Array(prim, len) => format!(
            "(0..{len}).map(|i| buf.get_{}({})).collect()",
            accessor(prim),
            element_offset(offset, prim.size())
        ),
    }
}
