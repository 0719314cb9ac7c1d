//! Protocol Buffers (proto3) schema generation.
//!
//! Enums keep their dialect names. proto3 requires the first enum value to
//! be zero, so an `<ENUM>_UNDEFINED = 0` entry is added to enums that have
//! no zero entry. Message fields are numbered in declaration order.

use crate::emitter::{Artifact, Emitter};
use crate::error::CodegenError;
use crate::options::CompileOptions;
use mavdl_schema::{EnumDef, FieldDef, FieldType, MessageDef, Primitive};
use std::collections::HashMap;

/// [`Emitter`] for the proto3 target.
pub struct ProtoEmitter {
    package: String,
    docs: bool,
    body: String,
    names: HashMap<String, &'static str>,
}

impl ProtoEmitter {
    /// Creates an emitter writing `package <module>;`.
    #[must_use]
    pub fn new(module: &str, options: &CompileOptions) -> Self {
        Self {
            package: module.to_string(),
            docs: options.docs,
            body: String::new(),
            names: HashMap::new(),
        }
    }

    fn claim_name(&mut self, name: &str, kind: &'static str) -> Result<(), CodegenError> {
        if let Some(first) = self.names.insert(name.to_string(), kind) {
            return Err(CodegenError::generation(format!(
                "{kind} {name} clashes with {first} {name} in package {}",
                self.package
            )));
        }
        Ok(())
    }

    fn comment(&mut self, indent: &str, text: &str) {
        if !self.docs {
            return;
        }
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            self.body.push_str(&format!("{indent}// {line}\n"));
        }
    }
}

impl Emitter for ProtoEmitter {
    fn emit_enum(&mut self, enum_def: &EnumDef) -> Result<(), CodegenError> {
        self.claim_name(&enum_def.name, "enum")?;
        // proto3 enum values are int32
        if let Some(entry) = enum_def
            .entries
            .iter()
            .find(|e| i32::try_from(e.value).is_err())
        {
            return Err(CodegenError::generation(format!(
                "entry {} of enum {} has value {}, beyond the proto3 enum range",
                entry.name, enum_def.name, entry.value
            )));
        }
        if let Some(text) = &enum_def.description {
            self.comment("", text);
        }
        self.body.push_str(&format!("enum {} {{\n", enum_def.name));

        if enum_def.entry_by_value(0).is_none() {
            let placeholder = format!("{}_UNDEFINED", enum_def.name);
            if enum_def.entries.iter().any(|e| e.name == placeholder) {
                return Err(CodegenError::generation(format!(
                    "enum {} has no zero entry and already defines {placeholder}",
                    enum_def.name
                )));
            }
            self.body.push_str(&format!("  {placeholder} = 0;\n"));
        }
        for entry in &enum_def.entries {
            if let Some(text) = &entry.description {
                self.comment("  ", text);
            }
            for (index, param) in &entry.params {
                self.comment("  ", &format!("param {index}: {param}"));
            }
            self.body
                .push_str(&format!("  {} = {};\n", entry.name, entry.value));
        }
        self.body.push_str("}\n\n");
        Ok(())
    }

    fn emit_message(&mut self, message: &MessageDef) -> Result<(), CodegenError> {
        self.claim_name(&message.name, "message")?;
        if let Some(text) = &message.description {
            self.comment("", text);
        }
        self.body.push_str(&format!(
            "message {} {{  // MavLink id: {}\n",
            message.name, message.id
        ));
        for (idx, field) in message.fields.iter().enumerate() {
            if let Some(text) = &field.description {
                self.comment("  ", text);
            }
            self.body.push_str(&format!(
                "  {} {} = {};\n",
                proto_type(field),
                field.name,
                idx + 1
            ));
        }
        self.body.push_str("}\n\n");
        Ok(())
    }

    fn finalize(&mut self) -> Result<Vec<Artifact>, CodegenError> {
        let mut output = String::new();
        output.push_str("// Generated by mavdl. Do not edit.\n\n");
        output.push_str("syntax = \"proto3\";\n\n");
        output.push_str(&format!("package {};\n\n", self.package));
        output.push_str(&self.body);
        Ok(vec![Artifact {
            file_name: format!("{}.proto", self.package),
            contents: output,
        }])
    }
}

/// Returns the proto3 type of a field, including `repeated` for arrays.
#[must_use]
pub fn proto_type(field: &FieldDef) -> String {
    match (field.ty, &field.enum_ref) {
        (FieldType::String(_), _) => "string".to_string(),
        (FieldType::Array(_, _), Some(enum_name)) => format!("repeated {enum_name}"),
        (FieldType::Array(prim, _), None) => format!("repeated {}", scalar_type(prim)),
        (_, Some(enum_name)) => enum_name.clone(),
        (FieldType::Scalar(prim), None) => scalar_type(prim).to_string(),
        (FieldType::ProtocolVersion, None) => "uint32".to_string(),
    }
}

/// Narrow integers widen to the 32-bit proto types of the same signedness.
const fn scalar_type(prim: Primitive) -> &'static str {
    match prim {
        Primitive::Uint8 | Primitive::Char | Primitive::Uint16 | Primitive::Uint32 => "uint32",
        Primitive::Int8 | Primitive::Int16 | Primitive::Int32 => "int32",
        Primitive::Uint64 => "uint64",
        Primitive::Int64 => "int64",
        Primitive::Float => "float",
        Primitive::Double => "double",
    }
}
