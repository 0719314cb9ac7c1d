//! Rust code generation.
//!
//! The Rust target produces a single `<module>.rs` file made only of items,
//! so it can be pulled into any module with `include!`:
//!
//! ```ignore
//! mod common {
//!     include!(concat!(env!("OUT_DIR"), "/common.rs"));
//! }
//! ```

pub mod dialect;
pub mod enums;
pub mod messages;

pub use dialect::{DialectEntry, DialectGenerator};
pub use enums::EnumGenerator;
pub use messages::MessageGenerator;

use crate::emitter::{Artifact, Emitter};
use crate::error::CodegenError;
use crate::naming::to_pascal_case;
use crate::options::CompileOptions;
use mavdl_schema::{EnumDef, MessageDef};
use std::collections::HashMap;

/// Type names the generated file defines on its own.
const RESERVED_TYPES: &[&str] = &["Message"];

/// [`Emitter`] for the Rust target.
pub struct RustEmitter {
    module: String,
    dialect: u32,
    docs: bool,
    runtime: String,
    enums: String,
    messages: String,
    entries: Vec<DialectEntry>,
    type_names: HashMap<String, String>,
}

impl RustEmitter {
    /// Creates an emitter for one dialect module.
    #[must_use]
    pub fn new(module: &str, dialect: u32, options: &CompileOptions) -> Self {
        Self {
            module: module.to_string(),
            dialect,
            docs: options.docs,
            runtime: options.runtime_path.clone(),
            enums: String::new(),
            messages: String::new(),
            entries: Vec::new(),
            type_names: HashMap::new(),
        }
    }

    /// Reserves the Rust type name for a dialect item.
    fn claim_type_name(&mut self, dialect_name: &str) -> Result<String, CodegenError> {
        let type_name = to_pascal_case(dialect_name);
        if RESERVED_TYPES.contains(&type_name.as_str()) {
            return Err(CodegenError::generation(format!(
                "{dialect_name} maps to the reserved type name {type_name}"
            )));
        }
        if let Some(first) = self.type_names.get(&type_name) {
            return Err(CodegenError::generation(format!(
                "{first} and {dialect_name} both map to the Rust type {type_name}"
            )));
        }
        self.type_names
            .insert(type_name.clone(), dialect_name.to_string());
        Ok(type_name)
    }
}

impl Emitter for RustEmitter {
    fn emit_enum(&mut self, enum_def: &EnumDef) -> Result<(), CodegenError> {
        let type_name = self.claim_type_name(&enum_def.name)?;
        let code = EnumGenerator::new(&self.runtime, self.docs).generate(enum_def, &type_name)?;
        self.enums.push_str(&code);
        Ok(())
    }

    fn emit_message(&mut self, message: &MessageDef) -> Result<(), CodegenError> {
        let type_name = self.claim_type_name(&message.name)?;
        let code =
            MessageGenerator::new(&self.runtime, self.docs).generate(message, &type_name)?;
        self.messages.push_str(&code);
        self.entries.push(DialectEntry {
            id: message.id,
            name: message.name.clone(),
            type_name,
            crc_extra: message.crc_extra,
        });
        Ok(())
    }

    fn finalize(&mut self) -> Result<Vec<Artifact>, CodegenError> {
        let mut output = String::new();
        output.push_str(&format!(
            "// Generated by mavdl from the `{}` dialect. Do not edit.\n\n",
            self.module
        ));
        if self.docs {
            output.push_str("/// Dialect version declared by the root file.\n");
        }
        output.push_str(&format!("pub const DIALECT: u32 = {};\n\n", self.dialect));
        output.push_str(&self.enums);
        output.push_str(&self.messages);
        output.push_str(&DialectGenerator::new(&self.runtime, self.docs).generate(&self.entries));

        Ok(vec![Artifact {
            file_name: format!("{}.rs", self.module),
            contents: output,
        }])
    }
}

/// Writes `text` as `///` lines at the given indentation.
pub(crate) fn write_doc(output: &mut String, indent: &str, text: &str) {
    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            output.push_str(&format!("{indent}///\n"));
        } else {
            output.push_str(&format!("{indent}/// {line}\n"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::run;
    use mavdl_schema::DialectDocument;
    use mavdl_schema::normalize::model_from_documents;

    fn emit(xml: &str) -> Result<String, CodegenError> {
        let doc = DialectDocument::parse("t.xml", xml).expect("Failed to parse");
        let model =
            model_from_documents(doc.dialect_version(), vec![doc]).expect("Failed to normalize");
        let options = CompileOptions::new();
        let mut emitter = RustEmitter::new("t", model.dialect, &options);
        let mut artifacts = run(&mut emitter, &model)?;
        Ok(artifacts.remove(0).contents)
    }

    #[test]
    fn test_file_layout() {
        let code = emit(
            r#"<mavlink>
    <dialect>9</dialect>
    <enums><enum name="E"><entry name="E_A"/></enum></enums>
    <messages><message id="3" name="M"><field type="uint8_t" name="x">x</field></message></messages>
</mavlink>"#,
        )
        .expect("Failed to emit");
        assert!(code.starts_with("// Generated by mavdl from the `t` dialect."));
        assert!(code.contains("pub const DIALECT: u32 = 9;"));
        let enum_at = code.find("pub enum E ").expect("enum missing");
        let struct_at = code.find("pub struct M ").expect("struct missing");
        let dispatch_at = code.find("pub enum Message ").expect("dispatch missing");
        assert!(enum_at < struct_at && struct_at < dispatch_at);
        syn::parse_file(&code).expect("generated code does not parse");
    }

    #[test]
    fn test_enum_message_name_clash() {
        let err = emit(
            r#"<mavlink>
    <enums><enum name="STATUS"><entry name="STATUS_OK"/></enum></enums>
    <messages><message id="1" name="STATUS"/></messages>
</mavlink>"#,
        )
        .unwrap_err();
        assert!(matches!(err, CodegenError::Generation { .. }));
    }

    #[test]
    fn test_reserved_message_name() {
        let err = emit(r#"<mavlink><messages><message id="1" name="MESSAGE"/></messages></mavlink>"#)
            .unwrap_err();
        assert!(err.to_string().contains("reserved"));
    }

    #[test]
    fn test_library_types_use_absolute_paths() {
        let code = emit(
            r#"<mavlink>
    <enums><enum name="OPTION"><entry name="OPTION_A"/></enum></enums>
    <messages>
        <message id="1" name="STRING"><field type="uint8_t" name="x">x</field></message>
        <message id="2" name="VEC"><field type="uint8_t" name="x">x</field></message>
        <message id="3" name="LABEL">
            <field type="char[8]" name="text">t</field>
            <field type="float[40]" name="big">b</field>
        </message>
    </messages>
</mavlink>"#,
        )
        .expect("Failed to emit");
        assert!(code.contains("pub struct String {"));
        assert!(code.contains("pub text: ::std::string::String,"));
        assert!(code.contains("pub big: ::std::vec::Vec<f32>,"));
        assert!(code.contains("-> ::core::option::Option<u8>"));
        assert!(code.contains("Result<::std::vec::Vec<u8>>"));
        assert!(code.contains("Ok(Self::Label(::core::default::Default::default()))"));
        for bare in [": String", "<String>", " Vec<", "(Vec<", " Option<", " Default::default"] {
            assert!(!code.contains(bare), "bare `{bare}` in generated code");
        }
        syn::parse_file(&code).expect("generated code does not parse");
    }

    #[test]
    fn test_write_doc() {
        let mut out = String::new();
        write_doc(&mut out, "    ", "  first line\n\n  second ");
        assert_eq!(out, "    /// first line\n    ///\n    /// second\n");
    }
}
