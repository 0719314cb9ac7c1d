//! Enum code generation.

use super::write_doc;
use crate::error::CodegenError;
use crate::naming::variant_names;
use mavdl_schema::{Deprecation, EnumDef};

/// Generator for enum definitions.
pub struct EnumGenerator<'a> {
    runtime: &'a str,
    docs: bool,
}

impl<'a> EnumGenerator<'a> {
    /// Creates a new enum generator.
    #[must_use]
    pub fn new(runtime: &'a str, docs: bool) -> Self {
        Self { runtime, docs }
    }

    /// Generates the definition and conversions of one enum.
    ///
    /// # Errors
    /// Returns `Generation` if entry names clash once converted.
    pub fn generate(&self, enum_def: &EnumDef, type_name: &str) -> Result<String, CodegenError> {
        let variants = variant_names(enum_def)?;
        let mut output = String::new();

        if self.docs {
            match &enum_def.description {
                Some(text) => write_doc(&mut output, "", text),
                None => output.push_str(&format!("/// {} enum.\n", enum_def.name)),
            }
            if enum_def.bitmask {
                output.push_str("///\n/// Values may be combined as a bitmask.\n");
            }
            if let Some(dep) = &enum_def.deprecated {
                output.push_str("///\n");
                write_doc(&mut output, "", &deprecation_note(dep));
            }
        }
        if enum_def.entries.is_empty() {
            output.push_str("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]\n");
        } else {
            output.push_str("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]\n");
            output.push_str("#[repr(u32)]\n");
        }
        output.push_str(&format!("pub enum {type_name} {{\n"));
        for (idx, (entry, variant)) in enum_def.entries.iter().zip(&variants).enumerate() {
            if self.docs {
                if let Some(text) = &entry.description {
                    write_doc(&mut output, "    ", text);
                }
                for (index, param) in &entry.params {
                    write_doc(&mut output, "    ", &format!("Param {index}: {param}"));
                }
                if let Some(dep) = &entry.deprecated {
                    write_doc(&mut output, "    ", &deprecation_note(dep));
                }
            }
            if idx == 0 {
                output.push_str("    #[default]\n");
            }
            output.push_str(&format!("    {variant} = {},\n", entry.value));
        }
        output.push_str("}\n\n");

        output.push_str(&self.generate_impl(enum_def, type_name, &variants));
        output.push_str(&self.generate_conversions(enum_def, type_name, &variants));
        Ok(output)
    }

    fn generate_impl(&self, enum_def: &EnumDef, type_name: &str, variants: &[String]) -> String {
        let mut output = String::new();
        output.push_str(&format!("impl {type_name} {{\n"));
        if self.docs {
            output.push_str("    /// Enum name as declared in the dialect.\n");
        }
        output.push_str(&format!(
            "    pub const NAME: &'static str = \"{}\";\n\n",
            enum_def.name
        ));
        if self.docs {
            output.push_str("    /// Returns the entry name as declared in the dialect.\n");
        }
        output.push_str("    #[must_use]\n");
        output.push_str("    pub const fn name(self) -> &'static str {\n");
        output.push_str("        match self {\n");
        for (entry, variant) in enum_def.entries.iter().zip(variants) {
            output.push_str(&format!(
                "            Self::{variant} => \"{}\",\n",
                entry.name
            ));
        }
        output.push_str("        }\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");
        output
    }

    fn generate_conversions(
        &self,
        enum_def: &EnumDef,
        type_name: &str,
        variants: &[String],
    ) -> String {
        let rt = self.runtime;
        let mut output = String::new();

        output.push_str(&format!("impl ::core::convert::TryFrom<u32> for {type_name} {{\n"));
        output.push_str(&format!("    type Error = {rt}::Error;\n\n"));
        output.push_str(
            "    fn try_from(value: u32) -> ::core::result::Result<Self, Self::Error> {\n",
        );
        output.push_str("        match value {\n");
        for (entry, variant) in enum_def.entries.iter().zip(variants) {
            output.push_str(&format!(
                "            {} => Ok(Self::{variant}),\n",
                entry.value
            ));
        }
        output.push_str(&format!(
            "            _ => Err({rt}::Error::InvalidEnumValue {{\n                enum_name: Self::NAME,\n                value: u64::from(value),\n            }}),\n"
        ));
        output.push_str("        }\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output.push_str(&format!("impl ::core::convert::From<{type_name}> for u32 {{\n"));
        output.push_str(&format!("    fn from(value: {type_name}) -> Self {{\n"));
        if enum_def.entries.is_empty() {
            output.push_str("        match value {}\n");
        } else {
            output.push_str("        value as u32\n");
        }
        output.push_str("    }\n");
        output.push_str("}\n\n");
        output
    }
}

/// Renders a deprecation notice as one sentence.
fn deprecation_note(dep: &Deprecation) -> String {
    let mut note = String::from("Deprecated");
    if let Some(since) = &dep.since {
        note.push_str(&format!(" since {since}"));
    }
    if let Some(replacement) = &dep.replaced_by {
        note.push_str(&format!(", replaced by {replacement}"));
    }
    note.push('.');
    if let Some(text) = &dep.note {
        note.push(' ');
        note.push_str(text);
    }
    note
}
