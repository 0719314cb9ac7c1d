//! Normalized, merged dialect model consumed by validation and code
//! generation.
//!
//! A [`MergedModel`] is built once per compile and never mutated after
//! validation; every later stage borrows it.

use crate::types::FieldType;
use std::collections::HashMap;
use std::path::PathBuf;

/// Flattened union of a root dialect and everything it includes.
#[derive(Debug, Clone, Default)]
pub struct MergedModel {
    /// Dialect version of the root document.
    pub dialect: u32,
    /// Enums in merge order.
    pub enums: Vec<EnumDef>,
    /// Messages in merge order.
    pub messages: Vec<MessageDef>,
    enum_map: HashMap<String, usize>,
    message_map: HashMap<String, usize>,
}

impl MergedModel {
    /// Creates an empty model for the given dialect version.
    #[must_use]
    pub fn new(dialect: u32) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    /// Adds an enum definition. The first enum with a given name wins
    /// lookups; the validator reports the collision.
    pub fn add_enum(&mut self, enum_def: EnumDef) {
        let index = self.enums.len();
        self.enum_map.entry(enum_def.name.clone()).or_insert(index);
        self.enums.push(enum_def);
    }

    /// Adds a message definition. The first message with a given name wins
    /// lookups; the validator reports the collision.
    pub fn add_message(&mut self, message: MessageDef) {
        let index = self.messages.len();
        self.message_map.entry(message.name.clone()).or_insert(index);
        self.messages.push(message);
    }

    /// Looks up an enum by name.
    #[must_use]
    pub fn get_enum(&self, name: &str) -> Option<&EnumDef> {
        self.enum_map.get(name).map(|&idx| &self.enums[idx])
    }

    /// Looks up a message by name.
    #[must_use]
    pub fn get_message(&self, name: &str) -> Option<&MessageDef> {
        self.message_map.get(name).map(|&idx| &self.messages[idx])
    }

    /// Looks up a message by id.
    #[must_use]
    pub fn message_by_id(&self, id: u32) -> Option<&MessageDef> {
        self.messages.iter().find(|m| m.id == id)
    }
}

/// Normalized enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDef {
    /// Enum name.
    pub name: String,
    /// Entries in declaration order, with resolved values.
    pub entries: Vec<EnumEntryDef>,
    /// Description text.
    pub description: Option<String>,
    /// Whether the enum is a bitmask.
    pub bitmask: bool,
    /// Deprecation notice, if any.
    pub deprecated: Option<Deprecation>,
    /// File that declared the enum.
    pub source: PathBuf,
}

impl EnumDef {
    /// Looks up an entry by value.
    #[must_use]
    pub fn entry_by_value(&self, value: u32) -> Option<&EnumEntryDef> {
        self.entries.iter().find(|e| e.value == value)
    }
}

/// Normalized enum entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumEntryDef {
    /// Entry name.
    pub name: String,
    /// Resolved value.
    pub value: u32,
    /// Description text.
    pub description: Option<String>,
    /// Informational display hint.
    pub display: Option<String>,
    /// Command parameters, by 1-based index.
    pub params: Vec<(u8, String)>,
    /// Deprecation notice, if any.
    pub deprecated: Option<Deprecation>,
}

/// Deprecation or supersession notice attached to a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Deprecation {
    /// Date or version since which the item is deprecated.
    pub since: Option<String>,
    /// Name of the replacement.
    pub replaced_by: Option<String>,
    /// Free-form note.
    pub note: Option<String>,
}

/// Normalized message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDef {
    /// Message id.
    pub id: u32,
    /// Message name.
    pub name: String,
    /// Description text.
    pub description: Option<String>,
    /// Fields in declaration order.
    pub fields: Vec<FieldDef>,
    /// Indices into `fields` in canonical wire order, magic field last.
    pub wire_order: Vec<usize>,
    /// CRC-extra byte.
    pub crc_extra: u8,
    /// Payload length in bytes, extensions included, magic field excluded.
    pub encoded_len: usize,
    /// Payload length without extension fields.
    pub base_len: usize,
    /// Deprecation notice, if any.
    pub deprecated: Option<Deprecation>,
    /// Whether the message is work in progress.
    pub wip: bool,
    /// File that declared the message.
    pub source: PathBuf,
}

impl MessageDef {
    /// Iterates over fields in canonical wire order.
    pub fn wire_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.wire_order.iter().map(|&idx| &self.fields[idx])
    }

    /// Returns the protocol-version field, if the message has one.
    #[must_use]
    pub fn magic_field(&self) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.is_magic)
    }
}

/// Normalized field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Field name.
    pub name: String,
    /// Type token as written in the dialect.
    pub type_token: String,
    /// Resolved type.
    pub ty: FieldType,
    /// Name of the enum the value belongs to.
    pub enum_ref: Option<String>,
    /// Informational display hint.
    pub display: Option<String>,
    /// Unit of measurement.
    pub units: Option<String>,
    /// Description text.
    pub description: Option<String>,
    /// Whether the field is the protocol-version field.
    pub is_magic: bool,
    /// Whether the field follows `<extensions/>`.
    pub is_extension: bool,
    /// Byte offset in the payload; `None` for the protocol-version field.
    pub offset: Option<usize>,
}
