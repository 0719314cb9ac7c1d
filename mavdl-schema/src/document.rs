//! Dialect documents: the declarations of one XML file, before includes are
//! merged and before any value is normalized.

use crate::error::ParseError;
use crate::model::Deprecation;
use crate::xml::{XmlNode, parse_document};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Declarations read from one dialect file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialectDocument {
    /// Path the document was read from.
    pub path: PathBuf,
    /// `<dialect>` value, if present.
    pub dialect: Option<u32>,
    /// `<version>` value, if present.
    pub version: Option<u32>,
    /// `<include>` paths in declaration order, as written.
    pub includes: Vec<String>,
    /// Enum declarations in document order.
    pub enums: Vec<RawEnum>,
    /// Message declarations in document order.
    pub messages: Vec<RawMessage>,
}

/// Enum as declared, entry values not yet resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEnum {
    /// Enum name.
    pub name: String,
    /// Description text.
    pub description: Option<String>,
    /// `bitmask="true"` was set.
    pub bitmask: bool,
    /// Deprecation notice.
    pub deprecated: Option<Deprecation>,
    /// Entries in declaration order.
    pub entries: Vec<RawEntry>,
}

/// Enum entry as declared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    /// Entry name.
    pub name: String,
    /// Explicit value, if the `value` attribute was present.
    pub value: Option<u64>,
    /// Description text.
    pub description: Option<String>,
    /// Informational display hint.
    pub display: Option<String>,
    /// `<param index="N">` texts.
    pub params: Vec<(u8, String)>,
    /// Deprecation notice.
    pub deprecated: Option<Deprecation>,
}

/// Message as declared, field types not yet resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMessage {
    /// Message id.
    pub id: u32,
    /// Message name.
    pub name: String,
    /// Description text.
    pub description: Option<String>,
    /// Deprecation notice.
    pub deprecated: Option<Deprecation>,
    /// `<wip/>` marker present.
    pub wip: bool,
    /// Fields in declaration order.
    pub fields: Vec<RawField>,
}

/// Field as declared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawField {
    /// Field name.
    pub name: String,
    /// Type token as written.
    pub type_token: String,
    /// Referenced enum name.
    pub enum_ref: Option<String>,
    /// Informational display hint.
    pub display: Option<String>,
    /// Unit of measurement.
    pub units: Option<String>,
    /// Description text.
    pub description: Option<String>,
    /// Declared after `<extensions/>`.
    pub is_extension: bool,
}

impl DialectDocument {
    /// Parses a dialect document.
    ///
    /// # Arguments
    /// * `path` - Path of the document, kept for diagnostics and include resolution
    /// * `xml` - Document content
    ///
    /// # Errors
    /// Returns `ParseError` if the XML is malformed, the root is not
    /// `mavlink`, or a required attribute is missing or invalid.
    pub fn parse(path: impl Into<PathBuf>, xml: &str) -> Result<Self, ParseError> {
        let root = parse_document(xml)?;
        if root.name != "mavlink" {
            return Err(ParseError::UnexpectedRoot { element: root.name });
        }

        let mut doc = Self {
            path: path.into(),
            ..Self::default()
        };

        for child in &root.children {
            match child.name.as_str() {
                "include" => {
                    if !child.text.is_empty() {
                        doc.includes.push(child.text.clone());
                    }
                }
                "dialect" => doc.dialect = Some(parse_text_u32(child)?),
                "version" => doc.version = Some(parse_text_u32(child)?),
                "enums" => {
                    for node in child.children_named("enum") {
                        doc.enums.push(parse_enum(node)?);
                    }
                }
                "messages" => {
                    for node in child.children_named("message") {
                        doc.messages.push(parse_message(node)?);
                    }
                }
                other => warn!(path = %doc.path.display(), element = other, "ignoring unknown element"),
            }
        }

        Ok(doc)
    }

    /// Returns the dialect version, 0 when the document declares none.
    #[must_use]
    pub fn dialect_version(&self) -> u32 {
        self.dialect.unwrap_or(0)
    }

    /// Resolves an include path against this document's directory.
    #[must_use]
    pub fn include_path(&self, include: &str) -> PathBuf {
        match self.path.parent() {
            Some(dir) => dir.join(include),
            None => Path::new(include).to_path_buf(),
        }
    }
}

fn parse_enum(node: &XmlNode) -> Result<RawEnum, ParseError> {
    let mut raw = RawEnum {
        name: node.required_attr("name")?.to_string(),
        bitmask: node.attr("bitmask") == Some("true"),
        ..RawEnum::default()
    };

    for child in &node.children {
        match child.name.as_str() {
            "description" => raw.description = non_empty(&child.text),
            "entry" => raw.entries.push(parse_entry(child)?),
            "deprecated" | "superseded" => raw.deprecated = Some(parse_deprecation(child)),
            "wip" => {}
            other => warn!(enum_name = %raw.name, element = other, "ignoring unknown element"),
        }
    }

    Ok(raw)
}

fn parse_entry(node: &XmlNode) -> Result<RawEntry, ParseError> {
    let name = node.required_attr("name")?.to_string();
    let value = match node.attr("value") {
        Some(text) => Some(
            parse_int(text).ok_or_else(|| ParseError::invalid_attr("entry", "value", text))?,
        ),
        None => None,
    };

    let mut raw = RawEntry {
        name,
        value,
        display: node.attr("display").map(str::to_string),
        ..RawEntry::default()
    };

    for child in &node.children {
        match child.name.as_str() {
            "description" => raw.description = non_empty(&child.text),
            "param" => {
                let index = child.required_attr("index")?;
                let index = index
                    .parse::<u8>()
                    .map_err(|_| ParseError::invalid_attr("param", "index", index))?;
                raw.params.push((index, child.text.clone()));
            }
            "deprecated" | "superseded" => raw.deprecated = Some(parse_deprecation(child)),
            "wip" => {}
            other => warn!(entry = %raw.name, element = other, "ignoring unknown element"),
        }
    }

    Ok(raw)
}

fn parse_message(node: &XmlNode) -> Result<RawMessage, ParseError> {
    let id_text = node.required_attr("id")?;
    let id = parse_int(id_text)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| ParseError::invalid_attr("message", "id", id_text))?;

    let mut raw = RawMessage {
        id,
        name: node.required_attr("name")?.to_string(),
        ..RawMessage::default()
    };

    let mut in_extensions = false;
    for child in &node.children {
        match child.name.as_str() {
            "description" => raw.description = non_empty(&child.text),
            "field" => raw.fields.push(RawField {
                name: child.required_attr("name")?.to_string(),
                type_token: child.required_attr("type")?.to_string(),
                enum_ref: child.attr("enum").map(str::to_string),
                display: child.attr("display").map(str::to_string),
                units: child.attr("units").map(str::to_string),
                description: non_empty(&child.text),
                is_extension: in_extensions,
            }),
            "extensions" => in_extensions = true,
            "deprecated" | "superseded" => raw.deprecated = Some(parse_deprecation(child)),
            "wip" => raw.wip = true,
            other => warn!(message = %raw.name, element = other, "ignoring unknown element"),
        }
    }

    Ok(raw)
}

fn parse_deprecation(node: &XmlNode) -> Deprecation {
    Deprecation {
        since: node.attr("since").map(str::to_string),
        replaced_by: node.attr("replaced_by").map(str::to_string),
        note: non_empty(&node.text),
    }
}

fn parse_text_u32(node: &XmlNode) -> Result<u32, ParseError> {
    parse_int(&node.text)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| ParseError::InvalidText {
            element: node.name.clone(),
            value: node.text.clone(),
        })
}

/// Parses a decimal or `0x`-prefixed hexadecimal integer.
pub(crate) fn parse_int(text: &str) -> Option<u64> {
    let text = text.trim();
    match text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIALECT: &str = r#"<?xml version="1.0"?>
<mavlink>
    <include>base.xml</include>
    <version>3</version>
    <dialect>7</dialect>
    <enums>
        <enum name="MAV_MODE_FLAG" bitmask="true">
            <description>Mode flags.</description>
            <entry name="MAV_MODE_FLAG_A" value="0x80">
                <description>A flag.</description>
                <param index="1">First</param>
            </entry>
            <entry name="MAV_MODE_FLAG_B"/>
        </enum>
    </enums>
    <messages>
        <message id="42" name="SAMPLE">
            <deprecated since="2024-01" replaced_by="OTHER">Use OTHER.</deprecated>
            <description>Sample message.</description>
            <field type="uint16_t" name="count" units="s">Count</field>
            <extensions/>
            <field type="uint8_t" name="flags" enum="MAV_MODE_FLAG" display="bitmask">Flags</field>
        </message>
    </messages>
</mavlink>"#;

    #[test]
    fn test_parse_document() {
        let doc = DialectDocument::parse("defs/sample.xml", DIALECT).expect("Failed to parse");
        assert_eq!(doc.includes, vec!["base.xml".to_string()]);
        assert_eq!(doc.dialect_version(), 7);
        assert_eq!(doc.version, Some(3));
        assert_eq!(doc.include_path("base.xml"), PathBuf::from("defs/base.xml"));

        let en = &doc.enums[0];
        assert!(en.bitmask);
        assert_eq!(en.description.as_deref(), Some("Mode flags."));
        assert_eq!(en.entries[0].value, Some(0x80));
        assert_eq!(en.entries[0].params, vec![(1, "First".to_string())]);
        assert_eq!(en.entries[1].value, None);

        let msg = &doc.messages[0];
        assert_eq!(msg.id, 42);
        let deprecated = msg.deprecated.as_ref().expect("deprecation missing");
        assert_eq!(deprecated.replaced_by.as_deref(), Some("OTHER"));
        assert!(!msg.fields[0].is_extension);
        assert_eq!(msg.fields[0].units.as_deref(), Some("s"));
        assert!(msg.fields[1].is_extension);
        assert_eq!(msg.fields[1].enum_ref.as_deref(), Some("MAV_MODE_FLAG"));
        assert_eq!(msg.fields[1].display.as_deref(), Some("bitmask"));
        assert_eq!(msg.fields[1].description.as_deref(), Some("Flags"));
    }

    #[test]
    fn test_dialect_defaults_to_zero() {
        let doc = DialectDocument::parse("a.xml", "<mavlink/>").expect("Failed to parse");
        assert_eq!(doc.dialect, None);
        assert_eq!(doc.dialect_version(), 0);
    }

    #[test]
    fn test_wrong_root() {
        let err = DialectDocument::parse("a.xml", "<schema/>").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedRoot { .. }));
    }

    #[test]
    fn test_missing_message_name() {
        let xml = r#"<mavlink><messages><message id="1"/></messages></mavlink>"#;
        let err = DialectDocument::parse("a.xml", xml).unwrap_err();
        assert!(matches!(err, ParseError::MissingAttribute { ref attribute, .. } if attribute == "name"));
    }

    #[test]
    fn test_negative_message_id() {
        let xml = r#"<mavlink><messages><message id="-1" name="X"/></messages></mavlink>"#;
        let err = DialectDocument::parse("a.xml", xml).unwrap_err();
        assert!(matches!(err, ParseError::InvalidAttribute { .. }));
    }

    #[test]
    fn test_bad_dialect_text() {
        let err = DialectDocument::parse("a.xml", "<mavlink><dialect>two</dialect></mavlink>")
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidText { .. }));
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("100"), Some(100));
        assert_eq!(parse_int(" 0x1F "), Some(31));
        assert_eq!(parse_int("-3"), None);
        assert_eq!(parse_int("ten"), None);
    }
}
