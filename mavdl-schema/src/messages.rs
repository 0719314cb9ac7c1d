//! Message normalization: field type resolution, canonical wire order,
//! payload offsets and CRC-extra.

use crate::crc::crc_extra;
use crate::document::{RawField, RawMessage};
use crate::error::SchemaError;
use crate::model::{FieldDef, MessageDef};
use crate::types::{FieldType, TypeTokenError};
use std::collections::HashSet;
use std::path::Path;

/// Normalizes one message.
///
/// Base fields are stably sorted by descending element width. Extension
/// fields follow in declaration order. The protocol-version field, if any,
/// is placed last and gets no payload offset.
///
/// # Arguments
/// * `raw` - Message as declared
/// * `source` - File that declared the message
///
/// # Errors
/// Returns `DuplicateFieldName`, `UnknownFieldType`, `InvalidArrayLength`
/// or `MultipleMagicFields`.
pub fn normalize_message(raw: &RawMessage, source: &Path) -> Result<MessageDef, SchemaError> {
    let mut names = HashSet::new();
    let mut fields = Vec::with_capacity(raw.fields.len());
    let mut magic: Option<usize> = None;

    for (idx, raw_field) in raw.fields.iter().enumerate() {
        if !names.insert(raw_field.name.as_str()) {
            return Err(SchemaError::DuplicateFieldName {
                file: source.to_path_buf(),
                message: raw.name.clone(),
                field: raw_field.name.clone(),
            });
        }
        let field = resolve_field(&raw.name, raw_field, source)?;
        if field.is_magic {
            if let Some(first) = magic {
                return Err(SchemaError::MultipleMagicFields {
                    file: source.to_path_buf(),
                    message: raw.name.clone(),
                    first: raw.fields[first].name.clone(),
                    second: field.name,
                });
            }
            magic = Some(idx);
        }
        fields.push(field);
    }

    let wire_order = canonical_order(&fields);

    let mut offset = 0;
    let mut base_len = 0;
    for &idx in &wire_order {
        let field = &mut fields[idx];
        if field.is_magic {
            continue;
        }
        field.offset = Some(offset);
        offset += field.ty.encoded_len();
        if !field.is_extension {
            base_len = offset;
        }
    }

    let crc = crc_extra(
        &raw.name,
        wire_order
            .iter()
            .map(|&idx| &fields[idx])
            .filter(|f| !f.is_magic && !f.is_extension),
    );

    Ok(MessageDef {
        id: raw.id,
        name: raw.name.clone(),
        description: raw.description.clone(),
        fields,
        wire_order,
        crc_extra: crc,
        encoded_len: offset,
        base_len,
        deprecated: raw.deprecated.clone(),
        wip: raw.wip,
        source: source.to_path_buf(),
    })
}

/// Returns field indices in canonical wire order.
fn canonical_order(fields: &[FieldDef]) -> Vec<usize> {
    let mut base: Vec<usize> = (0..fields.len())
        .filter(|&i| !fields[i].is_magic && !fields[i].is_extension)
        .collect();
    // sort_by_key is stable: equal widths keep declaration order
    base.sort_by_key(|&i| std::cmp::Reverse(fields[i].ty.element_size()));

    let extensions = (0..fields.len()).filter(|&i| !fields[i].is_magic && fields[i].is_extension);
    let magic = (0..fields.len()).filter(|&i| fields[i].is_magic);
    base.into_iter().chain(extensions).chain(magic).collect()
}

fn resolve_field(message: &str, raw: &RawField, source: &Path) -> Result<FieldDef, SchemaError> {
    let ty = FieldType::parse(&raw.type_token).map_err(|err| match err {
        TypeTokenError::Unknown => SchemaError::UnknownFieldType {
            file: source.to_path_buf(),
            message: message.to_string(),
            field: raw.name.clone(),
            type_name: raw.type_token.clone(),
        },
        TypeTokenError::InvalidLength => SchemaError::InvalidArrayLength {
            file: source.to_path_buf(),
            message: message.to_string(),
            field: raw.name.clone(),
            type_name: raw.type_token.clone(),
        },
    })?;

    Ok(FieldDef {
        name: raw.name.clone(),
        type_token: raw.type_token.clone(),
        ty,
        enum_ref: raw.enum_ref.clone(),
        display: raw.display.clone(),
        units: raw.units.clone(),
        description: raw.description.clone(),
        is_magic: ty.is_magic(),
        is_extension: raw.is_extension,
        offset: None,
    })
}
