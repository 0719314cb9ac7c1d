//! CRC-extra computation.
//!
//! The seed is CRC-16/MCRF4XX over the message name and the type and name
//! of every base field in wire order, folded into one byte.

use crate::model::FieldDef;
use crc_any::CRCu16;

/// Computes the CRC-extra byte for a message.
///
/// `fields` must already be in canonical wire order; callers pass only the
/// fields that take part (no extension or protocol-version fields).
#[must_use]
pub fn crc_extra<'a>(name: &str, fields: impl IntoIterator<Item = &'a FieldDef>) -> u8 {
    let mut crc = CRCu16::crc16mcrf4cc();
    crc.digest(name.as_bytes());
    crc.digest(b" ");

    for field in fields {
        crc.digest(field.ty.primitive().token().as_bytes());
        crc.digest(b" ");
        crc.digest(field.name.as_bytes());
        crc.digest(b" ");
        if let Some(len) = field.ty.array_len() {
            crc.digest(&[len as u8]);
        }
    }

    let value = crc.get_crc();
    ((value & 0xFF) ^ (value >> 8)) as u8
}
