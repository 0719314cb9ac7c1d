//! # mavdl schema
//!
//! MAVLink XML dialect front end.
//!
//! This crate provides:
//! - A generic XML tree parser that drops comments
//! - Dialect documents and include resolution with cycle detection
//! - Enum value assignment and message wire-order normalization
//! - CRC-extra computation
//! - Validation of the merged model
//! - A reflective payload codec for loaded dialects

pub mod codec;
pub mod crc;
pub mod document;
pub mod enums;
pub mod error;
pub mod messages;
pub mod model;
pub mod normalize;
pub mod resolver;
pub mod types;
pub mod validation;
pub mod xml;

pub use codec::{CodecError, FieldValue, decode_payload, encode_payload};
pub use document::DialectDocument;
pub use error::{ParseError, SchemaError};
pub use model::{Deprecation, EnumDef, EnumEntryDef, FieldDef, MergedModel, MessageDef};
pub use normalize::model_from_documents;
pub use resolver::{FsLoader, Loader, MemoryLoader, resolve};
pub use types::{FieldType, Primitive};
pub use validation::{ValidationOptions, validate_model};

use std::path::Path;

/// Loads, normalizes and validates a dialect from the filesystem.
///
/// # Arguments
/// * `root` - Path of the root dialect file
///
/// # Errors
/// Returns the first `SchemaError` met by any stage.
pub fn load_dialect(root: &Path) -> Result<MergedModel, SchemaError> {
    load_dialect_with(root, &FsLoader, &ValidationOptions::default())
}

/// Loads, normalizes and validates a dialect through a custom loader.
///
/// # Arguments
/// * `root` - Path of the root dialect file, as understood by `loader`
/// * `loader` - Source of document contents
/// * `options` - Validation policy
///
/// # Errors
/// Returns the first `SchemaError` met by any stage.
pub fn load_dialect_with<L: Loader + ?Sized>(
    root: &Path,
    loader: &L,
    options: &ValidationOptions,
) -> Result<MergedModel, SchemaError> {
    let decls = resolve(root, loader)?;
    let model = normalize::normalize(&decls)?;
    validate_model(&model, options)?;
    Ok(model)
}
