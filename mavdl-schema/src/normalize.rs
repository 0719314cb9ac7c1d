//! Builds a [`MergedModel`] from resolved declarations.

use crate::document::DialectDocument;
use crate::enums::normalize_enum;
use crate::error::SchemaError;
use crate::messages::normalize_message;
use crate::model::MergedModel;
use crate::resolver::Declarations;
use tracing::debug;

/// Normalizes every enum, then every message, in merge order.
///
/// # Errors
/// Returns the first normalization error.
pub fn normalize(decls: &Declarations) -> Result<MergedModel, SchemaError> {
    let mut model = MergedModel::new(decls.dialect);

    for raw in &decls.enums {
        model.add_enum(normalize_enum(&raw.item, &raw.source)?);
    }
    for raw in &decls.messages {
        model.add_message(normalize_message(&raw.item, &raw.source)?);
    }

    debug!(
        dialect = model.dialect,
        enums = model.enums.len(),
        messages = model.messages.len(),
        "normalized dialect"
    );
    Ok(model)
}

/// Normalizes already-parsed documents, taken in the given order.
///
/// This builds a model from documents held in memory without touching the
/// filesystem. Includes are not followed, so callers pass every document they
/// want merged, base files first. Name collisions are left to
/// [`validate_model`](crate::validate_model), which should run on the result.
///
/// # Example
/// ```
/// use mavdl_schema::{DialectDocument, ValidationOptions, model_from_documents, validate_model};
///
/// let base = DialectDocument::parse(
///     "base.xml",
///     r#"<mavlink><enums><enum name="MODE"><entry name="MODE_OFF"/></enum></enums></mavlink>"#,
/// )?;
/// let root = DialectDocument::parse(
///     "root.xml",
///     r#"<mavlink><dialect>4</dialect><messages>
///         <message id="1" name="STATUS"><field type="uint8_t" name="mode" enum="MODE">m</field></message>
///     </messages></mavlink>"#,
/// )?;
/// let model = model_from_documents(root.dialect_version(), vec![base, root])?;
/// validate_model(&model, &ValidationOptions::new())?;
/// assert_eq!(model.dialect, 4);
/// assert_eq!(model.messages[0].encoded_len, 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Errors
/// Returns the first normalization error.
pub fn model_from_documents(
    dialect: u32,
    documents: Vec<DialectDocument>,
) -> Result<MergedModel, SchemaError> {
    let mut model = MergedModel::new(dialect);
    for doc in &documents {
        for raw in &doc.enums {
            model.add_enum(normalize_enum(raw, &doc.path)?);
        }
    }
    for doc in &documents {
        for raw in &doc.messages {
            model.add_message(normalize_message(raw, &doc.path)?);
        }
    }
    Ok(model)
}
