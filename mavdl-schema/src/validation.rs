//! Cross-checks of a merged, normalized model.
//!
//! Checks run enums first, then messages, each in merge order, and the first
//! violation is returned.

use crate::error::SchemaError;
use crate::model::{MergedModel, MessageDef};
use std::collections::HashMap;
use std::fmt;

/// Caller-supplied policy deciding which message ids are acceptable.
pub type IdPredicate = Box<dyn Fn(&MessageDef) -> bool + Send + Sync>;

/// Options for [`validate_model`].
#[derive(Default)]
pub struct ValidationOptions {
    id_predicate: Option<IdPredicate>,
}

impl ValidationOptions {
    /// Creates options with no id policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects messages for which `predicate` returns false.
    #[must_use]
    pub fn with_id_predicate(
        mut self,
        predicate: impl Fn(&MessageDef) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.id_predicate = Some(Box::new(predicate));
        self
    }

    /// Rejects messages whose id is greater than `max`.
    #[must_use]
    pub fn with_max_message_id(self, max: u32) -> Self {
        self.with_id_predicate(move |msg| msg.id <= max)
    }

    fn accepts(&self, message: &MessageDef) -> bool {
        self.id_predicate.as_ref().is_none_or(|p| p(message))
    }
}

impl fmt::Debug for ValidationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationOptions")
            .field("id_predicate", &self.id_predicate.is_some())
            .finish()
    }
}

/// Validates a merged model.
///
/// # Arguments
/// * `model` - The model to validate
/// * `options` - Id policy
///
/// # Errors
/// Returns the first of `DuplicateName`, `DuplicateMessageId`,
/// `UnknownEnumReference` or `MessageIdRejected` found.
pub fn validate_model(model: &MergedModel, options: &ValidationOptions) -> Result<(), SchemaError> {
    validate_enums(model)?;
    validate_messages(model, options)?;
    Ok(())
}

fn validate_enums(model: &MergedModel) -> Result<(), SchemaError> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (idx, enum_def) in model.enums.iter().enumerate() {
        if let Some(&first) = seen.get(enum_def.name.as_str()) {
            return Err(SchemaError::DuplicateName {
                kind: "enum",
                name: enum_def.name.clone(),
                first: model.enums[first].source.display().to_string(),
                second: enum_def.source.display().to_string(),
            });
        }
        seen.insert(&enum_def.name, idx);
    }
    Ok(())
}

fn validate_messages(model: &MergedModel, options: &ValidationOptions) -> Result<(), SchemaError> {
    let mut ids: HashMap<u32, usize> = HashMap::new();
    let mut names: HashMap<&str, usize> = HashMap::new();

    for (idx, message) in model.messages.iter().enumerate() {
        if let Some(&first) = ids.get(&message.id) {
            let first = &model.messages[first];
            return Err(SchemaError::DuplicateMessageId {
                id: message.id,
                first: first.name.clone(),
                first_file: first.source.clone(),
                second: message.name.clone(),
                second_file: message.source.clone(),
            });
        }
        ids.insert(message.id, idx);

        if let Some(&first) = names.get(message.name.as_str()) {
            return Err(SchemaError::DuplicateName {
                kind: "message",
                name: message.name.clone(),
                first: model.messages[first].source.display().to_string(),
                second: message.source.display().to_string(),
            });
        }
        names.insert(&message.name, idx);

        for field in &message.fields {
            if let Some(enum_name) = &field.enum_ref
                && model.get_enum(enum_name).is_none()
            {
                return Err(SchemaError::UnknownEnumReference {
                    file: message.source.clone(),
                    message: message.name.clone(),
                    field: field.name.clone(),
                    enum_name: enum_name.clone(),
                });
            }
        }

        if !options.accepts(message) {
            return Err(SchemaError::MessageIdRejected {
                file: message.source.clone(),
                message: message.name.clone(),
                id: message.id,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DialectDocument;
    use crate::normalize;
    use std::path::Path;

    fn model(xml: &str) -> MergedModel {
        let doc = DialectDocument::parse("v.xml", xml).expect("Failed to parse");
        normalize::model_from_documents(doc.dialect_version(), vec![doc])
            .expect("Failed to normalize")
    }

    #[test]
    fn test_valid_model() {
        let model = model(
            r#"<mavlink>
    <enums><enum name="COLOR"><entry name="RED"/></enum></enums>
    <messages>
        <message id="1" name="A"><field type="uint8_t" name="c" enum="COLOR">c</field></message>
        <message id="2" name="B"><field type="uint8_t" name="x">x</field></message>
    </messages>
</mavlink>"#,
        );
        assert!(validate_model(&model, &ValidationOptions::new()).is_ok());
    }

    #[test]
    fn test_duplicate_message_id() {
        let model = model(
            r#"<mavlink><messages>
    <message id="7" name="A"/>
    <message id="7" name="B"/>
</messages></mavlink>"#,
        );
        let err = validate_model(&model, &ValidationOptions::new()).unwrap_err();
        match err {
            SchemaError::DuplicateMessageId {
                id,
                first,
                first_file,
                second,
                second_file,
            } => {
                assert_eq!(id, 7);
                assert_eq!(first, "A");
                assert_eq!(second, "B");
                assert_eq!(first_file, Path::new("v.xml"));
                assert_eq!(second_file, Path::new("v.xml"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_enum_reference() {
        let model = model(
            r#"<mavlink><messages>
    <message id="1" name="A"><field type="uint8_t" name="mode" enum="NOPE"/></message>
</messages></mavlink>"#,
        );
        let err = validate_model(&model, &ValidationOptions::new()).unwrap_err();
        assert!(
            matches!(err, SchemaError::UnknownEnumReference { ref enum_name, .. } if enum_name == "NOPE")
        );
        assert_eq!(
            err.to_string(),
            "v.xml: field 'mode' in message 'A' references unknown enum 'NOPE'"
        );
    }

    #[test]
    fn test_duplicate_names_in_programmatic_model() {
        let mut model = model(
            r#"<mavlink><enums><enum name="E"><entry name="E_A"/></enum></enums></mavlink>"#,
        );
        let copy = model.enums[0].clone();
        model.add_enum(copy);
        let err = validate_model(&model, &ValidationOptions::new()).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateName { kind: "enum", .. }));
    }

    #[test]
    fn test_enums_checked_before_messages() {
        let mut model = model(
            r#"<mavlink>
    <enums><enum name="E"><entry name="E_A"/></enum></enums>
    <messages><message id="1" name="A"/><message id="1" name="B"/></messages>
</mavlink>"#,
        );
        let copy = model.enums[0].clone();
        model.add_enum(copy);
        let err = validate_model(&model, &ValidationOptions::new()).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateName { .. }));
    }

    #[test]
    fn test_id_predicate() {
        let model = model(
            r#"<mavlink><messages><message id="300" name="BIG"/></messages></mavlink>"#,
        );
        assert!(validate_model(&model, &ValidationOptions::new().with_max_message_id(300)).is_ok());
        let err = validate_model(&model, &ValidationOptions::new().with_max_message_id(255))
            .unwrap_err();
        assert!(matches!(err, SchemaError::MessageIdRejected { id: 300, .. }));
    }
}
