//! Compile configuration.

use crate::emitter::Target;
use mavdl_schema::{MessageDef, ValidationOptions};

/// Default path of the runtime crate referenced by generated Rust code.
pub const DEFAULT_RUNTIME_PATH: &str = "::mavdl_core";

/// Options for [`crate::compile`] and [`crate::generate`].
///
/// # Example
/// ```
/// use mavdl_codegen::{CompileOptions, Target};
///
/// let options = CompileOptions::new()
///     .target(Target::Protobuf)
///     .module_name("common")
///     .docs(false)
///     .max_message_id(255);
/// assert_eq!(options.get_target(), Target::Protobuf);
/// ```
#[derive(Debug)]
pub struct CompileOptions {
    pub(crate) target: Target,
    pub(crate) module_name: Option<String>,
    pub(crate) docs: bool,
    pub(crate) runtime_path: String,
    pub(crate) validation: ValidationOptions,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl CompileOptions {
    /// Creates options for the Rust target with documentation enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            target: Target::Rust,
            module_name: None,
            docs: true,
            runtime_path: DEFAULT_RUNTIME_PATH.to_string(),
            validation: ValidationOptions::new(),
        }
    }

    /// Sets the target language.
    #[must_use]
    pub fn target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    /// Overrides the module name, which otherwise comes from the root file
    /// name.
    #[must_use]
    pub fn module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = Some(name.into());
        self
    }

    /// Enables or disables doc comments in the output.
    #[must_use]
    pub fn docs(mut self, enabled: bool) -> Self {
        self.docs = enabled;
        self
    }

    /// Sets the path under which generated Rust code finds the runtime.
    #[must_use]
    pub fn runtime_path(mut self, path: impl Into<String>) -> Self {
        self.runtime_path = path.into();
        self
    }

    /// Rejects messages for which `predicate` returns false.
    #[must_use]
    pub fn id_predicate(
        mut self,
        predicate: impl Fn(&MessageDef) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.validation = self.validation.with_id_predicate(predicate);
        self
    }

    /// Rejects messages whose id is greater than `max`.
    #[must_use]
    pub fn max_message_id(mut self, max: u32) -> Self {
        self.validation = self.validation.with_max_message_id(max);
        self
    }

    /// Returns the selected target.
    #[must_use]
    pub fn get_target(&self) -> Target {
        self.target
    }

    /// Returns the validation policy.
    #[must_use]
    pub fn validation(&self) -> &ValidationOptions {
        &self.validation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CompileOptions::default();
        assert_eq!(options.get_target(), Target::Rust);
        assert!(options.docs);
        assert_eq!(options.runtime_path, DEFAULT_RUNTIME_PATH);
        assert!(options.module_name.is_none());
    }

    #[test]
    fn test_builder() {
        let options = CompileOptions::new()
            .target(Target::Protobuf)
            .module_name("common")
            .docs(false)
            .runtime_path("crate::rt");
        assert_eq!(options.get_target(), Target::Protobuf);
        assert_eq!(options.module_name.as_deref(), Some("common"));
        assert!(!options.docs);
        assert_eq!(options.runtime_path, "crate::rt");
    }
}
