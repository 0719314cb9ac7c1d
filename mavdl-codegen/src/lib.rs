//! # mavdl codegen
//!
//! Code generation from MAVLink XML dialects.
//!
//! This crate provides:
//! - The [`Emitter`] capability set implemented by every target language
//! - A Rust target producing message structs, enums and their codecs
//! - A proto3 target
//! - The [`compile`] entry point used by build scripts and the CLI
//!
//! # Build script
//! ```ignore
//! fn main() {
//!     let out_dir = std::path::PathBuf::from(std::env::var("OUT_DIR").unwrap());
//!     mavdl_codegen::compile(
//!         "message_definitions/common.xml".as_ref(),
//!         &out_dir,
//!         &mavdl_codegen::CompileOptions::new(),
//!     )
//!     .unwrap();
//! }
//! ```

pub mod emitter;
pub mod error;
pub mod naming;
pub mod options;
pub mod protobuf;
pub mod rust;

pub use emitter::{Artifact, Emitter, Target};
pub use error::CodegenError;
pub use options::CompileOptions;

use mavdl_schema::{FsLoader, MemoryLoader, MergedModel, load_dialect_with};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Compiles a dialect and writes the generated artifacts.
///
/// # Arguments
/// * `root` - Root dialect file
/// * `out_dir` - Directory receiving the artifacts; created if missing
/// * `options` - Target and policies
///
/// # Returns
/// Paths of the artifacts written, in emission order.
///
/// # Errors
/// Returns `Schema` for any load, normalization or validation failure,
/// `Generation` if the model cannot be expressed in the target, and `Io` if
/// an artifact cannot be written. Nothing is written on schema errors.
pub fn compile(
    root: &Path,
    out_dir: &Path,
    options: &CompileOptions,
) -> Result<Vec<PathBuf>, CodegenError> {
    let model = load_dialect_with(root, &FsLoader, options.validation())?;
    let module = options
        .module_name
        .as_deref()
        .map_or_else(|| naming::module_name(root), naming::sanitize_module);
    let artifacts = generate(&model, &module, options)?;

    fs::create_dir_all(out_dir).map_err(|source| CodegenError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;
    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in &artifacts {
        let path = out_dir.join(&artifact.file_name);
        fs::write(&path, &artifact.contents).map_err(|source| CodegenError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "wrote artifact");
        written.push(path);
    }

    info!(
        root = %root.display(),
        target = %options.target,
        enums = model.enums.len(),
        messages = model.messages.len(),
        artifacts = written.len(),
        "compiled dialect"
    );
    Ok(written)
}

/// Compiles a dialect for the target named `target`, with default options.
///
/// # Errors
/// Returns `UnknownTarget` for an unrecognized target name, otherwise as
/// [`compile`].
pub fn compile_for(
    root: &Path,
    out_dir: &Path,
    target: &str,
) -> Result<Vec<PathBuf>, CodegenError> {
    compile(root, out_dir, &CompileOptions::new().target(target.parse()?))
}

/// Generates artifacts for an already validated model.
///
/// # Errors
/// Returns `Generation` if the model cannot be expressed in the target.
pub fn generate(
    model: &MergedModel,
    module: &str,
    options: &CompileOptions,
) -> Result<Vec<Artifact>, CodegenError> {
    options.target.emit(model, module, options)
}

/// Generates artifacts from a single dialect document held in memory.
///
/// The document cannot include other files. The module name defaults to
/// `dialect`.
///
/// # Errors
/// Returns `CodegenError` if parsing, validation or generation fails.
pub fn generate_from_xml(
    xml: &str,
    options: &CompileOptions,
) -> Result<Vec<Artifact>, CodegenError> {
    let root = Path::new("dialect.xml");
    let loader = MemoryLoader::new().with(root, xml);
    let model = load_dialect_with(root, &loader, options.validation())?;
    let module = options
        .module_name
        .as_deref()
        .map_or_else(|| naming::module_name(root), naming::sanitize_module);
    generate(&model, &module, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mavdl_schema::SchemaError;

    const DIALECT: &str = r#"<?xml version="1.0"?>
<mavlink>
    <version>3</version>
    <dialect>1</dialect>
    <enums>
        <enum name="MAV_STATE">
            <entry value="0" name="MAV_STATE_UNINIT"/>
            <entry name="MAV_STATE_BOOT"/>
        </enum>
    </enums>
    <messages>
        <message id="0" name="HEARTBEAT">
            <field type="uint32_t" name="custom_mode">Custom mode</field>
            <field type="uint8_t" name="system_status" enum="MAV_STATE">Status</field>
            <field type="uint8_t_mavlink_version" name="mavlink_version">Version</field>
        </message>
        <message id="300" name="BIG_ID">
            <field type="char[10]" name="name">Name</field>
        </message>
    </messages>
</mavlink>"#;

    #[test]
    fn test_generate_from_xml_rust() {
        let artifacts = generate_from_xml(DIALECT, &CompileOptions::new()).expect("Failed to generate");
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].file_name, "dialect.rs");
        let code = &artifacts[0].contents;
        assert!(code.contains("pub const DIALECT: u32 = 1;"));
        assert!(code.contains("pub enum MavState {"));
        assert!(code.contains("pub struct Heartbeat {"));
        assert!(code.contains("pub struct BigId {"));
        syn::parse_file(code).expect("generated code does not parse");
    }

    #[test]
    fn test_generate_from_xml_protobuf() {
        let options = CompileOptions::new()
            .target(Target::Protobuf)
            .module_name("Mav Test");
        let artifacts = generate_from_xml(DIALECT, &options).expect("Failed to generate");
        assert_eq!(artifacts[0].file_name, "mav_test.proto");
        assert!(artifacts[0].contents.contains("package mav_test;"));
        assert!(artifacts[0].contents.contains("message BIG_ID {  // MavLink id: 300"));
    }

    #[test]
    fn test_id_predicate_rejects() {
        let options = CompileOptions::new().max_message_id(255);
        let err = generate_from_xml(DIALECT, &options).unwrap_err();
        assert!(matches!(
            err,
            CodegenError::Schema(SchemaError::MessageIdRejected { id: 300, .. })
        ));
    }

    #[test]
    fn test_compile_writes_artifacts() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let root = dir.path().join("minimal.xml");
        fs::write(&root, DIALECT).expect("Failed to write dialect");
        let out = dir.path().join("out").join("nested");

        let written = compile(&root, &out, &CompileOptions::new()).expect("Failed to compile");
        assert_eq!(written, vec![out.join("minimal.rs")]);
        let code = fs::read_to_string(&written[0]).expect("Failed to read artifact");
        assert!(code.starts_with("// Generated by mavdl from the `minimal` dialect."));
    }

    #[test]
    fn test_compile_for_target_name() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let root = dir.path().join("minimal.xml");
        fs::write(&root, DIALECT).expect("Failed to write dialect");

        let written = compile_for(&root, dir.path(), "protobuf").expect("Failed to compile");
        assert_eq!(written, vec![dir.path().join("minimal.proto")]);

        let err = compile_for(&root, dir.path(), "fortran").unwrap_err();
        assert!(matches!(err, CodegenError::UnknownTarget { .. }));
    }

    #[test]
    fn test_compile_writes_nothing_on_error() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let root = dir.path().join("broken.xml");
        fs::write(
            &root,
            r#"<mavlink><include>missing.xml</include></mavlink>"#,
        )
        .expect("Failed to write dialect");
        let out = dir.path().join("out");

        let err = compile(&root, &out, &CompileOptions::new()).unwrap_err();
        assert!(matches!(
            err,
            CodegenError::Schema(SchemaError::IncludeNotFound { .. })
        ));
        assert!(!out.exists());
    }
}
