//! Output strategies.
//!
//! Every target language implements [`Emitter`]. The driver feeds it each
//! enum, then each message, in merge order, and collects the artifacts
//! returned by [`Emitter::finalize`].

use crate::error::CodegenError;
use crate::options::CompileOptions;
use crate::protobuf::ProtoEmitter;
use crate::rust::RustEmitter;
use mavdl_schema::{EnumDef, MergedModel, MessageDef};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// One generated source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// File name relative to the output directory.
    pub file_name: String,
    /// File contents.
    pub contents: String,
}

/// Capability set of a target language.
pub trait Emitter {
    /// Emits the type for one enum.
    ///
    /// # Errors
    /// Returns `Generation` if the enum cannot be expressed in the target.
    fn emit_enum(&mut self, enum_def: &EnumDef) -> Result<(), CodegenError>;

    /// Emits the type and routines for one message.
    ///
    /// # Errors
    /// Returns `Generation` if the message cannot be expressed in the target.
    fn emit_message(&mut self, message: &MessageDef) -> Result<(), CodegenError>;

    /// Assembles everything emitted so far into artifacts.
    ///
    /// # Errors
    /// Returns `Generation` if the emitted items conflict.
    fn finalize(&mut self) -> Result<Vec<Artifact>, CodegenError>;
}

/// Feeds a whole model through an emitter.
///
/// # Errors
/// Propagates the first emitter error.
pub fn run<E: Emitter + ?Sized>(
    emitter: &mut E,
    model: &MergedModel,
) -> Result<Vec<Artifact>, CodegenError> {
    for enum_def in &model.enums {
        emitter.emit_enum(enum_def)?;
    }
    for message in &model.messages {
        emitter.emit_message(message)?;
    }
    let artifacts = emitter.finalize()?;
    for artifact in &artifacts {
        debug!(
            file = %artifact.file_name,
            bytes = artifact.contents.len(),
            "emitted artifact"
        );
    }
    Ok(artifacts)
}

/// Target language of the generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Target {
    /// Rust source, one file meant for `include!`.
    #[default]
    Rust,
    /// A proto3 schema.
    Protobuf,
}

impl Target {
    /// Every supported target.
    pub const ALL: [Target; 2] = [Target::Rust, Target::Protobuf];

    /// Returns the name used to select the target.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rust => "rust",
            Self::Protobuf => "protobuf",
        }
    }

    /// Generates the artifacts of this target for a validated model.
    ///
    /// # Errors
    /// Returns `Generation` if the model cannot be expressed in the target.
    pub fn emit(
        self,
        model: &MergedModel,
        module: &str,
        options: &CompileOptions,
    ) -> Result<Vec<Artifact>, CodegenError> {
        match self {
            Self::Rust => run(&mut RustEmitter::new(module, model.dialect, options), model),
            Self::Protobuf => run(&mut ProtoEmitter::new(module, options), model),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Target {
    type Err = CodegenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rust" | "rs" => Ok(Self::Rust),
            "protobuf" | "proto" => Ok(Self::Protobuf),
            _ => Err(CodegenError::UnknownTarget {
                name: s.to_string(),
            }),
        }
    }
}
