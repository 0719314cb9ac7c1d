//! Prelude module for convenient imports.
//!
//! ```ignore
//! use mavdl::prelude::*;
//! ```

// Runtime
pub use mavdl_core::{Error as CoreError, MavMessage, ReadBuffer, Result as CoreResult, WriteBuffer};

// Schema
pub use mavdl_schema::{
    FieldValue, MergedModel, MessageDef, SchemaError, ValidationOptions, load_dialect,
};

// Codegen
pub use mavdl_codegen::{CodegenError, CompileOptions, Target, compile};
