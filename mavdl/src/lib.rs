//! # mavdl
//!
//! Compiler for MAVLink XML message dialects.
//!
//! A dialect is an XML file declaring enums and messages, possibly
//! including other dialect files. mavdl resolves the includes, assigns enum
//! values, puts message fields in wire order, computes each message's
//! CRC-extra byte, validates the result and generates source code.
//!
//! ## Quick Start
//!
//! In `build.rs`:
//!
//! ```ignore
//! let out_dir = std::path::PathBuf::from(std::env::var("OUT_DIR")?);
//! mavdl::codegen::compile(
//!     "message_definitions/common.xml".as_ref(),
//!     &out_dir,
//!     &mavdl::codegen::CompileOptions::new(),
//! )?;
//! ```
//!
//! Then in the crate:
//!
//! ```ignore
//! mod common {
//!     include!(concat!(env!("OUT_DIR"), "/common.rs"));
//! }
//!
//! use mavdl::prelude::*;
//!
//! let ping = common::Ping { seq: 7, ..Default::default() };
//! let payload = ping.to_bytes()?;
//! let msg = common::Message::parse(common::Ping::ID, &payload)?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`] - Runtime used by generated code: buffers, `MavMessage`, errors
//! - [`schema`] - Dialect parsing, include resolution, normalization, validation
//! - [`codegen`] - Rust and proto3 code generation

pub mod prelude;

/// Runtime types and traits used by generated code.
pub mod core {
    pub use mavdl_core::*;
}

/// Dialect parsing, normalization and validation.
pub mod schema {
    pub use mavdl_schema::*;
}

/// Code generation from dialects.
pub mod codegen {
    pub use mavdl_codegen::*;
}
