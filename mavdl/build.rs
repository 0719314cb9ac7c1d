//! Compiles the fixture dialect so the integration tests and benches can
//! exercise real generated code.

use mavdl_codegen::{CompileOptions, compile};
use std::env;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let definitions = manifest_dir.join("..").join("message_definitions");
    let out_dir = PathBuf::from(env::var("OUT_DIR")?);

    for file in ["base.xml", "test_dialect.xml", "std_names.xml"] {
        println!("cargo:rerun-if-changed={}", definitions.join(file).display());
    }
    compile(
        &definitions.join("test_dialect.xml"),
        &out_dir,
        &CompileOptions::new().module_name("test_dialect"),
    )?;
    compile(
        &definitions.join("std_names.xml"),
        &out_dir,
        &CompileOptions::new(),
    )?;
    Ok(())
}
