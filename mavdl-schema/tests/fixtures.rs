//! Loads the fixture dialects from `message_definitions/`.

use mavdl_schema::{
    FieldType, MemoryLoader, Primitive, SchemaError, ValidationOptions, load_dialect,
    load_dialect_with,
};
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("message_definitions")
        .join(name)
}

#[test]
fn test_merge_order_and_dialect() {
    let model = load_dialect(&fixture("test_dialect.xml")).expect("Failed to load dialect");
    assert_eq!(model.dialect, 2);

    let enums: Vec<_> = model.enums.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        enums,
        vec!["MAV_STATE", "MAV_AUTOPILOT", "MAV_NO_VAL_100", "TEST_FLAGS"]
    );
    let messages: Vec<_> = model.messages.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(
        messages,
        vec!["HEARTBEAT", "STATUS_REPORT", "PING", "TEST_TYPES"]
    );
    assert!(model.messages[0].source.ends_with("base.xml"));
    assert!(model.messages[3].source.ends_with("test_dialect.xml"));
}

#[test]
fn test_commented_enum_is_ignored() {
    let model = load_dialect(&fixture("test_dialect.xml")).expect("Failed to load dialect");
    assert!(model.get_enum("MAV_COLLIDING").is_none());
}

#[test]
fn test_enum_values() {
    let model = load_dialect(&fixture("test_dialect.xml")).expect("Failed to load dialect");
    let values = |name: &str| -> Vec<u32> {
        model
            .get_enum(name)
            .expect("enum missing")
            .entries
            .iter()
            .map(|e| e.value)
            .collect()
    };
    assert_eq!(values("MAV_NO_VAL_100"), vec![0, 100, 101]);
    assert_eq!(values("MAV_STATE"), vec![0, 1, 2, 3, 4]);
    assert_eq!(values("MAV_AUTOPILOT"), vec![0, 3, 12]);
    assert_eq!(values("TEST_FLAGS"), vec![1, 2, 4]);

    let flags = model.get_enum("TEST_FLAGS").expect("enum missing");
    assert!(flags.bitmask);
    let gamma = flags.entry_by_value(4).expect("entry missing");
    let dep = gamma.deprecated.as_ref().expect("deprecation missing");
    assert_eq!(dep.replaced_by.as_deref(), Some("TEST_FLAGS_BETA"));
}

#[test]
fn test_test_types_layout() {
    let model = load_dialect(&fixture("test_dialect.xml")).expect("Failed to load dialect");
    let msg = model.message_by_id(1000).expect("TEST_TYPES missing");

    let wire: Vec<_> = msg
        .wire_fields()
        .map(|f| (f.name.as_str(), f.offset))
        .collect();
    assert_eq!(
        wire,
        vec![
            ("altitude", Some(0)),
            ("flags", Some(8)),
            ("big", Some(12)),
            ("samples", Some(172)),
            ("mode", Some(180)),
            ("text", Some(181)),
            ("type", Some(213)),
            ("ext_value", Some(214)),
            ("mavlink_version", None),
        ]
    );
    assert_eq!(msg.base_len, 214);
    assert_eq!(msg.encoded_len, 216);
    assert_eq!(msg.crc_extra, 230);

    let text = msg.fields.iter().find(|f| f.name == "text").expect("text missing");
    assert_eq!(text.ty, FieldType::String(32));
    let big = msg.fields.iter().find(|f| f.name == "big").expect("big missing");
    assert_eq!(big.ty, FieldType::Array(Primitive::Float, 40));
    let ext = msg.fields.iter().find(|f| f.name == "ext_value").expect("ext missing");
    assert!(ext.is_extension);
}

#[test]
fn test_base_crc_values() {
    let model = load_dialect(&fixture("base.xml")).expect("Failed to load dialect");
    assert_eq!(model.dialect, 0);
    let crc = |name: &str| model.get_message(name).expect("message missing").crc_extra;
    assert_eq!(crc("PING"), 237);
    assert_eq!(crc("HEARTBEAT"), 172);
    assert_eq!(crc("STATUS_REPORT"), 43);
}

#[test]
fn test_missing_root() {
    let root = fixture("does_not_exist.xml");
    let err = load_dialect(&root).unwrap_err();
    match err {
        SchemaError::Io { path, source } => {
            assert_eq!(path, root);
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn split_dialect(base: &str, root: &str) -> MemoryLoader {
    MemoryLoader::new()
        .with("defs/base.xml", format!("<mavlink>{base}</mavlink>"))
        .with(
            "defs/root.xml",
            format!("<mavlink><include>base.xml</include>{root}</mavlink>"),
        )
}

fn load_split(loader: &MemoryLoader) -> SchemaError {
    load_dialect_with(
        Path::new("defs/root.xml"),
        loader,
        &ValidationOptions::new(),
    )
    .unwrap_err()
}

#[test]
fn test_duplicate_id_across_files_names_both() {
    let loader = split_dialect(
        r#"<messages><message id="5" name="BASE_MSG"/></messages>"#,
        r#"<messages><message id="5" name="ROOT_MSG"/></messages>"#,
    );
    match load_split(&loader) {
        SchemaError::DuplicateMessageId {
            id,
            first,
            first_file,
            second,
            second_file,
        } => {
            assert_eq!(id, 5);
            assert_eq!(first, "BASE_MSG");
            assert_eq!(first_file, Path::new("defs/base.xml"));
            assert_eq!(second, "ROOT_MSG");
            assert_eq!(second_file, Path::new("defs/root.xml"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_normalizer_errors_name_included_file() {
    let loader = split_dialect(
        r#"<messages><message id="1" name="BASE_MSG"><field type="uint24_t" name="y">y</field></message></messages>"#,
        "",
    );
    let err = load_split(&loader);
    assert!(matches!(
        err,
        SchemaError::UnknownFieldType { ref file, .. } if file == Path::new("defs/base.xml")
    ));
    assert!(err.to_string().contains("base.xml"));

    let loader = split_dialect(
        r#"<enums><enum name="E"><entry value="0" name="A"/><entry value="0" name="B"/></enum></enums>"#,
        "",
    );
    let err = load_split(&loader);
    assert!(matches!(
        err,
        SchemaError::DuplicateEnumValue { ref file, .. } if file == Path::new("defs/base.xml")
    ));
}
