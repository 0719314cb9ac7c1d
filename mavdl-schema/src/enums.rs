//! Enum normalization: assigns a concrete value to every entry.
//!
//! Entries are walked in declaration order with a cursor starting at 0. An
//! explicit value is used as written and moves the cursor to `value + 1`; an
//! implicit entry takes the cursor. Gaps left behind an explicit value are
//! never backfilled.

use crate::document::RawEnum;
use crate::error::SchemaError;
use crate::model::{EnumDef, EnumEntryDef};
use std::collections::HashMap;
use std::path::Path;

/// Resolves the entry values of one enum.
///
/// # Arguments
/// * `raw` - Enum as declared
/// * `source` - File that declared the enum
///
/// # Errors
/// Returns `DuplicateEnumEntry` for a repeated entry name,
/// `EnumValueOverflow` for a value beyond `u32::MAX`, and
/// `DuplicateEnumValue` when two entries end up with the same value.
pub fn normalize_enum(raw: &RawEnum, source: &Path) -> Result<EnumDef, SchemaError> {
    let values = assign_values(raw, source)?;

    let mut names: HashMap<&str, usize> = HashMap::new();
    let mut owners: HashMap<u32, usize> = HashMap::new();
    for (idx, (entry, &value)) in raw.entries.iter().zip(&values).enumerate() {
        if names.insert(entry.name.as_str(), idx).is_some() {
            return Err(SchemaError::DuplicateEnumEntry {
                file: source.to_path_buf(),
                enum_name: raw.name.clone(),
                entry: entry.name.clone(),
            });
        }
        if let Some(&first) = owners.get(&value) {
            return Err(SchemaError::DuplicateEnumValue {
                file: source.to_path_buf(),
                enum_name: raw.name.clone(),
                first: raw.entries[first].name.clone(),
                second: entry.name.clone(),
                value,
            });
        }
        owners.insert(value, idx);
    }

    let entries = raw
        .entries
        .iter()
        .zip(values)
        .map(|(entry, value)| EnumEntryDef {
            name: entry.name.clone(),
            value,
            description: entry.description.clone(),
            display: entry.display.clone(),
            params: entry.params.clone(),
            deprecated: entry.deprecated.clone(),
        })
        .collect();

    Ok(EnumDef {
        name: raw.name.clone(),
        entries,
        description: raw.description.clone(),
        bitmask: raw.bitmask,
        deprecated: raw.deprecated.clone(),
        source: source.to_path_buf(),
    })
}

/// Applies the cursor rule to every entry.
fn assign_values(raw: &RawEnum, source: &Path) -> Result<Vec<u32>, SchemaError> {
    let mut cursor: u64 = 0;
    let mut values = Vec::with_capacity(raw.entries.len());

    for entry in &raw.entries {
        let value = entry.value.unwrap_or(cursor);
        let value = u32::try_from(value).map_err(|_| SchemaError::EnumValueOverflow {
            file: source.to_path_buf(),
            enum_name: raw.name.clone(),
            entry: entry.name.clone(),
        })?;
        values.push(value);
        cursor = u64::from(value) + 1;
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::RawEntry;
    use proptest::prelude::*;

    fn raw_enum(name: &str, entries: &[(&str, Option<u64>)]) -> RawEnum {
        RawEnum {
            name: name.to_string(),
            entries: entries
                .iter()
                .map(|&(entry, value)| RawEntry {
                    name: entry.to_string(),
                    value,
                    ..RawEntry::default()
                })
                .collect(),
            ..RawEnum::default()
        }
    }

    fn values(def: &EnumDef) -> Vec<u32> {
        def.entries.iter().map(|e| e.value).collect()
    }

    #[test]
    fn test_implicit_continues_after_explicit() {
        let raw = raw_enum(
            "E",
            &[("A", None), ("B", None), ("C", Some(100)), ("D", None)],
        );
        let def = normalize_enum(&raw, Path::new("e.xml")).expect("Failed to normalize");
        assert_eq!(values(&def), vec![0, 1, 100, 101]);
    }

    #[test]
    fn test_name_carries_no_value_hint() {
        let raw = raw_enum(
            "MAV_NO_VAL_100",
            &[
                ("MAV_TYPE_ONE_101", None),
                ("MAV_TYPE_HUNDRED", Some(100)),
                ("MAV_TYPE_THREE_102", None),
            ],
        );
        let def = normalize_enum(&raw, Path::new("test.xml")).expect("Failed to normalize");
        assert_eq!(values(&def), vec![0, 100, 101]);
        assert_eq!(def.source, Path::new("test.xml"));
    }

    #[test]
    fn test_explicit_lower_value_does_not_renumber() {
        let raw = raw_enum("E", &[("A", Some(10)), ("B", Some(3)), ("C", None)]);
        let def = normalize_enum(&raw, Path::new("e.xml")).expect("Failed to normalize");
        assert_eq!(values(&def), vec![10, 3, 4]);
    }

    #[test]
    fn test_explicit_collides_with_implicit() {
        let raw = raw_enum("E", &[("A", None), ("B", None), ("C", Some(1))]);
        let err = normalize_enum(&raw, Path::new("e.xml")).unwrap_err();
        match err {
            SchemaError::DuplicateEnumValue {
                file,
                enum_name,
                first,
                second,
                value,
            } => {
                assert_eq!(file, Path::new("e.xml"));
                assert_eq!(enum_name, "E");
                assert_eq!(first, "B");
                assert_eq!(second, "C");
                assert_eq!(value, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_implicit_runs_into_explicit() {
        let raw = raw_enum("E", &[("A", Some(5)), ("B", Some(2)), ("C", None), ("D", None), ("E", None)]);
        let err = normalize_enum(&raw, Path::new("e.xml")).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateEnumValue { value: 5, .. }));
    }

    #[test]
    fn test_duplicate_entry_name() {
        let raw = raw_enum("E", &[("A", None), ("A", Some(7))]);
        let err = normalize_enum(&raw, Path::new("e.xml")).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateEnumEntry { .. }));
        assert_eq!(err.to_string(), "e.xml: duplicate entry 'A' in enum 'E'");
    }

    #[test]
    fn test_value_overflow() {
        let raw = raw_enum("E", &[("A", Some(u64::from(u32::MAX))), ("B", None)]);
        let err = normalize_enum(&raw, Path::new("e.xml")).unwrap_err();
        assert!(matches!(err, SchemaError::EnumValueOverflow { ref entry, .. } if entry == "B"));
        assert!(err.to_string().starts_with("e.xml: "));
    }

    proptest! {
        #[test]
        fn prop_normalized_values_are_unique(
            specs in proptest::collection::vec(proptest::option::of(0u64..64), 0..24)
        ) {
            let entries: Vec<(String, Option<u64>)> = specs
                .iter()
                .enumerate()
                .map(|(i, v)| (format!("ENTRY_{i}"), *v))
                .collect();
            let borrowed: Vec<(&str, Option<u64>)> =
                entries.iter().map(|(n, v)| (n.as_str(), *v)).collect();
            let raw = raw_enum("PROP", &borrowed);

            if let Ok(def) = normalize_enum(&raw, Path::new("prop.xml")) {
                let mut seen = std::collections::HashSet::new();
                for entry in &def.entries {
                    prop_assert!(seen.insert(entry.value));
                }
                prop_assert_eq!(def.entries.len(), specs.len());
            }
        }

        #[test]
        fn prop_implicit_only_counts_up(len in 0usize..32) {
            let names: Vec<String> = (0..len).map(|i| format!("E{i}")).collect();
            let entries: Vec<(&str, Option<u64>)> =
                names.iter().map(|n| (n.as_str(), None)).collect();
            let def = normalize_enum(&raw_enum("SEQ", &entries), Path::new("s.xml"))
                .expect("implicit-only enums never collide");
            let expected: Vec<u32> = (0..len as u32).collect();
            prop_assert_eq!(values(&def), expected);
        }
    }
}
