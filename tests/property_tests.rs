//! Property-based tests for datum metadata.
//!
//! These tests use proptest to check that encoding round trips and
//! that the null-removal invariants hold across random mutations.

use proptest::prelude::*;

use datum_metadata::{DatumMetadata, InfoMap, InfoValue};

/// Strategy for metadata keys.
fn key() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9_.]{0,8}"
}

/// Strategy for exact numbers, both integer and decimal text.
fn number() -> impl Strategy<Value = InfoValue> {
    prop_oneof![
        any::<i64>().prop_map(InfoValue::from),
        any::<u64>().prop_map(InfoValue::from),
        (any::<i32>(), "[0-9]{1,6}").prop_map(|(whole, fraction)| {
            InfoValue::decimal(&format!("{whole}.{fraction}")).expect("valid decimal")
        }),
    ]
}

/// Strategy for info values, including nested maps.
fn info_value() -> impl Strategy<Value = InfoValue> {
    let leaf = prop_oneof![
        ".{0,12}".prop_map(InfoValue::String),
        number(),
        any::<bool>().prop_map(InfoValue::Boolean),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop::collection::vec((key(), inner), 0..4)
            .prop_map(|entries| InfoValue::Map(entries.into_iter().collect()))
    })
}

/// A mutation of metadata.
#[derive(Debug, Clone)]
enum Mutation {
    PutInfo(String, Option<InfoValue>),
    PutPropertyInfo(String, String, Option<InfoValue>),
    AddTag(String),
    RemoveTag(String),
}

fn mutation() -> impl Strategy<Value = Mutation> {
    prop_oneof![
        (key(), prop::option::of(info_value())).prop_map(|(k, v)| Mutation::PutInfo(k, v)),
        (key(), key(), prop::option::of(info_value()))
            .prop_map(|(p, k, v)| Mutation::PutPropertyInfo(p, k, v)),
        key().prop_map(Mutation::AddTag),
        key().prop_map(Mutation::RemoveTag),
    ]
}

fn apply(mutations: &[Mutation]) -> DatumMetadata {
    let mut metadata = DatumMetadata::new();
    for mutation in mutations {
        match mutation.clone() {
            Mutation::PutInfo(key, value) => metadata.put_info_value(&key, value),
            Mutation::PutPropertyInfo(property, key, value) => {
                metadata.put_property_info_value(&property, &key, value);
            }
            Mutation::AddTag(tag) => metadata.add_tag(tag),
            Mutation::RemoveTag(tag) => metadata.remove_tag(&tag),
        }
    }
    metadata
}

proptest! {
    #[test]
    fn round_trip(mutations in prop::collection::vec(mutation(), 0..24)) {
        let metadata = apply(&mutations);
        let decoded = DatumMetadata::from_json(&metadata.to_json()).unwrap();
        prop_assert_eq!(&decoded, &metadata);
        prop_assert_eq!(decoded.to_json(), metadata.to_json());
    }

    #[test]
    fn no_empty_property_info(mutations in prop::collection::vec(mutation(), 0..24)) {
        let metadata = apply(&mutations);
        for (property, info) in metadata.property_infos() {
            prop_assert!(!info.is_empty(), "property {} has empty info", property);
        }
        let json = metadata.to_value();
        if metadata.info().is_empty() {
            prop_assert!(json.get("m").is_none());
        }
        if metadata.property_infos().is_empty() {
            prop_assert!(json.get("pm").is_none());
        }
        if metadata.tags().is_empty() {
            prop_assert!(json.get("t").is_none());
        }
    }

    #[test]
    fn put_none_removes(
        mutations in prop::collection::vec(mutation(), 0..24),
        property in key(),
        key in key(),
    ) {
        let mut metadata = apply(&mutations);
        metadata.put_info_value(&key, None);
        prop_assert!(metadata.info_value(&key).is_none());
        let remaining = metadata
            .property_info(&property)
            .map_or(0, |info| info.len() - usize::from(info.contains_key(&key)));
        metadata.put_property_info_value(&property, &key, None);
        prop_assert!(metadata.property_info_value(&property, &key).is_none());
        prop_assert_eq!(metadata.property_info(&property).map_or(0, InfoMap::len), remaining);
    }

    #[test]
    fn add_tag_idempotent(mutations in prop::collection::vec(mutation(), 0..24), tag in key()) {
        let mut metadata = apply(&mutations);
        metadata.add_tag(tag.clone());
        let len = metadata.tags().len();
        metadata.add_tag(tag.clone());
        prop_assert_eq!(metadata.tags().len(), len);
        prop_assert!(metadata.has_tag(&tag));
    }
}
