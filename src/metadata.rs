//! Datum metadata.

use derive_more::Display;
use serde_json::{Number, Value};

use crate::{
    codec::{decode, DecodeOptions, MetadataDecodeError},
    value::{InfoMap, InfoValue, PropertyInfoMap, TagSet},
};

/// Metadata attached to a datum.
///
/// Holds three independent collections:
///  - the info map: arbitrary key/value metadata,
///  - property info: per-property info maps, e.g. the unit of a numeric property,
///  - tags: a set of classification labels.
///
/// Values are written with an [`Option`], where [`None`] removes the key.
/// A property whose info map becomes empty is removed entirely.
///
/// See [`codec`](crate::codec) for the compact JSON encoding, which is used by the [`Serialize`](serde::Serialize) and [`Deserialize`](serde::Deserialize) implementations.
///
/// ```rust
/// # use datum_metadata::DatumMetadata;
/// let mut metadata = DatumMetadata::new();
/// metadata.put_info_value("msg", Some("Hello, world.".into()));
/// metadata.put_property_info_value("watts", "unit", Some("W".into()));
/// metadata.add_tag("test");
/// assert_eq!(
///     metadata.to_json(),
///     r#"{"m":{"msg":"Hello, world."},"pm":{"watts":{"unit":"W"}},"t":["test"]}"#
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Display)]
#[display("{}", serde_json::to_string(self).unwrap_or_default())]
pub struct DatumMetadata {
    info: InfoMap,
    property_info: PropertyInfoMap,
    tags: TagSet,
}

impl TryFrom<&str> for DatumMetadata {
    type Error = MetadataDecodeError;

    fn try_from(json: &str) -> Result<Self, Self::Error> {
        Self::from_json(json)
    }
}

impl DatumMetadata {
    /// Create empty metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(info: InfoMap, property_info: PropertyInfoMap, tags: TagSet) -> Self {
        Self {
            info,
            property_info,
            tags,
        }
    }

    /// Decode metadata from its compact JSON encoding.
    ///
    /// # Errors
    /// Returns a [`MetadataDecodeError`] if `json` is malformed or does not have the expected structure.
    pub fn from_json(json: &str) -> Result<Self, MetadataDecodeError> {
        Self::from_json_with_options(json, &DecodeOptions::default())
    }

    /// Decode metadata from its compact JSON encoding with non-default options.
    ///
    /// # Errors
    /// Returns a [`MetadataDecodeError`] if `json` is malformed or does not have the expected structure.
    pub fn from_json_with_options(
        json: &str,
        options: &DecodeOptions,
    ) -> Result<Self, MetadataDecodeError> {
        let value: Value = serde_json::from_str(json).map_err(|err| {
            tracing::debug!(%err, "malformed metadata JSON");
            err
        })?;
        Self::from_value_with_options(value, options)
    }

    /// Decode metadata from a parsed JSON value.
    ///
    /// # Errors
    /// Returns a [`MetadataDecodeError`] if `value` does not have the expected structure.
    pub fn from_value(value: Value) -> Result<Self, MetadataDecodeError> {
        Self::from_value_with_options(value, &DecodeOptions::default())
    }

    /// Decode metadata from a parsed JSON value with non-default options.
    ///
    /// # Errors
    /// Returns a [`MetadataDecodeError`] if `value` does not have the expected structure.
    pub fn from_value_with_options(
        value: Value,
        options: &DecodeOptions,
    ) -> Result<Self, MetadataDecodeError> {
        decode(value, options).map_err(|err| {
            tracing::debug!(%err, "invalid metadata");
            err
        })
    }

    /// Encode the metadata as compact JSON.
    #[allow(clippy::missing_panics_doc)]
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("datum metadata is valid JSON")
    }

    /// Encode the metadata as pretty-printed JSON.
    #[allow(clippy::missing_panics_doc)]
    #[must_use]
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).expect("datum metadata is valid JSON")
    }

    /// Encode the metadata as a JSON value.
    #[allow(clippy::missing_panics_doc)]
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).expect("datum metadata is valid JSON")
    }

    /// Returns true if the info, property info, and tags are all empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.info.is_empty() && self.property_info.is_empty() && self.tags.is_empty()
    }

    /// Returns the info map.
    #[must_use]
    pub const fn info(&self) -> &InfoMap {
        &self.info
    }

    /// Replace the info map.
    pub fn set_info(&mut self, info: InfoMap) {
        self.info = info;
    }

    /// Put an info value, or remove it if `value` is [`None`].
    pub fn put_info_value(&mut self, key: &str, value: Option<InfoValue>) {
        match value {
            Some(value) => {
                self.info.insert(key.to_string(), value);
            }
            None => {
                self.info.shift_remove(key);
            }
        }
    }

    /// Set an info value.
    #[must_use]
    pub fn with_info_value(mut self, key: &str, value: impl Into<InfoValue>) -> Self {
        self.put_info_value(key, Some(value.into()));
        self
    }

    /// Returns an info value.
    #[must_use]
    pub fn info_value(&self, key: &str) -> Option<&InfoValue> {
        self.info.get(key)
    }

    /// Returns an info value as a string, see [`InfoValue::to_text`].
    #[must_use]
    pub fn info_string(&self, key: &str) -> Option<String> {
        self.info_value(key).and_then(InfoValue::to_text)
    }

    /// Returns an info value as an `i64`, see [`InfoValue::to_i64`].
    #[must_use]
    pub fn info_long(&self, key: &str) -> Option<i64> {
        self.info_value(key).and_then(InfoValue::to_i64)
    }

    /// Returns an info value as an `i32`, see [`InfoValue::to_i32`].
    #[must_use]
    pub fn info_integer(&self, key: &str) -> Option<i32> {
        self.info_value(key).and_then(InfoValue::to_i32)
    }

    /// Returns an info value as an `f64`, see [`InfoValue::to_f64`].
    #[must_use]
    pub fn info_double(&self, key: &str) -> Option<f64> {
        self.info_value(key).and_then(InfoValue::to_f64)
    }

    /// Returns an info value as an exact number, see [`InfoValue::to_number`].
    #[must_use]
    pub fn info_number(&self, key: &str) -> Option<Number> {
        self.info_value(key).and_then(InfoValue::to_number)
    }

    /// Returns an info value as a boolean, see [`InfoValue::to_bool`].
    #[must_use]
    pub fn info_bool(&self, key: &str) -> Option<bool> {
        self.info_value(key).and_then(InfoValue::to_bool)
    }

    /// Returns a nested info map.
    #[must_use]
    pub fn info_map(&self, key: &str) -> Option<&InfoMap> {
        self.info_value(key).and_then(InfoValue::as_map)
    }

    /// Returns the info maps of all properties.
    #[must_use]
    pub const fn property_infos(&self) -> &PropertyInfoMap {
        &self.property_info
    }

    /// Returns the names of properties with info.
    pub fn property_info_keys(&self) -> impl Iterator<Item = &str> {
        self.property_info.keys().map(String::as_str)
    }

    /// Returns the info map of a property.
    #[must_use]
    pub fn property_info(&self, property: &str) -> Option<&InfoMap> {
        self.property_info.get(property)
    }

    /// Replace the info map of a property.
    ///
    /// The property is removed if `info` is [`None`] or empty.
    pub fn set_property_info(&mut self, property: &str, info: Option<InfoMap>) {
        match info {
            Some(info) if !info.is_empty() => {
                self.property_info.insert(property.to_string(), info);
            }
            _ => {
                self.property_info.shift_remove(property);
            }
        }
    }

    /// Put a property info value, or remove it if `value` is [`None`].
    ///
    /// Removing the last value of a property removes the property.
    pub fn put_property_info_value(&mut self, property: &str, key: &str, value: Option<InfoValue>) {
        match value {
            Some(value) => {
                self.property_info
                    .entry(property.to_string())
                    .or_default()
                    .insert(key.to_string(), value);
            }
            None => {
                if let Some(info) = self.property_info.get_mut(property) {
                    info.shift_remove(key);
                    if info.is_empty() {
                        self.property_info.shift_remove(property);
                    }
                }
            }
        }
    }

    /// Set a property info value.
    #[must_use]
    pub fn with_property_info_value(
        mut self,
        property: &str,
        key: &str,
        value: impl Into<InfoValue>,
    ) -> Self {
        self.put_property_info_value(property, key, Some(value.into()));
        self
    }

    /// Returns a property info value.
    #[must_use]
    pub fn property_info_value(&self, property: &str, key: &str) -> Option<&InfoValue> {
        self.property_info(property).and_then(|info| info.get(key))
    }

    /// Returns a property info value as a string, see [`InfoValue::to_text`].
    #[must_use]
    pub fn property_info_string(&self, property: &str, key: &str) -> Option<String> {
        self.property_info_value(property, key)
            .and_then(InfoValue::to_text)
    }

    /// Returns a property info value as an `i64`, see [`InfoValue::to_i64`].
    #[must_use]
    pub fn property_info_long(&self, property: &str, key: &str) -> Option<i64> {
        self.property_info_value(property, key)
            .and_then(InfoValue::to_i64)
    }

    /// Returns a property info value as an `i32`, see [`InfoValue::to_i32`].
    #[must_use]
    pub fn property_info_integer(&self, property: &str, key: &str) -> Option<i32> {
        self.property_info_value(property, key)
            .and_then(InfoValue::to_i32)
    }

    /// Returns a property info value as an `f64`, see [`InfoValue::to_f64`].
    #[must_use]
    pub fn property_info_double(&self, property: &str, key: &str) -> Option<f64> {
        self.property_info_value(property, key)
            .and_then(InfoValue::to_f64)
    }

    /// Returns a property info value as an exact number, see [`InfoValue::to_number`].
    #[must_use]
    pub fn property_info_number(&self, property: &str, key: &str) -> Option<Number> {
        self.property_info_value(property, key)
            .and_then(InfoValue::to_number)
    }

    /// Returns a property info value as a boolean, see [`InfoValue::to_bool`].
    #[must_use]
    pub fn property_info_bool(&self, property: &str, key: &str) -> Option<bool> {
        self.property_info_value(property, key)
            .and_then(InfoValue::to_bool)
    }

    /// Returns a nested property info map.
    #[must_use]
    pub fn property_info_map(&self, property: &str, key: &str) -> Option<&InfoMap> {
        self.property_info_value(property, key)
            .and_then(InfoValue::as_map)
    }

    /// Returns the tags.
    #[must_use]
    pub const fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// Replace the tags.
    pub fn set_tags<T: Into<String>>(&mut self, tags: impl IntoIterator<Item = T>) {
        self.tags = tags.into_iter().map(Into::into).collect();
    }

    /// Add a tag. Adding an existing tag has no effect.
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        self.tags.insert(tag.into());
    }

    /// Add a tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.add_tag(tag);
        self
    }

    /// Remove a tag. Removing an absent tag has no effect.
    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.shift_remove(tag);
    }

    /// Returns true if the tag is present.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Merge `other` into this metadata.
    ///
    /// Info and property info values of `other` are copied if absent here, or always if `replace` is true.
    /// Tags are combined.
    pub fn merge(&mut self, other: &DatumMetadata, replace: bool) {
        tracing::debug!(
            replace,
            info = other.info.len(),
            property_info = other.property_info.len(),
            tags = other.tags.len(),
            "merging metadata"
        );
        merge_info(&mut self.info, &other.info, replace);
        for (property, info) in &other.property_info {
            merge_info(
                self.property_info.entry(property.clone()).or_default(),
                info,
                replace,
            );
        }
        self.tags.extend(other.tags.iter().cloned());
    }
}

fn merge_info(info: &mut InfoMap, other: &InfoMap, replace: bool) {
    for (key, value) in other {
        if replace || !info.contains_key(key) {
            info.insert(key.clone(), value.clone());
        }
    }
}
