//! The compact JSON encoding of [`DatumMetadata`].
//!
//! Encoded metadata is a JSON object with up to three fields, each omitted when empty:
//! ```json
//! {
//!     "m": { "msg": "Hello, world." },
//!     "pm": { "watts": { "unit": "W" } },
//!     "t": [ "test" ]
//! }
//! ```
//! - `"m"`: the [info](DatumMetadata::info) map,
//! - `"pm"`: the [property info](DatumMetadata::property_infos) maps, keyed by property name,
//! - `"t"`: the [tags](DatumMetadata::tags).
//!
//! Unknown top-level fields are ignored when decoding.
//! Numbers keep their exact decimal text through a decode and encode.

use serde::{ser::SerializeMap, Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{
    config::{global_config, NullValuePolicy},
    metadata::DatumMetadata,
    value::{InfoMap, InfoValue, PropertyInfoMap, TagSet},
};

/// The encoded field name of the info map.
pub const INFO_FIELD: &str = "m";

/// The encoded field name of the property info maps.
pub const PROPERTY_INFO_FIELD: &str = "pm";

/// The encoded field name of the tags.
pub const TAGS_FIELD: &str = "t";

/// Options for decoding encoded metadata.
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    null_value_policy: NullValuePolicy,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            null_value_policy: global_config().null_value_policy(),
        }
    }
}

impl DecodeOptions {
    /// Return the null value policy.
    #[must_use]
    pub fn null_value_policy(&self) -> NullValuePolicy {
        self.null_value_policy
    }

    /// Set the null value policy.
    pub fn set_null_value_policy(&mut self, null_value_policy: NullValuePolicy) -> &mut Self {
        self.null_value_policy = null_value_policy;
        self
    }

    /// Set the null value policy.
    #[must_use]
    pub fn with_null_value_policy(mut self, null_value_policy: NullValuePolicy) -> Self {
        self.null_value_policy = null_value_policy;
        self
    }
}

/// A metadata decode error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MetadataDecodeError {
    /// Malformed JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// The encoded metadata is not a JSON object.
    #[error("encoded metadata must be a JSON object, found {0}")]
    NotAnObject(&'static str),
    /// A field does not have the expected JSON type.
    #[error("field {field} must be a JSON {expected}, found {found}")]
    InvalidField {
        /// The dotted path of the field.
        field: String,
        /// The expected JSON type.
        expected: &'static str,
        /// The JSON type found.
        found: &'static str,
    },
    /// A null value with [`NullValuePolicy::Reject`].
    #[error("null value at {0}")]
    NullValue(String),
    /// A value outside of the supported value types.
    #[error("unsupported {found} value at {path}")]
    UnsupportedValue {
        /// The dotted path of the value.
        path: String,
        /// The JSON type found.
        found: &'static str,
    },
    /// A tag that is not a string.
    #[error("tag {index} must be a JSON string, found {found}")]
    InvalidTag {
        /// The index of the tag.
        index: usize,
        /// The JSON type found.
        found: &'static str,
    },
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join_path(parent: &str, key: &str) -> String {
    format!("{parent}.{key}")
}

/// Decode metadata from a parsed JSON value.
pub(crate) fn decode(
    value: Value,
    options: &DecodeOptions,
) -> Result<DatumMetadata, MetadataDecodeError> {
    let mut object = match value {
        Value::Object(object) => object,
        other => return Err(MetadataDecodeError::NotAnObject(json_type(&other))),
    };

    let info = match object.remove(INFO_FIELD) {
        None | Some(Value::Null) => InfoMap::new(),
        Some(Value::Object(info)) => decode_info_map(info, INFO_FIELD, options)?,
        Some(other) => return Err(invalid_field(INFO_FIELD, "object", &other)),
    };

    let property_info = match object.remove(PROPERTY_INFO_FIELD) {
        None | Some(Value::Null) => PropertyInfoMap::new(),
        Some(Value::Object(property_info)) => decode_property_info(property_info, options)?,
        Some(other) => return Err(invalid_field(PROPERTY_INFO_FIELD, "object", &other)),
    };

    let tags = match object.remove(TAGS_FIELD) {
        None | Some(Value::Null) => TagSet::new(),
        Some(Value::Array(tags)) => decode_tags(tags)?,
        Some(other) => return Err(invalid_field(TAGS_FIELD, "array", &other)),
    };

    if !object.is_empty() {
        tracing::trace!(fields = ?object.keys().collect::<Vec<_>>(), "ignoring unknown metadata fields");
    }

    Ok(DatumMetadata::from_parts(info, property_info, tags))
}

fn invalid_field(field: &str, expected: &'static str, found: &Value) -> MetadataDecodeError {
    MetadataDecodeError::InvalidField {
        field: field.to_string(),
        expected,
        found: json_type(found),
    }
}

fn decode_property_info(
    object: Map<String, Value>,
    options: &DecodeOptions,
) -> Result<PropertyInfoMap, MetadataDecodeError> {
    let mut property_info = PropertyInfoMap::with_capacity(object.len());
    for (property, value) in object {
        let path = join_path(PROPERTY_INFO_FIELD, &property);
        match value {
            Value::Object(info) => {
                let info = decode_info_map(info, &path, options)?;
                if info.is_empty() {
                    tracing::trace!(%path, "skipping empty property info");
                } else {
                    property_info.insert(property, info);
                }
            }
            Value::Null => null_value(path, options)?,
            other => return Err(invalid_field(&path, "object", &other)),
        }
    }
    Ok(property_info)
}

fn decode_info_map(
    object: Map<String, Value>,
    path: &str,
    options: &DecodeOptions,
) -> Result<InfoMap, MetadataDecodeError> {
    let mut info = InfoMap::with_capacity(object.len());
    for (key, value) in object {
        let path = join_path(path, &key);
        if let Some(value) = decode_info_value(value, &path, options)? {
            info.insert(key, value);
        }
    }
    Ok(info)
}

fn decode_info_value(
    value: Value,
    path: &str,
    options: &DecodeOptions,
) -> Result<Option<InfoValue>, MetadataDecodeError> {
    match value {
        Value::Null => null_value(path.to_string(), options).map(|()| None),
        Value::Bool(boolean) => Ok(Some(InfoValue::Boolean(boolean))),
        Value::Number(number) => Ok(Some(InfoValue::Number(number))),
        Value::String(string) => Ok(Some(InfoValue::String(string))),
        Value::Object(object) => Ok(Some(InfoValue::Map(decode_info_map(
            object, path, options,
        )?))),
        Value::Array(_) => Err(MetadataDecodeError::UnsupportedValue {
            path: path.to_string(),
            found: "array",
        }),
    }
}

fn null_value(path: String, options: &DecodeOptions) -> Result<(), MetadataDecodeError> {
    match options.null_value_policy() {
        NullValuePolicy::Drop => {
            tracing::trace!(%path, "dropping null metadata value");
            Ok(())
        }
        NullValuePolicy::Reject => Err(MetadataDecodeError::NullValue(path)),
    }
}

fn decode_tags(tags: Vec<Value>) -> Result<TagSet, MetadataDecodeError> {
    tags.into_iter()
        .enumerate()
        .map(|(index, tag)| match tag {
            Value::String(tag) => Ok(tag),
            other => Err(MetadataDecodeError::InvalidTag {
                index,
                found: json_type(&other),
            }),
        })
        .collect()
}

impl Serialize for DatumMetadata {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let len = usize::from(!self.info().is_empty())
            + usize::from(!self.property_infos().is_empty())
            + usize::from(!self.tags().is_empty());
        let mut s = s.serialize_map(Some(len))?;
        if !self.info().is_empty() {
            s.serialize_entry(INFO_FIELD, self.info())?;
        }
        if !self.property_infos().is_empty() {
            s.serialize_entry(PROPERTY_INFO_FIELD, self.property_infos())?;
        }
        if !self.tags().is_empty() {
            s.serialize_entry(TAGS_FIELD, self.tags())?;
        }
        s.end()
    }
}

impl<'de> Deserialize<'de> for DatumMetadata {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(d)?;
        decode(value, &DecodeOptions::default()).map_err(serde::de::Error::custom)
    }
}
