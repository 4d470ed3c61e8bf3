//! Datum metadata: arbitrary info, per-property info, and tags attached to a datum, with a compact JSON encoding.
//!
//! [`DatumMetadata`] holds three independent collections:
//!  - an [info](DatumMetadata::info) map of [`InfoValue`]s (a string, an exact number, a boolean, or a nested map),
//!  - [property info](DatumMetadata::property_infos): an info map per named property, e.g. the unit of a numeric property,
//!  - a set of [tags](DatumMetadata::tags).
//!
//! Writing a value of [`None`] removes a key, so a null value is never stored.
//!
//! ## Example
//! ```rust
//! # use datum_metadata::DatumMetadata;
//! let metadata = DatumMetadata::from_json(r#"{"m":{"ploc":2502287},"pm":{"watts":{"unit":"W"}},"t":["test"]}"#)?;
//! assert_eq!(metadata.info_long("ploc"), Some(2502287));
//! assert_eq!(metadata.property_info_string("watts", "unit").as_deref(), Some("W"));
//! assert!(metadata.has_tag("test"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Encoding
//! The [`codec`] module documents the JSON encoding, which other systems parse, so its field names and shape are fixed.
//!
//! ## Licence
//! `datum_metadata` is licensed under either of
//!  - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license <http://opensource.org/licenses/MIT>, at your option.

#![warn(unused_variables)]
#![warn(dead_code)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![deny(clippy::missing_panics_doc)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod codec;
pub mod config;
pub mod datetime;
mod metadata;
mod value;

pub use codec::{DecodeOptions, MetadataDecodeError};
pub use metadata::DatumMetadata;
pub use value::{InfoMap, InfoValue, NonFiniteNumberError, PropertyInfoMap, TagSet};
