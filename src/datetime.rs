//! Date/time text parsing and formatting with a configurable pattern and offset.
//!
//! Domain types that embed [`DatumMetadata`](crate::DatumMetadata) often carry timestamps encoded as text.
//! [`DateTimeFormat`] converts between that text and [`DateTime<Utc>`], and [`serde_default`] does the same inside serde-derived types.

use std::fmt::Write;

use chrono::{
    format::ParseErrorKind, DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Utc,
};
use thiserror::Error;

use crate::config::global_config;

/// A date/time parse error.
#[derive(Debug, Error)]
pub enum DateTimeParseError {
    /// The text does not match the pattern.
    #[error("{text:?} does not match pattern {pattern:?}: {source}")]
    Pattern {
        /// The text.
        text: String,
        /// The pattern.
        pattern: String,
        /// The underlying error.
        source: chrono::ParseError,
    },
    /// The local date/time does not exist in the offset.
    #[error("{0} is not a valid local date/time")]
    InvalidLocal(NaiveDateTime),
}

/// A date/time format error, raised for a pattern that is not valid `strftime` syntax.
#[derive(Debug, Error)]
#[error("invalid date/time pattern {0:?}")]
pub struct DateTimeFormatError(pub String);

/// A date/time pattern interpreted in a fixed offset.
///
/// The pattern uses [`chrono::format::strftime`] syntax.
/// The default is taken from the [global config](crate::config::Config), `%Y-%m-%d %H:%M:%S%.3fZ` in UTC unless changed.
///
/// ```rust
/// # use datum_metadata::datetime::DateTimeFormat;
/// let format = DateTimeFormat::default();
/// let timestamp = format.parse("2014-10-22 10:59:45.123Z")?;
/// assert_eq!(format.format(&timestamp)?, "2014-10-22 10:59:45.123Z");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeFormat {
    pattern: String,
    offset: FixedOffset,
}

impl Default for DateTimeFormat {
    fn default() -> Self {
        let config = global_config();
        Self::new(config.date_time_pattern(), config.date_time_offset())
    }
}

impl DateTimeFormat {
    /// Create a new date/time format.
    #[must_use]
    pub fn new(pattern: impl Into<String>, offset: FixedOffset) -> Self {
        Self {
            pattern: pattern.into(),
            offset,
        }
    }

    /// Create a new date/time format in the configured [offset](crate::config::Config#date-time-offset).
    #[must_use]
    pub fn with_pattern(pattern: impl Into<String>) -> Self {
        Self::new(pattern, global_config().date_time_offset())
    }

    /// Returns the pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the offset.
    #[must_use]
    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Parse date/time text.
    ///
    /// A pattern without time fields parses to midnight.
    ///
    /// # Errors
    /// Returns a [`DateTimeParseError`] if `text` does not match the pattern.
    pub fn parse(&self, text: &str) -> Result<DateTime<Utc>, DateTimeParseError> {
        let trimmed = text.trim();
        let naive = NaiveDateTime::parse_from_str(trimmed, &self.pattern)
            .or_else(|err| match err.kind() {
                ParseErrorKind::NotEnough => NaiveDate::parse_from_str(trimmed, &self.pattern)
                    .map(|date| date.and_time(NaiveTime::MIN)),
                _ => Err(err),
            })
            .map_err(|source| DateTimeParseError::Pattern {
                text: text.to_string(),
                pattern: self.pattern.clone(),
                source,
            })?;
        self.offset
            .from_local_datetime(&naive)
            .single()
            .map(|datetime| datetime.with_timezone(&Utc))
            .ok_or(DateTimeParseError::InvalidLocal(naive))
    }

    /// Format a date/time.
    ///
    /// # Errors
    /// Returns a [`DateTimeFormatError`] if the pattern is not valid.
    pub fn format(&self, datetime: &DateTime<Utc>) -> Result<String, DateTimeFormatError> {
        let mut text = String::new();
        write!(
            text,
            "{}",
            datetime.with_timezone(&self.offset).format(&self.pattern)
        )
        .map_err(|_| DateTimeFormatError(self.pattern.clone()))?;
        Ok(text)
    }
}

/// Serde support for [`DateTime<Utc>`] fields with the default [`DateTimeFormat`].
///
/// ```rust
/// # use chrono::{DateTime, Utc};
/// # use datum_metadata::DatumMetadata;
/// #[derive(serde::Serialize, serde::Deserialize)]
/// struct Datum {
///     #[serde(with = "datum_metadata::datetime::serde_default")]
///     created: DateTime<Utc>,
///     #[serde(default, skip_serializing_if = "DatumMetadata::is_empty")]
///     meta: DatumMetadata,
/// }
/// let datum: Datum = serde_json::from_str(r#"{"created":"2014-10-22 10:59:45.000Z","meta":{"t":["test"]}}"#)?;
/// assert!(datum.meta.has_tag("test"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub mod serde_default {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DateTimeFormat;

    /// Serialize a date/time as text.
    ///
    /// # Errors
    /// Returns an error if the default pattern is not valid or the serializer fails.
    pub fn serialize<S>(datetime: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let text = DateTimeFormat::default()
            .format(datetime)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    /// Deserialize a date/time from text.
    ///
    /// # Errors
    /// Returns an error if the text does not match the default pattern.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        DateTimeFormat::default()
            .parse(&text)
            .map_err(serde::de::Error::custom)
    }
}
