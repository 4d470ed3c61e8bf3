//! The info value union.
//!
//! An [`InfoValue`] is a string, an exact number, a boolean, or a nested [`InfoMap`].
//! There is no null variant: a null write removes a key instead of storing a value.

use derive_more::{Display, From};
use indexmap::{IndexMap, IndexSet};
use serde::{ser::SerializeMap, Serialize};
use serde_json::Number;

/// An insertion-ordered map of info values.
pub type InfoMap = IndexMap<String, InfoValue>;

/// Per-property info, keyed by property name.
pub type PropertyInfoMap = IndexMap<String, InfoMap>;

/// An insertion-ordered set of tags.
pub type TagSet = IndexSet<String>;

/// A metadata value.
#[derive(Clone, PartialEq, Eq, Debug, Display, From)]
pub enum InfoValue {
    /// A string.
    String(String),
    /// A number, holding its exact decimal representation.
    Number(Number),
    /// A boolean.
    Boolean(bool),
    /// A nested map of values.
    #[display("{}", serde_json::to_string(_0).unwrap_or_default())]
    Map(InfoMap),
}

impl From<&str> for InfoValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<i32> for InfoValue {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<u32> for InfoValue {
    fn from(value: u32) -> Self {
        Self::Number(value.into())
    }
}

impl From<i64> for InfoValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for InfoValue {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

/// A non-finite float cannot be stored as an info value.
#[derive(Clone, Copy, Debug, thiserror::Error)]
#[error("{0} is not a finite number")]
pub struct NonFiniteNumberError(pub f64);

impl TryFrom<f64> for InfoValue {
    type Error = NonFiniteNumberError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Number::from_f64(value)
            .map(Self::Number)
            .ok_or(NonFiniteNumberError(value))
    }
}

impl InfoValue {
    /// Create a number value from exact decimal text, such as `"1.50"` or `"2502287"`.
    ///
    /// Returns [`None`] if `text` is not a valid JSON number.
    #[must_use]
    pub fn decimal(text: &str) -> Option<Self> {
        text.trim().parse::<Number>().ok().map(Self::Number)
    }

    /// Returns the variant name, as used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::Boolean(_) => "boolean",
            Self::Map(_) => "map",
        }
    }

    /// Returns the string if this is a [`InfoValue::String`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(string) => Some(string),
            _ => None,
        }
    }

    /// Returns the nested map if this is a [`InfoValue::Map`].
    #[must_use]
    pub const fn as_map(&self) -> Option<&InfoMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Coerce to a string.
    ///
    /// Numbers and booleans render as their JSON text. Maps do not coerce.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::String(string) => Some(string.clone()),
            Self::Number(number) => Some(number.to_string()),
            Self::Boolean(boolean) => Some(boolean.to_string()),
            Self::Map(_) => None,
        }
    }

    /// Coerce to an exact number.
    ///
    /// Strings holding valid JSON number text are converted.
    #[must_use]
    pub fn to_number(&self) -> Option<Number> {
        match self {
            Self::Number(number) => Some(number.clone()),
            Self::String(string) => string.trim().parse::<Number>().ok(),
            Self::Boolean(_) | Self::Map(_) => None,
        }
    }

    /// Coerce to an `i64`.
    ///
    /// A number converts only if it represents a whole value within range, so `2.0` yields `2` but `2.5` yields [`None`].
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        self.to_number().as_ref().and_then(whole_i64)
    }

    /// Coerce to an `i32`, see [`InfoValue::to_i64`].
    #[must_use]
    pub fn to_i32(&self) -> Option<i32> {
        self.to_i64().and_then(|value| i32::try_from(value).ok())
    }

    /// Coerce to an `f64`. Precision may be lost.
    #[must_use]
    pub fn to_f64(&self) -> Option<f64> {
        self.to_number().and_then(|number| {
            number
                .as_f64()
                .or_else(|| number.to_string().parse::<f64>().ok())
                .filter(|value| value.is_finite())
        })
    }

    /// Coerce to a boolean.
    ///
    /// The strings `"true"` and `"false"` (any case) are converted.
    #[must_use]
    pub fn to_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(boolean) => Some(*boolean),
            Self::String(string) => {
                let string = string.trim();
                if string.eq_ignore_ascii_case("true") {
                    Some(true)
                } else if string.eq_ignore_ascii_case("false") {
                    Some(false)
                } else {
                    None
                }
            }
            Self::Number(_) | Self::Map(_) => None,
        }
    }
}

/// Convert a number to an `i64` if it is whole and in range.
///
/// Works on the decimal text, so no precision is lost to floating point.
fn whole_i64(number: &Number) -> Option<i64> {
    if let Some(value) = number.as_i64() {
        return Some(value);
    }
    if number.is_u64() {
        // greater than i64::MAX
        return None;
    }
    let text = number.to_string();
    let (mantissa, exponent) = match text.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i64>().ok()?),
        None => (text.as_str(), 0),
    };
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(mantissa) => ("-", mantissa),
        None => ("", mantissa),
    };
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits = format!("{whole}{fraction}");
    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return Some(0);
    }

    // decimal point position, counted from the first significant digit
    let leading_zeros = i64::try_from(digits.len() - significant.len()).ok()?;
    let point = i64::try_from(whole.len())
        .ok()?
        .checked_add(exponent)?
        .checked_sub(leading_zeros)?;
    if !(1..=19).contains(&point) {
        return None;
    }
    let point = usize::try_from(point).ok()?;
    let (integer, fraction) = significant.split_at(point.min(significant.len()));
    if fraction.bytes().any(|digit| digit != b'0') {
        return None;
    }
    let zeros = "0".repeat(point.saturating_sub(significant.len()));
    format!("{sign}{integer}{zeros}").parse::<i64>().ok()
}

impl Serialize for InfoValue {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::String(string) => s.serialize_str(string),
            Self::Number(number) => number.serialize(s),
            Self::Boolean(boolean) => s.serialize_bool(*boolean),
            Self::Map(map) => {
                let mut s = s.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    s.serialize_entry(key, value)?;
                }
                s.end()
            }
        }
    }
}
