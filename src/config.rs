//! Global configuration options.

use std::sync::{OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{FixedOffset, Offset, Utc};

/// Default date/time pattern, the `chrono` form of `yyyy-MM-dd HH:mm:ss.SSS'Z'`.
pub const DEFAULT_DATE_TIME_PATTERN: &str = "%Y-%m-%d %H:%M:%S%.3fZ";

/// How a JSON `null` inside `"m"` or `"pm"` is handled when decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullValuePolicy {
    /// Treat the key as absent.
    #[default]
    Drop,
    /// Fail the decode with [`MetadataDecodeError::NullValue`](crate::codec::MetadataDecodeError::NullValue).
    Reject,
}

/// Global configuration options for the `datum_metadata` crate.
///
/// Retrieve the global [`Config`] with [`global_config`] and modify it with [`global_config_mut`].
///
/// ## Null Value Policy
/// > default: [`NullValuePolicy::Drop`]
///
/// The handling of JSON `null` values nested in the `"m"` and `"pm"` fields of encoded metadata.
/// This can be overridden per decode with [`DecodeOptions`](crate::codec::DecodeOptions).
///
/// ## Date Time Pattern
/// > default: [`DEFAULT_DATE_TIME_PATTERN`]
///
/// The `chrono` format pattern used by [`DateTimeFormat::default`](crate::datetime::DateTimeFormat).
///
/// ## Date Time Offset
/// > default: UTC
///
/// The fixed offset that date/time text is interpreted in and formatted to.
#[derive(Debug, Clone)]
pub struct Config {
    null_value_policy: NullValuePolicy,
    date_time_pattern: String,
    date_time_offset: FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            null_value_policy: NullValuePolicy::default(),
            date_time_pattern: DEFAULT_DATE_TIME_PATTERN.to_string(),
            date_time_offset: Utc.fix(),
        }
    }
}

impl Config {
    /// Get the [null value policy](#null-value-policy) configuration.
    #[must_use]
    pub fn null_value_policy(&self) -> NullValuePolicy {
        self.null_value_policy
    }

    /// Set the [null value policy](#null-value-policy) configuration.
    pub fn set_null_value_policy(&mut self, null_value_policy: NullValuePolicy) {
        self.null_value_policy = null_value_policy;
    }

    /// Get the [date time pattern](#date-time-pattern) configuration.
    #[must_use]
    pub fn date_time_pattern(&self) -> &str {
        &self.date_time_pattern
    }

    /// Set the [date time pattern](#date-time-pattern) configuration.
    pub fn set_date_time_pattern(&mut self, pattern: impl Into<String>) {
        self.date_time_pattern = pattern.into();
    }

    /// Get the [date time offset](#date-time-offset) configuration.
    #[must_use]
    pub fn date_time_offset(&self) -> FixedOffset {
        self.date_time_offset
    }

    /// Set the [date time offset](#date-time-offset) configuration.
    pub fn set_date_time_offset(&mut self, offset: FixedOffset) {
        self.date_time_offset = offset;
    }
}

static CONFIG: OnceLock<RwLock<Config>> = OnceLock::new();

/// Returns a reference to the global configuration.
///
/// # Panics
/// This function panics if the underlying lock has been poisoned and might panic if the global config is already held by the current thread.
pub fn global_config() -> RwLockReadGuard<'static, Config> {
    CONFIG
        .get_or_init(|| RwLock::new(Config::default()))
        .read()
        .unwrap()
}

/// Returns a mutable reference to the global configuration.
///
/// # Panics
/// This function panics if the underlying lock has been poisoned and might panic if the global config is already held by the current thread.
pub fn global_config_mut() -> RwLockWriteGuard<'static, Config> {
    CONFIG
        .get_or_init(|| RwLock::new(Config::default()))
        .write()
        .unwrap()
}
