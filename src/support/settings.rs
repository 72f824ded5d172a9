//! Read-only access to the paralleling setup values.
//!
//! A setup is a list of named settings. Each name may repeat; the n-th
//! occurrence of a name is index `n`. Every occurrence carries three fields:
//! a `value` and its `min`/`max` bounds.
//!
//! Stores implement [`SettingsStore::lookup`], which reports a missing
//! entry as `None`. The provided methods layer the long-standing setup
//! contract on top of it: a failed lookup reads as `"0"`. Callers that need
//! to tell a genuine zero from a missing entry use [`SettingsStore::fetch`],
//! whose [`Setting`] records whether the value was defaulted.
//!
//! Numbers are always parsed with Rust's `f64` grammar (`.` as decimal
//! separator, no digit grouping), independent of the host locale.

mod entry;
mod error;
mod memory;
mod xml;

pub use error::{ConversionError, SettingsError};
pub use memory::MemorySettings;
pub use xml::XmlSettings;

use std::fmt;

use tracing::{trace, warn};

/// The value a failed lookup reads as.
pub const DEFAULT_VALUE: &str = "0";

/// One of the three fields every setting carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Field {
    #[default]
    Value,
    Min,
    Max,
}

impl Field {
    /// Element name of this field in the setup file.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Min => "min",
            Self::Max => "max",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw setting string and whether it came from the store or the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    pub raw: String,
    pub defaulted: bool,
}

impl Setting {
    /// A value the store actually holds.
    #[must_use]
    pub fn found(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            defaulted: false,
        }
    }

    /// The stand-in for a failed lookup.
    #[must_use]
    pub fn defaulted() -> Self {
        Self {
            raw: DEFAULT_VALUE.to_owned(),
            defaulted: true,
        }
    }

    /// Parses the raw text as a number.
    ///
    /// `name`, `index` and `field` only feed the error context.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::Number`] if the text is not a number.
    pub fn parse_number(
        &self,
        name: &str,
        index: usize,
        field: Field,
    ) -> Result<f64, ConversionError> {
        self.raw
            .trim()
            .parse::<f64>()
            .map_err(|source| ConversionError::Number {
                name: name.to_owned(),
                index,
                field,
                raw: self.raw.clone(),
                source,
            })
    }
}

/// A numeric setting together with its bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedSetting {
    pub value: f64,
    pub min: f64,
    pub max: f64,
    /// True if any of the three fields fell back to the default.
    pub defaulted: bool,
}

impl BoundedSetting {
    /// Returns true if `min <= value <= max`.
    #[must_use]
    pub fn is_within_range(&self) -> bool {
        self.min <= self.value && self.value <= self.max
    }
}

/// Source of setup values, keyed by name, occurrence index and field.
///
/// Implementations must be idempotent: the same key yields the same answer
/// for the lifetime of the store.
pub trait SettingsStore {
    /// Returns the raw text of a field, or `None` if the store has no such entry.
    fn lookup(&self, name: &str, index: usize, field: Field) -> Option<String>;

    /// Returns the raw text of a field, flagging a failed lookup as defaulted.
    fn fetch(&self, name: &str, index: usize, field: Field) -> Setting {
        if let Some(raw) = self.lookup(name, index, field) {
            trace!(setting = name, index, %field, raw = raw.as_str(), "setting lookup");
            Setting::found(raw)
        } else {
            warn!(setting = name, index, %field, "setting not found, reading as {DEFAULT_VALUE}");
            Setting::defaulted()
        }
    }

    /// Returns the raw text of a field, or `"0"` if the lookup fails.
    fn get(&self, name: &str, index: usize, field: Field) -> String {
        self.fetch(name, index, field).raw
    }

    /// Returns the `value` field of a setting as a number.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::Number`] if the stored text is not a number.
    fn number(&self, name: &str, index: usize) -> Result<f64, ConversionError> {
        self.fetch(name, index, Field::Value)
            .parse_number(name, index, Field::Value)
    }

    /// Returns a setting's value with its `min`/`max` bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::Number`] if any of the three fields is not a number.
    fn bounded(&self, name: &str, index: usize) -> Result<BoundedSetting, ConversionError> {
        let value = self.fetch(name, index, Field::Value);
        let min = self.fetch(name, index, Field::Min);
        let max = self.fetch(name, index, Field::Max);

        Ok(BoundedSetting {
            value: value.parse_number(name, index, Field::Value)?,
            min: min.parse_number(name, index, Field::Min)?,
            max: max.parse_number(name, index, Field::Max)?,
            defaulted: value.defaulted || min.defaulted || max.defaulted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_lookup_reads_as_zero() {
        let store = MemorySettings::new().with("ct", ["5000"]);

        assert_eq!(store.get("ct", 0, Field::Value), "5000");
        assert_eq!(store.get("ct", 1, Field::Value), "0");
        assert_eq!(store.get("nope", 0, Field::Value), "0");
        assert_eq!(store.get("ct", 0, Field::Max), "0");
    }

    #[test]
    fn fetch_distinguishes_default_from_genuine_zero() {
        let store = MemorySettings::new().with("offset", ["0"]);

        let genuine = store.fetch("offset", 0, Field::Value);
        let missing = store.fetch("offset", 1, Field::Value);

        assert_eq!(genuine.raw, missing.raw);
        assert!(!genuine.defaulted);
        assert!(missing.defaulted);
    }

    #[test]
    fn numbers_ignore_locale_conventions() {
        let store = MemorySettings::new().with("impedance", [" 7.5 ", "1,5", "1.000,0"]);

        assert_eq!(store.number("impedance", 0).unwrap(), 7.5);
        assert!(matches!(
            store.number("impedance", 1),
            Err(ConversionError::Number { index: 1, .. })
        ));
        assert!(store.number("impedance", 2).is_err());
        assert_eq!(store.number("impedance", 3).unwrap(), 0.0);
    }

    #[test]
    fn bounds_check() {
        let store = MemorySettings::new().with_bounds(
            "bandcenter",
            [("120", "100", "135"), ("140", "100", "135")],
        );

        let inside = store.bounded("bandcenter", 0).unwrap();
        assert!(inside.is_within_range());
        assert!(!inside.defaulted);

        let outside = store.bounded("bandcenter", 1).unwrap();
        assert!(!outside.is_within_range());

        let missing = store.bounded("bandcenter", 2).unwrap();
        assert!(missing.defaulted);
        assert!(missing.is_within_range());
    }
}
