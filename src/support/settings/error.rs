use std::{num::ParseFloatError, path::PathBuf};

use thiserror::Error;

use super::Field;

/// Setup data that could not be interpreted.
///
/// A store that honours its contract only hands out numeric strings, so this
/// error points at a corrupt setup rather than a bad argument. It is always
/// propagated, never replaced by a computed value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// A numeric field did not parse as a number.
    #[error("setting `{name}`[{index}].{field} is not a number: {raw:?}")]
    Number {
        name: String,
        index: usize,
        field: Field,
        raw: String,
        #[source]
        source: ParseFloatError,
    },

    /// A bit string had no byte digit at the requested (1-based) position.
    #[error("setting `{name}`[{index}] has no byte digit at position {position}: {raw:?}")]
    Bit {
        name: String,
        index: usize,
        position: usize,
        raw: String,
    },
}

/// Errors that can occur while loading a setup file.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The setup file could not be read.
    #[error("failed to read setup file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The setup document is not well-formed XML.
    #[error("malformed setup document")]
    Xml(#[from] quick_xml::Error),
}
