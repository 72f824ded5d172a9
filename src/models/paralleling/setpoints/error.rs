use thiserror::Error;

use crate::{
    models::paralleling::core::RatingError,
    support::settings::{ConversionError, Field},
};

/// Errors that can occur while computing setpoints.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SetpointError {
    /// The settings store holds data that can't be interpreted.
    #[error("unreadable setting")]
    Conversion(#[from] ConversionError),

    /// A lookup fell back to `"0"` while strict settings were requested.
    #[error("setting `{name}`[{index}].{field} is missing")]
    DefaultedSetting {
        name: String,
        index: usize,
        field: Field,
    },

    /// A unit in the scheme has a CT ratio or MVA rating that can't be used.
    #[error("invalid unit rating")]
    Rating(#[from] RatingError),
}
