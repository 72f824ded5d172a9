//! Supporting utilities used by models.
//!
//! These APIs are public because they're useful to embedders, but they are
//! not stable. Breaking changes may occur as needed.

pub mod constraint;
pub mod phasor;
pub mod settings;
