//! Case resolution and setpoint arithmetic for P2P DVAr paralleling.
//!
//! [`CaseResolver`] turns a test case number into breaker states and ratings
//! for each unit. The [`engine`] functions turn those into currents and a
//! band-center voltage. [`Scheme`] runs both for all three units at once.

mod breaker_code;
pub mod engine;
mod resolver;
mod scheme;
mod unit;

#[cfg(test)]
pub(crate) mod test_support;

pub use breaker_code::BreakerCode;
pub use engine::{LineDropCompensation, Regulation, SchemeMaxima, UnitLoading};
pub use resolver::CaseResolver;
pub use scheme::{OperatingConditions, Scheme, Setpoints};
pub use unit::{
    Breaker, BreakerStates, ElectricalRatings, PositionError, RatingError, RatingKind,
    UnitPosition, UnitRatings,
};
