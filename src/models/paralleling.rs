//! Peer-to-peer DVAr paralleling of three voltage regulators.
//!
//! [`ParallelingModel`] implements [`twine_core::Model`]: given a test case,
//! a unit and the operating conditions, it produces that unit's
//! [`Setpoints`]. The computational core is re-exported so harnesses can
//! resolve cases or evaluate single formulas on their own.

mod core;
mod setpoints;

pub use self::core::{
    Breaker, BreakerCode, BreakerStates, CaseResolver, ElectricalRatings, LineDropCompensation,
    OperatingConditions, PositionError, RatingError, RatingKind, Regulation, Scheme,
    SchemeMaxima, Setpoints, UnitLoading, UnitPosition, UnitRatings, engine,
};
pub use setpoints::{ParallelingConfig, ParallelingModel, SetpointError, TestPoint};
