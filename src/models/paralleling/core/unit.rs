//! Unit positions, breakers and per-unit electrical ratings.

use std::fmt;

use thiserror::Error;

use crate::support::constraint::{Constrained, ConstraintError, StrictlyPositive};

use super::engine;

/// Paralleling address of a unit in a three-unit scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UnitPosition {
    One = 1,
    Two = 2,
    Three = 3,
}

impl UnitPosition {
    /// All positions in address order.
    pub const ALL: [Self; 3] = [Self::One, Self::Two, Self::Three];

    /// The paralleling address (1, 2 or 3).
    #[must_use]
    pub fn number(self) -> i32 {
        self as i32
    }

    /// Zero-based index into per-unit arrays.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize - 1
    }
}

impl TryFrom<i32> for UnitPosition {
    type Error = PositionError;

    fn try_from(number: i32) -> Result<Self, Self::Error> {
        match number {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            _ => Err(PositionError::Unit(number)),
        }
    }
}

impl fmt::Display for UnitPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit {}", self.number())
    }
}

/// One of the three breakers around a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Breaker {
    Line = 1,
    RightTie = 2,
    LeftTie = 3,
}

impl Breaker {
    pub const ALL: [Self; 3] = [Self::Line, Self::RightTie, Self::LeftTie];

    /// 1-based bit position of this breaker in a breaker row.
    #[must_use]
    pub fn position(self) -> usize {
        self as usize
    }
}

impl TryFrom<i32> for Breaker {
    type Error = PositionError;

    fn try_from(number: i32) -> Result<Self, Self::Error> {
        match number {
            1 => Ok(Self::Line),
            2 => Ok(Self::RightTie),
            3 => Ok(Self::LeftTie),
            _ => Err(PositionError::Breaker(number)),
        }
    }
}

/// An integer that doesn't name a unit or breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("unit position must be 1, 2 or 3, got {0}")]
    Unit(i32),
    #[error("breaker must be 1 (line), 2 (right tie) or 3 (left tie), got {0}")]
    Breaker(i32),
}

/// Open (`false`) / closed (`true`) state of a unit's breakers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BreakerStates {
    pub line: bool,
    pub right_tie: bool,
    pub left_tie: bool,
}

impl BreakerStates {
    #[must_use]
    pub fn get(&self, breaker: Breaker) -> bool {
        match breaker {
            Breaker::Line => self.line,
            Breaker::RightTie => self.right_tie,
            Breaker::LeftTie => self.left_tie,
        }
    }

    pub(super) fn set(&mut self, breaker: Breaker, closed: bool) {
        match breaker {
            Breaker::Line => self.line = closed,
            Breaker::RightTie => self.right_tie = closed,
            Breaker::LeftTie => self.left_tie = closed,
        }
    }

    /// Whether these breakers put the unit in the paralleling scheme.
    ///
    /// See [`engine::is_paralleling`].
    #[must_use]
    pub fn is_paralleling(&self) -> bool {
        engine::is_paralleling(self.line, self.right_tie, self.left_tie)
    }
}

/// Which of the three ratings a value is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatingKind {
    Ct,
    Mva,
    Impedance,
}

impl RatingKind {
    /// Setting name holding this rating's table.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Ct => "ct",
            Self::Mva => "mva",
            Self::Impedance => "impedance",
        }
    }
}

impl fmt::Display for RatingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// CT ratio, MVA rating and impedance assumption of one unit, as read.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ElectricalRatings {
    pub ct: f64,
    pub mva: f64,
    pub impedance: f64,
}

impl ElectricalRatings {
    /// Checks that CT and MVA can be used as divisors.
    ///
    /// # Errors
    ///
    /// Returns a [`RatingError`] naming the unit and rating that is not
    /// strictly positive.
    pub fn validate(self, unit: UnitPosition) -> Result<UnitRatings, RatingError> {
        let check = |kind: RatingKind, value: f64| {
            StrictlyPositive::new(value).map_err(|source| RatingError::Unit {
                unit,
                kind,
                value,
                source,
            })
        };

        Ok(UnitRatings {
            ct: check(RatingKind::Ct, self.ct)?,
            mva: check(RatingKind::Mva, self.mva)?,
            impedance: self.impedance,
        })
    }
}

/// Ratings whose CT and MVA are known to be strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitRatings {
    pub ct: Constrained<f64, StrictlyPositive>,
    pub mva: Constrained<f64, StrictlyPositive>,
    pub impedance: f64,
}

/// Ratings that can't be used to normalize or split currents.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RatingError {
    /// A CT ratio or MVA rating that is not strictly positive.
    #[error("{unit} {kind} rating {value} is invalid")]
    Unit {
        unit: UnitPosition,
        kind: RatingKind,
        value: f64,
        #[source]
        source: ConstraintError,
    },

    /// The impedances of units 1 and 2 can't apportion the circulating
    /// current of a three-unit scheme.
    #[error("impedances of unit 1 ({z1}) and unit 2 ({z2}) can't split circulating current")]
    ImpedanceSplit {
        z1: f64,
        z2: f64,
        #[source]
        source: ConstraintError,
    },
}
