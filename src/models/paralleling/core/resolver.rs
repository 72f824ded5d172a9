use std::ops::RangeInclusive;

use tracing::debug;

use crate::support::settings::{ConversionError, Field, SettingsStore};

use super::{Breaker, BreakerCode, BreakerStates, ElectricalRatings, RatingKind, UnitPosition};

/// Store key of the table of breaker bit strings.
const BREAKERS: &str = "breakers";

/// Store key of the initiator (network master) position.
const INITIATOR: &str = "maxnetworkdevice";

/// Store key of the last regular-pattern test case.
const TOTAL_REGULAR_TEST: &str = "totalregulartest";

/// Store key of the last test case.
const TOTAL_TEST_NUMBERS: &str = "totaltestnumbers";

/// Rating table index by `case mod 4`, for the initiator only.
const CT_INDEX: [usize; 4] = [0, 1, 0, 2];
const MVA_INDEX: [usize; 4] = [0, 0, 0, 1];
const IMPEDANCE_INDEX: [usize; 4] = [1, 0, 0, 0];

/// Maps a `(test case, unit)` pair to breaker states and ratings.
///
/// The test matrix cycles the initiator through different CT, MVA and
/// impedance settings every four cases, while every other unit keeps its
/// nominal (index 0) ratings. Breaker topologies come from a static table of
/// [`BreakerCode`]s.
///
/// ```
/// use p2p_paralleling::models::paralleling::{Breaker, CaseResolver, UnitPosition};
/// use p2p_paralleling::support::settings::MemorySettings;
///
/// let settings = MemorySettings::new().with("breakers", ["000", "110", "101"]);
/// let resolver = CaseResolver::new(&settings);
///
/// // Case 1 uses code "102": unit 3 reads row 2.
/// assert!(resolver.resolve_breaker(1, UnitPosition::Three, Breaker::LeftTie).unwrap());
/// assert!(!resolver.resolve_breaker(1, UnitPosition::Two, Breaker::Line).unwrap());
/// ```
#[derive(Debug)]
pub struct CaseResolver<'a, S: ?Sized> {
    settings: &'a S,
}

impl<S: ?Sized> Clone for CaseResolver<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized> Copy for CaseResolver<'_, S> {}

impl<'a, S: SettingsStore + ?Sized> CaseResolver<'a, S> {
    #[must_use]
    pub fn new(settings: &'a S) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn settings(&self) -> &'a S {
        self.settings
    }

    /// Last test case that follows the regular four-case rating pattern.
    ///
    /// # Errors
    ///
    /// Returns a [`ConversionError`] if the stored value is not a number.
    pub fn total_regular_test(&self) -> Result<i32, ConversionError> {
        self.integer(TOTAL_REGULAR_TEST)
    }

    /// Number of test cases in the matrix.
    ///
    /// # Errors
    ///
    /// Returns a [`ConversionError`] if the stored value is not a number.
    pub fn total_test_numbers(&self) -> Result<i32, ConversionError> {
        self.integer(TOTAL_TEST_NUMBERS)
    }

    /// Position of the unit acting as initiator.
    ///
    /// This is an integer rather than a [`UnitPosition`] because a setup may
    /// name no valid unit, in which case no unit gets non-nominal ratings.
    ///
    /// # Errors
    ///
    /// Returns a [`ConversionError`] if the stored value is not a number.
    pub fn initiator_position(&self) -> Result<i32, ConversionError> {
        self.integer(INITIATOR)
    }

    /// Test cases `1..=totaltestnumbers`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConversionError`] if the stored count is not a number.
    pub fn test_cases(&self) -> Result<RangeInclusive<i32>, ConversionError> {
        Ok(1..=self.total_test_numbers()?)
    }

    /// Reads a numeric setting that is either common or kept per unit.
    ///
    /// `unit_number` 0 addresses the common value at index 0; 1, 2 and 3
    /// address indices 0, 1 and 2.
    ///
    /// # Errors
    ///
    /// Returns a [`ConversionError`] if the stored value is not a number.
    pub fn unit_setting(&self, name: &str, unit_number: usize) -> Result<f64, ConversionError> {
        self.settings.number(name, unit_number.saturating_sub(1))
    }

    /// Whether `breaker` of `unit` is closed in `case_number`.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::Bit`] if the breaker row has no digit at the
    /// breaker's position.
    pub fn resolve_breaker(
        &self,
        case_number: i32,
        unit: UnitPosition,
        breaker: Breaker,
    ) -> Result<bool, ConversionError> {
        let code = BreakerCode::for_case(case_number);
        let row = code.row(unit);
        let bits = self.settings.fetch(BREAKERS, row, Field::Value).raw;

        let position = breaker.position();
        let closed = bits
            .chars()
            .nth(position - 1)
            .and_then(|c| c.to_digit(10))
            .map(|digit| digit != 0)
            .ok_or_else(|| ConversionError::Bit {
                name: BREAKERS.to_owned(),
                index: row,
                position,
                raw: bits.clone(),
            })?;

        debug!(case_number, %unit, %code, row, ?breaker, closed, "resolved breaker");
        Ok(closed)
    }

    /// All three breakers of `unit` in `case_number`.
    ///
    /// # Errors
    ///
    /// See [`resolve_breaker`](Self::resolve_breaker).
    pub fn resolve_breakers(
        &self,
        case_number: i32,
        unit: UnitPosition,
    ) -> Result<BreakerStates, ConversionError> {
        let mut states = BreakerStates::default();
        for breaker in Breaker::ALL {
            states.set(breaker, self.resolve_breaker(case_number, unit, breaker)?);
        }
        Ok(states)
    }

    /// CT ratio of `unit` in `case_number`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConversionError`] if a stored value is not a number.
    pub fn resolve_ct(&self, case_number: i32, unit: UnitPosition) -> Result<f64, ConversionError> {
        self.rating(RatingKind::Ct, case_number, unit)
    }

    /// MVA rating of `unit` in `case_number`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConversionError`] if a stored value is not a number.
    pub fn resolve_mva(&self, case_number: i32, unit: UnitPosition) -> Result<f64, ConversionError> {
        self.rating(RatingKind::Mva, case_number, unit)
    }

    /// Impedance assumption of `unit` in `case_number`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConversionError`] if a stored value is not a number.
    pub fn resolve_impedance(
        &self,
        case_number: i32,
        unit: UnitPosition,
    ) -> Result<f64, ConversionError> {
        self.rating(RatingKind::Impedance, case_number, unit)
    }

    /// CT, MVA and impedance of `unit` in `case_number`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConversionError`] if a stored value is not a number.
    pub fn resolve_ratings(
        &self,
        case_number: i32,
        unit: UnitPosition,
    ) -> Result<ElectricalRatings, ConversionError> {
        Ok(ElectricalRatings {
            ct: self.resolve_ct(case_number, unit)?,
            mva: self.resolve_mva(case_number, unit)?,
            impedance: self.resolve_impedance(case_number, unit)?,
        })
    }

    fn rating(
        &self,
        kind: RatingKind,
        case_number: i32,
        unit: UnitPosition,
    ) -> Result<f64, ConversionError> {
        let index = self.rating_index(kind, case_number, unit)?;
        self.settings.number(kind.key(), index)
    }

    /// Table index of a rating, 0 unless `unit` is the initiator in a
    /// regular documented case.
    fn rating_index(
        &self,
        kind: RatingKind,
        case_number: i32,
        unit: UnitPosition,
    ) -> Result<usize, ConversionError> {
        if unit.number() != self.initiator_position()?
            || BreakerCode::lookup(case_number).is_none()
            || case_number > self.total_regular_test()?
        {
            return Ok(0);
        }

        let table = match kind {
            RatingKind::Ct => &CT_INDEX,
            RatingKind::Mva => &MVA_INDEX,
            RatingKind::Impedance => &IMPEDANCE_INDEX,
        };

        // `lookup` only covers positive cases, so the remainder is 0..=3.
        let remainder = usize::try_from(case_number.rem_euclid(4)).unwrap_or_default();
        Ok(table[remainder])
    }

    fn integer(&self, name: &str) -> Result<i32, ConversionError> {
        let value = self.settings.number(name, 0)?;
        #[allow(clippy::cast_possible_truncation)]
        let truncated = value.trunc() as i32;
        Ok(truncated)
    }
}
