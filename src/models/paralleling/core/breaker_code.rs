//! Test case to breaker combination table.

use std::fmt;

use super::UnitPosition;

/// Three breaker-row digits, one per unit position.
///
/// Each digit (0–4) selects a row of the `breakers` setting, and that row in
/// turn holds the line/right-tie/left-tie bits for the unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BreakerCode([u8; 3]);

/// Inclusive case ranges covered by the verification matrix.
const BUCKETS: [(i32, i32, BreakerCode); 21] = [
    (1, 4, BreakerCode([1, 0, 2])),
    (5, 8, BreakerCode::NOMINAL),
    (9, 12, BreakerCode([1, 0, 2])),
    (13, 16, BreakerCode([2, 1, 0])),
    (17, 20, BreakerCode([0, 2, 1])),
    (21, 24, BreakerCode([1, 1, 1])),
    (25, 28, BreakerCode([2, 2, 2])),
    (29, 32, BreakerCode([1, 2, 3])),
    (33, 36, BreakerCode([3, 1, 2])),
    (37, 40, BreakerCode([1, 2, 3])),
    (41, 44, BreakerCode([3, 1, 2])),
    (45, 48, BreakerCode([2, 3, 1])),
    (49, 52, BreakerCode([1, 1, 3])),
    (53, 56, BreakerCode([2, 2, 3])),
    (57, 60, BreakerCode([3, 1, 1])),
    (61, 64, BreakerCode([3, 2, 2])),
    (65, 68, BreakerCode([1, 3, 1])),
    (69, 72, BreakerCode([2, 3, 2])),
    (73, 75, BreakerCode([3, 3, 3])),
    (76, 78, BreakerCode([4, 4, 4])),
    (79, 79, BreakerCode::NOMINAL),
];

impl BreakerCode {
    /// The "000" code every unit falls back to.
    pub const NOMINAL: Self = Self([0, 0, 0]);

    /// Returns the code of a case the matrix documents, if any.
    #[must_use]
    pub fn lookup(case_number: i32) -> Option<Self> {
        BUCKETS
            .iter()
            .find(|(first, last, _)| (*first..=*last).contains(&case_number))
            .map(|&(_, _, code)| code)
    }

    /// Returns the code for a case, using [`BreakerCode::NOMINAL`] for
    /// anything outside the matrix.
    #[must_use]
    pub fn for_case(case_number: i32) -> Self {
        Self::lookup(case_number).unwrap_or(Self::NOMINAL)
    }

    /// Row of the `breakers` setting used by `unit`.
    #[must_use]
    pub fn row(self, unit: UnitPosition) -> usize {
        usize::from(self.0[unit.index()])
    }

    #[must_use]
    pub fn digits(self) -> [u8; 3] {
        self.0
    }
}

impl fmt::Display for BreakerCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.0;
        write!(f, "{a}{b}{c}")
    }
}
