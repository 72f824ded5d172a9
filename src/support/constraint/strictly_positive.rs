use std::cmp::Ordering;

use num_traits::Zero;

use super::{Constrained, Constraint, ConstraintError};

/// Marker type enforcing that a value is strictly positive (greater than zero).
///
/// CT ratios and MVA ratings both end up in denominators, so anything that
/// normalizes by them asks for `Constrained<T, StrictlyPositive>`.
///
/// # Examples
///
/// ```
/// use p2p_paralleling::support::constraint::StrictlyPositive;
///
/// let mva = StrictlyPositive::new(50.0).unwrap();
/// assert_eq!(mva.into_inner(), 50.0);
///
/// assert!(StrictlyPositive::new(0.0).is_err());
/// assert!(StrictlyPositive::new(-1.0).is_err());
/// assert!(StrictlyPositive::new(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StrictlyPositive;

impl StrictlyPositive {
    /// Constructs a [`Constrained<T, StrictlyPositive>`] if the value is strictly positive.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is zero, negative, or not a number (`NaN`).
    pub fn new<T: PartialOrd + Zero>(
        value: T,
    ) -> Result<Constrained<T, StrictlyPositive>, ConstraintError> {
        Constrained::<T, StrictlyPositive>::new(value)
    }
}

impl<T: PartialOrd + Zero> Constraint<T> for StrictlyPositive {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match value.partial_cmp(&T::zero()) {
            Some(Ordering::Greater) => Ok(()),
            Some(Ordering::Equal) => Err(ConstraintError::Zero),
            Some(Ordering::Less) => Err(ConstraintError::Negative),
            None => Err(ConstraintError::NotANumber),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::{electric_potential::volt, f64::ElectricPotential};

    #[test]
    fn floats() {
        assert!(Constrained::<f64, StrictlyPositive>::new(5000.0).is_ok());
        assert_eq!(StrictlyPositive::new(0.0), Err(ConstraintError::Zero));
        assert_eq!(StrictlyPositive::new(-5.0), Err(ConstraintError::Negative));
        assert_eq!(
            StrictlyPositive::new(f64::NAN),
            Err(ConstraintError::NotANumber)
        );
    }

    #[test]
    fn integers() {
        let x = StrictlyPositive::new(3).unwrap();
        assert_eq!(x.as_ref(), &3);
        assert!(StrictlyPositive::new(0).is_err());
    }

    #[test]
    fn voltages() {
        let v = ElectricPotential::new::<volt>(120.0);
        assert!(StrictlyPositive::new(v).is_ok());
        assert!(StrictlyPositive::new(-v).is_err());
    }
}
