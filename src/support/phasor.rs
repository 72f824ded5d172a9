//! Two-component phasor arithmetic.
//!
//! [`Phasor`] is a rectangular complex value used for the line-drop
//! compensation terms. It only carries the operations the LDC calculation
//! needs: addition, negation, multiplication (by another phasor or by a real
//! scalar) and magnitude.
//!
//! Angles enter as [`uom`] [`Angle`] values and are converted to radians in
//! [`Phasor::unit`], the single point where trigonometry happens.
//!
//! ```
//! use p2p_paralleling::support::phasor::Phasor;
//! use uom::si::{angle::degree, f64::Angle};
//!
//! let p = Phasor::unit(Angle::new::<degree>(90.0));
//! assert!((p.re).abs() < 1e-12);
//! assert!((p.im - 1.0).abs() < 1e-12);
//! assert!((p.magnitude() - 1.0).abs() < 1e-12);
//! ```

use std::ops::{Add, Mul, Neg};

use uom::si::{angle::radian, f64::Angle};

/// A complex value in rectangular form.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Phasor {
    /// Real (in-phase) component.
    pub re: f64,
    /// Imaginary (quadrature) component.
    pub im: f64,
}

impl Phasor {
    /// The zero phasor.
    pub const ZERO: Self = Self { re: 0.0, im: 0.0 };

    /// Creates a phasor from its rectangular components.
    #[must_use]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Creates a purely real phasor.
    #[must_use]
    pub const fn real(re: f64) -> Self {
        Self { re, im: 0.0 }
    }

    /// Returns `cos θ + j·sin θ`.
    #[must_use]
    pub fn unit(angle: Angle) -> Self {
        let (sin, cos) = angle.get::<radian>().sin_cos();
        Self { re: cos, im: sin }
    }

    /// Returns `|re + j·im|`.
    #[must_use]
    pub fn magnitude(self) -> f64 {
        self.re.hypot(self.im)
    }

    /// Returns the four-quadrant angle of this phasor.
    ///
    /// The zero phasor has no defined angle and reports exactly zero.
    #[must_use]
    pub fn angle(self) -> Angle {
        if self == Self::ZERO {
            return Angle::new::<radian>(0.0);
        }
        Angle::new::<radian>(self.im.atan2(self.re))
    }
}

impl Add for Phasor {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            re: self.re + rhs.re,
            im: self.im + rhs.im,
        }
    }
}

impl Neg for Phasor {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            re: -self.re,
            im: -self.im,
        }
    }
}

impl Mul for Phasor {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self {
            re: self.re * rhs.re - self.im * rhs.im,
            im: self.re * rhs.im + self.im * rhs.re,
        }
    }
}

impl Mul<f64> for Phasor {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self {
            re: self.re * rhs,
            im: self.im * rhs,
        }
    }
}

impl Mul<Phasor> for f64 {
    type Output = Phasor;

    fn mul(self, rhs: Phasor) -> Phasor {
        rhs * self
    }
}
