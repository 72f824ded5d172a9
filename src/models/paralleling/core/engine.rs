//! Setpoint arithmetic for P2P DVAr paralleling.
//!
//! Everything here is a pure function of its arguments. Currents are in
//! secondary amperes unless a parameter says "primary".

use uom::si::f64::Angle;

use crate::support::{
    constraint::{Constrained, ConstraintResult, StrictlyPositive},
    phasor::Phasor,
};

use super::{UnitPosition, UnitRatings};

/// Band-center shift per ampere of DVAr current (0.12 V per mA).
pub const VOLTAGE_OFFSET_PER_DVAR_CURRENT: f64 = 120.0;

/// Sensitivity scale below zero; the minimum setting maps to 50 %.
pub const NEGATIVE_SENSITIVITY_MULTIPLIER: f64 = 12.5;

/// Sensitivity scale above zero; the maximum setting maps to 200 %.
pub const POSITIVE_SENSITIVITY_MULTIPLIER: f64 = 25.0;

/// Load current injected while the line breaker is open.
pub const CURRENT_AT_LINE_BREAKER_OPEN: f64 = 0.0;

/// Band-center and sensitivity settings of a unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Regulation {
    /// Band-center setting, volts.
    pub band_center: f64,
    pub sensitivity: f64,
}

/// LDC resistance and reactance settings, volts.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LineDropCompensation {
    pub r: f64,
    pub x: f64,
}

/// A unit's circulating current with the ratings used to normalize it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UnitLoading {
    pub ic: f64,
    pub ct: f64,
    pub mva: f64,
}

/// Highest MVA rating and CT ratio among the units of a scheme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchemeMaxima {
    pub mva: Constrained<f64, StrictlyPositive>,
    pub ct: Constrained<f64, StrictlyPositive>,
}

impl SchemeMaxima {
    /// # Errors
    ///
    /// Returns an error if either value is not strictly positive.
    pub fn new(mva: f64, ct: f64) -> ConstraintResult<Self> {
        Ok(Self {
            mva: StrictlyPositive::new(mva)?,
            ct: StrictlyPositive::new(ct)?,
        })
    }

    /// Takes the maxima over validated unit ratings.
    #[must_use]
    pub fn of(units: &[UnitRatings; 3]) -> Self {
        let [first, rest @ ..] = units;
        rest.iter().fold(
            Self {
                mva: first.mva,
                ct: first.ct,
            },
            |max, unit| Self {
                mva: if unit.mva.get() > max.mva.get() {
                    unit.mva
                } else {
                    max.mva
                },
                ct: if unit.ct.get() > max.ct.get() {
                    unit.ct
                } else {
                    max.ct
                },
            },
        )
    }
}

/// Percentage scale applied to the DVAr voltage offset.
///
/// A sensitivity of 2 gives 1.5, a sensitivity of −4 gives 0.5.
#[must_use]
pub fn sensitivity_multiplier(sensitivity: f64) -> f64 {
    let scale = if sensitivity < 0.0 {
        NEGATIVE_SENSITIVITY_MULTIPLIER
    } else {
        POSITIVE_SENSITIVITY_MULTIPLIER
    };
    (sensitivity * scale + 100.0) / 100.0
}

/// Band-center shifted by the unit's DVAr current, before any LDC.
#[must_use]
pub fn operating_voltage(regulation: Regulation, dvar_current: f64) -> f64 {
    regulation.band_center
        - dvar_current
            * VOLTAGE_OFFSET_PER_DVAR_CURRENT
            * sensitivity_multiplier(regulation.sensitivity)
}

/// Band-center voltage the unit should regulate to.
///
/// For a paralleled unit the LDC drop is added as a phasor
/// (Tap Changer Controls Application Note #17):
///
/// ```text
/// VB = |VL + apu · (R·(cos θ + j sin θ) − X·(sin θ + j cos θ))|
/// ```
///
/// where `θ` is the load current phase. A unit outside the scheme gets no
/// LDC term at all and the result is `|VL|`.
#[must_use]
pub fn band_center_voltage(
    regulation: Regulation,
    dvar_current: f64,
    ldc: LineDropCompensation,
    load_current_phase: Angle,
    active_power_unit: f64,
    is_parallel: bool,
) -> f64 {
    let v_load = Phasor::real(operating_voltage(regulation, dvar_current));

    if !is_parallel {
        return v_load.magnitude();
    }

    let r_set = Phasor::unit(load_current_phase);
    let x_set = -Phasor::new(r_set.im, r_set.re);
    let compensation = active_power_unit * (ldc.r * r_set + ldc.x * x_set);

    (v_load + compensation).magnitude()
}

/// Total load current magnitude to inject, `√(IL² + (IC + IQ)²)`.
#[must_use]
pub fn load_current_magnitude_to_apply(nominal_il: f64, nominal_ic: f64, reactive_il: f64) -> f64 {
    let total_reactive = nominal_ic + reactive_il;
    (nominal_il.powi(2) + total_reactive.powi(2)).sqrt()
}

/// Secondary load current seen by a unit.
///
/// With the line breaker open the unit carries
/// [`CURRENT_AT_LINE_BREAKER_OPEN`].
#[must_use]
pub fn load_current_magnitude(
    line_breaker_closed: bool,
    primary_il: f64,
    impedance_ratio: f64,
    ct: f64,
) -> f64 {
    if line_breaker_closed {
        primary_il * impedance_ratio / ct
    } else {
        CURRENT_AT_LINE_BREAKER_OPEN
    }
}

/// Phase of the total injected current, `atan2(IC + IQ, IL)`.
///
/// Works in all four quadrants. Exactly zero when both operands are zero.
#[must_use]
pub fn load_current_phase(nominal_il: f64, nominal_ic: f64, reactive_il: f64) -> Angle {
    Phasor::new(nominal_il, nominal_ic + reactive_il).angle()
}

/// Phase of the load current alone, `atan2(IQ, IL)`.
#[must_use]
pub fn load_phase(nominal_il: f64, reactive_il: f64) -> Angle {
    Phasor::new(nominal_il, reactive_il).angle()
}

/// Circulating current of `target` for the number of paralleled units.
///
/// `paralleled` is indexed by unit position. The sign convention is fixed
/// per unit: units 1 and 2 sink, unit 3 sources, except that with only
/// units 1 and 2 paralleled, unit 2 sources. In a three-unit scheme the
/// primary current splits between units 1 and 2 by impedance.
///
/// Counts outside 0–3 yield zero.
#[must_use]
pub fn circulating_current(
    paralleled: [bool; 3],
    target: UnitPosition,
    primary_ic: f64,
    z1: f64,
    z2: f64,
    ct: f64,
    parallel_unit_count: usize,
) -> f64 {
    let [unit1, unit2, unit3] = paralleled;

    match (parallel_unit_count, target) {
        (2, UnitPosition::One) if unit1 => -(primary_ic / ct),
        (2, UnitPosition::Two) if unit2 && unit3 => -(primary_ic / ct),
        (2, UnitPosition::Two) if unit2 => primary_ic / ct,
        (2, UnitPosition::Three) if unit3 => primary_ic / ct,
        (3, UnitPosition::One) => -(primary_ic * (z1 / (z1 + z2)) / ct),
        (3, UnitPosition::Two) => -(primary_ic * (z2 / (z1 + z2)) / ct),
        (3, UnitPosition::Three) => primary_ic / ct,
        _ => 0.0,
    }
}

/// Circulating current scaled to the scheme's highest CT and MVA.
#[must_use]
pub fn corrected_circulating_current(loading: UnitLoading, maxima: SchemeMaxima) -> f64 {
    (loading.ic * loading.ct * maxima.mva.get()) / (loading.mva * maxima.ct.get())
}

/// DVAr current a unit must run to balance circulating current.
///
/// The average of the corrected circulating currents minus the unit's own.
/// Only units with a non-zero raw circulating current count toward the
/// average. A unit with zero circulating current needs no correction.
#[must_use]
pub fn dvar_correction(units: [UnitLoading; 3], me: UnitLoading, maxima: SchemeMaxima) -> f64 {
    if me.ic == 0.0 {
        return 0.0;
    }

    let (sum, participating) = units
        .iter()
        .filter(|unit| unit.ic != 0.0)
        .fold((0.0, 0_u32), |(sum, n), &unit| {
            (sum + corrected_circulating_current(unit, maxima), n + 1)
        });

    let average = if participating == 0 {
        0.0
    } else {
        sum / f64::from(participating)
    };

    average - corrected_circulating_current(me, maxima)
}

/// Circulating current equalized to the scheme's highest CT ratio.
#[must_use]
pub fn ct_equalized_dvar_current(ic: f64, ct: f64, max_ct: f64) -> f64 {
    ic * ct / max_ct
}

/// Load current in per-unit of the rated three-phase current.
#[must_use]
pub fn active_power_unit(
    line_to_line_voltage: f64,
    max_full_load_current: f64,
    real_load_current: f64,
    reactive_load_current: f64,
) -> f64 {
    let i_rated = max_full_load_current / (3_f64.sqrt() * line_to_line_voltage);
    let i_total = Phasor::new(real_load_current, reactive_load_current).magnitude();
    i_total / i_rated
}

/// Whether a unit is in the paralleling scheme.
///
/// The line breaker must be closed together with the right tie, the left
/// tie, or both.
#[must_use]
pub fn is_paralleling(line: bool, right_tie: bool, left_tie: bool) -> bool {
    matches!(
        (line, right_tie, left_tie),
        (true, false, true) | (true, true, false) | (true, true, true)
    )
}

/// Number of units reporting as paralleled.
#[must_use]
pub fn count_parallel_units(statuses: &[bool]) -> usize {
    statuses.iter().filter(|&&paralleled| paralleled).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::angle::degree;

    const ALL: [bool; 3] = [true, true, true];

    fn degrees(angle: Angle) -> f64 {
        angle.get::<degree>()
    }

    fn maxima() -> SchemeMaxima {
        SchemeMaxima::new(100.0, 5000.0).unwrap()
    }

    fn regulation(band_center: f64, sensitivity: f64) -> Regulation {
        Regulation {
            band_center,
            sensitivity,
        }
    }

    #[test]
    fn sensitivity_scales() {
        assert_relative_eq!(sensitivity_multiplier(0.0), 1.0);
        assert_relative_eq!(sensitivity_multiplier(2.0), 1.5);
        assert_relative_eq!(sensitivity_multiplier(4.0), 2.0);
        assert_relative_eq!(sensitivity_multiplier(-4.0), 0.5);
    }

    #[test]
    fn operating_voltage_drops_with_dvar_current() {
        // 10 mA at 100 % sensitivity is 1.2 V.
        assert_relative_eq!(operating_voltage(regulation(120.0, 0.0), 0.010), 118.8, epsilon = 1e-12);
        // Same current at 150 %.
        assert_relative_eq!(operating_voltage(regulation(120.0, 2.0), 0.010), 118.2, epsilon = 1e-12);
        // Negative DVAr current raises the band-center.
        assert_relative_eq!(operating_voltage(regulation(120.0, 0.0), -0.010), 121.2, epsilon = 1e-12);
    }

    #[test]
    fn band_center_without_paralleling_ignores_ldc() {
        let ldc = LineDropCompensation { r: 5.0, x: 3.0 };
        let phase = Angle::new::<degree>(30.0);

        let v = band_center_voltage(regulation(120.0, 0.0), 0.010, ldc, phase, 1.0, false);
        assert_relative_eq!(v, 118.8, epsilon = 1e-12);

        // Magnitude, so a negative load voltage still reads positive.
        let v = band_center_voltage(regulation(-5.0, 0.0), 0.0, ldc, phase, 1.0, false);
        assert_relative_eq!(v, 5.0);
    }

    #[test]
    fn band_center_with_resistive_ldc_at_zero_phase() {
        let ldc = LineDropCompensation { r: 4.0, x: 0.0 };
        let v = band_center_voltage(
            regulation(120.0, 0.0),
            0.0,
            ldc,
            Angle::new::<degree>(0.0),
            0.5,
            true,
        );
        assert_relative_eq!(v, 122.0, epsilon = 1e-12);
    }

    #[test]
    fn band_center_with_reactive_ldc_at_zero_phase() {
        // X phasor at θ = 0 is −j, so the drop is in quadrature.
        let ldc = LineDropCompensation { r: 0.0, x: 3.0 };
        let v = band_center_voltage(
            regulation(4.0, 0.0),
            0.0,
            ldc,
            Angle::new::<degree>(0.0),
            1.0,
            true,
        );
        assert_relative_eq!(v, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn band_center_with_both_terms_at_ninety_degrees() {
        // θ = 90°: R phasor is j, X phasor is −1.
        let ldc = LineDropCompensation { r: 2.0, x: 1.0 };
        let v = band_center_voltage(
            regulation(120.0, 0.0),
            0.0,
            ldc,
            Angle::new::<degree>(90.0),
            2.0,
            true,
        );
        let expected = Phasor::new(120.0 - 2.0, 4.0).magnitude();
        assert_relative_eq!(v, expected, epsilon = 1e-9);
    }

    #[test]
    fn load_current_magnitudes() {
        assert_relative_eq!(load_current_magnitude_to_apply(3.0, 1.0, 3.0), 5.0);
        assert_relative_eq!(load_current_magnitude_to_apply(0.0, -2.0, 0.0), 2.0);

        assert_relative_eq!(load_current_magnitude(true, 1000.0, 10.0, 5000.0), 2.0);
        assert_eq!(
            load_current_magnitude(false, 1000.0, 10.0, 5000.0),
            CURRENT_AT_LINE_BREAKER_OPEN
        );
    }

    #[test]
    fn phase_is_zero_without_current() {
        assert_eq!(degrees(load_current_phase(0.0, 0.0, 0.0)), 0.0);
        assert_eq!(degrees(load_current_phase(0.0, 1.0, -1.0)), 0.0);
        assert_eq!(degrees(load_phase(0.0, 0.0)), 0.0);
    }

    #[test]
    fn phase_covers_all_quadrants() {
        assert_relative_eq!(degrees(load_current_phase(1.0, 0.5, 0.5)), 45.0, epsilon = 1e-9);
        assert_relative_eq!(degrees(load_current_phase(-1.0, 1.0, 0.0)), 135.0, epsilon = 1e-9);
        assert_relative_eq!(degrees(load_current_phase(-1.0, -1.0, 0.0)), -135.0, epsilon = 1e-9);
        assert_relative_eq!(degrees(load_current_phase(1.0, 0.0, -1.0)), -45.0, epsilon = 1e-9);
        assert_relative_eq!(degrees(load_current_phase(0.0, 2.0, 0.0)), 90.0, epsilon = 1e-9);
        assert_relative_eq!(degrees(load_phase(1.0, -1.0)), -45.0, epsilon = 1e-9);
    }

    #[test]
    fn phase_is_never_nan_for_finite_inputs() {
        let samples = [-1e9, -3.5, -1.0, 0.0, 1e-300, 2.0, 7e12];
        for il in samples {
            for ic in samples {
                for iq in samples {
                    assert!(!degrees(load_current_phase(il, ic, iq)).is_nan());
                }
            }
        }
    }

    #[test]
    fn circulating_current_three_units_splits_by_impedance() {
        let ic = |target| circulating_current(ALL, target, 100.0, 1.0, 1.0, 1.0, 3);
        assert_relative_eq!(ic(UnitPosition::One), -50.0);
        assert_relative_eq!(ic(UnitPosition::Two), -50.0);
        assert_relative_eq!(ic(UnitPosition::Three), 100.0);

        let ic = |target| circulating_current(ALL, target, 90.0, 2.0, 1.0, 3.0, 3);
        assert_relative_eq!(ic(UnitPosition::One), -20.0);
        assert_relative_eq!(ic(UnitPosition::Two), -10.0);
        assert_relative_eq!(ic(UnitPosition::Three), 30.0);
    }

    #[test]
    fn circulating_current_two_units_depends_on_partner() {
        let ic = |paralleled, target| circulating_current(paralleled, target, 10.0, 1.0, 1.0, 2.0, 2);

        // Units 1 and 2.
        assert_relative_eq!(ic([true, true, false], UnitPosition::One), -5.0);
        assert_relative_eq!(ic([true, true, false], UnitPosition::Two), 5.0);
        assert_eq!(ic([true, true, false], UnitPosition::Three), 0.0);

        // Units 2 and 3: unit 2 flips sign.
        assert_eq!(ic([false, true, true], UnitPosition::One), 0.0);
        assert_relative_eq!(ic([false, true, true], UnitPosition::Two), -5.0);
        assert_relative_eq!(ic([false, true, true], UnitPosition::Three), 5.0);

        // Units 1 and 3.
        assert_relative_eq!(ic([true, false, true], UnitPosition::One), -5.0);
        assert_eq!(ic([true, false, true], UnitPosition::Two), 0.0);
        assert_relative_eq!(ic([true, false, true], UnitPosition::Three), 5.0);
    }

    #[test]
    fn circulating_current_without_paralleling_is_zero() {
        for count in [0, 1, 4, 17] {
            for target in UnitPosition::ALL {
                assert_eq!(circulating_current(ALL, target, 100.0, 1.0, 1.0, 1.0, count), 0.0);
            }
        }
    }

    #[test]
    fn dvar_correction_is_zero_without_own_circulating_current() {
        let units = [
            UnitLoading { ic: 0.3, ct: 5000.0, mva: 100.0 },
            UnitLoading { ic: -0.7, ct: 2500.0, mva: 50.0 },
            UnitLoading { ic: 1.1, ct: 4500.0, mva: 100.0 },
        ];
        let me = UnitLoading { ic: 0.0, ct: 2500.0, mva: 50.0 };
        assert_eq!(dvar_correction(units, me, maxima()), 0.0);
    }

    #[test]
    fn dvar_correction_averages_only_participating_units() {
        let units = [
            UnitLoading { ic: -0.1, ct: 5000.0, mva: 100.0 },
            UnitLoading { ic: 0.0, ct: 5000.0, mva: 100.0 },
            UnitLoading { ic: 0.1, ct: 5000.0, mva: 100.0 },
        ];

        // Average of −0.1 and 0.1 is zero, so each unit corrects its own current.
        assert_relative_eq!(dvar_correction(units, units[0], maxima()), 0.1);
        assert_relative_eq!(dvar_correction(units, units[2], maxima()), -0.1);
    }

    #[test]
    fn dvar_correction_normalizes_ct_and_mva() {
        let units = [
            UnitLoading { ic: -0.2, ct: 5000.0, mva: 100.0 },
            UnitLoading { ic: -0.2, ct: 5000.0, mva: 100.0 },
            // Half the CT and half the MVA: correction factor 1.
            UnitLoading { ic: 0.4, ct: 2500.0, mva: 50.0 },
        ];
        let me = units[2];

        assert_relative_eq!(corrected_circulating_current(me, maxima()), 0.4);
        assert_relative_eq!(dvar_correction(units, me, maxima()), 0.0 - 0.4);

        // Half the CT at full MVA halves the current.
        let half_ct = UnitLoading { ic: 0.4, ct: 2500.0, mva: 100.0 };
        assert_relative_eq!(corrected_circulating_current(half_ct, maxima()), 0.2);
    }

    #[test]
    fn dvar_correction_with_no_participants_uses_zero_average() {
        let units = [UnitLoading { ic: 0.0, ct: 5000.0, mva: 100.0 }; 3];
        let me = UnitLoading { ic: 0.5, ct: 5000.0, mva: 100.0 };
        assert_relative_eq!(dvar_correction(units, me, maxima()), -0.5);
    }

    #[test]
    fn ct_equalization() {
        assert_relative_eq!(ct_equalized_dvar_current(0.5, 2500.0, 5000.0), 0.25);
    }

    #[test]
    fn active_power_unit_of_rated_current_is_one() {
        let v_ll = 13_800.0;
        let flc = 3_f64.sqrt() * v_ll * 400.0;
        assert_relative_eq!(active_power_unit(v_ll, flc, 400.0, 0.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(active_power_unit(v_ll, flc, 240.0, 320.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn paralleling_truth_table() {
        assert!(!is_paralleling(true, false, false));
        assert!(is_paralleling(true, true, false));
        assert!(is_paralleling(true, false, true));
        assert!(is_paralleling(true, true, true));
        for right in [false, true] {
            for left in [false, true] {
                assert!(!is_paralleling(false, right, left));
            }
        }
    }

    #[test]
    fn counts_paralleled_units() {
        assert_eq!(count_parallel_units(&[]), 0);
        assert_eq!(count_parallel_units(&[false, false, false]), 0);
        assert_eq!(count_parallel_units(&[true, false, true]), 2);
        assert_eq!(count_parallel_units(&ALL), 3);
    }
}
