use tracing::debug;
use uom::si::{
    electric_current::ampere,
    electric_potential::volt,
    f64::{Angle, ElectricCurrent, ElectricPotential, Power},
    power::watt,
};

use crate::support::{
    constraint::StrictlyPositive,
    settings::{ConversionError, SettingsStore},
};

use super::{
    BreakerStates, CaseResolver, ElectricalRatings, LineDropCompensation, RatingError,
    Regulation, SchemeMaxima, UnitLoading, UnitPosition, UnitRatings, engine,
};

/// Breaker states and ratings of all three units in one test case.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Scheme {
    /// Indexed by unit position.
    pub breakers: [BreakerStates; 3],
    /// Indexed by unit position.
    pub ratings: [ElectricalRatings; 3],
}

/// Operating point the setpoints are computed for.
///
/// Primary quantities are on the system side of the CTs and are scaled to
/// secondary amperes with each unit's CT ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatingConditions {
    pub band_center: ElectricPotential,
    /// Sensitivity setting, −4 to 4.
    pub sensitivity: f64,
    pub ldc_r: ElectricPotential,
    pub ldc_x: ElectricPotential,
    pub line_to_line_voltage: ElectricPotential,
    /// Three-phase maximum full-load setting.
    ///
    /// Rated current is this divided by `√3 · line_to_line_voltage`, so it is
    /// carried as an apparent power (volt-amperes, read as watts).
    pub max_full_load: Power,
    pub real_load_current: ElectricCurrent,
    pub reactive_load_current: ElectricCurrent,
    pub circulating_current: ElectricCurrent,
}

/// What one unit should be driven to in one test case.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Setpoints {
    pub breakers: BreakerStates,
    pub ratings: ElectricalRatings,
    /// Paralleling status of every unit, indexed by position.
    pub paralleled: [bool; 3],
    pub parallel_units: usize,
    pub is_parallel: bool,
    /// Secondary circulating current of this unit.
    pub circulating_current: ElectricCurrent,
    /// DVAr current needed to balance the scheme.
    pub dvar_current: ElectricCurrent,
    /// Total secondary current to inject.
    pub load_current: ElectricCurrent,
    pub load_current_phase: Angle,
    pub active_power_unit: f64,
    pub band_center: ElectricPotential,
}

impl Scheme {
    /// Resolves breakers and ratings of every unit for `case_number`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConversionError`] if the store holds unreadable data.
    pub fn resolve<S: SettingsStore + ?Sized>(
        resolver: &CaseResolver<'_, S>,
        case_number: i32,
    ) -> Result<Self, ConversionError> {
        let mut scheme = Self::default();
        for unit in UnitPosition::ALL {
            scheme.breakers[unit.index()] = resolver.resolve_breakers(case_number, unit)?;
            scheme.ratings[unit.index()] = resolver.resolve_ratings(case_number, unit)?;
        }
        Ok(scheme)
    }

    /// Paralleling status of every unit.
    #[must_use]
    pub fn paralleled(&self) -> [bool; 3] {
        self.breakers.map(|states| states.is_paralleling())
    }

    /// Computes the setpoints of `target` under `conditions`.
    ///
    /// # Errors
    ///
    /// Returns a [`RatingError`] if any unit has a CT ratio or MVA rating
    /// that is not strictly positive, or if all three units are paralleled
    /// and the impedances of units 1 and 2 don't sum to a positive value.
    pub fn setpoints(
        &self,
        target: UnitPosition,
        conditions: &OperatingConditions,
    ) -> Result<Setpoints, RatingError> {
        let validated = self.validated_ratings()?;
        let maxima = SchemeMaxima::of(&validated);

        let paralleled = self.paralleled();
        let parallel_units = engine::count_parallel_units(&paralleled);
        let is_parallel = paralleled[target.index()];

        let primary_ic = conditions.circulating_current.get::<ampere>();
        let z1 = self.ratings[UnitPosition::One.index()].impedance;
        let z2 = self.ratings[UnitPosition::Two.index()].impedance;
        if parallel_units == 3 {
            StrictlyPositive::new(z1 + z2)
                .map_err(|source| RatingError::ImpedanceSplit { z1, z2, source })?;
        }

        let loadings = UnitPosition::ALL.map(|unit| {
            let ratings = validated[unit.index()];
            let ct = ratings.ct.get();
            UnitLoading {
                ic: engine::circulating_current(
                    paralleled,
                    unit,
                    primary_ic,
                    z1,
                    z2,
                    ct,
                    parallel_units,
                ),
                ct,
                mva: ratings.mva.get(),
            }
        });
        let me = loadings[target.index()];
        let dvar_current = engine::dvar_correction(loadings, me, maxima);

        let breakers = self.breakers[target.index()];
        let ratings = self.ratings[target.index()];
        let secondary = |primary: ElectricCurrent| {
            engine::load_current_magnitude(
                breakers.line,
                primary.get::<ampere>(),
                ratings.impedance,
                me.ct,
            )
        };
        let nominal_il = secondary(conditions.real_load_current);
        let reactive_il = secondary(conditions.reactive_load_current);

        let active_power_unit = engine::active_power_unit(
            conditions.line_to_line_voltage.get::<volt>(),
            conditions.max_full_load.get::<watt>(),
            conditions.real_load_current.get::<ampere>(),
            conditions.reactive_load_current.get::<ampere>(),
        );

        let band_center = engine::band_center_voltage(
            Regulation {
                band_center: conditions.band_center.get::<volt>(),
                sensitivity: conditions.sensitivity,
            },
            dvar_current,
            LineDropCompensation {
                r: conditions.ldc_r.get::<volt>(),
                x: conditions.ldc_x.get::<volt>(),
            },
            engine::load_phase(nominal_il, reactive_il),
            active_power_unit,
            is_parallel,
        );

        let setpoints = Setpoints {
            breakers,
            ratings,
            paralleled,
            parallel_units,
            is_parallel,
            circulating_current: ElectricCurrent::new::<ampere>(me.ic),
            dvar_current: ElectricCurrent::new::<ampere>(dvar_current),
            load_current: ElectricCurrent::new::<ampere>(engine::load_current_magnitude_to_apply(
                nominal_il,
                me.ic,
                reactive_il,
            )),
            load_current_phase: engine::load_current_phase(nominal_il, me.ic, reactive_il),
            active_power_unit,
            band_center: ElectricPotential::new::<volt>(band_center),
        };

        debug!(
            %target,
            parallel_units,
            is_parallel,
            ic = me.ic,
            dvar = dvar_current,
            band_center,
            "computed setpoints"
        );
        Ok(setpoints)
    }

    fn validated_ratings(&self) -> Result<[UnitRatings; 3], RatingError> {
        let [one, two, three] = self.ratings;
        Ok([
            one.validate(UnitPosition::One)?,
            two.validate(UnitPosition::Two)?,
            three.validate(UnitPosition::Three)?,
        ])
    }
}
