//! [`twine_core::Model`] adapter over the paralleling core.

mod config;
mod error;

pub use config::ParallelingConfig;
pub use error::SetpointError;

use std::cell::RefCell;

use tracing::debug;
use twine_core::Model;

use crate::support::settings::{Field, SettingsStore};

use super::core::{CaseResolver, OperatingConditions, Scheme, Setpoints, UnitPosition};

/// One unit in one test case under given operating conditions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestPoint {
    pub case_number: i32,
    pub unit: UnitPosition,
    pub conditions: OperatingConditions,
}

/// Computes a unit's setpoints for a test case.
///
/// Resolves breakers and ratings for the whole scheme from the settings
/// store, then runs the calculation engine for the requested unit.
///
/// ```
/// use p2p_paralleling::models::paralleling::{
///     OperatingConditions, ParallelingModel, TestPoint, UnitPosition,
/// };
/// use p2p_paralleling::support::settings::MemorySettings;
/// use twine_core::Model;
/// use uom::si::{
///     electric_current::ampere,
///     electric_potential::volt,
///     f64::{ElectricCurrent, ElectricPotential, Power},
///     power::watt,
/// };
///
/// let settings = MemorySettings::new()
///     .with("ct", ["1000"])
///     .with("mva", ["100"])
///     .with("impedance", ["1"])
///     .with("breakers", ["000", "110", "101"]);
///
/// let model = ParallelingModel::new(&settings);
/// let setpoints = model
///     .call(&TestPoint {
///         case_number: 21,
///         unit: UnitPosition::Three,
///         conditions: OperatingConditions {
///             band_center: ElectricPotential::new::<volt>(120.0),
///             sensitivity: 0.0,
///             ldc_r: ElectricPotential::new::<volt>(0.0),
///             ldc_x: ElectricPotential::new::<volt>(0.0),
///             line_to_line_voltage: ElectricPotential::new::<volt>(13_800.0),
///             max_full_load: Power::new::<watt>(12_000_000.0),
///             real_load_current: ElectricCurrent::new::<ampere>(400.0),
///             reactive_load_current: ElectricCurrent::new::<ampere>(0.0),
///             circulating_current: ElectricCurrent::new::<ampere>(100.0),
///         },
///     })
///     .unwrap();
///
/// assert_eq!(setpoints.parallel_units, 3);
/// assert!((setpoints.circulating_current.get::<ampere>() - 0.1).abs() < 1e-12);
/// ```
#[derive(Debug)]
pub struct ParallelingModel<'a, S: ?Sized> {
    settings: &'a S,
    config: ParallelingConfig,
}

impl<'a, S: SettingsStore + ?Sized> ParallelingModel<'a, S> {
    /// Creates a model with the default (lenient) configuration.
    #[must_use]
    pub fn new(settings: &'a S) -> Self {
        Self::with_config(settings, ParallelingConfig::default())
    }

    #[must_use]
    pub fn with_config(settings: &'a S, config: ParallelingConfig) -> Self {
        Self { settings, config }
    }

    #[must_use]
    pub fn config(&self) -> ParallelingConfig {
        self.config
    }

    /// Computes the setpoints of one unit in one test case.
    ///
    /// # Errors
    ///
    /// Returns a [`SetpointError`] if the store holds unreadable data, a
    /// rating can't be used, or (in strict mode) a lookup was defaulted.
    pub fn setpoints(&self, point: &TestPoint) -> Result<Setpoints, SetpointError> {
        let audited = AuditedSettings::new(self.settings);
        let scheme = Scheme::resolve(&CaseResolver::new(&audited), point.case_number);
        self.check(&audited)?;
        let scheme = scheme?;

        debug!(case_number = point.case_number, unit = %point.unit, "resolved scheme");
        Ok(scheme.setpoints(point.unit, &point.conditions)?)
    }

    /// Computes the setpoints of `unit` for every test case in the matrix.
    ///
    /// # Errors
    ///
    /// Stops at the first case that fails, see [`setpoints`](Self::setpoints).
    pub fn sweep(
        &self,
        unit: UnitPosition,
        conditions: &OperatingConditions,
    ) -> Result<Vec<(i32, Setpoints)>, SetpointError> {
        let audited = AuditedSettings::new(self.settings);
        let cases = CaseResolver::new(&audited).test_cases();
        self.check(&audited)?;
        let cases = cases?;

        cases
            .map(|case_number| {
                let point = TestPoint {
                    case_number,
                    unit,
                    conditions: *conditions,
                };
                Ok((case_number, self.setpoints(&point)?))
            })
            .collect()
    }

    fn check(&self, audited: &AuditedSettings<'_, S>) -> Result<(), SetpointError> {
        if !self.config.strict_settings {
            return Ok(());
        }
        match audited.first_miss() {
            Some((name, index, field)) => Err(SetpointError::DefaultedSetting { name, index, field }),
            None => Ok(()),
        }
    }
}

impl<S: SettingsStore + ?Sized> Model for ParallelingModel<'_, S> {
    type Input = TestPoint;
    type Output = Setpoints;
    type Error = SetpointError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.setpoints(input)
    }
}

/// A store wrapper that remembers which lookups came back empty.
struct AuditedSettings<'a, S: ?Sized> {
    inner: &'a S,
    misses: RefCell<Vec<(String, usize, Field)>>,
}

impl<'a, S: SettingsStore + ?Sized> AuditedSettings<'a, S> {
    fn new(inner: &'a S) -> Self {
        Self {
            inner,
            misses: RefCell::new(Vec::new()),
        }
    }

    fn first_miss(&self) -> Option<(String, usize, Field)> {
        self.misses.borrow().first().cloned()
    }
}

impl<S: SettingsStore + ?Sized> SettingsStore for AuditedSettings<'_, S> {
    fn lookup(&self, name: &str, index: usize, field: Field) -> Option<String> {
        let found = self.inner.lookup(name, index, field);
        if found.is_none() {
            self.misses.borrow_mut().push((name.to_owned(), index, field));
        }
        found
    }
}
