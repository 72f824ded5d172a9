use crate::support::settings::MemorySettings;

/// A three-unit setup with unit 3 as initiator.
///
/// Breaker rows: 0 `000`, 1 `110`, 2 `101`, 3 `111`, 4 `100`.
pub(crate) fn fixture() -> MemorySettings {
    MemorySettings::new()
        .with("maxnetworkdevice", ["3"])
        .with("totalregulartest", ["72"])
        .with("totaltestnumbers", ["79"])
        .with("ct", ["5000", "4500", "2500"])
        .with("mva", ["100", "50"])
        .with("impedance", ["10", "8"])
        .with("breakers", ["000", "110", "101", "111", "100"])
}
