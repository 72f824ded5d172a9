//! # P2P Paralleling
//!
//! Setpoint calculations for voltage regulators running a peer-to-peer (P2P)
//! DVAr paralleling scheme, and the test-case matrix that decides which
//! breaker topology and ratings each unit sees.
//!
//! ## Crate layout
//!
//! - [`models`]: The paralleling case resolver, calculation engine and the
//!   [`twine_core::Model`] adapter that ties them together.
//! - [`support`]: Supporting utilities used by models (settings stores,
//!   phasors, numeric constraints).
//!
//! ## Settings
//!
//! Every numeric input that is not an operating condition comes from a
//! [`support::settings::SettingsStore`]. The store is always passed in
//! explicitly; nothing in this crate reads global state.
//!
//! ```
//! use p2p_paralleling::models::paralleling::{CaseResolver, UnitPosition};
//! use p2p_paralleling::support::settings::MemorySettings;
//!
//! let settings = MemorySettings::new()
//!     .with("maxnetworkdevice", ["3"])
//!     .with("totalregulartest", ["72"])
//!     .with("ct", ["5000", "4500", "2500"]);
//!
//! let resolver = CaseResolver::new(&settings);
//! let ct = resolver.resolve_ct(3, UnitPosition::Three).unwrap();
//! assert_eq!(ct, 2500.0);
//! ```

pub mod models;
pub mod support;
