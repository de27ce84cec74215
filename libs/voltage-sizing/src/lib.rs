//! voltage-sizing - PV string sizing for VoltageEMS
//!
//! Checks a series string of PV modules against an inverter's maximum DC
//! input voltage after correcting module Voc for the coldest design
//! temperature (NEC 690.7).
//!
//! # Example
//!
//! ```rust
//! use voltage_sizing::{InverterSpecs, MaxStringLength, PanelSpecs, StringSizer, StringStatus};
//!
//! let panel = PanelSpecs::new("Mono-450", 450.0, 45.0, 11.2, -0.29);
//! let inverter = InverterSpecs::new("SG-600", 600.0, 200.0, 550.0);
//! let sizer = StringSizer::new(panel, inverter, -10.0).unwrap();
//!
//! assert_eq!(sizer.compute_corrected_voltage(12), 594.81);
//!
//! let result = sizer.validate(13);
//! assert!(!result.valid);
//! assert_eq!(result.max_string_voltage, 644.38);
//! assert_eq!(result.status, StringStatus::ExceedsLimit);
//!
//! assert_eq!(sizer.max_safe_modules(), MaxStringLength::Modules(12));
//! ```
//!
//! # Rounding
//!
//! String voltages are rounded to 2 decimals, ties to even on the exact
//! decimal value of the computed `f64` (see [`round_half_even`]).

pub mod error;
pub mod numeric;
pub mod sizer;
pub mod specs;
pub mod verdict;

// Re-exports for convenience
pub use error::{Result, SizingError};
pub use numeric::round_half_even;
pub use sizer::{StringSizer, DEFAULT_MIN_TEMP_C, STC_REFERENCE_TEMP_C, VOLTAGE_DECIMALS};
pub use specs::{InverterSpecs, PanelSpecs};
pub use verdict::{MaxStringLength, StringStatus, ValidationResult};
