//! StringSizer - NEC 690.7 string length validation
//!
//! Corrects the module Voc for the coldest expected ambient temperature,
//! scales it by the number of series modules and compares the result with
//! the inverter's maximum DC input voltage.
//!
//! ```text
//! Voc_max = Voc * (1 + (coeff / 100) * (T_min - 25)) * N
//! ```

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{ensure_finite, Result};
use crate::numeric::round_half_even;
use crate::specs::{InverterSpecs, PanelSpecs};
use crate::verdict::{MaxStringLength, ValidationResult};

/// STC cell reference temperature (°C)
pub const STC_REFERENCE_TEMP_C: f64 = 25.0;

/// Design ambient temperature used when none is given (°C)
pub const DEFAULT_MIN_TEMP_C: f64 = -10.0;

/// Decimal places kept in reported string voltages
pub const VOLTAGE_DECIMALS: usize = 2;

/// String length validator for one panel / inverter pairing
///
/// Configuration is fixed at construction; every operation takes `&self`
/// and is a pure function of that configuration and its argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringSizer {
    panel: PanelSpecs,
    inverter: InverterSpecs,
    min_temp_c: f64,
}

impl StringSizer {
    /// Create a sizer for the given design temperature
    ///
    /// # Arguments
    /// * `panel` - Module data sheet ratings
    /// * `inverter` - Inverter ratings
    /// * `min_temp_c` - Coldest expected ambient temperature (°C)
    ///
    /// # Errors
    /// Non-finite Voc, temperature coefficient, voltage limit or design
    /// temperature, and an inverted MPPT window.
    pub fn new(panel: PanelSpecs, inverter: InverterSpecs, min_temp_c: f64) -> Result<Self> {
        panel.ensure_valid()?;
        inverter.ensure_valid()?;
        ensure_finite("min_temp_c", min_temp_c)?;

        debug!(
            panel = %panel.model_name,
            inverter = %inverter.model_name,
            min_temp_c,
            "string sizer configured"
        );

        Ok(Self {
            panel,
            inverter,
            min_temp_c,
        })
    }

    /// Create a sizer at [`DEFAULT_MIN_TEMP_C`]
    pub fn with_default_temp(panel: PanelSpecs, inverter: InverterSpecs) -> Result<Self> {
        Self::new(panel, inverter, DEFAULT_MIN_TEMP_C)
    }

    pub fn panel(&self) -> &PanelSpecs {
        &self.panel
    }

    pub fn inverter(&self) -> &InverterSpecs {
        &self.inverter
    }

    pub fn min_temp_c(&self) -> f64 {
        self.min_temp_c
    }

    /// Voc multiplier at the design temperature (> 1 below 25 °C for
    /// negative coefficients)
    pub fn correction_factor(&self) -> f64 {
        let coeff = self.panel.temp_coeff_voc / 100.0;
        let delta_t = self.min_temp_c - STC_REFERENCE_TEMP_C;
        1.0 + coeff * delta_t
    }

    /// Single-module Voc at the design temperature, unrounded (V)
    pub fn corrected_module_voc(&self) -> f64 {
        self.panel.voc * self.correction_factor()
    }

    /// Maximum string Voc for `modules_per_string` series modules (V)
    ///
    /// Rounded to [`VOLTAGE_DECIMALS`] places. Zero and negative counts are
    /// not rejected; they scale the voltage accordingly.
    pub fn compute_corrected_voltage(&self, modules_per_string: i64) -> f64 {
        let voc_corrected = self.corrected_module_voc();
        let max_v = round_half_even(
            voc_corrected * modules_per_string as f64,
            VOLTAGE_DECIMALS,
        );

        debug!(
            modules = modules_per_string,
            voc_corrected,
            max_v,
            "string voltage corrected"
        );

        max_v
    }

    /// Validate a string length against the inverter limit
    ///
    /// A voltage exactly at the limit is safe.
    pub fn validate(&self, modules_per_string: i64) -> ValidationResult {
        if modules_per_string <= 0 {
            warn!(
                modules = modules_per_string,
                "non-positive module count, voltage is not physically meaningful"
            );
        }

        let result = ValidationResult::new(
            self.compute_corrected_voltage(modules_per_string),
            self.inverter.max_input_voltage,
        );

        if !result.valid {
            warn!(
                modules = modules_per_string,
                max_v = result.max_string_voltage,
                limit = result.limit,
                inverter = %self.inverter.model_name,
                "string exceeds inverter limit"
            );
        }

        result
    }

    /// Longest string that still validates as safe
    ///
    /// Uses the same rounded voltage as [`validate`](Self::validate), so the
    /// two always agree. Counts are searched over `0..=u32::MAX`:
    ///
    /// - [`MaxStringLength::Modules`] is the largest `N` with
    ///   `validate(N).valid`; `Modules(0)` means one module already exceeds
    ///   the limit while an empty string does not.
    /// - [`MaxStringLength::NoneSafe`] when `validate(0)` already fails,
    ///   i.e. the limit is negative.
    /// - [`MaxStringLength::Saturated`] when even `u32::MAX` modules pass.
    /// - [`MaxStringLength::Unbounded`] when the corrected module Voc is not
    ///   positive, so adding modules never raises the voltage.
    pub fn max_safe_modules(&self) -> MaxStringLength {
        let per_module = self.corrected_module_voc();
        let limit = self.inverter.max_input_voltage;

        let outcome = if per_module.is_nan() {
            MaxStringLength::NoneSafe
        } else if per_module <= 0.0 {
            if per_module < 0.0 || self.is_safe_count(0) {
                MaxStringLength::Unbounded
            } else {
                MaxStringLength::NoneSafe
            }
        } else if !self.is_safe_count(0) {
            MaxStringLength::NoneSafe
        } else if self.is_safe_count(u32::MAX) {
            MaxStringLength::Saturated
        } else {
            // Rounded voltage is non-decreasing in N: `lo` stays safe, `hi` unsafe
            let (mut lo, mut hi) = (0u32, u32::MAX);
            while hi - lo > 1 {
                let mid = lo + (hi - lo) / 2;
                if self.is_safe_count(mid) {
                    lo = mid;
                } else {
                    hi = mid;
                }
            }
            MaxStringLength::Modules(lo)
        };

        debug!(
            outcome = outcome.as_str(),
            max_modules = ?outcome.modules(),
            per_module,
            limit,
            "max safe string length"
        );
        outcome
    }

    fn is_safe_count(&self, modules: u32) -> bool {
        self.compute_corrected_voltage(i64::from(modules)) <= self.inverter.max_input_voltage
    }
}
