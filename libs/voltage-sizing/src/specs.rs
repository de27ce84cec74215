//! Data-sheet records for PV modules and string inverters
//!
//! Both records are plain values: built once from a data sheet and never
//! mutated by the sizer that holds them.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, Result, SizingError};

/// STC ratings of one PV module model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelSpecs {
    /// Model name as printed on the data sheet
    pub model_name: String,
    /// Rated power (W)
    pub p_max: f64,
    /// Open-circuit voltage at STC (V)
    pub voc: f64,
    /// Short-circuit current at STC (A)
    pub isc: f64,
    /// Voc temperature coefficient in %/°C (e.g. -0.29)
    pub temp_coeff_voc: f64,
}

impl PanelSpecs {
    pub fn new(
        model_name: impl Into<String>,
        p_max: f64,
        voc: f64,
        isc: f64,
        temp_coeff_voc: f64,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            p_max,
            voc,
            isc,
            temp_coeff_voc,
        }
    }

    /// Check the fields that feed the voltage correction
    ///
    /// Only finiteness is enforced; sign and magnitude are left to the caller.
    pub fn ensure_valid(&self) -> Result<()> {
        ensure_finite("panel.voc", self.voc)?;
        ensure_finite("panel.temp_coeff_voc", self.temp_coeff_voc)
    }
}

/// Ratings of one string inverter model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InverterSpecs {
    pub model_name: String,
    /// Maximum DC input voltage (V)
    pub max_input_voltage: f64,
    /// Lower edge of the MPPT window (V)
    pub mppt_voltage_min: f64,
    /// Upper edge of the MPPT window (V)
    pub mppt_voltage_max: f64,
}

impl InverterSpecs {
    pub fn new(
        model_name: impl Into<String>,
        max_input_voltage: f64,
        mppt_voltage_min: f64,
        mppt_voltage_max: f64,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            max_input_voltage,
            mppt_voltage_min,
            mppt_voltage_max,
        }
    }

    /// Check the voltage limit and the MPPT window ordering
    pub fn ensure_valid(&self) -> Result<()> {
        ensure_finite("inverter.max_input_voltage", self.max_input_voltage)?;
        if self.mppt_voltage_min > self.mppt_voltage_max {
            return Err(SizingError::invalid_mppt_window(
                &self.model_name,
                self.mppt_voltage_min,
                self.mppt_voltage_max,
            ));
        }
        Ok(())
    }
}
