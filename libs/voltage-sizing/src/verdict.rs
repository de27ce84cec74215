//! String validation verdict

use serde::{Deserialize, Serialize};
use std::fmt;

/// Safety label of a validated string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StringStatus {
    #[serde(rename = "SAFE")]
    Safe,
    #[serde(rename = "CRITICAL: EXCEEDS INVERTER LIMIT")]
    ExceedsLimit,
}

impl StringStatus {
    pub fn from_safe(is_safe: bool) -> Self {
        if is_safe {
            Self::Safe
        } else {
            Self::ExceedsLimit
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "SAFE",
            Self::ExceedsLimit => "CRITICAL: EXCEEDS INVERTER LIMIT",
        }
    }

    pub fn is_safe(&self) -> bool {
        matches!(self, Self::Safe)
    }
}

impl fmt::Display for StringStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Longest string length that stays within the inverter limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "modules", rename_all = "snake_case")]
pub enum MaxStringLength {
    /// No count validates, not even an empty string (negative limit)
    NoneSafe,
    /// Largest safe count; `Modules(0)` when a single module exceeds the limit
    Modules(u32),
    /// Every count up to `u32::MAX` is safe, the true bound lies beyond
    Saturated,
    /// The string voltage never rises with length
    Unbounded,
}

impl MaxStringLength {
    /// The bounded module count, if there is one
    pub fn modules(&self) -> Option<u32> {
        match self {
            Self::Modules(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoneSafe => "none_safe",
            Self::Modules(_) => "modules",
            Self::Saturated => "saturated",
            Self::Unbounded => "unbounded",
        }
    }
}

/// Outcome of validating one string length against an inverter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// `true` when the string voltage is at or below the limit
    pub valid: bool,
    /// Cold-corrected string Voc, rounded to 2 decimals (V)
    pub max_string_voltage: f64,
    /// Inverter maximum DC input voltage (V)
    pub limit: f64,
    pub status: StringStatus,
}

impl ValidationResult {
    /// Compare a computed string voltage against the limit (inclusive)
    pub fn new(max_string_voltage: f64, limit: f64) -> Self {
        let valid = max_string_voltage <= limit;
        Self {
            valid,
            max_string_voltage,
            limit,
            status: StringStatus::from_safe(valid),
        }
    }

    /// Headroom left below the limit (negative when exceeded)
    pub fn margin(&self) -> f64 {
        self.limit - self.max_string_voltage
    }
}
