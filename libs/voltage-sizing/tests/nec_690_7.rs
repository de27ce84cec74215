//! NEC 690.7 string sizing scenarios
//!
//! - Reference designs from module / inverter data sheets
//! - Properties that hold for any configuration (linearity, STC identity,
//!   validate/compute agreement, inclusive limit)

#![allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable

use voltage_sizing::{InverterSpecs, PanelSpecs, StringSizer, StringStatus, DEFAULT_MIN_TEMP_C};

fn mono_450() -> PanelSpecs {
    PanelSpecs::new("Mono-450", 450.0, 45.0, 11.2, -0.29)
}

fn sg_600() -> InverterSpecs {
    InverterSpecs::new("SG-600", 600.0, 200.0, 550.0)
}

fn sizers() -> Vec<StringSizer> {
    let panels = [
        mono_450(),
        PanelSpecs::new("Poly-330", 330.0, 46.2, 9.1, -0.33),
        PanelSpecs::new("HJT-400", 400.0, 49.8, 10.3, -0.24),
        PanelSpecs::new("Thin-120", 120.0, 87.5, 1.9, -0.28),
    ];
    let inverters = [
        sg_600(),
        InverterSpecs::new("SG-1000", 1000.0, 200.0, 950.0),
        InverterSpecs::new("CH-1500", 1500.0, 600.0, 1300.0),
    ];
    let temps = [-40.0, -25.0, -10.0, 0.0, 25.0, 40.0];

    let mut out = Vec::new();
    for panel in &panels {
        for inverter in &inverters {
            for temp in temps {
                out.push(StringSizer::new(panel.clone(), inverter.clone(), temp).unwrap());
            }
        }
    }
    out
}

// ============================================================================
// Reference designs
// ============================================================================

#[test]
fn test_twelve_module_string_is_safe() {
    let sizer = StringSizer::new(mono_450(), sg_600(), -10.0).unwrap();
    let result = sizer.validate(12);

    assert!(result.valid);
    assert_eq!(result.max_string_voltage, 594.81);
    assert_eq!(result.limit, 600.0);
    assert_eq!(result.status.to_string(), "SAFE");
}

#[test]
fn test_thirteen_module_string_exceeds_limit() {
    let sizer = StringSizer::new(mono_450(), sg_600(), -10.0).unwrap();
    let result = sizer.validate(13);

    assert!(!result.valid);
    assert_eq!(result.max_string_voltage, 644.38);
    assert_eq!(result.limit, 600.0);
    assert_eq!(result.status.to_string(), "CRITICAL: EXCEEDS INVERTER LIMIT");
}

#[test]
fn test_stc_temperature_ignores_coefficient() {
    for coeff in [-0.5, -0.29, 0.0, 0.31] {
        let panel = PanelSpecs::new("P-40", 300.0, 40.0, 9.0, coeff);
        let sizer = StringSizer::new(panel, sg_600(), 25.0).unwrap();
        assert_eq!(sizer.compute_corrected_voltage(10), 400.0, "coeff {}", coeff);
    }
}

#[test]
fn test_default_design_temperature() {
    let explicit = StringSizer::new(mono_450(), sg_600(), DEFAULT_MIN_TEMP_C).unwrap();
    let default = StringSizer::with_default_temp(mono_450(), sg_600()).unwrap();
    assert_eq!(explicit, default);
    assert_eq!(default.min_temp_c(), -10.0);
}

#[test]
fn test_configuration_round_trip() {
    let panel = PanelSpecs::new("Mono-450", 450.0, 45.0, 11.2, -0.29);
    let inverter = InverterSpecs::new("SG-600", 600.0, 200.0, 550.0);
    let sizer = StringSizer::new(panel.clone(), inverter.clone(), -17.5).unwrap();

    assert_eq!(sizer.panel(), &panel);
    assert_eq!(sizer.inverter(), &inverter);
    assert_eq!(sizer.min_temp_c(), -17.5);
    assert_eq!(sizer.inverter().mppt_voltage_min, 200.0);
    assert_eq!(sizer.inverter().mppt_voltage_max, 550.0);
}

#[test]
fn test_validation_does_not_touch_configuration() {
    let sizer = StringSizer::new(mono_450(), sg_600(), -10.0).unwrap();
    let before = sizer.clone();
    for n in 0..30 {
        let _ = sizer.validate(n);
    }
    assert_eq!(sizer, before);
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_voltage_is_linear_in_module_count() {
    for sizer in sizers() {
        for n in 1..=20 {
            let single = sizer.compute_corrected_voltage(n);
            let double = sizer.compute_corrected_voltage(2 * n);
            assert!(
                (double - 2.0 * single).abs() <= 0.01 + 1e-9,
                "n={} single={} double={}",
                n,
                single,
                double
            );
        }
    }
}

#[test]
fn test_validate_agrees_with_compute() {
    for sizer in sizers() {
        for n in -3..=40 {
            let voltage = sizer.compute_corrected_voltage(n);
            let result = sizer.validate(n);

            assert_eq!(result.max_string_voltage, voltage);
            assert_eq!(result.limit, sizer.inverter().max_input_voltage);
            assert_eq!(result.valid, voltage <= result.limit);
            assert_eq!(result.status.is_safe(), result.valid);
        }
    }
}

#[test]
fn test_voltage_at_limit_is_safe() {
    let panel = PanelSpecs::new("P-40", 300.0, 40.0, 9.0, -0.29);
    let inverter = InverterSpecs::new("INV-400", 400.0, 150.0, 380.0);
    let sizer = StringSizer::new(panel, inverter, 25.0).unwrap();

    let result = sizer.validate(10);
    assert_eq!(result.max_string_voltage, result.limit);
    assert!(result.valid);
    assert_eq!(result.status, StringStatus::Safe);
}

#[test]
fn test_colder_design_raises_voltage() {
    let warm = StringSizer::new(mono_450(), sg_600(), 0.0).unwrap();
    let cold = StringSizer::new(mono_450(), sg_600(), -30.0).unwrap();
    assert!(cold.compute_corrected_voltage(10) > warm.compute_corrected_voltage(10));
    assert!(cold.max_safe_modules().modules() <= warm.max_safe_modules().modules());
}

#[test]
fn test_max_safe_modules_is_the_boundary() {
    for sizer in sizers() {
        let n = sizer.max_safe_modules().modules().unwrap();
        if n > 0 {
            assert!(sizer.validate(i64::from(n)).valid);
        }
        assert!(!sizer.validate(i64::from(n) + 1).valid);
    }
}
