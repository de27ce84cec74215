//! Output rendering for stringcheck commands

use anyhow::Result;
use clap::ValueEnum;
use colored::*;
use serde::Serialize;
use voltage_sizing::{
    InverterSpecs, MaxStringLength, PanelSpecs, StringSizer, StringStatus, ValidationResult,
};

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Design context echoed in JSON reports
#[derive(Serialize)]
struct DesignInfo<'a> {
    panel: &'a PanelSpecs,
    inverter: &'a InverterSpecs,
    min_temp_c: f64,
    correction_factor: f64,
}

impl<'a> DesignInfo<'a> {
    fn new(sizer: &'a StringSizer) -> Self {
        Self {
            panel: sizer.panel(),
            inverter: sizer.inverter(),
            min_temp_c: sizer.min_temp_c(),
            correction_factor: sizer.correction_factor(),
        }
    }
}

#[derive(Serialize)]
struct ValidationReport<'a> {
    design: DesignInfo<'a>,
    modules_per_string: i64,
    #[serde(flatten)]
    result: ValidationResult,
}

#[derive(Serialize)]
struct SweepRow {
    modules_per_string: i64,
    #[serde(flatten)]
    result: ValidationResult,
}

fn status_label(status: StringStatus) -> ColoredString {
    match status {
        StringStatus::Safe => status.as_str().bright_green().bold(),
        StringStatus::ExceedsLimit => status.as_str().bright_red().bold(),
    }
}

fn design_header(sizer: &StringSizer) -> String {
    format!(
        "{} {} ({} V Voc, {}%/°C) -> {} ({} V max)\n{} {} °C, correction factor {:.4}\n",
        "Design:".bright_cyan(),
        sizer.panel().model_name.bright_yellow(),
        sizer.panel().voc,
        sizer.panel().temp_coeff_voc,
        sizer.inverter().model_name.bright_yellow(),
        sizer.inverter().max_input_voltage,
        "Min temp:".bright_cyan(),
        sizer.min_temp_c(),
        sizer.correction_factor(),
    )
}

/// Render one string validation
pub fn render_validation(
    sizer: &StringSizer,
    modules: i64,
    result: &ValidationResult,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&ValidationReport {
            design: DesignInfo::new(sizer),
            modules_per_string: modules,
            result: *result,
        })?),
        OutputFormat::Table => Ok(format!(
            "{}{} {}\n{} {:.2} V / {:.2} V (margin {:.2} V)\n{} {}",
            design_header(sizer),
            "Modules:".bright_cyan(),
            modules,
            "Voc max:".bright_cyan(),
            result.max_string_voltage,
            result.limit,
            result.margin(),
            "Status:".bright_cyan(),
            status_label(result.status),
        )),
    }
}

/// Render the corrected string voltage alone
pub fn render_voltage(modules: i64, voltage: f64, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
            "modules_per_string": modules,
            "max_string_voltage": voltage,
        }))?),
        OutputFormat::Table => Ok(format!("{:.2}", voltage)),
    }
}

/// Render the longest safe string
pub fn render_max_modules(sizer: &StringSizer, format: OutputFormat) -> Result<String> {
    let max_length = sizer.max_safe_modules();
    let max_modules = max_length.modules();
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
            "design": DesignInfo::new(sizer),
            "outcome": max_length.as_str(),
            "max_modules_per_string": max_modules,
            "max_string_voltage": max_modules.map(|n| sizer.compute_corrected_voltage(i64::from(n))),
        }))?),
        OutputFormat::Table => {
            let label = "Max modules:".bright_cyan();
            let line = match max_length {
                MaxStringLength::Modules(0) => {
                    format!("{} a single module exceeds the inverter limit", label)
                },
                MaxStringLength::Modules(n) => format!(
                    "{} {} ({:.2} V)",
                    label,
                    n.to_string().bright_green().bold(),
                    sizer.compute_corrected_voltage(i64::from(n)),
                ),
                MaxStringLength::NoneSafe => format!(
                    "{} none (inverter limit is below 0 V)",
                    label
                ),
                MaxStringLength::Saturated => format!(
                    "{} more than {} (every searched length is safe)",
                    label,
                    u32::MAX
                ),
                MaxStringLength::Unbounded => format!(
                    "{} unbounded (corrected module Voc is not positive)",
                    label
                ),
            };
            Ok(format!("{}{}", design_header(sizer), line))
        },
    }
}

/// Render a range of string lengths
pub fn render_sweep(
    sizer: &StringSizer,
    rows: &[(i64, ValidationResult)],
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let rows: Vec<SweepRow> = rows
                .iter()
                .map(|(modules, result)| SweepRow {
                    modules_per_string: *modules,
                    result: *result,
                })
                .collect();
            Ok(serde_json::to_string_pretty(&rows)?)
        },
        OutputFormat::Table => {
            let mut out = design_header(sizer);
            out.push_str(&format!(
                "{:>8}  {:>12}  {:>10}  {}\n",
                "MODULES", "VOC MAX (V)", "LIMIT (V)", "STATUS"
            ));
            for (modules, result) in rows {
                out.push_str(&format!(
                    "{:>8}  {:>12.2}  {:>10.2}  {}\n",
                    modules,
                    result.max_string_voltage,
                    result.limit,
                    status_label(result.status),
                ));
            }
            Ok(out.trim_end().to_string())
        },
    }
}
