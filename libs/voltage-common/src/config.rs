//! Design file loading for string sizing
//!
//! A design file holds one panel, one inverter and the design temperature.
//! Supported formats are chosen by extension: `.toml`, `.yaml`/`.yml`, `.json`.
//!
//! Priority (highest to lowest):
//! 1. Environment variables prefixed `PV_SIZING_` (`__` separates nested keys,
//!    e.g. `PV_SIZING_INVERTER__MAX_INPUT_VOLTAGE=1000`)
//! 2. The design file
//! 3. Default values (`min_temp_c = -10.0`)

use crate::{Error, Result};
use figment::{
    providers::{Env, Format, Json, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};
use voltage_sizing::{InverterSpecs, PanelSpecs, StringSizer, DEFAULT_MIN_TEMP_C};

/// Environment variable prefix for design overrides
pub const ENV_PREFIX: &str = "PV_SIZING_";

/// One string sizing design
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingConfig {
    /// Coldest expected ambient temperature (°C)
    #[serde(default = "default_min_temp_c")]
    pub min_temp_c: f64,

    /// Planned string length, if the design already fixes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modules_per_string: Option<i64>,

    pub panel: PanelSpecs,
    pub inverter: InverterSpecs,
}

fn default_min_temp_c() -> f64 {
    DEFAULT_MIN_TEMP_C
}

impl SizingConfig {
    /// Build the validated sizer for this design
    pub fn build_sizer(&self) -> Result<StringSizer> {
        Ok(StringSizer::new(
            self.panel.clone(),
            self.inverter.clone(),
            self.min_temp_c,
        )?)
    }

    /// Reference design written by `stringcheck init`
    pub fn example() -> Self {
        Self {
            min_temp_c: DEFAULT_MIN_TEMP_C,
            modules_per_string: Some(12),
            panel: PanelSpecs::new("Mono-450", 450.0, 45.0, 11.2, -0.29),
            inverter: InverterSpecs::new("SG-600", 600.0, 200.0, 550.0),
        }
    }
}

/// Pick the figment provider matching the file extension
fn file_figment(path: &Path) -> Result<Figment> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::config("Config file must have an extension"))?;

    match extension {
        "toml" => Ok(Figment::new().merge(Toml::file(path))),
        "yaml" | "yml" => Ok(Figment::new().merge(Yaml::file(path))),
        "json" => Ok(Figment::new().merge(Json::file(path))),
        _ => Err(Error::config(format!(
            "Unsupported config file format: {}",
            extension
        ))),
    }
}

/// Load configuration from a specific file, without environment overrides
pub fn load_config_from_file<T, P>(path: P) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    file_figment(path)?
        .extract()
        .map_err(|e| Error::config(format!("Failed to load configuration from file: {}", e)))
}

/// Load a design file and apply `PV_SIZING_` environment overrides
pub fn load_sizing_config<P: AsRef<Path>>(path: P) -> Result<SizingConfig> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::config(format!(
            "Design file not found: {}",
            path.display()
        )));
    }

    let config: SizingConfig = file_figment(path)?
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| {
            Error::config(format!(
                "Failed to load design from {}: {}",
                path.display(),
                e
            ))
        })?;

    info!(
        path = %path.display(),
        panel = %config.panel.model_name,
        inverter = %config.inverter.model_name,
        min_temp_c = config.min_temp_c,
        "design loaded"
    );
    Ok(config)
}

/// Save configuration to a file, format chosen by extension
pub fn save_config_to_file<T, P>(config: &T, path: P) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::config("Config file must have an extension"))?;

    let content = match extension {
        "toml" => toml::to_string_pretty(config)?,
        "yaml" | "yml" => serde_yaml::to_string(config)?,
        "json" => serde_json::to_string_pretty(config)?,
        _ => {
            return Err(Error::config(format!(
                "Unsupported config file format: {}",
                extension
            )))
        },
    };

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, content)?;
    debug!(path = %path.display(), "config written");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use figment::Jail;
    use tempfile::TempDir;

    const DESIGN_YAML: &str = r#"
panel:
  model_name: Mono-450
  p_max: 450.0
  voc: 45.0
  isc: 11.2
  temp_coeff_voc: -0.29
inverter:
  model_name: SG-600
  max_input_voltage: 600.0
  mppt_voltage_min: 200.0
  mppt_voltage_max: 550.0
"#;

    #[test]
    fn test_save_and_load_all_formats() {
        let temp_dir = TempDir::new().unwrap();
        let config = SizingConfig::example();

        for name in ["design.toml", "design.yaml", "design.yml", "design.json"] {
            let path = temp_dir.path().join(name);
            save_config_to_file(&config, &path).unwrap();
            let loaded: SizingConfig = load_config_from_file(&path).unwrap();
            assert_eq!(loaded, config, "format {}", name);
        }
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("designs/site-a/design.yaml");
        save_config_to_file(&SizingConfig::example(), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_unsupported_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("design.ini");
        let err = save_config_to_file(&SizingConfig::example(), &path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = load_config_from_file::<SizingConfig, _>(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported config file format"));
    }

    #[test]
    fn test_default_min_temp() {
        Jail::expect_with(|jail| {
            jail.create_file("design.yaml", DESIGN_YAML)?;

            let config = load_sizing_config("design.yaml").unwrap();
            assert_eq!(config.min_temp_c, -10.0);
            assert_eq!(config.modules_per_string, None);
            assert_eq!(config.panel.voc, 45.0);

            let result = config.build_sizer().unwrap().validate(12);
            assert_eq!(result.max_string_voltage, 594.81);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("design.yaml", DESIGN_YAML)?;
            jail.set_env("PV_SIZING_MIN_TEMP_C", "25.0");
            jail.set_env("PV_SIZING_INVERTER__MAX_INPUT_VOLTAGE", "1000.0");
            jail.set_env("PV_SIZING_MODULES_PER_STRING", "20");

            let config = load_sizing_config("design.yaml").unwrap();
            assert_eq!(config.min_temp_c, 25.0);
            assert_eq!(config.inverter.max_input_voltage, 1000.0);
            assert_eq!(config.inverter.model_name, "SG-600");
            assert_eq!(config.modules_per_string, Some(20));
            Ok(())
        });
    }

    #[test]
    fn test_missing_file() {
        Jail::expect_with(|_jail| {
            let err = load_sizing_config("absent.yaml").unwrap_err();
            assert!(err.to_string().contains("Design file not found"));
            Ok(())
        });
    }

    #[test]
    fn test_missing_section() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "design.toml",
                r#"
min_temp_c = -20.0

[panel]
model_name = "Mono-450"
p_max = 450.0
voc = 45.0
isc = 11.2
temp_coeff_voc = -0.29
"#,
            )?;

            let err = load_sizing_config("design.toml").unwrap_err();
            assert!(matches!(err, Error::Config(_)));
            assert!(err.to_string().contains("inverter"));
            Ok(())
        });
    }

    #[test]
    fn test_build_sizer_rejects_inverted_window() {
        let mut config = SizingConfig::example();
        config.inverter.mppt_voltage_min = 700.0;
        assert!(matches!(config.build_sizer(), Err(Error::Sizing(_))));
    }
}
