//! VoltageEMS Common Library
//!
//! Shared plumbing for the sizing tools: design file loading, logging setup
//! and the common error type.

pub mod config;
pub mod error;
pub mod logging;

// Re-exports for convenience
pub use config::{load_sizing_config, save_config_to_file, SizingConfig};
pub use error::{Error, Result};
pub use logging::{init_logging, init_test_logging};

/// Common prelude for VoltageEMS sizing tools
pub mod prelude {
    pub use crate::config::SizingConfig;
    pub use crate::error::{Error, Result};
    pub use crate::logging::{init_logging, init_test_logging, LogConfig, LogFormat};
    pub use tracing::{debug, error, info, trace, warn};
    pub use voltage_sizing::{
        InverterSpecs, PanelSpecs, StringSizer, StringStatus, ValidationResult,
    };
}
