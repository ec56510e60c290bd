//! Analysis Configuration Module
//!
//! Log locations, GPS projection limits, statistical thresholds and plot
//! geometry, loaded from TOML.
//!
//! ## Loading Order
//!
//! 1. `SKYLOG_CONFIG` environment variable (path to TOML file)
//! 2. `skylog.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! ```ignore
//! // In main():
//! config::init(AnalysisConfig::load());
//!
//! // Anywhere in the binary:
//! let alpha = config::get().stats.group_alpha;
//! ```
//!
//! Library entry points take their parameters explicitly; only the binary
//! reads the global.

mod analysis_config;
pub mod defaults;
pub mod validation;

pub use analysis_config::*;

use std::sync::OnceLock;

static ANALYSIS_CONFIG: OnceLock<AnalysisConfig> = OnceLock::new();

/// Initialize the global analysis configuration. Later calls are ignored.
pub fn init(config: AnalysisConfig) {
    if ANALYSIS_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once, ignoring");
    }
}

/// Get the global analysis configuration.
///
/// Falls back to built-in defaults when `init()` was never called.
pub fn get() -> &'static AnalysisConfig {
    ANALYSIS_CONFIG.get_or_init(|| {
        tracing::warn!("config::get() called before config::init(), using defaults");
        AnalysisConfig::default()
    })
}

pub fn is_initialized() -> bool {
    ANALYSIS_CONFIG.get().is_some()
}
