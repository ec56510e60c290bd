//! Analysis Configuration - every tunable of the analyzer as a TOML value
//!
//! Each section implements `Default` with the values from `defaults`, so an
//! absent file or an absent section behaves exactly like the built-in setup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use super::defaults;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration.
///
/// Load with `AnalysisConfig::load()` which searches:
/// 1. `$SKYLOG_CONFIG` env var
/// 2. `./skylog.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Where the raw log files live
    #[serde(default)]
    pub logs: LogsConfig,

    /// GPS track reconstruction
    #[serde(default)]
    pub gps: GpsConfig,

    /// Questionnaire group statistics
    #[serde(default)]
    pub stats: StatsConfig,

    /// Chart output
    #[serde(default)]
    pub plot: PlotConfig,
}

impl AnalysisConfig {
    /// Load configuration using the standard search order. Failures at each
    /// step are logged and the search moves on.
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(defaults::CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded config from SKYLOG_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from SKYLOG_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "SKYLOG_CONFIG points to non-existent file, falling back");
            }
        }

        // 2. Check ./skylog.toml
        let local = PathBuf::from(defaults::LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded config from ./skylog.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./skylog.toml, using defaults");
                }
            }
        }

        // 3. Defaults
        info!("No skylog.toml found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path. Unknown keys only warn.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }
        let config: Self = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Reject values the analysis cannot run with.
    ///
    /// Rules:
    /// - Both alphas must lie strictly between 0 and 1
    /// - `gps.max_points` must be > 0
    /// - Group files and dimensions must be non-empty
    /// - Plot width and height must be > 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        Self::check_alpha(self.stats.normality_alpha, "stats.normality_alpha", &mut errors);
        Self::check_alpha(self.stats.group_alpha, "stats.group_alpha", &mut errors);

        if self.gps.max_points == 0 {
            errors.push("gps.max_points must be > 0".to_string());
        }
        if self.stats.group_files.is_empty() {
            errors.push("stats.group_files must name at least one group".to_string());
        }
        if self.stats.dimensions.is_empty() {
            errors.push("stats.dimensions must name at least one dimension".to_string());
        }
        if self.plot.width == 0 || self.plot.height == 0 {
            errors.push(format!(
                "plot size must be non-zero (got {}x{})",
                self.plot.width, self.plot.height
            ));
        }
        if self.logs.attitude_prefix.contains(std::path::MAIN_SEPARATOR) {
            warn!(
                prefix = %self.logs.attitude_prefix,
                "logs.attitude_prefix contains a path separator; put directories in logs.dir"
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_alpha(alpha: f64, name: &str, errors: &mut Vec<String>) {
        // NaN fails the range check too
        if !(alpha > 0.0 && alpha < 1.0) {
            errors.push(format!("{name} must be in (0, 1), got {alpha}"));
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config parse error ({}): {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config serialization error: {0}")]
    Serialize(toml::ser::Error),

    #[error("Config validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

// ============================================================================
// Sections
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogsConfig {
    pub dir: PathBuf,
    /// Prefix of `<prefix><DAY>.log` attitude logs
    pub attitude_prefix: String,
    pub position_log: PathBuf,
}

impl LogsConfig {
    /// Path of the attitude log for one recording day.
    pub fn attitude_log(&self, day: &str) -> PathBuf {
        self.dir.join(format!("{}{day}.log", self.attitude_prefix))
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(defaults::LOGS_DIR),
            attitude_prefix: defaults::ATTITUDE_LOG_PREFIX.to_string(),
            position_log: PathBuf::from(defaults::POSITION_LOG),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpsConfig {
    pub max_points: usize,
}

impl Default for GpsConfig {
    fn default() -> Self {
        Self {
            max_points: defaults::GPS_MAX_POINTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub normality_alpha: f64,
    pub group_alpha: f64,
    pub group_files: Vec<String>,
    pub dimensions: Vec<String>,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            normality_alpha: defaults::NORMALITY_ALPHA,
            group_alpha: defaults::GROUP_ALPHA,
            group_files: defaults::GROUP_FILES.iter().map(ToString::to_string).collect(),
            dimensions: defaults::DIMENSIONS.iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub out_dir: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(defaults::PLOT_OUT_DIR),
            width: defaults::PLOT_WIDTH,
            height: defaults::PLOT_HEIGHT,
        }
    }
}
