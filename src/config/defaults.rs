//! Built-in default values for every tunable in `AnalysisConfig`.

// ============================================================================
// Log files
// ============================================================================

/// Directory holding the per-day attitude logs and the position log.
pub const LOGS_DIR: &str = "logs";

/// File-name prefix of an attitude log; the day identifier and `.log` follow.
pub const ATTITUDE_LOG_PREFIX: &str = "2025_09_";

/// Position-delta log analyzed when no `--log` is given.
pub const POSITION_LOG: &str = "logs/drone_headset_velocity_changes_2025_10_02_16_00.log";

// ============================================================================
// GPS
// ============================================================================

/// Fixes projected onto the radial map, counted from the first row.
pub const GPS_MAX_POINTS: usize = 600;

// ============================================================================
// Group statistics
// ============================================================================

/// Shapiro-Wilk p-value above which a group counts as normally distributed.
pub const NORMALITY_ALPHA: f64 = 0.005;

/// Significance level for the omnibus group comparison.
pub const GROUP_ALPHA: f64 = 0.05;

/// Questionnaire files, one per experimental group.
pub const GROUP_FILES: [&str; 3] = ["Joysticks_Monitor.csv", "Joysticks_HMD.csv", "Headset.csv"];

/// Questionnaire dimensions compared across groups.
pub const DIMENSIONS: [&str; 5] = [
    "Presence",
    "Spatial Presence",
    "Involvement",
    "Realness",
    "IPQ Score",
];

// ============================================================================
// Plotting
// ============================================================================

pub const PLOT_OUT_DIR: &str = "plots";
pub const PLOT_WIDTH: u32 = 1200;
pub const PLOT_HEIGHT: u32 = 800;

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "skylog.toml";

/// Environment variable pointing at an explicit config file.
pub const CONFIG_ENV_VAR: &str = "SKYLOG_CONFIG";
