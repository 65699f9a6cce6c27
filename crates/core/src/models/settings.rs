use serde::{Deserialize, Serialize};

use crate::colors::ColorStrategy;

fn default_refresh_interval_secs() -> u64 {
    60
}

/// User-configurable settings, persisted as a plain JSON file.
///
/// `privacy_mode` is read at startup and flippable at runtime; it is the
/// one piece of state that survives a session. The remaining fields are
/// construction-time knobs for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// When on, every currency-bearing display string is redacted.
    #[serde(default)]
    pub privacy_mode: bool,

    /// How symbols map onto palette colors. One strategy for the whole
    /// dashboard — table and chart legend must never disagree.
    #[serde(default)]
    pub color_strategy: ColorStrategy,

    /// Cadence of the session-wide background refresh timer.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// Initially selected trend window, in trailing days. `0` = all data.
    #[serde(default)]
    pub default_range_days: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            privacy_mode: false,
            color_strategy: ColorStrategy::default(),
            refresh_interval_secs: default_refresh_interval_secs(),
            default_range_days: 0,
        }
    }
}
