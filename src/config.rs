//! Configuration types.

use std::time::Duration;

/// Dashboard configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// How many employees a bulk onboard takes from the top of the list.
    pub bulk_onboard_limit: usize,
    /// Capacity of the feed broadcast channel.
    pub feed_capacity: usize,
    /// Capacity of the toast broadcast channel.
    pub toast_capacity: usize,
    /// Interval for the periodic feed refresh (None disables it).
    pub auto_refresh: Option<Duration>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bulk_onboard_limit: 5,
            feed_capacity: 256,
            toast_capacity: 256,
            auto_refresh: None,
        }
    }
}

impl DashboardConfig {
    /// Build a config from `ONBOARD_DASH_*` environment variables, falling
    /// back to defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let bulk_onboard_limit = std::env::var("ONBOARD_DASH_BULK_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.bulk_onboard_limit);

        // 0 disables the periodic refresh.
        let auto_refresh = std::env::var("ONBOARD_DASH_AUTO_REFRESH_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Self {
            bulk_onboard_limit,
            auto_refresh,
            ..defaults
        }
    }
}
