//! Harness configuration structures and loaders.
use std::env;
use std::path::PathBuf;

/// Settings for one scenario run.
#[derive(Clone, Debug)]
pub struct HarnessConfig {
    pub scenario: PathBuf,
    pub ticks: u32,
    /// Overrides the scenario's tick interval.
    pub tick_interval_ms: Option<u64>,
    /// Overrides the scenario's seed.
    pub seed: Option<u64>,
    pub log_dir: Option<PathBuf>,
    pub session_id: Option<String>,
}

impl HarnessConfig {
    pub const DEFAULT_TICKS: u32 = 200;

    pub fn default_scenario() -> PathBuf {
        PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/scenarios/skirmish.ron"))
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SIM_SCENARIO` - Path of the RON scenario (default: bundled skirmish)
    /// - `SIM_TICKS` - Number of ticks to run (default: 200)
    /// - `SIM_TICK_MS` - Tick interval override in milliseconds
    /// - `SIM_SEED` - Seed override
    /// - `SIM_LOG_DIR` - Log directory (default: platform cache directory)
    /// - `SIM_SESSION_ID` - Session identifier for the log file (default: timestamp)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = env::var("SIM_SCENARIO") {
            config.scenario = PathBuf::from(path);
        }

        if let Some(ticks) = read_env::<u32>("SIM_TICKS") {
            config.ticks = ticks;
        }

        config.tick_interval_ms = read_env::<u64>("SIM_TICK_MS").filter(|ms| *ms > 0);
        config.seed = read_env::<u64>("SIM_SEED");
        config.log_dir = env::var("SIM_LOG_DIR").ok().map(PathBuf::from);
        config.session_id = env::var("SIM_SESSION_ID").ok();

        config
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            scenario: Self::default_scenario(),
            ticks: Self::DEFAULT_TICKS,
            tick_interval_ms: None,
            seed: None,
            log_dir: None,
            session_id: None,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_bundled_scenario() {
        let config = HarnessConfig::default();
        assert!(config.scenario.ends_with("scenarios/skirmish.ron"));
        assert!(config.scenario.exists());
        assert_eq!(config.ticks, HarnessConfig::DEFAULT_TICKS);
    }
}
