//! Simulation configuration.
//!
//! All delays are in model milliseconds. The defaults reproduce the pacing of
//! the interactive garden: two seconds to grow, half-second bee checks, thirty
//! seconds before an isolated flower self-pollinates.

use serde::{Deserialize, Serialize};

use crate::weather::WeatherWeights;

/// Minimum delay accepted for any timer or interval.
const MIN_DELAY_MS: u64 = 1;

/// Tunable parameters of the garden simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed (None = seeded from entropy)
    pub seed: Option<u64>,

    // === Growth ===
    /// Delay between watering a sprout and it becoming grown
    pub growth_delay_ms: u64,

    // === Bees ===
    /// Interval between bee pollination attempts while bees are visible
    pub bee_tick_interval_ms: u64,
    /// How long a bee connection is shown before the offspring appears
    pub bee_connection_ms: u64,
    /// Time bees spend dying after pesticide exposure
    pub bee_death_ms: u64,
    /// Delay after growing before a lone pumpkin/sunflower self-pollinates
    pub self_pollination_delay_ms: u64,

    // === Wind ===
    /// How long corn connections are shown before offspring appear
    pub corn_connection_ms: u64,
    /// Interval between corn pollination passes while windy
    pub corn_wind_interval_ms: u64,

    // === Bean ===
    /// Duration of the nitrogen-fixation sequence after a bean grows
    pub nitrogen_fixation_ms: u64,
    /// Delay after nitrogen fixation before a bean self-pollinates
    pub bean_self_pollination_ms: u64,
    /// Delay between harvesting a bean and the green-manure boost
    pub green_manure_delay_ms: u64,

    // === Weather ===
    /// Automatic forecast advance interval (None = only on user request)
    pub auto_weather_interval_ms: Option<u64>,
    /// Sampling weights for new forecast entries
    pub weather_weights: WeatherWeights,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: None,

            growth_delay_ms: 2_000,

            bee_tick_interval_ms: 500,
            bee_connection_ms: 2_000,
            bee_death_ms: 3_500,
            self_pollination_delay_ms: 30_000,

            corn_connection_ms: 3_500,
            corn_wind_interval_ms: 5_000,

            nitrogen_fixation_ms: 6_000,
            bean_self_pollination_ms: 20_000,
            green_manure_delay_ms: 3_000,

            auto_weather_interval_ms: None,
            weather_weights: WeatherWeights::default(),
        }
    }
}

impl SimConfig {
    /// Create a default configuration with a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Validate and clamp configuration values to usable ranges.
    pub fn validate(&mut self) {
        for delay in [
            &mut self.growth_delay_ms,
            &mut self.bee_tick_interval_ms,
            &mut self.bee_connection_ms,
            &mut self.bee_death_ms,
            &mut self.self_pollination_delay_ms,
            &mut self.corn_connection_ms,
            &mut self.corn_wind_interval_ms,
            &mut self.nitrogen_fixation_ms,
            &mut self.bean_self_pollination_ms,
            &mut self.green_manure_delay_ms,
        ] {
            *delay = (*delay).max(MIN_DELAY_MS);
        }

        if let Some(interval) = self.auto_weather_interval_ms.as_mut() {
            *interval = (*interval).max(MIN_DELAY_MS);
        }

        if !self.weather_weights.is_usable() {
            self.weather_weights = WeatherWeights::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert_eq!(config.growth_delay_ms, 2_000);
        assert_eq!(config.bee_death_ms, 3_500);
        assert_eq!(config.self_pollination_delay_ms, 30_000);
        assert!(config.auto_weather_interval_ms.is_none());
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_config_validation() {
        let mut config = SimConfig::seeded(7);
        config.growth_delay_ms = 0;
        config.bee_tick_interval_ms = 0;
        config.auto_weather_interval_ms = Some(0);
        config.weather_weights = WeatherWeights {
            sunny: -1.0,
            raining: 0.0,
            sunny_windy: 0.0,
            raining_windy: 0.0,
        };

        config.validate();

        assert_eq!(config.growth_delay_ms, 1);
        assert_eq!(config.bee_tick_interval_ms, 1);
        assert_eq!(config.auto_weather_interval_ms, Some(1));
        assert_eq!(config.weather_weights, WeatherWeights::default());
        assert_eq!(config.seed, Some(7));
    }
}
