//! Weather forecast and transitions.
//!
//! The garden keeps a current weather value plus a fixed-length forecast
//! queue. Advancing pops the front of the queue into the current weather and
//! samples a new entry at the back. Side effects are edge-triggered by
//! comparing the previous and current values:
//! - Rain waters every plot while it lasts
//! - Wind carries corn pollen

use garden_common::{GardenError, GardenResult};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::rng::RandomSource;

/// Number of upcoming entries kept in the forecast.
pub const FORECAST_LENGTH: usize = 4;

/// Weather states in the garden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Weather {
    /// Clear skies.
    #[default]
    Sunny,
    /// Rain, waters every plot.
    Raining,
    /// Clear and windy, pollinates corn.
    SunnyWindy,
    /// Rain and wind together.
    RainingWindy,
}

impl Weather {
    /// Get the display name for this weather state.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Sunny => "Ensolarado",
            Self::Raining => "Chuvoso",
            Self::SunnyWindy => "Ensolarado com vento",
            Self::RainingWindy => "Chuvoso com vento",
        }
    }

    /// Check if it's raining.
    #[must_use]
    pub fn is_raining(self) -> bool {
        matches!(self, Self::Raining | Self::RainingWindy)
    }

    /// Check if it's windy.
    #[must_use]
    pub fn is_windy(self) -> bool {
        matches!(self, Self::SunnyWindy | Self::RainingWindy)
    }

    /// Get all weather states.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Sunny, Self::Raining, Self::SunnyWindy, Self::RainingWindy]
    }
}

/// Relative sampling weights for new forecast entries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherWeights {
    /// Weight of [`Weather::Sunny`].
    pub sunny: f32,
    /// Weight of [`Weather::Raining`].
    pub raining: f32,
    /// Weight of [`Weather::SunnyWindy`].
    pub sunny_windy: f32,
    /// Weight of [`Weather::RainingWindy`].
    pub raining_windy: f32,
}

impl Default for WeatherWeights {
    fn default() -> Self {
        Self {
            sunny: 0.5,
            raining: 0.2,
            sunny_windy: 0.2,
            raining_windy: 0.1,
        }
    }
}

impl WeatherWeights {
    /// Get the weight for a weather state.
    #[must_use]
    pub fn weight(&self, weather: Weather) -> f32 {
        match weather {
            Weather::Sunny => self.sunny,
            Weather::Raining => self.raining,
            Weather::SunnyWindy => self.sunny_windy,
            Weather::RainingWindy => self.raining_windy,
        }
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total(&self) -> f32 {
        Weather::all().iter().map(|&w| self.weight(w)).sum()
    }

    /// Weights are finite, non-negative and not all zero.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        Weather::all()
            .iter()
            .all(|&w| self.weight(w).is_finite() && self.weight(w) >= 0.0)
            && self.total() > 0.0
    }

    /// Sample a weather state.
    pub fn sample(&self, rng: &mut dyn RandomSource) -> Weather {
        let roll = rng.next_f32() * self.total();

        let mut cumulative = 0.0;
        for weather in Weather::all() {
            cumulative += self.weight(weather);
            if roll < cumulative {
                return weather;
            }
        }

        // Rounding at the top of the range
        Weather::Sunny
    }
}

/// Change between two consecutive weather values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherTransition {
    /// Weather before the advance.
    pub previous: Weather,
    /// Weather after the advance.
    pub current: Weather,
}

impl WeatherTransition {
    /// Rain began.
    #[must_use]
    pub fn rain_started(&self) -> bool {
        !self.previous.is_raining() && self.current.is_raining()
    }

    /// Rain ended.
    #[must_use]
    pub fn rain_stopped(&self) -> bool {
        self.previous.is_raining() && !self.current.is_raining()
    }

    /// Wind began.
    #[must_use]
    pub fn wind_started(&self) -> bool {
        !self.previous.is_windy() && self.current.is_windy()
    }

    /// Wind ended.
    #[must_use]
    pub fn wind_stopped(&self) -> bool {
        self.previous.is_windy() && !self.current.is_windy()
    }
}

/// Current weather plus the queue of upcoming weather.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forecast {
    current: Weather,
    upcoming: VecDeque<Weather>,
}

impl Forecast {
    /// Start sunny with a freshly sampled forecast.
    pub fn new(weights: &WeatherWeights, rng: &mut dyn RandomSource) -> Self {
        let upcoming = (0..FORECAST_LENGTH).map(|_| weights.sample(rng)).collect();
        Self {
            current: Weather::Sunny,
            upcoming,
        }
    }

    /// Build a forecast from explicit values.
    pub fn from_values(current: Weather, upcoming: Vec<Weather>) -> GardenResult<Self> {
        if upcoming.len() != FORECAST_LENGTH {
            return Err(GardenError::ForecastLength {
                expected: FORECAST_LENGTH,
                actual: upcoming.len(),
            });
        }
        Ok(Self {
            current,
            upcoming: upcoming.into(),
        })
    }

    /// Get the current weather.
    #[must_use]
    pub fn current(&self) -> Weather {
        self.current
    }

    /// Get the upcoming weather, soonest first.
    #[must_use]
    pub fn upcoming(&self) -> Vec<Weather> {
        self.upcoming.iter().copied().collect()
    }

    /// Pop the next value into the current weather and sample a new tail entry.
    pub fn advance(
        &mut self,
        weights: &WeatherWeights,
        rng: &mut dyn RandomSource,
    ) -> WeatherTransition {
        let previous = self.current;
        if let Some(next) = self.upcoming.pop_front() {
            self.current = next;
        }
        self.upcoming.push_back(weights.sample(rng));
        WeatherTransition {
            previous,
            current: self.current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{FastRandom, ScriptedRandom};

    #[test]
    fn test_weather_properties() {
        assert!(Weather::Raining.is_raining());
        assert!(Weather::RainingWindy.is_raining());
        assert!(!Weather::Sunny.is_raining());
        assert!(Weather::SunnyWindy.is_windy());
        assert!(Weather::RainingWindy.is_windy());
        assert!(!Weather::Raining.is_windy());
    }

    #[test]
    fn test_default_weights_favor_sunny() {
        let weights = WeatherWeights::default();
        assert!((weights.total() - 1.0).abs() < 0.001);
        for weather in [Weather::Raining, Weather::SunnyWindy, Weather::RainingWindy] {
            assert!(weights.sunny > weights.weight(weather));
        }
        assert!(weights.is_usable());
    }

    #[test]
    fn test_sample_buckets() {
        let weights = WeatherWeights::default();
        let mut rng = ScriptedRandom::new(vec![0.1, 0.6, 0.8, 0.95]);
        assert_eq!(weights.sample(&mut rng), Weather::Sunny);
        assert_eq!(weights.sample(&mut rng), Weather::Raining);
        assert_eq!(weights.sample(&mut rng), Weather::SunnyWindy);
        assert_eq!(weights.sample(&mut rng), Weather::RainingWindy);
    }

    #[test]
    fn test_unusable_weights() {
        let zero = WeatherWeights {
            sunny: 0.0,
            raining: 0.0,
            sunny_windy: 0.0,
            raining_windy: 0.0,
        };
        assert!(!zero.is_usable());
        let nan = WeatherWeights {
            sunny: f32::NAN,
            ..WeatherWeights::default()
        };
        assert!(!nan.is_usable());
    }

    #[test]
    fn test_advance_preserves_length_and_pops_front() {
        let weights = WeatherWeights::default();
        let mut rng = FastRandom::new(Some(3));
        let mut forecast = Forecast::new(&weights, &mut rng);
        assert_eq!(forecast.current(), Weather::Sunny);

        for _ in 0..20 {
            let expected = forecast.upcoming()[0];
            let transition = forecast.advance(&weights, &mut rng);
            assert_eq!(transition.current, expected);
            assert_eq!(forecast.current(), expected);
            assert_eq!(forecast.upcoming().len(), FORECAST_LENGTH);
        }
    }

    #[test]
    fn test_from_values_checks_length() {
        assert!(Forecast::from_values(Weather::Sunny, vec![Weather::Sunny; 3]).is_err());
        let forecast = Forecast::from_values(Weather::Raining, vec![Weather::Sunny; 4]).expect("forecast");
        assert_eq!(forecast.current(), Weather::Raining);
    }

    #[test]
    fn test_transition_edges() {
        let t = WeatherTransition {
            previous: Weather::Sunny,
            current: Weather::RainingWindy,
        };
        assert!(t.rain_started() && t.wind_started());
        assert!(!t.rain_stopped() && !t.wind_stopped());

        let t = WeatherTransition {
            previous: Weather::RainingWindy,
            current: Weather::Raining,
        };
        assert!(!t.rain_started() && !t.rain_stopped());
        assert!(t.wind_stopped());
    }
}
