use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Points shown at their true position as references.
    pub start_count: usize,
    /// Play the reveal animations; without it every point settles instantly.
    pub animate: bool,
    /// Placed markers can be dragged until the guesses are validated.
    pub allow_correction: bool,
    pub durations: DurationBounds,
    /// Pause before the reveal, letting the map finish fitting its view.
    pub settle_ms: u32,
    pub scoring: ScoringMode,
}

impl GameConfig {
    pub const DEFAULT_START_COUNT: usize = 2;

    pub fn validate(self) -> Result<Self> {
        let DurationBounds { min_ms, max_ms } = self.durations;
        if !(min_ms >= 0.0) || !(min_ms <= max_ms) {
            return Err(GameError::InvalidConfig(
                "animation durations must satisfy 0 <= min <= max",
            ));
        }
        if let ScoringMode::Bands(bands) = self.scoring {
            if !(bands.band_m > 0.0) {
                return Err(GameError::InvalidConfig("score bands must be wider than 0 m"));
            }
        }
        Ok(self)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            start_count: Self::DEFAULT_START_COUNT,
            animate: true,
            allow_correction: true,
            durations: DurationBounds::default(),
            settle_ms: 500,
            scoring: ScoringMode::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{ "start_count": 3 }"#).unwrap();

        assert_eq!(config.start_count, 3);
        assert!(config.animate);
        assert_eq!(config.durations, DurationBounds::new(500.0, 1500.0));
    }

    #[test]
    fn rejects_inverted_duration_bounds() {
        let config = GameConfig {
            durations: DurationBounds::new(2000.0, 500.0),
            ..Default::default()
        };

        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));
        assert!(GameConfig::default().validate().is_ok());
    }
}
