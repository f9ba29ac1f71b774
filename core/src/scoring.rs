use serde::{Deserialize, Serialize};

/// Converts one point's error distance into points, on top of the raw distance score.
pub trait ScorePolicy {
    /// `None` when the policy does not award points.
    fn points_for(&self, distance_m: f64) -> Option<u32>;
}

/// The raw distance is the score, no points are awarded.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DistanceOnly;

impl ScorePolicy for DistanceOnly {
    fn points_for(&self, _distance_m: f64) -> Option<u32> {
        None
    }
}

/// Starts from `max_points` and loses one point per started band of error.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DistanceBands {
    pub band_m: f64,
    pub max_points: u32,
}

impl Default for DistanceBands {
    fn default() -> Self {
        Self {
            band_m: 200.0,
            max_points: 10,
        }
    }
}

impl ScorePolicy for DistanceBands {
    fn points_for(&self, distance_m: f64) -> Option<u32> {
        if !(self.band_m > 0.0) || !(distance_m >= 0.0) {
            return Some(0);
        }
        let lost = (distance_m / self.band_m).ceil();
        Some((f64::from(self.max_points) - lost).max(0.0) as u32)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum ScoringMode {
    Distance,
    Bands(DistanceBands),
}

impl Default for ScoringMode {
    fn default() -> Self {
        Self::Distance
    }
}

impl ScorePolicy for ScoringMode {
    fn points_for(&self, distance_m: f64) -> Option<u32> {
        match self {
            Self::Distance => DistanceOnly.points_for(distance_m),
            Self::Bands(bands) => bands.points_for(distance_m),
        }
    }
}
