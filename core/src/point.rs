use serde::{Deserialize, Serialize};

use crate::*;

/// A named place of an area, as loaded from the point data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub picto: String,
    pub position: Coordinate,
}

/// A point taking part in a game, with the position the player gave it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamePoint {
    #[serde(flatten)]
    pub point: Point,
    pub user_position: Option<Coordinate>,
    pub is_starting: bool,
}

impl GamePoint {
    /// Reference point, shown at its true position from the start.
    pub fn start(point: Point) -> Self {
        Self {
            user_position: Some(point.position),
            point,
            is_starting: true,
        }
    }

    /// Point the player has to place.
    pub fn guess(point: Point) -> Self {
        Self {
            point,
            user_position: None,
            is_starting: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.point.id
    }

    pub fn name(&self) -> &str {
        &self.point.name
    }

    pub fn position(&self) -> Coordinate {
        self.point.position
    }

    pub fn is_placed(&self) -> bool {
        self.user_position.is_some()
    }

    /// Distance between the guess and the truth, `None` until placed.
    pub fn error_distance(&self, geodesy: &impl Geodesy) -> Option<f64> {
        self.user_position
            .map(|user_position| geodesy.distance(user_position, self.point.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> Point {
        Point {
            id: "louvre".into(),
            name: "Louvre".into(),
            picto: "louvre.png".into(),
            position: Coordinate::new(48.8606, 2.3376),
        }
    }

    #[test]
    fn start_points_are_preplaced_at_their_true_position() {
        let start = GamePoint::start(point());

        assert!(start.is_starting);
        assert_eq!(start.user_position, Some(start.position()));
        assert_eq!(start.error_distance(&Haversine), Some(0.0));
    }

    #[test]
    fn guessing_points_start_unplaced() {
        let guess = GamePoint::guess(point());

        assert!(!guess.is_starting);
        assert!(!guess.is_placed());
        assert_eq!(guess.error_distance(&Haversine), None);
    }

    #[test]
    fn game_points_serialize_flat_for_the_ui() {
        let json = serde_json::to_value(GamePoint::guess(point())).unwrap();

        assert_eq!(json["id"], "louvre");
        assert_eq!(json["position"][0], 48.8606);
        assert_eq!(json["userPosition"], serde_json::Value::Null);
        assert_eq!(json["isStarting"], false);
    }
}
