use serde::Serialize;

use crate::*;

/// Everything a presentation layer needs to render a game.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GameEvent {
    GameStarted {
        area: String,
        start_points: Vec<GamePoint>,
        guess_count: usize,
    },
    PointToGuess {
        index: usize,
        point: GamePoint,
    },
    MarkerPlaced {
        index: usize,
        point: GamePoint,
    },
    MarkerMoved {
        index: usize,
        point_id: String,
        position: Coordinate,
    },
    AllPlaced {
        can_correct: bool,
    },
    RevealStarted,
    FitView {
        bounds: Bounds,
    },
    PointProgress {
        index: usize,
        point_id: String,
        position: Coordinate,
        distance: f64,
        label: String,
        color: String,
    },
    PointRevealed {
        index: usize,
        point_id: String,
        distance: f64,
        label: String,
    },
    GameFinished {
        report: ScoreReport,
        formatted_total: String,
    },
}

impl GameEvent {
    pub fn point_to_guess(index: usize, point: &GamePoint) -> Self {
        Self::PointToGuess {
            index,
            point: point.clone(),
        }
    }

    pub fn progress(
        index: usize,
        point: &GamePoint,
        position: Coordinate,
        distance: f64,
        color: Rgb,
    ) -> Self {
        Self::PointProgress {
            index,
            point_id: point.id().to_string(),
            position,
            distance,
            label: format_distance(distance, true),
            color: color.to_string(),
        }
    }

    pub fn revealed(index: usize, point: &GamePoint, distance: f64) -> Self {
        Self::PointRevealed {
            index,
            point_id: point.id().to_string(),
            distance,
            label: format_distance(distance, true),
        }
    }

    pub fn finished(report: &ScoreReport) -> Self {
        Self::GameFinished {
            formatted_total: report.formatted_total(),
            report: report.clone(),
        }
    }
}

/// Event together with the game it belongs to, as handed to the UI.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EventEnvelope<'a> {
    pub session: SessionId,
    #[serde(flatten)]
    pub event: &'a GameEvent,
}

/// Sink for the events of every game played on a controller.
pub trait GameEvents {
    fn emit(&mut self, session: SessionId, event: GameEvent);
}

impl<E: GameEvents + ?Sized> GameEvents for &mut E {
    fn emit(&mut self, session: SessionId, event: GameEvent) {
        (**self).emit(session, event)
    }
}

impl GameEvents for Vec<(SessionId, GameEvent)> {
    fn emit(&mut self, session: SessionId, event: GameEvent) {
        self.push((session, event));
    }
}
