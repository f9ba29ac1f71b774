use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    NotStarted,
    Placing,
    Revealing,
    Finished,
}

impl GamePhase {
    pub const fn name(self) -> &'static str {
        match self {
            Self::NotStarted => "notStarted",
            Self::Placing => "placing",
            Self::Revealing => "revealing",
            Self::Finished => "finished",
        }
    }
}

impl Default for GamePhase {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// Identifies one game; later games always get larger ids.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

/// State of one game, from point selection to the final score.
#[derive(Clone, Debug)]
pub struct GameSession {
    id: SessionId,
    start_points: Vec<GamePoint>,
    guessing_points: Vec<GamePoint>,
    sequencer: PlacementSequencer,
    phase: GamePhase,
    skip: SkipSignal,
    score: Option<ScoreReport>,
}

impl GameSession {
    pub fn new(id: SessionId, selection: PointSelection, allow_correction: bool) -> Self {
        Self {
            id,
            start_points: selection.start_points,
            guessing_points: selection.guessing_points,
            sequencer: PlacementSequencer::new(allow_correction),
            phase: GamePhase::NotStarted,
            skip: SkipSignal::new(),
            score: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn start_points(&self) -> &[GamePoint] {
        &self.start_points
    }

    pub fn guessing_points(&self) -> &[GamePoint] {
        &self.guessing_points
    }

    /// Index of the point to place next.
    pub fn current_index(&self) -> Option<usize> {
        self.sequencer.current()
    }

    pub fn current_point(&self) -> Option<&GamePoint> {
        self.current_index()
            .and_then(|index| self.guessing_points.get(index))
    }

    pub fn allows_correction(&self) -> bool {
        self.sequencer.allows_correction()
    }

    pub fn is_ready_for_validation(&self) -> bool {
        self.phase == GamePhase::Placing && self.sequencer.is_complete()
    }

    pub fn skip_signal(&self) -> &SkipSignal {
        &self.skip
    }

    pub fn score(&self) -> Option<&ScoreReport> {
        self.score.as_ref()
    }

    /// Start and placed guessing points, e.g. to fit the view on them.
    pub fn placed_positions(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.start_points
            .iter()
            .chain(&self.guessing_points)
            .filter_map(|point| point.user_position)
    }

    pub fn true_positions(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.start_points
            .iter()
            .chain(&self.guessing_points)
            .map(GamePoint::position)
    }

    pub(crate) fn begin(&mut self) -> Result<SequencerState> {
        self.check_phase("start the game", GamePhase::NotStarted)?;
        let state = self.sequencer.start(&self.guessing_points)?;
        self.phase = GamePhase::Placing;
        Ok(state)
    }

    pub(crate) fn place(&mut self, position: Coordinate) -> Result<Placement> {
        self.check_phase("place a point", GamePhase::Placing)?;
        self.sequencer.place(&mut self.guessing_points, position)
    }

    pub(crate) fn correct(&mut self, id: &str, position: Coordinate) -> Result<usize> {
        self.check_phase("move a marker", GamePhase::Placing)?;
        self.sequencer.correct(&mut self.guessing_points, id, position)
    }

    pub(crate) fn begin_reveal(&mut self) -> Result<()> {
        if !self.is_ready_for_validation() {
            return Err(self.reject("validate"));
        }
        self.phase = GamePhase::Revealing;
        Ok(())
    }

    pub(crate) fn finish(&mut self, report: ScoreReport) -> Result<()> {
        self.check_phase("finish", GamePhase::Revealing)?;
        self.phase = GamePhase::Finished;
        self.score = Some(report);
        Ok(())
    }

    fn check_phase(&self, operation: &'static str, expected: GamePhase) -> Result<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(self.reject(operation))
        }
    }

    fn reject(&self, operation: &'static str) -> GameError {
        log::debug!("ignoring {:?} in {:?} ({:?})", operation, self.phase, self.id);
        GameError::invalid_state(operation, self.phase)
    }
}
