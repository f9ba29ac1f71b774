use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequencerState {
    Idle,
    AwaitingPlacement(usize),
    AllPlaced,
}

impl SequencerState {
    pub const fn current(self) -> Option<usize> {
        match self {
            Self::AwaitingPlacement(index) => Some(index),
            Self::Idle | Self::AllPlaced => None,
        }
    }

    pub const fn is_complete(self) -> bool {
        matches!(self, Self::AllPlaced)
    }

    const fn phase(self) -> GamePhase {
        match self {
            Self::Idle => GamePhase::NotStarted,
            Self::AwaitingPlacement(_) | Self::AllPlaced => GamePhase::Placing,
        }
    }
}

impl Default for SequencerState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Result of a successful placement.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement {
    pub index: usize,
    pub position: Coordinate,
    pub next: SequencerState,
}

/// Walks the player through the guessing points one at a time.
///
/// The sequencer only tracks the position in the sequence; the points themselves stay in the
/// session and are handed in by reference.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlacementSequencer {
    state: SequencerState,
    allow_correction: bool,
}

impl PlacementSequencer {
    pub fn new(allow_correction: bool) -> Self {
        Self {
            state: SequencerState::Idle,
            allow_correction,
        }
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn current(&self) -> Option<usize> {
        self.state.current()
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    pub fn allows_correction(&self) -> bool {
        self.allow_correction
    }

    pub fn start(&mut self, points: &[GamePoint]) -> Result<SequencerState> {
        if self.state != SequencerState::Idle {
            return Err(self.invalid_state("start placing"));
        }

        self.state = Self::state_for(0, points.len());
        log::debug!("placement started: {:?}", self.state);
        Ok(self.state)
    }

    /// Places the active point at `position` and moves on to the next one.
    pub fn place(&mut self, points: &mut [GamePoint], position: Coordinate) -> Result<Placement> {
        let SequencerState::AwaitingPlacement(index) = self.state else {
            return Err(self.invalid_state("place a point"));
        };
        let position = position.validate()?;
        let len = points.len();
        let point = points
            .get_mut(index)
            .ok_or_else(|| self.invalid_state("place a point"))?;

        point.user_position = Some(position);
        self.state = Self::state_for(index + 1, len);
        log::debug!("placed {:?} at {}, next: {:?}", point.id(), position, self.state);

        Ok(Placement {
            index,
            position,
            next: self.state,
        })
    }

    /// Moves an already placed point, when correction is enabled.
    pub fn correct(
        &mut self,
        points: &mut [GamePoint],
        id: &str,
        position: Coordinate,
    ) -> Result<usize> {
        if !self.allow_correction || self.state == SequencerState::Idle {
            return Err(self.invalid_state("move a marker"));
        }
        let position = position.validate()?;
        let (index, point) = points
            .iter_mut()
            .enumerate()
            .find(|(_, point)| point.id() == id)
            .ok_or_else(|| GameError::UnknownPoint(id.to_string()))?;
        if !point.is_placed() {
            return Err(GameError::UnplacedPoint(id.to_string()));
        }

        point.user_position = Some(position);
        log::debug!("moved {:?} to {}", id, position);
        Ok(index)
    }

    fn state_for(index: usize, len: usize) -> SequencerState {
        if index < len {
            SequencerState::AwaitingPlacement(index)
        } else {
            SequencerState::AllPlaced
        }
    }

    fn invalid_state(&self, operation: &'static str) -> GameError {
        log::debug!("ignoring {:?} in {:?}", operation, self.state);
        GameError::invalid_state(operation, self.state.phase())
    }
}
