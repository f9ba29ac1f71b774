use thiserror::Error;

use crate::GamePhase;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Cannot {operation} while the game is {phase:?}")]
    InvalidState {
        operation: &'static str,
        phase: GamePhase,
    },
    #[error("Not enough points: {available} available but {required} start points requested")]
    InsufficientPoints { available: usize, required: usize },
    #[error("Point id {0:?} appears more than once")]
    DuplicatePointId(String),
    #[error("No point with id {0:?} in this game")]
    UnknownPoint(String),
    #[error("Point {0:?} has not been placed yet")]
    UnplacedPoint(String),
    #[error("Invalid coordinates")]
    InvalidCoordinate,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("Invalid area data: {0}")]
    InvalidAreaData(String),
}

impl GameError {
    pub(crate) const fn invalid_state(operation: &'static str, phase: GamePhase) -> Self {
        Self::InvalidState { operation, phase }
    }

    /// Errors the player can trigger by clicking at the wrong time; the UI drops them.
    pub const fn is_ignorable(&self) -> bool {
        matches!(self, Self::InvalidState { .. })
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
