use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartMode {
    /// New random start points.
    Fresh,
    /// Same start points as the previous game, when they still exist.
    KeepStartPoints,
}

/// Owns the current game and wires it to its collaborators.
///
/// Every game gets a new [`GameSession`]; the previous one is dropped along with its skip signal,
/// and its events can be told apart by their [`SessionId`].
#[derive(Debug)]
pub struct GameController<G, M, E, R> {
    area: AreaData,
    config: GameConfig,
    geodesy: G,
    memory: M,
    events: E,
    rng: R,
    session: Option<GameSession>,
    last_session_id: SessionId,
}

impl<G, M, E, R> GameController<G, M, E, R>
where
    G: Geodesy,
    M: PointMemory,
    E: GameEvents,
    R: Rng,
{
    pub fn new(
        area: AreaData,
        config: GameConfig,
        geodesy: G,
        memory: M,
        events: E,
        rng: R,
    ) -> Result<Self> {
        let config = config.validate()?;
        if area.points.len() <= config.start_count {
            return Err(GameError::InsufficientPoints {
                available: area.points.len(),
                required: config.start_count,
            });
        }

        Ok(Self {
            area,
            config,
            geodesy,
            memory,
            events,
            rng,
            session: None,
            last_session_id: SessionId(0),
        })
    }

    pub fn area(&self) -> &AreaData {
        &self.area
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn phase(&self) -> GamePhase {
        self.session
            .as_ref()
            .map_or(GamePhase::NotStarted, GameSession::phase)
    }

    pub fn score(&self) -> Option<&ScoreReport> {
        self.session.as_ref().and_then(GameSession::score)
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn events(&self) -> &E {
        &self.events
    }

    /// Drops the current game, if any, and starts placing in a new one.
    pub fn start_game(&mut self, mode: StartMode) -> Result<SessionId> {
        if let Some(previous) = self.session.take() {
            previous.skip_signal().skip();
            log::debug!("discarding {:?} in {:?}", previous.id(), previous.phase());
        }

        let remembered = match mode {
            StartMode::Fresh => {
                self.memory.forget();
                None
            }
            StartMode::KeepStartPoints => Some(self.memory.remembered_ids()),
        };
        let selection = select_points(
            &self.area.points,
            self.config.start_count,
            remembered.as_deref(),
            &mut self.rng,
        )?;
        let start_ids: Vec<String> = selection
            .start_points
            .iter()
            .map(|point| point.id().to_string())
            .collect();
        self.memory.remember(&start_ids);

        let id = SessionId(self.last_session_id.0 + 1);
        self.last_session_id = id;
        let mut session = GameSession::new(id, selection, self.config.allow_correction);
        let state = session.begin()?;
        log::debug!("started {:?} with start points {:?}", id, start_ids);

        self.events.emit(
            id,
            GameEvent::GameStarted {
                area: self.area.name.clone(),
                start_points: session.start_points().to_vec(),
                guess_count: session.guessing_points().len(),
            },
        );
        if let Some(bounds) = Bounds::from_coords(session.placed_positions()) {
            self.events.emit(id, GameEvent::FitView { bounds });
        }
        announce(&mut self.events, &session, state);

        self.session = Some(session);
        Ok(id)
    }

    /// Places the point the player is currently asked for.
    pub fn place(&mut self, position: Coordinate) -> Result<Placement> {
        let Self {
            session, events, ..
        } = self;
        let session = session
            .as_mut()
            .ok_or(GameError::invalid_state("place a point", GamePhase::NotStarted))?;

        let placement = session.place(position)?;
        events.emit(
            session.id(),
            GameEvent::MarkerPlaced {
                index: placement.index,
                point: session.guessing_points()[placement.index].clone(),
            },
        );
        announce(events, session, placement.next);
        Ok(placement)
    }

    /// Drags an already placed marker to a new position.
    pub fn move_marker(&mut self, id: &str, position: Coordinate) -> Result<usize> {
        let Self {
            session, events, ..
        } = self;
        let session = session
            .as_mut()
            .ok_or(GameError::invalid_state("move a marker", GamePhase::NotStarted))?;

        let index = session.correct(id, position)?;
        events.emit(
            session.id(),
            GameEvent::MarkerMoved {
                index,
                point_id: id.to_string(),
                position,
            },
        );
        Ok(index)
    }

    /// Reveals every guess and computes the final score.
    ///
    /// Only valid once all points are placed. Dropping the returned future stops the reveal; the
    /// session then stays in [`GamePhase::Revealing`] until a new game starts.
    pub async fn validate<S>(&mut self, scheduler: &mut S) -> Result<ScoreReport>
    where
        S: FrameScheduler + ?Sized,
    {
        let Self {
            session,
            events,
            geodesy,
            config,
            ..
        } = self;
        let session = session
            .as_mut()
            .ok_or(GameError::invalid_state("validate", GamePhase::NotStarted))?;
        session.begin_reveal()?;

        let id = session.id();
        let skip = session.skip_signal().clone();
        events.emit(id, GameEvent::RevealStarted);

        let guesses = session.guessing_points();
        let reveal_area = guesses
            .iter()
            .flat_map(|point| [point.position()].into_iter().chain(point.user_position));
        if let Some(bounds) = Bounds::from_coords(reveal_area) {
            events.emit(id, GameEvent::FitView { bounds });
            if config.animate && config.settle_ms > 0 && !skip.is_set() {
                scheduler.sleep(config.settle_ms).await;
            }
        }

        let engine = RevealEngine::new(&*geodesy, config.durations, config.animate);
        let observer = SessionObserver {
            session: id,
            events: &mut *events,
        };
        let report = engine
            .reveal(guesses, scheduler, &skip, &config.scoring, observer)
            .await?;

        session.finish(report.clone())?;
        if let Some(bounds) = Bounds::from_coords(session.true_positions()) {
            events.emit(id, GameEvent::FitView { bounds });
        }
        events.emit(id, GameEvent::finished(&report));
        log::debug!("{:?} finished: {}", id, report.formatted_total());
        Ok(report)
    }

    /// Skips the remaining reveal animations. Returns whether a reveal was running.
    pub fn skip(&self) -> bool {
        match &self.session {
            Some(session) if session.phase() == GamePhase::Revealing => {
                session.skip_signal().skip();
                true
            }
            _ => {
                log::debug!("nothing to skip in {:?}", self.phase());
                false
            }
        }
    }

    /// Handle on the current game's skip flag, usable while [`Self::validate`] runs.
    pub fn skip_signal(&self) -> Option<SkipSignal> {
        self.session
            .as_ref()
            .map(|session| session.skip_signal().clone())
    }
}

fn announce<E: GameEvents + ?Sized>(events: &mut E, session: &GameSession, state: SequencerState) {
    match state {
        SequencerState::AwaitingPlacement(index) => {
            events.emit(
                session.id(),
                GameEvent::point_to_guess(index, &session.guessing_points()[index]),
            );
        }
        SequencerState::AllPlaced => {
            events.emit(
                session.id(),
                GameEvent::AllPlaced {
                    can_correct: session.allows_correction(),
                },
            );
        }
        SequencerState::Idle => {}
    }
}

struct SessionObserver<'a, E: ?Sized> {
    session: SessionId,
    events: &'a mut E,
}

impl<E: GameEvents + ?Sized> RevealObserver for SessionObserver<'_, E> {
    fn on_progress(
        &mut self,
        index: usize,
        point: &GamePoint,
        position: Coordinate,
        distance: f64,
        color: Rgb,
    ) {
        self.events.emit(
            self.session,
            GameEvent::progress(index, point, position, distance, color),
        );
    }

    fn on_point_done(&mut self, index: usize, point: &GamePoint, distance: f64) {
        self.events
            .emit(self.session, GameEvent::revealed(index, point, distance));
    }
}
