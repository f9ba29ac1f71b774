use geoplace_core::{
    FrameScheduler, GameController, GameError, GameEvents, GamePhase, Geodesy, PointMemory,
    ScoreReport, SkipSignal, StartMode,
};
use rand::Rng;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Reveal state shared between a game handle and its running reveal.
///
/// The controller stays borrowed for the whole reveal, so skips and restarts requested meanwhile
/// go through here instead.
#[derive(Clone, Debug, Default)]
pub(crate) struct RevealSlot {
    skip: Rc<RefCell<Option<SkipSignal>>>,
    pending_restart: Rc<Cell<Option<StartMode>>>,
}

impl RevealSlot {
    /// Skips the running reveal, returns whether there was one.
    pub(crate) fn skip(&self) -> bool {
        match self.skip.borrow().as_ref() {
            Some(skip) => {
                skip.skip();
                true
            }
            None => false,
        }
    }

    /// Queues a restart for when the running reveal settles, skipping what is left of it.
    pub(crate) fn defer_restart(&self, mode: StartMode) {
        log::debug!("restart deferred until the reveal ends");
        self.pending_restart.set(Some(mode));
        self.skip();
    }

    /// Reveals the current game, then applies a restart requested in the meantime.
    pub(crate) async fn run<G, M, E, R, S>(
        &self,
        controller: &RefCell<GameController<G, M, E, R>>,
        scheduler: &mut S,
    ) -> Result<ScoreReport, GameError>
    where
        G: Geodesy,
        M: PointMemory,
        E: GameEvents,
        R: Rng,
        S: FrameScheduler + ?Sized,
    {
        let result = self.reveal(controller, scheduler).await;

        if let Some(mode) = self.pending_restart.take() {
            match controller.try_borrow_mut() {
                Ok(mut controller) => {
                    log::debug!("applying restart requested during the reveal");
                    if let Err(err) = controller.start_game(mode) {
                        log::warn!("could not restart: {}", err);
                    }
                }
                Err(_) => self.pending_restart.set(Some(mode)),
            }
        }
        result
    }

    #[allow(clippy::await_holding_refcell_ref)]
    async fn reveal<G, M, E, R, S>(
        &self,
        controller: &RefCell<GameController<G, M, E, R>>,
        scheduler: &mut S,
    ) -> Result<ScoreReport, GameError>
    where
        G: Geodesy,
        M: PointMemory,
        E: GameEvents,
        R: Rng,
        S: FrameScheduler + ?Sized,
    {
        let mut controller = controller.try_borrow_mut().map_err(|_| GameError::InvalidState {
            operation: "validate",
            phase: GamePhase::Revealing,
        })?;
        *self.skip.borrow_mut() = controller.skip_signal();

        let result = controller.validate(scheduler).await;
        self.skip.borrow_mut().take();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt;
    use geoplace_core::{
        AreaData, Coordinate, GameConfig, GameEvent, GameSession, Haversine, InMemoryPointMemory,
        SessionId, SteppedScheduler,
    };
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    /// Asks for a new game as soon as the reveal starts, like a player hitting "replay".
    struct RestartOnReveal {
        slot: RevealSlot,
        events: Vec<(SessionId, GameEvent)>,
    }

    impl GameEvents for RestartOnReveal {
        fn emit(&mut self, session: SessionId, event: GameEvent) {
            if event == GameEvent::RevealStarted {
                self.slot.defer_restart(StartMode::KeepStartPoints);
            }
            self.events.push((session, event));
        }
    }

    type TestController =
        GameController<Haversine, InMemoryPointMemory, RestartOnReveal, SmallRng>;

    fn controller(slot: &RevealSlot) -> RefCell<TestController> {
        let area = AreaData::from_json(
            r#"[
                { "id": "a", "name": "A", "position": [48.85, 2.35] },
                { "id": "b", "name": "B", "position": [48.80, 2.30] },
                { "id": "c", "name": "C", "position": [48.87, 2.32] },
                { "id": "d", "name": "D", "position": [48.83, 2.38] }
            ]"#,
        )
        .unwrap();
        let events = RestartOnReveal {
            slot: slot.clone(),
            events: Vec::new(),
        };
        let controller = GameController::new(
            area,
            GameConfig::default(),
            Haversine,
            InMemoryPointMemory::default(),
            events,
            SmallRng::seed_from_u64(7),
        )
        .unwrap();
        RefCell::new(controller)
    }

    fn play_until_placed(controller: &RefCell<TestController>) {
        let mut controller = controller.borrow_mut();
        controller.start_game(StartMode::Fresh).unwrap();
        while let Some(point) = controller.session().and_then(GameSession::current_point) {
            let truth = point.position();
            controller
                .place(Coordinate::new(truth.lat + 0.01, truth.lng))
                .unwrap();
        }
    }

    #[test]
    fn restart_during_reveal_applies_after_the_old_game_finished() {
        let slot = RevealSlot::default();
        let controller = controller(&slot);
        play_until_placed(&controller);

        let mut scheduler = SteppedScheduler::default();
        let report = slot
            .run(&controller, &mut scheduler)
            .now_or_never()
            .expect("stepped scheduler never suspends")
            .unwrap();
        assert!(report.total_distance > 0.0);
        assert_eq!(scheduler.frames(), 0);

        let controller = controller.borrow();
        let events = &controller.events().events;
        let finished = events
            .iter()
            .position(|(id, event)| {
                *id == SessionId(1) && matches!(event, GameEvent::GameFinished { .. })
            })
            .unwrap();
        let restarted = events
            .iter()
            .position(|(id, event)| {
                *id == SessionId(2) && matches!(event, GameEvent::GameStarted { .. })
            })
            .unwrap();
        assert!(finished < restarted);

        let session = controller.session().unwrap();
        assert_eq!(session.id(), SessionId(2));
        assert_eq!(session.phase(), GamePhase::Placing);
        assert!(!session.skip_signal().is_set());
        assert!(!slot.skip());
    }

    #[test]
    fn reveal_is_rejected_while_another_holds_the_controller() {
        let slot = RevealSlot::default();
        let controller = controller(&slot);
        play_until_placed(&controller);

        let _busy = controller.borrow_mut();
        let result = slot
            .run(&controller, &mut SteppedScheduler::default())
            .now_or_never()
            .unwrap();

        assert!(result.unwrap_err().is_ignorable());
    }
}
