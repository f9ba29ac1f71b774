use geoplace_core::{
    AreaData, Coordinate, GameController, GameError, GamePhase, Haversine, StartMode,
};
use gloo::net::http::Request;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::Args;
use crate::events::JsEventSink;
use crate::memory::LocalPointMemory;
use crate::reveal::RevealSlot;
use crate::scheduler::BrowserScheduler;
use crate::utils::js_random_seed;

type Controller = GameController<Haversine, LocalPointMemory, JsEventSink, SmallRng>;

/// Handle the map page drives with the player's clicks.
///
/// Everything the page has to render arrives through the `on_event` callback.
#[wasm_bindgen]
pub struct GeoGame {
    controller: Rc<RefCell<Controller>>,
    /// The controller is borrowed while a reveal runs.
    reveal: RevealSlot,
}

#[wasm_bindgen]
impl GeoGame {
    #[wasm_bindgen(constructor)]
    pub fn new(area_json: &str, on_event: js_sys::Function) -> Result<GeoGame, JsError> {
        Self::with_area(AreaData::from_json(area_json)?, on_event)
    }

    /// Fetches the area's points from `url`.
    pub async fn load(url: String, on_event: js_sys::Function) -> Result<GeoGame, JsError> {
        let response = Request::get(&url).send().await?;
        if !response.ok() {
            return Err(JsError::new(&format!(
                "Could not load {}: HTTP {}",
                url,
                response.status()
            )));
        }
        let json = response.text().await?;
        Self::with_area(AreaData::from_json(&json)?, on_event)
    }

    /// New game with new start points.
    pub fn start(&self) -> Result<(), JsError> {
        self.restart(StartMode::Fresh)
    }

    /// New game with the same start points as the last one.
    pub fn replay(&self) -> Result<(), JsError> {
        self.restart(StartMode::KeepStartPoints)
    }

    /// Places the current point, returns whether the click had any effect.
    pub fn click(&self, lat: f64, lng: f64) -> bool {
        let Ok(mut controller) = self.controller.try_borrow_mut() else {
            return false;
        };
        accepted(
            Coordinate::new(lat, lng)
                .validate()
                .and_then(|position| controller.place(position)),
        )
    }

    /// Moves the marker of an already placed point.
    pub fn drag(&self, id: &str, lat: f64, lng: f64) -> bool {
        let Ok(mut controller) = self.controller.try_borrow_mut() else {
            return false;
        };
        accepted(
            Coordinate::new(lat, lng)
                .validate()
                .and_then(|position| controller.move_marker(id, position)),
        )
    }

    /// Reveals the guesses; the promise resolves to the score report.
    pub fn finish(&self) -> js_sys::Promise {
        let controller = Rc::clone(&self.controller);
        let reveal = self.reveal.clone();

        future_to_promise(async move {
            let report = reveal
                .run(&controller, &mut BrowserScheduler)
                .await
                .map_err(JsError::from)?;
            let json =
                serde_json::to_string(&report).map_err(|err| JsError::new(&err.to_string()))?;
            js_sys::JSON::parse(&json)
        })
    }

    /// Jumps to the end of the reveal, returns whether one was running.
    pub fn skip(&self) -> bool {
        self.reveal.skip()
            || self
                .controller
                .try_borrow()
                .is_ok_and(|controller| controller.skip())
    }

    pub fn phase(&self) -> String {
        let phase = match self.controller.try_borrow() {
            Ok(controller) => controller.phase(),
            Err(_) => GamePhase::Revealing,
        };
        phase.name().to_string()
    }
}

impl GeoGame {
    fn with_area(area: AreaData, on_event: js_sys::Function) -> Result<Self, JsError> {
        let args = Args::from_location()?;
        let seed = args.game().seed().unwrap_or_else(js_random_seed);
        log::debug!(
            "area {:?} with {} points, seed {}",
            area.name,
            area.points.len(),
            seed
        );

        let controller = GameController::new(
            area,
            args.game().config(),
            Haversine,
            LocalPointMemory,
            JsEventSink::new(on_event),
            SmallRng::seed_from_u64(seed),
        )?;
        Ok(Self {
            controller: Rc::new(RefCell::new(controller)),
            reveal: RevealSlot::default(),
        })
    }

    fn restart(&self, mode: StartMode) -> Result<(), JsError> {
        match self.controller.try_borrow_mut() {
            Ok(mut controller) => {
                controller.start_game(mode)?;
            }
            Err(_) => self.reveal.defer_restart(mode),
        }
        Ok(())
    }
}

/// Player-facing outcome of a click: rejected ones simply have no effect.
fn accepted<T>(result: Result<T, GameError>) -> bool {
    match result {
        Ok(_) => true,
        Err(err) if err.is_ignorable() => {
            log::debug!("ignored: {}", err);
            false
        }
        Err(err) => {
            log::warn!("rejected: {}", err);
            false
        }
    }
}
