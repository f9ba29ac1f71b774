use geoplace_core::{EventEnvelope, GameEvent, GameEvents, SessionId};
use wasm_bindgen::prelude::*;

/// Drops events of games older than the latest one seen.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct StaleGuard {
    latest: Option<SessionId>,
}

impl StaleGuard {
    pub(crate) fn admit(&mut self, session: SessionId) -> bool {
        match self.latest {
            Some(latest) if session < latest => false,
            _ => {
                self.latest = Some(session);
                true
            }
        }
    }
}

pub(crate) fn event_json(session: SessionId, event: &GameEvent) -> serde_json::Result<String> {
    serde_json::to_string(&EventEnvelope { session, event })
}

/// Forwards every event as a plain JS object to a single callback.
pub(crate) struct JsEventSink {
    callback: js_sys::Function,
    guard: StaleGuard,
}

impl JsEventSink {
    pub(crate) fn new(callback: js_sys::Function) -> Self {
        Self {
            callback,
            guard: StaleGuard::default(),
        }
    }
}

impl GameEvents for JsEventSink {
    fn emit(&mut self, session: SessionId, event: GameEvent) {
        if !self.guard.admit(session) {
            log::debug!("dropping stale event of {:?}", session);
            return;
        }

        let value = match event_json(session, &event).map(|json| js_sys::JSON::parse(&json)) {
            Ok(Ok(value)) => value,
            Ok(Err(err)) => {
                log::error!("could not parse event: {:?}", err);
                return;
            }
            Err(err) => {
                log::error!("could not serialize event: {}", err);
                return;
            }
        };
        if let Err(err) = self.callback.call1(&JsValue::NULL, &value) {
            log::error!("event callback failed: {:?}", err);
        }
    }
}
