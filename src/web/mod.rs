//! Browser host: wires the round engine to the page's DOM, timers and
//! `localStorage`, and exposes the wasm entry points.
//!
//! Expected elements (all optional): `#gameArea`, `#target`, `#score`,
//! `#timer`, `#highScore`, `#highScoresTable tbody`, `#finalScore`, `#gameOver`,
//! `#newHighScore`, `#streakBonus`, `#bonusPoints`, `#playerName`,
//! `#startButton`, `#resetButton`, `#playAgainButton`.

mod dom_display;
mod local_store;
mod web_clock;

pub use dom_display::DomDisplay;
pub use local_store::LocalStore;
pub use web_clock::WebClock;

use std::cell::{Cell, RefCell};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlInputElement, window};

use crate::capability::InputEvent;
use crate::config::GameConfig;
use crate::engine::{RoundEngine, TargetId, TimerEvent};
use crate::error::GameError;
use crate::rng::SeededRandom;

type WebEngine = RoundEngine<DomDisplay, WebClock, LocalStore, SeededRandom>;

thread_local! {
    static ENGINE: RefCell<Option<WebEngine>> = const { RefCell::new(None) };
    static INPUT_WIRED: Cell<bool> = const { Cell::new(false) };
}

fn to_js(err: GameError) -> JsValue { JsValue::from_str(&err.to_string()) }

fn with_engine<T>(f: impl FnOnce(&mut WebEngine) -> T) -> Option<T> {
    ENGINE.with(|cell| match cell.try_borrow_mut() {
        Ok(mut slot) => slot.as_mut().map(f),
        Err(_) => {
            log::warn!("engine busy; dropping re-entrant call");
            None
        }
    })
}

fn dispatch_timer(event: TimerEvent) {
    with_engine(|engine| {
        let _ = engine.fire(event);
    });
}

fn dispatch_input(input: InputEvent) -> bool {
    match with_engine(|engine| engine.handle_input(input)) {
        Some(Ok(())) => true,
        Some(Err(GameError::StaleEvent)) | None => false,
        Some(Err(err)) => {
            log::debug!("input rejected: {err}");
            false
        }
    }
}

/// Builds the engine against the current page and paints the idle screen.
/// `config_json` may override any [`GameConfig`] field. Calling again replaces
/// the running engine.
#[wasm_bindgen]
pub fn start_target_game(config_json: Option<String>) -> Result<(), JsValue> {
    let config = match config_json.as_deref() {
        Some(json) => GameConfig::from_json(json).map_err(to_js)?,
        None => GameConfig::default(),
    };
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win.document().ok_or_else(|| JsValue::from_str("no document"))?;

    // Stop the previous engine's timers before its clock is dropped.
    if let Some(mut old) = ENGINE.with(|cell| cell.borrow_mut().take()) {
        old.restart();
    }

    let display = DomDisplay::new(doc.clone(), config.high_score_capacity);
    let store = LocalStore::new(&win, &config.storage_key);
    let clock = WebClock::new(win, dispatch_timer);
    let mut engine = RoundEngine::new(config, display, clock, store, SeededRandom::from_entropy());
    engine.paint_idle();
    ENGINE.with(|cell| cell.replace(Some(engine)));

    if !INPUT_WIRED.with(|w| w.replace(true)) {
        wire_input(&doc)?;
    }
    log::info!("target game ready");
    Ok(())
}

/// Starts a round for `name`. Returns whether it started.
#[wasm_bindgen]
pub fn request_start(name: &str) -> bool { dispatch_input(InputEvent::StartRequested(name.to_string())) }

/// Clicks target `id`. Returns whether it scored.
#[wasm_bindgen]
pub fn click_target(id: u32) -> bool { dispatch_input(InputEvent::TargetClicked(TargetId(id))) }

#[wasm_bindgen]
pub fn request_reset() { dispatch_input(InputEvent::ResetRequested); }

/// Current round state as JSON, for debugging overlays.
#[wasm_bindgen]
pub fn round_state_json() -> Option<String> {
    with_engine(|engine| serde_json::to_string(engine.state()).ok()).flatten()
}

fn on_click(doc: &Document, id: &str, mut handler: impl FnMut(&Element) + 'static) -> Result<(), JsValue> {
    let Some(el) = doc.get_element_by_id(id) else {
        log::debug!("#{id} not on page; skipping listener");
        return Ok(());
    };
    let el_cb = el.clone();
    let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| handler(&el_cb)) as Box<dyn FnMut(_)>);
    el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn wire_input(doc: &Document) -> Result<(), JsValue> {
    let doc_start = doc.clone();
    on_click(doc, "startButton", move |_| {
        let name = doc_start
            .get_element_by_id("playerName")
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
            .unwrap_or_default();
        dispatch_input(InputEvent::StartRequested(name));
    })?;
    on_click(doc, "resetButton", |_| {
        dispatch_input(InputEvent::ResetRequested);
    })?;
    on_click(doc, "playAgainButton", |_| {
        dispatch_input(InputEvent::ResetRequested);
    })?;
    on_click(doc, "target", |el| {
        if let Some(id) = el.get_attribute("data-target-id").and_then(|v| v.parse().ok()) {
            dispatch_input(InputEvent::TargetClicked(TargetId(id)));
        }
    })
}
