//! DOM-backed [`Display`]. Missing elements are skipped silently so the page
//! can leave out any widget it does not want.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, window};

use crate::capability::Display;
use crate::engine::{Playfield, Target};
use crate::error::GameError;
use crate::highscores::ScoreEntry;

const HIDDEN: &str = "hidden";
const HIT: &str = "hit";
const BONUS_POPUP_MS: i32 = 1000;

pub struct DomDisplay {
    doc: Document,
    table_rows: usize,
}

impl DomDisplay {
    pub fn new(doc: Document, table_rows: usize) -> Self { Self { doc, table_rows } }

    fn el(&self, id: &str) -> Option<Element> { self.doc.get_element_by_id(id) }

    fn html(&self, id: &str) -> Option<HtmlElement> { self.el(id).and_then(|e| e.dyn_into().ok()) }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.el(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(&self, id: &str, hidden: bool) {
        if let Some(el) = self.el(id) {
            let classes = el.class_list();
            let _ = if hidden { classes.add_1(HIDDEN) } else { classes.remove_1(HIDDEN) };
        }
    }

    fn set_disabled(&self, id: &str, disabled: bool) {
        if let Some(el) = self.el(id) {
            let _ = if disabled { el.set_attribute("disabled", "true") } else { el.remove_attribute("disabled") };
        }
    }

    fn table_row(&self, cells: [&str; 4]) -> Result<Element, JsValue> {
        let row = self.doc.create_element("tr")?;
        for text in cells {
            let td = self.doc.create_element("td")?;
            td.set_text_content(Some(text));
            row.append_child(&td)?;
        }
        Ok(row)
    }

    fn render_table(&self, entries: &[ScoreEntry]) -> Result<(), JsValue> {
        let Some(tbody) = self.doc.query_selector("#highScoresTable tbody")? else {
            return Ok(());
        };
        tbody.set_inner_html("");
        for (i, entry) in entries.iter().enumerate() {
            let rank = (i + 1).to_string();
            let score = entry.score.to_string();
            let row = self.table_row([rank.as_str(), entry.player_name.as_str(), score.as_str(), entry.date.as_str()])?;
            tbody.append_child(&row)?;
        }
        for i in entries.len()..self.table_rows {
            let rank = (i + 1).to_string();
            let row = self.table_row([rank.as_str(), "-", "-", "-"])?;
            tbody.append_child(&row)?;
        }
        Ok(())
    }
}

fn hide_bonus_later() {
    let Some(win) = window() else { return };
    let hide = Closure::once_into_js(|| {
        if let Some(el) = window().and_then(|w| w.document()).and_then(|d| d.get_element_by_id("streakBonus")) {
            let _ = el.class_list().add_1(HIDDEN);
        }
    });
    let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(hide.unchecked_ref(), BONUS_POPUP_MS);
}

impl Display for DomDisplay {
    fn show_score(&mut self, score: u32) { self.set_text("score", &score.to_string()); }

    fn show_timer(&mut self, seconds: u32) { self.set_text("timer", &seconds.to_string()); }

    fn show_target(&mut self, target: Option<&Target>) {
        let Some(el) = self.html("target") else { return };
        let _ = el.class_list().remove_1(HIT);
        let style = el.style();
        match target {
            Some(t) => {
                let _ = style.set_property("width", &format!("{}px", t.size));
                let _ = style.set_property("height", &format!("{}px", t.size));
                let _ = style.set_property("left", &format!("{}px", t.x));
                let _ = style.set_property("top", &format!("{}px", t.y));
                let _ = style.set_property("display", "block");
                let _ = el.set_attribute("data-target-id", &t.id.0.to_string());
            }
            None => {
                let _ = style.set_property("display", "none");
                let _ = el.remove_attribute("data-target-id");
            }
        }
    }

    fn show_target_hit(&mut self, _target: &Target) {
        if let Some(el) = self.el("target") {
            let _ = el.class_list().add_1(HIT);
        }
    }

    fn show_game_over(&mut self, final_score: u32, is_new_high_score: bool) {
        self.set_text("finalScore", &final_score.to_string());
        self.set_hidden("newHighScore", !is_new_high_score);
        self.set_hidden("streakBonus", true);
        self.set_hidden("gameOver", false);
    }

    fn hide_game_over(&mut self) {
        self.set_hidden("gameOver", true);
        self.set_hidden("newHighScore", true);
        self.set_hidden("streakBonus", true);
    }

    fn show_high_score(&mut self, top: Option<&ScoreEntry>) {
        let text = match top {
            Some(e) => format!("{} ({})", e.score, e.player_name),
            None => "0 (None)".to_string(),
        };
        self.set_text("highScore", &text);
    }

    fn show_high_scores_table(&mut self, entries: &[ScoreEntry]) {
        if let Err(err) = self.render_table(entries) {
            log::warn!("high score table not rendered: {err:?}");
        }
    }

    fn show_streak_bonus(&mut self, amount: u32) {
        self.set_text("bonusPoints", &amount.to_string());
        if let Some(el) = self.html("streakBonus") {
            let style = el.style();
            let _ = style.set_property("left", &format!("{}%", js_sys::Math::random() * 80.0 + 10.0));
            let _ = style.set_property("top", &format!("{}%", js_sys::Math::random() * 80.0 + 10.0));
            let _ = el.class_list().remove_1(HIDDEN);
            hide_bonus_later();
        }
    }

    fn set_controls_enabled(&mut self, playing: bool) {
        self.set_disabled("startButton", playing);
        self.set_disabled("resetButton", !playing);
        self.set_disabled("playerName", playing);
    }

    fn rearm_input(&mut self) {
        if let Some(input) = self.el("playerName").and_then(|e| e.dyn_into::<HtmlInputElement>().ok()) {
            input.set_value("");
            input.set_disabled(false);
        }
    }

    fn show_validation_error(&mut self, error: &GameError) {
        if let Some(win) = window() {
            let _ = win.alert_with_message(&error.to_string());
        }
    }

    fn playfield(&self) -> Playfield {
        match self.el("gameArea") {
            Some(area) => Playfield { width: area.client_width() as f64, height: area.client_height() as f64 },
            None => Playfield { width: 0.0, height: 0.0 },
        }
    }
}
