//! Round engine: the spawn / scoring / timing state machine.
//!
//! `Idle -> Active (start) -> Active (tick / spawn / hit) -> Ended (end) -> Idle (restart)`
//!
//! The engine owns only round state and its named timer handles. Rendering,
//! scheduling, persistence and randomness come in through the traits in
//! [`crate::capability`]. Scheduled work comes back as [`TimerEvent`]s via
//! [`RoundEngine::fire`]; every event is checked against the active flag, the
//! round generation and the current target before it may touch state.

mod scoring;
mod state;
mod timers;

pub use scoring::{Span, base_score, streak_bonus};
pub use state::{Playfield, RoundState, Target, TargetId};
pub use timers::{TimerEvent, TimerHandle};

use timers::RoundTimers;

use crate::capability::{Clock, Display, InputEvent, RandomSource, Store};
use crate::clock::ManualClock;
use crate::config::{GameConfig, ResetBehavior};
use crate::error::{GameError, GameResult};
use crate::highscores::{HighScoreTable, ScoreEntry};

/// Score breakdown of a single hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HitOutcome {
    pub base: u32,
    pub bonus: u32,
    pub streak: u32,
    pub score: u32,
}

/// Result of the one `end()` call that actually closed a round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundSummary {
    pub player_name: String,
    pub final_score: u32,
    pub is_new_high_score: bool,
    pub hits: u32,
    pub misses: u32,
}

pub struct RoundEngine<D, C, S, R> {
    config: GameConfig,
    state: RoundState,
    timers: RoundTimers,
    high_scores: HighScoreTable,
    next_target_id: u32,
    display: D,
    clock: C,
    store: S,
    rng: R,
}

impl<D: Display, C: Clock, S: Store, R: RandomSource> RoundEngine<D, C, S, R> {
    /// Builds an idle engine. An unreadable store starts with an empty table.
    pub fn new(config: GameConfig, display: D, clock: C, store: S, rng: R) -> Self {
        let high_scores = match store.load_high_scores() {
            Ok(entries) => HighScoreTable::from_entries(entries, config.high_score_capacity),
            Err(err) => {
                log::warn!("starting without saved high scores: {err}");
                HighScoreTable::new(config.high_score_capacity)
            }
        };
        Self {
            state: RoundState::idle(config.game_duration_secs, 0),
            timers: RoundTimers::default(),
            high_scores,
            next_target_id: 0,
            config,
            display,
            clock,
            store,
            rng,
        }
    }

    pub fn state(&self) -> &RoundState { &self.state }
    pub fn config(&self) -> &GameConfig { &self.config }
    pub fn high_scores(&self) -> &HighScoreTable { &self.high_scores }
    pub fn display(&self) -> &D { &self.display }
    pub fn clock(&self) -> &C { &self.clock }
    pub fn store(&self) -> &S { &self.store }
    pub fn is_active(&self) -> bool { self.state.is_active }

    /// Whether any round timer is still armed.
    pub fn has_pending_timers(&self) -> bool { !self.timers.is_empty() }

    /// Paints the idle screen: zeroed score, full timer, high score line and table.
    pub fn paint_idle(&mut self) {
        self.display.hide_game_over();
        self.display.show_target(None);
        self.display.show_score(self.state.score);
        self.display.show_timer(self.state.time_remaining);
        self.display.show_high_score(self.high_scores.top());
        self.display.show_high_scores_table(self.high_scores.entries());
        self.display.set_controls_enabled(false);
    }

    /// Starts a new round. A blank name counts as missing. Starting while a
    /// round is running abandons it without recording a score.
    pub fn start(&mut self, player_name: Option<&str>) -> GameResult<&RoundState> {
        let name = match player_name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(n) => n.to_string(),
            None if self.config.require_player_name => {
                let err = GameError::missing_player_name();
                self.display.show_validation_error(&err);
                return Err(err);
            }
            None => self.config.default_player_name.clone(),
        };

        self.timers.cancel_all(&mut self.clock);
        let round = self.state.round.wrapping_add(1);
        self.state = RoundState::idle(self.config.game_duration_secs, round);
        self.state.is_active = true;
        self.state.player_name = name;

        self.display.hide_game_over();
        self.display.show_score(0);
        self.display.show_timer(self.state.time_remaining);
        self.display.set_controls_enabled(true);

        self.timers.tick = Some(self.clock.every(self.config.tick_interval_ms, TimerEvent::Tick { round }));
        log::info!("round {round} started for {}", self.state.player_name);
        self.spawn_target();
        Ok(&self.state)
    }

    /// One elapsed second. Ends the round when the timer reaches zero.
    pub fn tick(&mut self) -> GameResult<()> {
        if !self.state.is_active {
            return Err(self.stale("tick"));
        }
        self.state.time_remaining = self.state.time_remaining.saturating_sub(1);
        self.display.show_timer(self.state.time_remaining);
        if self.state.time_remaining == 0 {
            self.end();
        }
        Ok(())
    }

    /// Replaces the current target with a fresh one sized and timed for the
    /// current score. No-op while inactive.
    pub fn spawn_target(&mut self) -> Option<Target> {
        if !self.state.is_active {
            return None;
        }
        self.timers.cancel_target_timers(&mut self.clock);

        let score = self.state.score;
        let size = self.config.target_size.span_at(score).lerp(self.rng.unit());
        let field = self.display.playfield();
        let x = (field.width - size).max(0.0) * self.rng.unit();
        let y = (field.height - size).max(0.0) * self.rng.unit();
        self.next_target_id = self.next_target_id.wrapping_add(1);
        let target = Target { id: TargetId(self.next_target_id), x, y, size };

        self.state.current_target = Some(target);
        self.state.target_hit = false;
        self.display.show_target(Some(&target));

        let lifetime = self.config.target_lifetime.span_at(score).lerp(self.rng.unit()).round() as u32;
        let expiry = TimerEvent::TargetExpired { round: self.state.round, target: target.id };
        self.timers.target_timeout = Some(self.clock.after(lifetime, expiry));
        log::debug!("spawned {:?} size {size:.1} for {lifetime}ms", target.id);
        Some(target)
    }

    /// Scores a click on `id`. Clicks on anything but the live target are stale.
    pub fn handle_hit(&mut self, id: TargetId) -> GameResult<HitOutcome> {
        if !self.state.is_active {
            return Err(self.stale("hit"));
        }
        let target = match self.state.live_target() {
            Some(t) if t.id == id => *t,
            _ => return Err(self.stale("hit")),
        };
        self.timers.cancel_target_timeout(&mut self.clock);

        let base = base_score(target.size, self.config.min_base_score);
        self.state.streak += 1;
        let bonus = streak_bonus(base, self.state.streak, self.config.streak_threshold);
        if bonus > 0 {
            self.display.show_streak_bonus(bonus);
        }
        self.state.score = self.state.score.saturating_add(base + bonus);
        self.state.hits += 1;
        self.state.target_hit = true;
        self.display.show_target_hit(&target);
        self.display.show_score(self.state.score);

        let feedback = TimerEvent::HitFeedbackElapsed { round: self.state.round, target: id };
        self.timers.hit_feedback = Some(self.clock.after(self.config.hit_feedback_ms, feedback));
        log::debug!("hit {id:?}: base {base} bonus {bonus} streak {}", self.state.streak);
        Ok(HitOutcome { base, bonus, streak: self.state.streak, score: self.state.score })
    }

    /// Closes the round and records the score. Returns `None` if no round was
    /// running, so repeated calls change nothing.
    pub fn end(&mut self) -> Option<RoundSummary> {
        if !self.state.is_active {
            return None;
        }
        self.state.is_active = false;
        self.timers.cancel_all(&mut self.clock);
        self.state.streak = 0;
        self.state.current_target = None;
        self.state.target_hit = false;
        self.display.show_target(None);

        self.reload_high_scores();
        let score = self.state.score;
        let entry = ScoreEntry {
            player_name: self.state.player_name.clone(),
            score,
            date: self.clock.today(),
        };
        let is_new_high_score = self.high_scores.insert(entry);
        if is_new_high_score {
            if let Err(err) = self.store.save_high_scores(self.high_scores.entries()) {
                log::warn!("high score not saved: {err}");
            }
        }

        self.display.show_game_over(score, is_new_high_score);
        self.display.show_high_score(self.high_scores.top());
        self.display.show_high_scores_table(self.high_scores.entries());
        self.display.set_controls_enabled(false);
        log::info!("round {} over: {score} points (new high score: {is_new_high_score})", self.state.round);

        Some(RoundSummary {
            player_name: self.state.player_name.clone(),
            final_score: score,
            is_new_high_score,
            hits: self.state.hits,
            misses: self.state.misses,
        })
    }

    /// Back to idle: timers cancelled, game-over cleared, input re-armed. The
    /// caller decides whether to `start` again.
    pub fn restart(&mut self) {
        self.timers.cancel_all(&mut self.clock);
        let round = self.state.round.wrapping_add(1);
        self.state = RoundState::idle(self.config.game_duration_secs, round);
        self.paint_idle();
        self.display.rearm_input();
    }

    /// Runs a scheduled event. Events from another round, for a target that is
    /// gone, or arriving after `end` are discarded as stale.
    pub fn fire(&mut self, event: TimerEvent) -> GameResult<()> {
        if !self.state.is_active || event.round() != self.state.round {
            return Err(self.stale("timer"));
        }
        match event {
            TimerEvent::Tick { .. } => self.tick(),
            TimerEvent::TargetExpired { target, .. } => {
                if self.state.live_target().map(|t| t.id) != Some(target) {
                    return Err(self.stale("expiry"));
                }
                self.timers.target_timeout = None;
                self.miss_target();
                Ok(())
            }
            TimerEvent::HitFeedbackElapsed { target, .. } => {
                let hit_id = self.state.current_target.filter(|_| self.state.target_hit).map(|t| t.id);
                if hit_id != Some(target) {
                    return Err(self.stale("hit feedback"));
                }
                self.timers.hit_feedback = None;
                self.state.current_target = None;
                self.state.target_hit = false;
                self.display.show_target(None);
                self.spawn_target();
                Ok(())
            }
        }
    }

    /// Routes player input. `ResetRequested` follows the configured
    /// [`ResetBehavior`].
    pub fn handle_input(&mut self, input: InputEvent) -> GameResult<()> {
        match input {
            InputEvent::StartRequested(name) => self.start(Some(name.as_str())).map(|_| ()),
            InputEvent::TargetClicked(id) => self.handle_hit(id).map(|_| ()),
            InputEvent::ResetRequested => {
                let last_player = std::mem::take(&mut self.state.player_name);
                self.restart();
                match self.config.reset_behavior {
                    ResetBehavior::Idle => Ok(()),
                    ResetBehavior::Immediate => self.start(Some(last_player.as_str())).map(|_| ()),
                }
            }
        }
    }

    // Miss path: no penalty beyond losing the streak.
    fn miss_target(&mut self) {
        if let Some(t) = self.state.current_target.take() {
            log::debug!("missed {:?}", t.id);
        }
        self.state.target_hit = false;
        self.state.streak = 0;
        self.state.misses += 1;
        self.display.show_target(None);
        self.spawn_target();
    }

    fn reload_high_scores(&mut self) {
        match self.store.load_high_scores() {
            Ok(entries) => {
                self.high_scores = HighScoreTable::from_entries(entries, self.config.high_score_capacity);
            }
            Err(err) => log::warn!("using cached high scores: {err}"),
        }
    }

    fn stale(&self, what: &str) -> GameError {
        log::debug!("discarding stale {what} (round {}, active {})", self.state.round, self.state.is_active);
        GameError::StaleEvent
    }
}

impl<D: Display, S: Store, R: RandomSource> RoundEngine<D, ManualClock, S, R> {
    /// Moves virtual time forward by `ms`, firing everything that falls due.
    pub fn advance(&mut self, ms: u64) {
        let until = self.clock.now_ms() + ms;
        while let Some(event) = self.clock.pop_due(until) {
            let _ = self.fire(event);
        }
        self.clock.set_now(until);
    }
}
