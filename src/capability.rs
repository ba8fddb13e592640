//! Seams between the round engine and its host. The browser implementations live
//! in `web`, the headless ones in `clock`, `highscores` and `rng`.

use crate::engine::{Playfield, Target, TargetId, TimerEvent, TimerHandle};
use crate::error::{GameError, GameResult};
use crate::highscores::ScoreEntry;

/// Rendering surface. Implementations may silently skip anything they cannot draw.
pub trait Display {
    fn show_score(&mut self, score: u32);
    fn show_timer(&mut self, seconds: u32);
    /// `None` hides the target.
    fn show_target(&mut self, target: Option<&Target>);
    /// Hit feedback while the target waits out its feedback delay.
    fn show_target_hit(&mut self, target: &Target);
    fn show_game_over(&mut self, final_score: u32, is_new_high_score: bool);
    fn hide_game_over(&mut self);
    fn show_high_score(&mut self, top: Option<&ScoreEntry>);
    fn show_high_scores_table(&mut self, entries: &[ScoreEntry]);
    fn show_streak_bonus(&mut self, amount: u32);
    /// `true` while a round is running (start locked, reset available).
    fn set_controls_enabled(&mut self, playing: bool);
    /// Clears and unlocks player input after a reset.
    fn rearm_input(&mut self);
    /// Blocking prompt for input the engine refused.
    fn show_validation_error(&mut self, error: &GameError);
    fn playfield(&self) -> Playfield;
}

/// Timer scheduling. Scheduled events are handed back to
/// [`RoundEngine::fire`](crate::engine::RoundEngine::fire) by the host.
pub trait Clock {
    fn every(&mut self, interval_ms: u32, event: TimerEvent) -> TimerHandle;
    fn after(&mut self, delay_ms: u32, event: TimerEvent) -> TimerHandle;
    /// Unknown or already fired handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
    /// Date stamp for new score entries.
    fn today(&self) -> String;
}

/// High score persistence.
pub trait Store {
    fn load_high_scores(&self) -> GameResult<Vec<ScoreEntry>>;
    fn save_high_scores(&mut self, entries: &[ScoreEntry]) -> GameResult<()>;
}

/// Uniform randomness for spawn sizes, positions and lifetimes.
pub trait RandomSource {
    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f64;
}

/// Player actions routed into the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    StartRequested(String),
    TargetClicked(TargetId),
    ResetRequested,
}
