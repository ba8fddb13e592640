// Shared fakes for the native integration tests: a display that records every
// call and a random source that replays a fixed script.
#![allow(dead_code)]

use target_rush::clock::ManualClock;
use target_rush::engine::Playfield;
use target_rush::highscores::MemoryStore;
use target_rush::rng::SeededRandom;
use target_rush::{Display, GameConfig, GameError, RandomSource, RoundEngine, ScoreEntry, Target, TargetId};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Score(u32),
    Timer(u32),
    Target(Option<Target>),
    TargetHit(TargetId),
    GameOver { score: u32, new_high: bool },
    HideGameOver,
    HighScore(Option<ScoreEntry>),
    Table(Vec<ScoreEntry>),
    StreakBonus(u32),
    Controls(bool),
    RearmInput,
    ValidationError(GameError),
}

pub struct RecordingDisplay {
    pub calls: Vec<Call>,
    pub field: Playfield,
}

impl RecordingDisplay {
    pub fn new(width: f64, height: f64) -> Self {
        Self { calls: Vec::new(), field: Playfield { width, height } }
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn spawned(&self) -> Vec<Target> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Target(Some(t)) => Some(*t),
                _ => None,
            })
            .collect()
    }

    pub fn timers(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Timer(t) => Some(*t),
                _ => None,
            })
            .collect()
    }

    pub fn game_overs(&self) -> usize { self.count(|c| matches!(c, Call::GameOver { .. })) }
}

impl Display for RecordingDisplay {
    fn show_score(&mut self, score: u32) { self.calls.push(Call::Score(score)); }
    fn show_timer(&mut self, seconds: u32) { self.calls.push(Call::Timer(seconds)); }
    fn show_target(&mut self, target: Option<&Target>) { self.calls.push(Call::Target(target.copied())); }
    fn show_target_hit(&mut self, target: &Target) { self.calls.push(Call::TargetHit(target.id)); }
    fn show_game_over(&mut self, score: u32, new_high: bool) { self.calls.push(Call::GameOver { score, new_high }); }
    fn hide_game_over(&mut self) { self.calls.push(Call::HideGameOver); }
    fn show_high_score(&mut self, top: Option<&ScoreEntry>) { self.calls.push(Call::HighScore(top.cloned())); }
    fn show_high_scores_table(&mut self, entries: &[ScoreEntry]) { self.calls.push(Call::Table(entries.to_vec())); }
    fn show_streak_bonus(&mut self, amount: u32) { self.calls.push(Call::StreakBonus(amount)); }
    fn set_controls_enabled(&mut self, playing: bool) { self.calls.push(Call::Controls(playing)); }
    fn rearm_input(&mut self) { self.calls.push(Call::RearmInput); }
    fn show_validation_error(&mut self, error: &GameError) { self.calls.push(Call::ValidationError(error.clone())); }
    fn playfield(&self) -> Playfield { self.field }
}

/// Replays `values` in a loop.
pub struct ScriptedRandom {
    values: Vec<f64>,
    next: usize,
}

impl ScriptedRandom {
    pub fn new(values: &[f64]) -> Self { Self { values: values.to_vec(), next: 0 } }

    pub fn constant(v: f64) -> Self { Self::new(&[v]) }
}

impl RandomSource for ScriptedRandom {
    fn unit(&mut self) -> f64 {
        let v = self.values[self.next % self.values.len()];
        self.next += 1;
        v
    }
}

pub type TestEngine<R> = RoundEngine<RecordingDisplay, ManualClock, MemoryStore, R>;

pub fn engine_with<R: RandomSource>(config: GameConfig, store: MemoryStore, rng: R) -> TestEngine<R> {
    RoundEngine::new(config, RecordingDisplay::new(800.0, 600.0), ManualClock::with_date("6/1/2025"), store, rng)
}

/// Default config, empty store, targets always at the small end of the range
/// in the top-left corner with the shortest lifetime.
pub fn scripted_engine() -> TestEngine<ScriptedRandom> {
    engine_with(GameConfig::default(), MemoryStore::new(), ScriptedRandom::constant(0.0))
}

pub fn seeded_engine(seed: u64) -> TestEngine<SeededRandom> {
    engine_with(GameConfig::default(), MemoryStore::new(), SeededRandom::from_seed(seed))
}

pub fn live_id<R: RandomSource>(engine: &TestEngine<R>) -> TargetId {
    engine.state().live_target().expect("live target").id
}

pub fn entry(name: &str, score: u32) -> ScoreEntry {
    ScoreEntry { player_name: name.to_string(), score, date: "1/1/2025".to_string() }
}
