//! Round tuning. Every field has a default so hosts can pass partial JSON.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};

/// What `ResetRequested` does once the engine is back in idle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetBehavior {
    /// Stay idle until the player presses start again.
    #[default]
    Idle,
    /// Start a fresh round right away for the last player.
    Immediate,
}

/// Shrinking `[min, max]` range driven by score:
/// `min = max(floor_min, base_min - floor(score / min_divisor))`, same shape for max.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scaling {
    pub base_min: f64,
    pub floor_min: f64,
    pub min_divisor: u32,
    pub base_max: f64,
    pub floor_max: f64,
    pub max_divisor: u32,
}

impl Scaling {
    fn validate(&self, what: &str) -> GameResult<()> {
        if self.min_divisor == 0 || self.max_divisor == 0 {
            return Err(GameError::InvalidConfig(format!("{what}: divisors must be non-zero")));
        }
        if self.floor_min > self.base_min || self.floor_max > self.base_max {
            return Err(GameError::InvalidConfig(format!("{what}: floors must not exceed bases")));
        }
        if self.base_min > self.base_max {
            return Err(GameError::InvalidConfig(format!("{what}: base_min exceeds base_max")));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub game_duration_secs: u32,
    pub tick_interval_ms: u32,
    /// Delay between a hit and the next spawn while the hit animation plays.
    pub hit_feedback_ms: u32,
    pub require_player_name: bool,
    pub default_player_name: String,
    pub high_score_capacity: usize,
    /// Streaks above this earn a bonus.
    pub streak_threshold: u32,
    pub min_base_score: u32,
    /// Target edge length in playfield pixels.
    pub target_size: Scaling,
    /// Miss timeout in milliseconds.
    pub target_lifetime: Scaling,
    pub storage_key: String,
    pub reset_behavior: ResetBehavior,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            game_duration_secs: 30,
            tick_interval_ms: 1000,
            hit_feedback_ms: 300,
            require_player_name: true,
            default_player_name: "Anonymous".to_string(),
            high_score_capacity: 5,
            streak_threshold: 2,
            min_base_score: 10,
            target_size: Scaling {
                base_min: 40.0,
                floor_min: 20.0,
                min_divisor: 100,
                base_max: 60.0,
                floor_max: 40.0,
                max_divisor: 200,
            },
            target_lifetime: Scaling {
                base_min: 500.0,
                floor_min: 300.0,
                min_divisor: 50,
                base_max: 1500.0,
                floor_max: 800.0,
                max_divisor: 25,
            },
            storage_key: "targetGameHighScores".to_string(),
            reset_behavior: ResetBehavior::Idle,
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> GameResult<Self> {
        let cfg: GameConfig =
            serde_json::from_str(json).map_err(|e| GameError::InvalidConfig(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> GameResult<()> {
        if self.game_duration_secs == 0 {
            return Err(GameError::InvalidConfig("game_duration_secs must be non-zero".into()));
        }
        if self.tick_interval_ms == 0 {
            return Err(GameError::InvalidConfig("tick_interval_ms must be non-zero".into()));
        }
        if self.high_score_capacity == 0 {
            return Err(GameError::InvalidConfig("high_score_capacity must be non-zero".into()));
        }
        // below 2 the rounded streak bonus stalls between consecutive hits
        if self.min_base_score < 2 {
            return Err(GameError::InvalidConfig("min_base_score must be at least 2".into()));
        }
        if self.target_size.floor_min <= 0.0 {
            return Err(GameError::InvalidConfig("target_size: floor_min must be positive".into()));
        }
        if self.target_lifetime.floor_min < 1.0 {
            return Err(GameError::InvalidConfig("target_lifetime: floor_min must be at least 1ms".into()));
        }
        self.target_size.validate("target_size")?;
        self.target_lifetime.validate("target_lifetime")
    }
}
