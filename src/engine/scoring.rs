//! Difficulty scaling and hit scoring. Pure functions of score/streak so they
//! can be checked without a running round.

use crate::config::Scaling;

/// Closed sampling interval.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub fn contains(&self, v: f64) -> bool { v >= self.min && v <= self.max }

    /// Maps `unit` in `[0, 1)` onto the span.
    pub fn lerp(&self, unit: f64) -> f64 { self.min + (self.max - self.min) * unit }
}

impl Scaling {
    /// Range at the given score. Both ends shrink monotonically and never drop
    /// below their floors; `min` is clamped to `max` if they would cross.
    pub fn span_at(&self, score: u32) -> Span {
        let min = (self.base_min - (score / self.min_divisor) as f64).max(self.floor_min);
        let max = (self.base_max - (score / self.max_divisor) as f64).max(self.floor_max);
        Span { min: min.min(max), max }
    }
}

/// Smaller targets are worth more: `round(100 - size)`, floored at `min_base`.
pub fn base_score(size: f64, min_base: u32) -> u32 {
    let raw = (100.0 - size).round();
    if raw <= min_base as f64 { min_base } else { raw as u32 }
}

/// Bonus for hit number `streak` in a row. Zero up to `threshold`, then half a
/// base score per extra hit, capped at twice the base score. Grows strictly
/// until the cap for any `base >= 2`.
pub fn streak_bonus(base: u32, streak: u32, threshold: u32) -> u32 {
    if streak <= threshold {
        return 0;
    }
    let excess = (streak - threshold) as f64;
    let base = base as f64;
    (base * excess * 0.5).min(base * 2.0).round() as u32
}
