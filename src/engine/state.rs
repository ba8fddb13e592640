use serde::Serialize;

/// Identifies a spawned target; unique for the lifetime of an engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TargetId(pub u32);

/// Visible play area in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Playfield {
    pub width: f64,
    pub height: f64,
}

/// A square target; `x`/`y` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Target {
    pub id: TargetId,
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

impl Target {
    /// Whether the whole square lies inside `field`.
    pub fn fits_within(&self, field: Playfield) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.x + self.size <= field.width && self.y + self.size <= field.height
    }
}

/// Per-round state; reset on every `start`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoundState {
    pub score: u32,
    pub time_remaining: u32,
    pub is_active: bool,
    pub streak: u32,
    pub current_target: Option<Target>,
    /// Current target was hit and is waiting out its feedback delay.
    pub target_hit: bool,
    /// Generation counter; timer events from earlier rounds carry an older value.
    pub round: u32,
    pub player_name: String,
    pub hits: u32,
    pub misses: u32,
}

impl RoundState {
    pub(crate) fn idle(duration_secs: u32, round: u32) -> Self {
        Self {
            score: 0,
            time_remaining: duration_secs,
            is_active: false,
            streak: 0,
            current_target: None,
            target_hit: false,
            round,
            player_name: String::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Target that can still be clicked.
    pub fn live_target(&self) -> Option<&Target> {
        if self.target_hit { None } else { self.current_target.as_ref() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fits_within_rejects_overhang() {
        let field = Playfield { width: 100.0, height: 80.0 };
        let t = |x, y, size| Target { id: TargetId(1), x, y, size };
        assert!(t(0.0, 0.0, 40.0).fits_within(field));
        assert!(t(60.0, 40.0, 40.0).fits_within(field));
        assert!(!t(60.5, 0.0, 40.0).fits_within(field));
        assert!(!t(0.0, 0.0, 90.0).fits_within(field));
        assert!(!t(-1.0, 0.0, 10.0).fits_within(field));
    }
}
