use super::state::TargetId;
use crate::capability::Clock;

/// Opaque id handed out by a [`Clock`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u32);

/// What a scheduled callback asks the engine to do when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    Tick { round: u32 },
    TargetExpired { round: u32, target: TargetId },
    HitFeedbackElapsed { round: u32, target: TargetId },
}

impl TimerEvent {
    pub fn round(&self) -> u32 {
        match *self {
            TimerEvent::Tick { round }
            | TimerEvent::TargetExpired { round, .. }
            | TimerEvent::HitFeedbackElapsed { round, .. } => round,
        }
    }
}

/// The engine's named timer slots. At most one handle per slot.
#[derive(Debug, Default)]
pub(crate) struct RoundTimers {
    pub tick: Option<TimerHandle>,
    pub target_timeout: Option<TimerHandle>,
    pub hit_feedback: Option<TimerHandle>,
}

impl RoundTimers {
    pub fn cancel_target_timeout(&mut self, clock: &mut impl Clock) {
        if let Some(h) = self.target_timeout.take() {
            clock.cancel(h);
        }
    }

    /// Both timers tied to the current target.
    pub fn cancel_target_timers(&mut self, clock: &mut impl Clock) {
        self.cancel_target_timeout(clock);
        if let Some(h) = self.hit_feedback.take() {
            clock.cancel(h);
        }
    }

    pub fn cancel_all(&mut self, clock: &mut impl Clock) {
        for h in [self.tick.take(), self.target_timeout.take(), self.hit_feedback.take()]
            .into_iter()
            .flatten()
        {
            clock.cancel(h);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tick.is_none() && self.target_timeout.is_none() && self.hit_feedback.is_none()
    }
}
