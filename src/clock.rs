//! Virtual-time [`Clock`] for headless hosts and tests. Nothing fires on its
//! own; the host advances time and feeds due events back into the engine.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::capability::Clock;
use crate::engine::{TimerEvent, TimerHandle};

#[derive(Debug)]
struct Scheduled {
    due_ms: u64,
    interval_ms: Option<u32>,
    event: TimerEvent,
}

#[derive(Debug)]
struct Inner {
    now_ms: u64,
    next_handle: u32,
    timers: BTreeMap<TimerHandle, Scheduled>,
    today: String,
}

/// Cheap to clone; clones share the same timeline.
#[derive(Clone, Debug)]
pub struct ManualClock {
    inner: Rc<RefCell<Inner>>,
}

impl Default for ManualClock {
    fn default() -> Self { Self::new() }
}

impl ManualClock {
    pub fn new() -> Self { Self::with_date("1/1/1970") }

    pub fn with_date(today: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                now_ms: 0,
                next_handle: 1,
                timers: BTreeMap::new(),
                today: today.into(),
            })),
        }
    }

    pub fn now_ms(&self) -> u64 { self.inner.borrow().now_ms }

    /// Number of scheduled (not yet fired or cancelled) timers.
    pub fn pending(&self) -> usize { self.inner.borrow().timers.len() }

    /// Pops the earliest event due at or before `until_ms` and moves the clock to
    /// its due time. Intervals are re-armed; ties fire in scheduling order.
    pub fn pop_due(&self, until_ms: u64) -> Option<TimerEvent> {
        let mut inner = self.inner.borrow_mut();
        let (&handle, due) = inner
            .timers
            .iter()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by_key(|(h, t)| (t.due_ms, **h))
            .map(|(h, t)| (h, t.due_ms))?;
        inner.now_ms = inner.now_ms.max(due);
        let interval_ms = inner.timers.get(&handle)?.interval_ms;
        match interval_ms {
            Some(every) => {
                let t = inner.timers.get_mut(&handle)?;
                t.due_ms += every.max(1) as u64;
                Some(t.event)
            }
            None => inner.timers.remove(&handle).map(|t| t.event),
        }
    }

    /// Moves the clock forward without firing anything.
    pub fn set_now(&self, now_ms: u64) {
        let mut inner = self.inner.borrow_mut();
        inner.now_ms = inner.now_ms.max(now_ms);
    }

    fn schedule(&mut self, delay_ms: u32, interval_ms: Option<u32>, event: TimerEvent) -> TimerHandle {
        let mut inner = self.inner.borrow_mut();
        let handle = TimerHandle(inner.next_handle);
        inner.next_handle += 1;
        let due_ms = inner.now_ms + delay_ms as u64;
        inner.timers.insert(handle, Scheduled { due_ms, interval_ms, event });
        handle
    }
}

impl Clock for ManualClock {
    fn every(&mut self, interval_ms: u32, event: TimerEvent) -> TimerHandle {
        self.schedule(interval_ms, Some(interval_ms), event)
    }

    fn after(&mut self, delay_ms: u32, event: TimerEvent) -> TimerHandle {
        self.schedule(delay_ms, None, event)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.inner.borrow_mut().timers.remove(&handle);
    }

    fn today(&self) -> String { self.inner.borrow().today.clone() }
}
