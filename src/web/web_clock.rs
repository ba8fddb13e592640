//! [`Clock`] over `setTimeout` / `setInterval`. Fired events go to a plain
//! dispatch function, which re-enters the engine from the JS event loop.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use crate::capability::Clock;
use crate::engine::{TimerEvent, TimerHandle};

type Callback = Closure<dyn FnMut()>;

#[derive(Default)]
struct Pending {
    timeouts: HashMap<i32, Callback>,
    intervals: HashMap<i32, Callback>,
    // Finished or cancelled callbacks; one may still be on the JS stack, so
    // they are only dropped when the next timer is armed.
    retired: Vec<Callback>,
}

impl Pending {
    fn finish_timeout(&mut self, id: i32) {
        if let Some(cb) = self.timeouts.remove(&id) {
            self.retired.push(cb);
        }
    }
}

pub struct WebClock {
    window: Window,
    dispatch: fn(TimerEvent),
    pending: Rc<RefCell<Pending>>,
}

impl WebClock {
    pub fn new(window: Window, dispatch: fn(TimerEvent)) -> Self {
        Self { window, dispatch, pending: Rc::new(RefCell::new(Pending::default())) }
    }

    /// Armed timers that have neither fired nor been cancelled.
    pub fn pending(&self) -> usize {
        let p = self.pending.borrow();
        p.timeouts.len() + p.intervals.len()
    }

    /// Fired or cancelled callbacks still held until the next timer is armed.
    pub fn retired(&self) -> usize { self.pending.borrow().retired.len() }

    fn arm(&mut self, ms: u32, event: TimerEvent, repeat: bool) -> TimerHandle {
        self.pending.borrow_mut().retired.clear();
        let dispatch = self.dispatch;
        let id_cell = Rc::new(Cell::new(0));
        let callback: Callback = if repeat {
            Closure::wrap(Box::new(move || dispatch(event)) as Box<dyn FnMut()>)
        } else {
            let pending = Rc::downgrade(&self.pending);
            let id_cell = id_cell.clone();
            Closure::wrap(Box::new(move || {
                dispatch(event);
                if let Some(p) = pending.upgrade() {
                    p.borrow_mut().finish_timeout(id_cell.get());
                }
            }) as Box<dyn FnMut()>)
        };

        let f = callback.as_ref().unchecked_ref();
        let ms = ms.min(i32::MAX as u32) as i32;
        let scheduled = if repeat {
            self.window.set_interval_with_callback_and_timeout_and_arguments_0(f, ms)
        } else {
            self.window.set_timeout_with_callback_and_timeout_and_arguments_0(f, ms)
        };
        match scheduled {
            Ok(id) => {
                id_cell.set(id);
                let mut p = self.pending.borrow_mut();
                if repeat { p.intervals.insert(id, callback) } else { p.timeouts.insert(id, callback) };
                TimerHandle(id as u32)
            }
            Err(err) => {
                log::error!("could not schedule {event:?}: {err:?}");
                TimerHandle(0)
            }
        }
    }
}

impl Clock for WebClock {
    fn every(&mut self, interval_ms: u32, event: TimerEvent) -> TimerHandle { self.arm(interval_ms, event, true) }

    fn after(&mut self, delay_ms: u32, event: TimerEvent) -> TimerHandle { self.arm(delay_ms, event, false) }

    fn cancel(&mut self, handle: TimerHandle) {
        let id = handle.0 as i32;
        let mut p = self.pending.borrow_mut();
        if let Some(cb) = p.timeouts.remove(&id) {
            self.window.clear_timeout_with_handle(id);
            p.retired.push(cb);
        } else if let Some(cb) = p.intervals.remove(&id) {
            self.window.clear_interval_with_handle(id);
            p.retired.push(cb);
        }
    }

    fn today(&self) -> String {
        js_sys::Date::new_0().to_locale_date_string("default", &JsValue::UNDEFINED).into()
    }
}

impl Drop for WebClock {
    fn drop(&mut self) {
        let p = self.pending.borrow();
        for id in p.timeouts.keys() {
            self.window.clear_timeout_with_handle(*id);
        }
        for id in p.intervals.keys() {
            self.window.clear_interval_with_handle(*id);
        }
    }
}
