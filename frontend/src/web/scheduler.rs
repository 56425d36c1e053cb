use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use gloo_timers::callback::{Interval, Timeout};

use crate::timer::{Scheduler, TimerHandle};

// Dropping either gloo handle clears the browser timer.
#[allow(dead_code)]
enum Pending {
    Timeout(Timeout),
    Interval(Interval),
}

/// [`Scheduler`] on top of gloo timers.
#[derive(Default)]
pub struct WebScheduler {
    next_id: Cell<u64>,
    pending: Rc<RefCell<HashMap<u64, Pending>>>,
}

impl WebScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&self) -> u64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }
}

impl Scheduler for WebScheduler {
    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerHandle {
        let id = self.allocate();
        let pending = self.pending.clone();
        let timeout = Timeout::new(delay_ms, move || {
            let fired = pending.borrow_mut().remove(&id);
            callback();
            drop(fired);
        });
        self.pending
            .borrow_mut()
            .insert(id, Pending::Timeout(timeout));
        TimerHandle(id)
    }

    fn set_interval(&self, period_ms: u32, mut callback: Box<dyn FnMut()>) -> TimerHandle {
        let id = self.allocate();
        let interval = Interval::new(period_ms, move || callback());
        self.pending
            .borrow_mut()
            .insert(id, Pending::Interval(interval));
        TimerHandle(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        let removed = self.pending.borrow_mut().remove(&handle.0);
        drop(removed);
    }
}
