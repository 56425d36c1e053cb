use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use crate::timer::{Scheduler, TimerHandle};

enum Job {
    Once(Box<dyn FnOnce()>),
    Every {
        period: u64,
        callback: Box<dyn FnMut()>,
    },
}

struct Entry {
    id: u64,
    due: u64,
    seq: u64,
    job: Job,
}

/// Deterministic scheduler: nothing runs until `advance` moves time past
/// a deadline. Counts every scheduling call for assertions.
#[derive(Default)]
pub struct FakeClock {
    now: Cell<u64>,
    seq: Cell<u64>,
    next_id: Cell<u64>,
    entries: RefCell<Vec<Entry>>,
    live: RefCell<HashSet<u64>>,
    timeouts_scheduled: Cell<usize>,
    intervals_scheduled: Cell<usize>,
    cancels: Cell<usize>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now.get()
    }

    pub fn timeouts_scheduled(&self) -> usize {
        self.timeouts_scheduled.get()
    }

    pub fn intervals_scheduled(&self) -> usize {
        self.intervals_scheduled.get()
    }

    pub fn cancels(&self) -> usize {
        self.cancels.get()
    }

    pub fn active_intervals(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|e| matches!(e.job, Job::Every { .. }))
            .count()
    }

    pub fn pending(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Runs every callback due within the next `ms`, in deadline order.
    pub fn advance(&self, ms: u64) {
        let target = self.now.get() + ms;
        loop {
            let next = {
                let entries = self.entries.borrow();
                entries
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| e.due <= target)
                    .min_by_key(|(_, e)| (e.due, e.seq))
                    .map(|(idx, _)| idx)
            };
            let Some(idx) = next else { break };
            let entry = self.entries.borrow_mut().remove(idx);
            self.now.set(entry.due);
            match entry.job {
                Job::Once(callback) => {
                    self.live.borrow_mut().remove(&entry.id);
                    callback();
                }
                Job::Every {
                    period,
                    mut callback,
                } => {
                    callback();
                    if self.live.borrow().contains(&entry.id) {
                        self.push(entry.id, entry.due + period, Job::Every { period, callback });
                    }
                }
            }
        }
        self.now.set(target);
    }

    fn push(&self, id: u64, due: u64, job: Job) {
        let seq = self.seq.get();
        self.seq.set(seq + 1);
        self.entries.borrow_mut().push(Entry { id, due, seq, job });
    }

    fn allocate(&self) -> u64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.live.borrow_mut().insert(id);
        id
    }
}

impl Scheduler for FakeClock {
    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerHandle {
        self.timeouts_scheduled.set(self.timeouts_scheduled.get() + 1);
        let id = self.allocate();
        self.push(id, self.now.get() + u64::from(delay_ms), Job::Once(callback));
        TimerHandle(id)
    }

    fn set_interval(&self, period_ms: u32, callback: Box<dyn FnMut()>) -> TimerHandle {
        self.intervals_scheduled.set(self.intervals_scheduled.get() + 1);
        let id = self.allocate();
        let period = u64::from(period_ms.max(1));
        self.push(id, self.now.get() + period, Job::Every { period, callback });
        TimerHandle(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        self.cancels.set(self.cancels.get() + 1);
        self.live.borrow_mut().remove(&handle.0);
        self.entries.borrow_mut().retain(|e| e.id != handle.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn interval_fires_each_period_until_cancelled() {
        let clock = FakeClock::new();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let handle = clock.set_interval(100, Box::new(move || counter.set(counter.get() + 1)));

        clock.advance(350);
        assert_eq!(hits.get(), 3);

        clock.cancel(handle);
        clock.advance(1000);
        assert_eq!(hits.get(), 3);
        assert_eq!(clock.active_intervals(), 0);
    }

    #[test]
    fn timeouts_run_in_deadline_order() {
        let clock = FakeClock::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for (delay, tag) in [(30, "c"), (10, "a"), (20, "b")] {
            let order = order.clone();
            clock.set_timeout(delay, Box::new(move || order.borrow_mut().push(tag)));
        }
        clock.advance(25);
        assert_eq!(*order.borrow(), vec!["a", "b"]);
        clock.advance(5);
        assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
        assert_eq!(clock.now(), 30);
    }
}
