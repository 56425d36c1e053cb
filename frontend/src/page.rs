use std::cell::RefCell;
use std::rc::Rc;

use crate::config::UiConfig;
use crate::dom::{Dom, DomEvent, EventKind, ListenerId, Target};
use crate::timer::Scheduler;

/// Everything a behavior needs from its surroundings. Listeners go
/// through here so the controller can drop them all on dispose.
pub struct Page {
    pub dom: Rc<dyn Dom>,
    pub scheduler: Rc<dyn Scheduler>,
    pub config: UiConfig,
    /// Read once at construction.
    pub reduced_motion: bool,
    listeners: RefCell<Vec<ListenerId>>,
}

impl Page {
    pub fn new(dom: Rc<dyn Dom>, scheduler: Rc<dyn Scheduler>, config: UiConfig) -> Rc<Self> {
        let reduced_motion = dom.prefers_reduced_motion();
        Rc::new(Self {
            dom,
            scheduler,
            config,
            reduced_motion,
            listeners: RefCell::new(Vec::new()),
        })
    }

    pub fn listen<F>(&self, target: Target, kind: EventKind, handler: F)
    where
        F: Fn(&DomEvent) + 'static,
    {
        self.register(target, kind, false, handler);
    }

    /// Same as [`Page::listen`] but never blocks scrolling.
    pub fn listen_passive<F>(&self, target: Target, kind: EventKind, handler: F)
    where
        F: Fn(&DomEvent) + 'static,
    {
        self.register(target, kind, true, handler);
    }

    fn register<F>(&self, target: Target, kind: EventKind, passive: bool, handler: F)
    where
        F: Fn(&DomEvent) + 'static,
    {
        let id = self.dom.listen(target, kind, passive, Rc::new(handler));
        self.listeners.borrow_mut().push(id);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn detach_all(&self) {
        let ids: Vec<ListenerId> = self.listeners.borrow_mut().drain(..).collect();
        for id in ids {
            self.dom.unlisten(id);
        }
    }
}
