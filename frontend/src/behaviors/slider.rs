use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::dom::{EventKind, NodeId, Target};
use crate::page::Page;
use crate::timer::TimerHandle;

/// True modulo, so -1 lands on the last slide.
pub fn normalize_index(index: isize, len: usize) -> usize {
    index.rem_euclid(len as isize) as usize
}

/// Cyclic testimonial carousel with auto-advance.
pub struct Slider {
    page: Rc<Page>,
    slides: Vec<NodeId>,
    dots: Vec<NodeId>,
    current: Cell<usize>,
    timer: RefCell<Option<TimerHandle>>,
    this: Weak<Slider>,
}

impl Slider {
    /// `None` when there is no slider or it has no slides.
    pub fn attach(page: &Rc<Page>) -> Option<Rc<Self>> {
        let selectors = &page.config.selectors;
        let root = page.dom.query(&selectors.slider)?;
        let slides = page.dom.query_all_in(root, &selectors.slides);
        if slides.is_empty() {
            debug!("Testimonial slider has no slides");
            return None;
        }
        let dots = page.dom.query_all_in(root, &selectors.dots);
        let this = Rc::new_cyclic(|weak| Self {
            page: page.clone(),
            slides,
            dots: dots.clone(),
            current: Cell::new(0),
            timer: RefCell::new(None),
            this: weak.clone(),
        });

        this.show_slide(0);
        this.start_auto();

        if let Some(next) = page.dom.query_in(root, &selectors.next) {
            let handler = this.clone();
            page.listen(Target::Node(next), EventKind::Click, move |_| {
                handler.next();
                handler.start_auto();
            });
        }
        if let Some(prev) = page.dom.query_in(root, &selectors.prev) {
            let handler = this.clone();
            page.listen(Target::Node(prev), EventKind::Click, move |_| {
                handler.prev();
                handler.start_auto();
            });
        }
        for (i, dot) in dots.into_iter().enumerate() {
            let handler = this.clone();
            page.listen(Target::Node(dot), EventKind::Click, move |_| {
                handler.show_slide(i as isize);
                handler.start_auto();
            });
        }

        let handler = this.clone();
        page.listen(Target::Node(root), EventKind::MouseEnter, move |_| handler.stop_auto());
        let handler = this.clone();
        page.listen(Target::Node(root), EventKind::MouseLeave, move |_| handler.start_auto());

        Some(this)
    }

    pub fn current(&self) -> usize {
        self.current.get()
    }

    pub fn show_slide(&self, index: isize) {
        let current = normalize_index(index, self.slides.len());
        self.current.set(current);

        let dom = &self.page.dom;
        for (i, slide) in self.slides.iter().enumerate() {
            dom.set_class(*slide, "active", i == current);
        }
        for (i, dot) in self.dots.iter().enumerate() {
            dom.set_class(*dot, "active", i == current);
            dom.set_attribute(*dot, "aria-selected", if i == current { "true" } else { "false" });
        }
    }

    pub fn next(&self) {
        self.show_slide(self.current.get() as isize + 1);
    }

    pub fn prev(&self) {
        self.show_slide(self.current.get() as isize - 1);
    }

    /// (Re)starts the rotation; any running timer is cancelled first.
    pub fn start_auto(&self) {
        if self.page.reduced_motion {
            return;
        }
        self.stop_auto();
        let weak = self.this.clone();
        let handle = self.page.scheduler.set_interval(
            self.page.config.slider_interval_ms,
            Box::new(move || {
                if let Some(slider) = weak.upgrade() {
                    slider.next();
                }
            }),
        );
        *self.timer.borrow_mut() = Some(handle);
    }

    pub fn stop_auto(&self) {
        let handle = self.timer.borrow_mut().take();
        if let Some(handle) = handle {
            self.page.scheduler.cancel(handle);
        }
    }

    pub fn is_auto_running(&self) -> bool {
        self.timer.borrow().is_some()
    }
}
