use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::dom::{EventKind, NodeId, Target};
use crate::page::Page;

pub fn should_reveal(top: f64, viewport_height: f64, offset: f64) -> bool {
    top < viewport_height - offset
}

/// Fades content cards in as they scroll into view. Once shown, a card
/// stays shown.
pub struct Reveal {
    page: Rc<Page>,
    items: Vec<NodeId>,
    revealed: RefCell<Vec<bool>>,
}

impl Reveal {
    pub fn attach(page: &Rc<Page>) -> Option<Rc<Self>> {
        let items = page.dom.query_all(&page.config.selectors.reveal);
        if items.is_empty() {
            debug!("Nothing to reveal on scroll");
            return None;
        }
        let dom = &page.dom;

        if page.reduced_motion {
            for item in &items {
                dom.set_style(*item, "opacity", "1");
                dom.set_style(*item, "transform", "none");
                dom.set_style(*item, "transition", "none");
            }
            return Some(Rc::new(Self {
                page: page.clone(),
                revealed: RefCell::new(vec![true; items.len()]),
                items,
            }));
        }

        for item in &items {
            dom.set_style(*item, "opacity", "0");
            dom.set_style(*item, "transform", "translateY(20px)");
            dom.set_style(*item, "transition", "all 0.5s ease");
        }
        let this = Rc::new(Self {
            page: page.clone(),
            revealed: RefCell::new(vec![false; items.len()]),
            items,
        });
        let handler = this.clone();
        page.listen(Target::Window, EventKind::Scroll, move |_| handler.reveal_visible());
        this.reveal_visible();
        Some(this)
    }

    pub fn reveal_visible(&self) {
        let dom = &self.page.dom;
        let viewport_height = dom.viewport_height();
        let offset = self.page.config.reveal_offset;
        let mut revealed = self.revealed.borrow_mut();

        for (item, shown) in self.items.iter().zip(revealed.iter_mut()) {
            if *shown {
                continue;
            }
            if should_reveal(dom.bounding_rect(*item).top, viewport_height, offset) {
                dom.set_style(*item, "opacity", "1");
                dom.set_style(*item, "transform", "translateY(0)");
                *shown = true;
            }
        }
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.borrow().iter().filter(|r| **r).count()
    }
}
