use std::rc::Rc;

use tracing::debug;

use crate::dom::{EventKind, NodeId, Target};
use crate::page::Page;

pub fn is_scrolled(scroll_y: f64, threshold: f64) -> bool {
    scroll_y > threshold
}

/// Marks the header `scrolled` once the page moves past the threshold.
pub struct HeaderScroll {
    page: Rc<Page>,
    header: NodeId,
}

impl HeaderScroll {
    pub fn attach(page: &Rc<Page>) -> Option<Rc<Self>> {
        let Some(header) = page.dom.query(&page.config.selectors.header) else {
            debug!("No page header, scroll state disabled");
            return None;
        };
        let this = Rc::new(Self {
            page: page.clone(),
            header,
        });
        let handler = this.clone();
        page.listen(Target::Window, EventKind::Scroll, move |_| handler.update());
        // A reload can restore the page mid-scroll.
        this.update();
        Some(this)
    }

    pub fn update(&self) {
        let scrolled = is_scrolled(
            self.page.dom.scroll_y(),
            self.page.config.header_scroll_threshold,
        );
        self.page.dom.set_class(self.header, "scrolled", scrolled);
    }
}
