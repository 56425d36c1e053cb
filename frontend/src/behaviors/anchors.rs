use std::rc::Rc;

use tracing::debug;

use crate::behaviors::menu::MobileMenu;
use crate::dom::{DomEvent, EventKind, NodeId, Target};
use crate::page::Page;

/// Where to scroll so `target` lands just below the fixed header.
pub fn scroll_destination(target_top: f64, scroll_y: f64, header_height: f64) -> f64 {
    target_top + scroll_y - header_height
}

/// Smooth scrolling for in-page `#fragment` links.
pub struct AnchorScroll {
    page: Rc<Page>,
    header: Option<NodeId>,
    menu: Option<Rc<MobileMenu>>,
}

impl AnchorScroll {
    pub fn attach(page: &Rc<Page>, menu: Option<Rc<MobileMenu>>) -> Option<Rc<Self>> {
        let selectors = &page.config.selectors;
        let anchors = page.dom.query_all(&selectors.anchor_links);
        if anchors.is_empty() {
            debug!("No fragment links on page");
            return None;
        }
        let this = Rc::new(Self {
            page: page.clone(),
            header: page.dom.query(&selectors.header),
            menu,
        });
        for anchor in anchors {
            let handler = this.clone();
            page.listen(Target::Node(anchor), EventKind::Click, move |event| {
                handler.follow(anchor, event)
            });
        }
        Some(this)
    }

    pub fn follow(&self, anchor: NodeId, event: &DomEvent) {
        event.prevent_default();

        if let Some(menu) = &self.menu {
            menu.close();
        }

        let dom = &self.page.dom;
        let Some(href) = dom.attribute(anchor, "href") else {
            return;
        };
        if href == "#" {
            return;
        }
        let Some(target) = dom.query(&href) else {
            debug!(href = %href, "Fragment link points at nothing");
            return;
        };

        let header_height = self.header.map(|h| dom.offset_height(h)).unwrap_or(0.0);
        let top = scroll_destination(dom.bounding_rect(target).top, dom.scroll_y(), header_height);
        dom.smooth_scroll_to(top);
    }
}
