use std::cell::Cell;
use std::rc::Rc;

use tracing::debug;

use crate::behaviors::sticky_cta::StickyCta;
use crate::dom::{EventKind, NodeId, Target};
use crate::page::Page;

/// Whether the mobile navigation is expanded. Shared with the sticky CTA
/// policy, written only by [`MobileMenu`].
#[derive(Debug, Default)]
pub struct MenuState(Cell<bool>);

impl MenuState {
    pub fn is_open(&self) -> bool {
        self.0.get()
    }
}

pub struct MobileMenu {
    page: Rc<Page>,
    toggle: NodeId,
    nav: Option<NodeId>,
    bars: Vec<NodeId>,
    state: Rc<MenuState>,
    sticky: Rc<StickyCta>,
}

impl MobileMenu {
    pub fn attach(
        page: &Rc<Page>,
        state: Rc<MenuState>,
        sticky: Rc<StickyCta>,
    ) -> Option<Rc<Self>> {
        let selectors = &page.config.selectors;
        let Some(toggle) = page.dom.query(&selectors.menu_toggle) else {
            debug!("No mobile menu toggle, menu disabled");
            return None;
        };
        let this = Rc::new(Self {
            page: page.clone(),
            toggle,
            nav: page.dom.query(&selectors.main_nav),
            bars: page.dom.query_all_in(toggle, &selectors.menu_bars),
            state,
            sticky,
        });

        let handler = this.clone();
        page.listen(Target::Node(toggle), EventKind::Click, move |_| handler.toggle());
        Some(this)
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn toggle(&self) {
        let open = !self.state.is_open();
        self.state.0.set(open);

        let dom = &self.page.dom;
        dom.set_class(self.toggle, "active", open);
        if let Some(nav) = self.nav {
            dom.set_class(nav, "active", open);
        }
        self.morph_icon(open);

        if open {
            self.sticky.force_hidden();
        } else {
            self.sticky.refresh();
        }
    }

    pub fn close(&self) {
        if self.is_open() {
            self.toggle();
        }
    }

    // Three bars become an X: outer bars rotate, the middle one fades.
    fn morph_icon(&self, open: bool) {
        let dom = &self.page.dom;
        let (top, middle, bottom) = if open {
            ("rotate(45deg) translate(5px, 5px)", "0", "rotate(-45deg) translate(5px, -5px)")
        } else {
            ("none", "1", "none")
        };
        if let Some(bar) = self.bars.first() {
            dom.set_style(*bar, "transform", top);
        }
        if let Some(bar) = self.bars.get(1) {
            dom.set_style(*bar, "opacity", middle);
        }
        if let Some(bar) = self.bars.get(2) {
            dom.set_style(*bar, "transform", bottom);
        }
    }
}
