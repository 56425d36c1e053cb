use std::cell::Cell;
use std::rc::Rc;

use tracing::debug;

use crate::behaviors::sticky_cta::StickyCta;
use crate::dom::{DomEvent, EventKind, NodeId, Target};
use crate::page::Page;

/// The "book a demo" dialog. Closed until an `.open-demo` control fires.
pub struct DemoModal {
    page: Rc<Page>,
    modal: NodeId,
    open: Cell<bool>,
    sticky: Rc<StickyCta>,
}

impl DemoModal {
    pub fn attach(page: &Rc<Page>, sticky: Rc<StickyCta>) -> Option<Rc<Self>> {
        let selectors = &page.config.selectors;
        let Some(modal) = page.dom.query(&selectors.modal) else {
            debug!("No demo modal on page");
            return None;
        };
        let this = Rc::new(Self {
            page: page.clone(),
            modal,
            open: Cell::new(false),
            sticky,
        });

        for trigger in page.dom.query_all(&selectors.modal_open) {
            let handler = this.clone();
            page.listen(Target::Node(trigger), EventKind::Click, move |event| {
                event.prevent_default();
                handler.open();
            });
        }

        let handler = this.clone();
        page.listen(Target::Node(modal), EventKind::Click, move |event| {
            handler.on_click(event)
        });

        let handler = this.clone();
        page.listen(Target::Document, EventKind::KeyDown, move |event| {
            if event.key.as_deref() == Some("Escape") && handler.is_open() {
                handler.close();
            }
        });

        Some(this)
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    pub fn open(&self) {
        let dom = &self.page.dom;
        self.open.set(true);
        dom.set_class(self.modal, "open", true);
        dom.set_attribute(self.modal, "aria-hidden", "false");
        dom.set_body_style("overflow", "hidden");
        self.sticky.force_hidden();
    }

    pub fn close(&self) {
        let dom = &self.page.dom;
        self.open.set(false);
        dom.set_class(self.modal, "open", false);
        dom.set_attribute(self.modal, "aria-hidden", "true");
        dom.set_body_style("overflow", "");
        self.sticky.refresh();
    }

    fn on_click(&self, event: &DomEvent) {
        let Some(target) = event.target else { return };
        if self
            .page
            .dom
            .matches(target, &self.page.config.selectors.modal_close)
        {
            self.close();
        }
    }
}
