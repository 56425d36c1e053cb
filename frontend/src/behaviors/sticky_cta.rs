use std::rc::Rc;

use tracing::debug;

use crate::behaviors::menu::MenuState;
use crate::dom::{EventKind, NodeId, Rect, Target};
use crate::page::Page;

/// Inputs of the sticky call-to-action visibility policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityInputs {
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub contact: Option<Rect>,
    pub menu_open: bool,
}

/// Share of the contact section on screen, relative to the smaller of the
/// viewport and the section itself.
pub fn contact_visible_ratio(rect: Rect, viewport_height: f64) -> f64 {
    let visible = (rect.bottom.min(viewport_height) - rect.top.max(0.0)).max(0.0);
    let section = if rect.height > 0.0 {
        rect.height
    } else {
        viewport_height
    };
    let basis = viewport_height.min(section);
    if basis <= 0.0 {
        return 0.0;
    }
    visible / basis
}

/// Desktop hides it, then a visible contact section, then an open menu.
pub fn sticky_cta_visible(
    inputs: VisibilityInputs,
    desktop_min_width: f64,
    contact_ratio: f64,
) -> bool {
    if inputs.viewport_width >= desktop_min_width {
        return false;
    }
    if let Some(rect) = inputs.contact {
        if contact_visible_ratio(rect, inputs.viewport_height) >= contact_ratio {
            return false;
        }
    }
    !inputs.menu_open
}

pub struct StickyCta {
    page: Rc<Page>,
    cta: Option<NodeId>,
    contact: Option<NodeId>,
    menu: Rc<MenuState>,
}

impl StickyCta {
    /// Always returns a policy; without a `.sticky-cta` every call is a no-op.
    pub fn attach(page: &Rc<Page>, menu: Rc<MenuState>) -> Rc<Self> {
        let selectors = &page.config.selectors;
        let cta = page.dom.query(&selectors.sticky_cta);
        let contact = page.dom.query(&selectors.contact_section);
        let this = Rc::new(Self {
            page: page.clone(),
            cta,
            contact,
            menu,
        });

        if cta.is_none() {
            debug!("No sticky call-to-action on page");
            return this;
        }

        let on_scroll = this.clone();
        page.listen_passive(Target::Window, EventKind::Scroll, move |_| on_scroll.refresh());
        let on_resize = this.clone();
        page.listen(Target::Window, EventKind::Resize, move |_| on_resize.refresh());
        this.refresh();
        this
    }

    pub fn is_present(&self) -> bool {
        self.cta.is_some()
    }

    pub fn inputs(&self) -> VisibilityInputs {
        let dom = &self.page.dom;
        VisibilityInputs {
            viewport_width: dom.viewport_width(),
            viewport_height: dom.viewport_height(),
            contact: self.contact.map(|c| dom.bounding_rect(c)),
            menu_open: self.menu.is_open(),
        }
    }

    pub fn refresh(&self) {
        let Some(cta) = self.cta else { return };
        let config = &self.page.config;
        let visible = sticky_cta_visible(
            self.inputs(),
            config.desktop_min_width,
            config.contact_visible_ratio,
        );
        self.page.dom.set_class(cta, "hidden", !visible);
    }

    pub fn force_hidden(&self) {
        if let Some(cta) = self.cta {
            self.page.dom.set_class(cta, "hidden", true);
        }
    }
}
