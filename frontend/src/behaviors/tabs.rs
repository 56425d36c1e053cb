use std::rc::Rc;

use tracing::{debug, warn};

use crate::dom::{EventKind, NodeId, Target};
use crate::page::Page;

/// Mutually exclusive tab buttons, each naming its panel in `data-tab`.
pub struct Tabs {
    page: Rc<Page>,
    buttons: Vec<NodeId>,
    panels: Vec<NodeId>,
}

impl Tabs {
    pub fn attach(page: &Rc<Page>) -> Option<Rc<Self>> {
        let selectors = &page.config.selectors;
        let buttons = page.dom.query_all(&selectors.tab_buttons);
        if buttons.is_empty() {
            debug!("No tab buttons on page");
            return None;
        }
        let this = Rc::new(Self {
            page: page.clone(),
            panels: page.dom.query_all(&selectors.tab_panels),
            buttons: buttons.clone(),
        });
        for button in buttons {
            let handler = this.clone();
            page.listen(Target::Node(button), EventKind::Click, move |_| {
                handler.select(button)
            });
        }
        Some(this)
    }

    pub fn select(&self, button: NodeId) {
        let dom = &self.page.dom;
        for b in &self.buttons {
            dom.set_class(*b, "active", false);
        }
        for p in &self.panels {
            dom.set_class(*p, "active", false);
        }
        dom.set_class(button, "active", true);

        let attribute = &self.page.config.selectors.tab_target_attribute;
        let tab_id = dom.attribute(button, attribute);
        match tab_id.as_deref().and_then(|id| dom.element_by_id(id)) {
            Some(panel) => dom.set_class(panel, "active", true),
            None => warn!(tab = ?tab_id, "Tab button has no matching panel"),
        }
    }
}
