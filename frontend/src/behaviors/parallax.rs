use std::rc::Rc;

use tracing::debug;

use crate::dom::{EventKind, NodeId, Target};
use crate::page::Page;

pub fn parallax_offset(scroll_y: f64, factor: f64, max: f64) -> f64 {
    (scroll_y * factor).min(max)
}

pub fn hero_transform(offset: f64) -> String {
    format!("perspective(1000px) rotateY(-5deg) translateY({}px)", offset)
}

/// Drifts the hero image down a little as the page scrolls.
pub struct HeroParallax {
    page: Rc<Page>,
    image: NodeId,
}

impl HeroParallax {
    pub fn attach(page: &Rc<Page>) -> Option<Rc<Self>> {
        if page.reduced_motion {
            debug!("Reduced motion preferred, hero parallax off");
            return None;
        }
        let image = page.dom.query(&page.config.selectors.hero_image)?;
        let this = Rc::new(Self {
            page: page.clone(),
            image,
        });
        let handler = this.clone();
        page.listen_passive(Target::Window, EventKind::Scroll, move |_| handler.update());
        this.update();
        Some(this)
    }

    pub fn update(&self) {
        let config = &self.page.config;
        let offset = parallax_offset(
            self.page.dom.scroll_y(),
            config.parallax_factor,
            config.parallax_max,
        );
        self.page
            .dom
            .set_style(self.image, "transform", &hero_transform(offset));
    }
}
