use std::rc::Rc;

use tracing::info;

use crate::behaviors::anchors::AnchorScroll;
use crate::behaviors::forms::DemoForm;
use crate::behaviors::header::HeaderScroll;
use crate::behaviors::menu::{MenuState, MobileMenu};
use crate::behaviors::modal::DemoModal;
use crate::behaviors::parallax::HeroParallax;
use crate::behaviors::reveal::Reveal;
use crate::behaviors::slider::Slider;
use crate::behaviors::sticky_cta::StickyCta;
use crate::behaviors::tabs::Tabs;
use crate::config::UiConfig;
use crate::dom::Dom;
use crate::page::Page;
use crate::timer::Scheduler;

/// Wires every page behavior whose markup is present. Built once per page
/// load; `dispose` undoes the wiring.
pub struct UiController {
    page: Rc<Page>,
    header: Option<Rc<HeaderScroll>>,
    menu: Option<Rc<MobileMenu>>,
    anchors: Option<Rc<AnchorScroll>>,
    tabs: Option<Rc<Tabs>>,
    demo_form: Option<Rc<DemoForm>>,
    quick_form: Option<Rc<DemoForm>>,
    reveal: Option<Rc<Reveal>>,
    parallax: Option<Rc<HeroParallax>>,
    sticky: Rc<StickyCta>,
    modal: Option<Rc<DemoModal>>,
    slider: Option<Rc<Slider>>,
}

impl UiController {
    pub fn init(dom: Rc<dyn Dom>, scheduler: Rc<dyn Scheduler>, config: UiConfig) -> Self {
        let page = Page::new(dom, scheduler, config);

        let menu_state = Rc::new(MenuState::default());
        let sticky = StickyCta::attach(&page, menu_state.clone());
        let header = HeaderScroll::attach(&page);
        let menu = MobileMenu::attach(&page, menu_state, sticky.clone());
        let anchors = AnchorScroll::attach(&page, menu.clone());
        let tabs = Tabs::attach(&page);
        let demo_form = DemoForm::attach(&page, page.config.demo_form.clone(), None);
        let reveal = Reveal::attach(&page);
        let parallax = HeroParallax::attach(&page);
        let modal = DemoModal::attach(&page, sticky.clone());
        let quick_form = DemoForm::attach(&page, page.config.quick_form.clone(), modal.clone());
        let slider = Slider::attach(&page);

        let controller = Self {
            page,
            header,
            menu,
            anchors,
            tabs,
            demo_form,
            quick_form,
            reveal,
            parallax,
            sticky,
            modal,
            slider,
        };
        info!(
            reduced_motion = controller.page.reduced_motion,
            listeners = controller.page.listener_count(),
            behaviors = ?controller.active_behaviors(),
            "Page interactions ready"
        );
        controller
    }

    /// Stops the slider and drops every listener. Form callbacks already
    /// scheduled still run.
    pub fn dispose(&self) {
        if let Some(slider) = &self.slider {
            slider.stop_auto();
        }
        self.page.detach_all();
        info!("Page interactions disposed");
    }

    pub fn reduced_motion(&self) -> bool {
        self.page.reduced_motion
    }

    pub fn active_behaviors(&self) -> Vec<&'static str> {
        [
            ("header", self.header.is_some()),
            ("menu", self.menu.is_some()),
            ("anchors", self.anchors.is_some()),
            ("tabs", self.tabs.is_some()),
            ("demo_form", self.demo_form.is_some()),
            ("quick_form", self.quick_form.is_some()),
            ("reveal", self.reveal.is_some()),
            ("parallax", self.parallax.is_some()),
            ("sticky_cta", self.sticky.is_present()),
            ("modal", self.modal.is_some()),
            ("slider", self.slider.is_some()),
        ]
        .into_iter()
        .filter(|(_, on)| *on)
        .map(|(name, _)| name)
        .collect()
    }

    pub fn menu(&self) -> Option<&Rc<MobileMenu>> {
        self.menu.as_ref()
    }

    pub fn modal(&self) -> Option<&Rc<DemoModal>> {
        self.modal.as_ref()
    }

    pub fn slider(&self) -> Option<&Rc<Slider>> {
        self.slider.as_ref()
    }

    pub fn sticky_cta(&self) -> &Rc<StickyCta> {
        &self.sticky
    }

    pub fn tabs(&self) -> Option<&Rc<Tabs>> {
        self.tabs.as_ref()
    }
}
