//! Client-side interactions for the Time Well Served marketing page:
//! header state, mobile menu, smooth anchors, tabs, demo forms, reveal
//! and parallax effects, the sticky call-to-action, the demo modal and
//! the testimonial slider.
//!
//! Behaviors talk to the page only through [`dom::Dom`] and
//! [`timer::Scheduler`], so the same code runs against the browser
//! (`web`) and against in-memory fakes in tests.

pub mod config;
pub mod controller;
pub mod dom;
pub mod error;
pub mod page;
pub mod timer;

pub mod behaviors {
    pub mod anchors;
    pub mod forms;
    pub mod header;
    pub mod menu;
    pub mod modal;
    pub mod parallax;
    pub mod reveal;
    pub mod slider;
    pub mod sticky_cta;
    pub mod tabs;
}

pub mod web {
    #[cfg(target_arch = "wasm32")]
    pub mod dom;
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    mod registry;
    #[cfg(target_arch = "wasm32")]
    pub mod scheduler;
}


pub use config::UiConfig;
pub use controller::UiController;
pub use error::UiError;

#[cfg(target_arch = "wasm32")]
mod boot {
    use std::cell::RefCell;
    use std::rc::Rc;

    use tracing::{error, info};
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::js_sys::Reflect;
    use web_sys::Window;

    use crate::config::{self, UiConfig};
    use crate::controller::UiController;
    use crate::error::UiError;
    use crate::web::dom::WebDom;
    use crate::web::scheduler::WebScheduler;

    /// Global a page script may set before the module loads to override
    /// selectors or timings.
    const CONFIG_GLOBAL: &str = "siteUiConfig";

    thread_local! {
        static CONTROLLER: RefCell<Option<UiController>> = RefCell::new(None);
    }

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        // Initialize console error panic hook for better error messages
        console_error_panic_hook::set_once();

        tracing_wasm::set_as_global_default_with_config(
            tracing_wasm::WASMLayerConfigBuilder::new()
                .set_max_level(config::log_level())
                .build(),
        );

        info!("Starting page interactions");
        let window = web_sys::window().ok_or(UiError::NoWindow)?;
        let document = window.document().ok_or(UiError::NoDocument)?;
        let config = read_config(&window)?;

        if document.ready_state() == "loading" {
            let on_ready = Closure::once(move || {
                if let Err(e) = mount(config) {
                    error!("Failed to start page interactions: {}", e);
                }
            });
            document.add_event_listener_with_callback(
                "DOMContentLoaded",
                on_ready.as_ref().unchecked_ref(),
            )?;
            on_ready.forget();
        } else {
            mount(config)?;
        }
        Ok(())
    }

    /// Tears the controller down; a later `start` builds a fresh one.
    #[wasm_bindgen]
    pub fn dispose() {
        CONTROLLER.with(|slot| {
            if let Some(controller) = slot.borrow_mut().take() {
                controller.dispose();
            }
        });
    }

    fn read_config(window: &Window) -> Result<UiConfig, UiError> {
        let value = Reflect::get(window, &JsValue::from_str(CONFIG_GLOBAL))?;
        if value.is_undefined() || value.is_null() {
            return Ok(UiConfig::default());
        }
        serde_wasm_bindgen::from_value(value).map_err(|e| UiError::Config(e.to_string()))
    }

    fn mount(config: UiConfig) -> Result<(), UiError> {
        let dom = Rc::new(WebDom::new()?);
        let scheduler = Rc::new(WebScheduler::new());
        let controller = UiController::init(dom, scheduler, config);
        CONTROLLER.with(|slot| {
            if let Some(previous) = slot.borrow_mut().replace(controller) {
                previous.dispose();
            }
        });
        Ok(())
    }
}
