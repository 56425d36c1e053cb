use serde::{Deserialize, Deserializer};
use tracing::Level;

use crate::error::UiError;

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::DEBUG // Verbose console output when running locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::INFO
}

/// Every tunable of the page controller. Missing keys fall back to the
/// values the marketing page ships with.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub header_scroll_threshold: f64,
    pub reveal_offset: f64,
    pub parallax_factor: f64,
    pub parallax_max: f64,
    pub desktop_min_width: f64,
    pub contact_visible_ratio: f64,
    pub slider_interval_ms: u32,
    #[serde(deserialize_with = "demo_form")]
    pub demo_form: FormConfig,
    #[serde(deserialize_with = "quick_form")]
    pub quick_form: FormConfig,
    pub selectors: Selectors,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            header_scroll_threshold: 50.0,
            reveal_offset: 100.0,
            parallax_factor: 0.06,
            parallax_max: 30.0,
            desktop_min_width: 768.0,
            contact_visible_ratio: 0.25,
            slider_interval_ms: 6000,
            demo_form: FormConfig::demo(),
            quick_form: FormConfig::quick(),
            selectors: Selectors::default(),
        }
    }
}

impl UiConfig {
    pub fn from_json(raw: &str) -> Result<Self, UiError> {
        serde_json::from_str(raw).map_err(|e| UiError::Config(e.to_string()))
    }
}

/// Settings for one simulated form. Built from [`FormConfig::demo`] or
/// [`FormConfig::quick`]; JSON can only patch the keys in [`FormPatch`].
#[derive(Debug, Clone, PartialEq)]
pub struct FormConfig {
    pub selector: String,
    pub send_delay_ms: u32,
    pub notice_ms: u32,
    pub notice_text: String,
    pub notice_class: Option<String>,
    pub notice_styles: Vec<(String, String)>,
    pub loading_label: String,
    /// Attribute on the submit button that overrides `loading_label`.
    pub loading_attribute: Option<String>,
    pub closes_modal: bool,
}

impl FormConfig {
    pub fn demo() -> Self {
        Self {
            selector: "#demo-form".to_string(),
            send_delay_ms: 1500,
            notice_ms: 5000,
            notice_text: "Thank you! We will contact you soon about your demo.".to_string(),
            notice_class: Some("form-success".to_string()),
            notice_styles: styles(&[
                ("color", "var(--success)"),
                ("padding", "var(--spacing-md)"),
                ("margin-top", "var(--spacing-md)"),
                ("background-color", "rgba(16, 185, 129, 0.1)"),
                ("border-radius", "var(--radius-md)"),
            ]),
            loading_label: "Sending...".to_string(),
            loading_attribute: None,
            closes_modal: false,
        }
    }

    pub fn quick() -> Self {
        Self {
            selector: "#demo-quick-form".to_string(),
            send_delay_ms: 1200,
            notice_ms: 1200,
            notice_text: "Thanks! We will reach out shortly.".to_string(),
            notice_class: None,
            notice_styles: styles(&[
                ("margin-top", "0.75rem"),
                ("color", "var(--success)"),
            ]),
            loading_label: "Sending...".to_string(),
            loading_attribute: Some("data-loading".to_string()),
            closes_modal: true,
        }
    }
}

/// Keys a page may override on one form. Anything left out keeps the
/// value of the form it patches.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FormPatch {
    selector: Option<String>,
    send_delay_ms: Option<u32>,
    notice_ms: Option<u32>,
    notice_text: Option<String>,
    loading_label: Option<String>,
    closes_modal: Option<bool>,
}

impl FormPatch {
    fn apply(self, mut base: FormConfig) -> FormConfig {
        if let Some(selector) = self.selector {
            base.selector = selector;
        }
        if let Some(delay) = self.send_delay_ms {
            base.send_delay_ms = delay;
        }
        if let Some(notice_ms) = self.notice_ms {
            base.notice_ms = notice_ms;
        }
        if let Some(text) = self.notice_text {
            base.notice_text = text;
        }
        if let Some(label) = self.loading_label {
            base.loading_label = label;
        }
        if let Some(closes) = self.closes_modal {
            base.closes_modal = closes;
        }
        base
    }
}

fn demo_form<'de, D: Deserializer<'de>>(deserializer: D) -> Result<FormConfig, D::Error> {
    FormPatch::deserialize(deserializer).map(|patch| patch.apply(FormConfig::demo()))
}

fn quick_form<'de, D: Deserializer<'de>>(deserializer: D) -> Result<FormConfig, D::Error> {
    FormPatch::deserialize(deserializer).map(|patch| patch.apply(FormConfig::quick()))
}

fn styles(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub header: String,
    pub menu_toggle: String,
    pub menu_bars: String,
    pub main_nav: String,
    pub anchor_links: String,
    pub tab_buttons: String,
    pub tab_panels: String,
    pub tab_target_attribute: String,
    pub submit_button: String,
    pub reveal: String,
    pub hero_image: String,
    pub sticky_cta: String,
    pub contact_section: String,
    pub modal: String,
    pub modal_open: String,
    pub modal_close: String,
    pub slider: String,
    pub slides: String,
    pub dots: String,
    pub prev: String,
    pub next: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            header: ".header".to_string(),
            menu_toggle: ".mobile-menu-toggle".to_string(),
            menu_bars: "span".to_string(),
            main_nav: ".main-nav".to_string(),
            anchor_links: "a[href^=\"#\"]".to_string(),
            tab_buttons: ".tab-btn".to_string(),
            tab_panels: ".tab-content".to_string(),
            tab_target_attribute: "data-tab".to_string(),
            submit_button: "button[type=\"submit\"]".to_string(),
            reveal: ".feature, .feature-card, .advanced-feature, .impact-item, .contact-card"
                .to_string(),
            hero_image: ".hero-image img".to_string(),
            sticky_cta: ".sticky-cta".to_string(),
            contact_section: "#contact".to_string(),
            modal: "#demo-modal".to_string(),
            modal_open: ".open-demo".to_string(),
            modal_close: "[data-close=\"modal\"], .modal-backdrop".to_string(),
            slider: ".testimonial-slider".to_string(),
            slides: ".slide".to_string(),
            dots: ".dot".to_string(),
            prev: ".prev".to_string(),
            next: ".next".to_string(),
        }
    }
}
