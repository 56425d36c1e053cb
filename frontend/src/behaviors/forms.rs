use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::{debug, info};

use crate::behaviors::modal::DemoModal;
use crate::config::FormConfig;
use crate::dom::{DomEvent, EventKind, NodeId, Target};
use crate::page::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    Sending,
}

/// A demo-request form whose submission is simulated: nothing leaves the
/// page, the button just goes through a sending state and a thank-you
/// note shows up.
pub struct DemoForm {
    page: Rc<Page>,
    form: NodeId,
    submit: Option<NodeId>,
    settings: FormConfig,
    phase: Cell<FormPhase>,
    modal: Option<Rc<DemoModal>>,
}

impl DemoForm {
    pub fn attach(
        page: &Rc<Page>,
        settings: FormConfig,
        modal: Option<Rc<DemoModal>>,
    ) -> Option<Rc<Self>> {
        let Some(form) = page.dom.query(&settings.selector) else {
            debug!(form = %settings.selector, "Form not on page");
            return None;
        };
        let this = Rc::new(Self {
            page: page.clone(),
            form,
            submit: page.dom.query_in(form, &page.config.selectors.submit_button),
            settings,
            phase: Cell::new(FormPhase::Idle),
            modal,
        });
        let handler = this.clone();
        page.listen(Target::Node(form), EventKind::Submit, move |event| {
            handler.submit(event)
        });
        Some(this)
    }

    pub fn phase(&self) -> FormPhase {
        self.phase.get()
    }

    pub fn submit(self: &Rc<Self>, event: &DomEvent) {
        event.prevent_default();
        if self.phase.get() == FormPhase::Sending {
            debug!(form = %self.settings.selector, "Submit ignored, already sending");
            return;
        }

        let dom = &self.page.dom;
        let fields: BTreeMap<String, String> = dom.form_entries(self.form).into_iter().collect();
        info!(
            form = %self.settings.selector,
            fields = fields.len(),
            "Submitting demo request"
        );

        let original_label = self.submit.map(|button| {
            let original = dom.text(button);
            let loading = self
                .settings
                .loading_attribute
                .as_deref()
                .and_then(|attr| dom.attribute(button, attr))
                .unwrap_or_else(|| self.settings.loading_label.clone());
            dom.set_disabled(button, true);
            dom.set_text(button, &loading);
            original
        });
        self.phase.set(FormPhase::Sending);

        let this = self.clone();
        self.page.scheduler.set_timeout(
            self.settings.send_delay_ms,
            Box::new(move || this.complete(original_label, fields)),
        );
    }

    fn complete(
        self: &Rc<Self>,
        original_label: Option<String>,
        fields: BTreeMap<String, String>,
    ) {
        let payload = serde_json::to_string(&fields).unwrap_or_default();
        info!("Form submitted: {}", payload);

        let dom = &self.page.dom;
        if let (Some(button), Some(label)) = (self.submit, original_label) {
            dom.set_disabled(button, false);
            dom.set_text(button, &label);
        }
        dom.reset_form(self.form);
        self.phase.set(FormPhase::Idle);

        let Some(notice) = self.show_notice() else {
            return;
        };
        let this = self.clone();
        self.page.scheduler.set_timeout(
            self.settings.notice_ms,
            Box::new(move || {
                if this.settings.closes_modal {
                    if let Some(modal) = &this.modal {
                        modal.close();
                    }
                }
                this.page.dom.remove(notice);
            }),
        );
    }

    fn show_notice(&self) -> Option<NodeId> {
        let dom = &self.page.dom;
        let notice = dom.create_element("div")?;
        if let Some(class) = &self.settings.notice_class {
            dom.set_class(notice, class, true);
        }
        dom.set_text(notice, &self.settings.notice_text);
        for (property, value) in &self.settings.notice_styles {
            dom.set_style(notice, property, value);
        }
        dom.append_child(self.form, notice);
        Some(notice)
    }
}
