use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, FormData, HtmlElement,
    HtmlFormElement, KeyboardEvent, NodeList, ScrollBehavior, ScrollToOptions, Window,
};

use crate::dom::{Dom, DomEvent, EventKind, Handler, ListenerId, NodeId, Rect, Target};
use crate::error::UiError;
use crate::web::registry::Registry;

type Nodes = Rc<RefCell<Registry<Element>>>;

struct Registered {
    target: EventTarget,
    kind: EventKind,
    closure: Closure<dyn FnMut(Event)>,
}

/// [`Dom`] over the live browser document. Elements are handed out as
/// indices into a registry so behaviors never hold JS references.
pub struct WebDom {
    window: Window,
    document: Document,
    nodes: Nodes,
    listeners: RefCell<HashMap<u64, Registered>>,
    next_listener: Cell<u64>,
}

fn register(nodes: &Nodes, element: Element) -> NodeId {
    NodeId(nodes.borrow_mut().intern(element).0)
}

impl WebDom {
    pub fn new() -> Result<Self, UiError> {
        let window = web_sys::window().ok_or(UiError::NoWindow)?;
        let document = window.document().ok_or(UiError::NoDocument)?;
        Ok(Self {
            window,
            document,
            nodes: Rc::new(RefCell::new(Registry::default())),
            listeners: RefCell::new(HashMap::new()),
            next_listener: Cell::new(1),
        })
    }

    fn element(&self, node: NodeId) -> Option<Element> {
        self.nodes.borrow().get(node.0)
    }

    fn html(&self, node: NodeId) -> Option<HtmlElement> {
        self.element(node)?.dyn_into::<HtmlElement>().ok()
    }

    fn collect(&self, list: Option<NodeList>) -> Vec<NodeId> {
        let Some(list) = list else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| register(&self.nodes, element))
            .collect()
    }

    fn event_target(&self, target: Target) -> Option<EventTarget> {
        match target {
            Target::Window => Some(self.window.clone().into()),
            Target::Document => Some(self.document.clone().into()),
            Target::Node(node) => self.element(node).map(Into::into),
        }
    }
}

impl Dom for WebDom {
    fn query(&self, selector: &str) -> Option<NodeId> {
        let element = self.document.query_selector(selector).ok().flatten()?;
        Some(register(&self.nodes, element))
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        self.collect(self.document.query_selector_all(selector).ok())
    }

    fn query_in(&self, root: NodeId, selector: &str) -> Option<NodeId> {
        let element = self.element(root)?.query_selector(selector).ok().flatten()?;
        Some(register(&self.nodes, element))
    }

    fn query_all_in(&self, root: NodeId, selector: &str) -> Vec<NodeId> {
        let list = self
            .element(root)
            .and_then(|root| root.query_selector_all(selector).ok());
        self.collect(list)
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let element = self.document.get_element_by_id(id)?;
        Some(register(&self.nodes, element))
    }

    fn matches(&self, node: NodeId, selector: &str) -> bool {
        self.element(node)
            .and_then(|e| e.matches(selector).ok())
            .unwrap_or(false)
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .map(|e| e.class_list().contains(class))
            .unwrap_or(false)
    }

    fn set_class(&self, node: NodeId, class: &str, on: bool) {
        if let Some(element) = self.element(node) {
            let _ = element.class_list().toggle_with_force(class, on);
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node)?.get_attribute(name)
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.element(node) {
            let _ = element.set_attribute(name, value);
        }
    }

    fn set_style(&self, node: NodeId, property: &str, value: &str) {
        if let Some(element) = self.html(node) {
            let _ = element.style().set_property(property, value);
        }
    }

    fn text(&self, node: NodeId) -> String {
        self.element(node)
            .and_then(|e| e.text_content())
            .unwrap_or_default()
    }

    fn set_text(&self, node: NodeId, text: &str) {
        if let Some(element) = self.element(node) {
            element.set_text_content(Some(text));
        }
    }

    fn set_disabled(&self, node: NodeId, disabled: bool) {
        if let Some(element) = self.element(node) {
            let _ = if disabled {
                element.set_attribute("disabled", "")
            } else {
                element.remove_attribute("disabled")
            };
        }
    }

    fn bounding_rect(&self, node: NodeId) -> Rect {
        self.element(node)
            .map(|e| {
                let rect = e.get_bounding_client_rect();
                Rect {
                    top: rect.top(),
                    bottom: rect.bottom(),
                    height: rect.height(),
                }
            })
            .unwrap_or_default()
    }

    fn offset_height(&self, node: NodeId) -> f64 {
        self.html(node)
            .map(|e| f64::from(e.offset_height()))
            .unwrap_or(0.0)
    }

    fn form_entries(&self, form: NodeId) -> Vec<(String, String)> {
        let Some(form) = self
            .element(form)
            .and_then(|e| e.dyn_into::<HtmlFormElement>().ok())
        else {
            return Vec::new();
        };
        let Ok(data) = FormData::new_with_form(&form) else {
            return Vec::new();
        };
        data.entries()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let pair = entry.dyn_into::<web_sys::js_sys::Array>().ok()?;
                let key = pair.get(0).as_string()?;
                // File inputs have no string value; they are never part of
                // the demo forms.
                let value = pair.get(1).as_string()?;
                Some((key, value))
            })
            .collect()
    }

    fn reset_form(&self, form: NodeId) {
        if let Some(form) = self
            .element(form)
            .and_then(|e| e.dyn_into::<HtmlFormElement>().ok())
        {
            form.reset();
        }
    }

    fn create_element(&self, tag: &str) -> Option<NodeId> {
        let element = self.document.create_element(tag).ok()?;
        Some(register(&self.nodes, element))
    }

    fn append_child(&self, parent: NodeId, child: NodeId) {
        if let (Some(parent), Some(child)) = (self.element(parent), self.element(child)) {
            let _ = parent.append_child(&child);
        }
    }

    fn remove(&self, node: NodeId) {
        let released = self.nodes.borrow_mut().release(node.0);
        if let Some(element) = released {
            element.remove();
        }
    }

    fn set_body_style(&self, property: &str, value: &str) {
        if let Some(body) = self.document.body() {
            let _ = body.style().set_property(property, value);
        }
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(0.0)
    }

    fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .filter(|h| *h > 0.0)
            .or_else(|| {
                self.document
                    .document_element()
                    .map(|e| f64::from(e.client_height()))
            })
            .unwrap_or(0.0)
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.window
            .match_media("(prefers-reduced-motion: reduce)")
            .ok()
            .flatten()
            .map(|query| query.matches())
            .unwrap_or(false)
    }

    fn smooth_scroll_to(&self, top: f64) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn listen(
        &self,
        target: Target,
        kind: EventKind,
        passive: bool,
        handler: Handler,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);

        let Some(event_target) = self.event_target(target) else {
            return id;
        };

        let nodes = self.nodes.clone();
        let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let target = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .map(|element| nodes.borrow_mut().intern(element));
            let key = event.dyn_ref::<KeyboardEvent>().map(|k| k.key());
            let dom_event = DomEvent::new(target.map(|(id, _)| NodeId(id))).with_key(key);
            handler(&dom_event);
            if dom_event.is_default_prevented() {
                event.prevent_default();
            }
            // Targets are only valid for the duration of the handler.
            if let Some((id, true)) = target {
                nodes.borrow_mut().release(id);
            }
        });

        let registered = if passive {
            let options = AddEventListenerOptions::new();
            options.set_passive(true);
            event_target.add_event_listener_with_callback_and_add_event_listener_options(
                kind.as_str(),
                closure.as_ref().unchecked_ref(),
                &options,
            )
        } else {
            event_target
                .add_event_listener_with_callback(kind.as_str(), closure.as_ref().unchecked_ref())
        };
        if let Err(err) = registered {
            tracing::warn!(event = kind.as_str(), error = ?err, "Could not add listener");
            return id;
        }

        self.listeners.borrow_mut().insert(
            id.0,
            Registered {
                target: event_target,
                kind,
                closure,
            },
        );
        id
    }

    fn unlisten(&self, id: ListenerId) {
        let Some(registered) = self.listeners.borrow_mut().remove(&id.0) else {
            return;
        };
        let _ = registered.target.remove_event_listener_with_callback(
            registered.kind.as_str(),
            registered.closure.as_ref().unchecked_ref(),
        );
    }
}
