use std::cell::Cell;
use std::rc::Rc;

/// Opaque handle to an element owned by a [`Dom`] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Viewport-relative box of an element, as `getBoundingClientRect` reports it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub bottom: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            bottom: top + height,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Scroll,
    Resize,
    Click,
    Submit,
    KeyDown,
    MouseEnter,
    MouseLeave,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Scroll => "scroll",
            EventKind::Resize => "resize",
            EventKind::Click => "click",
            EventKind::Submit => "submit",
            EventKind::KeyDown => "keydown",
            EventKind::MouseEnter => "mouseenter",
            EventKind::MouseLeave => "mouseleave",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Window,
    Document,
    Node(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// What a handler gets to see of a dispatched event.
#[derive(Debug, Default)]
pub struct DomEvent {
    pub target: Option<NodeId>,
    pub key: Option<String>,
    default_prevented: Cell<bool>,
}

impl DomEvent {
    pub fn new(target: Option<NodeId>) -> Self {
        Self {
            target,
            ..Default::default()
        }
    }

    pub fn with_key(mut self, key: Option<String>) -> Self {
        self.key = key;
        self
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

pub type Handler = Rc<dyn Fn(&DomEvent)>;

/// The slice of document and window the page behaviors touch.
///
/// Lookups return `None`/empty when nothing matches; mutations on a
/// stale or foreign handle are ignored.
pub trait Dom {
    fn query(&self, selector: &str) -> Option<NodeId>;
    fn query_all(&self, selector: &str) -> Vec<NodeId>;
    fn query_in(&self, root: NodeId, selector: &str) -> Option<NodeId>;
    fn query_all_in(&self, root: NodeId, selector: &str) -> Vec<NodeId>;
    fn element_by_id(&self, id: &str) -> Option<NodeId>;
    fn matches(&self, node: NodeId, selector: &str) -> bool;

    fn has_class(&self, node: NodeId, class: &str) -> bool;
    fn set_class(&self, node: NodeId, class: &str, on: bool);
    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;
    fn set_attribute(&self, node: NodeId, name: &str, value: &str);
    fn set_style(&self, node: NodeId, property: &str, value: &str);
    fn text(&self, node: NodeId) -> String;
    fn set_text(&self, node: NodeId, text: &str);
    fn set_disabled(&self, node: NodeId, disabled: bool);
    fn bounding_rect(&self, node: NodeId) -> Rect;
    fn offset_height(&self, node: NodeId) -> f64;

    fn form_entries(&self, form: NodeId) -> Vec<(String, String)>;
    fn reset_form(&self, form: NodeId);
    fn create_element(&self, tag: &str) -> Option<NodeId>;
    fn append_child(&self, parent: NodeId, child: NodeId);
    fn remove(&self, node: NodeId);
    fn set_body_style(&self, property: &str, value: &str);

    fn scroll_y(&self) -> f64;
    fn viewport_width(&self) -> f64;
    fn viewport_height(&self) -> f64;
    fn prefers_reduced_motion(&self) -> bool;
    fn smooth_scroll_to(&self, top: f64);

    fn listen(&self, target: Target, kind: EventKind, passive: bool, handler: Handler)
        -> ListenerId;
    fn unlisten(&self, id: ListenerId);
}
