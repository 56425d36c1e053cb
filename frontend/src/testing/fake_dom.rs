use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use crate::dom::{Dom, DomEvent, EventKind, Handler, ListenerId, NodeId, Rect, Target};

const BODY: NodeId = NodeId(0);

#[derive(Debug, Default)]
struct FakeNode {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    text: String,
    value: String,
    disabled: bool,
    rect: Rect,
    offset_height: f64,
}

struct FakeWindow {
    scroll_y: f64,
    width: f64,
    height: f64,
    reduced_motion: bool,
    body_styles: BTreeMap<String, String>,
    scroll_requests: Vec<f64>,
}

struct Listener {
    id: ListenerId,
    target: Target,
    kind: EventKind,
    passive: bool,
    handler: Handler,
}

/// In-memory document with just enough behavior for the page
/// controller: a selector subset, bubbling clicks, a scriptable window.
pub struct FakeDom {
    nodes: RefCell<Vec<FakeNode>>,
    window: RefCell<FakeWindow>,
    listeners: RefCell<Vec<Listener>>,
    next_listener: Cell<u64>,
}

impl FakeDom {
    pub fn new() -> Self {
        let body = FakeNode {
            tag: "body".to_string(),
            ..Default::default()
        };
        Self {
            nodes: RefCell::new(vec![body]),
            window: RefCell::new(FakeWindow {
                scroll_y: 0.0,
                width: 375.0,
                height: 800.0,
                reduced_motion: false,
                body_styles: BTreeMap::new(),
                scroll_requests: Vec::new(),
            }),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(1),
        }
    }

    pub fn body(&self) -> NodeId {
        BODY
    }

    /// Appends `<tag>` under `parent`. `class` is split on whitespace,
    /// `value` also seeds the live form value.
    pub fn add(&self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let mut node = FakeNode {
            tag: tag.to_ascii_lowercase(),
            parent: Some(parent),
            ..Default::default()
        };
        for (name, value) in attrs {
            match *name {
                "class" => node.classes = value.split_whitespace().map(String::from).collect(),
                "value" => {
                    node.value = value.to_string();
                    node.attrs.insert(name.to_string(), value.to_string());
                }
                _ => {
                    node.attrs.insert(name.to_string(), value.to_string());
                }
            }
        }
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len());
        nodes.push(node);
        nodes[parent.0].children.push(id);
        id
    }

    pub fn add_text(
        &self,
        parent: NodeId,
        tag: &str,
        attrs: &[(&str, &str)],
        text: &str,
    ) -> NodeId {
        let id = self.add(parent, tag, attrs);
        self.nodes.borrow_mut()[id.0].text = text.to_string();
        id
    }

    pub fn set_rect(&self, node: NodeId, top: f64, height: f64) {
        self.nodes.borrow_mut()[node.0].rect = Rect::new(top, height);
    }

    pub fn set_offset_height(&self, node: NodeId, height: f64) {
        self.nodes.borrow_mut()[node.0].offset_height = height;
    }

    pub fn set_value(&self, node: NodeId, value: &str) {
        self.nodes.borrow_mut()[node.0].value = value.to_string();
    }

    pub fn set_viewport(&self, width: f64, height: f64) {
        let mut window = self.window.borrow_mut();
        window.width = width;
        window.height = height;
    }

    pub fn set_reduced_motion(&self, reduced: bool) {
        self.window.borrow_mut().reduced_motion = reduced;
    }

    // -- inspection --

    pub fn value(&self, node: NodeId) -> String {
        self.nodes.borrow()[node.0].value.clone()
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.nodes.borrow()[node.0].styles.get(property).cloned()
    }

    pub fn body_style(&self, property: &str) -> Option<String> {
        self.window.borrow().body_styles.get(property).cloned()
    }

    pub fn is_disabled(&self, node: NodeId) -> bool {
        self.nodes.borrow()[node.0].disabled
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes.borrow()[node.0].children.clone()
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        let nodes = self.nodes.borrow();
        let mut current = node;
        loop {
            if current == BODY {
                return true;
            }
            match nodes[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    pub fn scroll_requests(&self) -> Vec<f64> {
        self.window.borrow().scroll_requests.clone()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn passive_listeners(&self, kind: EventKind) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|l| l.kind == kind && l.passive)
            .count()
    }

    // -- event simulation --

    pub fn scroll_to(&self, y: f64) {
        self.window.borrow_mut().scroll_y = y;
        self.dispatch(Target::Window, EventKind::Scroll, &DomEvent::new(None));
    }

    pub fn resize(&self, width: f64, height: f64) {
        self.set_viewport(width, height);
        self.dispatch(Target::Window, EventKind::Resize, &DomEvent::new(None));
    }

    /// Bubbles from `node` up to the document.
    pub fn click(&self, node: NodeId) -> DomEvent {
        let event = DomEvent::new(Some(node));
        self.bubble(node, EventKind::Click, &event);
        event
    }

    pub fn submit(&self, form: NodeId) -> DomEvent {
        let event = DomEvent::new(Some(form));
        self.bubble(form, EventKind::Submit, &event);
        event
    }

    pub fn key_down(&self, key: &str) -> DomEvent {
        let event = DomEvent::new(None).with_key(Some(key.to_string()));
        self.dispatch(Target::Document, EventKind::KeyDown, &event);
        event
    }

    pub fn mouse_enter(&self, node: NodeId) {
        self.dispatch(Target::Node(node), EventKind::MouseEnter, &DomEvent::new(Some(node)));
    }

    pub fn mouse_leave(&self, node: NodeId) {
        self.dispatch(Target::Node(node), EventKind::MouseLeave, &DomEvent::new(Some(node)));
    }

    fn bubble(&self, node: NodeId, kind: EventKind, event: &DomEvent) {
        let mut current = Some(node);
        while let Some(id) = current {
            self.dispatch(Target::Node(id), kind, event);
            current = self.nodes.borrow()[id.0].parent;
        }
        self.dispatch(Target::Document, kind, event);
    }

    fn dispatch(&self, target: Target, kind: EventKind, event: &DomEvent) {
        // Collected first so handlers may touch the listener list.
        let handlers: Vec<Handler> = self
            .listeners
            .borrow()
            .iter()
            .filter(|l| l.target == target && l.kind == kind)
            .map(|l| l.handler.clone())
            .collect();
        for handler in handlers {
            handler(event);
        }
    }

    // -- selector engine --

    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = nodes[root.0].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    fn select(&self, root: NodeId, selector: &str) -> Vec<NodeId> {
        let groups = parse_selector(selector);
        if groups.is_empty() {
            return Vec::new();
        }
        self.descendants(root)
            .into_iter()
            .filter(|id| self.matches_groups(*id, &groups))
            .collect()
    }

    fn matches_groups(&self, node: NodeId, groups: &[Vec<Compound>]) -> bool {
        let nodes = self.nodes.borrow();
        groups.iter().any(|chain| matches_chain(&nodes, node, chain))
    }
}

impl Default for FakeDom {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, AttrOp)>,
}

#[derive(Debug)]
enum AttrOp {
    Exists,
    Equals(String),
    Prefix(String),
}

fn is_ident(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn parse_selector(selector: &str) -> Vec<Vec<Compound>> {
    selector
        .split(',')
        .filter_map(|group| {
            let chain: Option<Vec<Compound>> =
                group.split_whitespace().map(parse_compound).collect();
            chain.filter(|c| !c.is_empty())
        })
        .collect()
}

fn parse_compound(raw: &str) -> Option<Compound> {
    let chars: Vec<char> = raw.chars().collect();
    let mut compound = Compound::default();
    let mut i = 0;

    let take_ident = |i: &mut usize| -> String {
        let start = *i;
        while *i < chars.len() && is_ident(chars[*i]) {
            *i += 1;
        }
        chars[start..*i].iter().collect()
    };

    if i < chars.len() && is_ident(chars[i]) {
        compound.tag = Some(take_ident(&mut i).to_ascii_lowercase());
    }
    while i < chars.len() {
        match chars[i] {
            '.' => {
                i += 1;
                compound.classes.push(take_ident(&mut i));
            }
            '#' => {
                i += 1;
                compound.id = Some(take_ident(&mut i));
            }
            '[' => {
                let close = chars[i..].iter().position(|c| *c == ']')? + i;
                let inner: String = chars[i + 1..close].iter().collect();
                compound.attrs.push(parse_attr(&inner));
                i = close + 1;
            }
            _ => return None,
        }
    }
    Some(compound)
}

fn parse_attr(inner: &str) -> (String, AttrOp) {
    let unquote = |v: &str| v.trim().trim_matches(|c| c == '"' || c == '\'').to_string();
    if let Some((name, value)) = inner.split_once("^=") {
        (name.trim().to_string(), AttrOp::Prefix(unquote(value)))
    } else if let Some((name, value)) = inner.split_once('=') {
        (name.trim().to_string(), AttrOp::Equals(unquote(value)))
    } else {
        (inner.trim().to_string(), AttrOp::Exists)
    }
}

fn matches_compound(node: &FakeNode, compound: &Compound) -> bool {
    if let Some(tag) = &compound.tag {
        if *tag != node.tag {
            return false;
        }
    }
    if let Some(id) = &compound.id {
        if node.attrs.get("id") != Some(id) {
            return false;
        }
    }
    if !compound.classes.iter().all(|c| node.classes.contains(c)) {
        return false;
    }
    compound.attrs.iter().all(|(name, op)| {
        let actual = if name == "class" {
            (!node.classes.is_empty()).then(|| node.classes.join(" "))
        } else {
            node.attrs.get(name).cloned()
        };
        match (op, actual) {
            (_, None) => false,
            (AttrOp::Exists, Some(_)) => true,
            (AttrOp::Equals(v), Some(a)) => a == *v,
            (AttrOp::Prefix(v), Some(a)) => a.starts_with(v.as_str()),
        }
    })
}

fn matches_chain(nodes: &[FakeNode], node: NodeId, chain: &[Compound]) -> bool {
    let Some((last, ancestors)) = chain.split_last() else {
        return false;
    };
    if node == BODY || !matches_compound(&nodes[node.0], last) {
        return false;
    }
    let mut current = nodes[node.0].parent;
    for compound in ancestors.iter().rev() {
        loop {
            match current {
                Some(id) if id != BODY => {
                    current = nodes[id.0].parent;
                    if matches_compound(&nodes[id.0], compound) {
                        break;
                    }
                }
                _ => return false,
            }
        }
    }
    true
}

impl Dom for FakeDom {
    fn query(&self, selector: &str) -> Option<NodeId> {
        self.select(BODY, selector).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        self.select(BODY, selector)
    }

    fn query_in(&self, root: NodeId, selector: &str) -> Option<NodeId> {
        self.select(root, selector).into_iter().next()
    }

    fn query_all_in(&self, root: NodeId, selector: &str) -> Vec<NodeId> {
        self.select(root, selector)
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let nodes = self.nodes.borrow();
        self.descendants(BODY)
            .into_iter()
            .find(|n| nodes[n.0].attrs.get("id").map(String::as_str) == Some(id))
    }

    fn matches(&self, node: NodeId, selector: &str) -> bool {
        self.matches_groups(node, &parse_selector(selector))
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes.borrow()[node.0].classes.iter().any(|c| c == class)
    }

    fn set_class(&self, node: NodeId, class: &str, on: bool) {
        let mut nodes = self.nodes.borrow_mut();
        let classes = &mut nodes[node.0].classes;
        let present = classes.iter().any(|c| c == class);
        if on && !present {
            classes.push(class.to_string());
        } else if !on {
            classes.retain(|c| c != class);
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.nodes.borrow()[node.0].attrs.get(name).cloned()
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        self.nodes.borrow_mut()[node.0]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    fn set_style(&self, node: NodeId, property: &str, value: &str) {
        self.nodes.borrow_mut()[node.0]
            .styles
            .insert(property.to_string(), value.to_string());
    }

    fn text(&self, node: NodeId) -> String {
        self.nodes.borrow()[node.0].text.clone()
    }

    fn set_text(&self, node: NodeId, text: &str) {
        self.nodes.borrow_mut()[node.0].text = text.to_string();
    }

    fn set_disabled(&self, node: NodeId, disabled: bool) {
        self.nodes.borrow_mut()[node.0].disabled = disabled;
    }

    fn bounding_rect(&self, node: NodeId) -> Rect {
        self.nodes.borrow()[node.0].rect
    }

    fn offset_height(&self, node: NodeId) -> f64 {
        self.nodes.borrow()[node.0].offset_height
    }

    fn form_entries(&self, form: NodeId) -> Vec<(String, String)> {
        let nodes = self.nodes.borrow();
        self.descendants(form)
            .into_iter()
            .filter(|id| matches!(nodes[id.0].tag.as_str(), "input" | "textarea" | "select"))
            .filter_map(|id| {
                let node = &nodes[id.0];
                node.attrs
                    .get("name")
                    .map(|name| (name.clone(), node.value.clone()))
            })
            .collect()
    }

    fn reset_form(&self, form: NodeId) {
        let fields = self.descendants(form);
        let mut nodes = self.nodes.borrow_mut();
        for id in fields {
            let node = &mut nodes[id.0];
            if matches!(node.tag.as_str(), "input" | "textarea" | "select") {
                node.value = node.attrs.get("value").cloned().unwrap_or_default();
            }
        }
    }

    fn create_element(&self, tag: &str) -> Option<NodeId> {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len());
        nodes.push(FakeNode {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        });
        Some(id)
    }

    fn append_child(&self, parent: NodeId, child: NodeId) {
        self.remove(child);
        let mut nodes = self.nodes.borrow_mut();
        nodes[child.0].parent = Some(parent);
        nodes[parent.0].children.push(child);
    }

    fn remove(&self, node: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(parent) = nodes[node.0].parent.take() {
            nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    fn set_body_style(&self, property: &str, value: &str) {
        let mut window = self.window.borrow_mut();
        if value.is_empty() {
            window.body_styles.remove(property);
        } else {
            window
                .body_styles
                .insert(property.to_string(), value.to_string());
        }
    }

    fn scroll_y(&self) -> f64 {
        self.window.borrow().scroll_y
    }

    fn viewport_width(&self) -> f64 {
        self.window.borrow().width
    }

    fn viewport_height(&self) -> f64 {
        self.window.borrow().height
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.window.borrow().reduced_motion
    }

    fn smooth_scroll_to(&self, top: f64) {
        self.window.borrow_mut().scroll_requests.push(top);
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
        self.listeners.borrow_mut().push(Listener {
            id,
            target,
            kind,
            passive,
            handler,
        });
        id
    }

    fn unlisten(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|l| l.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn selector_subset() {
        let dom = FakeDom::new();
        let hero = dom.add(dom.body(), "div", &[("class", "hero-image")]);
        let img = dom.add(hero, "img", &[]);
        let loose = dom.add(dom.body(), "img", &[]);
        let link = dom.add(dom.body(), "a", &[("href", "#contact")]);
        let other = dom.add(dom.body(), "a", &[("href", "/pricing")]);
        let close = dom.add(dom.body(), "button", &[("data-close", "modal")]);

        assert_eq!(dom.query_all(".hero-image img"), vec![img]);
        assert_eq!(dom.query_all("img"), vec![img, loose]);
        assert_eq!(dom.query_all("a[href^=\"#\"]"), vec![link]);
        assert!(!dom.matches(other, "a[href^='#']"));
        assert!(dom.matches(close, "[data-close=\"modal\"], .modal-backdrop"));
        assert_eq!(dom.query_all("#nope, .missing"), Vec::<NodeId>::new());
    }

    #[test]
    fn removed_nodes_leave_queries() {
        let dom = FakeDom::new();
        let note = dom.add(dom.body(), "div", &[("class", "note")]);
        dom.remove(note);
        assert!(!dom.is_attached(note));
        assert_eq!(dom.query(".note"), None);
    }
}
