#![forbid(unsafe_code)]

//! In-memory [`Dom`] used by native tests and host-less harnesses.
//!
//! Records every alert, scroll request and injected stylesheet so callers can
//! assert on side effects the browser would otherwise swallow.

use std::collections::BTreeMap;

use crate::dom::{Dom, NodeId, Rect, ScrollOptions, Selector};

#[derive(Debug, Clone)]
struct MemoryNode {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    rect: Rect,
    connected: bool,
    removed: bool,
}

impl MemoryNode {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            style: BTreeMap::new(),
            parent: None,
            children: Vec::new(),
            rect: Rect::default(),
            connected: false,
            removed: false,
        }
    }
}

/// A small document tree with a `<body>` root.
#[derive(Debug, Clone)]
pub struct MemoryDom {
    nodes: Vec<MemoryNode>,
    alerts: Vec<String>,
    scrolls: Vec<(NodeId, ScrollOptions)>,
    stylesheets: Vec<String>,
    viewport_width: f64,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// Empty document, 1280px wide.
    #[must_use]
    pub fn new() -> Self {
        let mut body = MemoryNode::new("body");
        body.connected = true;
        Self {
            nodes: vec![body],
            alerts: Vec::new(),
            scrolls: Vec::new(),
            stylesheets: Vec::new(),
            viewport_width: 1280.0,
        }
    }

    /// The `<body>` element.
    #[must_use]
    pub const fn body(&self) -> NodeId {
        NodeId::new(0)
    }

    /// Append a new element under `parent` and return its handle.
    pub fn add(&mut self, parent: NodeId, tag: &str, id: Option<&str>, classes: &[&str]) -> NodeId {
        let node = self.alloc(tag);
        if let Some(id) = id {
            self.set_attribute(node, "id", id);
        }
        for class in classes {
            self.add_class(node, class);
        }
        self.append_child(parent, node);
        node
    }

    /// Append an anchor with the given `href`.
    pub fn add_link(&mut self, parent: NodeId, href: &str) -> NodeId {
        let link = self.add(parent, "a", None, &[]);
        self.set_attribute(link, "href", href);
        link
    }

    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        if let Some(entry) = self.live_mut(node) {
            entry.rect = rect;
        }
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = width;
    }

    #[must_use]
    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    #[must_use]
    pub fn scrolls(&self) -> &[(NodeId, ScrollOptions)] {
        &self.scrolls
    }

    #[must_use]
    pub fn stylesheets(&self) -> &[String] {
        &self.stylesheets
    }

    /// Attached children of `node`, in order.
    #[must_use]
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node.get() as usize)
            .map(|entry| entry.children.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.live(node).map(|entry| entry.tag.as_str())
    }

    /// Number of handles ever minted, removed ones included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn alloc(&mut self, tag: &str) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(MemoryNode::new(tag));
        id
    }

    fn live(&self, node: NodeId) -> Option<&MemoryNode> {
        self.nodes
            .get(node.get() as usize)
            .filter(|entry| !entry.removed)
    }

    fn live_mut(&mut self, node: NodeId) -> Option<&mut MemoryNode> {
        self.nodes
            .get_mut(node.get() as usize)
            .filter(|entry| !entry.removed)
    }

    fn set_connected(&mut self, node: NodeId, connected: bool) {
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if let Some(entry) = self.nodes.get_mut(current.get() as usize) {
                entry.connected = connected;
                stack.extend(entry.children.iter().copied());
            }
        }
    }

    fn detach(&mut self, node: NodeId) {
        let parent = self
            .nodes
            .get_mut(node.get() as usize)
            .and_then(|entry| entry.parent.take());
        if let Some(parent) = parent
            && let Some(entry) = self.nodes.get_mut(parent.get() as usize)
        {
            entry.children.retain(|child| *child != node);
        }
    }

    /// Connected descendants of `scope` (exclusive), depth-first document order.
    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self
            .live(scope)
            .map(|entry| entry.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(current) = stack.pop() {
            let Some(entry) = self.live(current) else {
                continue;
            };
            out.push(current);
            stack.extend(entry.children.iter().rev().copied());
        }
        out
    }

    fn matches(&self, node: NodeId, selector: Selector) -> bool {
        let Some(entry) = self.live(node) else {
            return false;
        };
        match selector {
            Selector::Class(class) => entry.classes.iter().any(|c| c == class),
            Selector::AnyClass(classes) => entry
                .classes
                .iter()
                .any(|c| classes.iter().any(|wanted| c == wanted)),
            Selector::InPageAnchors => {
                entry.tag == "a"
                    && entry
                        .attributes
                        .get("href")
                        .is_some_and(|href| href.starts_with('#'))
            }
        }
    }
}

impl Dom for MemoryDom {
    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let body = self.body();
        std::iter::once(body)
            .chain(self.descendants(body))
            .find(|node| {
                self.live(*node)
                    .and_then(|entry| entry.attributes.get("id"))
                    .is_some_and(|value| value == id)
            })
    }

    fn query_all(&self, selector: Selector) -> Vec<NodeId> {
        self.descendants(self.body())
            .into_iter()
            .filter(|node| self.matches(*node, selector))
            .collect()
    }

    fn query_within(&self, scope: NodeId, class: &str) -> Option<NodeId> {
        self.descendants(scope).into_iter().find(|node| {
            self.live(*node)
                .is_some_and(|entry| entry.classes.iter().any(|c| c == class))
        })
    }

    fn closest(&self, node: NodeId, class: &str) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(candidate) = current {
            let entry = self.live(candidate)?;
            if entry.classes.iter().any(|c| c == class) {
                return Some(candidate);
            }
            current = entry.parent;
        }
        None
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.live(node)?.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(entry) = self.live_mut(node) {
            entry.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.live(node)?.style.get(property).cloned()
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(entry) = self.live_mut(node) {
            entry.style.insert(property.to_string(), value.to_string());
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.live(node)
            .is_some_and(|entry| entry.classes.iter().any(|c| c == class))
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(entry) = self.live_mut(node)
            && !entry.classes.iter().any(|c| c == class)
        {
            entry.classes.push(class.to_string());
        }
    }

    fn bounding_rect(&self, node: NodeId) -> Rect {
        self.live(node).map(|entry| entry.rect).unwrap_or_default()
    }

    fn create_element(&mut self, tag: &str) -> Option<NodeId> {
        Some(self.alloc(tag))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.live(parent).is_none() || self.live(child).is_none() {
            return;
        }
        self.detach(child);
        let parent_connected = self.nodes[parent.get() as usize].connected;
        self.nodes[parent.get() as usize].children.push(child);
        self.nodes[child.get() as usize].parent = Some(parent);
        self.set_connected(child, parent_connected);
    }

    fn remove(&mut self, node: NodeId) {
        if self.live(node).is_none() || node == self.body() {
            return;
        }
        self.detach(node);
        self.set_connected(node, false);
        if let Some(entry) = self.nodes.get_mut(node.get() as usize) {
            entry.removed = true;
        }
    }

    fn is_connected(&self, node: NodeId) -> bool {
        self.live(node).is_some_and(|entry| entry.connected)
    }

    fn scroll_into_view(&mut self, node: NodeId, options: ScrollOptions) {
        if self.live(node).is_some() {
            self.scrolls.push((node, options));
        }
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    fn inject_stylesheet(&mut self, css: &str) {
        self.stylesheets.push(css.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_all_returns_document_order() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let outer = dom.add(body, "section", None, &["card"]);
        let inner = dom.add(outer, "div", None, &["card"]);
        let sibling = dom.add(body, "div", None, &["card"]);
        assert_eq!(
            dom.query_all(Selector::Class("card")),
            vec![outer, inner, sibling]
        );
    }

    #[test]
    fn in_page_anchor_matching() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let local = dom.add_link(body, "#about");
        let _external = dom.add_link(body, "https://example.com/#about");
        assert_eq!(dom.query_all(Selector::InPageAnchors), vec![local]);
    }

    #[test]
    fn closest_walks_inclusive_ancestors() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let container = dom.add(body, "div", None, &["logo-upload"]);
        let img = dom.add(container, "img", Some("logo1Image"), &[]);
        assert_eq!(dom.closest(img, "logo-upload"), Some(container));
        assert_eq!(dom.closest(container, "logo-upload"), Some(container));
        assert_eq!(dom.closest(body, "logo-upload"), None);
    }

    #[test]
    fn detached_nodes_accept_styles_until_removed() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let node = dom.create_element("div").expect("memory dom always creates");
        dom.set_style(node, "width", "20px");
        assert!(!dom.is_connected(node));
        dom.append_child(body, node);
        assert!(dom.is_connected(node));
        assert_eq!(dom.style(node, "width").as_deref(), Some("20px"));

        dom.remove(node);
        dom.set_style(node, "width", "40px");
        assert!(!dom.is_connected(node));
        assert_eq!(dom.style(node, "width"), None);
        assert!(dom.children(body).is_empty());
    }

    #[test]
    fn removed_subtree_leaves_queries() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let parent = dom.add(body, "div", None, &["section"]);
        let _child = dom.add(parent, "h2", Some("title"), &["section-title"]);
        dom.remove(parent);
        assert!(dom.query_all(Selector::Class("section-title")).is_empty());
        assert_eq!(dom.element_by_id("title"), None);
    }
}
