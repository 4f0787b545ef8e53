//! [`Dom`] over the live browser document.

use std::cell::RefCell;

use js_sys::WeakMap;
use portfolio_core::dom::{ScrollBehavior as Behavior, ScrollBlock};
use portfolio_core::{Dom, NodeId, Rect, ScrollOptions, Selector};
use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
    Window,
};

use crate::registry::NodeRegistry;

pub struct WebDom {
    window: Window,
    document: Document,
    nodes: RefCell<NodeRegistry<Element>>,
    /// Element to raw id, held weakly so page markup stays untouched and
    /// detached elements can be collected.
    ids: WeakMap,
}

impl WebDom {
    /// `None` outside a window with a document.
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self {
            window,
            document,
            nodes: RefCell::new(NodeRegistry::new()),
            ids: WeakMap::new(),
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Id for `element`, minting one on first sight.
    pub fn intern(&self, element: &Element) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(raw) = self.ids.get(element).as_f64() {
            let node = NodeId::new(raw as u32);
            if nodes.get(node) == Some(element) {
                return node;
            }
        }
        let node = nodes.insert(element.clone());
        self.ids.set(element, &JsValue::from(node.get()));
        node
    }

    pub fn element(&self, node: NodeId) -> Option<Element> {
        self.nodes.borrow().get(node).cloned()
    }

    fn html(&self, node: NodeId) -> Option<HtmlElement> {
        self.element(node)?.dyn_into::<HtmlElement>().ok()
    }
}

impl Dom for WebDom {
    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let element = self.document.get_element_by_id(id)?;
        Some(self.intern(&element))
    }

    fn query_all(&self, selector: Selector) -> Vec<NodeId> {
        let css = selector.to_css();
        let list = match self.document.query_selector_all(&css) {
            Ok(list) => list,
            Err(err) => {
                warn!(selector = %css, error = ?err, "querySelectorAll failed");
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|index| list.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| self.intern(&element))
            .collect()
    }

    fn query_within(&self, scope: NodeId, class: &str) -> Option<NodeId> {
        let found = self
            .element(scope)?
            .query_selector(&format!(".{class}"))
            .ok()
            .flatten()?;
        Some(self.intern(&found))
    }

    fn closest(&self, node: NodeId, class: &str) -> Option<NodeId> {
        let found = self.element(node)?.closest(&format!(".{class}")).ok().flatten()?;
        Some(self.intern(&found))
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node)?.get_attribute(name)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.element(node) {
            let _ = element.set_attribute(name, value);
        }
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.html(node)?
            .style()
            .get_property_value(property)
            .ok()
            .filter(|value| !value.is_empty())
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(element) = self.html(node)
            && let Err(err) = element.style().set_property(property, value)
        {
            debug!(%node, property, error = ?err, "style write refused");
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|element| element.class_list().contains(class))
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.element(node) {
            let _ = element.class_list().add_1(class);
        }
    }

    fn bounding_rect(&self, node: NodeId) -> Rect {
        self.element(node).map_or_else(Rect::default, |element| {
            let rect = element.get_bounding_client_rect();
            Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
        })
    }

    fn create_element(&mut self, tag: &str) -> Option<NodeId> {
        let element = self.document.create_element(tag).ok()?;
        Some(self.intern(&element))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let (Some(parent), Some(child)) = (self.element(parent), self.element(child)) {
            let _ = parent.append_child(&child);
        }
    }

    fn remove(&mut self, node: NodeId) {
        if let Some(element) = self.nodes.borrow_mut().release(node) {
            self.ids.delete(&element);
            element.remove();
        }
    }

    fn is_connected(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(|element| element.is_connected())
    }

    fn scroll_into_view(&mut self, node: NodeId, options: ScrollOptions) {
        let Some(element) = self.element(node) else {
            return;
        };
        let init = ScrollIntoViewOptions::new();
        init.set_behavior(match options.behavior {
            Behavior::Auto => ScrollBehavior::Auto,
            Behavior::Smooth => ScrollBehavior::Smooth,
        });
        init.set_block(match options.block {
            ScrollBlock::Start => ScrollLogicalPosition::Start,
            ScrollBlock::Center => ScrollLogicalPosition::Center,
            ScrollBlock::End => ScrollLogicalPosition::End,
            ScrollBlock::Nearest => ScrollLogicalPosition::Nearest,
        });
        element.scroll_into_view_with_scroll_into_view_options(&init);
    }

    fn alert(&mut self, message: &str) {
        let _ = self.window.alert_with_message(message);
    }

    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|width| width.as_f64())
            .unwrap_or_default()
    }

    fn inject_stylesheet(&mut self, css: &str) {
        let Ok(style) = self.document.create_element("style") else {
            warn!("could not create <style> element");
            return;
        };
        style.set_text_content(Some(css));
        match self.document.head() {
            Some(head) => {
                let _ = head.append_child(&style);
            }
            None => warn!("document has no <head>; animations stylesheet skipped"),
        }
    }
}
