#![forbid(unsafe_code)]

//! Host document abstraction.
//!
//! The controller never holds host objects. Elements are addressed through
//! opaque [`NodeId`] handles minted by the [`Dom`] implementation, and every
//! lookup that can miss returns `Option` so absent markup degrades to a
//! no-op instead of an error.

use core::fmt;

/// Opaque handle for one element owned by a [`Dom`] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Wrap a raw handle value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw handle value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Element groups the controller queries in bulk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// Elements carrying one class.
    Class(&'static str),
    /// Elements carrying any of the listed classes, in document order.
    AnyClass(&'static [&'static str]),
    /// Anchors whose `href` starts with `#`.
    InPageAnchors,
}

impl Selector {
    /// CSS selector text accepted by `querySelectorAll`.
    #[must_use]
    pub fn to_css(self) -> String {
        match self {
            Self::Class(class) => format!(".{class}"),
            Self::AnyClass(classes) => classes
                .iter()
                .map(|class| format!(".{class}"))
                .collect::<Vec<_>>()
                .join(", "),
            Self::InPageAnchors => "a[href^=\"#\"]".to_string(),
        }
    }
}

/// Viewport-relative element box, as reported by `getBoundingClientRect`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// `scrollIntoView` easing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Auto,
    Smooth,
}

/// `scrollIntoView` vertical alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBlock {
    Start,
    Center,
    End,
    Nearest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollOptions {
    pub behavior: ScrollBehavior,
    pub block: ScrollBlock,
}

impl ScrollOptions {
    /// Smooth scroll aligned to the target's top edge.
    pub const SMOOTH_START: Self = Self {
        behavior: ScrollBehavior::Smooth,
        block: ScrollBlock::Start,
    };
}

/// Operations the controller needs from the host document.
///
/// Style properties use CSS (kebab-case) names, e.g. `background-image`.
/// Mutations on a node that no longer exists must be ignored.
pub trait Dom {
    /// `document.getElementById`.
    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    /// `document.querySelectorAll`, in document order.
    fn query_all(&self, selector: Selector) -> Vec<NodeId>;

    /// First descendant of `scope` carrying `class`.
    fn query_within(&self, scope: NodeId, class: &str) -> Option<NodeId>;

    /// Nearest inclusive ancestor of `node` carrying `class`.
    fn closest(&self, node: NodeId, class: &str) -> Option<NodeId>;

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    /// Inline style value, `None` when unset.
    fn style(&self, node: NodeId, property: &str) -> Option<String>;

    fn set_style(&mut self, node: NodeId, property: &str, value: &str);

    fn has_class(&self, node: NodeId, class: &str) -> bool;

    fn add_class(&mut self, node: NodeId, class: &str);

    fn bounding_rect(&self, node: NodeId) -> Rect;

    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> Option<NodeId>;

    fn append_child(&mut self, parent: NodeId, child: NodeId);

    /// Detach `node` from the document and release its handle.
    fn remove(&mut self, node: NodeId);

    /// Whether `node` is still attached.
    fn is_connected(&self, node: NodeId) -> bool;

    fn scroll_into_view(&mut self, node: NodeId, options: ScrollOptions);

    /// Blocking user notification.
    fn alert(&mut self, message: &str);

    /// `window.innerWidth` in CSS pixels.
    fn viewport_width(&self) -> f64;

    /// Append a `<style>` block to the document head.
    fn inject_stylesheet(&mut self, css: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_css_text() {
        assert_eq!(Selector::Class("card").to_css(), ".card");
        assert_eq!(
            Selector::AnyClass(&["experience-item", "project-item"]).to_css(),
            ".experience-item, .project-item"
        );
        assert_eq!(Selector::InPageAnchors.to_css(), "a[href^=\"#\"]");
    }

    #[test]
    fn node_id_display() {
        assert_eq!(NodeId::new(7).to_string(), "node#7");
    }
}
