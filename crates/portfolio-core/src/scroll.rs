#![forbid(unsafe_code)]

//! In-page anchor navigation.

use tracing::trace;

use crate::dom::{Dom, NodeId, ScrollOptions};

/// Target element id of an in-page `href`, without the leading `#`.
#[must_use]
pub fn anchor_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Smooth-scroll to the anchor's target. Returns the scrolled element.
///
/// Default navigation is always suppressed by the caller, so an unmatched
/// anchor simply does nothing.
pub fn follow_anchor(dom: &mut impl Dom, link: NodeId) -> Option<NodeId> {
    let href = dom.attribute(link, "href")?;
    let Some(target) = anchor_target(&href).and_then(|id| dom.element_by_id(id)) else {
        trace!(%href, "anchor target not found");
        return None;
    };
    dom.scroll_into_view(target, ScrollOptions::SMOOTH_START);
    Some(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_dom::MemoryDom;

    #[test]
    fn anchor_target_strips_hash() {
        assert_eq!(anchor_target("#about"), Some("about"));
        assert_eq!(anchor_target("#"), None);
        assert_eq!(anchor_target("about"), None);
    }

    #[test]
    fn follows_existing_target() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let link = dom.add_link(body, "#skills");
        let target = dom.add(body, "section", Some("skills"), &["section"]);
        assert_eq!(follow_anchor(&mut dom, link), Some(target));
        assert_eq!(dom.scrolls(), &[(target, ScrollOptions::SMOOTH_START)]);
    }

    #[test]
    fn bare_hash_does_not_scroll() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let link = dom.add_link(body, "#");
        assert_eq!(follow_anchor(&mut dom, link), None);
        assert!(dom.scrolls().is_empty());
    }
}
