#![forbid(unsafe_code)]

//! Decorative hover, press and ripple effects.
//!
//! Hover effects are table-driven: each [`HoverGroup`] names its targets and
//! the inline values written on enter and on leave. Leave always writes the
//! declared resting values, so no per-element state is kept.

use tracing::debug;

use crate::dom::{Dom, NodeId, Selector};
use crate::markup;
use crate::styles::keyframes;

type Writes = &'static [(&'static str, &'static str)];

const LIFTED_SHADOW: &str = "0 8px 25px rgba(0,0,0,0.1)";
const RESTING_SHADOW: &str = "0 1px 3px rgba(0,0,0,0.04), 0 1px 2px rgba(0,0,0,0.02)";

/// Transform written on a designated child while its parent is hovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconEffect {
    pub class: &'static str,
    pub enter_transform: &'static str,
    pub leave_transform: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverEffect {
    pub targets: Selector,
    pub enter: Writes,
    pub leave: Writes,
    pub icon: Option<IconEffect>,
    /// Skip both phases while the element carries this class.
    pub unless_class: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HoverGroup {
    Tag,
    TimelineItem,
    PositionItem,
    AchievementItem,
    LogoUpload,
}

impl HoverGroup {
    pub const ALL: [Self; 5] = [
        Self::Tag,
        Self::TimelineItem,
        Self::PositionItem,
        Self::AchievementItem,
        Self::LogoUpload,
    ];

    #[must_use]
    pub fn effect(self) -> &'static HoverEffect {
        match self {
            Self::Tag => &TAG,
            Self::TimelineItem => &TIMELINE_ITEM,
            Self::PositionItem => &POSITION_ITEM,
            Self::AchievementItem => &ACHIEVEMENT_ITEM,
            Self::LogoUpload => &LOGO_UPLOAD,
        }
    }
}

static TAG: HoverEffect = HoverEffect {
    targets: Selector::AnyClass(&[markup::SKILL_TAG, markup::CERT_TAG]),
    enter: &[
        ("transform", "translateY(-2px) scale(1.05)"),
        ("box-shadow", "0 4px 12px rgba(0,0,0,0.15)"),
    ],
    leave: &[("transform", "translateY(0) scale(1)"), ("box-shadow", "none")],
    icon: None,
    unless_class: None,
};

static TIMELINE_ITEM: HoverEffect = HoverEffect {
    targets: Selector::AnyClass(&[
        markup::EXPERIENCE_ITEM,
        markup::EDUCATION_ITEM,
        markup::PROJECT_ITEM,
    ]),
    enter: &[("box-shadow", LIFTED_SHADOW), ("border-left-width", "6px")],
    leave: &[("box-shadow", RESTING_SHADOW), ("border-left-width", "4px")],
    icon: None,
    unless_class: None,
};

static POSITION_ITEM: HoverEffect = HoverEffect {
    targets: Selector::Class(markup::POSITION_ITEM),
    enter: &[("box-shadow", LIFTED_SHADOW)],
    leave: &[("box-shadow", RESTING_SHADOW)],
    icon: Some(IconEffect {
        class: markup::POSITION_ICON,
        enter_transform: "scale(1.2) rotate(10deg)",
        leave_transform: "scale(1) rotate(0deg)",
    }),
    unless_class: None,
};

static ACHIEVEMENT_ITEM: HoverEffect = HoverEffect {
    targets: Selector::Class(markup::ACHIEVEMENT_ITEM),
    enter: &[("box-shadow", LIFTED_SHADOW)],
    leave: &[("box-shadow", RESTING_SHADOW)],
    icon: Some(IconEffect {
        class: markup::ACHIEVEMENT_ICON,
        enter_transform: "scale(1.2) rotate(-5deg)",
        leave_transform: "scale(1) rotate(0deg)",
    }),
    unless_class: None,
};

static LOGO_UPLOAD: HoverEffect = HoverEffect {
    targets: Selector::Class(markup::LOGO_UPLOAD),
    enter: &[("transform", "scale(1.05)"), ("border-style", "solid")],
    leave: &[("transform", "scale(1)"), ("border-style", "dashed")],
    icon: None,
    unless_class: Some(markup::HAS_LOGO),
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverPhase {
    Enter,
    Leave,
}

/// Apply one hover phase. Returns `false` when the effect was suppressed.
pub fn apply_hover(dom: &mut impl Dom, group: HoverGroup, node: NodeId, phase: HoverPhase) -> bool {
    let effect = group.effect();
    if effect.unless_class.is_some_and(|class| dom.has_class(node, class)) {
        return false;
    }
    let writes = match phase {
        HoverPhase::Enter => effect.enter,
        HoverPhase::Leave => effect.leave,
    };
    for (property, value) in writes {
        dom.set_style(node, property, value);
    }
    if let Some(icon) = effect.icon {
        match dom.query_within(node, icon.class) {
            Some(child) => {
                let transform = match phase {
                    HoverPhase::Enter => icon.enter_transform,
                    HoverPhase::Leave => icon.leave_transform,
                };
                dom.set_style(child, "transform", transform);
            }
            None => debug!(%node, icon = icon.class, "hover icon missing"),
        }
    }
    true
}

/// Transform held while a contact item is pressed.
pub const CONTACT_PRESSED: &str = "translateY(-2px) scale(0.98)";
/// Transform restored after the press feedback delay.
pub const CONTACT_RELEASED: &str = "translateY(-2px) scale(1)";

/// Diameter of a freshly spawned ripple, in CSS pixels.
pub const RIPPLE_SIZE_PX: f64 = 20.0;

/// Create a ripple centred on the pointer, relative to `item`.
pub fn spawn_ripple(dom: &mut impl Dom, item: NodeId, client_x: f64, client_y: f64) -> Option<NodeId> {
    let rect = dom.bounding_rect(item);
    let ripple = dom.create_element("div")?;
    let half = RIPPLE_SIZE_PX / 2.0;
    let size = format!("{RIPPLE_SIZE_PX}px");
    let writes = [
        ("position", "absolute".to_string()),
        ("border-radius", "50%".to_string()),
        ("background", "rgba(255, 255, 255, 0.4)".to_string()),
        ("transform", "scale(0)".to_string()),
        ("animation", format!("{} 0.6s linear", keyframes::RIPPLE)),
        ("left", format!("{}px", client_x - rect.left - half)),
        ("top", format!("{}px", client_y - rect.top - half)),
        ("width", size.clone()),
        ("height", size),
        ("pointer-events", "none".to_string()),
    ];
    for (property, value) in &writes {
        dom.set_style(ripple, property, value);
    }
    dom.set_style(item, "position", "relative");
    dom.append_child(item, ripple);
    Some(ripple)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Rect;
    use crate::memory_dom::MemoryDom;

    #[test]
    fn tag_enter_then_leave_restores_resting_values() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let tag = dom.add(body, "span", None, &["skill-tag"]);
        assert!(apply_hover(&mut dom, HoverGroup::Tag, tag, HoverPhase::Enter));
        assert_eq!(
            dom.style(tag, "transform").as_deref(),
            Some("translateY(-2px) scale(1.05)")
        );
        apply_hover(&mut dom, HoverGroup::Tag, tag, HoverPhase::Leave);
        assert_eq!(dom.style(tag, "transform").as_deref(), Some("translateY(0) scale(1)"));
        assert_eq!(dom.style(tag, "box-shadow").as_deref(), Some("none"));
    }

    #[test]
    fn position_icon_rotates() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let item = dom.add(body, "div", None, &["position-item"]);
        let icon = dom.add(item, "i", None, &["position-icon"]);
        apply_hover(&mut dom, HoverGroup::PositionItem, item, HoverPhase::Enter);
        assert_eq!(
            dom.style(icon, "transform").as_deref(),
            Some("scale(1.2) rotate(10deg)")
        );
        apply_hover(&mut dom, HoverGroup::PositionItem, item, HoverPhase::Leave);
        assert_eq!(dom.style(icon, "transform").as_deref(), Some("scale(1) rotate(0deg)"));
        assert_eq!(dom.style(item, "box-shadow").as_deref(), Some(RESTING_SHADOW));
    }

    #[test]
    fn missing_icon_still_applies_shadow() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let item = dom.add(body, "div", None, &["achievement-item"]);
        assert!(apply_hover(&mut dom, HoverGroup::AchievementItem, item, HoverPhase::Enter));
        assert_eq!(dom.style(item, "box-shadow").as_deref(), Some(LIFTED_SHADOW));
    }

    #[test]
    fn filled_logo_slot_ignores_hover() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let slot = dom.add(body, "div", None, &["logo-upload", "has-logo"]);
        assert!(!apply_hover(&mut dom, HoverGroup::LogoUpload, slot, HoverPhase::Enter));
        assert_eq!(dom.style(slot, "transform"), None);
    }

    #[test]
    fn ripple_is_centred_on_pointer() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let item = dom.add(body, "div", None, &["contact-item"]);
        dom.set_rect(item, Rect::new(100.0, 50.0, 200.0, 40.0));
        let ripple = spawn_ripple(&mut dom, item, 145.0, 70.5).expect("ripple");
        assert_eq!(dom.style(ripple, "left").as_deref(), Some("35px"));
        assert_eq!(dom.style(ripple, "top").as_deref(), Some("10.5px"));
        assert_eq!(dom.style(ripple, "width").as_deref(), Some("20px"));
        assert_eq!(dom.style(item, "position").as_deref(), Some("relative"));
        assert_eq!(dom.children(item), vec![ripple]);
    }
}
