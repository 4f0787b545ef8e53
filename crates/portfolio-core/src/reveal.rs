#![forbid(unsafe_code)]

//! Scroll-triggered reveal and emphasis animations.
//!
//! Two independent observers feed this module:
//!
//! - **Reveal**: sections, cards, position items and achievement items start
//!   hidden and offset, with a per-category staggered transition. The first
//!   intersecting entry moves them to their resting style. The observer's own
//!   threshold decides when a callback runs; the reported ratio is not
//!   rechecked here, since browsers may round it just below the threshold.
//! - **Emphasis**: profile section and titles get a named animation layered
//!   on top.
//!
//! # Invariants
//!
//! 1. Both transitions are one-way; leaving the viewport never reverts them.
//! 2. Each element is revealed (and emphasised) at most once; later
//!    callbacks for the same element are ignored.
//! 3. An element matching several reveal categories is prepared by the
//!    first one only.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::dom::{Dom, NodeId, Selector};
use crate::markup;
use crate::styles::keyframes;

/// Which observer produced a batch of entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObserverKind {
    Reveal,
    Emphasis,
}

/// One `IntersectionObserverEntry`, reduced to what the controller reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: NodeId,
    pub is_intersecting: bool,
    pub ratio: f64,
}

impl IntersectionEntry {
    #[must_use]
    pub const fn new(target: NodeId, is_intersecting: bool, ratio: f64) -> Self {
        Self {
            target,
            is_intersecting,
            ratio,
        }
    }
}

/// Element group sharing a start pose and a stagger step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealCategory {
    pub class: &'static str,
    pub initial_transform: &'static str,
    pub resting_transform: &'static str,
    /// Per-index transition delay; `None` reveals the whole group together.
    pub stagger_ms: Option<u64>,
}

pub const REVEAL_CATEGORIES: [RevealCategory; 4] = [
    RevealCategory {
        class: markup::SECTION,
        initial_transform: "translateY(20px)",
        resting_transform: "translateY(0)",
        stagger_ms: None,
    },
    RevealCategory {
        class: markup::CARD,
        initial_transform: "translateY(20px)",
        resting_transform: "translateY(0)",
        stagger_ms: Some(100),
    },
    RevealCategory {
        class: markup::POSITION_ITEM,
        initial_transform: "translateX(-20px)",
        resting_transform: "translateX(0)",
        stagger_ms: Some(200),
    },
    RevealCategory {
        class: markup::ACHIEVEMENT_ITEM,
        initial_transform: "scale(0.9)",
        resting_transform: "scale(1)",
        stagger_ms: Some(150),
    },
];

const FADE: &str = "0.6s ease";

/// Transition value for the `index`-th element of a category.
#[must_use]
pub fn staggered_transition(stagger_ms: Option<u64>, index: usize) -> String {
    match stagger_ms {
        None => format!("opacity {FADE}, transform {FADE}"),
        Some(step) => {
            let delay = format_seconds(step.saturating_mul(index as u64));
            format!("opacity {FADE} {delay}, transform {FADE} {delay}")
        }
    }
}

/// Milliseconds as a CSS seconds value without float noise: `300` → `0.3s`.
#[must_use]
pub fn format_seconds(ms: u64) -> String {
    let whole = ms / 1000;
    let frac = ms % 1000;
    if frac == 0 {
        return format!("{whole}s");
    }
    let digits = format!("{frac:03}");
    format!("{whole}.{}s", digits.trim_end_matches('0'))
}

/// Bookkeeping for the reveal observer.
#[derive(Debug, Clone, Default)]
pub struct RevealTracker {
    resting: HashMap<NodeId, &'static str>,
    revealed: HashSet<NodeId>,
}

impl RevealTracker {
    /// Put every category member into its hidden start pose.
    ///
    /// Returns the tracker and the elements the host must observe.
    pub fn prepare(dom: &mut impl Dom) -> (Self, Vec<NodeId>) {
        let mut tracker = Self::default();
        let mut observed = Vec::new();
        for category in &REVEAL_CATEGORIES {
            for (index, node) in dom
                .query_all(Selector::Class(category.class))
                .into_iter()
                .enumerate()
            {
                if tracker.resting.contains_key(&node) {
                    continue;
                }
                dom.set_style(node, "opacity", "0");
                dom.set_style(node, "transform", category.initial_transform);
                dom.set_style(
                    node,
                    "transition",
                    &staggered_transition(category.stagger_ms, index),
                );
                tracker.resting.insert(node, category.resting_transform);
                observed.push(node);
            }
        }
        (tracker, observed)
    }

    /// Apply the resting pose to intersecting entries.
    ///
    /// Returns how many elements were revealed by this batch.
    pub fn on_entries(&mut self, dom: &mut impl Dom, entries: &[IntersectionEntry]) -> usize {
        let mut revealed = 0;
        for entry in entries.iter().filter(|entry| entry.is_intersecting) {
            let Some(resting) = self.resting.get(&entry.target).copied() else {
                continue;
            };
            if !self.revealed.insert(entry.target) {
                trace!(node = %entry.target, "already revealed");
                continue;
            }
            dom.set_style(entry.target, "opacity", "1");
            dom.set_style(entry.target, "transform", resting);
            dom.add_class(entry.target, markup::ANIMATE_IN);
            revealed += 1;
        }
        revealed
    }

    #[must_use]
    pub fn is_revealed(&self, node: NodeId) -> bool {
        self.revealed.contains(&node)
    }

    /// Number of elements still waiting to be revealed.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.resting.len() - self.revealed.len()
    }
}

/// Elements watched by the emphasis observer.
pub const EMPHASIS_TARGETS: Selector = Selector::AnyClass(&[
    markup::PROFILE_SECTION,
    markup::SECTION_TITLE,
    markup::ITEM_TITLE,
]);

/// Bookkeeping for the emphasis observer.
#[derive(Debug, Clone, Default)]
pub struct EmphasisTracker {
    emphasized: HashSet<NodeId>,
}

impl EmphasisTracker {
    pub fn on_entries(&mut self, dom: &mut impl Dom, entries: &[IntersectionEntry]) -> usize {
        let mut applied = 0;
        for entry in entries.iter().filter(|entry| entry.is_intersecting) {
            if !self.emphasized.insert(entry.target) {
                continue;
            }
            let node = entry.target;
            dom.add_class(node, markup::ANIMATE_IN);
            if dom.has_class(node, markup::SECTION_TITLE) {
                dom.set_style(
                    node,
                    "animation",
                    &format!("{} 0.8s ease forwards", keyframes::SLIDE_IN_FROM_LEFT),
                );
            }
            if dom.has_class(node, markup::PROFILE_SECTION) {
                dom.set_style(
                    node,
                    "animation",
                    &format!("{} 1s ease forwards", keyframes::FADE_IN_UP),
                );
            }
            applied += 1;
        }
        applied
    }
}
