#![forbid(unsafe_code)]

//! The interaction controller.
//!
//! [`PortfolioController::initialize`] inspects the document once and returns
//! a [`Wiring`]: the listeners and observers the host must attach. After that
//! the host forwards each DOM event as a [`UiEvent`] to
//! [`PortfolioController::dispatch`], reports decode completions through
//! [`PortfolioController::complete_upload`], and keeps the clock current with
//! [`PortfolioController::set_time`] so deferred mutations fire.
//!
//! The controller is single-owner and never touches host objects directly;
//! everything goes through [`Dom`].

use core::time::Duration;
use std::collections::{HashMap, HashSet};

use tracing::{debug, info, trace};

use crate::clock::{TimerQueue, TimerTask};
use crate::config::PortfolioConfig;
use crate::dom::{Dom, NodeId, Selector};
use crate::effects::{self, HoverGroup, HoverPhase};
use crate::error::UploadError;
use crate::markup;
use crate::reveal::{EMPHASIS_TARGETS, EmphasisTracker, IntersectionEntry, ObserverKind, RevealTracker};
use crate::scroll;
use crate::styles::Stylesheet;
use crate::upload::{self, BindingId, BindingKind, SelectedFile, UploadBindings, UploadTicket};

/// DOM event types the host attaches per element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    Change,
    Click,
    MouseEnter,
    MouseLeave,
    MouseDown,
}

impl ListenerKind {
    /// DOM event type name.
    #[must_use]
    pub const fn event_type(self) -> &'static str {
        match self {
            Self::Change => "change",
            Self::Click => "click",
            Self::MouseEnter => "mouseenter",
            Self::MouseLeave => "mouseleave",
            Self::MouseDown => "mousedown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerSpec {
    pub target: NodeId,
    pub kind: ListenerKind,
}

/// One `IntersectionObserver` the host must create.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverSpec {
    pub kind: ObserverKind,
    pub threshold: f64,
    pub root_margin: String,
    pub targets: Vec<NodeId>,
}

/// Everything the host must attach after initialization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wiring {
    pub listeners: Vec<ListenerSpec>,
    pub observers: Vec<ObserverSpec>,
    /// Attach a window `resize` listener.
    pub window_resize: bool,
}

impl Wiring {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty() && self.observers.is_empty() && !self.window_resize
    }

    /// Listener kinds registered on `target`.
    pub fn kinds_on(&self, target: NodeId) -> impl Iterator<Item = ListenerKind> + '_ {
        self.listeners
            .iter()
            .filter(move |spec| spec.target == target)
            .map(|spec| spec.kind)
    }
}

/// A host event, reduced to what the handlers read.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    FileSelected {
        input: NodeId,
        file: Option<SelectedFile>,
    },
    Click {
        target: NodeId,
    },
    MouseEnter {
        target: NodeId,
    },
    MouseLeave {
        target: NodeId,
    },
    MouseDown {
        target: NodeId,
        client_x: f64,
        client_y: f64,
    },
    Resize,
    Intersection {
        observer: ObserverKind,
        entries: Vec<IntersectionEntry>,
    },
}

/// What the host must do after a dispatch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dispatch {
    /// Call `preventDefault()` on the originating event.
    pub prevent_default: bool,
    /// Start decoding the selected file and report back with this ticket.
    pub read: Option<UploadTicket>,
    /// Selection refused (already alerted).
    pub rejected: Option<UploadError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handler {
    Upload(BindingId),
    Anchor,
    Hover(HoverGroup),
    ContactPress,
    Ripple,
}

/// Single-owner interaction controller.
#[derive(Debug)]
pub struct PortfolioController {
    config: PortfolioConfig,
    stylesheet: Stylesheet,
    initialized: bool,
    bindings: UploadBindings,
    handlers: HashMap<(NodeId, ListenerKind), Vec<Handler>>,
    reveal: RevealTracker,
    emphasis: EmphasisTracker,
    timers: TimerQueue,
    ripples: HashSet<NodeId>,
}

impl Default for PortfolioController {
    fn default() -> Self {
        Self::new(PortfolioConfig::default())
    }
}

impl PortfolioController {
    #[must_use]
    pub fn new(config: PortfolioConfig) -> Self {
        Self {
            config,
            stylesheet: Stylesheet::animations(),
            initialized: false,
            bindings: UploadBindings::default(),
            handlers: HashMap::new(),
            reveal: RevealTracker::default(),
            emphasis: EmphasisTracker::default(),
            timers: TimerQueue::new(),
            ripples: HashSet::new(),
        }
    }

    /// Build a controller from host-supplied JSON, validated before any DOM work.
    pub fn from_config_json(json: &str) -> crate::error::Result<Self> {
        PortfolioConfig::from_json(json).map(Self::new)
    }

    #[must_use]
    pub const fn config(&self) -> &PortfolioConfig {
        &self.config
    }

    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[must_use]
    pub const fn bindings(&self) -> &UploadBindings {
        &self.bindings
    }

    #[must_use]
    pub const fn stylesheet(&self) -> &Stylesheet {
        &self.stylesheet
    }

    /// Wire the document. Runs once; later calls return an empty [`Wiring`].
    pub fn initialize(&mut self, dom: &mut impl Dom) -> Wiring {
        if self.initialized {
            debug!("portfolio already initialized");
            return Wiring::default();
        }
        self.initialized = true;

        let mut wiring = Wiring {
            window_resize: true,
            ..Wiring::default()
        };

        self.bindings = UploadBindings::resolve(dom, &self.config);
        let inputs: Vec<(NodeId, BindingId)> = self
            .bindings
            .iter()
            .map(|(id, binding)| (binding.input, id))
            .collect();
        for (input, id) in inputs {
            self.register(&mut wiring, input, ListenerKind::Change, Handler::Upload(id));
        }

        for link in dom.query_all(Selector::InPageAnchors) {
            self.register(&mut wiring, link, ListenerKind::Click, Handler::Anchor);
        }

        let (reveal, revealed_targets) = RevealTracker::prepare(dom);
        self.reveal = reveal;
        wiring.observers.push(ObserverSpec {
            kind: ObserverKind::Reveal,
            threshold: self.config.observers.reveal_threshold,
            root_margin: self.config.observers.reveal_root_margin.clone(),
            targets: revealed_targets,
        });
        wiring.observers.push(ObserverSpec {
            kind: ObserverKind::Emphasis,
            threshold: self.config.observers.emphasis_threshold,
            root_margin: self.config.observers.emphasis_root_margin.clone(),
            targets: dom.query_all(EMPHASIS_TARGETS),
        });

        for group in HoverGroup::ALL {
            for node in dom.query_all(group.effect().targets) {
                self.register(&mut wiring, node, ListenerKind::MouseEnter, Handler::Hover(group));
                self.register(&mut wiring, node, ListenerKind::MouseLeave, Handler::Hover(group));
            }
        }

        for item in dom.query_all(Selector::Class(markup::CONTACT_ITEM)) {
            self.register(&mut wiring, item, ListenerKind::Click, Handler::ContactPress);
            self.register(&mut wiring, item, ListenerKind::MouseDown, Handler::Ripple);
        }

        dom.inject_stylesheet(self.stylesheet.as_css());

        info!(
            bindings = self.bindings.len(),
            listeners = wiring.listeners.len(),
            reveal_targets = self.reveal.pending(),
            "portfolio initialized"
        );
        wiring
    }

    fn register(&mut self, wiring: &mut Wiring, target: NodeId, kind: ListenerKind, handler: Handler) {
        let handlers = self.handlers.entry((target, kind)).or_default();
        if handlers.is_empty() {
            wiring.listeners.push(ListenerSpec { target, kind });
        }
        if !handlers.contains(&handler) {
            handlers.push(handler);
        }
    }

    /// Route one host event to its handlers.
    pub fn dispatch(&mut self, dom: &mut impl Dom, event: UiEvent) -> Dispatch {
        let mut outcome = Dispatch::default();
        match event {
            UiEvent::FileSelected { input, file } => {
                if let Some(id) = self.bindings.by_input(input) {
                    self.select(dom, id, file.as_ref(), &mut outcome);
                }
            }
            UiEvent::Click { target } => {
                for handler in self.handlers_for(target, ListenerKind::Click) {
                    match handler {
                        Handler::Anchor => {
                            outcome.prevent_default = true;
                            scroll::follow_anchor(dom, target);
                        }
                        Handler::ContactPress => self.press_contact(dom, target),
                        _ => {}
                    }
                }
            }
            UiEvent::MouseEnter { target } => self.hover(dom, target, HoverPhase::Enter),
            UiEvent::MouseLeave { target } => self.hover(dom, target, HoverPhase::Leave),
            UiEvent::MouseDown {
                target,
                client_x,
                client_y,
            } => {
                if self
                    .handlers_for(target, ListenerKind::MouseDown)
                    .contains(&Handler::Ripple)
                {
                    self.ripple(dom, target, client_x, client_y);
                }
            }
            UiEvent::Resize => self.resize(dom),
            UiEvent::Intersection { observer, entries } => {
                let applied = match observer {
                    ObserverKind::Reveal => self.reveal.on_entries(dom, &entries),
                    ObserverKind::Emphasis => self.emphasis.on_entries(dom, &entries),
                };
                trace!(?observer, entries = entries.len(), applied, "intersection batch");
            }
        }
        outcome
    }

    fn handlers_for(&self, target: NodeId, kind: ListenerKind) -> Vec<Handler> {
        self.handlers
            .get(&(target, kind))
            .cloned()
            .unwrap_or_default()
    }

    /// Run a binding's upload handler directly (global export path).
    ///
    /// Returns `Ok(None)` when there is no such binding or no file.
    pub fn select_file(
        &mut self,
        dom: &mut impl Dom,
        kind: BindingKind,
        file: Option<&SelectedFile>,
    ) -> Result<Option<UploadTicket>, UploadError> {
        let Some(id) = self.bindings.by_kind(kind) else {
            debug!(%kind, "no upload binding");
            return Ok(None);
        };
        let mut outcome = Dispatch::default();
        self.select(dom, id, file, &mut outcome);
        match outcome.rejected {
            Some(err) => Err(err),
            None => Ok(outcome.read),
        }
    }

    fn select(
        &mut self,
        dom: &mut impl Dom,
        id: BindingId,
        file: Option<&SelectedFile>,
        outcome: &mut Dispatch,
    ) {
        match self.bindings.select(id, file) {
            Ok(ticket) => {
                if let Some(ticket) = ticket {
                    debug!(generation = ticket.generation, "upload accepted; awaiting decode");
                }
                outcome.read = ticket;
            }
            Err(err) => {
                debug!(error = %err, "upload rejected");
                dom.alert(&err.alert_message());
                outcome.rejected = Some(err);
            }
        }
    }

    /// Apply a finished decode. Returns `false` for superseded tickets.
    pub fn complete_upload(&mut self, dom: &mut impl Dom, ticket: UploadTicket, data_uri: &str) -> bool {
        let Some(binding) = self.bindings.current(ticket).cloned() else {
            debug!(generation = ticket.generation, "discarding superseded decode");
            return false;
        };
        if let Some(pulse) = upload::render_preview(dom, &binding, data_uri) {
            self.pulse(dom, pulse, "scale(0.95)", "scale(1)");
        }
        debug!(kind = %binding.kind, bytes = data_uri.len(), "preview rendered");
        true
    }

    fn pulse(&mut self, dom: &mut impl Dom, node: NodeId, pressed: &str, released: &str) {
        dom.set_style(node, "transform", pressed);
        self.timers.schedule(
            self.config.timing.feedback(),
            TimerTask::SetStyle {
                node,
                property: "transform",
                value: released.to_string(),
            },
        );
    }

    fn press_contact(&mut self, dom: &mut impl Dom, item: NodeId) {
        self.pulse(dom, item, effects::CONTACT_PRESSED, effects::CONTACT_RELEASED);
    }

    fn hover(&mut self, dom: &mut impl Dom, target: NodeId, phase: HoverPhase) {
        let kind = match phase {
            HoverPhase::Enter => ListenerKind::MouseEnter,
            HoverPhase::Leave => ListenerKind::MouseLeave,
        };
        for handler in self.handlers_for(target, kind) {
            if let Handler::Hover(group) = handler {
                effects::apply_hover(dom, group, target, phase);
            }
        }
    }

    fn ripple(&mut self, dom: &mut impl Dom, item: NodeId, client_x: f64, client_y: f64) {
        let Some(ripple) = effects::spawn_ripple(dom, item, client_x, client_y) else {
            debug!(%item, "ripple element could not be created");
            return;
        };
        self.ripples.insert(ripple);
        self.timers
            .schedule(self.config.timing.ripple(), TimerTask::Remove { node: ripple });
    }

    fn resize(&mut self, dom: &mut impl Dom) {
        let Some(picture) = dom
            .query_all(Selector::Class(markup::PROFILE_PIC))
            .into_iter()
            .next()
        else {
            return;
        };
        let size = format!(
            "{}px",
            self.config.responsive.profile_size_px(dom.viewport_width())
        );
        dom.set_style(picture, "width", &size);
        dom.set_style(picture, "height", &size);
    }

    /// Move the clock to `now` and apply every deferred mutation now due.
    ///
    /// Returns how many tasks fired.
    pub fn set_time(&mut self, dom: &mut impl Dom, now: Duration) -> usize {
        let due = self.timers.set_time(now);
        self.run_tasks(dom, due)
    }

    pub fn advance_time(&mut self, dom: &mut impl Dom, dt: Duration) -> usize {
        let due = self.timers.advance(dt);
        self.run_tasks(dom, due)
    }

    fn run_tasks(&mut self, dom: &mut impl Dom, tasks: Vec<TimerTask>) -> usize {
        let fired = tasks.len();
        for task in tasks {
            match task {
                TimerTask::SetStyle {
                    node,
                    property,
                    value,
                } => dom.set_style(node, property, &value),
                TimerTask::Remove { node } => {
                    self.ripples.remove(&node);
                    dom.remove(node);
                }
            }
        }
        fired
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    /// When the host should next report time, if anything is pending.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Ripples spawned and not yet removed.
    #[must_use]
    pub fn live_ripples(&self) -> usize {
        self.ripples.len()
    }

    #[must_use]
    pub fn is_revealed(&self, node: NodeId) -> bool {
        self.reveal.is_revealed(node)
    }
}
