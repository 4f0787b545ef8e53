//! `wasm-bindgen` exports and browser wiring.
//!
//! Host-driven: the browser owns the event loop. Listeners, observer
//! callbacks, `FileReader` completions and `setTimeout` ticks all borrow the
//! one shared [`Host`] and forward to the controller.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Object, Reflect};
use portfolio_core::{
    BindingKind, Dispatch, IntersectionEntry, ListenerKind, NodeId, ObserverSpec, PortfolioConfig,
    PortfolioController, SelectedFile, UiEvent, UploadTicket, Wiring,
};
use tracing::{debug, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{
    Event, File, HtmlInputElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, MouseEvent,
};
use web_time::{Duration, Instant};

use crate::file_read;
use crate::timeout;
use crate::web_dom::WebDom;

struct Host {
    dom: WebDom,
    controller: PortfolioController,
    started: Instant,
    /// Earliest armed `setTimeout` deadline.
    armed: Option<Duration>,
}

type Shared = Rc<RefCell<Host>>;

thread_local! {
    static APP: RefCell<Option<Shared>> = const { RefCell::new(None) };
}

fn set_js(obj: &Object, key: &str, value: JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), &value);
}

fn js_error(message: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&message.to_string())
}

fn install_panic_hook() {
    use std::sync::Once;
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let global = js_sys::global();
            if let Ok(console) = Reflect::get(&global, &"console".into())
                && let Ok(error) = Reflect::get(&console, &"error".into())
                && let Ok(f) = error.dyn_into::<js_sys::Function>()
            {
                let _ = f.call1(&console, &JsValue::from_str(&format!("{info}")));
            }
        }));
    });
}

fn shared() -> Option<Shared> {
    APP.with(|app| app.borrow().clone())
}

/// Run `f` against the controller with its clock brought up to date.
///
/// Returns `None` while the host is already borrowed (re-entrant callback).
fn with_controller<R>(
    shared: &Shared,
    f: impl FnOnce(&mut PortfolioController, &mut WebDom) -> R,
) -> Option<R> {
    let Ok(mut host) = shared.try_borrow_mut() else {
        debug!("host busy; dropping re-entrant callback");
        return None;
    };
    let Host {
        dom,
        controller,
        started,
        ..
    } = &mut *host;
    controller.set_time(dom, started.elapsed());
    Some(f(controller, dom))
}

/// Keep one `setTimeout` armed for the controller's next deadline.
fn arm_timer(shared: &Shared) {
    let Ok(mut host) = shared.try_borrow_mut() else {
        return;
    };
    let Some(deadline) = host.controller.next_deadline() else {
        return;
    };
    if host.armed.is_some_and(|armed| armed <= deadline) {
        return;
    }
    let delay = timeout::delay_ms(deadline, host.started.elapsed());
    let tick = {
        let shared = Rc::clone(shared);
        Closure::once_into_js(move || {
            if let Ok(mut host) = shared.try_borrow_mut() {
                host.armed = None;
            }
            with_controller(&shared, |_, _| ());
            arm_timer(&shared);
        })
    };
    match host
        .dom
        .window()
        .set_timeout_with_callback_and_timeout_and_arguments_0(tick.unchecked_ref(), delay)
    {
        Ok(_) => host.armed = Some(deadline),
        Err(err) => warn!(error = ?err, "setTimeout failed"),
    }
}

fn attach(shared: &Shared, wiring: &Wiring) -> Result<(), JsValue> {
    for spec in &wiring.listeners {
        let Some(element) = shared.borrow().dom.element(spec.target) else {
            continue;
        };
        let (target, kind) = (spec.target, spec.kind);
        let callback = {
            let shared = Rc::clone(shared);
            Closure::<dyn FnMut(Event)>::new(move |event: Event| {
                on_event(&shared, target, kind, &event);
            })
        };
        element.add_event_listener_with_callback(
            kind.event_type(),
            callback.as_ref().unchecked_ref(),
        )?;
        callback.forget();
    }

    for spec in &wiring.observers {
        observe(shared, spec)?;
    }

    if wiring.window_resize {
        let callback = {
            let shared = Rc::clone(shared);
            Closure::<dyn FnMut(Event)>::new(move |_: Event| {
                with_controller(&shared, |controller, dom| {
                    controller.dispatch(dom, UiEvent::Resize)
                });
            })
        };
        let window = shared.borrow().dom.window().clone();
        window.add_event_listener_with_callback("resize", callback.as_ref().unchecked_ref())?;
        callback.forget();
    }
    Ok(())
}

fn observe(shared: &Shared, spec: &ObserverSpec) -> Result<(), JsValue> {
    let kind = spec.kind;
    let callback = {
        let shared = Rc::clone(shared);
        Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |records: Array, _: IntersectionObserver| {
                let entries: Vec<IntersectionEntry> = {
                    let Ok(host) = shared.try_borrow() else {
                        return;
                    };
                    records
                        .iter()
                        .filter_map(|record| record.dyn_into::<IntersectionObserverEntry>().ok())
                        .map(|record| {
                            IntersectionEntry::new(
                                host.dom.intern(&record.target()),
                                record.is_intersecting(),
                                record.intersection_ratio(),
                            )
                        })
                        .collect()
                };
                with_controller(&shared, |controller, dom| {
                    controller.dispatch(
                        dom,
                        UiEvent::Intersection {
                            observer: kind,
                            entries,
                        },
                    )
                });
                arm_timer(&shared);
            },
        )
    };

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(spec.threshold));
    init.set_root_margin(&spec.root_margin);
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    callback.forget();

    let host = shared.borrow();
    for target in &spec.targets {
        if let Some(element) = host.dom.element(*target) {
            observer.observe(&element);
        }
    }
    debug!(?kind, targets = spec.targets.len(), "observer attached");
    Ok(())
}

fn on_event(shared: &Shared, target: NodeId, kind: ListenerKind, event: &Event) {
    let mut file = None;
    let ui_event = match kind {
        ListenerKind::Change => {
            file = event
                .target()
                .and_then(|input| input.dyn_into::<HtmlInputElement>().ok())
                .and_then(|input| input.files())
                .and_then(|files| files.get(0));
            UiEvent::FileSelected {
                input: target,
                file: file.as_ref().map(selected_file),
            }
        }
        ListenerKind::Click => UiEvent::Click { target },
        ListenerKind::MouseEnter => UiEvent::MouseEnter { target },
        ListenerKind::MouseLeave => UiEvent::MouseLeave { target },
        ListenerKind::MouseDown => {
            let (client_x, client_y) = event
                .dyn_ref::<MouseEvent>()
                .map_or((0.0, 0.0), |mouse| {
                    (f64::from(mouse.client_x()), f64::from(mouse.client_y()))
                });
            UiEvent::MouseDown {
                target,
                client_x,
                client_y,
            }
        }
    };
    let Some(outcome) =
        with_controller(shared, |controller, dom| controller.dispatch(dom, ui_event))
    else {
        return;
    };
    finish(shared, &outcome, file, Some(event));
}

/// Carry out what a dispatch asked of the host.
fn finish(shared: &Shared, outcome: &Dispatch, file: Option<File>, event: Option<&Event>) {
    if outcome.prevent_default
        && let Some(event) = event
    {
        event.prevent_default();
    }
    if let (Some(ticket), Some(file)) = (outcome.read, file) {
        read_file(shared, ticket, &file);
    }
    arm_timer(shared);
}

fn selected_file(file: &File) -> SelectedFile {
    SelectedFile::new(file.type_(), file.size() as u64)
}

fn read_file(shared: &Shared, ticket: UploadTicket, file: &File) {
    let shared = Rc::clone(shared);
    let started = file_read::read_data_uri(file, move |data_uri| {
        let Some(data_uri) = data_uri else {
            warn!(generation = ticket.generation, "file decode failed");
            return;
        };
        with_controller(&shared, |controller, dom| {
            controller.complete_upload(dom, ticket, &data_uri)
        });
        arm_timer(&shared);
    });
    if let Err(err) = started {
        warn!(error = ?err, "readAsDataURL failed");
    }
}

fn run_upload(kind: BindingKind, file: Option<File>) -> Result<(), JsValue> {
    let shared = shared().ok_or_else(|| js_error("portfolio not initialized"))?;
    let selected = file.as_ref().map(selected_file);
    let result = with_controller(&shared, |controller, dom| {
        controller.select_file(dom, kind, selected.as_ref())
    })
    .ok_or_else(|| js_error("portfolio busy"))?;
    // A refused file has already been alerted; the call itself succeeded.
    let outcome = Dispatch {
        read: result.ok().flatten(),
        ..Dispatch::default()
    };
    finish(&shared, &outcome, file, None);
    Ok(())
}

/// Wire the page. Later calls are no-ops.
///
/// `config_json` overrides element ids, ceilings, observer options and
/// timings; it is validated before the document is touched.
#[wasm_bindgen(js_name = initializePortfolio)]
pub fn initialize_portfolio(config_json: Option<String>) -> Result<(), JsValue> {
    install_panic_hook();
    if shared().is_some() {
        debug!("portfolio already initialized");
        return Ok(());
    }
    let mut controller = match config_json.as_deref() {
        Some(json) => PortfolioController::from_config_json(json).map_err(js_error)?,
        None => PortfolioController::new(PortfolioConfig::default()),
    };
    let mut dom = WebDom::new().ok_or_else(|| js_error("no document available"))?;
    let wiring = controller.initialize(&mut dom);
    let shared = Rc::new(RefCell::new(Host {
        dom,
        controller,
        started: Instant::now(),
        armed: None,
    }));
    APP.with(|app| *app.borrow_mut() = Some(Rc::clone(&shared)));
    attach(&shared, &wiring)?;
    info!(listeners = wiring.listeners.len(), "portfolio wired");
    Ok(())
}

/// Run the profile picture upload for `file`.
#[wasm_bindgen(js_name = handleImageUpload)]
pub fn handle_image_upload(file: Option<File>) -> Result<(), JsValue> {
    run_upload(BindingKind::Profile, file)
}

/// Run the upload for company logo `slot` (1-based).
#[wasm_bindgen(js_name = handleLogoUpload)]
pub fn handle_logo_upload(slot: u32, file: Option<File>) -> Result<(), JsValue> {
    run_upload(BindingKind::Logo { slot }, file)
}

fn install_global() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let app = Object::new();
    set_js(
        &app,
        "initializePortfolio",
        Closure::<dyn FnMut(JsValue) -> Result<(), JsValue>>::new(|config: JsValue| {
            initialize_portfolio(config.as_string())
        })
        .into_js_value(),
    );
    set_js(
        &app,
        "handleImageUpload",
        Closure::<dyn FnMut(JsValue) -> Result<(), JsValue>>::new(|file: JsValue| {
            handle_image_upload(file.dyn_into::<File>().ok())
        })
        .into_js_value(),
    );
    set_js(
        &app,
        "handleLogoUpload",
        Closure::<dyn FnMut(u32, JsValue) -> Result<(), JsValue>>::new(
            |slot: u32, file: JsValue| handle_logo_upload(slot, file.dyn_into::<File>().ok()),
        )
        .into_js_value(),
    );
    set_js(window.unchecked_ref::<Object>(), "portfolioApp", app.into());
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    install_panic_hook();
    install_global();
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| js_error("no document available"))?;
    if document.ready_state() != "loading" {
        return initialize_portfolio(None);
    }
    let on_ready = Closure::<dyn FnMut(Event)>::new(|_: Event| {
        if let Err(err) = initialize_portfolio(None) {
            warn!(error = ?err, "portfolio initialization failed");
        }
    });
    document.add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())?;
    on_ready.forget();
    Ok(())
}
