//! Browser backend
//!
//! [`WebHost`] implements [`Host`] over `web-sys`. Every DOM listener,
//! observer callback, timer and playback promise it installs translates its
//! outcome into a [`PageEvent`] and hands it to the single [`Enhancer`]
//! living in a thread-local runtime.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use gloo_timers::callback::Timeout;
use js_sys::Array;
use thiserror::Error;
use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, HtmlInputElement, HtmlMediaElement,
    IntersectionObserver, IntersectionObserverEntry, KeyboardEvent, MouseEvent, TouchEvent,
    Window,
};

use crate::app::Enhancer;
use crate::config::EnhanceConfig;
use crate::input::{ClickInfo, Disposition, Key, Listen, PageEvent, Task, WindowSignal};
use crate::platform::Host;

/// Id of the optional `<script type="application/json">` override block
pub const CONFIG_ELEMENT_ID: &str = "page-enhance-config";

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("No global window object")]
    NoWindow,
    #[error("Window has no document")]
    NoDocument,
    #[error("Failed to install {event} listener: {message}")]
    ListenerInstallation { event: String, message: String },
}

struct Runtime {
    host: WebHost,
    enhancer: Option<Enhancer<WebHost>>,
}

thread_local! {
    static RUNTIME: RefCell<Option<Rc<RefCell<Runtime>>>> = const { RefCell::new(None) };
}

type Listener = Closure<dyn FnMut(Event)>;

/// A listener bound to one element, released when the element is removed
struct NodeListener {
    node: Element,
    kind: Listen,
    event_type: &'static str,
    closure: Listener,
}

struct ViewportObserver {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array)>,
}

pub struct WebHost {
    window: Window,
    document: Document,
    runtime: Weak<RefCell<Runtime>>,
    page_listeners: Vec<Listener>,
    node_listeners: Vec<NodeListener>,
    window_signals: Vec<WindowSignal>,
    document_clicks: bool,
    viewport: Option<ViewportObserver>,
}

/// Module entry point
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    tracing_wasm::set_as_global_default();
    boot().map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Activates now, or once the document has been parsed
fn boot() -> Result<(), PlatformError> {
    let window = web_sys::window().ok_or(PlatformError::NoWindow)?;
    let document = window.document().ok_or(PlatformError::NoDocument)?;

    if document.ready_state() != "loading" {
        return activate(window, document);
    }

    let deferred = Closure::once_into_js(move || {
        let Some(document) = window.document() else {
            warn!("document disappeared before activation");
            return;
        };
        if let Err(err) = activate(window, document) {
            warn!(error = %err, "page enhancement activation failed");
        }
    });
    let target: &EventTarget = document.as_ref();
    target
        .add_event_listener_with_callback("DOMContentLoaded", deferred.unchecked_ref())
        .map_err(|err| PlatformError::ListenerInstallation {
            event: "DOMContentLoaded".to_string(),
            message: js_message(&err),
        })
}

fn activate(window: Window, document: Document) -> Result<(), PlatformError> {
    let override_json = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content());
    let config = EnhanceConfig::load_or_default(override_json.as_deref());

    let runtime = Rc::new_cyclic(|weak: &Weak<RefCell<Runtime>>| {
        RefCell::new(Runtime {
            host: WebHost::new(window, document, weak.clone()),
            enhancer: None,
        })
    });

    {
        let mut guard = runtime.borrow_mut();
        let Runtime { host, enhancer } = &mut *guard;
        *enhancer = Some(Enhancer::activate(host, config));
        info!(
            listeners = host.page_listeners.len() + host.node_listeners.len(),
            "browser runtime installed"
        );
    }

    RUNTIME.with(|slot| *slot.borrow_mut() = Some(runtime));
    Ok(())
}

/// Hands one event to the enhancer
///
/// Events raised while another is still being handled are dropped.
fn dispatch(runtime: &Weak<RefCell<Runtime>>, event: PageEvent<Element>) -> Disposition {
    let Some(runtime) = runtime.upgrade() else {
        return Disposition::Proceed;
    };
    let Ok(mut guard) = runtime.try_borrow_mut() else {
        warn!(?event, "re-entrant page event dropped");
        return Disposition::Proceed;
    };

    let Runtime { host, enhancer } = &mut *guard;
    match enhancer {
        Some(enhancer) => enhancer.handle(host, event),
        None => Disposition::Proceed,
    }
}

fn js_message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn click_info(event: &Event) -> ClickInfo {
    match event.dyn_ref::<MouseEvent>() {
        Some(mouse) => ClickInfo {
            button: mouse.button(),
            meta: mouse.meta_key(),
            ctrl: mouse.ctrl_key(),
            shift: mouse.shift_key(),
            alt: mouse.alt_key(),
        },
        None => ClickInfo::primary(),
    }
}

fn first_touch_x(event: &Event) -> Option<f64> {
    let touch = event.dyn_ref::<TouchEvent>()?.touches().item(0)?;
    Some(f64::from(touch.client_x()))
}

impl WebHost {
    fn new(window: Window, document: Document, runtime: Weak<RefCell<Runtime>>) -> Self {
        Self {
            window,
            document,
            runtime,
            page_listeners: Vec::new(),
            node_listeners: Vec::new(),
            window_signals: Vec::new(),
            document_clicks: false,
            viewport: None,
        }
    }

    /// Installs a listener that turns DOM events into page events
    ///
    /// When `translate` yields nothing the event is ignored. A `Prevent`
    /// disposition cancels the browser default.
    fn install<F>(&self, target: &EventTarget, event_type: &str, translate: F) -> Option<Listener>
    where
        F: Fn(&Event) -> Option<PageEvent<Element>> + 'static,
    {
        let runtime = self.runtime.clone();
        let listener = Listener::new(move |event: Event| {
            let Some(page_event) = translate(&event) else {
                return;
            };
            if dispatch(&runtime, page_event).is_prevented() {
                event.prevent_default();
            }
        });

        match target.add_event_listener_with_callback(event_type, listener.as_ref().unchecked_ref()) {
            Ok(()) => Some(listener),
            Err(err) => {
                warn!(event_type, error = %js_message(&err), "listener not installed");
                None
            }
        }
    }

    /// Window and document listeners, kept for the life of the page
    fn add_page_listener<F>(&mut self, target: &EventTarget, event_type: &str, translate: F)
    where
        F: Fn(&Event) -> Option<PageEvent<Element>> + 'static,
    {
        if let Some(listener) = self.install(target, event_type, translate) {
            self.page_listeners.push(listener);
        }
    }

    fn add_node_listener<F>(&mut self, node: &Element, kind: Listen, event_type: &'static str, build: F)
    where
        F: Fn(Element, &Event) -> Option<PageEvent<Element>> + 'static,
    {
        let owner = node.clone();
        let installed = self.install(node.as_ref(), event_type, move |event| {
            build(owner.clone(), event)
        });
        if let Some(closure) = installed {
            self.node_listeners.push(NodeListener {
                node: node.clone(),
                kind,
                event_type,
                closure,
            });
        }
    }

    /// Detaches and frees every listener on `root` or its descendants
    ///
    /// A closure released while it is still running is freed by wasm-bindgen
    /// once it returns.
    fn release_listeners(&mut self, root: &Element) {
        let (released, kept): (Vec<NodeListener>, Vec<NodeListener>) =
            std::mem::take(&mut self.node_listeners)
                .into_iter()
                .partition(|listener| root.contains(Some(listener.node.as_ref())));
        self.node_listeners = kept;

        for listener in released {
            let target: &EventTarget = listener.node.as_ref();
            if let Err(err) = target.remove_event_listener_with_callback(
                listener.event_type,
                listener.closure.as_ref().unchecked_ref(),
            ) {
                debug!(error = %js_message(&err), "listener not detached");
            }
        }
    }

    fn html(node: &Element) -> Option<&HtmlElement> {
        node.dyn_ref::<HtmlElement>()
    }

    fn media(node: &Element) -> Option<&HtmlMediaElement> {
        node.dyn_ref::<HtmlMediaElement>()
    }
}

impl Host for WebHost {
    type Node = Element;
    type Timer = Timeout;

    fn by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        match self.document.query_selector_all(selector) {
            Ok(list) => (0..list.length())
                .filter_map(|i| list.item(i))
                .filter_map(|node| node.dyn_into::<Element>().ok())
                .collect(),
            Err(err) => {
                warn!(selector, error = %js_message(&err), "invalid selector");
                Vec::new()
            }
        }
    }

    fn query_in(&self, scope: &Element, selector: &str) -> Option<Element> {
        scope.query_selector(selector).ok().flatten()
    }

    fn query_all_in(&self, scope: &Element, selector: &str) -> Vec<Element> {
        match scope.query_selector_all(selector) {
            Ok(list) => (0..list.length())
                .filter_map(|i| list.item(i))
                .filter_map(|node| node.dyn_into::<Element>().ok())
                .collect(),
            Err(err) => {
                warn!(selector, error = %js_message(&err), "invalid selector");
                Vec::new()
            }
        }
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        ancestor.contains(Some(node.as_ref()))
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) {
        if let Err(err) = node.set_attribute(name, value) {
            debug!(name, error = %js_message(&err), "attribute not set");
        }
    }

    fn remove_attribute(&mut self, node: &Element, name: &str) {
        if let Err(err) = node.remove_attribute(name) {
            debug!(name, error = %js_message(&err), "attribute not removed");
        }
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&mut self, node: &Element, class: &str) {
        if let Err(err) = node.class_list().add_1(class) {
            debug!(class, error = %js_message(&err), "class not added");
        }
    }

    fn remove_class(&mut self, node: &Element, class: &str) {
        if let Err(err) = node.class_list().remove_1(class) {
            debug!(class, error = %js_message(&err), "class not removed");
        }
    }

    fn set_style(&mut self, node: &Element, property: &str, value: &str) {
        let Some(element) = Self::html(node) else {
            return;
        };
        let style = element.style();
        let result = if value.is_empty() {
            style.remove_property(property).map(|_| ())
        } else {
            style.set_property(property, value)
        };
        if let Err(err) = result {
            debug!(property, error = %js_message(&err), "style not applied");
        }
    }

    fn set_text(&mut self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn value(&self, node: &Element) -> String {
        node.dyn_ref::<HtmlInputElement>()
            .map(HtmlInputElement::value)
            .unwrap_or_default()
    }

    fn set_value(&mut self, node: &Element, value: &str) {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        }
    }

    fn blur(&mut self, node: &Element) {
        if let Some(element) = Self::html(node) {
            if let Err(err) = element.blur() {
                debug!(error = %js_message(&err), "blur failed");
            }
        }
    }

    fn create_element(&mut self, tag: &str, class: &str) -> Option<Element> {
        match self.document.create_element(tag) {
            Ok(element) => {
                if !class.is_empty() {
                    element.set_class_name(class);
                }
                Some(element)
            }
            Err(err) => {
                warn!(tag, error = %js_message(&err), "element not created");
                None
            }
        }
    }

    fn append_child(&mut self, parent: &Element, child: &Element) {
        if let Err(err) = parent.append_child(child) {
            warn!(error = %js_message(&err), "child not appended");
        }
    }

    fn remove(&mut self, node: &Element) {
        self.release_listeners(node);
        node.remove();
    }

    fn listen(&mut self, node: &Element, kind: Listen) {
        if self
            .node_listeners
            .iter()
            .any(|listener| listener.kind == kind && listener.node == *node)
        {
            return;
        }

        match kind {
            Listen::Click => self.add_node_listener(node, kind, "click", |node, event| {
                Some(PageEvent::Click {
                    node,
                    click: click_info(event),
                })
            }),
            Listen::Submit => {
                self.add_node_listener(node, kind, "submit", |node, _| Some(PageEvent::Submit { node }))
            }
            Listen::Input => {
                for event_type in ["input", "change"] {
                    self.add_node_listener(node, kind, event_type, |node, _| {
                        Some(PageEvent::Input { node })
                    });
                }
            }
            Listen::KeyUp => {
                self.add_node_listener(node, kind, "keyup", |node, _| Some(PageEvent::Input { node }))
            }
            Listen::KeyDown => self.add_node_listener(node, kind, "keydown", |node, event| {
                let key = event.dyn_ref::<KeyboardEvent>()?.key();
                Some(PageEvent::KeyDown {
                    node,
                    key: Key::from_dom(&key),
                })
            }),
            Listen::Touch => {
                self.add_node_listener(node, kind, "touchstart", |node, event| {
                    Some(PageEvent::TouchStart {
                        node,
                        x: first_touch_x(event)?,
                    })
                });
                self.add_node_listener(node, kind, "touchmove", |node, event| {
                    Some(PageEvent::TouchMove {
                        node,
                        x: first_touch_x(event)?,
                    })
                });
                self.add_node_listener(node, kind, "touchend", |node, _| {
                    Some(PageEvent::TouchEnd { node })
                });
            }
        }
    }

    fn listen_window(&mut self, signal: WindowSignal) {
        if self.window_signals.contains(&signal) {
            return;
        }
        self.window_signals.push(signal);

        let (target, event_type): (EventTarget, &str) = match signal {
            WindowSignal::Load => (self.window.clone().into(), "load"),
            WindowSignal::Resize => (self.window.clone().into(), "resize"),
            WindowSignal::VisibilityChange => (self.document.clone().into(), "visibilitychange"),
        };
        self.add_page_listener(&target, event_type, move |_| Some(PageEvent::Window(signal)));
    }

    fn listen_document_clicks(&mut self) {
        if self.document_clicks {
            return;
        }
        self.document_clicks = true;

        let target: EventTarget = self.document.clone().into();
        self.add_page_listener(&target, "click", |event| {
            let target = event.target()?.dyn_into::<Element>().ok()?;
            Some(PageEvent::DocumentClick { target })
        });
    }

    fn observe_viewport(&mut self, node: &Element) {
        if self.viewport.is_none() {
            let runtime = self.runtime.clone();
            let callback = Closure::<dyn FnMut(Array)>::new(move |entries: Array| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    dispatch(
                        &runtime,
                        PageEvent::Intersection {
                            node: entry.target(),
                            visible: entry.is_intersecting(),
                        },
                    );
                }
            });

            match IntersectionObserver::new(callback.as_ref().unchecked_ref()) {
                Ok(observer) => {
                    self.viewport = Some(ViewportObserver {
                        observer,
                        _callback: callback,
                    })
                }
                Err(err) => {
                    warn!(error = %js_message(&err), "intersection observer unavailable");
                    return;
                }
            }
        }

        if let Some(viewport) = &self.viewport {
            viewport.observer.observe(node);
        }
    }

    fn viewport_width(&self) -> u32 {
        self.window
            .inner_width()
            .ok()
            .and_then(|width| width.as_f64())
            .map(|width| width.max(0.0) as u32)
            .unwrap_or(0)
    }

    fn document_hidden(&self) -> bool {
        self.document.hidden()
    }

    fn is_loaded(&self) -> bool {
        self.document.ready_state() == "complete"
    }

    /// A dialog that cannot be shown counts as declined
    fn confirm(&mut self, message: &str) -> bool {
        self.window.confirm_with_message(message).unwrap_or(false)
    }

    fn navigate(&mut self, url: &str) {
        if let Err(err) = self.window.location().set_href(url) {
            warn!(url, error = %js_message(&err), "navigation failed");
        }
    }

    fn play_media(&mut self, node: &Element) {
        let Some(media) = Self::media(node) else {
            return;
        };
        let promise = match media.play() {
            Ok(promise) => promise,
            Err(err) => {
                let reason = js_message(&err);
                dispatch_later(&self.runtime, PageEvent::PlaybackRejected {
                    node: node.clone(),
                    reason,
                });
                return;
            }
        };

        let runtime = self.runtime.clone();
        let node = node.clone();
        spawn_local(async move {
            if let Err(err) = JsFuture::from(promise).await {
                dispatch(
                    &runtime,
                    PageEvent::PlaybackRejected {
                        node,
                        reason: js_message(&err),
                    },
                );
            }
        });
    }

    fn pause_media(&mut self, node: &Element) {
        if let Some(media) = Self::media(node) {
            if let Err(err) = media.pause() {
                debug!(error = %js_message(&err), "pause failed");
            }
        }
    }

    fn set_timeout(&mut self, delay: Duration, task: Task<Element>) -> Timeout {
        let runtime = self.runtime.clone();
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, move || {
            dispatch(&runtime, PageEvent::Timer(task));
        })
    }

    fn clear_timeout(&mut self, timer: Timeout) {
        // Dropping a pending Timeout clears it
        drop(timer);
    }
}

/// Delivers an event after the current dispatch has returned
fn dispatch_later(runtime: &Weak<RefCell<Runtime>>, event: PageEvent<Element>) {
    let runtime = runtime.clone();
    spawn_local(async move {
        dispatch(&runtime, event);
    });
}
