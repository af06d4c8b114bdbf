//! Page host abstraction
//!
//! Components never touch the browser directly. Everything they read or
//! mutate on the page goes through [`Host`], which the wasm backend
//! implements over `web-sys` and tests implement with an in-memory page.

use std::fmt::Debug;
use std::time::Duration;

use crate::input::{Listen, Task, WindowSignal};

#[cfg(test)]
pub mod memory;
#[cfg(target_arch = "wasm32")]
pub mod web;

/// The page as seen by the behavior layer
///
/// Lookups return `Option`/`Vec` so that an absent element is an ordinary
/// value. Mutations on nodes that are no longer attached are harmless no-ops.
/// Asynchronous outcomes (timers, playback rejection, intersection changes)
/// come back through [`crate::input::PageEvent`], never through callbacks.
pub trait Host {
    /// Handle to an element; equality is identity
    type Node: Clone + PartialEq + Debug;
    /// Handle to a pending timeout
    type Timer;

    fn by_id(&self, id: &str) -> Option<Self::Node>;
    fn query(&self, selector: &str) -> Option<Self::Node>;
    fn query_all(&self, selector: &str) -> Vec<Self::Node>;
    fn query_in(&self, scope: &Self::Node, selector: &str) -> Option<Self::Node>;
    fn query_all_in(&self, scope: &Self::Node, selector: &str) -> Vec<Self::Node>;
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;
    /// True when `node` is `ancestor` or one of its descendants
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);
    fn remove_attribute(&mut self, node: &Self::Node, name: &str);
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn add_class(&mut self, node: &Self::Node, class: &str);
    fn remove_class(&mut self, node: &Self::Node, class: &str);
    /// Sets an inline style property; an empty value clears it
    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str);
    fn set_text(&mut self, node: &Self::Node, text: &str);
    /// Current value of a form control
    fn value(&self, node: &Self::Node) -> String;
    fn set_value(&mut self, node: &Self::Node, value: &str);
    fn blur(&mut self, node: &Self::Node);

    /// Creates a detached element with the given class attribute
    fn create_element(&mut self, tag: &str, class: &str) -> Option<Self::Node>;
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node);
    /// Detaches the element; listeners on it and its descendants are released
    fn remove(&mut self, node: &Self::Node);

    /// Idempotent per (node, kind): components sharing an element share one listener
    fn listen(&mut self, node: &Self::Node, kind: Listen);
    /// Idempotent: a signal is delivered once no matter how often it is requested
    fn listen_window(&mut self, signal: WindowSignal);
    /// Idempotent, like [`Host::listen_window`]
    fn listen_document_clicks(&mut self);
    fn observe_viewport(&mut self, node: &Self::Node);

    fn viewport_width(&self) -> u32;
    fn document_hidden(&self) -> bool;
    fn is_loaded(&self) -> bool;

    /// Asks the operator a yes/no question, blocking until answered
    fn confirm(&mut self, message: &str) -> bool;
    fn navigate(&mut self, url: &str);
    /// Starts playback; rejection arrives later as `PlaybackRejected`
    fn play_media(&mut self, node: &Self::Node);
    fn pause_media(&mut self, node: &Self::Node);

    /// Schedules `task` to be delivered as `PageEvent::Timer` after `delay`
    fn set_timeout(&mut self, delay: Duration, task: Task<Self::Node>) -> Self::Timer;
    fn clear_timeout(&mut self, timer: Self::Timer);
}
