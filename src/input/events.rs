//! Page events delivered by the platform
//!
//! The platform translates DOM events, observer callbacks, promise outcomes
//! and timer expiry into [`PageEvent`]s. Components never receive raw
//! browser events and never hold callbacks into their own state.

/// Listener kinds a component can request on one of its elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listen {
    /// `click`
    Click,
    /// `submit`
    Submit,
    /// `input` and `change`
    Input,
    /// `keyup`, delivered as [`PageEvent::Input`]
    KeyUp,
    /// `keydown`
    KeyDown,
    /// `touchstart`, `touchmove` and `touchend`
    Touch,
}

/// Window- and document-level signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowSignal {
    /// Window `load`
    Load,
    /// Window `resize`
    Resize,
    /// Document `visibilitychange`
    VisibilityChange,
}

/// Button and modifier state of a click
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickInfo {
    pub button: i16,
    pub meta: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl ClickInfo {
    /// A plain left click
    pub fn primary() -> Self {
        Self::default()
    }

    /// True for a primary-button click with no modifier keys held
    ///
    /// Anything else (middle click, ctrl/cmd-click, shift-click) carries a
    /// browser affordance such as opening a new tab and must not be intercepted.
    pub fn is_plain_primary(&self) -> bool {
        self.button == 0 && !(self.meta || self.ctrl || self.shift || self.alt)
    }
}

/// Keys the behavior layer reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other(String),
}

impl Key {
    /// Converts a `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Key::Escape,
            other => Key::Other(other.to_string()),
        }
    }
}

/// Work scheduled on a timer, handed back when the timer fires
#[derive(Debug, Clone, PartialEq)]
pub enum Task<N> {
    /// A notification reached its auto-dismiss deadline
    DismissNotification(N),
    /// A hiding notification finished its exit animation
    RemoveNotification(N),
    /// The search input has been quiet long enough
    FilterSearch,
    /// Resizing has settled
    SyncNav,
    /// The exit animation of a transition link is over
    Navigate(String),
}

/// Everything the platform can report to the behavior layer
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent<N> {
    Window(WindowSignal),
    Intersection { node: N, visible: bool },
    Click { node: N, click: ClickInfo },
    /// A click anywhere in the document, after element listeners ran
    DocumentClick { target: N },
    Submit { node: N },
    Input { node: N },
    KeyDown { node: N, key: Key },
    TouchStart { node: N, x: f64 },
    TouchMove { node: N, x: f64 },
    TouchEnd { node: N },
    PlaybackRejected { node: N, reason: String },
    Timer(Task<N>),
}

/// What the platform should do with the browser default action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disposition {
    #[default]
    Proceed,
    Prevent,
}

impl Disposition {
    pub fn is_prevented(self) -> bool {
        matches!(self, Disposition::Prevent)
    }
}
