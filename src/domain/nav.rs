//! Responsive navigation state machine
//!
//! The menu is either collapsed or expanded. It only exists in mobile mode,
//! which is derived from the viewport width. Leaving mobile mode always
//! collapses the menu so no stale expanded state survives a breakpoint crossing.

/// Menu panel state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavMenu {
    #[default]
    Collapsed,
    Expanded,
}

/// Events that drive the menu state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    /// The toggle control was activated
    Toggle,
    /// A click landed outside the navigation container
    OutsideClick,
    /// The viewport grew past the mobile breakpoint
    LeftMobile,
}

impl NavMenu {
    /// Processes an event and returns the new state
    pub fn process(self, event: NavEvent) -> NavMenu {
        match (self, event) {
            (NavMenu::Collapsed, NavEvent::Toggle) => NavMenu::Expanded,
            (NavMenu::Expanded, NavEvent::Toggle) => NavMenu::Collapsed,
            (_, NavEvent::OutsideClick) | (_, NavEvent::LeftMobile) => NavMenu::Collapsed,
        }
    }

    pub fn is_expanded(self) -> bool {
        matches!(self, NavMenu::Expanded)
    }

    /// Glyph shown on the toggle control for this state
    pub fn glyph(self) -> &'static str {
        match self {
            NavMenu::Collapsed => "☰",
            NavMenu::Expanded => "✕",
        }
    }

    /// Value for the toggle's `aria-expanded` attribute
    pub fn aria_expanded(self) -> &'static str {
        if self.is_expanded() { "true" } else { "false" }
    }
}

/// Layout mode derived from the viewport width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavMode {
    Desktop,
    Mobile,
}

impl NavMode {
    /// Mobile mode applies at or below the breakpoint
    pub fn for_width(width: u32, breakpoint: u32) -> Self {
        if width <= breakpoint {
            NavMode::Mobile
        } else {
            NavMode::Desktop
        }
    }
}
