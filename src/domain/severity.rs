//! Notification severity and auto-dismiss deadlines
//!
//! Severity is read from the widget's class list. The deadline grows with
//! severity so that errors stay on screen longer than routine notices.

/// Severity of a notification widget, ordered from least to most urgent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warning,
    Danger,
}

impl Severity {
    pub const DANGER_DEADLINE_MS: u64 = 8000;
    pub const WARNING_DEADLINE_MS: u64 = 6000;
    pub const INFO_DEADLINE_MS: u64 = 4000;

    /// Classifies a widget from its class list
    ///
    /// `danger` and `error` both mean danger. Anything that is neither
    /// danger nor `warning` is treated as informational.
    ///
    /// # Arguments
    /// * `has_class` - Predicate answering whether the widget carries a class
    pub fn classify(has_class: impl Fn(&str) -> bool) -> Self {
        if has_class("danger") || has_class("error") {
            Severity::Danger
        } else if has_class("warning") {
            Severity::Warning
        } else {
            Severity::Info
        }
    }
}
