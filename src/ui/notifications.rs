//! Dismissible notification widgets
//!
//! Each widget moves through `Visible -> (Dragging) -> Hiding -> Removed`.
//! Hiding adds the `hide` class and schedules removal after the settle delay,
//! so the exit animation always gets to finish and the element is always
//! removed even when no animation runs. Every timer a widget owns is
//! cancelled before or at removal.

use std::time::Duration;

use tracing::debug;

use crate::app::timer::TimerSlot;
use crate::config::EnhanceConfig;
use crate::domain::severity::Severity;
use crate::domain::swipe::{DragGesture, SwipeRelease, SwipeTuning};
use crate::input::{Listen, Task};
use crate::platform::Host;

const HIDE_CLASS: &str = "hide";

/// Lifecycle of one notification widget
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidgetPhase {
    Visible,
    Dragging(DragGesture),
    Hiding,
    Removed,
}

/// Why a widget started hiding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    Deadline,
    CloseButton,
    Swipe,
}

struct Notification<H: Host> {
    node: H::Node,
    close: Option<H::Node>,
    severity: Severity,
    phase: WidgetPhase,
    deadline: TimerSlot<H>,
    removal: TimerSlot<H>,
}

pub struct NotificationManager<H: Host> {
    widgets: Vec<Notification<H>>,
    settle: Duration,
    swipe: SwipeTuning,
}

impl<H: Host> NotificationManager<H> {
    /// Binds every notification present on the page and arms its deadline
    pub fn activate(host: &mut H, config: &EnhanceConfig) -> Self {
        let selectors = &config.selectors;
        let mut widgets = Vec::new();

        for node in host.query_all(&selectors.notification) {
            let severity = Severity::classify(|class| host.has_class(&node, class));
            let close = host.query_in(&node, &selectors.notification_close);

            if let Some(close) = &close {
                host.listen(close, Listen::Click);
            }
            host.listen(&node, Listen::Touch);

            let mut deadline = TimerSlot::new();
            deadline.schedule(
                host,
                config.timings.dismiss_after(severity),
                Task::DismissNotification(node.clone()),
            );

            widgets.push(Notification {
                node,
                close,
                severity,
                phase: WidgetPhase::Visible,
                deadline,
                removal: TimerSlot::new(),
            });
        }

        Self {
            widgets,
            settle: config.timings.hide_settle(),
            swipe: config.swipe.tuning(),
        }
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Current phase of the widget bound to `node`
    pub fn phase(&self, node: &H::Node) -> Option<WidgetPhase> {
        self.widgets.iter().find(|w| w.node == *node).map(|w| w.phase)
    }

    pub fn owns_widget(&self, node: &H::Node) -> bool {
        self.widgets.iter().any(|w| w.node == *node)
    }

    pub fn owns_close(&self, node: &H::Node) -> bool {
        self.widgets.iter().any(|w| w.close.as_ref() == Some(node))
    }

    pub fn on_close_click(&mut self, host: &mut H, node: &H::Node) {
        if let Some(index) = self.widgets.iter().position(|w| w.close.as_ref() == Some(node)) {
            self.hide(host, index, DismissReason::CloseButton);
        }
    }

    pub fn on_deadline(&mut self, host: &mut H, node: &H::Node) {
        if let Some(index) = self.index_of(node) {
            if self.widgets[index].deadline.fired() {
                self.hide(host, index, DismissReason::Deadline);
            }
        }
    }

    pub fn on_removal_due(&mut self, host: &mut H, node: &H::Node) {
        let Some(index) = self.index_of(node) else {
            return;
        };
        let widget = &mut self.widgets[index];
        if !widget.removal.fired() {
            return;
        }

        widget.deadline.cancel(host);
        host.remove(&widget.node);
        widget.phase = WidgetPhase::Removed;
        debug!(severity = ?widget.severity, "notification removed");
    }

    pub fn on_touch_start(&mut self, node: &H::Node, x: f64) {
        if let Some(index) = self.index_of(node) {
            let widget = &mut self.widgets[index];
            if widget.phase == WidgetPhase::Visible {
                widget.phase = WidgetPhase::Dragging(DragGesture::begin(x));
            }
        }
    }

    pub fn on_touch_move(&mut self, host: &mut H, node: &H::Node, x: f64) {
        let Some(index) = self.index_of(node) else {
            return;
        };
        let widget = &mut self.widgets[index];
        let WidgetPhase::Dragging(mut gesture) = widget.phase else {
            return;
        };

        gesture.move_to(x);
        widget.phase = WidgetPhase::Dragging(gesture);

        if let Some(feedback) = gesture.feedback(&self.swipe) {
            host.set_style(
                &widget.node,
                "transform",
                &format!("translateX({}px)", feedback.offset_px),
            );
            host.set_style(&widget.node, "opacity", &feedback.opacity.to_string());
        }
    }

    pub fn on_touch_end(&mut self, host: &mut H, node: &H::Node) {
        let Some(index) = self.index_of(node) else {
            return;
        };
        let WidgetPhase::Dragging(gesture) = self.widgets[index].phase else {
            return;
        };

        self.widgets[index].phase = WidgetPhase::Visible;
        match gesture.release(&self.swipe) {
            SwipeRelease::Dismiss => self.hide(host, index, DismissReason::Swipe),
            SwipeRelease::Revert => {
                let widget = &self.widgets[index];
                host.set_style(&widget.node, "transform", "");
                host.set_style(&widget.node, "opacity", "");
            }
        }
    }

    fn index_of(&self, node: &H::Node) -> Option<usize> {
        self.widgets.iter().position(|w| w.node == *node)
    }

    fn hide(&mut self, host: &mut H, index: usize, reason: DismissReason) {
        let widget = &mut self.widgets[index];
        if !matches!(widget.phase, WidgetPhase::Visible | WidgetPhase::Dragging(_)) {
            return;
        }

        widget.deadline.cancel(host);
        host.add_class(&widget.node, HIDE_CLASS);
        widget.removal.schedule(
            host,
            self.settle,
            Task::RemoveNotification(widget.node.clone()),
        );
        widget.phase = WidgetPhase::Hiding;
        debug!(?reason, severity = ?widget.severity, "hiding notification");
    }
}
