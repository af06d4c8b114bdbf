//! Responsive navigation toggle
//!
//! In mobile mode exactly one toggle control lives inside the nav container.
//! The toggle glyph, its `aria-expanded` and the panel's `show-mobile` class
//! are always rendered together from [`NavMenu`]. Growing past the breakpoint
//! removes the toggle and collapses the panel.

use std::time::Duration;

use tracing::debug;

use crate::app::timer::TimerSlot;
use crate::config::EnhanceConfig;
use crate::domain::nav::{NavEvent, NavMenu, NavMode};
use crate::input::{Listen, Task, WindowSignal};
use crate::platform::Host;

const TOGGLE_SELECTOR: &str = ".mobile-menu-btn";
const TOGGLE_CLASS: &str = "mobile-menu-btn btn ghost";
const EXPANDED_CLASS: &str = "show-mobile";

pub struct NavController<H: Host> {
    nav: H::Node,
    links: H::Node,
    toggle: Option<H::Node>,
    menu: NavMenu,
    resize: TimerSlot<H>,
    breakpoint: u32,
    debounce: Duration,
}

impl<H: Host> NavController<H> {
    /// # Returns
    /// None unless both the nav container and its link panel exist
    pub fn activate(host: &mut H, config: &EnhanceConfig) -> Option<Self> {
        let nav = host.query(&config.selectors.nav)?;
        let links = host.query(&config.selectors.nav_links)?;

        host.listen_window(WindowSignal::Resize);
        host.listen_window(WindowSignal::Load);
        host.listen_document_clicks();

        let mut controller = Self {
            nav,
            links,
            toggle: None,
            menu: NavMenu::default(),
            resize: TimerSlot::new(),
            breakpoint: config.nav_breakpoint_px,
            debounce: config.timings.resize_debounce(),
        };
        controller.sync(host);
        Some(controller)
    }

    pub fn menu(&self) -> NavMenu {
        self.menu
    }

    pub fn owns_toggle(&self, node: &H::Node) -> bool {
        self.toggle.as_ref() == Some(node)
    }

    pub fn on_load(&mut self, host: &mut H) {
        self.sync(host);
    }

    pub fn on_resize(&mut self, host: &mut H) {
        self.resize.schedule(host, self.debounce, Task::SyncNav);
    }

    pub fn on_resize_settled(&mut self, host: &mut H) {
        if self.resize.fired() {
            self.sync(host);
        }
    }

    pub fn on_toggle_click(&mut self, host: &mut H) {
        self.transition(host, NavEvent::Toggle);
    }

    pub fn on_document_click(&mut self, host: &mut H, target: &H::Node) {
        if self.menu.is_expanded() && !host.contains(&self.nav, target) {
            self.transition(host, NavEvent::OutsideClick);
        }
    }

    /// Reconciles toggle presence and menu state with the viewport width
    fn sync(&mut self, host: &mut H) {
        match NavMode::for_width(host.viewport_width(), self.breakpoint) {
            NavMode::Mobile => {
                if self.toggle.is_none() {
                    self.toggle = self.install_toggle(host);
                    debug!("mobile navigation enabled");
                }
            }
            NavMode::Desktop => {
                if let Some(toggle) = self.toggle.take() {
                    host.remove(&toggle);
                    debug!("mobile navigation disabled");
                }
                // Server-rendered toggles never bound in mobile mode
                for stray in host.query_all_in(&self.nav, TOGGLE_SELECTOR) {
                    host.remove(&stray);
                }
                self.menu = self.menu.process(NavEvent::LeftMobile);
            }
        }
        self.render(host);
    }

    fn install_toggle(&self, host: &mut H) -> Option<H::Node> {
        let toggle = match host.query_in(&self.nav, TOGGLE_SELECTOR) {
            Some(existing) => existing,
            None => {
                let button = host.create_element("button", TOGGLE_CLASS)?;
                host.set_attribute(&button, "type", "button");
                host.set_attribute(&button, "aria-label", "Toggle navigation menu");
                host.append_child(&self.nav, &button);
                button
            }
        };
        host.listen(&toggle, Listen::Click);
        Some(toggle)
    }

    fn transition(&mut self, host: &mut H, event: NavEvent) {
        self.menu = self.menu.process(event);
        self.render(host);
    }

    fn render(&self, host: &mut H) {
        if self.menu.is_expanded() {
            host.add_class(&self.links, EXPANDED_CLASS);
        } else {
            host.remove_class(&self.links, EXPANDED_CLASS);
        }
        if let Some(toggle) = &self.toggle {
            host.set_text(toggle, self.menu.glyph());
            host.set_attribute(toggle, "aria-expanded", self.menu.aria_expanded());
        }
    }
}
