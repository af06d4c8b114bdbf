//! Activation entry point and event routing
//!
//! [`Enhancer`] owns every component. [`Enhancer::activate`] runs once per
//! page load and wires listeners; [`Enhancer::handle`] routes each platform
//! event to the component that owns the event's element or signal.

use tracing::{debug, info};

use crate::config::EnhanceConfig;
use crate::input::{Disposition, PageEvent, Task, WindowSignal};
use crate::platform::Host;
use crate::ui::{
    bind_backgrounds, DestructiveGuard, MediaController, NavController, NotificationManager,
    PasswordMatch, SearchFilter, TransitionCoordinator,
};

pub struct Enhancer<H: Host> {
    media: Option<MediaController<H>>,
    notifications: NotificationManager<H>,
    transition: TransitionCoordinator<H>,
    password: Option<PasswordMatch<H>>,
    guard: DestructiveGuard<H>,
    search: Option<SearchFilter<H>>,
    nav: Option<NavController<H>>,
}

impl<H: Host> Enhancer<H> {
    /// Binds every component to whatever elements the page provides
    ///
    /// Components whose elements are missing are skipped; activation itself
    /// cannot fail.
    pub fn activate(host: &mut H, config: EnhanceConfig) -> Self {
        let media = MediaController::activate(host, &config.selectors);
        let notifications = NotificationManager::activate(host, &config);
        let backgrounds = bind_backgrounds(host, &config.selectors.background);
        let transition = TransitionCoordinator::activate(host, &config);
        let password = PasswordMatch::activate(host, &config);
        let guard = DestructiveGuard::activate(host, &config.selectors.confirm_form);
        let search = SearchFilter::activate(host, &config);
        let nav = NavController::activate(host, &config);

        info!(
            media = ?media.as_ref().map(MediaController::state),
            notifications = notifications.len(),
            backgrounds,
            password = password.is_some(),
            search = search.is_some(),
            nav = nav.is_some(),
            "page enhancements activated"
        );

        Self {
            media,
            notifications,
            transition,
            password,
            guard,
            search,
            nav,
        }
    }

    pub fn media(&self) -> Option<&MediaController<H>> {
        self.media.as_ref()
    }

    pub fn notifications(&self) -> &NotificationManager<H> {
        &self.notifications
    }

    pub fn search(&self) -> Option<&SearchFilter<H>> {
        self.search.as_ref()
    }

    pub fn nav(&self) -> Option<&NavController<H>> {
        self.nav.as_ref()
    }

    /// Routes one event
    ///
    /// # Returns
    /// Whether the platform should suppress the browser's default action
    pub fn handle(&mut self, host: &mut H, event: PageEvent<H::Node>) -> Disposition {
        match event {
            PageEvent::Window(signal) => {
                self.on_window(host, signal);
                Disposition::Proceed
            }
            PageEvent::Intersection { node, visible } => {
                if let Some(media) = self.media.as_mut().filter(|m| m.owns(&node)) {
                    media.on_intersection(host, visible);
                }
                Disposition::Proceed
            }
            PageEvent::PlaybackRejected { node, reason } => {
                if let Some(media) = self.media.as_mut().filter(|m| m.owns(&node)) {
                    media.on_playback_rejected(host, &reason);
                }
                Disposition::Proceed
            }
            PageEvent::Click { node, click } => {
                if self.transition.owns_link(&node) {
                    return self.transition.on_link_click(host, &node, click);
                }
                if self.notifications.owns_close(&node) {
                    self.notifications.on_close_click(host, &node);
                } else if let Some(search) = self.search.as_mut().filter(|s| s.owns_clear(&node)) {
                    search.on_clear_click(host);
                } else if let Some(nav) = self.nav.as_mut().filter(|n| n.owns_toggle(&node)) {
                    nav.on_toggle_click(host);
                }
                Disposition::Proceed
            }
            PageEvent::DocumentClick { target } => {
                if let Some(nav) = self.nav.as_mut() {
                    nav.on_document_click(host, &target);
                }
                Disposition::Proceed
            }
            PageEvent::Submit { node } => {
                if self.guard.owns(&node) && self.guard.on_submit(host, &node).is_prevented() {
                    return Disposition::Prevent;
                }
                if self.transition.owns_form(&node) {
                    return self.transition.on_form_submit(host, &node);
                }
                Disposition::Proceed
            }
            PageEvent::Input { node } => {
                if let Some(password) = self.password.as_mut().filter(|p| p.owns(&node)) {
                    password.on_input(host);
                }
                if let Some(search) = self.search.as_mut().filter(|s| s.owns_input(&node)) {
                    search.on_input(host);
                }
                Disposition::Proceed
            }
            PageEvent::KeyDown { node, key } => {
                if let Some(search) = self.search.as_mut().filter(|s| s.owns_input(&node)) {
                    search.on_key_down(host, &key);
                }
                Disposition::Proceed
            }
            PageEvent::TouchStart { node, x } if self.notifications.owns_widget(&node) => {
                self.notifications.on_touch_start(&node, x);
                Disposition::Proceed
            }
            PageEvent::TouchMove { node, x } if self.notifications.owns_widget(&node) => {
                self.notifications.on_touch_move(host, &node, x);
                Disposition::Proceed
            }
            PageEvent::TouchEnd { node } if self.notifications.owns_widget(&node) => {
                self.notifications.on_touch_end(host, &node);
                Disposition::Proceed
            }
            PageEvent::TouchStart { .. } | PageEvent::TouchMove { .. } | PageEvent::TouchEnd { .. } => {
                Disposition::Proceed
            }
            PageEvent::Timer(task) => {
                self.on_timer(host, task);
                Disposition::Proceed
            }
        }
    }

    fn on_window(&mut self, host: &mut H, signal: WindowSignal) {
        match signal {
            WindowSignal::Load => {
                if let Some(media) = self.media.as_mut() {
                    media.on_load(host);
                }
                if let Some(nav) = self.nav.as_mut() {
                    nav.on_load(host);
                }
            }
            WindowSignal::Resize => {
                if let Some(nav) = self.nav.as_mut() {
                    nav.on_resize(host);
                }
            }
            WindowSignal::VisibilityChange => {
                if let Some(media) = self.media.as_mut() {
                    media.on_visibility_change(host);
                }
            }
        }
    }

    fn on_timer(&mut self, host: &mut H, task: Task<H::Node>) {
        match task {
            Task::DismissNotification(node) => self.notifications.on_deadline(host, &node),
            Task::RemoveNotification(node) => self.notifications.on_removal_due(host, &node),
            Task::FilterSearch => {
                if let Some(search) = self.search.as_mut() {
                    search.on_debounce(host);
                }
            }
            Task::SyncNav => {
                if let Some(nav) = self.nav.as_mut() {
                    nav.on_resize_settled(host);
                }
            }
            Task::Navigate(href) => self.transition.on_navigate_due(host, &href),
        }
        debug!("timer task handled");
    }
}
