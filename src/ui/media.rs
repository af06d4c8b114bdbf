//! Background video lifecycle
//!
//! Plays the hero video when the page is loaded, visible and the video is in
//! the viewport; pauses it when it scrolls out. A rejected play request
//! (autoplay policy) hides the video for good instead of leaving a stalled
//! frame on screen.

use tracing::{debug, warn};

use crate::config::Selectors;
use crate::input::WindowSignal;
use crate::platform::Host;

/// Playback lifecycle of the hero video
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing requested yet
    Idle,
    /// A play request is in flight or succeeded
    Playing,
    /// Paused because the video left the viewport
    Paused,
    /// Playback was refused; terminal
    Hidden,
}

pub struct MediaController<H: Host> {
    video: H::Node,
    state: PlaybackState,
}

impl<H: Host> MediaController<H> {
    /// Binds to the hero video and starts playback if the page is already loaded
    ///
    /// # Returns
    /// None when the page has no hero video
    pub fn activate(host: &mut H, selectors: &Selectors) -> Option<Self> {
        let video = host.by_id(&selectors.hero_video_id)?;

        host.remove_attribute(&video, "controls");
        host.listen_window(WindowSignal::VisibilityChange);
        host.observe_viewport(&video);

        let mut controller = Self {
            video,
            state: PlaybackState::Idle,
        };

        if host.is_loaded() {
            controller.try_play(host);
        } else {
            host.listen_window(WindowSignal::Load);
        }

        Some(controller)
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn owns(&self, node: &H::Node) -> bool {
        self.video == *node
    }

    pub fn on_load(&mut self, host: &mut H) {
        self.try_play(host);
    }

    pub fn on_visibility_change(&mut self, host: &mut H) {
        if !host.document_hidden() {
            self.try_play(host);
        }
    }

    pub fn on_intersection(&mut self, host: &mut H, visible: bool) {
        if visible {
            self.try_play(host);
        } else if self.state == PlaybackState::Playing {
            host.pause_media(&self.video);
            self.state = PlaybackState::Paused;
            debug!("hero video left the viewport, paused");
        }
    }

    /// Converts a refused play request into a permanent hide
    pub fn on_playback_rejected(&mut self, host: &mut H, reason: &str) {
        warn!(reason, "video autoplay failed, hiding background video");
        host.set_style(&self.video, "display", "none");
        self.state = PlaybackState::Hidden;
    }

    fn try_play(&mut self, host: &mut H) {
        if self.state == PlaybackState::Hidden {
            return;
        }
        host.play_media(&self.video);
        self.state = PlaybackState::Playing;
    }
}
