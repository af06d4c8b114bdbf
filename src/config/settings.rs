use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::domain::severity::Severity;
use crate::domain::swipe::SwipeTuning;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Navigation breakpoint must be greater than zero")]
    InvalidBreakpoint,
    #[error("Swipe settings are out of range: {reason}")]
    InvalidSwipe { reason: String },
}

/// Everything the behavior layer reads from the page and every timing it uses
///
/// Defaults match the markup contract of the server-rendered templates.
/// A partial JSON document can override any field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnhanceConfig {
    pub selectors: Selectors,
    pub timings: Timings,
    pub swipe: SwipeSettings,
    pub nav_breakpoint_px: u32,
    pub password_min_len: usize,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            selectors: Selectors::default(),
            timings: Timings::default(),
            swipe: SwipeSettings::default(),
            nav_breakpoint_px: Self::DEFAULT_NAV_BREAKPOINT,
            password_min_len: Self::DEFAULT_PASSWORD_MIN_LEN,
        }
    }
}

impl EnhanceConfig {
    pub const DEFAULT_NAV_BREAKPOINT: u32 = 768;
    pub const DEFAULT_PASSWORD_MIN_LEN: usize = 6;

    /// Parses and validates a JSON override document
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: EnhanceConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Uses the override document when present and valid, defaults otherwise
    ///
    /// A broken override never stops activation: it is logged and ignored.
    pub fn load_or_default(raw: Option<&str>) -> Self {
        let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
            return Self::default();
        };

        match Self::from_json(raw) {
            Ok(config) => config,
            Err(err) => {
                warn!(error = %err, "ignoring page configuration override");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nav_breakpoint_px == 0 {
            return Err(ConfigError::InvalidBreakpoint);
        }
        self.swipe.validate()
    }
}

/// A form whose submission swaps out a visual
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmitSwap {
    pub form_id: String,
    pub visual: String,
}

/// Element ids and selectors consumed from the page
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub hero_video_id: String,
    pub notification: String,
    pub notification_close: String,
    pub background: String,
    pub transition_link: String,
    pub transition_container: String,
    pub transition_visual: String,
    pub transition_card: String,
    pub submit_swaps: Vec<SubmitSwap>,
    pub password_id: String,
    pub confirm_password_id: String,
    pub confirm_form: String,
    pub search_input_id: String,
    pub search_grid_id: String,
    pub search_card: String,
    pub nav: String,
    pub nav_links: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            hero_video_id: "heroVideo".into(),
            notification: ".flash".into(),
            notification_close: ".flash-close".into(),
            background: ".auth-visual.bg[data-bg]".into(),
            transition_link: "[data-auth-transition]".into(),
            transition_container: ".auth-split".into(),
            transition_visual: ".auth-visual.bg".into(),
            transition_card: ".auth-card".into(),
            submit_swaps: vec![
                SubmitSwap {
                    form_id: "registerForm".into(),
                    visual: ".auth-visual.bg[data-bg*=\"image3.jpg\"]".into(),
                },
                SubmitSwap {
                    form_id: "loginForm".into(),
                    visual: ".auth-visual.bg[data-bg*=\"image4.jpg\"]".into(),
                },
            ],
            password_id: "password".into(),
            confirm_password_id: "confirm_password".into(),
            confirm_form: "form[data-confirm]".into(),
            search_input_id: "searchListings".into(),
            search_grid_id: "listingGrid".into(),
            search_card: ".listing-card".into(),
            nav: ".nav".into(),
            nav_links: ".navlinks".into(),
        }
    }
}

/// Delays, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Timings {
    pub danger_dismiss_ms: u64,
    pub warning_dismiss_ms: u64,
    pub info_dismiss_ms: u64,
    pub hide_settle_ms: u64,
    pub search_debounce_ms: u64,
    pub card_stagger_ms: u64,
    pub resize_debounce_ms: u64,
    pub transition_delay_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            danger_dismiss_ms: Severity::DANGER_DEADLINE_MS,
            warning_dismiss_ms: Severity::WARNING_DEADLINE_MS,
            info_dismiss_ms: Severity::INFO_DEADLINE_MS,
            hide_settle_ms: 300,
            search_debounce_ms: 300,
            card_stagger_ms: 50,
            resize_debounce_ms: 250,
            transition_delay_ms: 350,
        }
    }
}

impl Timings {
    pub fn dismiss_after(&self, severity: Severity) -> Duration {
        Duration::from_millis(match severity {
            Severity::Danger => self.danger_dismiss_ms,
            Severity::Warning => self.warning_dismiss_ms,
            Severity::Info => self.info_dismiss_ms,
        })
    }

    pub fn hide_settle(&self) -> Duration {
        Duration::from_millis(self.hide_settle_ms)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn card_stagger(&self) -> Duration {
        Duration::from_millis(self.card_stagger_ms)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_delay_ms)
    }
}

/// Swipe-to-dismiss tuning as it appears in the override document
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SwipeSettings {
    pub threshold_px: f64,
    pub fade_distance_px: f64,
    pub min_opacity: f64,
}

impl Default for SwipeSettings {
    fn default() -> Self {
        let tuning = SwipeTuning::default();
        Self {
            threshold_px: tuning.threshold_px,
            fade_distance_px: tuning.fade_distance_px,
            min_opacity: tuning.min_opacity,
        }
    }
}

impl SwipeSettings {
    pub fn tuning(&self) -> SwipeTuning {
        SwipeTuning {
            threshold_px: self.threshold_px,
            fade_distance_px: self.fade_distance_px,
            min_opacity: self.min_opacity,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.threshold_px > 0.0) {
            return Err(ConfigError::InvalidSwipe {
                reason: format!("threshold must be positive, got {}", self.threshold_px),
            });
        }
        if !(self.fade_distance_px > 0.0) {
            return Err(ConfigError::InvalidSwipe {
                reason: format!(
                    "fade distance must be positive, got {}",
                    self.fade_distance_px
                ),
            });
        }
        if !(0.0..=1.0).contains(&self.min_opacity) {
            return Err(ConfigError::InvalidSwipe {
                reason: format!("minimum opacity must be within 0..=1, got {}", self.min_opacity),
            });
        }
        Ok(())
    }
}
