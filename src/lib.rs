//! Progressive enhancement for server-rendered pages
//!
//! Activated once per page load, the crate binds a fixed set of behaviors to
//! whatever elements the page carries: hero video autoplay, dismissible flash
//! notifications, auth page transitions and backgrounds, a live password
//! match indicator, confirmation before destructive submits, listing search
//! and the responsive navigation toggle.
//!
//! Behavior is written against the [`platform::Host`] trait. On `wasm32` the
//! [`platform::web`] backend implements it over the DOM and installs itself
//! as the module start function.

pub mod app;
pub mod config;
pub mod domain;
pub mod input;
pub mod platform;
pub mod ui;

pub use app::Enhancer;
pub use config::{ConfigError, EnhanceConfig};
pub use input::{Disposition, PageEvent};
pub use platform::Host;
