//! Application orchestration layer
//!
//! This module coordinates between input, domain, UI, and platform layers.
//! It owns the activated components and routes every page event to them.

pub mod controller;
pub mod timer;

pub use controller::Enhancer;
pub use timer::TimerSlot;
