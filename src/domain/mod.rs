//! Domain logic and core data structures
//!
//! This module contains pure behavior logic that is independent
//! of the browser and of any platform-specific implementation.

pub mod nav;
pub mod password;
pub mod search;
pub mod severity;
pub mod swipe;
