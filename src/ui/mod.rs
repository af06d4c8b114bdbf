//! Behavior components
//!
//! One component per enhancement. Each resolves its elements once at
//! activation, owns its state, and is a no-op when its elements are absent.

pub mod background;
pub mod guard;
pub mod media;
pub mod nav;
pub mod notifications;
pub mod password;
pub mod search;
pub mod transition;

pub use background::bind_backgrounds;
pub use guard::DestructiveGuard;
pub use media::{MediaController, PlaybackState};
pub use nav::NavController;
pub use notifications::{DismissReason, NotificationManager, WidgetPhase};
pub use password::PasswordMatch;
pub use search::SearchFilter;
pub use transition::TransitionCoordinator;
