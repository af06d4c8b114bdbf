//! Input translation layer
//!
//! Everything the platform reports to the behavior layer is expressed with
//! the types in [`events`].

pub mod events;

pub use events::{ClickInfo, Disposition, Key, Listen, PageEvent, Task, WindowSignal};
