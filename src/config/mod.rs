//! Configuration for page-enhance
//!
//! Selectors and timings are the contract between the server-rendered markup,
//! the stylesheet and this behavior layer. Defaults cover the stock templates;
//! a page can ship a JSON override to adjust them.

pub mod settings;

pub use settings::{ConfigError, EnhanceConfig, Selectors, SubmitSwap, SwipeSettings, Timings};
