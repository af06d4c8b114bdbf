//! Declarative background images
//!
//! Visual containers carry their image in `data-bg`; this copies it into an
//! inline `background-image`.

use tracing::debug;

use crate::platform::Host;

/// Applies `data-bg` sources to every matching container
///
/// # Returns
/// Number of containers that received a background
pub fn bind_backgrounds<H: Host>(host: &mut H, selector: &str) -> usize {
    let mut bound = 0;
    for node in host.query_all(selector) {
        let Some(src) = host.attribute(&node, "data-bg").filter(|s| !s.is_empty()) else {
            continue;
        };
        host.set_style(&node, "background-image", &css_url(&src));
        bound += 1;
    }
    debug!(bound, "background images applied");
    bound
}

/// Quotes a source for use inside `url('...')`
fn css_url(src: &str) -> String {
    let escaped = src.replace('\\', "\\\\").replace('\'', "\\'");
    format!("url('{escaped}')")
}
