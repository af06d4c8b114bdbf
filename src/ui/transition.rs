//! Animated hand-off between the auth pages
//!
//! A plain click on a transition link plays the exit animation and navigates
//! once it is over. Modified or non-primary clicks keep their browser meaning
//! (new tab, new window, ...) and are never intercepted. Submitting one of the
//! auth forms swaps its visual out while the request goes through.

use std::time::Duration;

use tracing::debug;

use crate::app::timer::TimerSlot;
use crate::config::EnhanceConfig;
use crate::input::{ClickInfo, Disposition, Listen, Task};
use crate::platform::Host;

const SWAP_OUT_CLASS: &str = "swap-out";
const SLIDE_OUT_CLASS: &str = "slide-fade-out";

struct SubmitSwapBinding<N> {
    form: N,
    visual: N,
}

pub struct TransitionCoordinator<H: Host> {
    links: Vec<H::Node>,
    swaps: Vec<SubmitSwapBinding<H::Node>>,
    container: String,
    visual: String,
    card: String,
    delay: Duration,
    pending: TimerSlot<H>,
}

impl<H: Host> TransitionCoordinator<H> {
    pub fn activate(host: &mut H, config: &EnhanceConfig) -> Self {
        let selectors = &config.selectors;

        let links = host.query_all(&selectors.transition_link);
        for link in &links {
            host.listen(link, Listen::Click);
        }

        let mut swaps = Vec::new();
        for swap in &selectors.submit_swaps {
            let (Some(form), Some(visual)) = (host.by_id(&swap.form_id), host.query(&swap.visual))
            else {
                continue;
            };
            host.listen(&form, Listen::Submit);
            swaps.push(SubmitSwapBinding { form, visual });
        }

        Self {
            links,
            swaps,
            container: selectors.transition_container.clone(),
            visual: selectors.transition_visual.clone(),
            card: selectors.transition_card.clone(),
            delay: config.timings.transition_delay(),
            pending: TimerSlot::new(),
        }
    }

    pub fn owns_link(&self, node: &H::Node) -> bool {
        self.links.contains(node)
    }

    pub fn owns_form(&self, node: &H::Node) -> bool {
        self.swaps.iter().any(|s| s.form == *node)
    }

    pub fn on_link_click(&mut self, host: &mut H, link: &H::Node, click: ClickInfo) -> Disposition {
        if !click.is_plain_primary() {
            return Disposition::Proceed;
        }
        let Some(container) = host.query(&self.container) else {
            return Disposition::Proceed;
        };
        let Some(href) = host.attribute(link, "href").filter(|h| !h.is_empty()) else {
            return Disposition::Proceed;
        };

        if let Some(visual) = host.query_in(&container, &self.visual) {
            host.add_class(&visual, SWAP_OUT_CLASS);
        }
        if let Some(card) = host.query_in(&container, &self.card) {
            host.add_class(&card, SLIDE_OUT_CLASS);
        }

        self.pending.schedule(host, self.delay, Task::Navigate(href));
        debug!("transition started");
        Disposition::Prevent
    }

    pub fn on_navigate_due(&mut self, host: &mut H, href: &str) {
        if self.pending.fired() {
            host.navigate(href);
        }
    }

    /// Swaps the form's visual out; submission always proceeds
    pub fn on_form_submit(&mut self, host: &mut H, form: &H::Node) -> Disposition {
        if let Some(swap) = self.swaps.iter().find(|s| s.form == *form) {
            host.add_class(&swap.visual, SWAP_OUT_CLASS);
        }
        Disposition::Proceed
    }
}
