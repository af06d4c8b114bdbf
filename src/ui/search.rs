//! Incremental search over the listing grid
//!
//! The card collection is captured once at activation; later filtering only
//! toggles visibility. Input is debounced; Escape bypasses the debounce.

use std::time::Duration;

use tracing::debug;

use crate::app::timer::TimerSlot;
use crate::config::EnhanceConfig;
use crate::domain::search::{normalize_query, stagger_delay, CardIndex, FilterPlan};
use crate::input::{Key, Listen, Task};
use crate::platform::Host;

const FADE_IN_CLASS: &str = "fade-in";
const NO_RESULTS_CLASS: &str = "no-results";

/// The "no results" indicator and its parts
struct NoResults<N> {
    root: N,
    message: N,
    clear: N,
}

pub struct SearchFilter<H: Host> {
    input: H::Node,
    grid: H::Node,
    cards: Vec<H::Node>,
    index: CardIndex,
    debounce: TimerSlot<H>,
    indicator: Option<NoResults<H::Node>>,
    delay: Duration,
    stagger: Duration,
}

impl<H: Host> SearchFilter<H> {
    /// # Returns
    /// None unless both the search input and the card grid exist
    pub fn activate(host: &mut H, config: &EnhanceConfig) -> Option<Self> {
        let selectors = &config.selectors;
        let input = host.by_id(&selectors.search_input_id)?;
        let grid = host.by_id(&selectors.search_grid_id)?;

        let cards = host.query_all_in(&grid, &selectors.search_card);
        let index = CardIndex::new(
            cards
                .iter()
                .map(|card| host.attribute(card, "data-title").unwrap_or_default()),
        );

        host.listen(&input, Listen::Input);
        host.listen(&input, Listen::KeyDown);
        debug!(cards = index.len(), "search filter bound");

        Some(Self {
            input,
            grid,
            cards,
            index,
            debounce: TimerSlot::new(),
            indicator: None,
            delay: config.timings.search_debounce(),
            stagger: config.timings.card_stagger(),
        })
    }

    pub fn owns_input(&self, node: &H::Node) -> bool {
        self.input == *node
    }

    pub fn owns_clear(&self, node: &H::Node) -> bool {
        self.indicator.as_ref().is_some_and(|i| i.clear == *node)
    }

    pub fn has_pending_filter(&self) -> bool {
        self.debounce.is_pending()
    }

    /// Restarts the quiet period
    pub fn on_input(&mut self, host: &mut H) {
        self.debounce.schedule(host, self.delay, Task::FilterSearch);
    }

    pub fn on_debounce(&mut self, host: &mut H) {
        if self.debounce.fired() {
            self.apply(host);
        }
    }

    /// Escape clears, re-filters synchronously and drops focus
    pub fn on_key_down(&mut self, host: &mut H, key: &Key) {
        if *key != Key::Escape {
            return;
        }
        self.clear(host);
        host.blur(&self.input);
    }

    pub fn on_clear_click(&mut self, host: &mut H) {
        self.clear(host);
    }

    fn clear(&mut self, host: &mut H) {
        self.debounce.cancel(host);
        host.set_value(&self.input, "");
        self.apply(host);
    }

    fn apply(&mut self, host: &mut H) {
        let query = normalize_query(&host.value(&self.input));
        let plan = self.index.plan(&query);

        for (index, (card, shown)) in self.cards.iter().zip(plan.visibility()).enumerate() {
            if *shown {
                host.set_style(card, "display", "");
                let delay = stagger_delay(index, self.stagger);
                host.set_style(card, "animation-delay", &format!("{}ms", delay.as_millis()));
                host.add_class(card, FADE_IN_CLASS);
            } else {
                host.set_style(card, "display", "none");
                host.remove_class(card, FADE_IN_CLASS);
            }
        }

        if plan.is_empty_result() {
            self.show_no_results(host, &plan);
        } else if let Some(indicator) = self.indicator.take() {
            host.remove(&indicator.root);
        }

        debug!(query = plan.query(), visible = plan.visible_count(), "search filtered");
    }

    fn show_no_results(&mut self, host: &mut H, plan: &FilterPlan) {
        if self.indicator.is_none() {
            self.indicator = self.build_indicator(host);
        }
        if let Some(indicator) = &self.indicator {
            host.set_text(&indicator.message, &plan.no_results_message());
        }
    }

    fn build_indicator(&self, host: &mut H) -> Option<NoResults<H::Node>> {
        let root = host.create_element("div", NO_RESULTS_CLASS)?;
        let message = host.create_element("p", "")?;
        let clear = host.create_element("button", "btn ghost")?;

        host.set_attribute(&clear, "type", "button");
        host.set_text(&clear, "Clear search");
        host.listen(&clear, Listen::Click);
        host.append_child(&root, &message);
        host.append_child(&root, &clear);
        host.append_child(&self.grid, &root);

        Some(NoResults {
            root,
            message,
            clear,
        })
    }
}
