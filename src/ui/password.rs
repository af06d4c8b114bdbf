//! Live password confirmation indicator

use tracing::debug;

use crate::config::EnhanceConfig;
use crate::domain::password::MatchState;
use crate::input::Listen;
use crate::platform::Host;

const INDICATOR_SELECTOR: &str = ".match-indicator";
const INDICATOR_CLASS: &str = "match-indicator help";

pub struct PasswordMatch<H: Host> {
    password: H::Node,
    confirmation: H::Node,
    indicator: Option<H::Node>,
    min_len: usize,
}

impl<H: Host> PasswordMatch<H> {
    /// # Returns
    /// None unless both the password and the confirmation fields exist
    pub fn activate(host: &mut H, config: &EnhanceConfig) -> Option<Self> {
        let password = host.by_id(&config.selectors.password_id)?;
        let confirmation = host.by_id(&config.selectors.confirm_password_id)?;

        for field in [&password, &confirmation] {
            host.listen(field, Listen::Input);
            host.listen(field, Listen::KeyUp);
        }

        Some(Self {
            password,
            confirmation,
            indicator: None,
            min_len: config.password_min_len,
        })
    }

    pub fn owns(&self, node: &H::Node) -> bool {
        self.password == *node || self.confirmation == *node
    }

    /// Re-evaluates both fields and renders the indicator
    pub fn on_input(&mut self, host: &mut H) {
        let Some(indicator) = self.ensure_indicator(host) else {
            return;
        };

        let state = MatchState::evaluate(
            &host.value(&self.password),
            &host.value(&self.confirmation),
            self.min_len,
        );

        match state {
            None => {
                host.set_text(&indicator, "");
                host.remove_attribute(&indicator, "data-state");
            }
            Some(state) => {
                host.set_text(&indicator, state.label());
                host.set_attribute(&indicator, "data-state", state.data_state());
            }
        }
    }

    /// Finds or creates the indicator next to the confirmation field, once
    fn ensure_indicator(&mut self, host: &mut H) -> Option<H::Node> {
        if let Some(indicator) = &self.indicator {
            return Some(indicator.clone());
        }

        let parent = host.parent(&self.confirmation)?;
        let indicator = match host.query_in(&parent, INDICATOR_SELECTOR) {
            Some(existing) => existing,
            None => {
                let created = host.create_element("small", INDICATOR_CLASS)?;
                host.append_child(&parent, &created);
                debug!("password match indicator created");
                created
            }
        };

        self.indicator = Some(indicator.clone());
        Some(indicator)
    }
}
