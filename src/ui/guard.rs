//! Confirmation before destructive submissions

use tracing::info;

use crate::input::{Disposition, Listen};
use crate::platform::Host;

const DEFAULT_PROMPT: &str = "Are you sure?";

pub struct DestructiveGuard<H: Host> {
    forms: Vec<H::Node>,
}

impl<H: Host> DestructiveGuard<H> {
    pub fn activate(host: &mut H, selector: &str) -> Self {
        let forms = host.query_all(selector);
        for form in &forms {
            host.listen(form, Listen::Submit);
        }
        Self { forms }
    }

    pub fn owns(&self, node: &H::Node) -> bool {
        self.forms.contains(node)
    }

    /// Blocks the submission unless the operator confirms
    pub fn on_submit(&mut self, host: &mut H, form: &H::Node) -> Disposition {
        let prompt = host
            .attribute(form, "data-confirm")
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_PROMPT.to_string());

        if host.confirm(&prompt) {
            Disposition::Proceed
        } else {
            info!("destructive action cancelled by operator");
            Disposition::Prevent
        }
    }
}
