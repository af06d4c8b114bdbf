//! Password confirmation matching

/// Rendered state of the match indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchState {
    Match,
    Mismatch,
}

impl MatchState {
    /// Evaluates a (password, confirmation) pair
    ///
    /// # Returns
    /// None when the confirmation is empty (indicator cleared), otherwise
    /// Match iff the confirmation equals the password and is at least
    /// `min_len` UTF-16 code units long, as the browser counts `value.length`
    pub fn evaluate(password: &str, confirmation: &str, min_len: usize) -> Option<Self> {
        if confirmation.is_empty() {
            return None;
        }

        if confirmation == password && confirmation.encode_utf16().count() >= min_len {
            Some(MatchState::Match)
        } else {
            Some(MatchState::Mismatch)
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchState::Match => "Passwords match",
            MatchState::Mismatch => "Passwords do not match",
        }
    }

    /// Value of the indicator's `data-state` attribute
    pub fn data_state(self) -> &'static str {
        match self {
            MatchState::Match => "ok",
            MatchState::Mismatch => "bad",
        }
    }
}
