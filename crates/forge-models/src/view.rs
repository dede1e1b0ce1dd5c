//! Top-level view state.

use serde::{Deserialize, Serialize};

/// Which surface of the application is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    /// Input form, waiting for a URL or document.
    #[default]
    Landing,
    /// First analysis in flight.
    Analyzing,
    /// Conversation on the analyzed source.
    Chat,
}

impl std::fmt::Display for ViewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Landing => write!(f, "landing"),
            Self::Analyzing => write!(f, "analyzing"),
            Self::Chat => write!(f, "chat"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_landing() {
        assert_eq!(ViewState::default(), ViewState::Landing);
        assert_eq!(ViewState::default().to_string(), "landing");
    }
}
