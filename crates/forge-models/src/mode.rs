//! Follow-up complexity modes.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Register the model should answer follow-ups in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityMode {
    /// No steering.
    #[default]
    Standard,
    /// Simple analogies, no jargon.
    #[serde(alias = "eli5")]
    Simplified,
    /// Technical terminology and nuance.
    Expert,
}

impl ComplexityMode {
    /// All modes in selector order.
    pub const ALL: [ComplexityMode; 3] = [Self::Simplified, Self::Standard, Self::Expert];

    /// Short label for selectors.
    pub fn short_label(self) -> &'static str {
        match self {
            Self::Simplified => "ELI5",
            Self::Standard => "Std",
            Self::Expert => "Pro",
        }
    }

    /// The next mode in selector order, wrapping around.
    pub fn cycle(self) -> Self {
        match self {
            Self::Simplified => Self::Standard,
            Self::Standard => Self::Expert,
            Self::Expert => Self::Simplified,
        }
    }
}

impl std::fmt::Display for ComplexityMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Simplified => write!(f, "simplified"),
            Self::Expert => write!(f, "expert"),
        }
    }
}

impl FromStr for ComplexityMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "std" => Ok(Self::Standard),
            "simplified" | "simple" | "eli5" => Ok(Self::Simplified),
            "expert" | "pro" => Ok(Self::Expert),
            other => Err(format!("unknown complexity mode: {}", other)),
        }
    }
}
