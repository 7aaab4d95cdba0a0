use serde::{Deserialize, Serialize};

/// The current countdown mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Work,
    Break,
    LongBreak,
}

impl Phase {
    pub fn is_break(self) -> bool {
        matches!(self, Phase::Break | Phase::LongBreak)
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Work => "Focus",
            Phase::Break => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Phase::Work => "work",
            Phase::Break => "break",
            Phase::LongBreak => "long_break",
        })
    }
}
