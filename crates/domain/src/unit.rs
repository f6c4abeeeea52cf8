//! Unit status — the on/off state reported by an actuator.

use serde::{Deserialize, Serialize};

/// State reported by a unit's hardware (or simulator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitStatus {
    On,
    Off,
}

impl UnitStatus {
    /// Whether this status is [`On`](Self::On).
    #[must_use]
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }

    /// Value recorded in stats for this status (`1.0` on, `0.0` off).
    #[must_use]
    pub fn as_stat_value(self) -> f64 {
        match self {
            Self::On => 1.0,
            Self::Off => 0.0,
        }
    }
}

impl From<bool> for UnitStatus {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

impl std::fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
        }
    }
}
