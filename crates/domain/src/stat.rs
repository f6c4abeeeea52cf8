//! Stats — timestamped readings from sensors and units.

use serde::{Deserialize, Serialize};

use crate::time::{Timestamp, now};

/// Kind of value a [`Stat`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatType {
    /// Degrees celsius.
    Temperature,
    /// Percent relative humidity.
    Humidity,
    /// Water valve state (`1.0` on, `0.0` off).
    Water,
    /// Ventilation fan state (`1.0` on, `0.0` off).
    Fan,
}

impl StatType {
    /// Every known stat type.
    pub const ALL: [Self; 4] = [Self::Temperature, Self::Humidity, Self::Water, Self::Fan];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Water => "water",
            Self::Fan => "fan",
        }
    }
}

impl std::fmt::Display for StatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StatType {
    type Err = UnknownStatType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or(UnknownStatType)
    }
}

/// Returned when parsing a name that matches no [`StatType`].
#[derive(Debug, thiserror::Error)]
#[error("unknown stat type")]
pub struct UnknownStatType;

/// A single reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    pub stat_type: StatType,
    pub when: Timestamp,
    pub value: f64,
}

impl Stat {
    /// A reading taken now.
    #[must_use]
    pub fn now(stat_type: StatType, value: f64) -> Self {
        Self {
            stat_type,
            when: now(),
            value,
        }
    }
}
